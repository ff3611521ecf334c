use std::path::Path;

use polars::prelude::DataFrame;

use draft_model::{PickRecord, TradeFlag};

use crate::error::Result;
use crate::frame::{FrameBuilder, FrameView};
use crate::table::read_table;

use super::read_position;

/// Builds the `mock_picks` table.
pub fn picks_frame(picks: &[PickRecord]) -> Result<DataFrame> {
    FrameBuilder::new()
        .integer("round", picks.iter().map(|p| Some(i64::from(p.round))))
        .integer(
            "pick_in_round",
            picks.iter().map(|p| Some(i64::from(p.pick_in_round))),
        )
        .integer(
            "overall_pick",
            picks.iter().map(|p| Some(i64::from(p.overall_pick))),
        )
        .text("team", picks.iter().map(|p| p.team.as_str()))
        .text("player_id", picks.iter().map(|p| p.player_id.as_str()))
        .text("player_name", picks.iter().map(|p| p.player_name.as_str()))
        .text("position", picks.iter().map(|p| p.position.as_str()))
        .text("school", picks.iter().map(|p| p.school.as_str()))
        .integer("board_rank", picks.iter().map(|p| Some(i64::from(p.board_rank))))
        .number("final_grade", picks.iter().map(|p| Some(p.final_grade)))
        .text(
            "round_projection",
            picks.iter().map(|p| p.round_projection.as_str()),
        )
        .number("pick_score", picks.iter().map(|p| Some(p.pick_score)))
        .number("board_value", picks.iter().map(|p| Some(p.board_value)))
        .number("team_fit", picks.iter().map(|p| Some(p.team_fit)))
        .number("run_pressure", picks.iter().map(|p| Some(p.run_pressure)))
        .number("scarcity", picks.iter().map(|p| Some(p.scarcity)))
        .flag("trade_down_flag", picks.iter().map(|p| p.trade_down_flag))
        .build()
}

/// Reads a `mock_picks` table written by [`picks_frame`].
pub fn read_picks(path: &Path) -> Result<Vec<PickRecord>> {
    let df = read_table(path)?;
    let view = FrameView::new(&df, path);
    if view.height() == 0 {
        return Ok(Vec::new());
    }
    view.require(&["round", "overall_pick", "team", "player_id", "position"])?;
    (0..view.height())
        .map(|row| {
            let number = |column: &str| view.number(row, column).unwrap_or(0.0);
            let count = |column: &str| {
                view.integer(row, column)
                    .and_then(|v| u32::try_from(v).ok())
                    .unwrap_or(0)
            };
            Ok(PickRecord {
                round: count("round"),
                pick_in_round: count("pick_in_round"),
                overall_pick: count("overall_pick"),
                team: view.text_or_empty(row, "team"),
                player_id: view.text_or_empty(row, "player_id"),
                player_name: view.text_or_empty(row, "player_name"),
                position: read_position(&view, row, "position")?,
                school: view.text_or_empty(row, "school"),
                board_rank: count("board_rank"),
                final_grade: number("final_grade"),
                round_projection: view.text_or_empty(row, "round_projection"),
                pick_score: number("pick_score"),
                board_value: number("board_value"),
                team_fit: number("team_fit"),
                run_pressure: number("run_pressure"),
                scarcity: number("scarcity"),
                trade_down_flag: view.flag(row, "trade_down_flag"),
            })
        })
        .collect()
}

/// Builds the `mock_trade_flags` table.
pub fn trade_flags_frame(flags: &[TradeFlag]) -> Result<DataFrame> {
    FrameBuilder::new()
        .integer("round", flags.iter().map(|f| Some(i64::from(f.round))))
        .integer(
            "pick_in_round",
            flags.iter().map(|f| Some(i64::from(f.pick_in_round))),
        )
        .integer(
            "overall_pick",
            flags.iter().map(|f| Some(i64::from(f.overall_pick))),
        )
        .text("team", flags.iter().map(|f| f.team.as_str()))
        .text(
            "top_need",
            flags
                .iter()
                .map(|f| f.top_need.map(|p| p.as_str()).unwrap_or("")),
        )
        .integer(
            "similar_players",
            flags.iter().map(|f| Some(f.similar_players as i64)),
        )
        .text(
            "scarcity_teams",
            flags.iter().map(|f| f.scarcity_teams.join("|")),
        )
        .text("reason", flags.iter().map(|f| f.reason.as_str()))
        .build()
}
