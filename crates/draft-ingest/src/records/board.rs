use std::path::Path;

use polars::prelude::DataFrame;

use draft_model::{BoardEntry, CompMatch, MetricValue, ProspectScores};

use crate::error::Result;
use crate::frame::{FrameBuilder, FrameView};
use crate::table::read_table;

use super::prospects::prospect_at;
use super::read_metric;

/// Comp slots written per board row.
pub const COMP_SLOTS: usize = 3;

/// Builds the `big_board` table.
pub fn board_frame(entries: &[BoardEntry]) -> Result<DataFrame> {
    let prospects = || entries.iter().map(|e| &e.prospect);
    let scores = || entries.iter().map(|e| &e.scores);
    let mut builder = FrameBuilder::new()
        .integer("board_rank", entries.iter().map(|e| Some(i64::from(e.board_rank))))
        .text("player_id", prospects().map(|p| p.player_id.as_str()))
        .text("player_name", prospects().map(|p| p.player_name.as_str()))
        .text("school", prospects().map(|p| p.school.as_str()))
        .text("position", prospects().map(|p| p.position.as_str()))
        .text("class_year", prospects().map(|p| p.class_year.as_str()))
        .integer("draft_year", prospects().map(|p| Some(i64::from(p.draft_year))))
        .integer("rank_seed", prospects().map(|p| Some(i64::from(p.rank_seed))))
        .integer("height_in", prospects().map(|p| p.height_in.map(i64::from)))
        .integer("weight_lb", prospects().map(|p| p.weight_lb.map(i64::from)))
        .flag("injury_flag", prospects().map(|p| p.injury_flag))
        .flag("role_ambiguous", prospects().map(|p| p.role_ambiguous))
        .number(
            "consensus_mean_rank",
            entries.iter().map(|e| e.consensus_mean_rank),
        )
        .number("consensus_rank_std", entries.iter().map(|e| e.consensus_rank_std))
        .integer(
            "consensus_sources",
            entries.iter().map(|e| Some(e.consensus_sources as i64)),
        )
        .number("consensus_signal", entries.iter().map(|e| e.consensus_signal))
        .number(
            "consensus_confidence",
            entries.iter().map(|e| e.consensus_confidence),
        )
        .number("prior_signal", entries.iter().map(|e| Some(e.prior_signal)))
        .number("trait_score", scores().map(|s| Some(s.trait_score)))
        .number(
            "production_score",
            scores().map(|s| Some(s.production.value())),
        )
        .text(
            "production_score_source",
            scores().map(|s| s.production.source_label()),
        )
        .number("athletic_score", scores().map(|s| Some(s.athletic.value())))
        .text(
            "athletic_score_source",
            scores().map(|s| s.athletic.source_label()),
        )
        .number("size_score", scores().map(|s| Some(s.size_score)))
        .number("context_score", scores().map(|s| Some(s.context_score)))
        .number("risk_penalty", scores().map(|s| Some(s.risk_penalty)))
        .number("final_grade", scores().map(|s| Some(s.final_grade)))
        .number("floor_grade", scores().map(|s| Some(s.floor_grade)))
        .number("ceiling_grade", scores().map(|s| Some(s.ceiling_grade)))
        .text("round_projection", scores().map(|s| s.round_projection.as_str()))
        .number("ras", entries.iter().map(|e| Some(e.ras.value())))
        .text("ras_source", entries.iter().map(|e| e.ras.source_label()))
        .text("ras_tier", entries.iter().map(|e| e.ras_tier.as_str()))
        .number("roi_adjustment", entries.iter().map(|e| Some(e.roi_adjustment)))
        .number(
            "success_probability",
            entries.iter().map(|e| e.success_probability),
        )
        .opt_text("best_team", entries.iter().map(|e| e.best_team.clone()))
        .number("best_team_fit", entries.iter().map(|e| e.best_team_fit));

    for slot in 0..COMP_SLOTS {
        let comp = |e: &BoardEntry| e.comps.get(slot).cloned();
        let prefix = format!("comp_{}", slot + 1);
        builder = builder
            .opt_text(
                &format!("{prefix}_id"),
                entries.iter().map(|e| comp(e).map(|c| c.player_id)),
            )
            .opt_text(
                &format!("{prefix}_name"),
                entries.iter().map(|e| comp(e).map(|c| c.player_name)),
            )
            .integer(
                &format!("{prefix}_year"),
                entries
                    .iter()
                    .map(|e| comp(e).and_then(|c| c.draft_year).map(i64::from)),
            )
            .number(
                &format!("{prefix}_distance"),
                entries.iter().map(|e| comp(e).map(|c| c.distance)),
            )
            .integer(
                &format!("{prefix}_overlap"),
                entries.iter().map(|e| comp(e).map(|c| c.overlap as i64)),
            )
            .opt_text(
                &format!("{prefix}_tier"),
                entries
                    .iter()
                    .map(|e| comp(e).map(|c| c.tier.as_str().to_string())),
            );
    }
    builder.build()
}

/// Reads a `big_board` table written by [`board_frame`].
pub fn read_board(path: &Path) -> Result<Vec<BoardEntry>> {
    let df = read_table(path)?;
    let view = FrameView::new(&df, path);
    if view.height() == 0 {
        return Ok(Vec::new());
    }
    view.require(&["board_rank", "player_id", "position", "final_grade"])?;
    (0..view.height())
        .map(|row| board_entry_at(&view, row))
        .collect()
}

fn board_entry_at(view: &FrameView<'_>, row: usize) -> Result<BoardEntry> {
    let grade = |column: &str| view.number(row, column).unwrap_or(0.0);
    let production = read_metric(view, row, "production_score")?
        .unwrap_or(MetricValue::Verified(0.0));
    let athletic = read_metric(view, row, "athletic_score")?
        .unwrap_or(MetricValue::Verified(0.0));
    let ras = read_metric(view, row, "ras")?.unwrap_or(MetricValue::Verified(0.0));

    let mut comps = Vec::new();
    for slot in 0..COMP_SLOTS {
        let prefix = format!("comp_{}", slot + 1);
        let Some(player_id) = view.text(row, &format!("{prefix}_id")) else {
            continue;
        };
        comps.push(CompMatch {
            player_id,
            player_name: view.text_or_empty(row, &format!("{prefix}_name")),
            draft_year: view
                .integer(row, &format!("{prefix}_year"))
                .map(|v| v as i32),
            distance: view
                .number(row, &format!("{prefix}_distance"))
                .unwrap_or(0.0),
            overlap: view
                .integer(row, &format!("{prefix}_overlap"))
                .and_then(|v| usize::try_from(v).ok())
                .unwrap_or(0),
            tier: view.decode(row, &format!("{prefix}_tier"), |raw| raw.parse().ok())?,
        });
    }

    Ok(BoardEntry {
        board_rank: view.decode(row, "board_rank", |raw| raw.parse().ok())?,
        prospect: prospect_at(view, row)?,
        consensus_mean_rank: view.number(row, "consensus_mean_rank"),
        consensus_rank_std: view.number(row, "consensus_rank_std"),
        consensus_sources: view
            .integer(row, "consensus_sources")
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(0),
        consensus_signal: view.number(row, "consensus_signal"),
        consensus_confidence: view.number(row, "consensus_confidence"),
        prior_signal: grade("prior_signal"),
        scores: ProspectScores {
            trait_score: grade("trait_score"),
            production,
            athletic,
            size_score: grade("size_score"),
            context_score: grade("context_score"),
            risk_penalty: grade("risk_penalty"),
            final_grade: grade("final_grade"),
            floor_grade: grade("floor_grade"),
            ceiling_grade: grade("ceiling_grade"),
            round_projection: view.text_or_empty(row, "round_projection"),
        },
        ras,
        ras_tier: view.text_or_empty(row, "ras_tier"),
        roi_adjustment: grade("roi_adjustment"),
        success_probability: view.number(row, "success_probability"),
        best_team: view.text(row, "best_team"),
        best_team_fit: view.number(row, "best_team_fit"),
        comps,
    })
}
