//! Normalized source tables. They are read back through the source readers,
//! so column names match what those readers expect.

use polars::prelude::DataFrame;

use draft_model::{
    CombineRecord, HistoricalRecord, ProductionRecord, SourceRecord, TeamNeedProfile,
};

use crate::error::Result;
use crate::frame::FrameBuilder;

pub fn consensus_frame(records: &[SourceRecord]) -> Result<DataFrame> {
    FrameBuilder::new()
        .text("source", records.iter().map(|r| r.source.as_str()))
        .text("player_name", records.iter().map(|r| r.player_name.as_str()))
        .text("position", records.iter().map(|r| r.position.as_str()))
        .number("rank", records.iter().map(|r| Some(r.rank)))
        .number("score", records.iter().map(|r| r.score))
        .opt_text("fetched_at", records.iter().map(|r| r.fetched_at.clone()))
        .opt_text("url", records.iter().map(|r| r.url.clone()))
        .build()
}

pub fn combine_frame(records: &[CombineRecord]) -> Result<DataFrame> {
    FrameBuilder::new()
        .text("player_name", records.iter().map(|r| r.player_name.as_str()))
        .text(
            "position",
            records
                .iter()
                .map(|r| r.position.map(|p| p.as_str()).unwrap_or("")),
        )
        .number("height_in", records.iter().map(|r| r.height_in))
        .number("weight_lb", records.iter().map(|r| r.weight_lb))
        .number("forty", records.iter().map(|r| r.forty))
        .number("ten_split", records.iter().map(|r| r.ten_split))
        .number("vertical", records.iter().map(|r| r.vertical))
        .number("broad", records.iter().map(|r| r.broad))
        .number("shuttle", records.iter().map(|r| r.shuttle))
        .number("three_cone", records.iter().map(|r| r.three_cone))
        .number("bench", records.iter().map(|r| r.bench))
        .number("ras_official", records.iter().map(|r| r.ras_official))
        .build()
}

pub fn production_frame(records: &[ProductionRecord]) -> Result<DataFrame> {
    FrameBuilder::new()
        .text("player_name", records.iter().map(|r| r.player_name.as_str()))
        .text("position", records.iter().map(|r| r.position.as_str()))
        .integer("season", records.iter().map(|r| r.season.map(i64::from)))
        .number(
            "production_score",
            records.iter().map(|r| Some(r.production_score)),
        )
        .integer("college_games", records.iter().map(|r| r.games.map(i64::from)))
        .build()
}

pub fn team_needs_frame(profiles: &[TeamNeedProfile]) -> Result<DataFrame> {
    let need = |profile: &TeamNeedProfile, slot: usize| -> String {
        profile
            .needs
            .get(slot)
            .map(|p| p.as_str().to_string())
            .unwrap_or_default()
    };
    FrameBuilder::new()
        .text("team", profiles.iter().map(|p| p.team.as_str()))
        .text("need_1", profiles.iter().map(|p| need(p, 0)))
        .text("need_2", profiles.iter().map(|p| need(p, 1)))
        .text("need_3", profiles.iter().map(|p| need(p, 2)))
        .text("off_scheme", profiles.iter().map(|p| p.off_scheme.as_str()))
        .text("def_scheme", profiles.iter().map(|p| p.def_scheme.as_str()))
        .text("gm_profile", profiles.iter().map(|p| p.gm_profile.as_str()))
        .build()
}

/// Historical draft rows with positions still in source spelling.
pub fn historical_frame(records: &[HistoricalRecord]) -> Result<DataFrame> {
    FrameBuilder::new()
        .integer("draft_year", records.iter().map(|r| r.draft_year.map(i64::from)))
        .integer(
            "overall_pick",
            records.iter().map(|r| Some(i64::from(r.overall_pick))),
        )
        .integer(
            "draft_round",
            records.iter().map(|r| Some(i64::from(r.draft_round))),
        )
        .text("player_name", records.iter().map(|r| r.player_name.as_str()))
        .text("position", records.iter().map(|r| r.position_raw.as_str()))
        .text("school", records.iter().map(|r| r.school.as_str()))
        .number("wav", records.iter().map(|r| Some(r.wav)))
        .number("games", records.iter().map(|r| Some(r.games)))
        .number("starts", records.iter().map(|r| Some(r.starts)))
        .number("ap1", records.iter().map(|r| Some(r.ap1)))
        .number("pb", records.iter().map(|r| Some(r.pb)))
        .number("years_in_career", records.iter().map(|r| Some(r.years_in_career)))
        .integer("to_year", records.iter().map(|r| r.to_year.map(i64::from)))
        .number("predicted_value", records.iter().map(|r| r.predicted_value))
        .build()
}
