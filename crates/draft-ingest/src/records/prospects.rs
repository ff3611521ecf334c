use std::path::Path;

use polars::prelude::DataFrame;

use draft_model::{ClassYear, Prospect};

use crate::error::Result;
use crate::frame::{FrameBuilder, FrameView};
use crate::table::read_table;

use super::{read_position, to_i64};

/// Builds the `prospects_seed` table.
pub fn prospects_frame(prospects: &[Prospect]) -> Result<DataFrame> {
    FrameBuilder::new()
        .text("player_id", prospects.iter().map(|p| p.player_id.as_str()))
        .text("player_name", prospects.iter().map(|p| p.player_name.as_str()))
        .text("school", prospects.iter().map(|p| p.school.as_str()))
        .text("position", prospects.iter().map(|p| p.position.as_str()))
        .text("class_year", prospects.iter().map(|p| p.class_year.as_str()))
        .integer(
            "draft_year",
            prospects.iter().map(|p| Some(i64::from(p.draft_year))),
        )
        .integer(
            "rank_seed",
            prospects.iter().map(|p| Some(i64::from(p.rank_seed))),
        )
        .integer("height_in", prospects.iter().map(|p| to_i64(p.height_in)))
        .integer("weight_lb", prospects.iter().map(|p| to_i64(p.weight_lb)))
        .flag("injury_flag", prospects.iter().map(|p| p.injury_flag))
        .flag("role_ambiguous", prospects.iter().map(|p| p.role_ambiguous))
        .build()
}

/// Reads a `prospects_seed` table written by [`prospects_frame`].
pub fn read_prospects(path: &Path) -> Result<Vec<Prospect>> {
    let df = read_table(path)?;
    prospects_from_view(&FrameView::new(&df, path))
}

pub(crate) fn prospects_from_view(view: &FrameView<'_>) -> Result<Vec<Prospect>> {
    if view.height() == 0 {
        return Ok(Vec::new());
    }
    view.require(&["player_id", "player_name", "position", "draft_year", "rank_seed"])?;
    (0..view.height())
        .map(|row| prospect_at(view, row))
        .collect()
}

pub(crate) fn prospect_at(view: &FrameView<'_>, row: usize) -> Result<Prospect> {
    Ok(Prospect {
        player_id: view.text_or_empty(row, "player_id"),
        player_name: view.text_or_empty(row, "player_name"),
        school: view.text_or_empty(row, "school"),
        position: read_position(view, row, "position")?,
        class_year: view
            .text(row, "class_year")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(ClassYear::Unknown),
        draft_year: view.decode(row, "draft_year", |raw| raw.parse().ok())?,
        rank_seed: view.decode(row, "rank_seed", |raw| raw.parse().ok())?,
        height_in: view
            .integer(row, "height_in")
            .and_then(|v| u32::try_from(v).ok()),
        weight_lb: view
            .integer(row, "weight_lb")
            .and_then(|v| u32::try_from(v).ok()),
        injury_flag: view.flag(row, "injury_flag"),
        role_ambiguous: view.flag(row, "role_ambiguous"),
    })
}
