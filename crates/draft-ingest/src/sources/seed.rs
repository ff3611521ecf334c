//! Roster seed rows, before position and height normalization.

use std::path::Path;

use tracing::{info, info_span};

use draft_model::{QaReport, SeedRow};

use crate::error::Result;
use crate::frame::FrameView;

use super::{Ingested, load_optional};

const STAGE: &str = "seed";

/// Reads the roster seed table.
///
/// Expects `rank_seed` (or `rank`), `player_name`, `school`, `position`,
/// `height`, `weight_lb` and `class_year`; injury and role flags are optional.
pub fn read_seed_rows(path: &Path) -> Result<Ingested<SeedRow>> {
    let _span = info_span!("ingest", stage = STAGE).entered();
    let Some(df) = load_optional(path, STAGE)? else {
        return Ok(Ingested::missing(STAGE));
    };
    let view = FrameView::new(&df, path);
    let rank_col = view.first_present(&["rank_seed", "rank"]).unwrap_or("rank_seed");
    let name_col = view
        .first_present(&["player_name", "player", "name"])
        .unwrap_or("player_name");
    let position_col = view.first_present(&["position", "pos"]).unwrap_or("position");
    view.require(&[rank_col, name_col, position_col])?;
    let height_col = view
        .first_present(&["height", "height_in"])
        .unwrap_or("height");
    let weight_col = view
        .first_present(&["weight_lb", "weight"])
        .unwrap_or("weight_lb");

    let rows: Vec<SeedRow> = (0..view.height())
        .map(|row| SeedRow {
            row: row + 1,
            rank_seed: view.integer(row, rank_col),
            player_name: view.text(row, name_col),
            school: view.text_or_empty(row, "school"),
            position_raw: view.text(row, position_col),
            height_raw: view.text(row, height_col),
            weight_lb: view.number(row, weight_col),
            class_year_raw: view.text_or_empty(row, "class_year"),
            draft_year: view.integer(row, "draft_year").map(|year| year as i32),
            injury_flag: view.flag(row, "injury_flag"),
            role_ambiguous: view.flag(row, "role_ambiguous"),
        })
        .collect();
    let mut qa = QaReport::new(STAGE);
    qa.finish(view.height(), rows.len());
    info!(rows = rows.len(), "seed rows read");
    Ok(Ingested { rows, qa })
}
