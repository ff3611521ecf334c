//! Athletic testing results.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, info_span};

use draft_model::{CombineRecord, PositionAliases, QaIssue, QaKind, QaReport, canonical_player_name};

use crate::error::Result;
use crate::frame::FrameView;
use crate::polars_utils::parse_f64;

use super::{Ingested, load_optional, required_text, resolve_position};

const STAGE: &str = "combine";

/// Reads combine and pro-day testing.
///
/// Only `player_name` is required. A blank position is allowed and matched by
/// name alone; an unmapped one drops the row. Heights may be written as
/// inches or `6'4"`.
pub fn read_combine(path: &Path, aliases: &PositionAliases) -> Result<Ingested<CombineRecord>> {
    let _span = info_span!("ingest", stage = STAGE).entered();
    let Some(df) = load_optional(path, STAGE)? else {
        return Ok(Ingested::missing(STAGE));
    };
    let view = FrameView::new(&df, path);
    let name_col = view
        .first_present(&["player_name", "player", "name"])
        .unwrap_or("player_name");
    view.require(&[name_col])?;
    let position_col = view.first_present(&["position", "pos"]);

    let mut rows = Vec::with_capacity(view.height());
    let mut qa = QaReport::new(STAGE);
    let mut seen = HashSet::new();
    for row in 0..view.height() {
        let Some(player_name) = required_text(&view, row, name_col, &mut qa) else {
            continue;
        };
        let position = match position_col {
            Some(column) if view.text(row, column).is_some() => {
                match resolve_position(&view, row, column, aliases, &mut qa) {
                    Some(position) => Some(position),
                    None => continue,
                }
            }
            _ => None,
        };
        if !seen.insert((canonical_player_name(&player_name), position)) {
            qa.record(
                QaIssue::new(QaKind::DuplicateKey, format!("{player_name} tested twice"))
                    .at_row(row + 1),
            );
            continue;
        }
        let height_col = view
            .first_present(&["height_in", "height"])
            .unwrap_or("height_in");
        let weight_col = view
            .first_present(&["weight_lb", "weight"])
            .unwrap_or("weight_lb");
        rows.push(CombineRecord {
            player_name,
            position,
            height_in: view.text(row, height_col).and_then(|raw| parse_height(&raw)),
            weight_lb: view.number(row, weight_col),
            forty: view.number(row, "forty"),
            ten_split: view.number(row, "ten_split"),
            vertical: view.number(row, "vertical"),
            broad: view.number(row, "broad"),
            shuttle: view.number(row, "shuttle"),
            three_cone: view.number(row, "three_cone"),
            bench: view.number(row, "bench"),
            ras_official: view.number(row, "ras_official"),
        });
    }
    qa.finish(view.height(), rows.len());
    info!(
        rows = rows.len(),
        dropped = qa.dropped(),
        status = %qa.status,
        "combine records read"
    );
    Ok(Ingested { rows, qa })
}

fn parse_height(raw: &str) -> Option<f64> {
    parse_f64(raw).or_else(|| {
        draft_model::parse_height_inches(raw)
            .ok()
            .map(f64::from)
    })
}
