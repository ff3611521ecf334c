//! Draft order and compensatory picks.

use std::path::Path;

use tracing::info;

use draft_model::{CompPick, QaIssue, QaKind, QaReport};

use crate::error::Result;
use crate::frame::FrameView;

use super::{Ingested, load_optional, required_text};

/// Reads the round-one order: a `team` column, sorted by `pick` when that
/// column is present and otherwise in file order.
pub fn read_draft_order(path: &Path) -> Result<Ingested<String>> {
    const STAGE: &str = "draft_order";
    let Some(df) = load_optional(path, STAGE)? else {
        return Ok(Ingested::missing(STAGE));
    };
    let view = FrameView::new(&df, path);
    view.require(&["team"])?;

    let mut qa = QaReport::new(STAGE);
    let mut slots: Vec<(i64, String)> = Vec::with_capacity(view.height());
    for row in 0..view.height() {
        let Some(team) = required_text(&view, row, "team", &mut qa) else {
            continue;
        };
        let pick = view.integer(row, "pick").unwrap_or(row as i64 + 1);
        slots.push((pick, team));
    }
    slots.sort_by_key(|(pick, _)| *pick);
    let rows: Vec<String> = slots.into_iter().map(|(_, team)| team).collect();
    qa.finish(view.height(), rows.len());
    info!(teams = rows.len(), "draft order read");
    Ok(Ingested { rows, qa })
}

/// Reads `round, pick_after, team` compensatory picks.
pub fn read_comp_picks(path: &Path) -> Result<Ingested<CompPick>> {
    const STAGE: &str = "comp_picks";
    let Some(df) = load_optional(path, STAGE)? else {
        return Ok(Ingested::missing(STAGE));
    };
    let view = FrameView::new(&df, path);
    view.require(&["round", "pick_after", "team"])?;

    let mut qa = QaReport::new(STAGE);
    let mut rows = Vec::with_capacity(view.height());
    for row in 0..view.height() {
        let Some(team) = required_text(&view, row, "team", &mut qa) else {
            continue;
        };
        let round = view.integer(row, "round").and_then(|v| u32::try_from(v).ok());
        let pick_after = view
            .integer(row, "pick_after")
            .and_then(|v| u32::try_from(v).ok());
        let (Some(round), Some(pick_after)) = (round, pick_after) else {
            qa.record(
                QaIssue::new(QaKind::MissingValue, format!("comp pick for {team}"))
                    .at_row(row + 1),
            );
            continue;
        };
        if round == 0 {
            qa.record(
                QaIssue::new(QaKind::OutOfRange, format!("round 0 comp pick for {team}"))
                    .at_row(row + 1)
                    .on_field("round"),
            );
            continue;
        }
        rows.push(CompPick {
            round,
            pick_after,
            team,
        });
    }
    qa.finish(view.height(), rows.len());
    info!(rows = rows.len(), "comp picks read");
    Ok(Ingested { rows, qa })
}
