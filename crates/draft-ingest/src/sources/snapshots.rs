//! Pre-draft model grade snapshots for historical classes.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, info_span};

use draft_model::{
    GradeSnapshot, PositionAliases, QaIssue, QaKind, QaReport, canonical_player_name,
};

use crate::error::Result;
use crate::frame::FrameView;

use super::{Ingested, load_optional, required_text, resolve_position};

const STAGE: &str = "grade_snapshots";

/// Reads `draft_year, player_name, position, model_grade`.
pub fn read_grade_snapshots(
    path: &Path,
    aliases: &PositionAliases,
) -> Result<Ingested<GradeSnapshot>> {
    let _span = info_span!("ingest", stage = STAGE).entered();
    let Some(df) = load_optional(path, STAGE)? else {
        return Ok(Ingested::missing(STAGE));
    };
    let view = FrameView::new(&df, path);
    let grade_col = view
        .first_present(&["model_grade", "final_grade", "grade"])
        .unwrap_or("model_grade");
    view.require(&["draft_year", "player_name", "position", grade_col])?;

    let mut rows = Vec::with_capacity(view.height());
    let mut qa = QaReport::new(STAGE);
    let mut seen = HashSet::new();
    for row in 0..view.height() {
        let Some(player_name) = required_text(&view, row, "player_name", &mut qa) else {
            continue;
        };
        let Some(position) = resolve_position(&view, row, "position", aliases, &mut qa) else {
            continue;
        };
        let (Some(draft_year), Some(model_grade)) = (
            view.integer(row, "draft_year"),
            view.number(row, grade_col),
        ) else {
            qa.record(
                QaIssue::new(
                    QaKind::MissingValue,
                    format!("{player_name} needs draft_year and {grade_col}"),
                )
                .at_row(row + 1),
            );
            continue;
        };
        let draft_year = draft_year as i32;
        if !seen.insert((draft_year, canonical_player_name(&player_name), position)) {
            qa.record(
                QaIssue::new(QaKind::DuplicateKey, format!("{player_name} {draft_year}"))
                    .at_row(row + 1),
            );
            continue;
        }
        rows.push(GradeSnapshot {
            draft_year,
            player_name,
            position,
            model_grade,
        });
    }
    qa.finish(view.height(), rows.len());
    info!(rows = rows.len(), dropped = qa.dropped(), "grade snapshots read");
    Ok(Ingested { rows, qa })
}
