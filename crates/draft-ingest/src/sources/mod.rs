//! Source table readers.
//!
//! Each reader normalizes one dataset into model types. A missing file is
//! not an error: it yields no rows and a `missing_input` QA status. Rows that
//! fail a check are dropped and counted in the stage's [`QaReport`].

pub mod combine;
pub mod consensus;
pub mod draft_order;
pub mod historical;
pub mod production;
pub mod profiles;
pub mod seed;
pub mod snapshots;
pub mod team_needs;

use std::path::Path;

use polars::prelude::DataFrame;
use tracing::{debug, info};

use draft_model::{Position, PositionAliases, QaIssue, QaKind, QaReport};

use crate::error::Result;
use crate::frame::FrameView;
use crate::table::read_table;

pub use combine::read_combine;
pub use consensus::read_consensus;
pub use draft_order::{read_comp_picks, read_draft_order};
pub use historical::read_historical;
pub use production::read_production;
pub use profiles::read_comp_profiles;
pub use seed::read_seed_rows;
pub use snapshots::read_grade_snapshots;
pub use team_needs::read_team_needs;

/// Rows read from one source plus the QA report for the read.
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub rows: Vec<T>,
    pub qa: QaReport,
}

impl<T> Ingested<T> {
    pub fn missing(stage: &str) -> Self {
        Self {
            rows: Vec::new(),
            qa: QaReport::missing_input(stage),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads `path` if it exists. `Ok(None)` means the file is absent.
pub(crate) fn load_optional(path: &Path, stage: &str) -> Result<Option<DataFrame>> {
    if !path.is_file() {
        info!(stage, path = %path.display(), "source table not found");
        return Ok(None);
    }
    let df = read_table(path)?;
    debug!(stage, path = %path.display(), rows = df.height(), "read source table");
    Ok(Some(df))
}

/// Resolves the position column of `row`, recording a QA issue on failure.
pub(crate) fn resolve_position(
    view: &FrameView<'_>,
    row: usize,
    column: &str,
    aliases: &PositionAliases,
    qa: &mut QaReport,
) -> Option<Position> {
    let Some(raw) = view.text(row, column) else {
        qa.record(
            QaIssue::new(QaKind::MissingValue, "position is blank")
                .at_row(row + 1)
                .on_field(column),
        );
        return None;
    };
    match aliases.resolve(&raw) {
        Ok(position) => Some(position),
        Err(error) => {
            qa.record(
                QaIssue::new(QaKind::UnknownPosition, error.to_string())
                    .at_row(row + 1)
                    .on_field(column),
            );
            None
        }
    }
}

/// Reads a required name column, recording a QA issue when blank.
pub(crate) fn required_text(
    view: &FrameView<'_>,
    row: usize,
    column: &str,
    qa: &mut QaReport,
) -> Option<String> {
    let value = view.text(row, column);
    if value.is_none() {
        qa.record(
            QaIssue::new(QaKind::MissingValue, format!("{column} is blank"))
                .at_row(row + 1)
                .on_field(column),
        );
    }
    value
}
