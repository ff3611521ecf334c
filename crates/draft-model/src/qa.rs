//! Stage QA reporting.
//!
//! Ingestion problems never abort a stage. Rows that fail a check are counted
//! per [`QaKind`] and excluded (or kept with a warning), and the stage
//! records a [`StageStatus`] in its report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Outcome status of one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Ok,
    MissingInput,
    EmptyInput,
    Partial,
}

impl StageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Ok => "ok",
            StageStatus::MissingInput => "missing_input",
            StageStatus::EmptyInput => "empty_input",
            StageStatus::Partial => "partial",
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a row-level QA problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QaKind {
    DuplicateKey,
    UnknownPosition,
    OutOfRange,
    MissingValue,
    InvalidRank,
    /// Row kept, but a derived value could not be computed.
    IncompleteRow,
}

impl QaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QaKind::DuplicateKey => "duplicate_key",
            QaKind::UnknownPosition => "unknown_position",
            QaKind::OutOfRange => "out_of_range",
            QaKind::MissingValue => "missing_value",
            QaKind::InvalidRank => "invalid_rank",
            QaKind::IncompleteRow => "incomplete_row",
        }
    }

    /// Whether rows with this problem are dropped from stage output.
    pub fn drops_row(&self) -> bool {
        !matches!(self, QaKind::IncompleteRow)
    }
}

impl fmt::Display for QaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single QA finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaIssue {
    pub kind: QaKind,
    /// 1-based source row, when known.
    pub row: Option<usize>,
    pub field: Option<String>,
    pub message: String,
}

impl QaIssue {
    pub fn new(kind: QaKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            row: None,
            field: None,
            message: message.into(),
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// QA summary for one stage run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaReport {
    pub stage: String,
    pub status: StageStatus,
    pub rows_in: usize,
    pub rows_out: usize,
    pub counts: BTreeMap<QaKind, u64>,
    /// First few issues of each kind, for the markdown report.
    pub samples: Vec<QaIssue>,
}

impl QaReport {
    /// Issues kept per kind in `samples`.
    pub const SAMPLE_LIMIT: usize = 5;

    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            status: StageStatus::Ok,
            rows_in: 0,
            rows_out: 0,
            counts: BTreeMap::new(),
            samples: Vec::new(),
        }
    }

    /// Report for a stage whose input file does not exist.
    pub fn missing_input(stage: impl Into<String>) -> Self {
        let mut report = Self::new(stage);
        report.status = StageStatus::MissingInput;
        report
    }

    pub fn record(&mut self, issue: QaIssue) {
        let count = self.counts.entry(issue.kind).or_insert(0);
        *count += 1;
        if *count as usize <= Self::SAMPLE_LIMIT {
            self.samples.push(issue);
        }
    }

    pub fn count(&self, kind: QaKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Rows excluded from output.
    pub fn dropped(&self) -> u64 {
        self.counts
            .iter()
            .filter(|(kind, _)| kind.drops_row())
            .map(|(_, count)| *count)
            .sum()
    }

    pub fn warning_count(&self) -> u64 {
        self.counts
            .iter()
            .filter(|(kind, _)| !kind.drops_row())
            .map(|(_, count)| *count)
            .sum()
    }

    pub fn has_issues(&self) -> bool {
        !self.counts.is_empty()
    }

    /// Folds a second read for the same stage into this report. Counts and
    /// row totals add up; samples stay capped per kind. The result is only
    /// `missing_input` when both sides were.
    pub fn absorb(&mut self, other: QaReport) {
        for (kind, count) in other.counts {
            *self.counts.entry(kind).or_insert(0) += count;
        }
        for issue in other.samples {
            let kept = self.samples.iter().filter(|s| s.kind == issue.kind).count();
            if kept < Self::SAMPLE_LIMIT {
                self.samples.push(issue);
            }
        }
        let both_missing =
            self.status == StageStatus::MissingInput && other.status == StageStatus::MissingInput;
        self.status = if both_missing {
            StageStatus::MissingInput
        } else {
            StageStatus::Ok
        };
        let (rows_in, rows_out) = (self.rows_in + other.rows_in, self.rows_out + other.rows_out);
        self.finish(rows_in, rows_out);
    }

    /// Sets row counts and derives the final status. A missing input stays
    /// `missing_input`; any dropped row makes the stage `partial`.
    pub fn finish(&mut self, rows_in: usize, rows_out: usize) {
        self.rows_in = rows_in;
        self.rows_out = rows_out;
        if self.status == StageStatus::MissingInput {
            return;
        }
        self.status = if rows_in == 0 {
            StageStatus::EmptyInput
        } else if self.dropped() > 0 {
            StageStatus::Partial
        } else {
            StageStatus::Ok
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_and_caps_samples() {
        let mut report = QaReport::new("seed");
        for idx in 0..8 {
            report.record(QaIssue::new(QaKind::DuplicateKey, "dup").at_row(idx + 1));
        }
        report.record(QaIssue::new(QaKind::IncompleteRow, "no predicted value"));
        assert_eq!(report.count(QaKind::DuplicateKey), 8);
        assert_eq!(report.samples.len(), QaReport::SAMPLE_LIMIT + 1);
        assert_eq!(report.dropped(), 8);
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn absorb_sums_reads() {
        let mut total = QaReport::missing_input("consensus");
        let mut first = QaReport::new("consensus");
        first.record(QaIssue::new(QaKind::OutOfRange, "rank 0"));
        first.finish(10, 9);
        let mut second = QaReport::new("consensus");
        second.finish(5, 5);
        total.absorb(first);
        total.absorb(second);
        assert_eq!((total.rows_in, total.rows_out), (15, 14));
        assert_eq!(total.count(QaKind::OutOfRange), 1);
        assert_eq!(total.status, StageStatus::Partial);

        let mut still_missing = QaReport::missing_input("consensus");
        still_missing.absorb(QaReport::missing_input("consensus"));
        assert_eq!(still_missing.status, StageStatus::MissingInput);
    }

    #[test]
    fn finish_derives_status() {
        let mut clean = QaReport::new("combine");
        clean.finish(10, 10);
        assert_eq!(clean.status, StageStatus::Ok);

        let mut empty = QaReport::new("combine");
        empty.finish(0, 0);
        assert_eq!(empty.status, StageStatus::EmptyInput);

        let mut partial = QaReport::new("combine");
        partial.record(QaIssue::new(QaKind::UnknownPosition, "ATH"));
        partial.finish(10, 9);
        assert_eq!(partial.status, StageStatus::Partial);

        let mut missing = QaReport::missing_input("combine");
        missing.finish(0, 0);
        assert_eq!(missing.status, StageStatus::MissingInput);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&StageStatus::MissingInput).unwrap();
        assert_eq!(json, "\"missing_input\"");
    }
}
