//! Plausibility ranges for combine measurements.
//!
//! Values outside a range are almost always unit or entry mistakes (a forty
//! typed as 45.5, height in centimetres). Such rows are excluded from the
//! combine table and counted as `out_of_range`.

use tracing::warn;

use draft_model::{CombineRecord, QaIssue, QaKind, QaReport};

/// Inclusive plausible range for one measurement column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurableRange {
    pub column: &'static str,
    pub min: f64,
    pub max: f64,
}

impl MeasurableRange {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const RANGES: &[MeasurableRange] = &[
    MeasurableRange { column: "height_in", min: 64.0, max: 84.0 },
    MeasurableRange { column: "weight_lb", min: 150.0, max: 400.0 },
    MeasurableRange { column: "forty", min: 4.0, max: 6.0 },
    MeasurableRange { column: "ten_split", min: 1.3, max: 2.1 },
    MeasurableRange { column: "vertical", min: 15.0, max: 50.0 },
    MeasurableRange { column: "broad", min: 80.0, max: 150.0 },
    MeasurableRange { column: "shuttle", min: 3.7, max: 5.5 },
    MeasurableRange { column: "three_cone", min: 6.3, max: 8.5 },
    MeasurableRange { column: "bench", min: 0.0, max: 55.0 },
    MeasurableRange { column: "ras_official", min: 0.0, max: 10.0 },
];

pub fn range_for(column: &str) -> Option<&'static MeasurableRange> {
    RANGES
        .iter()
        .find(|range| range.column.eq_ignore_ascii_case(column))
}

fn measured(record: &CombineRecord, column: &str) -> Option<f64> {
    match column {
        "height_in" => record.height_in,
        "weight_lb" => record.weight_lb,
        "forty" => record.forty,
        "ten_split" => record.ten_split,
        "vertical" => record.vertical,
        "broad" => record.broad,
        "shuttle" => record.shuttle,
        "three_cone" => record.three_cone,
        "bench" => record.bench,
        "ras_official" => record.ras_official,
        _ => None,
    }
}

/// Columns of `record` holding an implausible value, as `column value`.
fn out_of_range(record: &CombineRecord) -> Vec<String> {
    RANGES
        .iter()
        .filter_map(|range| {
            measured(record, range.column)
                .filter(|value| !range.contains(*value))
                .map(|value| {
                    format!("{} {value} outside {}-{}", range.column, range.min, range.max)
                })
        })
        .collect()
}

/// Drops rows carrying any implausible measurement. Each dropped row is one
/// `out_of_range` issue listing every offending column; `qa.rows_out` is
/// updated to the surviving count.
///
/// Returns the number of rows dropped.
pub fn scrub_combine(records: &mut Vec<CombineRecord>, qa: &mut QaReport) -> usize {
    let before = records.len();
    let mut idx = 0;
    records.retain(|record| {
        idx += 1;
        let problems = out_of_range(record);
        if problems.is_empty() {
            return true;
        }
        qa.record(
            QaIssue::new(
                QaKind::OutOfRange,
                format!("{}: {}", record.player_name, problems.join("; ")),
            )
            .at_row(idx),
        );
        false
    });
    let dropped = before - records.len();
    if dropped > 0 {
        qa.finish(qa.rows_in, records.len());
        warn!(dropped, "combine rows with implausible values dropped");
    }
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, forty: f64, vertical: f64) -> CombineRecord {
        CombineRecord {
            player_name: name.into(),
            height_in: Some(76.0),
            weight_lb: Some(219.0),
            forty: Some(forty),
            vertical: Some(vertical),
            ..CombineRecord::default()
        }
    }

    #[test]
    fn drops_rows_with_out_of_range_values() {
        let mut records = vec![
            record("Tetairoa McMillan", 45.3, 32.5),
            record("Luther Burden", 4.41, 41.0),
        ];
        let mut qa = QaReport::new("combine");
        qa.finish(2, 2);
        assert_eq!(scrub_combine(&mut records, &mut qa), 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].player_name, "Luther Burden");
        assert_eq!(records[0].forty, Some(4.41));
        assert_eq!(qa.count(QaKind::OutOfRange), 1);
        assert_eq!(qa.count(QaKind::IncompleteRow), 0);
        assert_eq!(qa.dropped(), 1);
        assert_eq!(qa.rows_out, 1);
        assert_eq!(qa.status, draft_model::StageStatus::Partial);
    }

    #[test]
    fn one_issue_per_row_even_with_several_bad_columns() {
        let mut records = vec![record("Tetairoa McMillan", 45.3, 325.0)];
        let mut qa = QaReport::new("combine");
        qa.finish(1, 1);
        assert_eq!(scrub_combine(&mut records, &mut qa), 1);
        assert!(records.is_empty());
        assert_eq!(qa.count(QaKind::OutOfRange), 1);
        assert_eq!(qa.rows_out, 0);
    }

    #[test]
    fn plausible_rows_leave_the_report_untouched() {
        let mut records = vec![record("Luther Burden", 4.41, 41.0)];
        let mut qa = QaReport::new("combine");
        qa.finish(1, 1);
        assert_eq!(scrub_combine(&mut records, &mut qa), 0);
        assert_eq!(records.len(), 1);
        assert!(!qa.has_issues());
        assert_eq!(qa.status, draft_model::StageStatus::Ok);
    }

    #[test]
    fn every_range_reads_a_record_column() {
        let record = CombineRecord {
            height_in: Some(1.0),
            weight_lb: Some(1.0),
            forty: Some(1.0),
            ten_split: Some(1.0),
            vertical: Some(1.0),
            broad: Some(1.0),
            shuttle: Some(1.0),
            three_cone: Some(1.0),
            bench: Some(1.0),
            ras_official: Some(1.0),
            ..CombineRecord::default()
        };
        for range in RANGES {
            assert!(measured(&record, range.column).is_some(), "{}", range.column);
            assert!(range.min < range.max);
        }
        assert_eq!(range_for("FORTY").map(|r| r.max), Some(6.0));
    }
}
