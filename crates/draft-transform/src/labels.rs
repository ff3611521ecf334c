//! Historical outcome labels and censor weights.
//!
//! Recent draft classes have not finished their rookie contracts, so their
//! outcomes are down-weighted by a step table keyed on draft year. The weight
//! multiplies every aggregate built from labels.

use std::collections::{BTreeMap, HashSet};

use tracing::{info, info_span};

use draft_model::{
    HistoricalRecord, LabeledOutcome, Position, PositionAliases, QaIssue, QaKind, QaReport,
    canonical_player_name,
};
use draft_standards::{CensorTable, LabelThresholds};

pub const STAGE: &str = "label";

/// Censor weight for a draft year. Pure function of the year.
pub fn censor_weight(draft_year: i32, table: &CensorTable) -> f64 {
    if draft_year >= table.immature_from {
        return table.immature_weight;
    }
    table
        .steps
        .iter()
        .rev()
        .find(|step| step.year <= draft_year)
        .map_or(table.default_weight, |step| step.weight)
}

/// Derives labels for one historical row.
pub fn label_outcome(
    record: &HistoricalRecord,
    position: Position,
    draft_year: i32,
    thresholds: &LabelThresholds,
    censor: &CensorTable,
) -> LabeledOutcome {
    let success_label_3yr = record.wav >= thresholds.success_wav
        || record.games >= thresholds.success_games
        || record.ap1 + record.pb >= thresholds.success_honors;
    let starter_label_3yr =
        record.starts >= thresholds.starter_starts || record.games >= thresholds.starter_games;
    let ceiling_label = record.ap1 >= thresholds.ceiling_ap1 || record.pb >= thresholds.ceiling_pb;
    let starter_seasons = (record.starts / 10.0).max(record.games / 16.0 * 0.45);
    let starter_seasons_proxy = starter_seasons.round_ties_even().clamp(0.0, 10.0) as u32;
    let second_contract_proxy = record.years_in_career
        >= f64::from(thresholds.second_contract_years)
        || record
            .to_year
            .is_some_and(|to_year| to_year >= draft_year + thresholds.second_contract_span);

    LabeledOutcome {
        draft_year,
        overall_pick: record.overall_pick,
        draft_round: record.draft_round,
        player_name: record.player_name.clone(),
        position,
        school: record.school.clone(),
        wav: record.wav,
        games: record.games,
        starts: record.starts,
        ap1: record.ap1,
        pb: record.pb,
        years_in_career: record.years_in_career,
        to_year: record.to_year,
        predicted_value: record.predicted_value,
        success_label_3yr,
        starter_label_3yr,
        ceiling_label,
        starter_seasons_proxy,
        second_contract_proxy,
        surplus_value: record.predicted_value.map(|predicted| record.wav - predicted),
        censor_weight: censor_weight(draft_year, censor),
    }
}

/// Labels every historical row.
///
/// Unmapped positions, missing draft years and duplicate (year, canonical
/// name) keys are dropped. A missing predicted value keeps the row with no
/// surplus and counts as a warning. Output is sorted by (draft_year,
/// overall_pick).
pub fn build_labels(
    records: &[HistoricalRecord],
    aliases: &PositionAliases,
    thresholds: &LabelThresholds,
    censor: &CensorTable,
) -> (Vec<LabeledOutcome>, QaReport) {
    let _span = info_span!("label", rows = records.len()).entered();
    let mut qa = QaReport::new(STAGE);
    let mut seen = HashSet::new();
    let mut labeled = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        let row = idx + 1;
        let position = match aliases.resolve(&record.position_raw) {
            Ok(position) => position,
            Err(error) => {
                qa.record(
                    QaIssue::new(QaKind::UnknownPosition, error.to_string())
                        .at_row(row)
                        .on_field("position"),
                );
                continue;
            }
        };
        let Some(draft_year) = record.draft_year else {
            qa.record(
                QaIssue::new(
                    QaKind::MissingValue,
                    format!("{} has no draft year", record.player_name),
                )
                .at_row(row)
                .on_field("draft_year"),
            );
            continue;
        };
        if !seen.insert((draft_year, canonical_player_name(&record.player_name))) {
            qa.record(
                QaIssue::new(
                    QaKind::DuplicateKey,
                    format!("{} listed twice in {draft_year}", record.player_name),
                )
                .at_row(row),
            );
            continue;
        }
        if record.predicted_value.is_none() {
            qa.record(
                QaIssue::new(
                    QaKind::IncompleteRow,
                    format!("{} has no predicted value", record.player_name),
                )
                .at_row(row)
                .on_field("predicted_value"),
            );
        }
        labeled.push(label_outcome(record, position, draft_year, thresholds, censor));
    }

    labeled.sort_by(|a, b| {
        a.draft_year
            .cmp(&b.draft_year)
            .then_with(|| a.overall_pick.cmp(&b.overall_pick))
    });
    qa.finish(records.len(), labeled.len());
    info!(
        rows = labeled.len(),
        dropped = qa.dropped(),
        warnings = qa.warning_count(),
        status = %qa.status,
        "historical rows labeled"
    );
    (labeled, qa)
}

/// Unweighted and censor-weighted rate of one label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRate {
    pub label: &'static str,
    pub unweighted: f64,
    pub weighted: f64,
}

/// Rows and censor weight for one draft year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearWeight {
    pub draft_year: i32,
    pub rows: usize,
    pub censor_weight: f64,
}

/// Aggregate label statistics for the label report.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSummary {
    pub rows: usize,
    pub weighted_rows: f64,
    pub rates: Vec<LabelRate>,
    pub years: Vec<YearWeight>,
}

pub fn summarize_labels(rows: &[LabeledOutcome]) -> LabelSummary {
    let weighted_rows: f64 = rows.iter().map(|r| r.censor_weight).sum();
    let rate = |label: &'static str, flag: fn(&LabeledOutcome) -> bool| {
        let hits = rows.iter().filter(|r| flag(r)).count();
        let weighted_hits: f64 = rows
            .iter()
            .filter(|r| flag(r))
            .map(|r| r.censor_weight)
            .sum();
        LabelRate {
            label,
            unweighted: ratio(hits as f64, rows.len() as f64),
            weighted: ratio(weighted_hits, weighted_rows),
        }
    };
    let rates = vec![
        rate("success_label_3yr", |r| r.success_label_3yr),
        rate("starter_label_3yr", |r| r.starter_label_3yr),
        rate("ceiling_label", |r| r.ceiling_label),
        rate("second_contract_proxy", |r| r.second_contract_proxy),
    ];

    let mut by_year: BTreeMap<i32, YearWeight> = BTreeMap::new();
    for row in rows {
        by_year
            .entry(row.draft_year)
            .or_insert(YearWeight {
                draft_year: row.draft_year,
                rows: 0,
                censor_weight: row.censor_weight,
            })
            .rows += 1;
    }

    LabelSummary {
        rows: rows.len(),
        weighted_rows,
        rates,
        years: by_year.into_values().collect(),
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draft_standards::CensorStep;

    fn thresholds() -> LabelThresholds {
        LabelThresholds {
            success_wav: 10.0,
            success_games: 32.0,
            success_honors: 1.0,
            starter_starts: 2.0,
            starter_games: 40.0,
            ceiling_ap1: 1.0,
            ceiling_pb: 2.0,
            second_contract_years: 5,
            second_contract_span: 4,
        }
    }

    fn censor() -> CensorTable {
        let steps = [
            (2015, 1.0),
            (2019, 0.85),
            (2020, 0.70),
            (2021, 0.50),
            (2022, 0.30),
            (2023, 0.15),
        ]
        .into_iter()
        .map(|(year, weight)| CensorStep { year, weight })
        .collect();
        CensorTable {
            default_weight: 1.0,
            immature_from: 2024,
            immature_weight: 0.20,
            steps,
        }
    }

    fn record(wav: f64, games: f64, ap1: f64, pb: f64) -> HistoricalRecord {
        HistoricalRecord {
            draft_year: Some(2019),
            overall_pick: 20,
            draft_round: 1,
            player_name: "Test Player".into(),
            position_raw: "WR".into(),
            school: "Ohio State".into(),
            wav,
            games,
            starts: 0.0,
            ap1,
            pb,
            years_in_career: 3.0,
            to_year: Some(2021),
            predicted_value: Some(18.0),
        }
    }

    #[test]
    fn success_from_pro_bowl_even_with_low_counts() {
        let labeled = label_outcome(
            &record(12.0, 40.0, 0.0, 1.0),
            Position::Wr,
            2019,
            &thresholds(),
            &censor(),
        );
        assert!(labeled.success_label_3yr);
        assert!(labeled.starter_label_3yr);
        assert!(!labeled.ceiling_label);
    }

    #[test]
    fn low_usage_is_not_success() {
        let labeled = label_outcome(
            &record(5.0, 10.0, 0.0, 0.0),
            Position::Wr,
            2019,
            &thresholds(),
            &censor(),
        );
        assert!(!labeled.success_label_3yr);
        assert!(!labeled.starter_label_3yr);
        assert!(!labeled.second_contract_proxy);
    }

    #[test]
    fn censor_steps() {
        let table = censor();
        let expected = [
            (2010, 1.0),
            (2015, 1.0),
            (2018, 1.0),
            (2019, 0.85),
            (2020, 0.70),
            (2021, 0.50),
            (2022, 0.30),
            (2023, 0.15),
            (2024, 0.20),
            (2026, 0.20),
        ];
        for (year, weight) in expected {
            assert_eq!(censor_weight(year, &table), weight, "year {year}");
        }
    }

    #[test]
    fn surplus_is_exact_difference() {
        let mut raw = record(23.5, 50.0, 0.0, 0.0);
        raw.predicted_value = Some(11.25);
        let labeled = label_outcome(&raw, Position::Wr, 2019, &thresholds(), &censor());
        assert_eq!(labeled.surplus_value, Some(12.25));

        raw.predicted_value = None;
        let labeled = label_outcome(&raw, Position::Wr, 2019, &thresholds(), &censor());
        assert_eq!(labeled.surplus_value, None);
    }

    #[test]
    fn starter_seasons_proxy_is_clamped() {
        let mut raw = record(80.0, 200.0, 0.0, 0.0);
        raw.starts = 150.0;
        let labeled = label_outcome(&raw, Position::Wr, 2015, &thresholds(), &censor());
        assert_eq!(labeled.starter_seasons_proxy, 10);

        let mut raw = record(3.0, 16.0, 0.0, 0.0);
        raw.starts = 4.0;
        let labeled = label_outcome(&raw, Position::Wr, 2015, &thresholds(), &censor());
        assert_eq!(labeled.starter_seasons_proxy, 0);
    }

    #[test]
    fn starter_seasons_half_rounds_to_even() {
        let mut raw = record(20.0, 0.0, 0.0, 0.0);
        raw.starts = 25.0;
        let labeled = label_outcome(&raw, Position::Wr, 2015, &thresholds(), &censor());
        assert_eq!(labeled.starter_seasons_proxy, 2);

        raw.starts = 35.0;
        let labeled = label_outcome(&raw, Position::Wr, 2015, &thresholds(), &censor());
        assert_eq!(labeled.starter_seasons_proxy, 4);
    }

    #[test]
    fn build_drops_and_sorts() {
        let mut late = record(5.0, 10.0, 0.0, 0.0);
        late.overall_pick = 90;
        let mut early = record(5.0, 10.0, 0.0, 0.0);
        early.player_name = "Other Player".into();
        early.overall_pick = 3;
        early.predicted_value = None;
        let mut no_year = record(5.0, 10.0, 0.0, 0.0);
        no_year.player_name = "No Year".into();
        no_year.draft_year = None;
        let mut unknown = record(5.0, 10.0, 0.0, 0.0);
        unknown.player_name = "Athlete".into();
        unknown.position_raw = "ATH".into();
        let dup = late.clone();

        let (rows, qa) = build_labels(
            &[late, early, no_year, unknown, dup],
            &PositionAliases::identity(),
            &thresholds(),
            &censor(),
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].overall_pick, 3);
        assert_eq!(rows[0].surplus_value, None);
        assert_eq!(qa.count(QaKind::MissingValue), 1);
        assert_eq!(qa.count(QaKind::UnknownPosition), 1);
        assert_eq!(qa.count(QaKind::DuplicateKey), 1);
        assert_eq!(qa.count(QaKind::IncompleteRow), 1);
        assert_eq!(qa.dropped(), 3);
    }

    #[test]
    fn summary_weights_rates() {
        let thresholds = thresholds();
        let table = censor();
        let hit = label_outcome(
            &record(12.0, 40.0, 0.0, 1.0),
            Position::Wr,
            2018,
            &thresholds,
            &table,
        );
        let miss = label_outcome(
            &record(1.0, 2.0, 0.0, 0.0),
            Position::Wr,
            2023,
            &thresholds,
            &table,
        );
        let summary = summarize_labels(&[hit, miss]);
        assert_eq!(summary.rows, 2);
        assert!((summary.weighted_rows - 1.15).abs() < 1e-12);
        assert_eq!(summary.rates[0].unweighted, 0.5);
        assert!((summary.rates[0].weighted - 1.0 / 1.15).abs() < 1e-12);
        assert_eq!(summary.years.len(), 2);
        assert_eq!(summary.years[1].censor_weight, 0.15);
    }
}
