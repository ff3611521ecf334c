//! Historical calibration: grade to success probability.
//!
//! Every labeled row gets a model grade, either a recorded snapshot or a
//! proxy from draft slot and predicted value. A censor-weighted logistic fit
//! maps grade to the three-year success label. Position additives, grade bins
//! and a leave-future-out year backtest are built from the same rows.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{info, info_span};

use draft_model::{
    BacktestRow, CalibrationModel, GradeBin, GradeSnapshot, LabeledOutcome, MetricValue, Position,
    ProxyDerivation, canonical_player_name,
};
use draft_standards::CalibrationSettings;

use crate::consensus::weighted_mean;

/// Pick number used when a row has none (past the last compensatory pick).
pub const UNDRAFTED_PICK: u32 = 262;
const MIN_PROBABILITY: f64 = 0.02;
const MAX_PROBABILITY: f64 = 0.98;

/// One historical player prepared for the fit.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationRow {
    pub draft_year: i32,
    pub player_name: String,
    pub position: Position,
    pub grade: MetricValue,
    pub success: bool,
    pub career_value: f64,
    pub weight: f64,
}

impl CalibrationRow {
    fn label(&self) -> f64 {
        if self.success { 1.0 } else { 0.0 }
    }
}

/// Calibration artifacts for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationOutput {
    pub model: CalibrationModel,
    pub bins: Vec<GradeBin>,
    pub backtest: Vec<BacktestRow>,
}

pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Proxy grade from draft slot and, when the pool has a spread, predicted
/// value. `predicted_range` is the (min, max) predicted value of the pool.
pub fn proxy_grade(
    overall_pick: u32,
    predicted_value: Option<f64>,
    predicted_range: Option<(f64, f64)>,
) -> f64 {
    let pick = if overall_pick == 0 {
        UNDRAFTED_PICK
    } else {
        overall_pick
    };
    let pick_grade = (95.0 - 0.115 * f64::from(pick - 1)).clamp(55.0, 95.0);
    let mut parts = vec![(0.55, pick_grade)];
    if let (Some(value), Some((min, max))) = (predicted_value, predicted_range)
        && max > min
    {
        let pct = ((value - min) / (max - min)).clamp(0.0, 1.0);
        parts.push((0.30, 58.0 + 36.0 * pct));
    }
    weighted_mean(&parts)
        .unwrap_or(pick_grade)
        .clamp(55.0, 95.0)
}

/// Attaches a model grade to each labeled row. Snapshots match on
/// (draft year, canonical name, position).
pub fn calibration_rows(
    labels: &[LabeledOutcome],
    snapshots: &[GradeSnapshot],
) -> Vec<CalibrationRow> {
    let snapshot_grades: HashMap<(i32, String, Position), f64> = snapshots
        .iter()
        .map(|snapshot| {
            (
                (
                    snapshot.draft_year,
                    canonical_player_name(&snapshot.player_name),
                    snapshot.position,
                ),
                snapshot.model_grade,
            )
        })
        .collect();
    let predicted_range = labels
        .iter()
        .filter_map(|row| row.predicted_value)
        .fold(None, |range: Option<(f64, f64)>, value| {
            Some(range.map_or((value, value), |(lo, hi)| (lo.min(value), hi.max(value))))
        });

    labels
        .iter()
        .map(|row| {
            let key = (
                row.draft_year,
                canonical_player_name(&row.player_name),
                row.position,
            );
            let grade = match snapshot_grades.get(&key) {
                Some(grade) => MetricValue::Verified(grade.clamp(55.0, 95.0)),
                None => MetricValue::proxy(
                    proxy_grade(row.overall_pick, row.predicted_value, predicted_range),
                    ProxyDerivation::DraftSlot,
                ),
            };
            CalibrationRow {
                draft_year: row.draft_year,
                player_name: row.player_name.clone(),
                position: row.position,
                grade,
                success: row.success_label_3yr,
                career_value: row.wav,
                weight: row.censor_weight,
            }
        })
        .collect()
}

/// Censor-weighted batch gradient descent for `σ(b0 + b1 * grade)`.
pub fn fit_logistic(rows: &[CalibrationRow], settings: &CalibrationSettings) -> (f64, f64) {
    let mut intercept = settings.initial_intercept;
    let mut slope = settings.initial_slope;
    let total_weight = rows.iter().map(|row| row.weight).sum::<f64>().max(1.0);
    for _ in 0..settings.iterations {
        let mut grad_b = 0.0;
        let mut grad_w = 0.0;
        for row in rows {
            let x = row.grade.value();
            let err = sigmoid(intercept + slope * x) - row.label();
            grad_b += err * row.weight;
            grad_w += err * x * row.weight;
        }
        intercept -= settings.learning_rate * grad_b / total_weight;
        slope -= settings.learning_rate * grad_w / total_weight;
    }
    (intercept, slope)
}

/// Weighted observed minus expected success per position. Positions with
/// fewer than `min_position_rows` rows get zero.
pub fn position_additives(
    rows: &[CalibrationRow],
    intercept: f64,
    slope: f64,
    settings: &CalibrationSettings,
) -> BTreeMap<Position, f64> {
    let mut groups: BTreeMap<Position, Vec<&CalibrationRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.position).or_default().push(row);
    }
    groups
        .into_iter()
        .map(|(position, group)| {
            let weight: f64 = group.iter().map(|row| row.weight).sum();
            if group.len() < settings.min_position_rows || weight <= 0.0 {
                return (position, 0.0);
            }
            let observed = group.iter().map(|row| row.label() * row.weight).sum::<f64>() / weight;
            let expected = group
                .iter()
                .map(|row| sigmoid(intercept + slope * row.grade.value()) * row.weight)
                .sum::<f64>()
                / weight;
            let cap = settings.position_additive_cap;
            (position, (observed - expected).clamp(-cap, cap))
        })
        .collect()
}

/// `total / weight`, or zero when the slice carries no weight.
fn per_weight(total: f64, weight: f64) -> f64 {
    if weight > 0.0 { total / weight } else { 0.0 }
}

/// Splits rows by descending grade into at most `bins` equal slices.
pub fn calibration_bins(rows: &[CalibrationRow], bins: usize) -> Vec<GradeBin> {
    if rows.is_empty() || bins == 0 {
        return Vec::new();
    }
    let mut ordered: Vec<&CalibrationRow> = rows.iter().collect();
    ordered.sort_by(|a, b| b.grade.value().total_cmp(&a.grade.value()));
    let chunk = rows.len().div_ceil(bins);

    ordered
        .chunks(chunk)
        .enumerate()
        .map(|(idx, group)| {
            let weight: f64 = group.iter().map(|row| row.weight).sum();
            let grades = group.iter().map(|row| row.grade.value());
            GradeBin {
                bin: idx as u32 + 1,
                grade_min: grades.clone().fold(f64::INFINITY, f64::min),
                grade_max: grades.fold(f64::NEG_INFINITY, f64::max),
                rows: group.len(),
                weighted_rows: weight,
                hit_rate: per_weight(
                    group.iter().map(|row| row.label() * row.weight).sum(),
                    weight,
                ),
                mean_career_value: per_weight(
                    group.iter().map(|row| row.career_value * row.weight).sum(),
                    weight,
                ),
            }
        })
        .collect()
}

/// Fits on every year before each holdout year and scores the holdout.
/// Years with too few training rows are skipped.
pub fn year_backtest(rows: &[CalibrationRow], settings: &CalibrationSettings) -> Vec<BacktestRow> {
    let years: BTreeSet<i32> = rows.iter().map(|row| row.draft_year).collect();
    let mut out = Vec::new();
    for holdout_year in years {
        let train: Vec<CalibrationRow> = rows
            .iter()
            .filter(|row| row.draft_year < holdout_year)
            .cloned()
            .collect();
        let test: Vec<&CalibrationRow> = rows
            .iter()
            .filter(|row| row.draft_year == holdout_year)
            .collect();
        if train.len() < settings.min_backtest_train_rows || test.is_empty() {
            continue;
        }
        let (intercept, slope) = fit_logistic(&train, settings);
        let additives = position_additives(&train, intercept, slope, settings);

        let weight: f64 = test.iter().map(|row| row.weight).sum();
        let mut brier = 0.0;
        let mut correct = 0.0;
        let mut predicted = 0.0;
        let mut observed = 0.0;
        for row in &test {
            let p = (sigmoid(intercept + slope * row.grade.value())
                + additives.get(&row.position).copied().unwrap_or(0.0))
            .clamp(MIN_PROBABILITY, MAX_PROBABILITY);
            let y = row.label();
            brier += (p - y).powi(2) * row.weight;
            if (p >= 0.5) == row.success {
                correct += row.weight;
            }
            predicted += p * row.weight;
            observed += y * row.weight;
        }
        out.push(BacktestRow {
            holdout_year,
            train_rows: train.len(),
            test_rows: test.len(),
            brier: per_weight(brier, weight),
            accuracy: per_weight(correct, weight),
            mean_predicted: per_weight(predicted, weight),
            observed_rate: per_weight(observed, weight),
        });
    }
    out
}

/// Fits the model and builds bins and the backtest.
pub fn calibrate(
    labels: &[LabeledOutcome],
    snapshots: &[GradeSnapshot],
    settings: &CalibrationSettings,
) -> CalibrationOutput {
    let _span = info_span!("calibrate", labels = labels.len(), snapshots = snapshots.len())
        .entered();
    let rows = calibration_rows(labels, snapshots);
    let (intercept, slope) = fit_logistic(&rows, settings);
    let position_additive = position_additives(&rows, intercept, slope, settings);
    let weighted_sample_size: f64 = rows.iter().map(|row| row.weight).sum();
    let snapshot_grades = rows.iter().filter(|row| row.grade.is_verified()).count();
    let weighted_success_rate = if weighted_sample_size > 0.0 {
        rows.iter().map(|row| row.label() * row.weight).sum::<f64>() / weighted_sample_size
    } else {
        0.0
    };

    let model = CalibrationModel {
        intercept,
        slope,
        position_additive,
        sample_size: rows.len(),
        weighted_sample_size,
        snapshot_grades,
        proxy_grades: rows.len() - snapshot_grades,
        weighted_success_rate,
    };
    let bins = calibration_bins(&rows, settings.bins);
    let backtest = year_backtest(&rows, settings);
    info!(
        rows = rows.len(),
        snapshot_grades,
        intercept,
        slope,
        bins = bins.len(),
        backtest_years = backtest.len(),
        "calibration fit"
    );
    CalibrationOutput {
        model,
        bins,
        backtest,
    }
}

/// Calibrated success probability for a live prospect.
pub fn success_probability(
    model: &CalibrationModel,
    grade: f64,
    position: Position,
    ras: Option<f64>,
) -> f64 {
    let base = sigmoid(model.intercept + model.slope * grade);
    let position_delta = model
        .position_additive
        .get(&position)
        .copied()
        .unwrap_or(0.0);
    let ras_delta = ras.map_or(0.0, |ras| ((ras - 7.0) * 0.015).clamp(-0.04, 0.05));
    (base + position_delta + ras_delta).clamp(MIN_PROBABILITY, MAX_PROBABILITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CalibrationSettings {
        CalibrationSettings {
            initial_intercept: -9.0,
            initial_slope: 0.11,
            iterations: 1500,
            learning_rate: 0.0008,
            min_position_rows: 30,
            position_additive_cap: 0.12,
            bins: 12,
            min_backtest_train_rows: 250,
        }
    }

    fn row(year: i32, position: Position, grade: f64, success: bool, weight: f64) -> CalibrationRow {
        CalibrationRow {
            draft_year: year,
            player_name: format!("{year}-{grade}"),
            position,
            grade: MetricValue::proxy(grade, ProxyDerivation::DraftSlot),
            success,
            career_value: if success { 20.0 } else { 2.0 },
            weight,
        }
    }

    fn synthetic(years: std::ops::RangeInclusive<i32>, per_year: usize) -> Vec<CalibrationRow> {
        let mut rows = Vec::new();
        for year in years {
            for i in 0..per_year {
                let grade = 55.0 + 40.0 * (i as f64) / (per_year as f64);
                rows.push(row(year, Position::ALL[i % 11], grade, grade >= 80.0, 1.0));
            }
        }
        rows
    }

    #[test]
    fn proxy_grade_from_slot() {
        assert!((proxy_grade(1, None, None) - 95.0).abs() < 1e-9);
        assert!((proxy_grade(0, None, None) - 64.985).abs() < 1e-9);
        let with_value = proxy_grade(1, Some(10.0), Some((0.0, 10.0)));
        assert!((with_value - (0.55 * 95.0 + 0.30 * 94.0) / 0.85).abs() < 1e-9);
        assert!((proxy_grade(1, Some(10.0), Some((5.0, 5.0))) - 95.0).abs() < 1e-9);
    }

    #[test]
    fn snapshots_beat_proxies() {
        let mut labeled = LabeledOutcome {
            draft_year: 2019,
            overall_pick: 10,
            draft_round: 1,
            player_name: "Devin White".into(),
            position: Position::Lb,
            school: "LSU".into(),
            wav: 30.0,
            games: 60.0,
            starts: 55.0,
            ap1: 0.0,
            pb: 1.0,
            years_in_career: 6.0,
            to_year: Some(2024),
            predicted_value: Some(25.0),
            success_label_3yr: true,
            starter_label_3yr: true,
            ceiling_label: false,
            starter_seasons_proxy: 4,
            second_contract_proxy: true,
            surplus_value: Some(5.0),
            censor_weight: 0.85,
        };
        let snapshot = GradeSnapshot {
            draft_year: 2019,
            player_name: "devin white".into(),
            position: Position::Lb,
            model_grade: 91.5,
        };
        let rows = calibration_rows(std::slice::from_ref(&labeled), &[snapshot]);
        assert_eq!(rows[0].grade, MetricValue::Verified(91.5));
        assert_eq!(rows[0].weight, 0.85);

        labeled.player_name = "Someone Else".into();
        let rows = calibration_rows(&[labeled], &[]);
        assert!(!rows[0].grade.is_verified());
    }

    #[test]
    fn fit_orders_probabilities_by_grade() {
        let rows = synthetic(2015..=2016, 200);
        let (b0, b1) = fit_logistic(&rows, &settings());
        assert!(b1 > 0.0);
        assert!(sigmoid(b0 + b1 * 90.0) > sigmoid(b0 + b1 * 60.0));
    }

    #[test]
    fn small_positions_get_no_additive() {
        let rows = vec![row(2018, Position::Qb, 90.0, false, 1.0); 5];
        let additives = position_additives(&rows, -9.0, 0.11, &settings());
        assert_eq!(additives.get(&Position::Qb), Some(&0.0));

        let rows = vec![row(2018, Position::Qb, 60.0, true, 1.0); 40];
        let additives = position_additives(&rows, -9.0, 0.11, &settings());
        assert_eq!(additives.get(&Position::Qb), Some(&0.12));
    }

    #[test]
    fn bins_cover_all_rows_in_descending_order() {
        let rows = synthetic(2018..=2018, 50);
        let bins = calibration_bins(&rows, 12);
        assert!(bins.len() <= 12);
        assert_eq!(bins.iter().map(|bin| bin.rows).sum::<usize>(), 50);
        assert!(bins.windows(2).all(|w| w[0].grade_min >= w[1].grade_max));
        assert_eq!(bins[0].bin, 1);
        assert_eq!(bins[0].hit_rate, 1.0);
    }

    #[test]
    fn censored_bins_keep_true_rates() {
        let rows: Vec<CalibrationRow> = [88.0, 86.0, 84.0]
            .into_iter()
            .map(|grade| row(2023, Position::Wr, grade, true, 0.15))
            .collect();
        let bins = calibration_bins(&rows, 1);
        assert_eq!(bins.len(), 1);
        assert!((bins[0].weighted_rows - 0.45).abs() < 1e-12);
        assert!((bins[0].hit_rate - 1.0).abs() < 1e-12);
        assert!((bins[0].mean_career_value - 20.0).abs() < 1e-12);

        let weightless = vec![row(2024, Position::Wr, 80.0, true, 0.0)];
        let bins = calibration_bins(&weightless, 1);
        assert_eq!(bins[0].hit_rate, 0.0);
        assert_eq!(bins[0].mean_career_value, 0.0);
    }

    #[test]
    fn censored_holdout_year_is_not_diluted() {
        let mut rows = synthetic(2015..=2017, 100);
        rows.extend(
            [88.0, 86.0, 84.0]
                .into_iter()
                .map(|grade| row(2023, Position::Wr, grade, true, 0.15)),
        );
        let backtest = year_backtest(&rows, &settings());
        let holdout = backtest
            .iter()
            .find(|row| row.holdout_year == 2023)
            .expect("2023 holdout");
        assert_eq!(holdout.test_rows, 3);
        assert!((holdout.observed_rate - 1.0).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&holdout.mean_predicted));
    }

    #[test]
    fn backtest_needs_enough_training_rows() {
        let rows = synthetic(2015..=2018, 100);
        let backtest = year_backtest(&rows, &settings());
        let years: Vec<i32> = backtest.iter().map(|row| row.holdout_year).collect();
        assert_eq!(years, vec![2018]);
        assert_eq!(backtest[0].train_rows, 300);
        assert!((0.0..=1.0).contains(&backtest[0].brier));
        assert!((backtest[0].observed_rate - 0.37).abs() < 1e-9);
    }

    #[test]
    fn live_probability_is_clamped() {
        let model = CalibrationModel {
            intercept: -9.0,
            slope: 0.11,
            position_additive: BTreeMap::from([(Position::Cb, 0.05)]),
            sample_size: 1,
            weighted_sample_size: 1.0,
            snapshot_grades: 0,
            proxy_grades: 1,
            weighted_success_rate: 0.5,
        };
        let base = sigmoid(-9.0 + 0.11 * 85.0);
        let p = success_probability(&model, 85.0, Position::Cb, Some(9.0));
        assert!((p - (base + 0.05 + 0.03)).abs() < 1e-12);
        assert_eq!(success_probability(&model, 200.0, Position::Cb, Some(10.0)), 0.98);
        assert_eq!(success_probability(&model, 0.0, Position::Qb, None), 0.02);
    }
}
