//! Surplus-value priors by position and pick band.

use std::collections::BTreeMap;

use tracing::{debug, info_span};

use draft_model::{LabeledOutcome, PickBand, Position, RoiPrior};

const Z_WEIGHT: f64 = 0.25;
const MAX_ADJUSTMENT: f64 = 0.6;

#[derive(Debug, Default)]
struct Cell {
    rows: usize,
    weight: f64,
    surplus: f64,
    successes: f64,
}

/// Builds one prior per (position, pick band) present in the labels,
/// ordered by band then position.
///
/// Surplus z-scores compare positions within the same band.
pub fn build_roi_priors(labels: &[LabeledOutcome]) -> Vec<RoiPrior> {
    let _span = info_span!("roi_priors", rows = labels.len()).entered();
    let mut cells: BTreeMap<(PickBand, Position), Cell> = BTreeMap::new();
    for row in labels {
        let cell = cells
            .entry((PickBand::from_round(row.draft_round), row.position))
            .or_default();
        let weight = row.censor_weight;
        cell.rows += 1;
        cell.weight += weight;
        cell.surplus += row.surplus_value.unwrap_or(0.0) * weight;
        if row.success_label_3yr {
            cell.successes += weight;
        }
    }

    let mut priors: Vec<RoiPrior> = cells
        .into_iter()
        .map(|((pick_band, position), cell)| {
            let (mean_surplus, success_rate) = if cell.weight > 0.0 {
                (cell.surplus / cell.weight, cell.successes / cell.weight)
            } else {
                (0.0, 0.0)
            };
            RoiPrior {
                position,
                pick_band,
                rows: cell.rows,
                weighted_rows: cell.weight,
                mean_surplus,
                success_rate,
                surplus_z: 0.0,
                roi_grade_adjustment: 0.0,
            }
        })
        .collect();

    for band in PickBand::ALL {
        let surpluses: Vec<f64> = priors
            .iter()
            .filter(|prior| prior.pick_band == band)
            .map(|prior| prior.mean_surplus)
            .collect();
        if surpluses.is_empty() {
            continue;
        }
        let n = surpluses.len() as f64;
        let mean = surpluses.iter().sum::<f64>() / n;
        let std = (surpluses.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n).sqrt();
        for prior in priors.iter_mut().filter(|prior| prior.pick_band == band) {
            let z = if std > 1e-9 {
                (prior.mean_surplus - mean) / std
            } else {
                0.0
            };
            prior.surplus_z = z;
            prior.roi_grade_adjustment = (Z_WEIGHT * z).clamp(-MAX_ADJUSTMENT, MAX_ADJUSTMENT);
        }
    }
    debug!(cells = priors.len(), "roi priors built");
    priors
}

/// Pick band implied by a round projection label such as `Round 2-3`.
/// The earliest round named wins; `UDFA` and unknown labels are R5+.
pub fn pick_band_for_projection(label: &str) -> PickBand {
    label
        .trim()
        .strip_prefix("Round")
        .and_then(|rest| {
            let digits: String = rest
                .trim()
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            digits.parse::<u32>().ok()
        })
        .map_or(PickBand::R5Plus, PickBand::from_round)
}

/// ROI adjustment for a position and band, zero when no prior exists.
pub fn roi_adjustment(priors: &[RoiPrior], position: Position, band: PickBand) -> f64 {
    priors
        .iter()
        .find(|prior| prior.position == position && prior.pick_band == band)
        .map_or(0.0, |prior| prior.roi_grade_adjustment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(round: u32, position: Position, surplus: Option<f64>, success: bool) -> LabeledOutcome {
        LabeledOutcome {
            draft_year: 2017,
            overall_pick: round * 32,
            draft_round: round,
            player_name: "P".into(),
            position,
            school: "S".into(),
            wav: 10.0,
            games: 40.0,
            starts: 20.0,
            ap1: 0.0,
            pb: 0.0,
            years_in_career: 5.0,
            to_year: Some(2022),
            predicted_value: Some(8.0),
            success_label_3yr: success,
            starter_label_3yr: true,
            ceiling_label: false,
            starter_seasons_proxy: 2,
            second_contract_proxy: true,
            surplus_value: surplus,
            censor_weight: 1.0,
        }
    }

    #[test]
    fn z_scores_within_band() {
        let labels = vec![
            label(1, Position::Qb, Some(10.0), true),
            label(1, Position::Rb, Some(-10.0), false),
            label(3, Position::Cb, Some(4.0), true),
            label(3, Position::Cb, None, false),
        ];
        let priors = build_roi_priors(&labels);
        assert_eq!(priors.len(), 3);
        assert_eq!(priors[0].pick_band, PickBand::R1);
        assert_eq!(priors[0].position, Position::Qb);
        assert_eq!(priors[0].surplus_z, 1.0);
        assert_eq!(priors[0].roi_grade_adjustment, 0.25);
        assert_eq!(priors[1].roi_grade_adjustment, -0.25);

        let cb = &priors[2];
        assert_eq!(cb.rows, 2);
        assert_eq!(cb.mean_surplus, 2.0);
        assert_eq!(cb.success_rate, 0.5);
        assert_eq!(cb.surplus_z, 0.0);
    }

    #[test]
    fn projection_labels_map_to_bands() {
        assert_eq!(pick_band_for_projection("Round 1"), PickBand::R1);
        assert_eq!(pick_band_for_projection("Round 2-3"), PickBand::R2);
        assert_eq!(pick_band_for_projection("Round 6-7"), PickBand::R5Plus);
        assert_eq!(pick_band_for_projection("UDFA"), PickBand::R5Plus);
    }

    #[test]
    fn missing_prior_is_neutral() {
        let priors = build_roi_priors(&[label(2, Position::S, Some(3.0), true)]);
        assert_eq!(roi_adjustment(&priors, Position::S, PickBand::R2), 0.0);
        assert_eq!(roi_adjustment(&priors, Position::Lb, PickBand::R2), 0.0);
    }
}
