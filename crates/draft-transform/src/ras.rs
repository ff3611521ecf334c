//! Relative athletic score: official, combine-derived or estimated.
//!
//! Drills are scored against per-position baselines on a 0-10 scale. Lower is
//! better for timed drills. A combine RAS needs at least
//! [`MIN_COMBINE_WEIGHT`] of drill and size weight, otherwise the profile
//! estimate is used.

use draft_model::{CombineRecord, MetricValue, Position, ProxyDerivation};

pub const MIN_COMBINE_WEIGHT: f64 = 0.35;
const SIZE_COMPONENT_WEIGHT: f64 = 0.18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Lower,
    Higher,
}

#[derive(Debug, Clone, Copy)]
struct Baseline {
    mean: f64,
    stdev: f64,
    direction: Direction,
}

const fn lower(mean: f64, stdev: f64) -> Baseline {
    Baseline {
        mean,
        stdev,
        direction: Direction::Lower,
    }
}

const fn higher(mean: f64, stdev: f64) -> Baseline {
    Baseline {
        mean,
        stdev,
        direction: Direction::Higher,
    }
}

/// Baselines in drill order: forty, ten split, vertical, broad, shuttle,
/// three-cone, bench.
#[rustfmt::skip]
fn baselines(position: Position) -> [Baseline; 7] {
    match position {
        Position::Qb => [lower(4.76, 0.13), lower(1.63, 0.07), higher(33.5, 3.8), higher(117.0, 8.0), lower(4.35, 0.17), lower(7.15, 0.20), higher(13.0, 4.0)],
        Position::Rb => [lower(4.53, 0.10), lower(1.55, 0.05), higher(35.5, 3.5), higher(122.0, 7.0), lower(4.20, 0.15), lower(7.00, 0.18), higher(18.0, 4.0)],
        Position::Wr => [lower(4.49, 0.09), lower(1.53, 0.05), higher(36.0, 3.6), higher(124.0, 7.5), lower(4.18, 0.14), lower(6.95, 0.17), higher(14.0, 4.0)],
        Position::Te => [lower(4.69, 0.10), lower(1.61, 0.06), higher(34.0, 3.5), higher(121.0, 7.0), lower(4.35, 0.16), lower(7.10, 0.18), higher(20.0, 4.0)],
        Position::Ot => [lower(5.14, 0.12), lower(1.78, 0.07), higher(29.0, 3.0), higher(105.0, 7.0), lower(4.73, 0.17), lower(7.80, 0.22), higher(24.0, 5.0)],
        Position::Iol => [lower(5.18, 0.13), lower(1.79, 0.07), higher(28.5, 2.8), higher(103.0, 6.5), lower(4.75, 0.18), lower(7.85, 0.22), higher(26.0, 5.0)],
        Position::Edge => [lower(4.70, 0.10), lower(1.62, 0.06), higher(34.0, 3.3), higher(118.0, 7.0), lower(4.35, 0.16), lower(7.20, 0.20), higher(22.0, 5.0)],
        Position::Dt => [lower(4.95, 0.12), lower(1.72, 0.07), higher(31.0, 3.2), higher(111.0, 7.0), lower(4.55, 0.17), lower(7.55, 0.21), higher(25.0, 5.0)],
        Position::Lb => [lower(4.64, 0.10), lower(1.59, 0.06), higher(34.5, 3.3), higher(120.0, 7.0), lower(4.28, 0.15), lower(7.12, 0.19), higher(21.0, 4.5)],
        Position::Cb => [lower(4.47, 0.09), lower(1.53, 0.05), higher(36.5, 3.5), higher(124.0, 7.0), lower(4.15, 0.14), lower(6.90, 0.17), higher(13.0, 4.0)],
        Position::S => [lower(4.53, 0.09), lower(1.55, 0.05), higher(35.5, 3.3), higher(122.0, 7.0), lower(4.20, 0.14), lower(6.98, 0.18), higher(15.0, 4.0)],
    }
}

const DRILL_WEIGHTS: [f64; 7] = [0.20, 0.08, 0.12, 0.10, 0.12, 0.12, 0.08];

/// Ideal (height, weight) frame per position for the size component.
fn size_target(position: Position) -> (f64, f64) {
    match position {
        Position::Qb => (76.0, 220.0),
        Position::Rb => (71.0, 210.0),
        Position::Wr => (73.0, 200.0),
        Position::Te => (77.0, 250.0),
        Position::Ot => (78.0, 315.0),
        Position::Iol => (75.0, 310.0),
        Position::Edge => (76.0, 260.0),
        Position::Dt => (75.0, 305.0),
        Position::Lb => (74.0, 235.0),
        Position::Cb => (71.0, 190.0),
        Position::S => (72.0, 205.0),
    }
}

fn drill_score(value: f64, baseline: Baseline) -> f64 {
    let spread = baseline.stdev.max(1e-6);
    let z = match baseline.direction {
        Direction::Lower => (baseline.mean - value) / spread,
        Direction::Higher => (value - baseline.mean) / spread,
    };
    (5.0 + 1.7 * z).clamp(0.5, 9.95)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Tier label for a RAS value.
pub fn ras_tier(ras: f64) -> &'static str {
    if ras >= 9.0 {
        "elite"
    } else if ras >= 8.0 {
        "great"
    } else if ras >= 7.0 {
        "good"
    } else if ras >= 6.0 {
        "average"
    } else {
        "below_average"
    }
}

/// Combine-derived RAS, or `None` when too little was tested.
pub fn combine_ras(position: Position, combine: &CombineRecord) -> Option<f64> {
    let drills = [
        combine.forty,
        combine.ten_split,
        combine.vertical,
        combine.broad,
        combine.shuttle,
        combine.three_cone,
        combine.bench,
    ];
    let mut weighted = 0.0;
    let mut weight_used = 0.0;
    for ((value, baseline), weight) in drills
        .into_iter()
        .zip(baselines(position))
        .zip(DRILL_WEIGHTS)
    {
        if let Some(value) = value {
            weighted += drill_score(value, baseline) * weight;
            weight_used += weight;
        }
    }

    if let (Some(height), Some(weight)) = (combine.height_in, combine.weight_lb) {
        let (target_h, target_w) = size_target(position);
        let size = (10.0
            - ((height - target_h).abs() / 8.0) * 3.6
            - ((weight - target_w).abs() / 70.0) * 3.4)
            .clamp(2.0, 10.0);
        weighted += size * SIZE_COMPONENT_WEIGHT;
        weight_used += SIZE_COMPONENT_WEIGHT;
    }

    if weight_used < MIN_COMBINE_WEIGHT {
        return None;
    }
    Some(round2((weighted / weight_used).clamp(0.0, 10.0)))
}

/// Profile estimate from frame, athletic score and seed rank. A missing
/// measurement is taken at the position's target frame.
pub fn estimate_ras(
    position: Position,
    height_in: Option<f64>,
    weight_lb: Option<f64>,
    athletic_score: f64,
    rank_seed: u32,
) -> f64 {
    let (target_h, target_w) = size_target(position);
    let height_in = height_in.unwrap_or(target_h);
    let weight_lb = weight_lb.unwrap_or(target_w);
    let size = (10.0
        - ((height_in - target_h).abs() / 8.0) * 3.5
        - ((weight_lb - target_w).abs() / 70.0) * 3.5)
        .clamp(2.0, 10.0);
    let athletic = ((athletic_score - 60.0) / 35.0 * 10.0).clamp(0.0, 10.0);
    let consensus = ((301.0 - f64::from(rank_seed)) / 300.0 * 10.0).clamp(0.0, 10.0);
    round2((0.72 * athletic + 0.23 * size + 0.05 * consensus).clamp(0.0, 10.0))
}

/// Best available RAS with provenance: official, then combine drills, then
/// the profile estimate.
pub fn resolve_ras(
    position: Position,
    combine: Option<&CombineRecord>,
    profile_estimate: f64,
) -> MetricValue {
    if let Some(official) = combine.and_then(|record| record.ras_official) {
        return MetricValue::Verified(round2(official.clamp(0.0, 10.0)));
    }
    match combine.and_then(|record| combine_ras(position, record)) {
        Some(value) => MetricValue::proxy(value, ProxyDerivation::CombineDrills),
        None => MetricValue::proxy(profile_estimate, ProxyDerivation::ProfileEstimate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers() {
        assert_eq!(ras_tier(9.2), "elite");
        assert_eq!(ras_tier(8.0), "great");
        assert_eq!(ras_tier(7.5), "good");
        assert_eq!(ras_tier(6.1), "average");
        assert_eq!(ras_tier(2.0), "below_average");
    }

    #[test]
    fn baseline_drills_score_five() {
        let combine = CombineRecord {
            player_name: "Average Corner".into(),
            forty: Some(4.47),
            vertical: Some(36.5),
            broad: Some(124.0),
            ..CombineRecord::default()
        };
        assert_eq!(combine_ras(Position::Cb, &combine), Some(5.0));
    }

    #[test]
    fn fast_forty_scores_above_baseline() {
        let combine = CombineRecord {
            player_name: "Fast".into(),
            forty: Some(4.38),
            vertical: Some(36.5),
            broad: Some(124.0),
            ..CombineRecord::default()
        };
        let ras = combine_ras(Position::Cb, &combine).unwrap();
        assert!(ras > 5.0, "{ras}");
    }

    #[test]
    fn too_few_drills_fall_back() {
        let combine = CombineRecord {
            player_name: "Bench Only".into(),
            bench: Some(30.0),
            ras_official: None,
            ..CombineRecord::default()
        };
        assert_eq!(combine_ras(Position::Dt, &combine), None);
        assert_eq!(
            resolve_ras(Position::Dt, Some(&combine), 6.4),
            MetricValue::proxy(6.4, ProxyDerivation::ProfileEstimate)
        );
    }

    #[test]
    fn official_ras_wins() {
        let combine = CombineRecord {
            player_name: "Official".into(),
            forty: Some(4.30),
            ras_official: Some(9.87),
            ..CombineRecord::default()
        };
        assert_eq!(
            resolve_ras(Position::Wr, Some(&combine), 5.0),
            MetricValue::Verified(9.87)
        );
    }

    #[test]
    fn estimate_stays_on_scale() {
        let ras = estimate_ras(Position::Ot, Some(78.0), Some(315.0), 95.0, 1);
        assert!((0.0..=10.0).contains(&ras));
        assert!(ras > estimate_ras(Position::Ot, Some(74.0), Some(280.0), 70.0, 200));
        assert_eq!(
            estimate_ras(Position::Ot, None, None, 80.0, 50),
            estimate_ras(Position::Ot, Some(78.0), Some(315.0), 80.0, 50)
        );
    }
}
