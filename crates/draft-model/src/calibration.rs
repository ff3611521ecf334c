//! Calibration artifacts fit on historical outcomes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::position::Position;

/// Draft-round grouping used by ROI priors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PickBand {
    R1,
    R2,
    R3,
    R4,
    #[serde(rename = "R5+")]
    R5Plus,
}

impl PickBand {
    pub const ALL: [PickBand; 5] = [
        PickBand::R1,
        PickBand::R2,
        PickBand::R3,
        PickBand::R4,
        PickBand::R5Plus,
    ];

    pub fn from_round(round: u32) -> Self {
        match round {
            0 | 1 => PickBand::R1,
            2 => PickBand::R2,
            3 => PickBand::R3,
            4 => PickBand::R4,
            _ => PickBand::R5Plus,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PickBand::R1 => "R1",
            PickBand::R2 => "R2",
            PickBand::R3 => "R3",
            PickBand::R4 => "R4",
            PickBand::R5Plus => "R5+",
        }
    }
}

impl fmt::Display for PickBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PickBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PickBand::ALL
            .into_iter()
            .find(|band| band.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown pick band: {s}"))
    }
}

/// Fitted logistic model mapping grade to success probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationModel {
    pub intercept: f64,
    pub slope: f64,
    pub position_additive: BTreeMap<Position, f64>,
    pub sample_size: usize,
    pub weighted_sample_size: f64,
    pub snapshot_grades: usize,
    pub proxy_grades: usize,
    pub weighted_success_rate: f64,
}

/// Censor-weighted hit rate for one slice of the grade distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBin {
    pub bin: u32,
    pub grade_min: f64,
    pub grade_max: f64,
    pub rows: usize,
    pub weighted_rows: f64,
    pub hit_rate: f64,
    pub mean_career_value: f64,
}

/// Metrics for one held-out draft year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRow {
    pub holdout_year: i32,
    pub train_rows: usize,
    pub test_rows: usize,
    pub brier: f64,
    pub accuracy: f64,
    pub mean_predicted: f64,
    pub observed_rate: f64,
}

/// Surplus-value prior for a (position, pick band) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiPrior {
    pub position: Position,
    pub pick_band: PickBand,
    pub rows: usize,
    pub weighted_rows: f64,
    pub mean_surplus: f64,
    pub success_rate: f64,
    pub surplus_z: f64,
    pub roi_grade_adjustment: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_band_from_round() {
        assert_eq!(PickBand::from_round(1), PickBand::R1);
        assert_eq!(PickBand::from_round(4), PickBand::R4);
        assert_eq!(PickBand::from_round(7), PickBand::R5Plus);
        assert_eq!("r5+".parse::<PickBand>().unwrap(), PickBand::R5Plus);
    }

    #[test]
    fn calibration_model_serializes_position_keys() {
        let mut position_additive = BTreeMap::new();
        position_additive.insert(Position::Edge, 0.04);
        let model = CalibrationModel {
            intercept: -9.0,
            slope: 0.11,
            position_additive,
            sample_size: 10,
            weighted_sample_size: 8.5,
            snapshot_grades: 2,
            proxy_grades: 8,
            weighted_success_rate: 0.4,
        };
        let json = serde_json::to_string(&model).unwrap();
        assert!(json.contains("\"EDGE\":0.04"));
        let back: CalibrationModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }
}
