//! Weight tables and stage settings loaded from `weights.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use draft_model::Position;

use crate::error::{Result, StandardsError};

const SUM_TOLERANCE: f64 = 1e-6;

/// Blend weights for one position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionWeights {
    #[serde(rename = "trait")]
    pub trait_weight: f64,
    pub production: f64,
    pub athletic: f64,
    pub size: f64,
    pub context: f64,
}

impl PositionWeights {
    pub fn sum(&self) -> f64 {
        self.trait_weight + self.production + self.athletic + self.size + self.context
    }

    fn components(&self) -> [(&'static str, f64); 5] {
        [
            ("trait", self.trait_weight),
            ("production", self.production),
            ("athletic", self.athletic),
            ("size", self.size),
            ("context", self.context),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingSection {
    pub weight_total: f64,
    pub grade_min: f64,
    pub grade_max: f64,
    /// Share of the trait score taken from the prior signal at full
    /// consensus confidence.
    pub trait_prior_weight: f64,
    /// Confidence used for the prior when only the seed rank is known.
    pub seed_only_prior_factor: f64,
    pub weights: BTreeMap<Position, PositionWeights>,
}

/// Minimum frame for the size score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeThreshold {
    pub min_height_in: u32,
    pub min_weight_lb: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundBucket {
    pub min_grade: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelThresholds {
    pub success_wav: f64,
    pub success_games: f64,
    pub success_honors: f64,
    pub starter_starts: f64,
    pub starter_games: f64,
    pub ceiling_ap1: f64,
    pub ceiling_pb: f64,
    pub second_contract_years: u32,
    pub second_contract_span: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CensorStep {
    pub year: i32,
    pub weight: f64,
}

/// Censor weights by draft year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensorTable {
    /// Weight for years before the first step.
    pub default_weight: f64,
    /// First draft year treated as immature.
    pub immature_from: i32,
    pub immature_weight: f64,
    pub steps: Vec<CensorStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusSettings {
    pub base_weight: f64,
    pub fuzzy_threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompGroupWeights {
    pub size: f64,
    pub athletic: f64,
    pub production: f64,
    #[serde(rename = "trait")]
    pub trait_weight: f64,
}

impl CompGroupWeights {
    pub fn sum(&self) -> f64 {
        self.size + self.athletic + self.production + self.trait_weight
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompSettings {
    pub k: usize,
    pub min_overlap: usize,
    pub tier_a: f64,
    pub tier_b: f64,
    pub group_weights: CompGroupWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockSettings {
    pub board_value: f64,
    pub team_fit: f64,
    pub run_pressure: f64,
    pub scarcity: f64,
    pub candidate_pool: usize,
    pub run_window: usize,
    pub run_teams: usize,
    pub scarcity_window: usize,
    pub trade_tier: usize,
    pub trade_window: usize,
    pub trade_grade_band: f64,
    pub trade_min_survivors: usize,
    pub trade_scarcity_signal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSettings {
    pub initial_intercept: f64,
    pub initial_slope: f64,
    pub iterations: usize,
    pub learning_rate: f64,
    pub min_position_rows: usize,
    pub position_additive_cap: f64,
    pub bins: usize,
    pub min_backtest_train_rows: usize,
}

/// Everything loaded from `weights.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingStandards {
    pub grading: GradingSection,
    pub thresholds: BTreeMap<Position, SizeThreshold>,
    pub round_map: Vec<RoundBucket>,
    pub labels: LabelThresholds,
    pub censor: CensorTable,
    pub consensus: ConsensusSettings,
    pub comps: CompSettings,
    pub mock: MockSettings,
    pub calibration: CalibrationSettings,
}

impl GradingStandards {
    pub fn weights_for(&self, position: Position) -> Option<&PositionWeights> {
        self.grading.weights.get(&position)
    }

    pub fn threshold_for(&self, position: Position) -> Option<SizeThreshold> {
        self.thresholds.get(&position).copied()
    }

    /// Checks every table for completeness and consistency.
    pub fn validate(&self) -> Result<()> {
        self.validate_weights()?;
        for position in Position::ALL {
            if !self.thresholds.contains_key(&position) {
                return Err(StandardsError::MissingPosition {
                    table: "thresholds",
                    position,
                });
            }
        }
        self.validate_round_map()?;
        self.validate_censor()?;
        self.validate_comps()?;
        self.validate_mock()?;
        if self.calibration.bins == 0 || self.calibration.iterations == 0 {
            return Err(StandardsError::invalid(
                "calibration bins and iterations must be positive",
            ));
        }
        Ok(())
    }

    fn validate_weights(&self) -> Result<()> {
        let grading = &self.grading;
        if grading.grade_min >= grading.grade_max {
            return Err(StandardsError::invalid("grade_min must be below grade_max"));
        }
        for position in Position::ALL {
            let weights =
                grading
                    .weights
                    .get(&position)
                    .ok_or(StandardsError::MissingPosition {
                        table: "grading.weights",
                        position,
                    })?;
            if let Some((component, _)) = weights
                .components()
                .into_iter()
                .find(|(_, value)| *value < 0.0)
            {
                return Err(StandardsError::NegativeWeight {
                    position,
                    component,
                });
            }
            let sum = weights.sum();
            if (sum - grading.weight_total).abs() > SUM_TOLERANCE {
                return Err(StandardsError::WeightSum {
                    position,
                    sum,
                    expected: grading.weight_total,
                });
            }
        }
        if !(0.0..=1.0).contains(&grading.trait_prior_weight)
            || !(0.0..=1.0).contains(&grading.seed_only_prior_factor)
        {
            return Err(StandardsError::invalid(
                "trait prior weights must lie in [0, 1]",
            ));
        }
        Ok(())
    }

    fn validate_round_map(&self) -> Result<()> {
        if self.round_map.is_empty() {
            return Err(StandardsError::invalid("round_map is empty"));
        }
        let descending = self
            .round_map
            .windows(2)
            .all(|pair| pair[0].min_grade > pair[1].min_grade);
        if !descending {
            return Err(StandardsError::invalid(
                "round_map thresholds must be strictly descending",
            ));
        }
        Ok(())
    }

    fn validate_censor(&self) -> Result<()> {
        let censor = &self.censor;
        let in_unit = |weight: f64| (0.0..=1.0).contains(&weight);
        if !in_unit(censor.default_weight) || !in_unit(censor.immature_weight) {
            return Err(StandardsError::invalid("censor weights must lie in [0, 1]"));
        }
        if let Some(step) = censor.steps.iter().find(|step| !in_unit(step.weight)) {
            return Err(StandardsError::invalid(format!(
                "censor weight for {} must lie in [0, 1]",
                step.year
            )));
        }
        let ascending = censor
            .steps
            .windows(2)
            .all(|pair| pair[0].year < pair[1].year);
        if !ascending {
            return Err(StandardsError::invalid(
                "censor steps must be in strictly ascending year order",
            ));
        }
        Ok(())
    }

    fn validate_comps(&self) -> Result<()> {
        let comps = &self.comps;
        if comps.k == 0 {
            return Err(StandardsError::invalid("comps.k must be at least 1"));
        }
        if comps.tier_a > comps.tier_b {
            return Err(StandardsError::invalid("comps.tier_a must not exceed tier_b"));
        }
        if comps.group_weights.sum() <= 0.0 {
            return Err(StandardsError::invalid("comp group weights sum to zero"));
        }
        Ok(())
    }

    fn validate_mock(&self) -> Result<()> {
        let mock = &self.mock;
        let sum = mock.board_value + mock.team_fit + mock.run_pressure + mock.scarcity;
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(StandardsError::invalid(format!(
                "mock pick-score weights sum to {sum:.6}, expected 1.0"
            )));
        }
        if mock.candidate_pool == 0 {
            return Err(StandardsError::invalid("mock.candidate_pool must be positive"));
        }
        Ok(())
    }
}

/// Parses and validates a `weights.toml` document.
pub fn parse_grading_standards(text: &str, path: &Path) -> Result<GradingStandards> {
    let standards: GradingStandards =
        toml::from_str(text).map_err(|source| StandardsError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
    standards.validate()?;
    Ok(standards)
}
