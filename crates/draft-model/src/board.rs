use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::metric::MetricValue;
use crate::prospect::{Prospect, ProspectScores};

/// Confidence tier of a historical comp by distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompTier {
    A,
    B,
    C,
}

impl CompTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompTier::A => "A",
            CompTier::B => "B",
            CompTier::C => "C",
        }
    }
}

impl fmt::Display for CompTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(CompTier::A),
            "B" => Ok(CompTier::B),
            "C" => Ok(CompTier::C),
            other => Err(format!("unknown comp tier: {other}")),
        }
    }
}

/// A historical player matched to a prospect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompMatch {
    pub player_id: String,
    pub player_name: String,
    pub draft_year: Option<i32>,
    pub distance: f64,
    pub overlap: usize,
    pub tier: CompTier,
}

/// One row of the graded big board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardEntry {
    pub board_rank: u32,
    pub prospect: Prospect,
    pub consensus_mean_rank: Option<f64>,
    pub consensus_rank_std: Option<f64>,
    pub consensus_sources: usize,
    pub consensus_signal: Option<f64>,
    pub consensus_confidence: Option<f64>,
    pub prior_signal: f64,
    pub scores: ProspectScores,
    pub ras: MetricValue,
    pub ras_tier: String,
    pub roi_adjustment: f64,
    pub success_probability: Option<f64>,
    pub best_team: Option<String>,
    pub best_team_fit: Option<f64>,
    pub comps: Vec<CompMatch>,
}

impl BoardEntry {
    pub fn player_id(&self) -> &str {
        &self.prospect.player_id
    }

    pub fn final_grade(&self) -> f64 {
        self.scores.final_grade
    }
}
