use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};
use crate::metric::MetricValue;
use crate::position::Position;

/// Eligibility class as listed on roster seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClassYear {
    Fr,
    Rfr,
    So,
    Rso,
    Jr,
    Rjr,
    Sr,
    Rsr,
    Gr,
    Unknown,
}

impl ClassYear {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassYear::Fr => "FR",
            ClassYear::Rfr => "RFR",
            ClassYear::So => "SO",
            ClassYear::Rso => "RSO",
            ClassYear::Jr => "JR",
            ClassYear::Rjr => "RJR",
            ClassYear::Sr => "SR",
            ClassYear::Rsr => "RSR",
            ClassYear::Gr => "GR",
            ClassYear::Unknown => "",
        }
    }

    /// Declared after fewer than three seasons on campus.
    pub fn is_early_entry(&self) -> bool {
        matches!(
            self,
            ClassYear::Fr | ClassYear::Rfr | ClassYear::So | ClassYear::Rso
        )
    }

    /// Still had eligibility left when declaring.
    pub fn is_underclass(&self) -> bool {
        self.is_early_entry() || matches!(self, ClassYear::Jr | ClassYear::Rjr)
    }

    pub fn is_senior(&self) -> bool {
        matches!(self, ClassYear::Sr | ClassYear::Rsr | ClassYear::Gr)
    }
}

impl fmt::Display for ClassYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassYear {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FR" => Ok(ClassYear::Fr),
            "RFR" | "RS-FR" => Ok(ClassYear::Rfr),
            "SO" => Ok(ClassYear::So),
            "RSO" | "RS-SO" => Ok(ClassYear::Rso),
            "JR" => Ok(ClassYear::Jr),
            "RJR" | "RS-JR" => Ok(ClassYear::Rjr),
            "SR" => Ok(ClassYear::Sr),
            "RSR" | "RS-SR" => Ok(ClassYear::Rsr),
            "GR" | "GRAD" => Ok(ClassYear::Gr),
            "" => Ok(ClassYear::Unknown),
            other => Err(format!("unknown class year: {other}")),
        }
    }
}

/// Parses roster heights like `6'4"`, `6-4`, `6' 4` or a plain inch count.
pub fn parse_height_inches(raw: &str) -> Result<u32> {
    let cleaned = raw.trim().replace('"', "");
    if let Ok(inches) = cleaned.parse::<f64>() {
        if inches > 0.0 {
            return Ok(inches.round() as u32);
        }
    }
    let (feet, inches) = cleaned
        .split_once('\'')
        .or_else(|| cleaned.split_once('-'))
        .ok_or_else(|| ModelError::InvalidHeight(raw.to_string()))?;
    let feet: u32 = feet
        .trim()
        .parse()
        .map_err(|_| ModelError::InvalidHeight(raw.to_string()))?;
    let inches: u32 = match inches.trim() {
        "" => 0,
        value => value
            .parse()
            .map_err(|_| ModelError::InvalidHeight(raw.to_string()))?,
    };
    if feet == 0 || inches >= 12 {
        return Err(ModelError::InvalidHeight(raw.to_string()));
    }
    Ok(feet * 12 + inches)
}

/// A current-class prospect as produced by the seed builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    pub player_id: String,
    pub player_name: String,
    pub school: String,
    pub position: Position,
    pub class_year: ClassYear,
    pub draft_year: i32,
    pub rank_seed: u32,
    pub height_in: Option<u32>,
    pub weight_lb: Option<u32>,
    pub injury_flag: bool,
    pub role_ambiguous: bool,
}

/// One raw roster seed row. The seed builder normalizes and validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedRow {
    /// 1-based source row.
    pub row: usize,
    pub rank_seed: Option<i64>,
    pub player_name: Option<String>,
    pub school: String,
    pub position_raw: Option<String>,
    pub height_raw: Option<String>,
    pub weight_lb: Option<f64>,
    pub class_year_raw: String,
    pub draft_year: Option<i32>,
    pub injury_flag: bool,
    pub role_ambiguous: bool,
}

/// Athletic testing for one prospect. Any drill may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombineRecord {
    pub player_name: String,
    pub position: Option<Position>,
    pub height_in: Option<f64>,
    pub weight_lb: Option<f64>,
    pub forty: Option<f64>,
    pub ten_split: Option<f64>,
    pub vertical: Option<f64>,
    pub broad: Option<f64>,
    pub shuttle: Option<f64>,
    pub three_cone: Option<f64>,
    pub bench: Option<f64>,
    pub ras_official: Option<f64>,
}

impl CombineRecord {
    /// Number of populated drills, not counting measurements.
    pub fn drill_count(&self) -> usize {
        [
            self.forty,
            self.ten_split,
            self.vertical,
            self.broad,
            self.shuttle,
            self.three_cone,
            self.bench,
        ]
        .iter()
        .filter(|value| value.is_some())
        .count()
    }
}

/// College production percentile for one prospect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub player_name: String,
    pub position: Position,
    pub season: Option<i32>,
    /// Percentile composite on a 0-100 scale.
    pub production_score: f64,
    pub games: Option<u32>,
}

impl ProductionRecord {
    pub const MIN_GAMES: u32 = 8;

    pub fn is_small_sample(&self) -> bool {
        self.games.is_some_and(|games| games < Self::MIN_GAMES)
    }
}

/// The five blended components, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub trait_score: f64,
    pub production_score: f64,
    pub athletic_score: f64,
    pub size_score: f64,
    pub context_score: f64,
}

/// Composite grade output for one prospect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProspectScores {
    pub trait_score: f64,
    pub production: MetricValue,
    pub athletic: MetricValue,
    pub size_score: f64,
    pub context_score: f64,
    pub risk_penalty: f64,
    pub final_grade: f64,
    pub floor_grade: f64,
    pub ceiling_grade: f64,
    pub round_projection: String,
}

impl ProspectScores {
    pub fn components(&self) -> ComponentScores {
        ComponentScores {
            trait_score: self.trait_score,
            production_score: self.production.value(),
            athletic_score: self.athletic.value(),
            size_score: self.size_score,
            context_score: self.context_score,
        }
    }
}
