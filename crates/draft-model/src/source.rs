use serde::{Deserialize, Serialize};

use crate::position::Position;

/// One row of one ranked board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub source: String,
    pub player_name: String,
    pub position: Position,
    /// 1-based rank on the source board.
    pub rank: f64,
    pub score: Option<f64>,
    pub fetched_at: Option<String>,
    pub url: Option<String>,
}

/// A model grade recorded for a historical prospect before their draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeSnapshot {
    pub draft_year: i32,
    pub player_name: String,
    pub position: Position,
    pub model_grade: f64,
}
