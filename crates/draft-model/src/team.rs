use serde::{Deserialize, Serialize};

use crate::position::Position;

/// A team's ordered needs and scheme context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamNeedProfile {
    pub team: String,
    /// Ordered needs, most pressing first. At most three.
    pub needs: Vec<Position>,
    pub off_scheme: String,
    pub def_scheme: String,
    pub gm_profile: String,
}

impl TeamNeedProfile {
    /// Profile used for teams missing from the needs table.
    pub fn neutral(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            needs: Vec::new(),
            off_scheme: String::new(),
            def_scheme: String::new(),
            gm_profile: String::new(),
        }
    }

    /// 0-based need slot of a position, if listed.
    pub fn need_slot(&self, position: Position) -> Option<usize> {
        self.needs.iter().position(|need| *need == position)
    }

    pub fn top_need(&self) -> Option<Position> {
        self.needs.first().copied()
    }
}

/// One selection slot in the simulated order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSlot {
    pub round: u32,
    pub pick_in_round: u32,
    pub overall_pick: u32,
    pub team: String,
    pub compensatory: bool,
}

/// A compensatory pick inserted after `pick_after` in `round`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompPick {
    pub round: u32,
    pub pick_after: u32,
    pub team: String,
}

/// One simulated selection with its pick-score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickRecord {
    pub round: u32,
    pub pick_in_round: u32,
    pub overall_pick: u32,
    pub team: String,
    pub player_id: String,
    pub player_name: String,
    pub position: Position,
    pub school: String,
    pub board_rank: u32,
    pub final_grade: f64,
    pub round_projection: String,
    pub pick_score: f64,
    pub board_value: f64,
    pub team_fit: f64,
    pub run_pressure: f64,
    pub scarcity: f64,
    pub trade_down_flag: bool,
}

/// A trade-down signal raised at a slot. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeFlag {
    pub round: u32,
    pub pick_in_round: u32,
    pub overall_pick: u32,
    pub team: String,
    pub top_need: Option<Position>,
    pub similar_players: usize,
    pub scarcity_teams: Vec<String>,
    pub reason: String,
}
