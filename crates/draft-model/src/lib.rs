//! Core data model for the draft board pipeline.
//!
//! Types here are shared by every stage: positions and their alias table,
//! prospects and their grade components, ranked-board source records,
//! historical outcomes and labels, team needs, mock-draft picks, calibration
//! artifacts and stage QA reports.

pub mod board;
pub mod calibration;
pub mod error;
pub mod historical;
pub mod ids;
pub mod metric;
pub mod position;
pub mod prospect;
pub mod qa;
pub mod source;
pub mod team;

pub use board::{BoardEntry, CompMatch, CompTier};
pub use calibration::{BacktestRow, CalibrationModel, GradeBin, PickBand, RoiPrior};
pub use error::{ModelError, Result};
pub use historical::{CompFeature, CompGroup, CompProfile, HistoricalRecord, LabeledOutcome};
pub use ids::{canonical_player_name, player_id};
pub use metric::{MetricValue, ProxyDerivation};
pub use position::{Position, PositionAliases};
pub use prospect::{
    ClassYear, CombineRecord, ComponentScores, ProductionRecord, Prospect, ProspectScores, SeedRow,
    parse_height_inches,
};
pub use qa::{QaIssue, QaKind, QaReport, StageStatus};
pub use source::{GradeSnapshot, SourceRecord};
pub use team::{CompPick, DraftSlot, PickRecord, TeamNeedProfile, TradeFlag};
