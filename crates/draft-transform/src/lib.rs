//! Draft board transforms.
//!
//! Each stage is a pure function over model records and the grading
//! standards:
//!
//! - **seed** and **labels**: roster normalization and historical outcome labels
//! - **consensus** and **matching**: ranked-board aggregation and name joins
//! - **grading**, **ras** and **team_fit**: the composite grade and its side signals
//! - **comps**: nearest-neighbour historical comparisons
//! - **calibration** and **roi**: grade-to-outcome fit and surplus priors
//! - **board** and **mock_draft**: the ranked board and the greedy simulation

pub mod board;
pub mod calibration;
pub mod comps;
pub mod consensus;
pub mod error;
pub mod grading;
pub mod labels;
pub mod matching;
pub mod mock_draft;
pub mod ras;
pub mod roi;
pub mod seed;
pub mod team_fit;

pub use board::{BoardBuild, BoardInputs, JoinStats, build_board, rank_entries};
pub use calibration::{
    CalibrationOutput, CalibrationRow, calibrate, calibration_rows, success_probability,
};
pub use comps::{CompEngine, prospect_profile};
pub use consensus::{ConsensusEntry, aggregate_consensus};
pub use error::{Result, TransformError};
pub use grading::{GradeInputs, GradedProspect, grade_prospect, round_projection};
pub use labels::{LabelSummary, build_labels, censor_weight, summarize_labels};
pub use matching::{MatchKind, NameIndex};
pub use mock_draft::{MockDraft, build_order, simulate};
pub use ras::{ras_tier, resolve_ras};
pub use roi::{build_roi_priors, pick_band_for_projection, roi_adjustment};
pub use seed::build_prospects;
pub use team_fit::{best_team_fit, team_fit};
