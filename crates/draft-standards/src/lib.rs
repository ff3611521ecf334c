//! Grade standards for the draft board: position weight tables, size
//! thresholds, the round map, label thresholds, censor weights, comp and mock
//! settings, and the position alias table.
//!
//! Defaults are compiled in from the workspace `standards/` directory and can
//! be overridden per file from a config directory.

pub mod aliases;
pub mod error;
pub mod loaders;
pub mod paths;
pub mod weights;

pub use aliases::parse_position_aliases;
pub use error::{Result, StandardsError};
pub use loaders::{
    Standards, StandardsSource, load_embedded_standards, load_standards, load_standards_from_dir,
};
pub use paths::{ALIASES_FILE, CONFIG_ENV_VAR, WEIGHTS_FILE, resolve_config_dir};
pub use weights::{
    CalibrationSettings, CensorStep, CensorTable, CompGroupWeights, CompSettings,
    ConsensusSettings, GradingSection, GradingStandards, LabelThresholds, MockSettings,
    PositionWeights, RoundBucket, SizeThreshold, parse_grading_standards,
};
