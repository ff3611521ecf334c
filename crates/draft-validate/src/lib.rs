//! Validation for draft board inputs.
//!
//! - [`leakage`]: keeps historical outcome columns out of current-class features
//! - [`measurables`]: plausibility ranges for combine measurements

pub mod leakage;
pub mod measurables;
mod util;

pub use leakage::{
    BOARD_FEATURE_COLUMNS, LeakageViolation, OUTCOME_COLUMNS, check_feature_columns,
    is_outcome_column,
};
pub use measurables::{MeasurableRange, RANGES, range_for, scrub_combine};
pub use util::CaseInsensitiveSet;
