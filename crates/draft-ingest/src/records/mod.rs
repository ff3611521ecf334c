//! Normalized pipeline tables.
//!
//! Each stage writes its output through a `*_frame` builder here and the
//! next stage reads it back with the matching `read_*`. Metric columns carry
//! a `<metric>_source` sibling holding their provenance label.

pub mod board;
pub mod calibration;
pub mod inputs;
pub mod labels;
pub mod mock;
pub mod prospects;

use draft_model::{MetricValue, Position};

use crate::error::Result;
use crate::frame::FrameView;

pub use board::{board_frame, read_board};
pub use calibration::{backtest_frame, bins_frame, read_roi_priors, roi_frame};
pub use inputs::{
    combine_frame, consensus_frame, historical_frame, production_frame, team_needs_frame,
};
pub use labels::{labels_frame, read_labels};
pub use mock::{picks_frame, read_picks, trade_flags_frame};
pub use prospects::{prospects_frame, read_prospects};

pub(crate) fn read_position(view: &FrameView<'_>, row: usize, column: &str) -> Result<Position> {
    view.decode(row, column, |raw| raw.parse().ok())
}

pub(crate) fn read_metric(
    view: &FrameView<'_>,
    row: usize,
    column: &str,
) -> Result<Option<MetricValue>> {
    let Some(value) = view.number(row, column) else {
        return Ok(None);
    };
    let source_column = format!("{column}_source");
    view.decode(row, &source_column, |raw| {
        MetricValue::from_parts(value, raw).ok()
    })
    .map(Some)
}

pub(crate) fn to_i64<T: Into<i64>>(value: Option<T>) -> Option<i64> {
    value.map(Into::into)
}
