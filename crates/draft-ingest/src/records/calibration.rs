use std::path::Path;

use polars::prelude::DataFrame;

use draft_model::{BacktestRow, GradeBin, PickBand, RoiPrior};

use crate::error::Result;
use crate::frame::{FrameBuilder, FrameView};
use crate::table::read_table;

use super::read_position;

pub fn bins_frame(bins: &[GradeBin]) -> Result<DataFrame> {
    FrameBuilder::new()
        .integer("bin", bins.iter().map(|b| Some(i64::from(b.bin))))
        .number("grade_min", bins.iter().map(|b| Some(b.grade_min)))
        .number("grade_max", bins.iter().map(|b| Some(b.grade_max)))
        .integer("rows", bins.iter().map(|b| Some(b.rows as i64)))
        .number("weighted_rows", bins.iter().map(|b| Some(b.weighted_rows)))
        .number("hit_rate", bins.iter().map(|b| Some(b.hit_rate)))
        .number(
            "mean_career_value",
            bins.iter().map(|b| Some(b.mean_career_value)),
        )
        .build()
}

pub fn backtest_frame(rows: &[BacktestRow]) -> Result<DataFrame> {
    FrameBuilder::new()
        .integer(
            "holdout_year",
            rows.iter().map(|r| Some(i64::from(r.holdout_year))),
        )
        .integer("train_rows", rows.iter().map(|r| Some(r.train_rows as i64)))
        .integer("test_rows", rows.iter().map(|r| Some(r.test_rows as i64)))
        .number("brier", rows.iter().map(|r| Some(r.brier)))
        .number("accuracy", rows.iter().map(|r| Some(r.accuracy)))
        .number("mean_predicted", rows.iter().map(|r| Some(r.mean_predicted)))
        .number("observed_rate", rows.iter().map(|r| Some(r.observed_rate)))
        .build()
}

pub fn roi_frame(priors: &[RoiPrior]) -> Result<DataFrame> {
    FrameBuilder::new()
        .text("position", priors.iter().map(|p| p.position.as_str()))
        .text("pick_band", priors.iter().map(|p| p.pick_band.as_str()))
        .integer("rows", priors.iter().map(|p| Some(p.rows as i64)))
        .number("weighted_rows", priors.iter().map(|p| Some(p.weighted_rows)))
        .number("mean_surplus", priors.iter().map(|p| Some(p.mean_surplus)))
        .number("success_rate", priors.iter().map(|p| Some(p.success_rate)))
        .number("surplus_z", priors.iter().map(|p| Some(p.surplus_z)))
        .number(
            "roi_grade_adjustment",
            priors.iter().map(|p| Some(p.roi_grade_adjustment)),
        )
        .build()
}

/// Reads a `roi_priors` table written by [`roi_frame`].
pub fn read_roi_priors(path: &Path) -> Result<Vec<RoiPrior>> {
    let df = read_table(path)?;
    let view = FrameView::new(&df, path);
    if view.height() == 0 {
        return Ok(Vec::new());
    }
    view.require(&["position", "pick_band", "roi_grade_adjustment"])?;
    (0..view.height())
        .map(|row| {
            Ok(RoiPrior {
                position: read_position(&view, row, "position")?,
                pick_band: view.decode(row, "pick_band", |raw| raw.parse::<PickBand>().ok())?,
                rows: view
                    .integer(row, "rows")
                    .and_then(|v| usize::try_from(v).ok())
                    .unwrap_or(0),
                weighted_rows: view.number(row, "weighted_rows").unwrap_or(0.0),
                mean_surplus: view.number(row, "mean_surplus").unwrap_or(0.0),
                success_rate: view.number(row, "success_rate").unwrap_or(0.0),
                surplus_z: view.number(row, "surplus_z").unwrap_or(0.0),
                roi_grade_adjustment: view.number(row, "roi_grade_adjustment").unwrap_or(0.0),
            })
        })
        .collect()
}
