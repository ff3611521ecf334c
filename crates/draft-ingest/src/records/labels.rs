use std::path::Path;

use polars::prelude::DataFrame;

use draft_model::LabeledOutcome;

use crate::error::Result;
use crate::frame::{FrameBuilder, FrameView};
use crate::table::read_table;

use super::read_position;

/// Builds the `historical_labels` table.
pub fn labels_frame(rows: &[LabeledOutcome]) -> Result<DataFrame> {
    FrameBuilder::new()
        .integer("draft_year", rows.iter().map(|r| Some(i64::from(r.draft_year))))
        .integer(
            "overall_pick",
            rows.iter().map(|r| Some(i64::from(r.overall_pick))),
        )
        .integer(
            "draft_round",
            rows.iter().map(|r| Some(i64::from(r.draft_round))),
        )
        .text("player_name", rows.iter().map(|r| r.player_name.as_str()))
        .text("position", rows.iter().map(|r| r.position.as_str()))
        .text("school", rows.iter().map(|r| r.school.as_str()))
        .number("wav", rows.iter().map(|r| Some(r.wav)))
        .number("games", rows.iter().map(|r| Some(r.games)))
        .number("starts", rows.iter().map(|r| Some(r.starts)))
        .number("ap1", rows.iter().map(|r| Some(r.ap1)))
        .number("pb", rows.iter().map(|r| Some(r.pb)))
        .number("years_in_career", rows.iter().map(|r| Some(r.years_in_career)))
        .integer("to_year", rows.iter().map(|r| r.to_year.map(i64::from)))
        .number("predicted_value", rows.iter().map(|r| r.predicted_value))
        .integer(
            "success_label_3yr",
            rows.iter().map(|r| Some(i64::from(r.success_label_3yr))),
        )
        .integer(
            "starter_label_3yr",
            rows.iter().map(|r| Some(i64::from(r.starter_label_3yr))),
        )
        .integer(
            "ceiling_label",
            rows.iter().map(|r| Some(i64::from(r.ceiling_label))),
        )
        .integer(
            "starter_seasons_proxy",
            rows.iter().map(|r| Some(i64::from(r.starter_seasons_proxy))),
        )
        .integer(
            "second_contract_proxy",
            rows.iter().map(|r| Some(i64::from(r.second_contract_proxy))),
        )
        .number("surplus_value", rows.iter().map(|r| r.surplus_value))
        .number("censor_weight", rows.iter().map(|r| Some(r.censor_weight)))
        .build()
}

/// Reads a `historical_labels` table written by [`labels_frame`].
pub fn read_labels(path: &Path) -> Result<Vec<LabeledOutcome>> {
    let df = read_table(path)?;
    let view = FrameView::new(&df, path);
    if view.height() == 0 {
        return Ok(Vec::new());
    }
    view.require(&[
        "draft_year",
        "overall_pick",
        "player_name",
        "position",
        "censor_weight",
    ])?;
    (0..view.height())
        .map(|row| {
            let label = |column: &str| view.integer(row, column).is_some_and(|v| v != 0);
            Ok(LabeledOutcome {
                draft_year: view.decode(row, "draft_year", |raw| raw.parse().ok())?,
                overall_pick: view.decode(row, "overall_pick", |raw| raw.parse().ok())?,
                draft_round: view
                    .integer(row, "draft_round")
                    .and_then(|v| u32::try_from(v).ok())
                    .unwrap_or(0),
                player_name: view.text_or_empty(row, "player_name"),
                position: read_position(&view, row, "position")?,
                school: view.text_or_empty(row, "school"),
                wav: view.number(row, "wav").unwrap_or(0.0),
                games: view.number(row, "games").unwrap_or(0.0),
                starts: view.number(row, "starts").unwrap_or(0.0),
                ap1: view.number(row, "ap1").unwrap_or(0.0),
                pb: view.number(row, "pb").unwrap_or(0.0),
                years_in_career: view.number(row, "years_in_career").unwrap_or(0.0),
                to_year: view.integer(row, "to_year").map(|v| v as i32),
                predicted_value: view.number(row, "predicted_value"),
                success_label_3yr: label("success_label_3yr"),
                starter_label_3yr: label("starter_label_3yr"),
                ceiling_label: label("ceiling_label"),
                starter_seasons_proxy: view
                    .integer(row, "starter_seasons_proxy")
                    .and_then(|v| u32::try_from(v).ok())
                    .unwrap_or(0),
                second_contract_proxy: label("second_contract_proxy"),
                surplus_value: view.number(row, "surplus_value"),
                censor_weight: view.decode(row, "censor_weight", |raw| raw.parse().ok())?,
            })
        })
        .collect()
}
