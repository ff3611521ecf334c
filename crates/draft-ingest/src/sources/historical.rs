//! Raw historical draft outcomes.

use std::path::Path;

use tracing::{info, info_span};

use draft_model::{HistoricalRecord, QaIssue, QaKind, QaReport};

use crate::error::Result;
use crate::frame::FrameView;

use super::{Ingested, load_optional, required_text};

const STAGE: &str = "historical";

/// Reads a historical draft table.
///
/// Positions are kept as source spellings and the draft year may be blank;
/// the labeler resolves and drops those. Rows without a pick are dropped
/// here. Missing outcome counts read as zero. `years_in_career` falls back to
/// `to_year - draft_year + 1` when only the span is listed.
pub fn read_historical(path: &Path) -> Result<Ingested<HistoricalRecord>> {
    let _span = info_span!("ingest", stage = STAGE).entered();
    let Some(df) = load_optional(path, STAGE)? else {
        return Ok(Ingested::missing(STAGE));
    };
    let view = FrameView::new(&df, path);
    let name_col = view
        .first_present(&["player_name", "player", "name"])
        .unwrap_or("player_name");
    let position_col = view.first_present(&["position", "pos"]).unwrap_or("position");
    let pick_col = view
        .first_present(&["overall_pick", "pick"])
        .unwrap_or("overall_pick");
    let year_col = view
        .first_present(&["draft_year", "year", "season"])
        .unwrap_or("draft_year");
    view.require(&[name_col, position_col, pick_col])?;
    let round_col = view
        .first_present(&["draft_round", "round"])
        .unwrap_or("draft_round");
    let school_col = view.first_present(&["school", "college"]).unwrap_or("school");
    let wav_col = view.first_present(&["wav", "w_av", "car_av"]).unwrap_or("wav");
    let predicted_col = view
        .first_present(&["predicted_value", "pred_value", "expected_value"])
        .unwrap_or("predicted_value");

    let mut rows = Vec::with_capacity(view.height());
    let mut qa = QaReport::new(STAGE);
    for row in 0..view.height() {
        let Some(player_name) = required_text(&view, row, name_col, &mut qa) else {
            continue;
        };
        let overall_pick = match view.integer(row, pick_col) {
            Some(pick) if pick > 0 => pick as u32,
            _ => {
                qa.record(
                    QaIssue::new(QaKind::MissingValue, format!("{player_name} has no pick"))
                        .at_row(row + 1)
                        .on_field(pick_col),
                );
                continue;
            }
        };
        let draft_year = view.integer(row, year_col).map(|year| year as i32);
        let to_year = view.integer(row, "to_year").map(|year| year as i32);
        let years_in_career = view.number(row, "years_in_career").unwrap_or_else(|| {
            match (draft_year, to_year) {
                (Some(from), Some(to)) if to >= from => f64::from(to - from + 1),
                _ => 0.0,
            }
        });
        rows.push(HistoricalRecord {
            draft_year,
            overall_pick,
            draft_round: view
                .integer(row, round_col)
                .and_then(|round| u32::try_from(round).ok())
                .unwrap_or(0),
            player_name,
            position_raw: view.text_or_empty(row, position_col),
            school: view.text_or_empty(row, school_col),
            wav: view.number(row, wav_col).unwrap_or(0.0),
            games: view.number(row, "games").unwrap_or(0.0),
            starts: view.number(row, "starts").unwrap_or(0.0),
            ap1: view.number(row, "ap1").unwrap_or(0.0),
            pb: view.number(row, "pb").unwrap_or(0.0),
            years_in_career,
            to_year,
            predicted_value: view.number(row, predicted_col),
        });
    }
    qa.finish(view.height(), rows.len());
    info!(
        rows = rows.len(),
        dropped = qa.dropped(),
        status = %qa.status,
        "historical rows read"
    );
    Ok(Ingested { rows, qa })
}
