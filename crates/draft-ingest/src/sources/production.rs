//! College production percentiles.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, info_span};

use draft_model::{
    Position, PositionAliases, ProductionRecord, QaIssue, QaKind, QaReport, canonical_player_name,
};

use crate::error::Result;
use crate::frame::FrameView;

use super::{Ingested, load_optional, required_text, resolve_position};

const STAGE: &str = "production";

/// Reads production percentile scores (0-100).
///
/// When a player has several seasons the most recent one is kept. Two rows
/// for the same season are duplicates. Normalized tables name the games
/// column `college_games`; `games` is a historical outcome column.
pub fn read_production(
    path: &Path,
    aliases: &PositionAliases,
) -> Result<Ingested<ProductionRecord>> {
    let _span = info_span!("ingest", stage = STAGE).entered();
    let Some(df) = load_optional(path, STAGE)? else {
        return Ok(Ingested::missing(STAGE));
    };
    let view = FrameView::new(&df, path);
    let name_col = view
        .first_present(&["player_name", "player", "name"])
        .unwrap_or("player_name");
    let position_col = view.first_present(&["position", "pos"]).unwrap_or("position");
    let score_col = view
        .first_present(&["production_score", "percentile", "production_percentile"])
        .unwrap_or("production_score");
    let games_col = view
        .first_present(&["college_games", "games_played", "games"])
        .unwrap_or("college_games");
    view.require(&[name_col, position_col, score_col])?;

    let mut qa = QaReport::new(STAGE);
    let mut latest: HashMap<(String, Position), ProductionRecord> = HashMap::new();
    let mut order: Vec<(String, Position)> = Vec::new();
    for row in 0..view.height() {
        let Some(player_name) = required_text(&view, row, name_col, &mut qa) else {
            continue;
        };
        let Some(position) = resolve_position(&view, row, position_col, aliases, &mut qa) else {
            continue;
        };
        let Some(production_score) = view.number(row, score_col) else {
            qa.record(
                QaIssue::new(QaKind::MissingValue, format!("{player_name} has no score"))
                    .at_row(row + 1)
                    .on_field(score_col),
            );
            continue;
        };
        if !(0.0..=100.0).contains(&production_score) {
            qa.record(
                QaIssue::new(
                    QaKind::OutOfRange,
                    format!("{player_name} production score {production_score} outside 0-100"),
                )
                .at_row(row + 1)
                .on_field(score_col),
            );
            continue;
        }
        let record = ProductionRecord {
            player_name: player_name.clone(),
            position,
            season: view.integer(row, "season").map(|season| season as i32),
            production_score,
            games: view
                .integer(row, games_col)
                .and_then(|games| u32::try_from(games).ok()),
        };
        let key = (canonical_player_name(&player_name), position);
        match latest.get(&key) {
            None => {
                order.push(key.clone());
                latest.insert(key, record);
            }
            Some(existing) if existing.season == record.season => {
                qa.record(
                    QaIssue::new(
                        QaKind::DuplicateKey,
                        format!("{player_name} listed twice for the same season"),
                    )
                    .at_row(row + 1),
                );
            }
            Some(existing) if record.season > existing.season => {
                latest.insert(key, record);
            }
            Some(_) => {}
        }
    }
    let rows: Vec<ProductionRecord> = order
        .into_iter()
        .filter_map(|key| latest.remove(&key))
        .collect();
    qa.finish(view.height(), rows.len());
    info!(
        rows = rows.len(),
        dropped = qa.dropped(),
        status = %qa.status,
        "production records read"
    );
    Ok(Ingested { rows, qa })
}
