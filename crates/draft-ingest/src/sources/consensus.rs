//! Ranked-board source records.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, info_span};

use draft_model::{
    PositionAliases, QaIssue, QaKind, QaReport, SourceRecord, canonical_player_name,
};

use crate::error::Result;
use crate::frame::FrameView;

use super::{Ingested, load_optional, required_text, resolve_position};

const STAGE: &str = "consensus";

/// Reads one or more stacked ranked boards.
///
/// Expects `player_name`, `position` and `rank`. The board name comes from a
/// `source` column, or the file stem when the column is absent. Ranks must be
/// positive; a second row for the same (source, player, position) is a
/// duplicate.
pub fn read_consensus(path: &Path, aliases: &PositionAliases) -> Result<Ingested<SourceRecord>> {
    let _span = info_span!("ingest", stage = STAGE).entered();
    let Some(df) = load_optional(path, STAGE)? else {
        return Ok(Ingested::missing(STAGE));
    };
    let view = FrameView::new(&df, path);
    let name_col = view
        .first_present(&["player_name", "player", "name"])
        .unwrap_or("player_name");
    let position_col = view.first_present(&["position", "pos"]).unwrap_or("position");
    let rank_col = view
        .first_present(&["rank", "overall_rank", "board_rank"])
        .unwrap_or("rank");
    view.require(&[name_col, position_col, rank_col])?;

    let default_source = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(STAGE)
        .to_string();

    let mut ingested = Ingested {
        rows: Vec::with_capacity(view.height()),
        qa: QaReport::new(STAGE),
    };
    let mut seen = HashSet::new();
    for row in 0..view.height() {
        let qa = &mut ingested.qa;
        let Some(player_name) = required_text(&view, row, name_col, qa) else {
            continue;
        };
        let Some(position) = resolve_position(&view, row, position_col, aliases, qa) else {
            continue;
        };
        let rank = match view.number(row, rank_col) {
            Some(rank) if rank > 0.0 => rank,
            _ => {
                qa.record(
                    QaIssue::new(
                        QaKind::InvalidRank,
                        format!(
                            "rank {:?} for {player_name} is not a positive number",
                            view.text_or_empty(row, rank_col)
                        ),
                    )
                    .at_row(row + 1)
                    .on_field(rank_col),
                );
                continue;
            }
        };
        let source = view
            .text(row, "source")
            .unwrap_or_else(|| default_source.clone());
        let key = (
            source.to_ascii_lowercase(),
            canonical_player_name(&player_name),
            position,
        );
        if !seen.insert(key) {
            qa.record(
                QaIssue::new(
                    QaKind::DuplicateKey,
                    format!("{player_name} ({position}) listed twice on {source}"),
                )
                .at_row(row + 1),
            );
            continue;
        }
        ingested.rows.push(SourceRecord {
            source,
            player_name,
            position,
            rank,
            score: view.number(row, "score"),
            fetched_at: view.text(row, "fetched_at"),
            url: view.text(row, "url"),
        });
    }
    ingested.qa.finish(view.height(), ingested.rows.len());
    info!(
        rows = ingested.rows.len(),
        dropped = ingested.qa.dropped(),
        status = %ingested.qa.status,
        "consensus records read"
    );
    Ok(ingested)
}
