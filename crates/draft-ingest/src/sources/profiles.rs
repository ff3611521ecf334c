//! Historical comp pool profiles.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use tracing::{info, info_span};

use draft_model::{
    CompFeature, CompProfile, PositionAliases, QaIssue, QaKind, QaReport, player_id,
};

use crate::error::Result;
use crate::frame::FrameView;

use super::{Ingested, load_optional, required_text, resolve_position};

const STAGE: &str = "historical_profiles";

/// Reads the comp pool: one row per historical player with any of the
/// comparison feature columns (`height_in`, `forty`, `production_score`, ...).
/// A `player_id` column is used when present, otherwise one is derived.
pub fn read_comp_profiles(
    path: &Path,
    aliases: &PositionAliases,
) -> Result<Ingested<CompProfile>> {
    let _span = info_span!("ingest", stage = STAGE).entered();
    let Some(df) = load_optional(path, STAGE)? else {
        return Ok(Ingested::missing(STAGE));
    };
    let view = FrameView::new(&df, path);
    view.require(&["player_name", "position"])?;

    let mut rows = Vec::with_capacity(view.height());
    let mut qa = QaReport::new(STAGE);
    let mut seen = HashSet::new();
    for row in 0..view.height() {
        let Some(player_name) = required_text(&view, row, "player_name", &mut qa) else {
            continue;
        };
        let Some(position) = resolve_position(&view, row, "position", aliases, &mut qa) else {
            continue;
        };
        let id = view.text(row, "player_id").unwrap_or_else(|| {
            player_id(&player_name, position, &view.text_or_empty(row, "school"))
        });
        if !seen.insert(id.clone()) {
            qa.record(QaIssue::new(QaKind::DuplicateKey, id).at_row(row + 1));
            continue;
        }
        let features: BTreeMap<CompFeature, f64> = CompFeature::ALL
            .into_iter()
            .filter_map(|feature| {
                view.number(row, feature.column())
                    .map(|value| (feature, value))
            })
            .collect();
        rows.push(CompProfile {
            player_id: id,
            player_name,
            position,
            draft_year: view.integer(row, "draft_year").map(|year| year as i32),
            features,
        });
    }
    qa.finish(view.height(), rows.len());
    info!(rows = rows.len(), dropped = qa.dropped(), "comp profiles read");
    Ok(Ingested { rows, qa })
}
