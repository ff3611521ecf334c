//! Team need profiles.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, info_span};

use draft_model::{PositionAliases, QaIssue, QaKind, QaReport, TeamNeedProfile};

use crate::error::Result;
use crate::frame::FrameView;

use super::{Ingested, load_optional, required_text, resolve_position};

const STAGE: &str = "team_needs";
const NEED_COLUMNS: [&str; 3] = ["need_1", "need_2", "need_3"];

/// Reads `team, need_1..need_3, off_scheme, def_scheme, gm_profile`.
///
/// Blank need slots are allowed; an unmapped need drops the team row.
pub fn read_team_needs(
    path: &Path,
    aliases: &PositionAliases,
) -> Result<Ingested<TeamNeedProfile>> {
    let _span = info_span!("ingest", stage = STAGE).entered();
    let Some(df) = load_optional(path, STAGE)? else {
        return Ok(Ingested::missing(STAGE));
    };
    let view = FrameView::new(&df, path);
    view.require(&["team"])?;

    let mut rows = Vec::with_capacity(view.height());
    let mut qa = QaReport::new(STAGE);
    let mut seen = HashSet::new();
    'rows: for row in 0..view.height() {
        let Some(team) = required_text(&view, row, "team", &mut qa) else {
            continue;
        };
        let mut needs = Vec::with_capacity(NEED_COLUMNS.len());
        for column in NEED_COLUMNS {
            if view.text(row, column).is_none() {
                continue;
            }
            match resolve_position(&view, row, column, aliases, &mut qa) {
                Some(position) if !needs.contains(&position) => needs.push(position),
                Some(_) => {}
                None => continue 'rows,
            }
        }
        if !seen.insert(team.to_ascii_uppercase()) {
            qa.record(
                QaIssue::new(QaKind::DuplicateKey, format!("team {team} listed twice"))
                    .at_row(row + 1),
            );
            continue;
        }
        rows.push(TeamNeedProfile {
            team,
            needs,
            off_scheme: view.text_or_empty(row, "off_scheme"),
            def_scheme: view.text_or_empty(row, "def_scheme"),
            gm_profile: view.text_or_empty(row, "gm_profile"),
        });
    }
    qa.finish(view.height(), rows.len());
    info!(
        rows = rows.len(),
        dropped = qa.dropped(),
        status = %qa.status,
        "team needs read"
    );
    Ok(Ingested { rows, qa })
}
