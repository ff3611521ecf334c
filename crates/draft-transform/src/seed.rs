//! Seed roster normalization.

use std::collections::HashSet;

use tracing::{info, info_span};

use draft_model::{
    ClassYear, PositionAliases, Prospect, QaIssue, QaKind, QaReport, SeedRow,
    canonical_player_name, parse_height_inches, player_id,
};

pub const STAGE: &str = "seed";

/// Builds prospects from raw roster rows.
///
/// Rows with no name, no usable rank or an unmapped position are dropped.
/// An unreadable height or class year keeps the row with the value unset.
/// The first row for a (canonical name, position) pair wins. Output is
/// ordered by seed rank.
pub fn build_prospects(
    rows: &[SeedRow],
    aliases: &PositionAliases,
    default_year: i32,
) -> (Vec<Prospect>, QaReport) {
    let _span = info_span!("seed", rows = rows.len()).entered();
    let mut qa = QaReport::new(STAGE);
    let mut seen = HashSet::new();
    let mut prospects = Vec::new();

    for raw in rows {
        let Some(player_name) = raw.player_name.clone() else {
            qa.record(
                QaIssue::new(QaKind::MissingValue, "player_name is blank")
                    .at_row(raw.row)
                    .on_field("player_name"),
            );
            continue;
        };
        let rank_seed = match raw.rank_seed.map(u32::try_from) {
            Some(Ok(rank)) if rank > 0 => rank,
            _ => {
                qa.record(
                    QaIssue::new(
                        QaKind::InvalidRank,
                        format!("{player_name} has no positive seed rank"),
                    )
                    .at_row(raw.row)
                    .on_field("rank_seed"),
                );
                continue;
            }
        };
        let Some(position_raw) = raw.position_raw.as_deref() else {
            qa.record(
                QaIssue::new(QaKind::MissingValue, format!("{player_name} has no position"))
                    .at_row(raw.row)
                    .on_field("position"),
            );
            continue;
        };
        let position = match aliases.resolve(position_raw) {
            Ok(position) => position,
            Err(error) => {
                qa.record(
                    QaIssue::new(QaKind::UnknownPosition, error.to_string())
                        .at_row(raw.row)
                        .on_field("position"),
                );
                continue;
            }
        };
        if !seen.insert((canonical_player_name(&player_name), position)) {
            qa.record(
                QaIssue::new(
                    QaKind::DuplicateKey,
                    format!("{player_name} ({position}) already seeded"),
                )
                .at_row(raw.row),
            );
            continue;
        }

        let height_in = match raw.height_raw.as_deref() {
            None => None,
            Some(text) => match parse_height_inches(text) {
                Ok(height) => Some(height),
                Err(error) => {
                    qa.record(
                        QaIssue::new(QaKind::IncompleteRow, error.to_string())
                            .at_row(raw.row)
                            .on_field("height"),
                    );
                    None
                }
            },
        };
        let class_year = raw
            .class_year_raw
            .parse::<ClassYear>()
            .unwrap_or_else(|message| {
                qa.record(
                    QaIssue::new(QaKind::IncompleteRow, message)
                        .at_row(raw.row)
                        .on_field("class_year"),
                );
                ClassYear::Unknown
            });

        prospects.push(Prospect {
            player_id: player_id(&player_name, position, &raw.school),
            player_name,
            school: raw.school.clone(),
            position,
            class_year,
            draft_year: raw.draft_year.unwrap_or(default_year),
            rank_seed,
            height_in,
            weight_lb: raw
                .weight_lb
                .filter(|weight| *weight > 0.0)
                .map(|weight| weight.round() as u32),
            injury_flag: raw.injury_flag,
            role_ambiguous: raw.role_ambiguous,
        });
    }

    prospects.sort_by(|a, b| {
        a.rank_seed
            .cmp(&b.rank_seed)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    qa.finish(rows.len(), prospects.len());
    info!(
        rows = prospects.len(),
        dropped = qa.dropped(),
        warnings = qa.warning_count(),
        status = %qa.status,
        "prospects seeded"
    );
    (prospects, qa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use draft_model::Position;

    fn row(idx: usize, rank: i64, name: &str, position: &str, height: &str) -> SeedRow {
        SeedRow {
            row: idx,
            rank_seed: Some(rank),
            player_name: Some(name.to_string()),
            school: "Penn State".to_string(),
            position_raw: Some(position.to_string()),
            height_raw: Some(height.to_string()),
            weight_lb: Some(250.4),
            class_year_raw: "JR".to_string(),
            draft_year: None,
            injury_flag: false,
            role_ambiguous: false,
        }
    }

    #[test]
    fn normalizes_and_dedupes() {
        let rows = vec![
            row(1, 3, "Abdul Carter", "DE", "6'3\""),
            row(2, 9, "Abdul Carter", "EDGE", "6-3"),
            row(3, 1, "Tyler Warren", "TEY", "6-6"),
            row(4, 0, "Nobody", "QB", "6-2"),
            row(5, 40, "Mystery", "ATH", "6-0"),
        ];
        let (prospects, qa) = build_prospects(&rows, &standard_aliases(), 2025);
        assert_eq!(prospects.len(), 2);
        assert_eq!(prospects[0].player_name, "Tyler Warren");
        assert_eq!(prospects[0].position, Position::Te);
        assert_eq!(prospects[1].height_in, Some(75));
        assert_eq!(prospects[1].weight_lb, Some(250));
        assert_eq!(prospects[1].player_id, "abdul-carter-edge-penn-state");
        assert_eq!(prospects[1].draft_year, 2025);
        assert_eq!(qa.count(QaKind::DuplicateKey), 1);
        assert_eq!(qa.count(QaKind::InvalidRank), 1);
        assert_eq!(qa.count(QaKind::UnknownPosition), 1);
    }

    #[test]
    fn bad_height_keeps_row() {
        let rows = vec![row(1, 5, "Will Campbell", "OT", "tall")];
        let (prospects, qa) = build_prospects(&rows, &standard_aliases(), 2025);
        assert_eq!(prospects.len(), 1);
        assert_eq!(prospects[0].height_in, None);
        assert_eq!(qa.count(QaKind::IncompleteRow), 1);
        assert_eq!(qa.status, draft_model::StageStatus::Ok);
    }

    fn standard_aliases() -> PositionAliases {
        let mut aliases = PositionAliases::identity();
        aliases.insert("DE", Position::Edge);
        aliases.insert("TEY", Position::Te);
        aliases
    }
}
