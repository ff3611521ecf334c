//! Per-player pages and the board index.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use draft_model::{BoardEntry, MetricValue};

use crate::markdown::{Markdown, fmt_opt, fmt_pct};

pub const PLAYERS_DIR: &str = "players";
pub const INDEX_FILE: &str = "index.md";

/// Relative path of a player's page from the report root.
pub fn player_page_path(entry: &BoardEntry) -> String {
    format!("{PLAYERS_DIR}/{}.md", entry.player_id())
}

fn metric_row(name: &str, metric: &MetricValue) -> Vec<String> {
    vec![
        name.to_string(),
        format!("{:.2}", metric.value()),
        metric.source_label(),
    ]
}

fn plain_row(name: &str, value: f64) -> Vec<String> {
    vec![name.to_string(), format!("{value:.2}"), "derived".to_string()]
}

pub fn player_page(entry: &BoardEntry, at: DateTime<Utc>) -> String {
    let prospect = &entry.prospect;
    let scores = &entry.scores;
    let mut doc = Markdown::new(&format!(
        "#{} {} ({}, {})",
        entry.board_rank, prospect.player_name, prospect.position, prospect.school
    ));
    doc.generated(at);
    let mut facts = vec![
        ("class", prospect.class_year.to_string()),
        ("draft year", prospect.draft_year.to_string()),
        ("seed rank", prospect.rank_seed.to_string()),
        (
            "grade",
            format!(
                "{:.2} (floor {:.2}, ceiling {:.2})",
                scores.final_grade, scores.floor_grade, scores.ceiling_grade
            ),
        ),
        ("projection", scores.round_projection.clone()),
        ("RAS", format!("{} {}", entry.ras, entry.ras_tier)),
    ];
    if let Some(probability) = entry.success_probability {
        facts.push(("success probability", fmt_pct(probability)));
    }
    if entry.roi_adjustment != 0.0 {
        facts.push(("ROI adjustment", format!("{:+.2}", entry.roi_adjustment)));
    }
    if let (Some(team), Some(fit)) = (&entry.best_team, entry.best_team_fit) {
        facts.push(("best team fit", format!("{team} ({fit:.2})")));
    }
    doc.facts(&facts);

    doc.heading(2, "Components");
    doc.table(
        &["component", "score", "source"],
        &[
            plain_row("trait", scores.trait_score),
            metric_row("production", &scores.production),
            metric_row("athletic", &scores.athletic),
            plain_row("size", scores.size_score),
            plain_row("context", scores.context_score),
            plain_row("risk penalty", scores.risk_penalty),
        ],
    );

    doc.heading(2, "Consensus");
    if entry.consensus_sources == 0 {
        doc.paragraph("Not listed on any consensus board.");
    } else {
        doc.facts(&[
            ("boards", entry.consensus_sources.to_string()),
            ("mean rank", fmt_opt(entry.consensus_mean_rank)),
            ("rank spread", fmt_opt(entry.consensus_rank_std)),
            ("signal", fmt_opt(entry.consensus_signal)),
            ("confidence", fmt_opt(entry.consensus_confidence)),
            ("prior signal", format!("{:.2}", entry.prior_signal)),
        ]);
    }

    doc.heading(2, "Historical comps");
    if entry.comps.is_empty() {
        doc.paragraph("No comp shared enough measured features.");
    } else {
        let rows: Vec<Vec<String>> = entry
            .comps
            .iter()
            .map(|comp| {
                vec![
                    comp.player_name.clone(),
                    comp.draft_year.map_or_else(|| "-".to_string(), |year| year.to_string()),
                    format!("{:.3}", comp.distance),
                    comp.overlap.to_string(),
                    comp.tier.to_string(),
                ]
            })
            .collect();
        doc.table(&["player", "year", "distance", "features", "tier"], &rows);
    }

    let flags: Vec<&str> = [
        (prospect.injury_flag, "injury history"),
        (prospect.role_ambiguous, "role ambiguity"),
    ]
    .into_iter()
    .filter_map(|(set, label)| set.then_some(label))
    .collect();
    if !flags.is_empty() {
        doc.heading(2, "Flags");
        doc.paragraph(&flags.join(", "));
    }
    doc.finish()
}

pub fn index_page(entries: &[BoardEntry], at: DateTime<Utc>) -> String {
    let mut doc = Markdown::new("Draft board");
    doc.generated(at);
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                entry.board_rank.to_string(),
                format!(
                    "[{}]({})",
                    entry.prospect.player_name,
                    player_page_path(entry)
                ),
                entry.prospect.position.to_string(),
                entry.prospect.school.clone(),
                format!("{:.2}", entry.final_grade()),
                entry.scores.round_projection.clone(),
            ]
        })
        .collect();
    doc.table(&["rank", "player", "pos", "school", "grade", "round"], &rows);
    doc.finish()
}

/// Writes the index and one page per entry under `dir`. Returns the number
/// of player pages written.
pub fn write_player_pages(dir: &Path, entries: &[BoardEntry], at: DateTime<Utc>) -> Result<usize> {
    let players = dir.join(PLAYERS_DIR);
    fs::create_dir_all(&players)
        .with_context(|| format!("create {}", players.display()))?;
    for entry in entries {
        let path = dir.join(player_page_path(entry));
        fs::write(&path, player_page(entry, at))
            .with_context(|| format!("write {}", path.display()))?;
    }
    let index: PathBuf = dir.join(INDEX_FILE);
    fs::write(&index, index_page(entries, at))
        .with_context(|| format!("write {}", index.display()))?;
    info!(pages = entries.len(), dir = %dir.display(), "player pages written");
    Ok(entries.len())
}
