//! Rendered markdown for stage reports and player pages.

use chrono::{DateTime, TimeZone, Utc};
use tempfile::tempdir;

use draft_model::{
    BoardEntry, ClassYear, CompMatch, CompTier, MetricValue, PickRecord, Position, Prospect,
    ProspectScores, ProxyDerivation, QaIssue, QaKind, QaReport, TradeFlag,
};
use draft_report::{
    index_page, mock_report, player_page, stage_report, write_player_pages, write_report,
};
use draft_transform::MockDraft;

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 2, 12, 0, 0).unwrap()
}

fn pick(overall: u32, team: &str, name: &str, position: Position, score: f64, flag: bool) -> PickRecord {
    PickRecord {
        round: 1,
        pick_in_round: overall,
        overall_pick: overall,
        team: team.into(),
        player_id: format!("id-{overall}"),
        player_name: name.into(),
        position,
        school: "State".into(),
        board_rank: overall,
        final_grade: 90.0,
        round_projection: "Round 1-2".into(),
        pick_score: score,
        board_value: 1.0,
        team_fit: 0.5,
        run_pressure: 0.15,
        scarcity: 0.9,
        trade_down_flag: flag,
    }
}

fn entry() -> BoardEntry {
    BoardEntry {
        board_rank: 3,
        prospect: Prospect {
            player_id: "caleb-downs-s-ohio-state".into(),
            player_name: "Caleb Downs".into(),
            school: "Ohio State".into(),
            position: Position::S,
            class_year: ClassYear::Jr,
            draft_year: 2026,
            rank_seed: 4,
            height_in: Some(72),
            weight_lb: Some(205),
            injury_flag: true,
            role_ambiguous: false,
        },
        consensus_mean_rank: Some(5.5),
        consensus_rank_std: Some(1.5),
        consensus_sources: 2,
        consensus_signal: Some(98.5),
        consensus_confidence: Some(0.78),
        prior_signal: 98.7,
        scores: ProspectScores {
            trait_score: 94.1,
            production: MetricValue::Verified(88.0),
            athletic: MetricValue::proxy(81.0, ProxyDerivation::RankFrame),
            size_score: 90.0,
            context_score: 89.7,
            risk_penalty: 3.4,
            final_grade: 88.9,
            floor_grade: 86.2,
            ceiling_grade: 91.1,
            round_projection: "Round 1-2".into(),
        },
        ras: MetricValue::proxy(7.9, ProxyDerivation::ProfileEstimate),
        ras_tier: "good".into(),
        roi_adjustment: 0.0,
        success_probability: Some(0.62),
        best_team: Some("NYJ".into()),
        best_team_fit: Some(81.25),
        comps: vec![CompMatch {
            player_id: "kyle-hamilton-s-notre-dame".into(),
            player_name: "Kyle Hamilton".into(),
            draft_year: Some(2022),
            distance: 0.4127,
            overlap: 5,
            tier: CompTier::A,
        }],
    }
}

#[test]
fn seed_stage_report() {
    let mut qa = QaReport::new("seed");
    qa.record(QaIssue::new(QaKind::DuplicateKey, "Cam Ward listed twice").at_row(4));
    qa.record(
        QaIssue::new(QaKind::IncompleteRow, "Jalen Milroe height unreadable")
            .at_row(7)
            .on_field("height"),
    );
    qa.finish(10, 9);
    let text = stage_report("Seed roster", "prospects_seed.csv", &qa, at());
    insta::assert_snapshot!("seed_stage_report", text);
}

#[test]
fn mock_report_lists_rounds_and_flags() {
    let mock = MockDraft {
        picks: vec![
            pick(1, "TEN", "Cam Ward", Position::Qb, 0.8234, false),
            pick(2, "CLE", "Travis Hunter", Position::Cb, 0.79, true),
        ],
        trade_flags: vec![TradeFlag {
            round: 1,
            pick_in_round: 2,
            overall_pick: 2,
            team: "CLE".into(),
            top_need: Some(Position::Edge),
            similar_players: 4,
            scarcity_teams: vec!["NYG".into()],
            reason: "no EDGE in the top 10".into(),
        }],
    };
    insta::assert_snapshot!("mock_report", mock_report(&mock, at()));
}

#[test]
fn player_page_shows_provenance_and_comps() {
    let page = player_page(&entry(), at());
    assert!(page.starts_with("# #3 Caleb Downs (S, Ohio State)\n"));
    assert!(page.contains("| production | 88.00 | verified |"));
    assert!(page.contains("| athletic | 81.00 | proxy:rank_frame |"));
    assert!(page.contains("- **RAS**: 7.90 (proxy:profile_estimate) good"));
    assert!(page.contains("- **success probability**: 62.0%"));
    assert!(page.contains("- **best team fit**: NYJ (81.25)"));
    assert!(page.contains("| Kyle Hamilton | 2022 | 0.413 | 5 | A |"));
    assert!(page.contains("## Flags\n\ninjury history\n"));
    assert!(!page.contains("ROI adjustment"));
}

#[test]
fn index_links_player_pages() {
    let index = index_page(&[entry()], at());
    assert!(index.contains("| 3 | [Caleb Downs](players/caleb-downs-s-ohio-state.md) | S | Ohio State | 88.90 | Round 1-2 |"));
}

#[test]
fn pages_and_reports_land_on_disk() {
    let dir = tempdir().unwrap();
    let written = write_player_pages(dir.path(), &[entry()], at()).unwrap();
    assert_eq!(written, 1);
    assert!(dir.path().join("index.md").is_file());
    assert!(
        dir.path()
            .join("players/caleb-downs-s-ohio-state.md")
            .is_file()
    );

    let path = write_report(dir.path(), "board", "# Big board\n").unwrap();
    assert_eq!(path, dir.path().join("reports/board.md"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "# Big board\n");
}
