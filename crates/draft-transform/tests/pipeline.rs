//! Board build feeding the mock draft.

use std::collections::HashSet;

use draft_model::{ClassYear, Position, Prospect, SourceRecord, TeamNeedProfile};
use draft_standards::load_embedded_standards;
use draft_transform::{BoardInputs, build_board, build_order, simulate};

const NAMES: [(&str, Position); 10] = [
    ("Arch Manning", Position::Qb),
    ("Jeremiyah Love", Position::Rb),
    ("Carnell Tate", Position::Wr),
    ("Kenyon Sadiq", Position::Te),
    ("Francis Mauigoa", Position::Ot),
    ("Olaivavega Ioane", Position::Iol),
    ("Rueben Bain", Position::Edge),
    ("Peter Woods", Position::Dt),
    ("Anthony Hill", Position::Lb),
    ("Jermod McCoy", Position::Cb),
];

fn prospects() -> Vec<Prospect> {
    NAMES
        .iter()
        .enumerate()
        .map(|(idx, (name, position))| Prospect {
            player_id: format!("id-{idx}"),
            player_name: (*name).to_string(),
            school: "State".into(),
            position: *position,
            class_year: ClassYear::Jr,
            draft_year: 2026,
            rank_seed: idx as u32 * 7 + 1,
            height_in: None,
            weight_lb: None,
            injury_flag: false,
            role_ambiguous: false,
        })
        .collect()
}

fn consensus() -> Vec<SourceRecord> {
    let mut records = Vec::new();
    for (source, offset) in [("board_a", 0.0), ("board_b", 2.0)] {
        for (idx, (name, position)) in NAMES.iter().enumerate().take(6) {
            records.push(SourceRecord {
                source: source.into(),
                player_name: (*name).to_string(),
                position: *position,
                rank: idx as f64 + 1.0 + offset,
                score: None,
                fetched_at: None,
                url: None,
            });
        }
    }
    records
}

fn teams() -> Vec<TeamNeedProfile> {
    ["TEN", "CLE", "NYG", "NE"]
        .iter()
        .zip([Position::Qb, Position::Edge, Position::Ot, Position::Wr])
        .map(|(team, need)| TeamNeedProfile {
            team: (*team).to_string(),
            needs: vec![need],
            off_scheme: String::new(),
            def_scheme: String::new(),
            gm_profile: String::new(),
        })
        .collect()
}

#[test]
fn board_ranks_feed_a_complete_mock() {
    let standards = load_embedded_standards().unwrap().grading;
    let prospects = prospects();
    let consensus = consensus();
    let teams = teams();
    let build = build_board(
        BoardInputs {
            prospects: &prospects,
            consensus: &consensus,
            combine: &[],
            production: &[],
            teams: &teams,
            comp_pool: &[],
            calibration: None,
            roi_priors: &[],
        },
        &standards,
    )
    .unwrap();

    let board = build.entries;
    assert_eq!(board.len(), NAMES.len());
    assert_eq!(build.joins.consensus_exact, 6);
    assert_eq!(build.joins.consensus_fuzzy, 0);
    assert_eq!(build.consensus.len(), 6);
    for (idx, entry) in board.iter().enumerate() {
        assert_eq!(entry.board_rank, idx as u32 + 1);
        assert!(entry.best_team.is_some());
        assert!(entry.success_probability.is_none());
        assert!(!entry.ras.is_verified());
    }
    assert!(board.windows(2).all(|w| w[0].final_grade() >= w[1].final_grade()));
    let carried = board
        .iter()
        .find(|entry| entry.prospect.player_name == "Arch Manning")
        .unwrap();
    assert_eq!(carried.consensus_sources, 2);
    assert_eq!(carried.consensus_mean_rank, Some(2.0));

    let round_one: Vec<String> = teams.iter().map(|team| team.team.clone()).collect();
    let order = build_order(&round_one, &[], 2);
    let mock = simulate(&board, &teams, &order, &standards.mock).unwrap();
    assert_eq!(mock.picks.len(), 8);
    let unique: HashSet<&str> = mock.picks.iter().map(|pick| pick.player_id.as_str()).collect();
    assert_eq!(unique.len(), 8);
    assert_eq!(mock.picks[0].team, "TEN");
    assert_eq!(mock.picks[4].round, 2);
    assert!(
        mock.picks
            .windows(2)
            .all(|w| w[0].overall_pick < w[1].overall_pick)
    );
}

#[test]
fn mock_stops_when_board_runs_out() {
    let standards = load_embedded_standards().unwrap().grading;
    let prospects: Vec<Prospect> = prospects().into_iter().take(3).collect();
    let teams = teams();
    let build = build_board(
        BoardInputs {
            prospects: &prospects,
            consensus: &[],
            combine: &[],
            production: &[],
            teams: &teams,
            comp_pool: &[],
            calibration: None,
            roi_priors: &[],
        },
        &standards,
    )
    .unwrap();
    let round_one: Vec<String> = teams.iter().map(|team| team.team.clone()).collect();
    let order = build_order(&round_one, &[], 1);
    let mock = simulate(&build.entries, &teams, &order, &standards.mock).unwrap();
    assert_eq!(mock.picks.len(), 3);
    assert!(mock.trade_flags.is_empty());
}
