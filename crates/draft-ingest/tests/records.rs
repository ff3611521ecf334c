//! Tests for persisted stage tables.

use draft_ingest::records::{board_frame, prospects_frame, read_board, read_prospects};
use draft_ingest::{TableFormat, read_table, resolve_table, table_path, write_table};
use draft_model::{
    BoardEntry, ClassYear, CompMatch, CompTier, MetricValue, Position, Prospect, ProspectScores,
    ProxyDerivation,
};

fn prospect(name: &str, position: Position, rank: u32) -> Prospect {
    Prospect {
        player_id: draft_model::player_id(name, position, "Colorado"),
        player_name: name.to_string(),
        school: "Colorado".to_string(),
        position,
        class_year: ClassYear::Jr,
        draft_year: 2025,
        rank_seed: rank,
        height_in: Some(73),
        weight_lb: None,
        injury_flag: false,
        role_ambiguous: true,
    }
}

fn entry(prospect: Prospect, rank: u32) -> BoardEntry {
    BoardEntry {
        board_rank: rank,
        prospect,
        consensus_mean_rank: Some(2.0),
        consensus_rank_std: Some(0.816),
        consensus_sources: 3,
        consensus_signal: Some(99.9),
        consensus_confidence: Some(0.9),
        prior_signal: 98.5,
        scores: ProspectScores {
            trait_score: 94.2,
            production: MetricValue::Verified(88.0),
            athletic: MetricValue::proxy(81.5, ProxyDerivation::CombineDrills),
            size_score: 90.0,
            context_score: 89.9,
            risk_penalty: 1.5,
            final_grade: 88.4,
            floor_grade: 86.4,
            ceiling_grade: 90.6,
            round_projection: "Round 1-2".to_string(),
        },
        ras: MetricValue::proxy(7.1, ProxyDerivation::CombineDrills),
        ras_tier: "good".to_string(),
        roi_adjustment: 0.0,
        success_probability: None,
        best_team: Some("CLE".to_string()),
        best_team_fit: Some(91.4),
        comps: vec![CompMatch {
            player_id: "deion-sanders-cb-florida-state".to_string(),
            player_name: "Deion Sanders".to_string(),
            draft_year: Some(1989),
            distance: 0.42,
            overlap: 6,
            tier: CompTier::A,
        }],
    }
}

#[test]
fn prospects_round_trip_through_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let prospects = vec![
        prospect("Travis Hunter", Position::Cb, 1),
        prospect("Shedeur Sanders", Position::Qb, 7),
    ];
    let path = table_path(dir.path(), "prospects_seed", TableFormat::Csv);
    let mut df = prospects_frame(&prospects).expect("build frame");
    write_table(&path, &mut df).expect("write");

    let back = read_prospects(&path).expect("read back");
    assert_eq!(back, prospects);
}

#[test]
fn board_keeps_provenance_and_comps_in_parquet() {
    let dir = tempfile::tempdir().expect("tempdir");
    let entries = vec![entry(prospect("Travis Hunter", Position::Cb, 1), 1)];
    let path = table_path(dir.path(), "big_board", TableFormat::Parquet);
    let mut df = board_frame(&entries).expect("build frame");
    write_table(&path, &mut df).expect("write");

    let back = read_board(&path).expect("read back");
    assert_eq!(back.len(), 1);
    assert_eq!(
        back[0].scores.athletic,
        MetricValue::proxy(81.5, ProxyDerivation::CombineDrills)
    );
    assert!(back[0].scores.production.is_verified());
    assert_eq!(back[0].comps.len(), 1);
    assert_eq!(back[0].comps[0].tier, CompTier::A);
    assert_eq!(back[0].prospect.weight_lb, None);
    assert_eq!(back[0].success_probability, None);
}

#[test]
fn resolve_table_prefers_requested_format() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut df = prospects_frame(&[prospect("Cam Ward", Position::Qb, 2)]).expect("frame");
    write_table(&table_path(dir.path(), "prospects_seed", TableFormat::Csv), &mut df)
        .expect("write csv");
    write_table(
        &table_path(dir.path(), "prospects_seed", TableFormat::Parquet),
        &mut df,
    )
    .expect("write parquet");

    let found = resolve_table(dir.path(), "prospects_seed", TableFormat::Parquet).expect("found");
    assert_eq!(TableFormat::from_path(&found), Some(TableFormat::Parquet));
    assert!(resolve_table(dir.path(), "big_board", TableFormat::Csv).is_none());
}

#[test]
fn empty_board_writes_header_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = table_path(dir.path(), "big_board", TableFormat::Csv);
    let mut df = board_frame(&[]).expect("frame");
    write_table(&path, &mut df).expect("write");
    let read = read_table(&path).expect("read");
    assert_eq!(read.height(), 0);
    assert!(read_board(&path).expect("read board").is_empty());
}
