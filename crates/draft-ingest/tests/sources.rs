//! Tests for source table readers.

use std::fs;
use std::path::{Path, PathBuf};

use draft_ingest::{
    read_combine, read_comp_picks, read_consensus, read_draft_order, read_historical,
    read_production, read_seed_rows, read_team_needs,
};
use draft_model::{Position, PositionAliases, QaKind, StageStatus};

fn aliases() -> PositionAliases {
    let mut aliases = PositionAliases::identity();
    aliases.insert("SAF", Position::S);
    aliases.insert("DE", Position::Edge);
    aliases.insert("OLB-EDGE", Position::Edge);
    aliases
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn consensus_drops_bad_ranks_duplicates_and_unknown_positions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        dir.path(),
        "boards.csv",
        "source,player_name,position,rank\n\
         espn,Abdul Carter,DE,1\n\
         espn,Travis Hunter,CB,2\n\
         espn,Travis Hunter,CB,3\n\
         pff,Abdul Carter,OLB-EDGE,2\n\
         pff,Mystery Man,ATH,4\n\
         pff,Will Johnson,CB,-1\n\
         pff,Malaki Starks,SAF,n/a\n",
    );

    let ingested = read_consensus(&path, &aliases()).expect("read consensus");
    assert_eq!(ingested.rows.len(), 3);
    assert_eq!(ingested.qa.count(QaKind::DuplicateKey), 1);
    assert_eq!(ingested.qa.count(QaKind::UnknownPosition), 1);
    assert_eq!(ingested.qa.count(QaKind::InvalidRank), 2);
    assert_eq!(ingested.qa.status, StageStatus::Partial);
    assert!(
        ingested
            .rows
            .iter()
            .all(|record| record.position == Position::Edge || record.position == Position::Cb)
    );
}

#[test]
fn consensus_uses_file_stem_without_source_column() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        dir.path(),
        "athletic_top100.csv",
        "player,pos,rank\nCam Ward,QB,3\n",
    );
    let ingested = read_consensus(&path, &aliases()).expect("read consensus");
    assert_eq!(ingested.rows[0].source, "athletic_top100");
    assert_eq!(ingested.qa.status, StageStatus::Ok);
}

#[test]
fn missing_source_file_is_not_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ingested =
        read_consensus(&dir.path().join("absent.csv"), &aliases()).expect("missing is ok");
    assert!(ingested.is_empty());
    assert_eq!(ingested.qa.status, StageStatus::MissingInput);
}

#[test]
fn empty_table_reports_empty_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(dir.path(), "needs.csv", "team,need_1,need_2,need_3\n");
    let ingested = read_team_needs(&path, &aliases()).expect("read needs");
    assert!(ingested.is_empty());
    assert_eq!(ingested.qa.status, StageStatus::EmptyInput);
}

#[test]
fn missing_required_column_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(dir.path(), "boards.csv", "source,player_name\nespn,Cam Ward\n");
    assert!(read_consensus(&path, &aliases()).is_err());
}

#[test]
fn combine_parses_heights_and_allows_blank_positions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        dir.path(),
        "combine.csv",
        "player_name,position,height,weight,forty,vertical\n\
         Abdul Carter,DE,\"6'3\"\"\",250,4.55,\n\
         Cam Ward,,74,219,,32.5\n",
    );
    let ingested = read_combine(&path, &aliases()).expect("read combine");
    assert_eq!(ingested.rows.len(), 2);
    let carter = &ingested.rows[0];
    assert_eq!(carter.position, Some(Position::Edge));
    assert_eq!(carter.height_in, Some(75.0));
    assert_eq!(carter.forty, Some(4.55));
    assert_eq!(carter.vertical, None);
    assert_eq!(ingested.rows[1].position, None);
    assert_eq!(ingested.rows[1].height_in, Some(74.0));
}

#[test]
fn production_keeps_latest_season() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        dir.path(),
        "production.csv",
        "player_name,position,season,production_score,games\n\
         Tetairoa McMillan,WR,2023,81,12\n\
         Tetairoa McMillan,WR,2024,88,12\n\
         Luther Burden,WR,2024,140,12\n\
         Luther Burden,WR,2023,77,5\n",
    );
    let ingested = read_production(&path, &aliases()).expect("read production");
    assert_eq!(ingested.rows.len(), 2);
    assert_eq!(ingested.rows[0].production_score, 88.0);
    assert_eq!(ingested.rows[1].season, Some(2023));
    assert!(ingested.rows[1].is_small_sample());
    assert_eq!(ingested.qa.count(QaKind::OutOfRange), 1);
}

#[test]
fn team_needs_resolve_aliases_and_reject_duplicates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        dir.path(),
        "needs.csv",
        "team,need_1,need_2,need_3,off_scheme,def_scheme,gm_profile\n\
         TEN,QB,DE,,spread,4-3,reset_qb\n\
         CLE,OT,ATH,WR,wide_zone,4-3,trench_focus\n\
         TEN,WR,CB,S,spread,4-3,reset_qb\n",
    );
    let ingested = read_team_needs(&path, &aliases()).expect("read needs");
    assert_eq!(ingested.rows.len(), 1);
    assert_eq!(ingested.rows[0].needs, vec![Position::Qb, Position::Edge]);
    assert_eq!(ingested.qa.count(QaKind::UnknownPosition), 1);
    assert_eq!(ingested.qa.count(QaKind::DuplicateKey), 1);
}

#[test]
fn historical_keeps_raw_positions_and_fills_career_span() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        dir.path(),
        "historical.csv",
        "year,pick,round,player,pos,college,w_av,games,starts,ap1,pb,to_year,pred_value\n\
         2018,1,1,Baker Mayfield,QB,Oklahoma,60,90,85,0,1,2024,40\n\
         ,2,1,Saquon Barkley,RB,Penn State,55,80,78,1,3,2024,\n\
         2018,,1,Nobody,RB,Nowhere,0,0,0,0,0,,\n",
    );
    let ingested = read_historical(&path).expect("read historical");
    assert_eq!(ingested.rows.len(), 2);
    let baker = &ingested.rows[0];
    assert_eq!(baker.position_raw, "QB");
    assert_eq!(baker.years_in_career, 7.0);
    assert_eq!(baker.predicted_value, Some(40.0));
    assert_eq!(ingested.rows[1].draft_year, None);
    assert_eq!(ingested.qa.count(QaKind::MissingValue), 1);
}

#[test]
fn normalized_historical_table_reads_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let raw = write(
        dir.path(),
        "historical.csv",
        "draft_year,overall_pick,draft_round,player_name,position,school,wav,games,starts,ap1,pb,to_year\n\
         2019,4,1,Nick Bosa,DE,Ohio State,40,70,68,1,4,2025\n",
    );
    let first = read_historical(&raw).expect("read raw");
    let normalized = dir.path().join("out").join("historical.csv");
    let mut df = draft_ingest::records::historical_frame(&first.rows).expect("frame");
    draft_ingest::write_table(&normalized, &mut df).expect("write");
    let second = read_historical(&normalized).expect("read normalized");
    assert_eq!(second.rows, first.rows);
    assert_eq!(second.rows[0].position_raw, "DE");
    assert_eq!(second.rows[0].predicted_value, None);
}

#[test]
fn seed_rows_keep_raw_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        dir.path(),
        "seed.csv",
        "rank_seed,player_name,school,position,height,weight_lb,class_year,injury_flag\n\
         1,Travis Hunter,Colorado,CB,6-1,188,JR,N\n\
         2,Abdul Carter,Penn State,DE,6-3,250,JR,Y\n",
    );
    let ingested = read_seed_rows(&path).expect("read seed");
    assert_eq!(ingested.rows.len(), 2);
    assert_eq!(ingested.rows[1].position_raw.as_deref(), Some("DE"));
    assert_eq!(ingested.rows[1].height_raw.as_deref(), Some("6-3"));
    assert!(ingested.rows[1].injury_flag);
    assert!(!ingested.rows[0].role_ambiguous);
}

#[test]
fn draft_order_sorts_by_pick_and_reads_comp_picks() {
    let dir = tempfile::tempdir().expect("tempdir");
    let order = write(dir.path(), "order.csv", "pick,team\n2,CLE\n1,TEN\n3,NYG\n");
    let comp = write(
        dir.path(),
        "comp.csv",
        "round,pick_after,team\n3,32,KC\n0,32,BAL\n",
    );
    let order = read_draft_order(&order).expect("read order");
    assert_eq!(order.rows, vec!["TEN", "CLE", "NYG"]);
    let comp = read_comp_picks(&comp).expect("read comp picks");
    assert_eq!(comp.rows.len(), 1);
    assert_eq!(comp.qa.count(QaKind::OutOfRange), 1);
}
