//! End-to-end stage runs against a scratch project directory.

use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};

use draft_cli::cli::{FetchArgs, SourceArg};
use draft_cli::commands::{
    RunContext, run_all, run_board, run_fetch_with, run_ingest, run_usage,
};
use draft_cli::paths::{ProjectPaths, processed};
use draft_fetch::{ApiClient, DEFAULT_BASE_URL};
use draft_ingest::{TableFormat, read_table};
use draft_ingest::records::{read_board, read_picks};
use draft_model::StageStatus;

const SEED: &str = "rank_seed,player_name,school,position,height,weight_lb,class_year\n\
1,Arch Manning,Texas,QB,6-4,220,JR\n\
2,Rueben Bain,Miami,DE,6-3,275,JR\n\
3,Carnell Tate,Ohio State,WR,6-3,195,JR\n\
4,Francis Mauigoa,Miami,OT,6-6,315,JR\n\
5,Jermod McCoy,Tennessee,CB,6-0,193,JR\n\
6,Peter Woods,Clemson,DT,6-3,310,JR\n\
7,Kenyon Sadiq,Oregon,TE,6-3,245,JR\n\
8,Anthony Hill,Texas,LB,6-2,235,JR\n\
9,Nobody Special,Nowhere,ATH,6-0,200,SR\n\
10,Rueben Bain,Miami,EDGE,6-3,275,JR\n";

const CONSENSUS: &str = "source,player_name,position,rank\n\
board_a,Arch Manning,QB,1\n\
board_a,Rueben Bain,EDGE,2\n\
board_a,Carnell Tate,WR,3\n\
board_b,Arch Manning,QB,3\n\
board_b,Rueben Bain,DE,1\n\
board_b,Carnell Tate,WR,2\n\
board_b,Ghost Player,QB,0\n";

const TEAM_NEEDS: &str = "team,need_1,need_2,need_3,off_scheme,def_scheme,gm_profile\n\
TEN,QB,EDGE,,spread,4-3,reset_qb\n\
CLE,OT,WR,,wide_zone,4-3,trench_focus\n\
NYG,OT,CB,,spread,3-4,bpa\n\
NE,WR,DT,,gap,3-4,bpa\n";

const DRAFT_ORDER: &str = "pick,team\n1,TEN\n2,CLE\n3,NYG\n4,NE\n";

const HISTORICAL: &str = "draft_year,overall_pick,draft_round,player_name,position,school,wav,games,starts,ap1,pb,to_year,predicted_value\n\
2018,1,1,Baker Mayfield,QB,Oklahoma,60,90,85,0,1,2024,40\n\
2018,2,1,Saquon Barkley,RB,Penn State,55,80,78,1,3,2024,38\n\
2019,2,1,Nick Bosa,DE,Ohio State,40,70,68,1,4,2025,36\n\
2021,5,1,Ja'Marr Chase,WR,LSU,50,60,60,1,3,2025,30\n\
2022,40,2,Unknown Guy,XYZ,Somewhere,1,2,0,0,0,2023,5\n";

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(path, contents).expect("write fixture");
}

fn project(root: &Path) -> RunContext {
    let paths = ProjectPaths::new(root, TableFormat::Csv);
    let raw = paths.raw_dir();
    write(&raw.join("prospect_seed.csv"), SEED);
    write(&raw.join("consensus_boards.csv"), CONSENSUS);
    write(&raw.join("team_needs.csv"), TEAM_NEEDS);
    write(&raw.join("draft_order.csv"), DRAFT_ORDER);
    write(&raw.join("historical_drafts.csv"), HISTORICAL);
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
    RunContext::load(paths, None, now).expect("load standards")
}

fn fetch_args(execute: bool) -> FetchArgs {
    FetchArgs {
        dataset: "player-season-stats".to_string(),
        year: 2025,
        team: Some("Texas".to_string()),
        conference: None,
        week: None,
        season_type: "regular".to_string(),
        dry_run: !execute,
        execute,
        max_calls: 1000,
    }
}

#[test]
fn all_stages_run_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = project(dir.path());
    let summaries = run_all(&ctx, Some(2026), 1, 25).expect("run all");

    let stages: Vec<&str> = summaries.iter().map(|s| s.stage.as_str()).collect();
    assert_eq!(
        stages,
        vec![
            "seed",
            "consensus",
            "combine",
            "production",
            "team_needs",
            "historical",
            "label",
            "calibrate",
            "board",
            "mock",
            "report",
        ]
    );

    let seed = &summaries[0];
    assert_eq!(seed.rows_out, 8);
    assert_eq!(seed.dropped, 2);
    assert_eq!(seed.status, StageStatus::Partial);

    let consensus = &summaries[1];
    assert_eq!(consensus.rows_out, 6);
    assert_eq!(consensus.dropped, 1);
    assert_eq!(summaries[2].status, StageStatus::MissingInput);

    let label = &summaries[6];
    assert_eq!(label.rows_in, 5);
    assert_eq!(label.rows_out, 4);

    let board = read_board(&ctx.paths.stage_output(processed::BOARD)).expect("read board");
    assert_eq!(board.len(), 8);
    let ranks: Vec<u32> = board.iter().map(|entry| entry.board_rank).collect();
    assert_eq!(ranks, (1..=8).collect::<Vec<_>>());
    let manning = board
        .iter()
        .find(|entry| entry.prospect.player_name == "Arch Manning")
        .expect("manning on board");
    assert_eq!(manning.consensus_sources, 2);
    assert_eq!(manning.consensus_mean_rank, Some(2.0));
    assert!(manning.success_probability.is_some());

    let picks = read_picks(&ctx.paths.stage_output(processed::MOCK_PICKS)).expect("read picks");
    assert_eq!(picks.len(), 4);
    assert_eq!(picks[0].team, "TEN");

    let out = ctx.paths.outputs_dir();
    for report in ["seed", "ingest_consensus", "label", "calibrate", "board", "mock"] {
        assert!(
            out.join("reports").join(format!("{report}.md")).is_file(),
            "missing {report} report"
        );
    }
    assert!(out.join("index.md").is_file());
    assert_eq!(fs::read_dir(out.join("players")).expect("players").count(), 8);
    assert!(ctx.paths.processed_file(processed::CALIBRATION_MODEL).is_file());
    assert!(!ctx.paths.usage_dir().exists());
}

#[test]
fn board_refuses_outcome_columns() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = project(dir.path());
    write(
        &ctx.paths.stage_output(processed::COMBINE),
        "player_name,position,forty,wav\nArch Manning,QB,4.6,12\n",
    );
    let error = run_board(&ctx, None, 10).expect_err("leakage must fail");
    let message = format!("{error:#}");
    assert!(message.contains("leakage"), "{message}");
    assert!(message.contains("wav"), "{message}");
    assert!(!ctx.paths.stage_output(processed::BOARD).exists());
}

#[test]
fn consensus_directory_stacks_boards() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = project(dir.path());
    let boards = ctx.paths.raw_dir().join("consensus_boards");
    write(
        &boards.join("espn.csv"),
        "player_name,position,rank\nArch Manning,QB,1\nRueben Bain,EDGE,2\n",
    );
    write(
        &boards.join("pff.csv"),
        "player_name,position,rank\nArch Manning,QB,2\nRueben Bain,EDGE,-1\n",
    );
    let summary = run_ingest(&ctx, SourceArg::Consensus).expect("ingest");
    assert_eq!(summary.rows_in, 4);
    assert_eq!(summary.rows_out, 3);
    assert_eq!(summary.status, StageStatus::Partial);
}

#[test]
fn combine_rows_with_implausible_values_are_excluded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = project(dir.path());
    write(
        &ctx.paths.raw_dir().join("combine.csv"),
        "player_name,position,height_in,weight_lb,forty,vertical\n\
         Arch Manning,QB,76,220,4.62,34\n\
         Carnell Tate,WR,75,195,45.5,38\n",
    );
    let summary = run_ingest(&ctx, SourceArg::Combine).expect("ingest combine");
    assert_eq!(summary.rows_in, 2);
    assert_eq!(summary.rows_out, 1);
    assert_eq!(summary.dropped, 1);
    assert_eq!(summary.status, StageStatus::Partial);

    let table = read_table(&ctx.paths.stage_output(processed::COMBINE)).expect("combine table");
    assert_eq!(table.height(), 1);
}

#[test]
fn board_position_filter_rejects_unknown_codes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = project(dir.path());
    let error = run_board(&ctx, Some("ATH"), 10).expect_err("unknown position");
    assert!(format!("{error:#}").contains("--position ATH"));
}

#[test]
fn dry_run_fetch_touches_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = project(dir.path());
    let client = ApiClient::new(DEFAULT_BASE_URL, None).expect("client");
    let summary = run_fetch_with(&ctx, &fetch_args(false), &client).expect("dry run");

    let outcome = summary.outcome.as_ref().expect("outcome");
    assert!(outcome.dry_run);
    assert_eq!(outcome.rows(), 0);
    assert!(outcome.url.ends_with("/stats/player/season"));
    assert_eq!(summary.usage.calls_used, 0);
    assert!(summary.saved.is_none());
    assert!(!ctx.paths.usage_dir().exists());
    assert!(!ctx.paths.fetched_dir().exists());
}

#[test]
fn execute_without_key_fails_before_reserving() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = project(dir.path());
    let client = ApiClient::new(DEFAULT_BASE_URL, None).expect("client");
    let error = run_fetch_with(&ctx, &fetch_args(true), &client).expect_err("no key");
    assert!(format!("{error:#}").contains("CFBD_API_KEY"));
    assert!(!ctx.paths.usage_dir().exists());

    let usage = run_usage(&ctx, 1000).expect("usage");
    assert!(!usage.ledger_exists);
    assert_eq!(usage.status.calls_remaining(), 1000);
    assert_eq!(usage.month, "2026-03");
}

#[test]
fn unknown_dataset_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = project(dir.path());
    let client = ApiClient::new(DEFAULT_BASE_URL, None).expect("client");
    let mut args = fetch_args(false);
    args.dataset = "draft_picks".to_string();
    assert!(run_fetch_with(&ctx, &args, &client).is_err());
}
