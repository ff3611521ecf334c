use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Datelike, Utc};
use comfy_table::Table;
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{info, info_span, warn};

use draft_fetch::{
    ApiClient, Dataset, FetchMode, FetchRequest, PROVIDER, UsageLedger, save_payload,
};
use draft_ingest::records::{
    backtest_frame, bins_frame, board_frame, combine_frame, consensus_frame, historical_frame,
    labels_frame, picks_frame, production_frame, prospects_frame, read_board, read_labels,
    read_prospects, read_roi_priors, roi_frame, team_needs_frame, trade_flags_frame,
};
use draft_ingest::{
    Ingested, list_table_files, read_combine, read_comp_picks, read_comp_profiles,
    read_consensus, read_draft_order, read_grade_snapshots, read_historical, read_production,
    read_seed_rows, read_table, read_team_needs, write_table,
};
use draft_model::{
    BoardEntry, CalibrationModel, Position, PositionAliases, QaReport, SourceRecord, StageStatus,
};
use draft_report::players::{INDEX_FILE, PLAYERS_DIR};
use draft_report::{
    board_report, calibration_report, label_report, mock_report, stage_report, write_player_pages,
    write_report,
};
use draft_standards::{Standards, load_standards};
use draft_transform::{
    BoardInputs, build_board, build_labels, build_order, build_prospects, build_roi_priors,
    calibrate, simulate, summarize_labels,
};
use draft_validate::{check_feature_columns, scrub_combine};

use crate::cli::{FetchArgs, SourceArg};
use crate::paths::{ProjectPaths, processed, raw};
use crate::summary::apply_table_style;
use crate::types::{FetchSummary, StageSummary, UsageSummary};

/// Everything a stage needs besides its own arguments.
pub struct RunContext {
    pub paths: ProjectPaths,
    pub standards: Standards,
    pub now: DateTime<Utc>,
}

impl RunContext {
    pub fn load(paths: ProjectPaths, config_dir: Option<&Path>, now: DateTime<Utc>) -> Result<Self> {
        let standards = load_standards(config_dir).context("load standards")?;
        info!(
            weights = %standards.weights_source,
            aliases = %standards.aliases_source,
            "standards loaded"
        );
        Ok(Self {
            paths,
            standards,
            now,
        })
    }

    fn aliases(&self) -> &PositionAliases {
        &self.standards.aliases
    }

    fn report(&self, name: &str, text: &str) -> Result<PathBuf> {
        write_report(&self.paths.outputs_dir(), name, text)
    }

    fn parse_position(&self, raw: Option<&str>) -> Result<Option<Position>> {
        raw.map(|value| {
            self.aliases()
                .resolve(value)
                .with_context(|| format!("--position {value}"))
        })
        .transpose()
    }
}

/// The upcoming draft: the current year until the April draft is done.
pub fn default_draft_year(now: DateTime<Utc>) -> i32 {
    if now.month() >= 5 {
        now.year() + 1
    } else {
        now.year()
    }
}

fn write_stage_table(path: &Path, frame: draft_ingest::Result<DataFrame>) -> Result<PathBuf> {
    let mut df = frame.with_context(|| format!("build {}", path.display()))?;
    write_table(path, &mut df).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), rows = df.height(), "table written");
    Ok(path.to_path_buf())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let bytes = serde_json::to_vec_pretty(value).context("serialize json")?;
    fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(path.to_path_buf())
}

/// Reads an earlier stage's table; an absent table reads as no rows.
fn read_stage<T>(path: &Path, reader: fn(&Path) -> draft_ingest::Result<Vec<T>>) -> Result<Vec<T>> {
    if !path.is_file() {
        warn!(path = %path.display(), "stage input not found; continuing with no rows");
        return Ok(Vec::new());
    }
    reader(path).with_context(|| format!("read {}", path.display()))
}

/// A stage inherits `missing_input` from the read that fed it.
fn keep_missing_status(source: &QaReport, stage: &mut QaReport) {
    if source.status == StageStatus::MissingInput {
        stage.status = StageStatus::MissingInput;
    }
}

fn feature_columns(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.as_str().to_string())
        .collect()
}

/// Refuses a board input table that carries outcome columns.
fn guard_features(table: &str, path: &Path) -> Result<()> {
    if !path.is_file() {
        return Ok(());
    }
    let df = read_table(path).with_context(|| format!("read {}", path.display()))?;
    check_feature_columns(table, &feature_columns(&df))?;
    Ok(())
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

pub fn run_seed(ctx: &RunContext, year: Option<i32>) -> Result<StageSummary> {
    let start = Instant::now();
    let input = ctx.paths.raw_input(raw::SEED);
    let seed = read_seed_rows(&input).with_context(|| format!("read {}", input.display()))?;
    let draft_year = year.unwrap_or_else(|| default_draft_year(ctx.now));
    let (prospects, mut qa) = build_prospects(&seed.rows, ctx.aliases(), draft_year);
    keep_missing_status(&seed.qa, &mut qa);

    let table = write_stage_table(
        &ctx.paths.stage_output(processed::PROSPECTS),
        prospects_frame(&prospects),
    )?;
    let report = ctx.report(
        "seed",
        &stage_report("Prospect seed", &display(&table), &qa, ctx.now),
    )?;
    info!(
        draft_year,
        rows = prospects.len(),
        status = %qa.status,
        duration_ms = start.elapsed().as_millis(),
        "seed complete"
    );
    Ok(StageSummary::from_qa(&qa, vec![table, report]))
}

impl SourceArg {
    pub const ALL: [SourceArg; 5] = [
        SourceArg::Consensus,
        SourceArg::Combine,
        SourceArg::Production,
        SourceArg::TeamNeeds,
        SourceArg::Historical,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SourceArg::Consensus => "consensus",
            SourceArg::Combine => "combine",
            SourceArg::Production => "production",
            SourceArg::TeamNeeds => "team_needs",
            SourceArg::Historical => "historical",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            SourceArg::Consensus => "Consensus boards",
            SourceArg::Combine => "Combine testing",
            SourceArg::Production => "College production",
            SourceArg::TeamNeeds => "Team needs",
            SourceArg::Historical => "Historical drafts",
        }
    }
}

/// Reads consensus boards from one stacked table, or from a directory
/// holding one table per board (the file stem names the board).
fn read_consensus_boards(
    paths: &ProjectPaths,
    aliases: &PositionAliases,
) -> Result<Ingested<SourceRecord>> {
    let dir = paths.raw_dir().join(raw::CONSENSUS);
    if !dir.is_dir() {
        let input = paths.raw_input(raw::CONSENSUS);
        return read_consensus(&input, aliases)
            .with_context(|| format!("read {}", input.display()));
    }
    let mut merged = Ingested::missing("consensus");
    for file in list_table_files(&dir).with_context(|| format!("list {}", dir.display()))? {
        let board = read_consensus(&file, aliases)
            .with_context(|| format!("read {}", file.display()))?;
        merged.rows.extend(board.rows);
        merged.qa.absorb(board.qa);
    }
    Ok(merged)
}

pub fn run_ingest(ctx: &RunContext, source: SourceArg) -> Result<StageSummary> {
    let _span = info_span!("ingest", source = source.name()).entered();
    let paths = &ctx.paths;
    let aliases = ctx.aliases();
    let read_context = |path: &Path| format!("read {}", path.display());

    let (qa, table) = match source {
        SourceArg::Consensus => {
            let ingested = read_consensus_boards(paths, aliases)?;
            let table = write_stage_table(
                &paths.stage_output(processed::CONSENSUS),
                consensus_frame(&ingested.rows),
            )?;
            (ingested.qa, table)
        }
        SourceArg::Combine => {
            let input = paths.raw_input(raw::COMBINE);
            let mut ingested =
                read_combine(&input, aliases).with_context(|| read_context(&input))?;
            scrub_combine(&mut ingested.rows, &mut ingested.qa);
            let table = write_stage_table(
                &paths.stage_output(processed::COMBINE),
                combine_frame(&ingested.rows),
            )?;
            (ingested.qa, table)
        }
        SourceArg::Production => {
            let input = paths.raw_input(raw::PRODUCTION);
            let ingested =
                read_production(&input, aliases).with_context(|| read_context(&input))?;
            let table = write_stage_table(
                &paths.stage_output(processed::PRODUCTION),
                production_frame(&ingested.rows),
            )?;
            (ingested.qa, table)
        }
        SourceArg::TeamNeeds => {
            let input = paths.raw_input(raw::TEAM_NEEDS);
            let ingested =
                read_team_needs(&input, aliases).with_context(|| read_context(&input))?;
            let table = write_stage_table(
                &paths.stage_output(processed::TEAM_NEEDS),
                team_needs_frame(&ingested.rows),
            )?;
            (ingested.qa, table)
        }
        SourceArg::Historical => {
            let input = paths.raw_input(raw::HISTORICAL);
            let ingested = read_historical(&input).with_context(|| read_context(&input))?;
            let table = write_stage_table(
                &paths.stage_output(processed::HISTORICAL),
                historical_frame(&ingested.rows),
            )?;
            (ingested.qa, table)
        }
    };

    let report = ctx.report(
        &format!("ingest_{}", source.name()),
        &stage_report(source.title(), &display(&table), &qa, ctx.now),
    )?;
    info!(rows = qa.rows_out, status = %qa.status, "ingest complete");
    Ok(StageSummary::from_qa(&qa, vec![table, report]))
}

pub fn run_label(ctx: &RunContext) -> Result<StageSummary> {
    let input = ctx.paths.stage_input(processed::HISTORICAL);
    let historical = read_historical(&input).with_context(|| format!("read {}", input.display()))?;
    let grading = &ctx.standards.grading;
    let (labels, mut qa) = build_labels(
        &historical.rows,
        ctx.aliases(),
        &grading.labels,
        &grading.censor,
    );
    keep_missing_status(&historical.qa, &mut qa);
    let summary = summarize_labels(&labels);

    let table = write_stage_table(&ctx.paths.stage_output(processed::LABELS), labels_frame(&labels))?;
    let report = ctx.report(
        "label",
        &label_report(&summary, &grading.censor, &qa, ctx.now),
    )?;
    info!(
        rows = summary.rows,
        weighted_rows = summary.weighted_rows,
        status = %qa.status,
        "labels built"
    );
    Ok(StageSummary::from_qa(&qa, vec![table, report]))
}

pub fn run_calibrate(ctx: &RunContext) -> Result<StageSummary> {
    let paths = &ctx.paths;
    let labels = read_stage(&paths.stage_input(processed::LABELS), read_labels)?;
    let snapshots_path = paths.raw_input(raw::GRADE_SNAPSHOTS);
    let snapshots = read_grade_snapshots(&snapshots_path, ctx.aliases())
        .with_context(|| format!("read {}", snapshots_path.display()))?;

    let output = calibrate(&labels, &snapshots.rows, &ctx.standards.grading.calibration);
    let priors = build_roi_priors(&labels);

    let outputs = vec![
        write_json(
            &paths.processed_file(processed::CALIBRATION_MODEL),
            &output.model,
        )?,
        write_stage_table(
            &paths.stage_output(processed::CALIBRATION_BINS),
            bins_frame(&output.bins),
        )?,
        write_stage_table(
            &paths.stage_output(processed::CALIBRATION_BACKTEST),
            backtest_frame(&output.backtest),
        )?,
        write_stage_table(&paths.stage_output(processed::ROI_PRIORS), roi_frame(&priors))?,
        ctx.report("calibrate", &calibration_report(&output, &priors, ctx.now))?,
    ];
    Ok(StageSummary::counted(
        "calibrate",
        labels.len(),
        output.model.sample_size,
        outputs,
    ))
}

/// The fitted model, if calibration ran on at least one row.
fn load_calibration(path: &Path) -> Result<Option<CalibrationModel>> {
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let model: CalibrationModel =
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    if model.sample_size == 0 {
        warn!(path = %path.display(), "calibration has no rows; probabilities skipped");
        return Ok(None);
    }
    Ok(Some(model))
}

fn filter_position(entries: &[BoardEntry], position: Option<Position>) -> Vec<BoardEntry> {
    entries
        .iter()
        .filter(|entry| position.is_none_or(|wanted| entry.prospect.position == wanted))
        .cloned()
        .collect()
}

pub fn run_board(ctx: &RunContext, position: Option<&str>, top: usize) -> Result<StageSummary> {
    let start = Instant::now();
    let position = ctx.parse_position(position)?;
    let paths = &ctx.paths;
    let aliases = ctx.aliases();

    let prospects_path = paths.stage_input(processed::PROSPECTS);
    let consensus_path = paths.stage_input(processed::CONSENSUS);
    let combine_path = paths.stage_input(processed::COMBINE);
    let production_path = paths.stage_input(processed::PRODUCTION);
    let teams_path = paths.stage_input(processed::TEAM_NEEDS);
    for (table, path) in [
        (processed::PROSPECTS, &prospects_path),
        (processed::CONSENSUS, &consensus_path),
        (processed::COMBINE, &combine_path),
        (processed::PRODUCTION, &production_path),
        (processed::TEAM_NEEDS, &teams_path),
    ] {
        guard_features(table, path)?;
    }

    let prospects = read_stage(&prospects_path, read_prospects)?;
    let consensus = read_consensus(&consensus_path, aliases)?;
    let combine = read_combine(&combine_path, aliases)?;
    let production = read_production(&production_path, aliases)?;
    let teams = read_team_needs(&teams_path, aliases)?;
    let comp_pool = read_comp_profiles(&paths.raw_input(raw::COMP_PROFILES), aliases)?;
    let calibration = load_calibration(&paths.processed_file(processed::CALIBRATION_MODEL))?;
    let roi_priors = read_stage(&paths.stage_input(processed::ROI_PRIORS), read_roi_priors)?;

    let build = build_board(
        BoardInputs {
            prospects: &prospects,
            consensus: &consensus.rows,
            combine: &combine.rows,
            production: &production.rows,
            teams: &teams.rows,
            comp_pool: &comp_pool.rows,
            calibration: calibration.as_ref(),
            roi_priors: &roi_priors,
        },
        &ctx.standards.grading,
    )?;

    let table = write_stage_table(&paths.stage_output(processed::BOARD), board_frame(&build.entries))?;
    let shown = filter_position(&build.entries, position);
    let report = ctx.report(
        "board",
        &board_report(&shown, &build.joins, &build.qa, top, ctx.now),
    )?;
    info!(
        prospects = build.entries.len(),
        calibrated = calibration.is_some(),
        duration_ms = start.elapsed().as_millis(),
        "board complete"
    );
    Ok(StageSummary::from_qa(&build.qa, vec![table, report]))
}

pub fn run_mock(ctx: &RunContext, rounds: u32) -> Result<StageSummary> {
    if rounds == 0 {
        bail!("--rounds must be at least 1");
    }
    let paths = &ctx.paths;
    let board = read_stage(&paths.stage_input(processed::BOARD), read_board)?;
    let teams = read_team_needs(&paths.stage_input(processed::TEAM_NEEDS), ctx.aliases())?;
    let order = read_draft_order(&paths.raw_input(raw::DRAFT_ORDER))?;
    let round_one: Vec<String> = if order.is_empty() {
        warn!("no draft order; using team needs order");
        teams.rows.iter().map(|team| team.team.clone()).collect()
    } else {
        order.rows
    };
    let comp_picks = read_comp_picks(&paths.raw_input(raw::COMP_PICKS))?;

    let slots = build_order(&round_one, &comp_picks.rows, rounds);
    let mock = simulate(&board, &teams.rows, &slots, &ctx.standards.grading.mock)?;

    let outputs = vec![
        write_stage_table(&paths.stage_output(processed::MOCK_PICKS), picks_frame(&mock.picks))?,
        write_stage_table(
            &paths.stage_output(processed::MOCK_TRADE_FLAGS),
            trade_flags_frame(&mock.trade_flags),
        )?,
        ctx.report("mock", &mock_report(&mock, ctx.now))?,
    ];
    Ok(StageSummary::counted(
        "mock",
        slots.len(),
        mock.picks.len(),
        outputs,
    ))
}

pub fn run_report(ctx: &RunContext, position: Option<&str>) -> Result<StageSummary> {
    let position = ctx.parse_position(position)?;
    let board = read_stage(&ctx.paths.stage_input(processed::BOARD), read_board)?;
    let entries = filter_position(&board, position);
    let out = ctx.paths.outputs_dir();
    let pages = write_player_pages(&out, &entries, ctx.now)?;
    Ok(StageSummary::counted(
        "report",
        board.len(),
        pages,
        vec![out.join(INDEX_FILE), out.join(PLAYERS_DIR)],
    ))
}

/// Every stage in order.
pub fn run_all(
    ctx: &RunContext,
    year: Option<i32>,
    rounds: u32,
    top: usize,
) -> Result<Vec<StageSummary>> {
    let _span = info_span!("all").entered();
    let mut summaries = vec![run_seed(ctx, year)?];
    for source in SourceArg::ALL {
        summaries.push(run_ingest(ctx, source)?);
    }
    summaries.push(run_label(ctx)?);
    summaries.push(run_calibrate(ctx)?);
    summaries.push(run_board(ctx, None, top)?);
    summaries.push(run_mock(ctx, rounds)?);
    summaries.push(run_report(ctx, None)?);
    Ok(summaries)
}

pub fn run_fetch(ctx: &RunContext, args: &FetchArgs) -> Result<FetchSummary> {
    let client = ApiClient::from_env().context("build API client")?;
    run_fetch_with(ctx, args, &client)
}

/// Runs `fetch` through `client`. Quota refusals and request failures are
/// reported in the summary; bad arguments and IO failures are errors.
pub fn run_fetch_with(ctx: &RunContext, args: &FetchArgs, client: &ApiClient) -> Result<FetchSummary> {
    let dataset: Dataset = args.dataset.parse()?;
    let mut request = FetchRequest::new(dataset, args.year);
    request.team = args.team.clone();
    request.conference = args.conference.clone();
    request.week = args.week;
    request.season_type = args.season_type.clone();
    let mode = if args.execute {
        FetchMode::Execute
    } else {
        FetchMode::DryRun
    };

    let mut ledger = UsageLedger::load(&ctx.paths.usage_dir(), PROVIDER, args.max_calls, ctx.now)?;
    let (outcome, saved, refused) = match client.fetch(&mut ledger, &request, mode, ctx.now) {
        Ok(outcome) => {
            let saved = save_payload(&ctx.paths.fetched_dir(), &request, &outcome)?;
            (Some(outcome), saved, None)
        }
        Err(error) if error.is_recoverable() => {
            warn!(%error, "request not completed");
            (None, None, Some(error.to_string()))
        }
        Err(error) => return Err(error.into()),
    };
    Ok(FetchSummary {
        dataset: dataset.to_string(),
        year: args.year,
        ledger: ledger.path().to_path_buf(),
        outcome,
        saved,
        refused,
        usage: ledger.status(),
    })
}

pub fn run_usage(ctx: &RunContext, max_calls: u32) -> Result<UsageSummary> {
    let ledger = UsageLedger::load(&ctx.paths.usage_dir(), PROVIDER, max_calls, ctx.now)?;
    Ok(UsageSummary {
        provider: ledger.provider().to_string(),
        month: ledger.month().to_string(),
        ledger: ledger.path().to_path_buf(),
        ledger_exists: ledger.path().is_file(),
        status: ledger.status(),
        last_call: ledger
            .state()
            .history
            .last()
            .map(|entry| format!("{} {}", entry.ts_utc, entry.endpoint)),
    })
}

pub fn run_positions(ctx: &RunContext) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Position", "Side", "Aliases"]);
    apply_table_style(&mut table);
    for position in Position::ALL {
        let aliases: Vec<&str> = ctx
            .aliases()
            .iter()
            .filter(|(alias, target)| *target == position && *alias != position.as_str())
            .map(|(alias, _)| alias)
            .collect();
        let side = if position.is_offense() {
            "offense"
        } else {
            "defense"
        };
        table.add_row(vec![
            position.as_str().to_string(),
            side.to_string(),
            if aliases.is_empty() {
                "-".to_string()
            } else {
                aliases.join(", ")
            },
        ]);
    }
    println!("{table}");
    println!("Aliases from {}", ctx.standards.aliases_source);
    Ok(())
}
