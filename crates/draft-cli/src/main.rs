//! draftboard CLI.

use std::io::{self, IsTerminal};

use chrono::Utc;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use draft_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg, TableFormatArg};
use draft_cli::commands::{
    RunContext, run_all, run_board, run_calibrate, run_fetch, run_ingest, run_label, run_mock,
    run_positions, run_report, run_seed, run_usage,
};
use draft_cli::logging::{LogConfig, LogFormat, init_logging};
use draft_cli::paths::ProjectPaths;
use draft_cli::summary::{print_fetch_summary, print_stage_summaries, print_usage_summary};
use draft_cli::types::StageSummary;
use draft_ingest::TableFormat;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let format = match cli.table_format {
        TableFormatArg::Csv => TableFormat::Csv,
        TableFormatArg::Parquet => TableFormat::Parquet,
    };
    let paths = ProjectPaths::new(&cli.root, format);
    let ctx = RunContext::load(paths, cli.config_dir.as_deref(), Utc::now())?;

    let stage = |summary: StageSummary| {
        print_stage_summaries(std::slice::from_ref(&summary));
        0
    };
    let code = match &cli.command {
        Command::Seed(args) => stage(run_seed(&ctx, args.year)?),
        Command::Ingest(args) => stage(run_ingest(&ctx, args.source)?),
        Command::Label => stage(run_label(&ctx)?),
        Command::Calibrate => stage(run_calibrate(&ctx)?),
        Command::Board(args) => stage(run_board(&ctx, args.position.as_deref(), args.top)?),
        Command::Mock(args) => stage(run_mock(&ctx, args.rounds)?),
        Command::Report(args) => stage(run_report(&ctx, args.position.as_deref())?),
        Command::All(args) => {
            let summaries = run_all(&ctx, args.year, args.rounds, args.top)?;
            print_stage_summaries(&summaries);
            0
        }
        Command::Fetch(args) => {
            let summary = run_fetch(&ctx, args)?;
            print_fetch_summary(&summary);
            i32::from(summary.refused.is_some())
        }
        Command::Usage(args) => {
            print_usage_summary(&run_usage(&ctx, args.max_calls)?);
            0
        }
        Command::Positions => {
            run_positions(&ctx)?;
            0
        }
    };
    Ok(code)
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
