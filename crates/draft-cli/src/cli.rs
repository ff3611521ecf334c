//! CLI argument definitions for `draftboard`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "draftboard",
    version,
    about = "NFL draft prospect grading pipeline",
    long_about = "Build a graded big board and mock draft from prospect inputs.\n\n\
                  Stages run in order: seed, ingest, label, calibrate, board, mock, report.\n\
                  Each stage reads the previous stage's tables and writes a markdown report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Project directory holding `data/` and `api_usage/`.
    #[arg(long = "root", value_name = "DIR", default_value = ".", global = true)]
    pub root: PathBuf,

    /// Directory with `weights.toml` and `position_aliases.csv` overrides
    /// (falls back to `DRAFTBOARD_CONFIG_DIR`).
    #[arg(long = "config-dir", value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Table format for stage outputs.
    #[arg(long = "table-format", value_enum, default_value = "csv", global = true)]
    pub table_format: TableFormatArg,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize the roster seed into the prospect table.
    Seed(SeedArgs),

    /// Normalize one source dataset.
    Ingest(IngestArgs),

    /// Derive outcome labels and censor weights from historical drafts.
    Label,

    /// Fit grade calibration, grade bins, the year backtest and ROI priors.
    Calibrate,

    /// Grade every prospect and rank the big board.
    Board(BoardArgs),

    /// Simulate a mock draft from the big board.
    Mock(MockArgs),

    /// Write per-player pages and the board index.
    Report(ReportArgs),

    /// Pull one dataset from the college stats API (dry run by default).
    Fetch(FetchArgs),

    /// Show this month's API usage.
    Usage(UsageArgs),

    /// List canonical positions and their aliases.
    Positions,

    /// Run seed, every ingester, label, calibrate, board, mock and report.
    All(AllArgs),
}

#[derive(Args)]
pub struct SeedArgs {
    /// Draft year for seed rows that do not carry one.
    #[arg(long = "year", value_name = "YEAR")]
    pub year: Option<i32>,
}

#[derive(Args)]
pub struct IngestArgs {
    /// Source dataset to normalize.
    #[arg(value_enum)]
    pub source: SourceArg,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Consensus,
    Combine,
    Production,
    TeamNeeds,
    Historical,
}

#[derive(Args)]
pub struct BoardArgs {
    /// Only list this position in the board report.
    #[arg(long = "position", value_name = "POS")]
    pub position: Option<String>,

    /// Rows in the board report.
    #[arg(long = "top", value_name = "N", default_value_t = 50)]
    pub top: usize,
}

#[derive(Args)]
pub struct MockArgs {
    /// Number of rounds to simulate.
    #[arg(long = "rounds", value_name = "N", default_value_t = 1)]
    pub rounds: u32,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Only write pages for this position.
    #[arg(long = "position", value_name = "POS")]
    pub position: Option<String>,
}

#[derive(Args)]
pub struct FetchArgs {
    /// Dataset to pull, e.g. `player_season_stats`.
    #[arg(long = "dataset", value_name = "NAME")]
    pub dataset: String,

    /// Season year.
    #[arg(long = "year", value_name = "YEAR")]
    pub year: i32,

    #[arg(long = "team", value_name = "TEAM")]
    pub team: Option<String>,

    #[arg(long = "conference", value_name = "CONF")]
    pub conference: Option<String>,

    #[arg(long = "week", value_name = "WEEK")]
    pub week: Option<u32>,

    /// Season type for game-level datasets.
    #[arg(long = "season-type", value_name = "TYPE", default_value = "regular")]
    pub season_type: String,

    /// Report the request without sending it (the default).
    #[arg(long = "dry-run", conflicts_with = "execute")]
    pub dry_run: bool,

    /// Send the request and count it against the monthly cap.
    #[arg(long = "execute")]
    pub execute: bool,

    /// Monthly call cap used when this month's ledger does not exist yet.
    #[arg(long = "max-calls", value_name = "N", default_value_t = draft_fetch::DEFAULT_MAX_CALLS)]
    pub max_calls: u32,
}

#[derive(Args)]
pub struct UsageArgs {
    /// Monthly call cap used when this month's ledger does not exist yet.
    #[arg(long = "max-calls", value_name = "N", default_value_t = draft_fetch::DEFAULT_MAX_CALLS)]
    pub max_calls: u32,
}

#[derive(Args)]
pub struct AllArgs {
    /// Draft year for seed rows that do not carry one.
    #[arg(long = "year", value_name = "YEAR")]
    pub year: Option<i32>,

    /// Mock draft rounds.
    #[arg(long = "rounds", value_name = "N", default_value_t = 1)]
    pub rounds: u32,

    /// Rows in the board report.
    #[arg(long = "top", value_name = "N", default_value_t = 50)]
    pub top: usize,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TableFormatArg {
    Csv,
    Parquet,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
