use std::path::PathBuf;

use draft_fetch::{FetchOutcome, UsageStatus};
use draft_model::{QaReport, StageStatus};

/// What one stage run produced.
#[derive(Debug, Clone)]
pub struct StageSummary {
    pub stage: String,
    pub status: StageStatus,
    pub rows_in: usize,
    pub rows_out: usize,
    pub dropped: u64,
    pub warnings: u64,
    pub outputs: Vec<PathBuf>,
}

impl StageSummary {
    pub fn from_qa(qa: &QaReport, outputs: Vec<PathBuf>) -> Self {
        Self {
            stage: qa.stage.clone(),
            status: qa.status,
            rows_in: qa.rows_in,
            rows_out: qa.rows_out,
            dropped: qa.dropped(),
            warnings: qa.warning_count(),
            outputs,
        }
    }

    /// Summary for a stage without row-level QA.
    pub fn counted(stage: &str, rows_in: usize, rows_out: usize, outputs: Vec<PathBuf>) -> Self {
        Self {
            stage: stage.to_string(),
            status: if rows_in == 0 {
                StageStatus::EmptyInput
            } else {
                StageStatus::Ok
            },
            rows_in,
            rows_out,
            dropped: 0,
            warnings: 0,
            outputs,
        }
    }
}

/// Result of `draftboard fetch`.
#[derive(Debug)]
pub struct FetchSummary {
    pub dataset: String,
    pub year: i32,
    pub ledger: PathBuf,
    pub outcome: Option<FetchOutcome>,
    pub saved: Option<PathBuf>,
    /// Set when the request was refused or failed without aborting the run.
    pub refused: Option<String>,
    pub usage: UsageStatus,
}

/// Result of `draftboard usage`.
#[derive(Debug)]
pub struct UsageSummary {
    pub provider: String,
    pub month: String,
    pub ledger: PathBuf,
    pub ledger_exists: bool,
    pub status: UsageStatus,
    pub last_call: Option<String>,
}
