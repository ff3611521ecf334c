//! Markdown reports for the draft board pipeline.
//!
//! Each stage writes one report under `<out>/reports/`; the report stage
//! adds an index page and one page per prospect.

pub mod markdown;
pub mod players;
pub mod stages;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

pub use markdown::Markdown;
pub use players::{index_page, player_page, player_page_path, write_player_pages};
pub use stages::{
    board_report, calibration_report, label_report, mock_report, qa_section, stage_report,
};

pub const REPORTS_DIR: &str = "reports";

/// Writes `<out>/reports/<name>.md` and returns its path.
pub fn write_report(out_dir: &Path, name: &str, text: &str) -> Result<PathBuf> {
    let dir = out_dir.join(REPORTS_DIR);
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(format!("{name}.md"));
    fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), "report written");
    Ok(path)
}
