//! Project directory layout.
//!
//! ```text
//! <root>/data/raw/          source tables (csv or parquet)
//! <root>/data/raw/cfbd/     fetched API payloads
//! <root>/data/processed/    stage outputs
//! <root>/data/outputs/      reports/ and players/
//! <root>/api_usage/         monthly quota ledgers
//! ```

use std::path::{Path, PathBuf};

use draft_ingest::{TableFormat, resolve_table, table_path};

/// Raw source table stems.
pub mod raw {
    pub const SEED: &str = "prospect_seed";
    pub const CONSENSUS: &str = "consensus_boards";
    pub const COMBINE: &str = "combine";
    pub const PRODUCTION: &str = "production";
    pub const TEAM_NEEDS: &str = "team_needs";
    pub const HISTORICAL: &str = "historical_drafts";
    pub const GRADE_SNAPSHOTS: &str = "grade_snapshots";
    pub const COMP_PROFILES: &str = "historical_profiles";
    pub const DRAFT_ORDER: &str = "draft_order";
    pub const COMP_PICKS: &str = "comp_picks";
}

/// Stage output stems.
pub mod processed {
    pub const PROSPECTS: &str = "prospects_seed";
    pub const CONSENSUS: &str = "consensus";
    pub const COMBINE: &str = "combine";
    pub const PRODUCTION: &str = "production";
    pub const TEAM_NEEDS: &str = "team_needs";
    pub const HISTORICAL: &str = "historical";
    pub const LABELS: &str = "historical_labels";
    pub const CALIBRATION_BINS: &str = "calibration_bins";
    pub const CALIBRATION_BACKTEST: &str = "calibration_backtest";
    pub const ROI_PRIORS: &str = "roi_priors";
    pub const BOARD: &str = "big_board";
    pub const MOCK_PICKS: &str = "mock_picks";
    pub const MOCK_TRADE_FLAGS: &str = "mock_trade_flags";
    pub const CALIBRATION_MODEL: &str = "calibration.json";
}

#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
    format: TableFormat,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>, format: TableFormat) -> Self {
        Self {
            root: root.into(),
            format,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn format(&self) -> TableFormat {
        self.format
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("data").join("raw")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join("data").join("processed")
    }

    pub fn outputs_dir(&self) -> PathBuf {
        self.root.join("data").join("outputs")
    }

    pub fn usage_dir(&self) -> PathBuf {
        self.root.join("api_usage")
    }

    pub fn fetched_dir(&self) -> PathBuf {
        self.raw_dir().join(draft_fetch::PROVIDER)
    }

    /// Raw input `stem`: an existing csv or parquet file, otherwise the path
    /// it would have in the preferred format (readers treat it as missing).
    pub fn raw_input(&self, stem: &str) -> PathBuf {
        let dir = self.raw_dir();
        resolve_table(&dir, stem, self.format).unwrap_or_else(|| table_path(&dir, stem, self.format))
    }

    /// Previous stage output `stem`, resolved the same way as raw inputs.
    pub fn stage_input(&self, stem: &str) -> PathBuf {
        let dir = self.processed_dir();
        resolve_table(&dir, stem, self.format).unwrap_or_else(|| table_path(&dir, stem, self.format))
    }

    /// Where this run writes stage output `stem`.
    pub fn stage_output(&self, stem: &str) -> PathBuf {
        table_path(&self.processed_dir(), stem, self.format)
    }

    pub fn processed_file(&self, name: &str) -> PathBuf {
        self.processed_dir().join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted() {
        let paths = ProjectPaths::new("/work", TableFormat::Parquet);
        assert_eq!(
            paths.stage_output(processed::BOARD),
            PathBuf::from("/work/data/processed/big_board.parquet")
        );
        assert_eq!(paths.usage_dir(), PathBuf::from("/work/api_usage"));
        assert_eq!(paths.fetched_dir(), PathBuf::from("/work/data/raw/cfbd"));
    }

    #[test]
    fn missing_input_uses_preferred_format() {
        let paths = ProjectPaths::new("/nowhere", TableFormat::Csv);
        assert_eq!(
            paths.raw_input(raw::SEED),
            PathBuf::from("/nowhere/data/raw/prospect_seed.csv")
        );
    }
}
