//! Monthly API call ledger.
//!
//! One JSON file per provider and calendar month (UTC) under the usage
//! directory: `<provider>_usage_<YYYY-MM>.json`. A call is reserved, and the
//! file rewritten, before the request is dispatched.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FetchError, Result};

/// One dispatched call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub ts_utc: String,
    pub endpoint: String,
    #[serde(default)]
    pub params: BTreeMap<String, serde_json::Value>,
}

/// Persisted ledger state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageState {
    pub month: String,
    #[serde(default)]
    pub calls_used: u32,
    pub max_calls: u32,
    #[serde(default)]
    pub history: Vec<UsageEntry>,
}

/// Point-in-time view of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageStatus {
    pub calls_used: u32,
    pub max_calls: u32,
}

impl UsageStatus {
    pub fn calls_remaining(&self) -> u32 {
        self.max_calls.saturating_sub(self.calls_used)
    }
}

pub fn month_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m").to_string()
}

pub fn usage_path(dir: &Path, provider: &str, month: &str) -> PathBuf {
    dir.join(format!("{provider}_usage_{month}.json"))
}

/// Call counter for one provider and month.
#[derive(Debug, Clone)]
pub struct UsageLedger {
    provider: String,
    path: PathBuf,
    state: UsageState,
}

impl UsageLedger {
    /// Loads the ledger for the month containing `now`.
    ///
    /// A missing file starts a fresh month at `max_calls`. An existing file
    /// keeps its own cap. Loading never touches the filesystem beyond the
    /// read.
    pub fn load(dir: &Path, provider: &str, max_calls: u32, now: DateTime<Utc>) -> Result<Self> {
        let month = month_key(now);
        let path = usage_path(dir, provider, &month);
        let state = if path.is_file() {
            let text = fs::read_to_string(&path).map_err(|e| FetchError::io("read", &path, e))?;
            let mut state: UsageState =
                serde_json::from_str(&text).map_err(|source| FetchError::Json {
                    path: path.clone(),
                    source,
                })?;
            if state.month.is_empty() {
                state.month = month;
            }
            state
        } else {
            UsageState {
                month,
                calls_used: 0,
                max_calls,
                history: Vec::new(),
            }
        };
        debug!(
            provider,
            month = %state.month,
            calls_used = state.calls_used,
            max_calls = state.max_calls,
            "usage ledger loaded"
        );
        Ok(Self {
            provider: provider.to_string(),
            path,
            state,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn month(&self) -> &str {
        &self.state.month
    }

    pub fn state(&self) -> &UsageState {
        &self.state
    }

    pub fn status(&self) -> UsageStatus {
        UsageStatus {
            calls_used: self.state.calls_used,
            max_calls: self.state.max_calls,
        }
    }

    /// Counts one call and persists the ledger.
    ///
    /// Fails with [`FetchError::QuotaExceeded`] when the cap is already
    /// reached; the state is left unchanged in that case.
    pub fn reserve(
        &mut self,
        endpoint: &str,
        params: &BTreeMap<String, serde_json::Value>,
        now: DateTime<Utc>,
    ) -> Result<UsageStatus> {
        let used = self.state.calls_used;
        let max = self.state.max_calls;
        if used >= max {
            return Err(FetchError::QuotaExceeded {
                provider: self.provider.clone(),
                used,
                max,
            });
        }
        self.state.calls_used = used + 1;
        self.state.history.push(UsageEntry {
            ts_utc: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            endpoint: endpoint.to_string(),
            params: params.clone(),
        });
        if let Err(error) = self.save() {
            self.state.calls_used = used;
            self.state.history.pop();
            return Err(error);
        }
        info!(
            provider = %self.provider,
            endpoint,
            calls_used = self.state.calls_used,
            max_calls = max,
            "API call reserved"
        );
        Ok(self.status())
    }

    /// Writes the ledger through a temp file and rename.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| FetchError::io("create directory", parent, e))?;
        }
        let bytes = serde_json::to_vec_pretty(&self.state).map_err(|source| {
            FetchError::Json {
                path: self.path.clone(),
                source,
            }
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = File::create(&temp_path).map_err(|e| FetchError::io("create", &temp_path, e))?;
        file.write_all(&bytes)
            .map_err(|e| FetchError::io("write", &temp_path, e))?;
        file.sync_all()
            .map_err(|e| FetchError::io("sync", &temp_path, e))?;
        fs::rename(&temp_path, &self.path).map_err(|source| FetchError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}
