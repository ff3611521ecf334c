//! Blocking API client behind the usage ledger.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, info_span};

use crate::dataset::FetchRequest;
use crate::error::{FetchError, Result};
use crate::ledger::{UsageLedger, UsageStatus};

pub const PROVIDER: &str = "cfbd";
pub const DEFAULT_BASE_URL: &str = "https://api.collegefootballdata.com";
pub const API_KEY_VAR: &str = "CFBD_API_KEY";
pub const DEFAULT_MAX_CALLS: u32 = 1000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether a fetch may touch the network and the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    DryRun,
    Execute,
}

/// Result of one fetch. `data` is `None` on a dry run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchOutcome {
    pub dry_run: bool,
    pub url: String,
    pub params: BTreeMap<String, Value>,
    pub usage: UsageStatus,
    pub data: Option<Value>,
}

impl FetchOutcome {
    /// Rows in the payload; dry runs fetch nothing.
    pub fn rows(&self) -> usize {
        match &self.data {
            Some(Value::Array(rows)) => rows.len(),
            Some(Value::Null) | None => 0,
            Some(_) => 1,
        }
    }
}

pub struct ApiClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
        })
    }

    /// Client for the default host with the key from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(DEFAULT_BASE_URL, std::env::var(API_KEY_VAR).ok())
    }

    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }

    /// Runs one request.
    ///
    /// A dry run reports what would be sent and the current usage without
    /// touching the network or the ledger. An executed run needs an API key,
    /// reserves a call (persisting the ledger) and only then dispatches.
    pub fn fetch(
        &self,
        ledger: &mut UsageLedger,
        request: &FetchRequest,
        mode: FetchMode,
        now: DateTime<Utc>,
    ) -> Result<FetchOutcome> {
        let dataset = request.dataset;
        let _span = info_span!("fetch", dataset = %dataset, year = request.year).entered();
        let endpoint = dataset.endpoint();
        let url = self.url(endpoint);
        let params = request.params();

        if mode == FetchMode::DryRun {
            let usage = ledger.status();
            info!(
                url = %url,
                calls_used = usage.calls_used,
                calls_remaining = usage.calls_remaining(),
                "dry run; nothing sent"
            );
            return Ok(FetchOutcome {
                dry_run: true,
                url,
                params,
                usage,
                data: None,
            });
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingApiKey { var: API_KEY_VAR })?;
        let usage = ledger.reserve(endpoint, &params, now)?;

        let query: Vec<(String, String)> = params
            .iter()
            .map(|(key, value)| (key.clone(), query_value(value)))
            .collect();
        let target = Url::parse_with_params(&url, &query)
            .map_err(|e| FetchError::Network(format!("invalid URL {url}: {e}")))?;
        debug!(url = %target, "sending request");
        let response = self
            .client
            .get(target)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, format!("draftboard/{}", env!("CARGO_PKG_VERSION")))
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "unreadable response body".to_string());
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let data: Value = response.json()?;
        let outcome = FetchOutcome {
            dry_run: false,
            url,
            params,
            usage,
            data: Some(data),
        };
        info!(rows = outcome.rows(), calls_used = usage.calls_used, "fetched");
        Ok(outcome)
    }
}

/// Writes a fetched payload to `<dir>/<dataset>_<year>.json`. Dry runs write
/// nothing and return `None`.
pub fn save_payload(
    dir: &Path,
    request: &FetchRequest,
    outcome: &FetchOutcome,
) -> Result<Option<PathBuf>> {
    let Some(data) = &outcome.data else {
        return Ok(None);
    };
    fs::create_dir_all(dir).map_err(|e| FetchError::io("create directory", dir, e))?;
    let path = dir.join(format!("{}_{}.json", request.dataset, request.year));
    let bytes = serde_json::to_vec_pretty(data).map_err(|source| FetchError::Json {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, bytes).map_err(|e| FetchError::io("write", &path, e))?;
    Ok(Some(path))
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_with_one_slash() {
        let client = ApiClient::new("https://example.test/", None).unwrap();
        assert_eq!(client.url("/games"), "https://example.test/games");
        assert_eq!(client.url("roster"), "https://example.test/roster");
    }

    #[test]
    fn query_values_are_unquoted() {
        assert_eq!(query_value(&Value::from("regular")), "regular");
        assert_eq!(query_value(&Value::from(2025)), "2025");
    }
}
