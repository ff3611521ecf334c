//! Athletic metrics with explicit provenance.
//!
//! A metric is either measured ([`MetricValue::Verified`]) or estimated
//! ([`MetricValue::Proxy`]) from some other signal. Tables store the value and
//! a `<metric>_source` column holding `verified` or `proxy:<derivation>`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// How a proxy value was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyDerivation {
    /// Combine drills scored against position baselines.
    CombineDrills,
    /// Profile estimate from frame, athletic score and rank.
    ProfileEstimate,
    /// Frame-and-rank heuristic used when no testing exists.
    RankFrame,
    /// Derived from draft slot and expected value (historical grades).
    DraftSlot,
}

impl ProxyDerivation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyDerivation::CombineDrills => "combine_drills",
            ProxyDerivation::ProfileEstimate => "profile_estimate",
            ProxyDerivation::RankFrame => "rank_frame",
            ProxyDerivation::DraftSlot => "draft_slot",
        }
    }
}

impl FromStr for ProxyDerivation {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combine_drills" => Ok(ProxyDerivation::CombineDrills),
            "profile_estimate" => Ok(ProxyDerivation::ProfileEstimate),
            "rank_frame" => Ok(ProxyDerivation::RankFrame),
            "draft_slot" => Ok(ProxyDerivation::DraftSlot),
            _ => Err(ModelError::InvalidMetricSource(s.to_string())),
        }
    }
}

/// A metric value tagged with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MetricValue {
    Verified(f64),
    Proxy {
        value: f64,
        derivation: ProxyDerivation,
    },
}

impl MetricValue {
    pub fn proxy(value: f64, derivation: ProxyDerivation) -> Self {
        MetricValue::Proxy { value, derivation }
    }

    pub fn value(&self) -> f64 {
        match self {
            MetricValue::Verified(value) => *value,
            MetricValue::Proxy { value, .. } => *value,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, MetricValue::Verified(_))
    }

    /// Same provenance, different value.
    pub fn with_value(&self, value: f64) -> Self {
        match self {
            MetricValue::Verified(_) => MetricValue::Verified(value),
            MetricValue::Proxy { derivation, .. } => MetricValue::Proxy {
                value,
                derivation: *derivation,
            },
        }
    }

    /// Label written to the `<metric>_source` column.
    pub fn source_label(&self) -> String {
        match self {
            MetricValue::Verified(_) => "verified".to_string(),
            MetricValue::Proxy { derivation, .. } => format!("proxy:{}", derivation.as_str()),
        }
    }

    /// Rebuilds a metric from its value and `<metric>_source` label.
    pub fn from_parts(value: f64, source: &str) -> Result<Self> {
        let trimmed = source.trim();
        if trimmed.eq_ignore_ascii_case("verified") {
            return Ok(MetricValue::Verified(value));
        }
        match trimmed.split_once(':') {
            Some((kind, derivation)) if kind.eq_ignore_ascii_case("proxy") => {
                Ok(MetricValue::proxy(value, derivation.parse()?))
            }
            _ => Err(ModelError::InvalidMetricSource(source.to_string())),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ({})", self.value(), self.source_label())
    }
}
