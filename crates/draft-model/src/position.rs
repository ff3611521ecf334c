//! Canonical position buckets and the alias table that maps source strings
//! onto them.
//!
//! Ranked boards, combine sheets and historical draft tables all spell
//! positions differently (`SAF`, `OLB-EDGE`, `IOLG`, ...). Every stage
//! resolves raw strings through a [`PositionAliases`] table; an unmapped
//! string is an error and is never passed through as-is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// One of the 11 canonical position buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    Ot,
    Iol,
    Edge,
    Dt,
    Lb,
    Cb,
    S,
}

impl Position {
    /// All buckets in board display order.
    pub const ALL: [Position; 11] = [
        Position::Qb,
        Position::Rb,
        Position::Wr,
        Position::Te,
        Position::Ot,
        Position::Iol,
        Position::Edge,
        Position::Dt,
        Position::Lb,
        Position::Cb,
        Position::S,
    ];

    /// Returns the canonical code (`QB`, `IOL`, `EDGE`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Wr => "WR",
            Position::Te => "TE",
            Position::Ot => "OT",
            Position::Iol => "IOL",
            Position::Edge => "EDGE",
            Position::Dt => "DT",
            Position::Lb => "LB",
            Position::Cb => "CB",
            Position::S => "S",
        }
    }

    /// Offensive positions. Scheme fit reads the offensive scheme for these.
    pub fn is_offense(&self) -> bool {
        matches!(
            self,
            Position::Qb
                | Position::Rb
                | Position::Wr
                | Position::Te
                | Position::Ot
                | Position::Iol
        )
    }

    /// Offensive and defensive line buckets.
    pub fn is_trenches(&self) -> bool {
        matches!(
            self,
            Position::Ot | Position::Iol | Position::Edge | Position::Dt
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = ModelError;

    /// Parses a canonical code only. Source spellings go through
    /// [`PositionAliases::resolve`].
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Position::ALL
            .into_iter()
            .find(|position| position.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownPosition {
                raw: s.to_string(),
            })
    }
}

/// Alias table from source position strings to canonical buckets.
///
/// Keys are stored upper-cased and trimmed, so lookups are case-insensitive.
/// Every canonical code always resolves to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionAliases {
    map: BTreeMap<String, Position>,
}

impl PositionAliases {
    /// Creates a table holding only the identity mapping for each bucket.
    pub fn identity() -> Self {
        let map = Position::ALL
            .into_iter()
            .map(|position| (position.as_str().to_string(), position))
            .collect();
        Self { map }
    }

    /// Adds an alias. Returns the previous target if the alias was already
    /// mapped somewhere else.
    pub fn insert(&mut self, alias: &str, position: Position) -> Option<Position> {
        let key = normalize_alias(alias);
        match self.map.insert(key, position) {
            Some(previous) if previous != position => Some(previous),
            _ => None,
        }
    }

    /// Resolves a raw source string to its canonical bucket.
    pub fn resolve(&self, raw: &str) -> Result<Position> {
        self.map
            .get(&normalize_alias(raw))
            .copied()
            .ok_or_else(|| ModelError::UnknownPosition {
                raw: raw.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates `(alias, bucket)` pairs in alias order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Position)> {
        self.map
            .iter()
            .map(|(alias, position)| (alias.as_str(), *position))
    }
}

impl Default for PositionAliases {
    fn default() -> Self {
        Self::identity()
    }
}

fn normalize_alias(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
