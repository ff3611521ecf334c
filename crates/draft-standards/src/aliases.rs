//! Position alias table loaded from `position_aliases.csv`.

use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;

use draft_model::{Position, PositionAliases};

use crate::error::{Result, StandardsError};

#[derive(Debug, Deserialize)]
struct AliasRow {
    alias: String,
    position: String,
}

/// Parses an `alias,position` table.
///
/// Every target must be a canonical code, and an alias may not map to two
/// different buckets. Identity mappings for all canonical codes are always
/// present.
pub fn parse_position_aliases(text: &str, path: &Path) -> Result<PositionAliases> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.trim_start_matches('\u{feff}').as_bytes());
    let mut aliases = PositionAliases::identity();
    for row in reader.deserialize::<AliasRow>() {
        let row = row.map_err(|error| StandardsError::Csv {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        if row.alias.is_empty() {
            continue;
        }
        let target: Position =
            row.position
                .parse()
                .map_err(|_| StandardsError::InvalidAlias {
                    alias: row.alias.clone(),
                    target: row.position.clone(),
                })?;
        if let Some(first) = aliases.insert(&row.alias, target) {
            return Err(StandardsError::ConflictingAlias {
                alias: row.alias,
                first,
                second: target,
            });
        }
    }
    Ok(aliases)
}
