use std::path::{Path, PathBuf};

use draft_model::PositionAliases;

use crate::aliases::parse_position_aliases;
use crate::error::{Result, StandardsError};
use crate::paths::{ALIASES_FILE, WEIGHTS_FILE, resolve_config_dir};
use crate::weights::{GradingStandards, parse_grading_standards};

const EMBEDDED_WEIGHTS: &str = include_str!("../../../standards/weights.toml");
const EMBEDDED_ALIASES: &str = include_str!("../../../standards/position_aliases.csv");

/// Where a loaded table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StandardsSource {
    Embedded,
    File(PathBuf),
}

impl std::fmt::Display for StandardsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StandardsSource::Embedded => f.write_str("embedded"),
            StandardsSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loaded and validated standards.
#[derive(Debug, Clone)]
pub struct Standards {
    pub grading: GradingStandards,
    pub aliases: PositionAliases,
    pub weights_source: StandardsSource,
    pub aliases_source: StandardsSource,
}

/// Loads the compiled-in defaults.
pub fn load_embedded_standards() -> Result<Standards> {
    Ok(Standards {
        grading: parse_grading_standards(EMBEDDED_WEIGHTS, Path::new(WEIGHTS_FILE))?,
        aliases: parse_position_aliases(EMBEDDED_ALIASES, Path::new(ALIASES_FILE))?,
        weights_source: StandardsSource::Embedded,
        aliases_source: StandardsSource::Embedded,
    })
}

/// Loads standards from a config directory. A file absent from the
/// directory falls back to its compiled-in default.
pub fn load_standards_from_dir(dir: &Path) -> Result<Standards> {
    if !dir.is_dir() {
        return Err(StandardsError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "config directory not found"),
        ));
    }

    let weights_path = dir.join(WEIGHTS_FILE);
    let (grading, weights_source) = if weights_path.is_file() {
        let text = read_text(&weights_path)?;
        (
            parse_grading_standards(&text, &weights_path)?,
            StandardsSource::File(weights_path),
        )
    } else {
        (
            parse_grading_standards(EMBEDDED_WEIGHTS, Path::new(WEIGHTS_FILE))?,
            StandardsSource::Embedded,
        )
    };

    let aliases_path = dir.join(ALIASES_FILE);
    let (aliases, aliases_source) = if aliases_path.is_file() {
        let text = read_text(&aliases_path)?;
        (
            parse_position_aliases(&text, &aliases_path)?,
            StandardsSource::File(aliases_path),
        )
    } else {
        (
            parse_position_aliases(EMBEDDED_ALIASES, Path::new(ALIASES_FILE))?,
            StandardsSource::Embedded,
        )
    };

    Ok(Standards {
        grading,
        aliases,
        weights_source,
        aliases_source,
    })
}

/// Loads standards from `--config-dir`, then `DRAFTBOARD_CONFIG_DIR`, then
/// the compiled-in defaults.
pub fn load_standards(config_dir: Option<&Path>) -> Result<Standards> {
    match resolve_config_dir(config_dir) {
        Some(dir) => load_standards_from_dir(&dir),
        None => load_embedded_standards(),
    }
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| StandardsError::io(path, source))
}
