//! Config directory resolution.

use std::path::{Path, PathBuf};

/// Environment variable for overriding the config directory.
pub const CONFIG_ENV_VAR: &str = "DRAFTBOARD_CONFIG_DIR";

/// Weight tables file name inside a config directory.
pub const WEIGHTS_FILE: &str = "weights.toml";

/// Position alias table file name inside a config directory.
pub const ALIASES_FILE: &str = "position_aliases.csv";

/// Resolve the config directory to load from.
///
/// Resolution order:
/// 1. an explicit `--config-dir`
/// 2. `DRAFTBOARD_CONFIG_DIR`
/// 3. none, meaning the compiled-in defaults
pub fn resolve_config_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = explicit {
        return Some(dir.to_path_buf());
    }
    std::env::var_os(CONFIG_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
