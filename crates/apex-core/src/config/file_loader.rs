//! File-based configuration loading

use super::model::ApexConfig;
use crate::error::{ApexError, ApexResult, ResultExt};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file location (`~/.apex/config.json`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".apex").join("config.json"))
}

/// Load configuration from a JSON file
pub fn load_from_file(path: &Path) -> ApexResult<ApexConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ApexError::config_with_action(
            format!("Failed to read config file {}: {}", path.display(), e),
            "Check the --config-file path, or omit it to use ~/.apex/config.json.",
        )
    })?;

    let config: ApexConfig = serde_json::from_str(&content)
        .config_context(format!("Invalid config file {}", path.display()))?;

    debug!("Loaded config from {:?} ({} org(s))", path, config.orgs.len());
    Ok(config)
}

/// Load the default config file, or defaults when it does not exist
pub fn load_default_file() -> ApexResult<ApexConfig> {
    match default_config_path() {
        Some(path) if path.exists() => load_from_file(&path),
        _ => Ok(ApexConfig::default()),
    }
}
