//! Configuration management
//!
//! Configuration is read from `~/.apex/config.json` (or `--config-file`) and
//! then overlaid with `APEX_*` environment variables.

mod connection;
mod env_loader;
mod file_loader;
mod model;

pub use connection::{OrgConnection, resolve_connection};
pub use env_loader::{ENV_ORG_ALIAS, load_from_env, load_from_vars};
pub use file_loader::{default_config_path, load_default_file, load_from_file};
pub use model::{
    ApexConfig, DEFAULT_API_VERSION, DEFAULT_POLL_INTERVAL_MS, DEFAULT_REQUEST_TIMEOUT_SECS,
    OrgConfig,
};

use crate::error::ApexResult;
use std::path::Path;

/// Load configuration from file and environment.
///
/// An explicit path must exist; the default path is optional.
pub fn load_config(explicit_path: Option<&Path>) -> ApexResult<ApexConfig> {
    let mut config = match explicit_path {
        Some(path) => load_from_file(path)?,
        None => load_default_file()?,
    };
    config.merge(load_from_env()?);
    Ok(config)
}
