//! Environment variable-based configuration loading

use super::model::{ApexConfig, OrgConfig};
use crate::error::{ApexError, ApexResult};
use std::env;

/// Alias under which an org defined purely by environment variables is registered
pub const ENV_ORG_ALIAS: &str = "env";

/// Load configuration from `APEX_*` environment variables
pub fn load_from_env() -> ApexResult<ApexConfig> {
    load_from_vars(|name| env::var(name).ok())
}

/// Load configuration from an arbitrary variable lookup
pub fn load_from_vars<F>(lookup: F) -> ApexResult<ApexConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ApexConfig::default();

    if let (Some(instance_url), Some(access_token)) =
        (lookup("APEX_INSTANCE_URL"), lookup("APEX_ACCESS_TOKEN"))
    {
        config.orgs.insert(
            ENV_ORG_ALIAS.to_string(),
            OrgConfig {
                instance_url,
                access_token,
                username: lookup("APEX_USERNAME"),
                api_version: None,
            },
        );
        config.default_org = Some(ENV_ORG_ALIAS.to_string());
    }

    if let Some(target_org) = lookup("APEX_TARGET_ORG") {
        config.default_org = Some(target_org);
    }

    if let Some(api_version) = lookup("APEX_API_VERSION") {
        config.api_version = api_version;
    }

    if let Some(interval) = lookup("APEX_POLL_INTERVAL_MS") {
        config.poll_interval_ms = interval
            .parse()
            .map_err(|_| ApexError::config("Invalid APEX_POLL_INTERVAL_MS value"))?;
    }

    Ok(config)
}
