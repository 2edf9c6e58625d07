//! Resolution of the org a command talks to

use super::model::ApexConfig;
use crate::error::{ApexError, ApexResult};
use tracing::debug;

/// Everything needed to reach one org
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgConnection {
    pub alias: String,
    pub instance_url: String,
    pub access_token: String,
    pub username: Option<String>,
    pub api_version: String,
}

/// Pick the org named by `target_org`, else the configured default.
///
/// `api_version` overrides both the org's pinned version and the global one.
pub fn resolve_connection(
    config: &ApexConfig,
    target_org: Option<&str>,
    api_version: Option<&str>,
) -> ApexResult<OrgConnection> {
    let alias = target_org
        .or(config.default_org.as_deref())
        .ok_or_else(|| {
            ApexError::config_with_action(
                "No target org specified",
                "Pass --target-org, set default_org in ~/.apex/config.json, or set APEX_INSTANCE_URL and APEX_ACCESS_TOKEN.",
            )
        })?;

    let org = config.orgs.get(alias).ok_or_else(|| {
        ApexError::config_with_action(
            format!("No org configuration found for '{}'", alias),
            "Add the org under \"orgs\" in ~/.apex/config.json.",
        )
    })?;

    let api_version = api_version
        .map(str::to_string)
        .or_else(|| org.api_version.clone())
        .unwrap_or_else(|| config.api_version.clone());

    debug!(alias, api_version = %api_version, "resolved org connection");

    Ok(OrgConnection {
        alias: alias.to_string(),
        instance_url: org.instance_url.trim_end_matches('/').to_string(),
        access_token: org.access_token.clone(),
        username: org.username.clone(),
        api_version,
    })
}
