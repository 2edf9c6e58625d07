//! Command implementations


use crate::args::OrgArgs;
use apex_client::HttpTestService;
use apex_core::config::{OrgConnection, load_config, resolve_connection};
use apex_core::ApexResult;
use std::path::Path;
use tracing::debug;

/// Binary name used in follow-up guidance
pub const BIN_NAME: &str = "apex";

/// Load configuration and build the HTTP service for the selected org
pub fn connect(
    config_file: Option<&Path>,
    org: &OrgArgs,
) -> ApexResult<(HttpTestService, OrgConnection)> {
    let config = load_config(config_file)?;
    let connection = resolve_connection(
        &config,
        org.target_org.as_deref(),
        org.api_version.as_deref(),
    )?;
    debug!(alias = %connection.alias, url = %connection.instance_url, "connecting");

    let service = HttpTestService::new(connection.clone(), &config)?;
    Ok((service, connection))
}
