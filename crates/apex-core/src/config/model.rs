//! Configuration data model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default API version used when neither config nor flags name one
pub const DEFAULT_API_VERSION: &str = "60.0";

/// Default interval between run status polls (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

/// Default timeout for a single HTTP request (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// A named org the runner can connect to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgConfig {
    pub instance_url: String,
    pub access_token: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApexConfig {
    /// Alias used when `--target-org` is not given
    pub default_org: Option<String>,
    /// Known orgs by alias
    pub orgs: HashMap<String, OrgConfig>,
    /// API version used when an org does not pin one
    pub api_version: String,
    /// Interval between run status polls
    pub poll_interval_ms: u64,
    /// Timeout for a single HTTP request
    pub request_timeout_secs: u64,
}

impl Default for ApexConfig {
    fn default() -> Self {
        Self {
            default_org: None,
            orgs: HashMap::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ApexConfig {
    /// Poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Overlay `other` on top of this config.
    ///
    /// Orgs are merged by alias; scalar settings from `other` win when they
    /// differ from the defaults.
    pub fn merge(&mut self, other: ApexConfig) {
        if other.default_org.is_some() {
            self.default_org = other.default_org;
        }
        self.orgs.extend(other.orgs);
        if other.api_version != DEFAULT_API_VERSION {
            self.api_version = other.api_version;
        }
        if other.poll_interval_ms != DEFAULT_POLL_INTERVAL_MS {
            self.poll_interval_ms = other.poll_interval_ms;
        }
        if other.request_timeout_secs != DEFAULT_REQUEST_TIMEOUT_SECS {
            self.request_timeout_secs = other.request_timeout_secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ApexConfig::default();
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert!(config.orgs.is_empty());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ApexConfig = serde_json::from_str(r#"{"default_org": "scratch"}"#).unwrap();
        assert_eq!(config.default_org.as_deref(), Some("scratch"));
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_config_merge() {
        let mut base = ApexConfig::default();
        base.orgs.insert(
            "a".to_string(),
            OrgConfig {
                instance_url: "https://a.example.com".to_string(),
                access_token: "t1".to_string(),
                username: None,
                api_version: None,
            },
        );

        let mut overlay = ApexConfig {
            default_org: Some("b".to_string()),
            poll_interval_ms: 1_000,
            ..ApexConfig::default()
        };
        overlay.orgs.insert(
            "b".to_string(),
            OrgConfig {
                instance_url: "https://b.example.com".to_string(),
                access_token: "t2".to_string(),
                username: Some("b@example.com".to_string()),
                api_version: None,
            },
        );

        base.merge(overlay);
        assert_eq!(base.orgs.len(), 2);
        assert_eq!(base.default_org.as_deref(), Some("b"));
        assert_eq!(base.poll_interval_ms, 1_000);
        assert_eq!(base.api_version, DEFAULT_API_VERSION);
    }
}
