//! Client configuration
//!
//! Connection and credential defaults for an [`IntacctClient`](crate::IntacctClient).
//! Loaded from YAML, from `INTACCT_*` environment variables, or both
//! (environment wins).
//!
//! ```yaml
//! sender_id: my_sender
//! sender_password: secret
//! company_id: acme
//! user_id: api_user
//! user_password: secret
//! max_retries: 3
//! rate_limit:
//!   requests_per_second: 5
//!   burst_size: 5
//! ```

use crate::error::{Error, Result};
use crate::types::Params;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default XML gateway endpoint
pub const DEFAULT_ENDPOINT_URL: &str = "https://api.intacct.com/ia/xml/xmlgw.phtml";

/// Setter applying one environment variable to a config
type EnvSetter = fn(&mut ClientConfig, String);

/// Environment variable names and the fields they populate
const ENV_VARS: &[(&str, EnvSetter)] = &[
    ("INTACCT_ENDPOINT_URL", |c, v| c.endpoint_url = v),
    ("INTACCT_SENDER_ID", |c, v| c.sender_id = Some(v)),
    ("INTACCT_SENDER_PASSWORD", |c, v| c.sender_password = Some(v)),
    ("INTACCT_SESSION_ID", |c, v| c.session_id = Some(v)),
    ("INTACCT_COMPANY_ID", |c, v| c.company_id = Some(v)),
    ("INTACCT_USER_ID", |c, v| c.user_id = Some(v)),
    ("INTACCT_USER_PASSWORD", |c, v| c.user_password = Some(v)),
];

/// Client configuration loaded from YAML or the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// XML gateway endpoint
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// Web services sender id
    #[serde(default)]
    pub sender_id: Option<String>,

    /// Web services sender password
    #[serde(default)]
    pub sender_password: Option<String>,

    /// Existing API session id (used instead of the login triple)
    #[serde(default)]
    pub session_id: Option<String>,

    /// Company id for login authentication
    #[serde(default)]
    pub company_id: Option<String>,

    /// User id for login authentication
    #[serde(default)]
    pub user_id: Option<String>,

    /// User password for login authentication
    #[serde(default)]
    pub user_password: Option<String>,

    /// Transport retries for retryable HTTP failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional client-side rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

/// Rate limit settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per second
    pub requests_per_second: u32,
    /// Burst size
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_burst() -> u32 {
    1
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            sender_id: None,
            sender_password: None,
            session_id: None,
            company_id: None,
            user_id: None,
            user_password: None,
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
            rate_limit: None,
        }
    }
}

impl ClientConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Build configuration purely from `INTACCT_*` environment variables
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Override fields with any `INTACCT_*` environment variables that are set
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Override fields from an arbitrary variable lookup
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, set) in ENV_VARS {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                set(&mut self, value);
            }
        }
        self
    }

    /// Check that sender credentials and one authentication method are present
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.endpoint_url)?;

        if is_blank(&self.sender_id) {
            return Err(Error::missing_field("sender_id"));
        }
        if is_blank(&self.sender_password) {
            return Err(Error::missing_field("sender_password"));
        }

        if !is_blank(&self.session_id) {
            return Ok(());
        }

        for (field, value) in [
            ("company_id", &self.company_id),
            ("user_id", &self.user_id),
            ("user_password", &self.user_password),
        ] {
            if is_blank(value) {
                return Err(Error::config(format!(
                    "Either session_id or a complete login is required; missing {field}"
                )));
            }
        }

        Ok(())
    }

    /// Session configuration as a parameter set (unset fields are omitted)
    pub fn to_params(&self) -> Params {
        let mut params = Params::new()
            .with("endpoint_url", self.endpoint_url.clone())
            .with("max_retries", self.max_retries)
            .with("timeout_secs", self.timeout_secs);

        for (key, value) in [
            ("sender_id", &self.sender_id),
            ("sender_password", &self.sender_password),
            ("session_id", &self.session_id),
            ("company_id", &self.company_id),
            ("user_id", &self.user_id),
            ("user_password", &self.user_password),
        ] {
            if let Some(value) = value {
                params.insert(key, value.clone());
            }
        }

        if let Some(limit) = &self.rate_limit {
            params.insert("requests_per_second", limit.requests_per_second);
            params.insert("burst_size", limit.burst_size);
        }

        params
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    const LOGIN_YAML: &str = r"
sender_id: sender
sender_password: sender_pass
company_id: acme
user_id: api_user
user_password: user_pass
rate_limit:
  requests_per_second: 5
";

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint_url, DEFAULT_ENDPOINT_URL);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout_secs, 300);
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn test_from_yaml_str() {
        let config = ClientConfig::from_yaml_str(LOGIN_YAML).unwrap();
        assert_eq!(config.sender_id.as_deref(), Some("sender"));
        assert_eq!(config.company_id.as_deref(), Some("acme"));
        assert_eq!(config.endpoint_url, DEFAULT_ENDPOINT_URL);
        assert_eq!(
            config.rate_limit,
            Some(RateLimitConfig {
                requests_per_second: 5,
                burst_size: 1
            })
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_from_yaml_str_invalid() {
        let err = ClientConfig::from_yaml_str("max_retries: [1, 2]").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LOGIN_YAML.as_bytes()).unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.user_id.as_deref(), Some("api_user"));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::from_file(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_from_file_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::from_file(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_env_overrides_every_field() {
        let config = ClientConfig::default()
            .with_overrides_from(|name| Some(name.to_lowercase().replace('_', "-")));

        assert_eq!(config.endpoint_url, "intacct-endpoint-url");
        assert_eq!(config.sender_id.as_deref(), Some("intacct-sender-id"));
        assert_eq!(config.sender_password.as_deref(), Some("intacct-sender-password"));
        assert_eq!(config.session_id.as_deref(), Some("intacct-session-id"));
        assert_eq!(config.company_id.as_deref(), Some("intacct-company-id"));
        assert_eq!(config.user_id.as_deref(), Some("intacct-user-id"));
        assert_eq!(config.user_password.as_deref(), Some("intacct-user-password"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("INTACCT_SENDER_ID", "env_sender"),
            ("INTACCT_SESSION_ID", "sess-123"),
            ("INTACCT_USER_ID", ""),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::from_yaml_str(LOGIN_YAML)
            .unwrap()
            .with_overrides_from(|name| vars.get(name).map(|v| (*v).to_string()));

        assert_eq!(config.sender_id.as_deref(), Some("env_sender"));
        assert_eq!(config.session_id.as_deref(), Some("sess-123"));
        // empty variables do not clear configured values
        assert_eq!(config.user_id.as_deref(), Some("api_user"));
    }

    #[test]
    fn test_validate_session_only() {
        let config = ClientConfig {
            sender_id: Some("sender".into()),
            sender_password: Some("pass".into()),
            session_id: Some("abc".into()),
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_missing_sender() {
        let err = ClientConfig::default().validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { field } if field == "sender_id"));
    }

    #[test]
    fn test_validate_incomplete_login() {
        let config = ClientConfig {
            sender_id: Some("sender".into()),
            sender_password: Some("pass".into()),
            company_id: Some("acme".into()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("user_id"));
    }

    #[test]
    fn test_validate_bad_endpoint() {
        let config = ClientConfig {
            endpoint_url: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_to_params() {
        let config = ClientConfig::from_yaml_str(LOGIN_YAML).unwrap();
        let params = config.to_params();

        assert_eq!(
            params.get_str("endpoint_url").unwrap().as_deref(),
            Some(DEFAULT_ENDPOINT_URL)
        );
        assert_eq!(params.get_str("sender_id").unwrap().as_deref(), Some("sender"));
        assert_eq!(params.get_u64("max_retries").unwrap(), Some(3));
        assert_eq!(params.get_u64("requests_per_second").unwrap(), Some(5));
        assert!(!params.contains_key("session_id"));
    }
}
