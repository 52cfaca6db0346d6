//! Intacct client handle
//!
//! Holds the session configuration that every object operation merges
//! caller parameters over. The client is only ever read, so it is passed
//! around by shared reference.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::types::Params;

/// Client handle carrying session defaults
#[derive(Debug, Clone, Default)]
pub struct IntacctClient {
    config: ClientConfig,
}

impl IntacctClient {
    /// Create a client from configuration without validating it
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Create a client, rejecting configuration without usable credentials
    pub fn connect(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Underlying configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Session defaults (endpoint, credentials, transport settings)
    pub fn session_config(&self) -> Params {
        self.config.to_params()
    }
}

impl From<ClientConfig> for IntacctClient {
    fn from(config: ClientConfig) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_reflects_client_config() {
        let client = IntacctClient::new(ClientConfig {
            sender_id: Some("sender".into()),
            session_id: Some("sess".into()),
            ..Default::default()
        });

        let session = client.session_config();
        assert_eq!(session.get_str("sender_id").unwrap().as_deref(), Some("sender"));
        assert_eq!(session.get_str("session_id").unwrap().as_deref(), Some("sess"));
    }

    #[test]
    fn test_connect_validates() {
        assert!(IntacctClient::connect(ClientConfig::default()).is_err());

        let client = IntacctClient::connect(ClientConfig {
            sender_id: Some("sender".into()),
            sender_password: Some("pass".into()),
            session_id: Some("sess".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.config().session_id.as_deref(), Some("sess"));
    }
}
