//! Connection settings supplied by the host application.

use duelwire_protocol::MAX_SHORT_LEN;

use crate::ConfigError;

/// Where to connect and which name to play under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `host:port` of the server, without a scheme.
    pub server: String,
    /// Display name sent in the Login.
    pub alias: String,
}

impl ClientConfig {
    /// Creates a config, trimming surrounding whitespace from both values.
    pub fn new(server: impl AsRef<str>, alias: impl AsRef<str>) -> Self {
        Self {
            server: server.as_ref().trim().to_string(),
            alias: alias.as_ref().trim().to_string(),
        }
    }

    /// Checks that the config can be used to log in.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.is_empty() {
            return Err(ConfigError::EmptyServer);
        }
        if self.alias.is_empty() {
            return Err(ConfigError::EmptyAlias);
        }
        if self.alias.len() > MAX_SHORT_LEN {
            return Err(ConfigError::AliasTooLong(self.alias.len()));
        }
        Ok(())
    }

    /// WebSocket URL of the server.
    pub fn url(&self) -> String {
        format!("ws://{}", self.server)
    }
}
