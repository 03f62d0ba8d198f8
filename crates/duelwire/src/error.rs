//! Unified error type for the Duelwire workspace.

use duelwire_client::ClientError;
use duelwire_protocol::ProtocolError;
use duelwire_session::SessionError;
use duelwire_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impl, so
/// `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DuelwireError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session coordinator rejected an operation.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A client component failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The server configuration could not be read or parsed.
    #[error("invalid server configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Why a [`ServerConfig`](crate::ServerConfig) could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use duelwire_transport::ConnectionId;

    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let duelwire_err: DuelwireError = err.into();
        assert!(matches!(duelwire_err, DuelwireError::Transport(_)));
        assert!(duelwire_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::StringTooLong(300);
        let duelwire_err: DuelwireError = err.into();
        assert!(matches!(duelwire_err, DuelwireError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::UnknownConnection(ConnectionId::new(4));
        let duelwire_err: DuelwireError = err.into();
        assert!(matches!(duelwire_err, DuelwireError::Session(_)));
        assert!(duelwire_err.to_string().contains("conn-4"));
    }

    #[test]
    fn test_from_client_error() {
        let duelwire_err: DuelwireError = ClientError::Disconnected.into();
        assert!(matches!(duelwire_err, DuelwireError::Client(_)));
    }

    #[test]
    fn test_from_config_parse_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let duelwire_err: DuelwireError = ConfigError::from(parse).into();
        assert!(matches!(duelwire_err, DuelwireError::Config(ConfigError::Parse(_))));
    }
}
