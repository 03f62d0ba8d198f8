//! Error types for the client side.

use duelwire_protocol::ProtocolError;
use duelwire_transport::TransportError;

/// Problems with a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("player alias must not be empty")]
    EmptyAlias,

    #[error("server address must not be empty")]
    EmptyServer,

    /// The alias does not fit in one wire string.
    #[error("player alias is {0} bytes, at most 255 allowed")]
    AliasTooLong(usize),
}

/// Errors surfaced by the client networking components.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connecting, sending, or closing the socket failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An outgoing message could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("invalid client configuration: {0}")]
    Config(#[from] ConfigError),

    /// The connection's writer has stopped; nothing more can be sent.
    #[error("not connected to the server")]
    Disconnected,
}
