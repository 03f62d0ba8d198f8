//! Error types for the session layer.

use duelwire_protocol::ProtocolError;
use duelwire_transport::ConnectionId;

/// Errors that can occur while driving the session coordinator.
///
/// Messages that are merely out of place (input before pairing, a second
/// login) are not errors; the coordinator drops them.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A frame or close arrived for a connection that was never registered.
    #[error("unknown connection {0}")]
    UnknownConnection(ConnectionId),

    /// The transport handed over the same connection twice.
    #[error("connection {0} is already registered")]
    AlreadyRegistered(ConnectionId),

    /// The frame could not be decoded, or a reply could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
