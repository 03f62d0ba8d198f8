//! Per-connection types: lifecycle state and outbound delivery.

use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// ConnectionState
// ---------------------------------------------------------------------------

/// Where a connection is in the matchmaking lifecycle.
///
/// ```text
///   Unauthenticated ──(Login, pool empty)──→ Pending ──(peer logs in)──→ Paired
///          │                                    │                          │
///          └──────────(Login, peer waiting)─────┼──────────────────────────┘
///                                               │                          │
///                                               ▼                          ▼
///                                            Closed  ←──(own or peer close)┘
/// ```
///
/// - **Unauthenticated**: accepted by the transport, no Login yet.
/// - **Pending**: logged in, waiting in the FIFO pool for a peer.
/// - **Paired**: linked to exactly one other connection.
/// - **Closed**: its transport is being torn down, either because it
///   closed itself or because its peer went away. Every further message
///   from it is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unauthenticated,
    Pending,
    Paired,
    Closed,
}

impl ConnectionState {
    /// `true` once the connection has sent a Login.
    pub fn is_logged_in(self) -> bool {
        matches!(self, Self::Pending | Self::Paired)
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Something the coordinator wants a connection's writer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Send one encoded frame.
    Frame(Vec<u8>),
    /// Close the transport.
    Close,
}

/// Queue feeding a connection's writer task.
///
/// Unbounded so that pushes from inside the coordinator never wait.
pub type OutboundSender = mpsc::UnboundedSender<Outbound>;

/// Receiving end of an [`OutboundSender`].
pub type OutboundReceiver = mpsc::UnboundedReceiver<Outbound>;

/// Creates a fresh outbound queue for one connection.
pub fn outbound_channel() -> (OutboundSender, OutboundReceiver) {
    mpsc::unbounded_channel()
}
