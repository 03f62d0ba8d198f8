//! Matchmaking and relay for Duelwire.
//!
//! This crate holds the server's view of every connection:
//!
//! 1. **Lifecycle** ([`ConnectionState`]): unauthenticated, pending,
//!    paired, closed.
//! 2. **Pairing** ([`SessionCoordinator`]): FIFO matchmaking of logged-in
//!    connections into two-player sessions.
//! 3. **Relay**: input frames go from one player to its peer and nowhere
//!    else.
//! 4. **Leaderboard** ([`Leaderboard`]): best score per name, broadcast on
//!    change.
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)  ← owns sockets, feeds frames in, drains Outbound queues
//!     ↕
//! Session Layer (this crate)  ← pairing tables and the state machine
//!     ↕
//! Protocol Layer (below)  ← Message kinds and the tag registry
//! ```
//!
//! Nothing here touches a socket. The coordinator writes [`Outbound`]
//! items into per-connection queues and the server decides how to
//! deliver them.

mod coordinator;
mod error;
mod leaderboard;
mod session;

pub use coordinator::SessionCoordinator;
pub use error::SessionError;
pub use leaderboard::Leaderboard;
pub use session::{
    ConnectionState, Outbound, OutboundReceiver, OutboundSender,
    outbound_channel,
};
