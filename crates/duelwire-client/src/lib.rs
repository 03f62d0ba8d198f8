//! Client side of Duelwire.
//!
//! The pieces a game embeds to play against a remote opponent:
//!
//! - [`NetworkClient`]: one WebSocket to the server, a queue for outgoing
//!   messages ([`NetworkSender`]) and any number of incoming
//!   [`Subscription`]s.
//! - [`SessionNegotiator`]: sends the Login and maps the server's
//!   `SessionStart` onto local player slots.
//! - [`InputReplicator`]: ships local input changes, mirrors the peer's.
//! - [`LeaderboardView`]: keeps a sorted copy of the leaderboard and
//!   submits scores.
//!
//! Everything except `NetworkClient` itself is synchronous and talks to the
//! network through the [`MessageSink`] trait, so it can be driven from a
//! frame loop and tested without a socket.
//!
//! ```rust,no_run
//! use duelwire_client::{ClientConfig, NetworkClient, SessionNegotiator};
//!
//! # async fn run() -> Result<(), duelwire_client::ClientError> {
//! let config = ClientConfig::new("127.0.0.1:8080", "amy");
//! let client = NetworkClient::connect(&config).await?;
//! let mut events = client.subscribe();
//!
//! let mut negotiator = SessionNegotiator::new(2);
//! negotiator.on_ready(&config, &client.sender())?;
//! while let Some(msg) = events.recv().await {
//!     if let Some(local) = negotiator.on_message(&msg) {
//!         println!("playing as player {local}");
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod input;
mod leaderboard;
mod negotiator;
mod network;

pub use config::ClientConfig;
pub use error::{ClientError, ConfigError};
pub use input::{InputReplicator, InputSource};
pub use leaderboard::{LeaderboardSink, LeaderboardView};
pub use negotiator::{PlayerSlot, SessionNegotiator};
pub use network::{MessageSink, NetworkClient, NetworkSender, Subscription};
