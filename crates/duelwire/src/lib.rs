//! # Duelwire
//!
//! Two-player pairing server with real-time input relay and a shared
//! leaderboard.
//!
//! Clients connect over WebSocket and log in with a display name. The
//! server pairs logged-in clients two at a time, oldest first, relays each
//! player's input frames to its opponent only, and keeps a best-score
//! table it broadcasts whenever it changes. When one player of a pair
//! disconnects, the other is disconnected too.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use duelwire::prelude::*;
//!
//! # async fn start() -> Result<(), DuelwireError> {
//! let config = ServerConfig::from_json(r#"{ "bind_addr": "0.0.0.0:8080" }"#)?;
//! let server = DuelwireServerBuilder::new().config(config).build().await?;
//! server.run().await
//! # }
//! ```
//!
//! The game side lives in [`client`]: connect a
//! [`NetworkClient`](client::NetworkClient), log in through a
//! [`SessionNegotiator`](client::SessionNegotiator), and drive an
//! [`InputReplicator`](client::InputReplicator) per player.

mod config;
mod error;
mod handler;
mod server;

pub use config::{DEFAULT_PORT, ServerConfig};
pub use error::{ConfigError, DuelwireError};
pub use server::{DuelwireServer, DuelwireServerBuilder};

pub use duelwire_client as client;
pub use duelwire_protocol as protocol;
pub use duelwire_session as session;
pub use duelwire_transport as transport;

pub mod prelude {
    pub use crate::{
        ConfigError, DuelwireError, DuelwireServer, DuelwireServerBuilder,
        ServerConfig,
    };
    pub use duelwire_client::{
        ClientConfig, ClientError, InputReplicator, InputSource,
        LeaderboardSink, LeaderboardView, MessageSink, NetworkClient,
        SessionNegotiator,
    };
    pub use duelwire_protocol::{
        InputChanged, LeaderboardUpdate, Login, Message, MessageRegistry,
        ScoreSubmit, SessionStart,
    };
    pub use duelwire_session::{ConnectionState, SessionError};
    pub use duelwire_transport::{ConnectionId, TransportError};
}
