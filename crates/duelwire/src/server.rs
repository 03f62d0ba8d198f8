//! `DuelwireServer` builder and server loop.
//!
//! This is the entry point for running a Duelwire server. It ties
//! together all the layers: transport → protocol → session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use duelwire_protocol::MessageRegistry;
use duelwire_session::SessionCoordinator;
use duelwire_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{DuelwireError, ServerConfig};

/// Shared server state passed to each connection handler task.
///
/// The coordinator never awaits, so a blocking mutex is enough and every
/// operation on it is atomic with respect to the other handlers.
pub(crate) struct ServerState {
    coordinator: Mutex<SessionCoordinator>,
}

impl ServerState {
    pub(crate) fn new(registry: Arc<MessageRegistry>) -> Self {
        Self {
            coordinator: Mutex::new(SessionCoordinator::new(registry)),
        }
    }

    /// Locks the coordinator. A handler that panicked mid-update leaves
    /// the tables usable, so poisoning is ignored.
    pub(crate) fn coordinator(&self) -> MutexGuard<'_, SessionCoordinator> {
        self.coordinator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builder for configuring and starting a Duelwire server.
///
/// # Example
///
/// ```rust,no_run
/// use duelwire::prelude::*;
///
/// # async fn start() -> Result<(), DuelwireError> {
/// let server = DuelwireServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct DuelwireServerBuilder {
    config: ServerConfig,
    registry: Option<Arc<MessageRegistry>>,
}

impl DuelwireServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            registry: None,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Decodes incoming frames with `registry` instead of the standard one.
    pub fn registry(mut self, registry: MessageRegistry) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Binds the listener and builds the server.
    pub async fn build(self) -> Result<DuelwireServer, DuelwireError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(MessageRegistry::standard()));
        tracing::debug!(?registry, "message registry ready");

        Ok(DuelwireServer {
            transport,
            state: Arc::new(ServerState::new(registry)),
        })
    }
}

impl Default for DuelwireServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Duelwire server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct DuelwireServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl DuelwireServer {
    /// Creates a new builder.
    pub fn builder() -> DuelwireServerBuilder {
        DuelwireServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted connection. A failed accept
    /// is logged and the loop keeps going. Runs until the process is
    /// terminated.
    pub async fn run(mut self) -> Result<(), DuelwireError> {
        tracing::info!(addr = ?self.transport.local_addr().ok(), "Duelwire server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
