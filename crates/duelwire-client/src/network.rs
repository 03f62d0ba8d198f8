//! The client's single connection to the server.
//!
//! [`NetworkClient::connect`] opens the socket and starts two tasks:
//!
//! - a **writer** that drains the outgoing queue fed by every
//!   [`NetworkSender`] clone;
//! - a **reader** that decodes incoming frames and publishes each message
//!   to every live [`Subscription`], in arrival order.
//!
//! Neither task is tied to the host's frame loop. Components that only
//! need to send depend on the [`MessageSink`] trait rather than on the
//! client itself.

use std::sync::{Arc, Mutex, PoisonError};

use duelwire_protocol::{Message, MessageRegistry};
use duelwire_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::{mpsc, watch};

use crate::{ClientConfig, ClientError};

/// Anything that can take an outgoing message.
pub trait MessageSink {
    fn send(&self, msg: Message) -> Result<(), ClientError>;
}

// ---------------------------------------------------------------------------
// NetworkSender
// ---------------------------------------------------------------------------

/// Cloneable, synchronous handle for queueing messages to the server.
///
/// Messages are encoded at the call site, so an encoding error is
/// reported to the caller instead of being lost in the writer task. Once
/// the connection has ended every send fails with
/// [`ClientError::Disconnected`].
#[derive(Debug, Clone)]
pub struct NetworkSender {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    done: watch::Receiver<bool>,
}

impl MessageSink for NetworkSender {
    fn send(&self, msg: Message) -> Result<(), ClientError> {
        if *self.done.borrow() {
            return Err(ClientError::Disconnected);
        }
        let bytes = msg.to_bytes()?;
        tracing::trace!(kind = msg.kind_name(), len = bytes.len(), "queueing message");
        self.tx.send(bytes).map_err(|_| ClientError::Disconnected)
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// One listener's view of the incoming message stream.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<Arc<Message>>,
}

impl Subscription {
    /// Waits for the next message. `None` once the connection has ended
    /// and every queued message was taken.
    pub async fn recv(&mut self) -> Option<Arc<Message>> {
        self.rx.recv().await
    }

    /// Takes the next queued message without waiting.
    pub fn try_recv(&mut self) -> Option<Arc<Message>> {
        self.rx.try_recv().ok()
    }
}

#[derive(Default)]
struct Hub {
    subscribers: Vec<mpsc::UnboundedSender<Arc<Message>>>,
    closed: bool,
}

type SharedHub = Arc<Mutex<Hub>>;

fn lock_hub(hub: &SharedHub) -> std::sync::MutexGuard<'_, Hub> {
    hub.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// NetworkClient
// ---------------------------------------------------------------------------

/// An open connection to a Duelwire server.
pub struct NetworkClient {
    conn: Arc<WebSocketConnection>,
    sender: NetworkSender,
    hub: SharedHub,
    done: watch::Receiver<bool>,
}

impl NetworkClient {
    /// Connects to `config.url()` and starts the reader and writer tasks.
    ///
    /// A failed connection is reported once; there is no retry.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::connect_with(config, Arc::new(MessageRegistry::standard())).await
    }

    /// Like [`connect`](Self::connect), decoding with a caller-supplied
    /// registry.
    pub async fn connect_with(
        config: &ClientConfig,
        registry: Arc<MessageRegistry>,
    ) -> Result<Self, ClientError> {
        let url = config.url();
        let conn = Arc::new(WebSocketConnection::connect(&url).await?);
        tracing::info!(conn_id = %conn.id(), %url, "connected to server");

        let (tx, rx) = mpsc::unbounded_channel();
        let hub = SharedHub::default();
        let (done_tx, done) = watch::channel(false);

        tokio::spawn(write_loop(Arc::clone(&conn), rx, done.clone()));
        tokio::spawn(read_loop(
            Arc::clone(&conn),
            registry,
            Arc::clone(&hub),
            done_tx,
        ));

        Ok(Self {
            conn,
            sender: NetworkSender {
                tx,
                done: done.clone(),
            },
            hub,
            done,
        })
    }

    pub fn id(&self) -> ConnectionId {
        self.conn.id()
    }

    /// A new handle for queueing outgoing messages.
    pub fn sender(&self) -> NetworkSender {
        self.sender.clone()
    }

    /// Registers a new listener for incoming messages.
    ///
    /// Only messages that arrive after this call are delivered. Subscribing
    /// after the connection ended yields a subscription that is already
    /// finished.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut hub = lock_hub(&self.hub);
        if !hub.closed {
            hub.subscribers.push(tx);
        }
        Subscription { rx }
    }

    /// Closes the socket. The reader ends once the server acknowledges.
    pub async fn close(&self) -> Result<(), ClientError> {
        self.conn.close().await?;
        Ok(())
    }

    /// Resolves once the reader task has stopped for any reason.
    pub async fn closed(&self) {
        let mut done = self.done.clone();
        // An error means the reader is gone, which is also "closed".
        let _ = done.wait_for(|finished| *finished).await;
    }

    pub fn is_closed(&self) -> bool {
        *self.done.borrow()
    }
}

impl MessageSink for NetworkClient {
    fn send(&self, msg: Message) -> Result<(), ClientError> {
        self.sender.send(msg)
    }
}

/// Sends queued frames until the queue closes, a send fails, or the reader
/// has finished. Returning drops the queue, so later sends fail.
async fn write_loop(
    conn: Arc<WebSocketConnection>,
    mut rx: mpsc::UnboundedReceiver<Vec<u8>>,
    mut done: watch::Receiver<bool>,
) {
    loop {
        let next = tokio::select! {
            frame = rx.recv() => frame,
            _ = async { let _ = done.wait_for(|finished| *finished).await; } => None,
        };
        let Some(frame) = next else {
            break;
        };
        if let Err(e) = conn.send(&frame).await {
            tracing::debug!(conn_id = %conn.id(), error = %e, "send failed, writer stopping");
            break;
        }
    }
}

async fn read_loop(
    conn: Arc<WebSocketConnection>,
    registry: Arc<MessageRegistry>,
    hub: SharedHub,
    done: watch::Sender<bool>,
) {
    let conn_id = conn.id();
    loop {
        let frame = match conn.recv().await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::info!(%conn_id, "server closed the connection");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        match registry.decode_frame(&frame) {
            Ok(Some(msg)) => {
                tracing::trace!(%conn_id, kind = msg.kind_name(), "message received");
                let msg = Arc::new(msg);
                lock_hub(&hub)
                    .subscribers
                    .retain(|sub| sub.send(Arc::clone(&msg)).is_ok());
            }
            Ok(None) => {
                tracing::debug!(%conn_id, "dropping frame with unknown tag");
            }
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "malformed frame from server");
                break;
            }
        }
    }

    // Also flushes the reply to a close the server started.
    let _ = conn.close().await;
    let mut hub = lock_hub(&hub);
    hub.closed = true;
    hub.subscribers.clear();
    drop(hub);
    let _ = done.send(true);
}
