//! Per-connection handler: register, read frames, write outbound queue.
//!
//! Each accepted connection gets its own Tokio task running this handler,
//! plus one writer task. The flow is:
//!   1. Register with the coordinator, receiving an outbound queue
//!   2. Spawn the writer, which owns every socket write and the close
//!   3. Loop: receive frames → hand them to the coordinator, until the
//!      socket ends or the writer has closed it
//!   4. On exit, tell the coordinator the connection is gone

use std::sync::Arc;

use duelwire_session::{Outbound, OutboundReceiver, outbound_channel};
use duelwire_transport::{Connection, ConnectionId, WebSocketConnection};

use crate::DuelwireError;
use crate::server::ServerState;

/// Drop guard that runs the coordinator's close handling when the
/// handler exits, including by panic.
///
/// Closing removes this connection's outbound queue, which in turn lets
/// the writer task drain and shut the socket.
struct CloseGuard {
    conn_id: ConnectionId,
    state: Arc<ServerState>,
}

impl Drop for CloseGuard {
    fn drop(&mut self) {
        self.state.coordinator().handle_close(self.conn_id);
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), DuelwireError> {
    let conn = Arc::new(conn);
    let conn_id = conn.id();

    let (tx, rx) = outbound_channel();
    state.coordinator().register(conn_id, tx)?;
    let guard = CloseGuard {
        conn_id,
        state: Arc::clone(&state),
    };

    let mut writer = tokio::spawn(write_loop(Arc::clone(&conn), rx));
    // A finished writer also ends the read side; the peer need not answer
    // its close.
    let (result, joined) = tokio::select! {
        result = read_loop(&conn, &state) => (result, None),
        joined = &mut writer => {
            tracing::debug!(%conn_id, "writer closed the socket, reader stopping");
            (Ok(()), Some(joined))
        }
    };

    drop(guard);
    let joined = match joined {
        Some(joined) => joined,
        None => writer.await,
    };
    if let Err(e) = joined {
        tracing::debug!(%conn_id, error = %e, "writer task failed");
    }
    result
}

/// Feeds frames to the coordinator until the socket ends.
///
/// A malformed frame ends the loop with an error, which closes this
/// connection and cascades to its peer.
async fn read_loop(
    conn: &WebSocketConnection,
    state: &ServerState,
) -> Result<(), DuelwireError> {
    let conn_id = conn.id();
    loop {
        let frame = match conn.recv().await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                return Ok(());
            }
        };

        let handled = state.coordinator().handle_frame(conn_id, &frame);
        if let Err(e) = handled {
            tracing::warn!(%conn_id, error = %e, "malformed frame, dropping connection");
            return Err(e.into());
        }
    }
}

/// Writes queued frames in order; closes the socket on `Close` or once
/// the queue is gone.
async fn write_loop(conn: Arc<WebSocketConnection>, mut rx: OutboundReceiver) {
    let conn_id = conn.id();
    while let Some(out) = rx.recv().await {
        match out {
            Outbound::Frame(bytes) => {
                if let Err(e) = conn.send(&bytes).await {
                    tracing::debug!(%conn_id, error = %e, "send failed");
                    break;
                }
            }
            Outbound::Close => {
                tracing::debug!(%conn_id, "closing on request");
                break;
            }
        }
    }
    if let Err(e) = conn.close().await {
        tracing::debug!(%conn_id, error = %e, "close failed");
    }
}
