//! The session coordinator: matchmaking, relay, leaderboard, teardown.
//!
//! One coordinator exists per server process. It owns every table the
//! pairing logic touches:
//!
//! - display names, kept even after a connection closes so leaderboard
//!   entries still have an owner;
//! - the pending pool, a FIFO queue of logged-in connections waiting for
//!   a partner;
//! - the pairing table, a symmetric `ConnectionId → ConnectionId` map;
//! - the leaderboard.
//!
//! # Concurrency note
//!
//! `SessionCoordinator` is a plain struct with `&mut self` methods and no
//! `.await` anywhere. The server wraps it in a single mutex, so every
//! handler observes and mutates the tables as one atomic step. Outbound
//! traffic is pushed onto unbounded per-connection queues and never waits
//! on the receiving socket.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use duelwire_protocol::{
    InputChanged, Login, Message, MessageRegistry, ScoreSubmit, SessionStart,
};
use duelwire_transport::ConnectionId;

use crate::{ConnectionState, Leaderboard, Outbound, OutboundSender, SessionError};

/// Drives the per-connection state machine for all connections.
pub struct SessionCoordinator {
    registry: Arc<MessageRegistry>,

    /// Delivery queue of every open connection.
    links: HashMap<ConnectionId, OutboundSender>,

    /// Lifecycle state of every open connection.
    states: HashMap<ConnectionId, ConnectionState>,

    /// Names chosen at Login. Never removed.
    display_names: HashMap<ConnectionId, String>,

    /// Logged-in connections without a partner, oldest first.
    pending: VecDeque<ConnectionId>,

    /// Pairing table. Always holds both directions of a pair.
    peers: HashMap<ConnectionId, ConnectionId>,

    leaderboard: Leaderboard,
}

impl SessionCoordinator {
    /// Creates an empty coordinator decoding with `registry`.
    pub fn new(registry: Arc<MessageRegistry>) -> Self {
        Self {
            registry,
            links: HashMap::new(),
            states: HashMap::new(),
            display_names: HashMap::new(),
            pending: VecDeque::new(),
            peers: HashMap::new(),
            leaderboard: Leaderboard::new(),
        }
    }

    /// Starts tracking a newly accepted connection.
    ///
    /// # Errors
    /// [`SessionError::AlreadyRegistered`] if `id` is already open.
    pub fn register(
        &mut self,
        id: ConnectionId,
        sender: OutboundSender,
    ) -> Result<(), SessionError> {
        if self.links.contains_key(&id) {
            return Err(SessionError::AlreadyRegistered(id));
        }
        self.links.insert(id, sender);
        self.states.insert(id, ConnectionState::Unauthenticated);
        tracing::info!(conn_id = %id, "new connection");
        Ok(())
    }

    /// Decodes one raw frame from `id` and reacts to it.
    ///
    /// Unknown tags are dropped. An `InputChanged` frame is relayed as the
    /// exact bytes received.
    ///
    /// # Errors
    /// - [`SessionError::UnknownConnection`] if `id` was never registered.
    /// - [`SessionError::Protocol`] if the frame is malformed.
    pub fn handle_frame(
        &mut self,
        id: ConnectionId,
        frame: &[u8],
    ) -> Result<(), SessionError> {
        if !self.states.contains_key(&id) {
            return Err(SessionError::UnknownConnection(id));
        }
        match self.registry.decode_frame(frame)? {
            Some(msg) => self.dispatch(id, msg, Some(frame)),
            None => {
                tracing::debug!(conn_id = %id, "dropping frame with unknown tag");
                Ok(())
            }
        }
    }

    /// Reacts to an already decoded message from `id`.
    ///
    /// # Errors
    /// [`SessionError::UnknownConnection`] if `id` was never registered.
    pub fn handle_message(
        &mut self,
        id: ConnectionId,
        msg: Message,
    ) -> Result<(), SessionError> {
        if !self.states.contains_key(&id) {
            return Err(SessionError::UnknownConnection(id));
        }
        self.dispatch(id, msg, None)
    }

    /// Tears down `id` after its transport closed.
    ///
    /// If it was paired, both directions of the link are removed and the
    /// peer is told to close before this returns. If it was pending, it
    /// leaves the pool. Names and leaderboard entries stay. Closing an
    /// unknown or already closed connection is a no-op.
    pub fn handle_close(&mut self, id: ConnectionId) {
        let Some(state) = self.states.remove(&id) else {
            return;
        };
        self.links.remove(&id);

        match state {
            ConnectionState::Paired => {
                if let Some(peer) = self.peers.remove(&id) {
                    self.peers.remove(&peer);
                    self.states.insert(peer, ConnectionState::Closed);
                    self.deliver(peer, Outbound::Close);
                    tracing::info!(
                        conn_id = %id, %peer, "paired connection closed, closing peer"
                    );
                }
            }
            ConnectionState::Pending => {
                self.pending.retain(|p| *p != id);
                tracing::info!(conn_id = %id, "pending connection closed");
            }
            ConnectionState::Unauthenticated | ConnectionState::Closed => {
                tracing::info!(conn_id = %id, "connection closed");
            }
        }
    }

    // -- Queries ---------------------------------------------------------

    /// Lifecycle state of `id`, or `None` once it is no longer tracked.
    pub fn state_of(&self, id: ConnectionId) -> Option<ConnectionState> {
        self.states.get(&id).copied()
    }

    pub fn is_registered(&self, id: ConnectionId) -> bool {
        self.states.contains_key(&id)
    }

    /// Connections still tracked, in any state.
    pub fn connection_count(&self) -> usize {
        self.states.len()
    }

    pub fn peer_of(&self, id: ConnectionId) -> Option<ConnectionId> {
        self.peers.get(&id).copied()
    }

    pub fn display_name(&self, id: ConnectionId) -> Option<&str> {
        self.display_names.get(&id).map(String::as_str)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Pending connections, longest-waiting first.
    pub fn pending_ids(&self) -> Vec<ConnectionId> {
        self.pending.iter().copied().collect()
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn registry(&self) -> &MessageRegistry {
        &self.registry
    }

    // -- Transitions -----------------------------------------------------

    fn dispatch(
        &mut self,
        id: ConnectionId,
        msg: Message,
        raw: Option<&[u8]>,
    ) -> Result<(), SessionError> {
        let state = self.states[&id];
        match (state, msg) {
            (ConnectionState::Unauthenticated, Message::Login(login)) => {
                self.on_login(id, login)
            }
            (ConnectionState::Paired, Message::InputChanged(input)) => {
                self.on_input_changed(id, input, raw)
            }
            (ConnectionState::Closed, msg) => {
                tracing::debug!(
                    conn_id = %id, kind = msg.kind_name(), "ignoring message from closing connection"
                );
                Ok(())
            }
            (_, Message::ScoreSubmit(score)) => self.on_score(id, score),
            (state, msg) => {
                tracing::debug!(
                    conn_id = %id,
                    ?state,
                    kind = msg.kind_name(),
                    "ignoring message not valid in current state"
                );
                Ok(())
            }
        }
    }

    fn on_login(&mut self, id: ConnectionId, login: Login) -> Result<(), SessionError> {
        tracing::info!(conn_id = %id, name = %login.name, "login");
        self.display_names.insert(id, login.name);

        let board = Message::from(self.leaderboard.to_update()).to_bytes()?;
        self.deliver(id, Outbound::Frame(board));

        let Some(waiting) = self.pending.pop_front() else {
            self.pending.push_back(id);
            self.states.insert(id, ConnectionState::Pending);
            tracing::info!(conn_id = %id, "waiting for a partner");
            return Ok(());
        };

        self.peers.insert(waiting, id);
        self.peers.insert(id, waiting);
        self.states.insert(waiting, ConnectionState::Paired);
        self.states.insert(id, ConnectionState::Paired);

        let names = vec![self.name_of(waiting), self.name_of(id)];
        let first =
            Message::from(SessionStart::new(0, names.clone())).to_bytes()?;
        let second = Message::from(SessionStart::new(1, names)).to_bytes()?;
        self.deliver(waiting, Outbound::Frame(first));
        self.deliver(id, Outbound::Frame(second));

        tracing::info!(player0 = %waiting, player1 = %id, "session started");
        Ok(())
    }

    fn on_input_changed(
        &mut self,
        id: ConnectionId,
        input: InputChanged,
        raw: Option<&[u8]>,
    ) -> Result<(), SessionError> {
        let Some(peer) = self.peer_of(id) else {
            return Ok(());
        };
        let frame = match raw {
            Some(bytes) => bytes.to_vec(),
            None => Message::from(input).to_bytes()?,
        };
        tracing::trace!(conn_id = %id, %peer, "relaying input");
        self.deliver(peer, Outbound::Frame(frame));
        Ok(())
    }

    fn on_score(&mut self, id: ConnectionId, score: ScoreSubmit) -> Result<(), SessionError> {
        if !self.leaderboard.submit(&score.name, score.score) {
            tracing::debug!(
                conn_id = %id, name = %score.name, score = score.score, "score below best, ignored"
            );
            return Ok(());
        }
        tracing::info!(conn_id = %id, name = %score.name, score = score.score, "leaderboard updated");

        let board = Message::from(self.leaderboard.to_update()).to_bytes()?;
        if let Some(peer) = self.peer_of(id) {
            self.deliver(peer, Outbound::Frame(board.clone()));
        }
        self.deliver(id, Outbound::Frame(board));
        Ok(())
    }

    // -- Helpers ---------------------------------------------------------

    fn name_of(&self, id: ConnectionId) -> String {
        self.display_names.get(&id).cloned().unwrap_or_default()
    }

    fn deliver(&self, id: ConnectionId, out: Outbound) {
        let Some(link) = self.links.get(&id) else {
            tracing::debug!(conn_id = %id, "no outbound link, dropping");
            return;
        };
        if link.send(out).is_err() {
            tracing::debug!(conn_id = %id, "writer gone, dropping outbound");
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `SessionCoordinator`.
    //!
    //! Each fake connection is a registered id plus the receiving end of
    //! its outbound queue, so a test can see exactly what the coordinator
    //! would have written to each socket.

    use std::collections::BTreeMap;

    use duelwire_protocol::LeaderboardUpdate;

    use super::*;
    use crate::{OutboundReceiver, outbound_channel};

    // -- Helpers ----------------------------------------------------------

    struct Client {
        id: ConnectionId,
        rx: OutboundReceiver,
    }

    impl Client {
        /// Drains everything queued so far, decoding frames.
        fn drain(&mut self) -> Vec<Option<Message>> {
            let registry = MessageRegistry::standard();
            let mut out = Vec::new();
            while let Ok(item) = self.rx.try_recv() {
                match item {
                    Outbound::Frame(bytes) => {
                        out.push(Some(registry.decode_frame(&bytes).unwrap().unwrap()))
                    }
                    Outbound::Close => out.push(None),
                }
            }
            out
        }

        fn drain_frames(&mut self) -> Vec<Vec<u8>> {
            let mut out = Vec::new();
            while let Ok(Outbound::Frame(bytes)) = self.rx.try_recv() {
                out.push(bytes);
            }
            out
        }
    }

    fn coordinator() -> SessionCoordinator {
        SessionCoordinator::new(Arc::new(MessageRegistry::standard()))
    }

    fn connect(coord: &mut SessionCoordinator, raw: u64) -> Client {
        let id = ConnectionId::new(raw);
        let (tx, rx) = outbound_channel();
        coord.register(id, tx).expect("register");
        Client { id, rx }
    }

    fn login(coord: &mut SessionCoordinator, client: &Client, name: &str) {
        coord
            .handle_message(client.id, Login::new(name).into())
            .expect("login");
    }

    fn input(pairs: &[(&str, bool)]) -> Message {
        let symbols: BTreeMap<String, bool> =
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        InputChanged::new(symbols).into()
    }

    fn score(name: &str, value: u8) -> Message {
        ScoreSubmit::new(name, value).into()
    }

    fn leaderboard_of(msg: &Option<Message>) -> &LeaderboardUpdate {
        match msg {
            Some(Message::LeaderboardUpdate(update)) => update,
            other => panic!("expected LeaderboardUpdate, got {other:?}"),
        }
    }

    fn session_start_of(msg: &Option<Message>) -> &SessionStart {
        match msg {
            Some(Message::SessionStart(start)) => start,
            other => panic!("expected SessionStart, got {other:?}"),
        }
    }

    // =====================================================================
    // register()
    // =====================================================================

    #[test]
    fn test_register_new_connection_is_unauthenticated() {
        let mut coord = coordinator();
        let a = connect(&mut coord, 1);
        assert_eq!(coord.state_of(a.id), Some(ConnectionState::Unauthenticated));
        assert!(coord.is_registered(a.id));
    }

    #[test]
    fn test_register_twice_returns_error() {
        let mut coord = coordinator();
        let a = connect(&mut coord, 1);
        let (tx, _rx) = outbound_channel();
        assert!(matches!(
            coord.register(a.id, tx),
            Err(SessionError::AlreadyRegistered(id)) if id == a.id
        ));
    }

    #[test]
    fn test_handle_message_unregistered_returns_error() {
        let mut coord = coordinator();
        let result = coord.handle_message(ConnectionId::new(9), Login::new("x").into());
        assert!(matches!(result, Err(SessionError::UnknownConnection(_))));
    }

    // =====================================================================
    // Login / pairing
    // =====================================================================

    #[test]
    fn test_login_first_player_pending_and_receives_leaderboard() {
        let mut coord = coordinator();
        let mut a = connect(&mut coord, 1);

        login(&mut coord, &a, "amy");

        assert_eq!(coord.state_of(a.id), Some(ConnectionState::Pending));
        assert_eq!(coord.pending_ids(), vec![a.id]);
        assert_eq!(coord.display_name(a.id), Some("amy"));
        let sent = a.drain();
        assert_eq!(sent.len(), 1);
        assert!(leaderboard_of(&sent[0]).entries.is_empty());
    }

    #[test]
    fn test_login_pairs_fifo_and_leaves_third_pending() {
        let mut coord = coordinator();
        let a = connect(&mut coord, 1);
        let b = connect(&mut coord, 2);
        let c = connect(&mut coord, 3);

        login(&mut coord, &a, "amy");
        login(&mut coord, &b, "bob");
        login(&mut coord, &c, "cat");

        assert_eq!(coord.peer_of(a.id), Some(b.id));
        assert_eq!(coord.peer_of(b.id), Some(a.id));
        assert_eq!(coord.peer_of(c.id), None);
        assert_eq!(coord.state_of(c.id), Some(ConnectionState::Pending));
        assert_eq!(coord.pending_ids(), vec![c.id]);

        let d = connect(&mut coord, 4);
        login(&mut coord, &d, "dan");
        assert_eq!(coord.peer_of(c.id), Some(d.id));
        assert_eq!(coord.pending_len(), 0);
    }

    #[test]
    fn test_login_assigns_index_zero_to_waiting_player() {
        let mut coord = coordinator();
        let mut a = connect(&mut coord, 1);
        let mut b = connect(&mut coord, 2);

        login(&mut coord, &a, "amy");
        login(&mut coord, &b, "bob");

        let a_msgs = a.drain();
        let b_msgs = b.drain();
        // a: leaderboard on login, then start. b: leaderboard, then start.
        assert_eq!(a_msgs.len(), 2);
        assert_eq!(b_msgs.len(), 2);
        let a_start = session_start_of(&a_msgs[1]);
        let b_start = session_start_of(&b_msgs[1]);

        assert_eq!(a_start.player_index, 0);
        assert_eq!(b_start.player_index, 1);
        let expected = vec!["amy".to_string(), "bob".to_string()];
        assert_eq!(a_start.names, expected);
        assert_eq!(b_start.names, expected);
        assert_eq!(coord.state_of(a.id), Some(ConnectionState::Paired));
        assert_eq!(coord.state_of(b.id), Some(ConnectionState::Paired));
    }

    #[test]
    fn test_login_twice_is_ignored() {
        let mut coord = coordinator();
        let mut a = connect(&mut coord, 1);
        login(&mut coord, &a, "amy");
        a.drain();

        login(&mut coord, &a, "impostor");

        assert_eq!(coord.display_name(a.id), Some("amy"));
        assert_eq!(coord.pending_len(), 1);
        assert!(a.drain().is_empty());
    }

    #[test]
    fn test_login_sends_current_leaderboard() {
        let mut coord = coordinator();
        let a = connect(&mut coord, 1);
        login(&mut coord, &a, "amy");
        coord.handle_message(a.id, score("amy", 40)).unwrap();

        let mut b = connect(&mut coord, 2);
        login(&mut coord, &b, "bob");

        let first = b.drain().into_iter().next().unwrap();
        assert_eq!(leaderboard_of(&first).entries.get("amy"), Some(&40));
    }

    // =====================================================================
    // InputChanged relay
    // =====================================================================

    #[test]
    fn test_input_relayed_to_peer_only() {
        let mut coord = coordinator();
        let mut a = connect(&mut coord, 1);
        let mut b = connect(&mut coord, 2);
        let mut c = connect(&mut coord, 3);
        login(&mut coord, &a, "amy");
        login(&mut coord, &b, "bob");
        login(&mut coord, &c, "cat");
        a.drain();
        b.drain();
        c.drain();

        let msg = input(&[("left", true), ("right", false)]);
        coord.handle_message(a.id, msg.clone()).unwrap();

        assert_eq!(b.drain(), vec![Some(msg)]);
        assert!(a.drain().is_empty(), "never echoed to sender");
        assert!(c.drain().is_empty(), "never leaves the pair");
    }

    #[test]
    fn test_input_frame_relayed_byte_for_byte() {
        let mut coord = coordinator();
        let a = connect(&mut coord, 1);
        let mut b = connect(&mut coord, 2);
        login(&mut coord, &a, "amy");
        login(&mut coord, &b, "bob");
        b.drain();

        let frame = input(&[("up", true)]).to_bytes().unwrap();
        coord.handle_frame(a.id, &frame).unwrap();

        assert_eq!(b.drain_frames(), vec![frame]);
    }

    #[test]
    fn test_input_dropped_when_not_paired() {
        let mut coord = coordinator();
        let mut a = connect(&mut coord, 1);

        coord.handle_message(a.id, input(&[("left", true)])).unwrap();
        login(&mut coord, &a, "amy");
        a.drain();
        coord.handle_message(a.id, input(&[("left", true)])).unwrap();

        assert!(a.drain().is_empty());
    }

    // =====================================================================
    // ScoreSubmit
    // =====================================================================

    #[test]
    fn test_score_broadcast_to_sender_and_peer() {
        let mut coord = coordinator();
        let mut a = connect(&mut coord, 1);
        let mut b = connect(&mut coord, 2);
        login(&mut coord, &a, "amy");
        login(&mut coord, &b, "bob");
        a.drain();
        b.drain();

        coord.handle_message(a.id, score("amy", 7)).unwrap();

        let a_msgs = a.drain();
        let b_msgs = b.drain();
        assert_eq!(a_msgs.len(), 1);
        assert_eq!(b_msgs.len(), 1);
        assert_eq!(leaderboard_of(&a_msgs[0]).entries["amy"], 7);
        assert_eq!(a_msgs, b_msgs);
    }

    #[test]
    fn test_score_lower_than_best_not_stored_nor_sent() {
        let mut coord = coordinator();
        let mut a = connect(&mut coord, 1);
        login(&mut coord, &a, "amy");
        coord.handle_message(a.id, score("amy", 5)).unwrap();
        a.drain();

        coord.handle_message(a.id, score("amy", 3)).unwrap();

        assert_eq!(coord.leaderboard().best("amy"), Some(5));
        assert!(a.drain().is_empty());
    }

    #[test]
    fn test_score_equal_to_best_overwrites_and_broadcasts() {
        let mut coord = coordinator();
        let mut a = connect(&mut coord, 1);
        login(&mut coord, &a, "amy");
        coord.handle_message(a.id, score("amy", 5)).unwrap();
        a.drain();

        coord.handle_message(a.id, score("amy", 5)).unwrap();

        let sent = a.drain();
        assert_eq!(sent.len(), 1);
        assert_eq!(leaderboard_of(&sent[0]).entries["amy"], 5);
    }

    #[test]
    fn test_score_from_pending_goes_to_sender_only() {
        let mut coord = coordinator();
        let mut a = connect(&mut coord, 1);
        let mut c = connect(&mut coord, 3);
        login(&mut coord, &a, "amy");
        a.drain();

        coord.handle_message(a.id, score("amy", 1)).unwrap();

        assert_eq!(a.drain().len(), 1);
        assert!(c.drain().is_empty());
    }

    #[test]
    fn test_score_boundary_values() {
        let mut coord = coordinator();
        let a = connect(&mut coord, 1);
        login(&mut coord, &a, "amy");
        coord.handle_message(a.id, score("zero", 0)).unwrap();
        coord.handle_message(a.id, score("max", 255)).unwrap();

        assert_eq!(coord.leaderboard().best("zero"), Some(0));
        assert_eq!(coord.leaderboard().best("max"), Some(255));
    }

    // =====================================================================
    // handle_frame()
    // =====================================================================

    #[test]
    fn test_handle_frame_unknown_tag_ignored() {
        let mut coord = coordinator();
        let mut a = connect(&mut coord, 1);

        coord.handle_frame(a.id, &[42, 0, 0]).expect("unknown tag is not an error");

        assert_eq!(coord.state_of(a.id), Some(ConnectionState::Unauthenticated));
        assert!(a.drain().is_empty());
    }

    #[test]
    fn test_handle_frame_malformed_returns_protocol_error() {
        let mut coord = coordinator();
        let a = connect(&mut coord, 1);

        // Login claiming a 10-byte name with 1 byte present.
        let result = coord.handle_frame(a.id, &[1, 10, b'x']);

        assert!(matches!(result, Err(SessionError::Protocol(_))));
        assert_eq!(coord.display_name(a.id), None);
    }

    #[test]
    fn test_server_bound_kinds_from_client_ignored() {
        let mut coord = coordinator();
        let mut a = connect(&mut coord, 1);
        login(&mut coord, &a, "amy");
        a.drain();

        coord
            .handle_message(a.id, SessionStart::new(0, vec!["x".into()]).into())
            .unwrap();
        coord
            .handle_message(a.id, LeaderboardUpdate::default().into())
            .unwrap();

        assert_eq!(coord.state_of(a.id), Some(ConnectionState::Pending));
        assert!(a.drain().is_empty());
    }

    // =====================================================================
    // handle_close()
    // =====================================================================

    #[test]
    fn test_close_paired_closes_peer_and_clears_link() {
        let mut coord = coordinator();
        let a = connect(&mut coord, 1);
        let mut b = connect(&mut coord, 2);
        login(&mut coord, &a, "amy");
        login(&mut coord, &b, "bob");
        coord.handle_message(b.id, score("bob", 9)).unwrap();
        b.drain();

        coord.handle_close(a.id);

        assert_eq!(b.drain(), vec![None], "peer must be told to close");
        assert_eq!(coord.peer_of(a.id), None);
        assert_eq!(coord.peer_of(b.id), None);
        assert_eq!(coord.state_of(a.id), None);
        assert_eq!(coord.state_of(b.id), Some(ConnectionState::Closed));
        // Names and scores survive the cascade.
        assert_eq!(coord.display_name(a.id), Some("amy"));
        assert_eq!(coord.display_name(b.id), Some("bob"));
        assert_eq!(coord.leaderboard().best("bob"), Some(9));
    }

    #[test]
    fn test_close_cascaded_peer_ignores_further_messages() {
        let mut coord = coordinator();
        let a = connect(&mut coord, 1);
        let mut b = connect(&mut coord, 2);
        login(&mut coord, &a, "amy");
        login(&mut coord, &b, "bob");
        coord.handle_close(a.id);
        b.drain();

        coord.handle_message(b.id, input(&[("left", true)])).unwrap();
        coord.handle_message(b.id, score("bob", 3)).unwrap();
        coord.handle_close(b.id);

        assert!(b.drain().is_empty());
        assert_eq!(coord.state_of(b.id), None);
        assert_eq!(coord.connection_count(), 0);
        assert_eq!(coord.leaderboard().best("bob"), None);
    }

    #[test]
    fn test_close_pending_removes_from_pool() {
        let mut coord = coordinator();
        let a = connect(&mut coord, 1);
        let b = connect(&mut coord, 2);
        login(&mut coord, &a, "amy");

        coord.handle_close(a.id);
        assert_eq!(coord.pending_len(), 0);

        login(&mut coord, &b, "bob");
        assert_eq!(coord.state_of(b.id), Some(ConnectionState::Pending));
        assert_eq!(coord.display_name(a.id), Some("amy"));
    }

    #[test]
    fn test_pool_after_cascade_pairs_in_arrival_order() {
        let mut coord = coordinator();
        let a = connect(&mut coord, 1);
        let b = connect(&mut coord, 2);
        let c = connect(&mut coord, 3);
        let d = connect(&mut coord, 4);
        login(&mut coord, &a, "amy");
        login(&mut coord, &b, "bob");
        login(&mut coord, &c, "cat");
        let e = connect(&mut coord, 5);
        coord.handle_close(a.id); // cascades to b
        coord.handle_close(b.id);
        login(&mut coord, &d, "dan"); // pairs with c
        login(&mut coord, &e, "eve");

        assert_eq!(coord.peer_of(c.id), Some(d.id));
        assert_eq!(coord.pending_ids(), vec![e.id]);
    }

    #[test]
    fn test_close_unauthenticated_and_unknown_are_noops() {
        let mut coord = coordinator();
        let a = connect(&mut coord, 1);

        coord.handle_close(a.id);
        coord.handle_close(a.id);
        coord.handle_close(ConnectionId::new(99));

        assert!(!coord.is_registered(a.id));
        assert_eq!(coord.pending_len(), 0);
    }

    #[test]
    fn test_deliver_to_dropped_writer_does_not_panic() {
        let mut coord = coordinator();
        let a = connect(&mut coord, 1);
        drop(a.rx);

        coord.handle_message(a.id, Login::new("amy").into()).unwrap();

        assert_eq!(coord.state_of(a.id), Some(ConnectionState::Pending));
    }
}
