//! Input replication between the two players of a session.
//!
//! Each player entity has one [`InputReplicator`]. The local player's
//! replicator watches the keyboard (any [`InputSource`]) and sends the
//! whole input map whenever something changed since the last tick. The
//! remote player's replicator ignores the keyboard and mirrors whatever
//! the peer last sent.

use std::collections::BTreeMap;

use duelwire_protocol::{InputChanged, Message};

use crate::{ClientError, MessageSink};

/// Local key state, as provided by the host application.
pub trait InputSource {
    /// Every symbol this source tracks.
    fn symbols(&self) -> Vec<String>;

    /// Whether `symbol` is currently pressed.
    fn get_key(&self, symbol: &str) -> bool;
}

/// Sends local input changes, or mirrors the peer's input.
#[derive(Debug, Clone)]
pub struct InputReplicator {
    local: bool,
    state: BTreeMap<String, bool>,
}

impl InputReplicator {
    /// Tracks every symbol of `source`, all released. Starts local.
    pub fn new(source: &dyn InputSource) -> Self {
        let state = source
            .symbols()
            .into_iter()
            .map(|symbol| (symbol, false))
            .collect();
        Self { local: true, state }
    }

    pub fn set_local(&mut self, local: bool) {
        self.local = local;
    }

    pub fn is_local(&self) -> bool {
        self.local
    }

    /// Samples `source` and sends the full map if anything changed.
    ///
    /// Only tracked symbols are sampled. Does nothing for a remote
    /// replicator. Returns `true` when a message was queued. The snapshot
    /// only moves forward once the message was accepted by `sink`, so a
    /// failed send is retried on the next tick.
    pub fn tick(
        &mut self,
        source: &dyn InputSource,
        sink: &dyn MessageSink,
    ) -> Result<bool, ClientError> {
        if !self.local {
            return Ok(false);
        }

        let current: BTreeMap<String, bool> = self
            .state
            .keys()
            .map(|symbol| (symbol.clone(), source.get_key(symbol)))
            .collect();
        if current == self.state {
            return Ok(false);
        }

        sink.send(InputChanged::new(current.clone()).into())?;
        self.state = current;
        Ok(true)
    }

    /// Replaces the mirrored state with the peer's latest input.
    ///
    /// Ignored while local, and for every kind other than `InputChanged`.
    pub fn on_message(&mut self, msg: &Message) {
        if self.local {
            return;
        }
        if let Message::InputChanged(input) = msg {
            self.state = input.symbols.clone();
        }
    }

    /// Last known value of `symbol`; `false` if it was never seen.
    pub fn get_key(&self, symbol: &str) -> bool {
        self.state.get(symbol).copied().unwrap_or(false)
    }

    pub fn state(&self) -> &BTreeMap<String, bool> {
        &self.state
    }
}
