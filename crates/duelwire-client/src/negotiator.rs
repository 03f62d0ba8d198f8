//! Login and player slot assignment.

use duelwire_protocol::{Login, Message};

use crate::{ClientConfig, ClientError, MessageSink};

/// One player position in the local game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerSlot {
    /// Display name, set once the session starts.
    pub name: Option<String>,
    /// `true` for the slot controlled on this machine.
    pub is_local: bool,
}

/// Logs in and, once paired, tells the game which slot is local.
#[derive(Debug, Clone)]
pub struct SessionNegotiator {
    slots: Vec<PlayerSlot>,
    local_index: Option<usize>,
    started: bool,
}

impl SessionNegotiator {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![PlayerSlot::default(); slot_count],
            local_index: None,
            started: false,
        }
    }

    /// Validates `config` and sends the Login.
    pub fn on_ready(
        &self,
        config: &ClientConfig,
        sink: &dyn MessageSink,
    ) -> Result<(), ClientError> {
        config.validate()?;
        tracing::info!(alias = %config.alias, "logging in");
        sink.send(Login::new(config.alias.clone()).into())
    }

    /// Applies a `SessionStart`, returning the local slot index.
    ///
    /// Slot `i` takes the `i`-th name; names past the last slot are
    /// dropped. Returns `None` for every other kind, and when the assigned
    /// index has no slot.
    pub fn on_message(&mut self, msg: &Message) -> Option<usize> {
        let Message::SessionStart(start) = msg else {
            return None;
        };

        let index = usize::from(start.player_index);
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.name = start.names.get(i).cloned();
            slot.is_local = i == index;
        }
        self.local_index = (index < self.slots.len()).then_some(index);
        self.started = true;

        tracing::info!(
            player_index = start.player_index,
            names = ?start.names,
            "session started"
        );
        self.local_index
    }

    pub fn slots(&self) -> &[PlayerSlot] {
        &self.slots
    }

    pub fn local_index(&self) -> Option<usize> {
        self.local_index
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}
