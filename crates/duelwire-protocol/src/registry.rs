//! Tag → decoder table.
//!
//! The registry is an ordinary value: build it once at startup with
//! [`MessageRegistry::standard`] and hand out references. Nothing here is
//! global, so a test can build a registry with only the kinds it cares
//! about.

use std::collections::BTreeMap;

use crate::message::{
    InputChanged, LeaderboardUpdate, Login, Message, ScoreSubmit,
    SessionStart, WireMessage,
};
use crate::{Deserializer, ProtocolError};

type DecodeFn = fn(&mut Deserializer<'_>) -> Result<Message, ProtocolError>;

#[derive(Clone, Copy)]
struct Entry {
    name: &'static str,
    decode: DecodeFn,
}

fn decode_as<M>(de: &mut Deserializer<'_>) -> Result<Message, ProtocolError>
where
    M: WireMessage + Into<Message>,
{
    M::decode(de).map(Into::into)
}

/// Maps type tags to the decoders of the registered message kinds.
#[derive(Clone, Default)]
pub struct MessageRegistry {
    entries: BTreeMap<u8, Entry>,
}

impl MessageRegistry {
    /// Creates a registry that knows no kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every kind of the protocol registered.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry
            .register::<Login>()
            .register::<SessionStart>()
            .register::<InputChanged>()
            .register::<ScoreSubmit>()
            .register::<LeaderboardUpdate>();
        registry
    }

    /// Registers `M` under its [`WireMessage::TYPE_TAG`].
    ///
    /// Registering a second kind under the same tag replaces the first.
    pub fn register<M>(&mut self) -> &mut Self
    where
        M: WireMessage + Into<Message>,
    {
        self.entries.insert(
            M::TYPE_TAG,
            Entry {
                name: M::NAME,
                decode: decode_as::<M>,
            },
        );
        self
    }

    pub fn is_registered(&self, tag: u8) -> bool {
        self.entries.contains_key(&tag)
    }

    /// Name of the kind registered under `tag`, if any.
    pub fn kind_name(&self, tag: u8) -> Option<&'static str> {
        self.entries.get(&tag).map(|e| e.name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decodes the next message from `de`.
    ///
    /// Peeks the tag first. An unregistered tag yields `Ok(None)` and the
    /// cursor is left where it was; a registered tag whose payload does not
    /// decode is an error.
    pub fn create(
        &self,
        de: &mut Deserializer<'_>,
    ) -> Result<Option<Message>, ProtocolError> {
        let tag = de.peek_u8()?;
        match self.entries.get(&tag) {
            Some(entry) => (entry.decode)(de).map(Some),
            None => {
                tracing::debug!(tag, "ignoring unknown message tag");
                Ok(None)
            }
        }
    }

    /// Decodes one whole frame, rejecting bytes left after the message.
    pub fn decode_frame(
        &self,
        frame: &[u8],
    ) -> Result<Option<Message>, ProtocolError> {
        let mut de = Deserializer::new(frame);
        let Some(msg) = self.create(&mut de)? else {
            return Ok(None);
        };
        if !de.is_exhausted() {
            return Err(ProtocolError::TrailingBytes(de.remaining()));
        }
        Ok(Some(msg))
    }

    /// Encodes `msg` into a fresh frame.
    ///
    /// Only registered kinds are encoded, so a peer using the same table
    /// can always decode the result.
    pub fn encode(&self, msg: &Message) -> Result<Vec<u8>, ProtocolError> {
        let tag = msg.type_tag();
        if !self.is_registered(tag) {
            return Err(ProtocolError::UnregisteredKind {
                tag,
                name: msg.kind_name(),
            });
        }
        msg.to_bytes()
    }
}

impl std::fmt::Debug for MessageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(tag, e)| (tag, e.name)))
            .finish()
    }
}
