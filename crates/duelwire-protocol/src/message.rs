//! The closed set of message kinds exchanged between client and server.
//!
//! Every kind implements [`WireMessage`]: a stable one-byte tag plus a
//! pair of field routines that are exact inverses of each other. The
//! provided [`WireMessage::encode`] writes the tag and then the fields;
//! [`WireMessage::decode`] reads and checks the tag and then the fields,
//! in the same order.
//!
//! | Kind | Tag |
//! |---|---|
//! | [`Login`] | 1 |
//! | [`SessionStart`] | 2 |
//! | [`InputChanged`] | 100 |
//! | [`ScoreSubmit`] | 101 |
//! | [`LeaderboardUpdate`] | 102 |

use std::collections::BTreeMap;

use crate::{Deserializer, ProtocolError, Serializer};

/// Encode/decode capability shared by every message kind.
pub trait WireMessage: Sized {
    /// Leading byte identifying this kind on the wire.
    const TYPE_TAG: u8;

    /// Human-readable kind name, used in logs.
    const NAME: &'static str;

    /// Writes the kind-specific payload (everything after the tag).
    fn encode_fields(&self, ser: &mut Serializer) -> Result<(), ProtocolError>;

    /// Reads the kind-specific payload (everything after the tag).
    fn decode_fields(de: &mut Deserializer<'_>) -> Result<Self, ProtocolError>;

    /// Writes the tag followed by the payload.
    fn encode(&self, ser: &mut Serializer) -> Result<(), ProtocolError> {
        ser.write_u8(Self::TYPE_TAG);
        self.encode_fields(ser)
    }

    /// Reads and checks the tag, then the payload.
    fn decode(de: &mut Deserializer<'_>) -> Result<Self, ProtocolError> {
        let found = de.read_u8()?;
        if found != Self::TYPE_TAG {
            return Err(ProtocolError::TagMismatch {
                expected: Self::TYPE_TAG,
                found,
            });
        }
        Self::decode_fields(de)
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Client → Server: "this is my display name."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub name: String,
}

impl Login {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl WireMessage for Login {
    const TYPE_TAG: u8 = 1;
    const NAME: &'static str = "Login";

    fn encode_fields(&self, ser: &mut Serializer) -> Result<(), ProtocolError> {
        ser.write_string(&self.name)
    }

    fn decode_fields(de: &mut Deserializer<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            name: de.read_string()?,
        })
    }
}

// ---------------------------------------------------------------------------
// SessionStart
// ---------------------------------------------------------------------------

/// Server → Client: "you are paired; here are the players and your slot."
///
/// `names` is ordered by player index, so `names[player_index]` is the
/// receiver's own name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStart {
    pub player_index: u8,
    pub names: Vec<String>,
}

impl SessionStart {
    pub fn new(player_index: u8, names: Vec<String>) -> Self {
        Self {
            player_index,
            names,
        }
    }
}

impl WireMessage for SessionStart {
    const TYPE_TAG: u8 = 2;
    const NAME: &'static str = "SessionStart";

    fn encode_fields(&self, ser: &mut Serializer) -> Result<(), ProtocolError> {
        ser.write_u8(self.player_index);
        ser.write_count(self.names.len())?;
        for name in &self.names {
            ser.write_string(name)?;
        }
        Ok(())
    }

    fn decode_fields(de: &mut Deserializer<'_>) -> Result<Self, ProtocolError> {
        let player_index = de.read_u8()?;
        let count = de.read_u8()?;
        let names = (0..count)
            .map(|_| de.read_string())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            player_index,
            names,
        })
    }
}

// ---------------------------------------------------------------------------
// InputChanged
// ---------------------------------------------------------------------------

/// Client → Server → peer: the sender's complete input state.
///
/// Always carries every tracked symbol, not only the ones that flipped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputChanged {
    pub symbols: BTreeMap<String, bool>,
}

impl InputChanged {
    pub fn new(symbols: BTreeMap<String, bool>) -> Self {
        Self { symbols }
    }
}

impl WireMessage for InputChanged {
    const TYPE_TAG: u8 = 100;
    const NAME: &'static str = "InputChanged";

    fn encode_fields(&self, ser: &mut Serializer) -> Result<(), ProtocolError> {
        ser.write_count(self.symbols.len())?;
        for (symbol, &pressed) in &self.symbols {
            ser.write_string(symbol)?;
            ser.write_u8(u8::from(pressed));
        }
        Ok(())
    }

    fn decode_fields(de: &mut Deserializer<'_>) -> Result<Self, ProtocolError> {
        let count = de.read_u8()?;
        let mut symbols = BTreeMap::new();
        for _ in 0..count {
            let symbol = de.read_string()?;
            let flag = de.read_u8()?;
            symbols.insert(symbol, flag != 0);
        }
        Ok(Self { symbols })
    }
}

// ---------------------------------------------------------------------------
// ScoreSubmit
// ---------------------------------------------------------------------------

/// Client → Server: a finished score for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSubmit {
    pub name: String,
    pub score: u8,
}

impl ScoreSubmit {
    pub fn new(name: impl Into<String>, score: u8) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

impl WireMessage for ScoreSubmit {
    const TYPE_TAG: u8 = 101;
    const NAME: &'static str = "ScoreSubmit";

    fn encode_fields(&self, ser: &mut Serializer) -> Result<(), ProtocolError> {
        ser.write_string(&self.name)?;
        ser.write_u8(self.score);
        Ok(())
    }

    fn decode_fields(de: &mut Deserializer<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            name: de.read_string()?,
            score: de.read_u8()?,
        })
    }
}

// ---------------------------------------------------------------------------
// LeaderboardUpdate
// ---------------------------------------------------------------------------

/// Server → Client: the full name → best score table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeaderboardUpdate {
    pub entries: BTreeMap<String, u8>,
}

impl LeaderboardUpdate {
    pub fn new(entries: BTreeMap<String, u8>) -> Self {
        Self { entries }
    }
}

impl WireMessage for LeaderboardUpdate {
    const TYPE_TAG: u8 = 102;
    const NAME: &'static str = "LeaderboardUpdate";

    fn encode_fields(&self, ser: &mut Serializer) -> Result<(), ProtocolError> {
        ser.write_count(self.entries.len())?;
        for (name, &score) in &self.entries {
            ser.write_string(name)?;
            ser.write_u8(score);
        }
        Ok(())
    }

    fn decode_fields(de: &mut Deserializer<'_>) -> Result<Self, ProtocolError> {
        let count = de.read_u8()?;
        let mut entries = BTreeMap::new();
        for _ in 0..count {
            let name = de.read_string()?;
            let score = de.read_u8()?;
            entries.insert(name, score);
        }
        Ok(Self { entries })
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One decoded message of any registered kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Login(Login),
    SessionStart(SessionStart),
    InputChanged(InputChanged),
    ScoreSubmit(ScoreSubmit),
    LeaderboardUpdate(LeaderboardUpdate),
}

impl Message {
    pub fn type_tag(&self) -> u8 {
        match self {
            Self::Login(_) => Login::TYPE_TAG,
            Self::SessionStart(_) => SessionStart::TYPE_TAG,
            Self::InputChanged(_) => InputChanged::TYPE_TAG,
            Self::ScoreSubmit(_) => ScoreSubmit::TYPE_TAG,
            Self::LeaderboardUpdate(_) => LeaderboardUpdate::TYPE_TAG,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Login(_) => Login::NAME,
            Self::SessionStart(_) => SessionStart::NAME,
            Self::InputChanged(_) => InputChanged::NAME,
            Self::ScoreSubmit(_) => ScoreSubmit::NAME,
            Self::LeaderboardUpdate(_) => LeaderboardUpdate::NAME,
        }
    }

    /// Writes the tag and payload of the wrapped kind.
    pub fn encode(&self, ser: &mut Serializer) -> Result<(), ProtocolError> {
        match self {
            Self::Login(m) => m.encode(ser),
            Self::SessionStart(m) => m.encode(ser),
            Self::InputChanged(m) => m.encode(ser),
            Self::ScoreSubmit(m) => m.encode(ser),
            Self::LeaderboardUpdate(m) => m.encode(ser),
        }
    }

    /// Encodes into a fresh frame.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut ser = Serializer::new();
        self.encode(&mut ser)?;
        Ok(ser.into_bytes())
    }
}

macro_rules! impl_from_kind {
    ($($kind:ident),* $(,)?) => {
        $(
            impl From<$kind> for Message {
                fn from(m: $kind) -> Self {
                    Self::$kind(m)
                }
            }
        )*
    };
}

impl_from_kind!(Login, SessionStart, InputChanged, ScoreSubmit, LeaderboardUpdate);
