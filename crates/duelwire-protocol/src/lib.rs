//! Wire protocol for Duelwire.
//!
//! This crate defines the "language" that clients and servers speak:
//!
//! - **Codec** ([`Serializer`], [`Deserializer`]): primitive fields to and
//!   from a contiguous byte frame.
//! - **Messages** ([`Message`] and the five kinds): what travels on the
//!   wire, each with a stable one-byte tag.
//! - **Registry** ([`MessageRegistry`]): tag → decoder lookup, with
//!   unknown tags reported as "no message".
//! - **Errors** ([`ProtocolError`]): what can go wrong while encoding or
//!   decoding.
//!
//! # Architecture
//!
//! ```text
//! Transport (frames) → Protocol (Message) → Session (pairing, relay)
//! ```
//!
//! The protocol layer knows nothing about connections or sessions.

mod codec;
mod error;
mod message;
mod registry;

pub use codec::{Deserializer, MAX_SHORT_LEN, Serializer};
pub use error::ProtocolError;
pub use message::{
    InputChanged, LeaderboardUpdate, Login, Message, ScoreSubmit,
    SessionStart, WireMessage,
};
pub use registry::MessageRegistry;
