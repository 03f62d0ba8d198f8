//! Error types for the protocol layer.
//!
//! Each crate in Duelwire defines its own error enum. A `ProtocolError`
//! always means the bytes themselves are wrong (or a value cannot be
//! represented on the wire), never that a socket failed or a message
//! arrived in the wrong session state.

/// Errors that can occur while encoding or decoding messages.
///
/// An unrecognised type tag is not an error: the registry reports
/// it as "no message" so callers can skip kinds they do not know.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The buffer ended before a field was complete.
    #[error("truncated frame: needed {needed} byte(s), {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// A string does not fit the one-byte length prefix.
    #[error("string of {0} bytes exceeds the 255-byte limit")]
    StringTooLong(usize),

    /// A list or map has more entries than the one-byte count allows.
    #[error("{0} entries exceed the 255-entry limit")]
    TooManyEntries(usize),

    /// A string field is not valid UTF-8.
    #[error("invalid utf-8 in string field: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// A kind-specific decoder was handed a frame of another kind.
    #[error("type tag mismatch: expected {expected}, found {found}")]
    TagMismatch { expected: u8, found: u8 },

    /// A registry was asked to encode a kind it does not know.
    #[error("message kind {name} (tag {tag}) is not registered")]
    UnregisteredKind { tag: u8, name: &'static str },

    /// A whole frame decoded cleanly but bytes were left over.
    #[error("{0} trailing byte(s) after message")]
    TrailingBytes(usize),
}
