//! Primitive field codec.
//!
//! [`Serializer`] appends fields to a growable buffer; [`Deserializer`]
//! reads them back through a cursor over a borrowed slice. Integers are
//! little-endian. Strings are UTF-8 behind a one-byte length, so at most
//! 255 bytes can be written.
//!
//! ```rust
//! use duelwire_protocol::{Deserializer, Serializer};
//!
//! let mut ser = Serializer::new();
//! ser.write_u8(7);
//! ser.write_string("alice").unwrap();
//! let bytes = ser.into_bytes();
//!
//! let mut de = Deserializer::new(&bytes);
//! assert_eq!(de.read_u8().unwrap(), 7);
//! assert_eq!(de.read_string().unwrap(), "alice");
//! assert!(de.is_exhausted());
//! ```

use crate::ProtocolError;

/// Largest string (in bytes) and largest entry count the format allows.
pub const MAX_SHORT_LEN: usize = u8::MAX as usize;

/// Append-only output buffer for one message.
#[derive(Debug, Default, Clone)]
pub struct Serializer {
    buf: Vec<u8>,
}

impl Serializer {
    /// Creates an empty serializer.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Writes a length-prefixed UTF-8 string.
    ///
    /// # Errors
    /// [`ProtocolError::StringTooLong`] if `s` is over 255 bytes. The
    /// buffer is left untouched in that case.
    pub fn write_string(&mut self, s: &str) -> Result<(), ProtocolError> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_SHORT_LEN {
            return Err(ProtocolError::StringTooLong(bytes.len()));
        }
        self.buf.push(bytes.len() as u8);
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Writes the one-byte entry count that prefixes lists and maps.
    pub fn write_count(&mut self, len: usize) -> Result<(), ProtocolError> {
        let count =
            u8::try_from(len).map_err(|_| ProtocolError::TooManyEntries(len))?;
        self.write_u8(count);
        Ok(())
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the serializer and returns the finished frame.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Sequential reader over one received frame.
#[derive(Debug, Clone)]
pub struct Deserializer<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Deserializer<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Reads the next byte without advancing the cursor.
    pub fn peek_u8(&self) -> Result<u8, ProtocolError> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or(ProtocolError::Truncated {
                needed: 1,
                remaining: 0,
            })
    }

    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        let v = self.peek_u8()?;
        self.pos += 1;
        Ok(v)
    }

    pub fn read_u32(&mut self) -> Result<u32, ProtocolError> {
        let bytes = self.take(4)?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(bytes);
        Ok(u32::from_le_bytes(raw))
    }

    pub fn read_string(&mut self) -> Result<String, ProtocolError> {
        let len = self.read_u8()? as usize;
        let bytes = self.take(len)?;
        Ok(std::str::from_utf8(bytes)?.to_owned())
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Current cursor offset from the start of the frame.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(ProtocolError::Truncated {
                needed: n,
                remaining,
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}
