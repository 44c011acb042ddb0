#![doc = r#"
A cursor over the bytes of a single track chunk.

[`Track::read`](crate::track::Track::read) pulls a whole chunk out of the
[`ByteStream`](crate::stream::ByteStream) and hands it to a [`Reader`];
the message state machine then consumes it byte by byte. Every failure
records the offset it happened at.
"#]

mod error;
pub use error::*;

use crate::{ParseError, vlq};

/// Reads bytes from an in-memory track buffer
#[derive(Debug, Clone)]
pub struct Reader<'slc> {
    data: &'slc [u8],
    position: usize,
}

impl<'slc> Reader<'slc> {
    /// Create a reader positioned at the start of `data`
    pub const fn from_byte_slice(data: &'slc [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Offset of the next byte to be read
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    /// Total size of the buffer
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the buffer is empty
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes not yet consumed
    pub const fn unread_count(&self) -> usize {
        self.data.len() - self.position
    }

    /// True if at least `count` bytes remain
    pub const fn can_read(&self, count: usize) -> bool {
        count <= self.unread_count()
    }

    /// Returns the next byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    /// Consume one byte
    pub fn read_byte(&mut self) -> ReadResult<u8> {
        let byte = self.peek().ok_or(ReaderError::oob(self.position))?;
        self.position += 1;
        Ok(byte)
    }

    /// Consume exactly `count` bytes, or nothing if fewer remain
    pub fn read_exact(&mut self, count: usize) -> ReadResult<&'slc [u8]> {
        if !self.can_read(count) {
            return Err(ReaderError::oob(self.position));
        }
        let start = self.position;
        self.position += count;
        Ok(&self.data[start..self.position])
    }

    /// Consume a variable-length quantity, returning its value and encoded size
    pub fn read_vlq(&mut self) -> ReadResult<(u32, u32)> {
        let start = self.position;
        vlq::decode_with(
            || self.read_byte(),
            || ReaderError::invalid(start, ParseError::MalformedVlq),
        )
    }
}

#[test]
fn reads_within_bounds() {
    use pretty_assertions::assert_eq;
    let bytes = [0x81, 0x00, 0xFF, 0x2F, 0x00];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert_eq!(reader.read_vlq(), Ok((0x80, 2)));
    assert_eq!(reader.peek(), Some(0xFF));
    assert_eq!(reader.read_exact(3), Ok(&bytes[2..]));
    assert_eq!(reader.unread_count(), 0);

    let err = reader.read_byte().unwrap_err();
    assert!(err.is_out_of_bounds());
    assert_eq!(err.position(), 5);
}

#[test]
fn malformed_vlq_reports_its_start() {
    let bytes = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
    let mut reader = Reader::from_byte_slice(&bytes);
    reader.read_byte().unwrap();
    let err = reader.read_vlq().unwrap_err();
    assert_eq!(err.position(), 1);
    assert_eq!(err.parse_error(), Some(&ParseError::MalformedVlq));
}
