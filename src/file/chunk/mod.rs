#![doc = r#"
Chunk framing

A file is a sequence of chunks, each an ASCII tag and a big-endian length
followed by that many bytes:

```text
[MThd][00 00 00 06][format u16][track count u16][division u16]
[MTrk][length u32 ][(delta, event) pairs ...                 ]
[MTrk] ...
[????] ...  any other tag is skipped by its length
```

The header chunk's six bytes are read along with the header and kept in
[`ChunkHeader`] so the format, track count and division can be inspected or
changed. The payload of any other chunk is left in the stream for the caller.
"#]

mod error;
pub use error::*;

use crate::stream::{ByteStream, StreamError};

/// The kind of a chunk, from its tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    /// `MThd`
    File,
    /// `MTrk`
    Track,
    /// Anything else
    Unknown([u8; 4]),
}

impl ChunkKind {
    /// Tag of the header chunk
    pub const FILE_TAG: [u8; 4] = *b"MThd";
    /// Tag of a track chunk
    pub const TRACK_TAG: [u8; 4] = *b"MTrk";

    /// Classify a tag
    pub const fn from_tag(tag: [u8; 4]) -> Self {
        match &tag {
            b"MThd" => Self::File,
            b"MTrk" => Self::Track,
            _ => Self::Unknown(tag),
        }
    }

    /// The four tag bytes
    pub const fn tag(&self) -> [u8; 4] {
        match self {
            Self::File => Self::FILE_TAG,
            Self::Track => Self::TRACK_TAG,
            Self::Unknown(tag) => *tag,
        }
    }
}

/// The eight byte prefix of a chunk, plus the payload of a header chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkHeader {
    kind: ChunkKind,
    length: u32,
    header_data: Vec<u8>,
}

impl ChunkHeader {
    /// Size of the tag and length fields
    pub const SIZE: u64 = 8;

    /// A header chunk with the given fields
    pub fn file(format: u16, track_count: u16, division: u16) -> Self {
        let mut header_data = Vec::with_capacity(6);
        header_data.extend_from_slice(&format.to_be_bytes());
        header_data.extend_from_slice(&track_count.to_be_bytes());
        header_data.extend_from_slice(&division.to_be_bytes());
        Self {
            kind: ChunkKind::File,
            length: 6,
            header_data,
        }
    }

    /// A track chunk prefix declaring `length` bytes of events
    pub fn track(length: u32) -> Self {
        Self {
            kind: ChunkKind::Track,
            length,
            header_data: Vec::new(),
        }
    }

    /// Read the next chunk prefix.
    ///
    /// For a header chunk the payload is read as well. For every other chunk
    /// the stream is left at the start of the payload.
    ///
    /// # Errors
    /// - [`ChunkError::TruncatedHeader`] if fewer than eight bytes remain
    /// - [`ChunkError::TruncatedPayload`] if a header chunk's payload is cut short
    pub fn read(stream: &mut ByteStream) -> Result<Self, ChunkError> {
        if !stream.is_open() {
            return Err(StreamError::Closed.into());
        }
        let remaining = stream.bytes_remaining();
        if remaining < Self::SIZE {
            return Err(ChunkError::TruncatedHeader { remaining });
        }
        let kind = ChunkKind::from_tag(stream.read_tag()?);
        let length = stream.read_u32()?;
        let mut header = Self {
            kind,
            length,
            header_data: Vec::new(),
        };
        if kind == ChunkKind::File {
            header.ensure_payload(stream)?;
            header.header_data = stream.read_exact(length as u64)?;
        }
        Ok(header)
    }

    fn ensure_payload(&self, stream: &ByteStream) -> Result<(), ChunkError> {
        let remaining = stream.bytes_remaining();
        if (self.length as u64) > remaining {
            return Err(ChunkError::TruncatedPayload {
                tag: self.kind.tag(),
                declared: self.length,
                remaining,
            });
        }
        Ok(())
    }

    /// Read the payload of a track or unknown chunk
    pub fn read_payload(&self, stream: &mut ByteStream) -> Result<Vec<u8>, ChunkError> {
        self.ensure_payload(stream)?;
        Ok(stream.read_exact(self.length as u64)?)
    }

    /// Discard the payload of a track or unknown chunk
    pub fn skip_payload(&self, stream: &mut ByteStream) -> Result<(), ChunkError> {
        self.ensure_payload(stream)?;
        Ok(stream.skip(self.length as u64)?)
    }

    /// Write the prefix, followed by the payload for a header chunk.
    ///
    /// # Errors
    /// [`ChunkError::UnknownTag`] for chunks other than `MThd` and `MTrk`
    pub fn write(&self, stream: &mut ByteStream) -> Result<(), ChunkError> {
        if let ChunkKind::Unknown(tag) = self.kind {
            return Err(ChunkError::UnknownTag(tag));
        }
        stream.write_all(&self.kind.tag())?;
        stream.write_u32(self.length)?;
        if self.kind == ChunkKind::File {
            stream.write_all(&self.header_data)?;
        }
        Ok(())
    }

    /// The chunk kind
    pub const fn kind(&self) -> ChunkKind {
        self.kind
    }

    /// The declared payload length
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// The header chunk payload; empty for other chunks
    pub fn header_data(&self) -> &[u8] {
        &self.header_data
    }

    fn header_field(&self, offset: usize) -> Option<u16> {
        if self.kind != ChunkKind::File {
            return None;
        }
        match self.header_data.get(offset..offset + 2)? {
            &[hi, lo] => Some(u16::from_be_bytes([hi, lo])),
            _ => None,
        }
    }

    fn set_header_field(&mut self, offset: usize, value: u16) -> bool {
        if self.kind != ChunkKind::File {
            return false;
        }
        match self.header_data.get_mut(offset..offset + 2) {
            Some(slot) => {
                slot.copy_from_slice(&value.to_be_bytes());
                true
            }
            None => false,
        }
    }

    /// The format field of a header chunk
    pub fn format(&self) -> Option<u16> {
        self.header_field(0)
    }

    /// The track count field of a header chunk
    pub fn track_count(&self) -> Option<u16> {
        self.header_field(2)
    }

    /// The division field of a header chunk
    pub fn division(&self) -> Option<u16> {
        self.header_field(4)
    }

    /// Set the format. Returns false if this is not a header chunk.
    pub fn set_format(&mut self, format: u16) -> bool {
        self.set_header_field(0, format)
    }

    /// Set the track count. Returns false if this is not a header chunk.
    pub fn set_track_count(&mut self, count: u16) -> bool {
        self.set_header_field(2, count)
    }

    /// Set the division. Returns false if this is not a header chunk.
    pub fn set_division(&mut self, division: u16) -> bool {
        self.set_header_field(4, division)
    }
}
