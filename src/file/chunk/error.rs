use crate::stream::StreamError;
use thiserror::Error;

#[doc = r#"
Errors in the chunk framing of a file.

Unlike a [`ParseError`](crate::ParseError) inside one track, most of these
leave the stream at an unknown offset, so no further chunks can be read.
"#]
#[derive(Debug, Error)]
pub enum ChunkError {
    /// Fewer than the eight bytes of a chunk header remain.
    #[error("Chunk header is truncated: {remaining} byte(s) remaining")]
    TruncatedHeader {
        /// Bytes left in the stream
        remaining: u64,
    },
    /// The chunk declares more bytes than the stream holds.
    #[error(
        "Chunk {} declares {declared} bytes, only {remaining} remaining",
        String::from_utf8_lossy(.tag)
    )]
    TruncatedPayload {
        /// The chunk's tag
        tag: [u8; 4],
        /// Length from the chunk header
        declared: u32,
        /// Bytes left in the stream
        remaining: u64,
    },
    /// A chunk of one type was required but another was found.
    #[error(
        "Expected chunk {}, found {}",
        String::from_utf8_lossy(.expected),
        String::from_utf8_lossy(.found)
    )]
    UnexpectedTag {
        /// The tag required at this point
        expected: [u8; 4],
        /// The tag that was read
        found: [u8; 4],
    },
    /// Only `MThd` and `MTrk` chunks can be written.
    #[error("Cannot write chunk with unknown tag {}", String::from_utf8_lossy(.0))]
    UnknownTag([u8; 4]),
    /// A track's encoded length does not fit the 32-bit length field.
    #[error("Chunk payload of {0} bytes is too large")]
    Oversized(u64),
    /// The underlying stream failed.
    #[error(transparent)]
    Stream(#[from] StreamError),
}
