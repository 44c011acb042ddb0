use super::StreamMode;
use thiserror::Error;

#[doc = r#"
Errors raised by a [`ByteStream`](super::ByteStream).
"#]
#[derive(Debug, Error)]
pub enum StreamError {
    /// The file to read does not exist.
    #[error("File not found")]
    NotFound,
    /// The file to write exists and overwriting was not requested.
    #[error("File already exists")]
    AlreadyExists,
    /// The stream already has an open target; close it before opening another.
    #[error("Stream is already open")]
    AlreadyInUse,
    /// The stream has no open target.
    #[error("Stream is closed")]
    Closed,
    /// The operation needs the stream to be open in the other mode.
    #[error("Operation requires a stream opened for {expected:?}")]
    WrongMode {
        /// The mode the operation needs
        expected: StreamMode,
    },
    /// Fewer bytes remain than were requested.
    #[error("Requested {requested} bytes, only {remaining} remaining")]
    Unavailable {
        /// Bytes requested
        requested: u64,
        /// Bytes left in the stream
        remaining: u64,
    },
    /// A variable-length quantity ran past four bytes.
    #[error("Malformed variable-length quantity")]
    MalformedVlq,
    /// The underlying storage failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StreamError {
    /// True if the error was caused by running out of bytes.
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Result type for [`ByteStream`](super::ByteStream) operations
pub type StreamResult<T> = Result<T, StreamError>;
