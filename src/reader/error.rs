use crate::ParseError;
use thiserror::Error;

#[doc = r#"
A decoding failure inside a track chunk, tagged with the offset (from the
start of the chunk payload) of the byte or message that caused it.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("At track byte {position}: {kind}")]
pub struct ReaderError {
    position: usize,
    kind: ReaderErrorKind,
}

/// Why decoding stopped
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReaderErrorKind {
    /// The bytes do not form a valid message
    #[error("{0}")]
    ParseError(#[from] ParseError),
    /// The buffer ended in the middle of a message.
    #[error("unexpected end of track data")]
    OutOfBounds,
}

impl ReaderError {
    /// An error of any kind at `position`
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }

    /// Malformed data at `position`
    pub const fn invalid(position: usize, error: ParseError) -> Self {
        Self::new(position, ReaderErrorKind::ParseError(error))
    }

    /// The buffer ran out at `position`
    pub const fn oob(position: usize) -> Self {
        Self::new(position, ReaderErrorKind::OutOfBounds)
    }

    /// Offset into the track payload
    pub const fn position(&self) -> usize {
        self.position
    }

    /// What went wrong
    pub const fn kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// True if the data ran out mid-message
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::OutOfBounds)
    }

    /// The parse error, unless the data simply ran out
    pub const fn parse_error(&self) -> Option<&ParseError> {
        match &self.kind {
            ReaderErrorKind::ParseError(e) => Some(e),
            ReaderErrorKind::OutOfBounds => None,
        }
    }
}

/// Result of decoding from a [`Reader`](super::Reader)
pub type ReadResult<T> = Result<T, ReaderError>;

#[test]
fn display_names_the_offset() {
    let err = ReaderError::invalid(12, ParseError::UnrecognizedStatus(0xF4));
    assert_eq!(
        err.to_string(),
        "At track byte 12: Unrecognized status byte 0xF4"
    );
    assert_eq!(
        ReaderError::oob(3).to_string(),
        "At track byte 3: unexpected end of track data"
    );
}
