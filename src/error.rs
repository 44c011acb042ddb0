use thiserror::Error;

#[doc = r#"
Errors raised while decoding the bytes inside a track chunk.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A variable-length quantity ran past four bytes without terminating.
    #[error("Malformed variable-length quantity")]
    MalformedVlq,
    /// The buffer ended in the middle of a variable-length quantity.
    #[error("Variable-length quantity is truncated")]
    TruncatedVlq,
    /// A status byte this codec cannot decode (0xF1-0xF6, 0xF8-0xFE, or a data
    /// byte with no running status in effect).
    #[error("Unrecognized status byte {0:#04X}")]
    UnrecognizedStatus(u8),
    /// A byte expected to be a 7-bit data byte had its high bit set.
    #[error("Invalid data byte {0:#04X}")]
    InvalidDataByte(u8),
    /// A channel message was built with the wrong number of data bytes.
    #[error("Status {status:#04X} takes {expected} data byte(s), found {found}")]
    DataLength {
        /// The channel status byte
        status: u8,
        /// Data bytes required by the status
        expected: usize,
        /// Data bytes provided
        found: usize,
    },
    /// A message ran past the end of its track chunk.
    #[error("Track declares {declared} bytes but a message starting at byte {consumed} runs past the end")]
    TrackLength {
        /// Length from the `MTrk` chunk header
        declared: u32,
        /// Bytes actually consumed by message parsing
        consumed: u64,
    },
    /// An SMPTE offset payload is invalid
    #[error("Smpte offset: {0}")]
    Smpte(#[from] SmpteError),
}

#[doc = r#"
Validation failures for the values stored in an `MThd` chunk.

Any of these aborts reading the whole file.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// The header chunk is not exactly six bytes long.
    #[error("File header must be 6 bytes long, found {0}")]
    Length(u32),
    /// The format is not 0 or 1. Format 2 (independent sequences) is not supported.
    #[error("Unsupported file format {0}")]
    UnsupportedFormat(u16),
    /// SMPTE division with a frame rate of zero.
    #[error("SMPTE division has a frame rate of zero")]
    ZeroFrameRate,
    /// SMPTE division with zero ticks per frame.
    #[error("SMPTE division has zero ticks per frame")]
    ZeroTicksPerFrame,
    /// Ticks-per-quarter-note division of zero.
    #[error("Division has zero ticks per quarter note")]
    ZeroTicksPerQuarterNote,
}

/// Errors found while parsing an SMPTE offset meta message
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmpteError {
    /// The payload is not exactly five bytes.
    #[error("Invalid length for SMPTE offset: {0}")]
    Length(usize),
    /// The frame type bits are out of range.
    #[error("Invalid frame type in SMPTE offset: {0}")]
    TrackFrame(u8),
    /// Hours above 23.
    #[error("Invalid hour offset: {0}")]
    HourOffset(u8),
    /// Minutes above 59.
    #[error("Invalid minute offset: {0}")]
    MinuteOffset(u8),
    /// Seconds above 59.
    #[error("Invalid second offset: {0}")]
    SecondOffset(u8),
    /// Subframes above 99.
    #[error("Invalid subframe: {0}")]
    Subframe(u8),
}
