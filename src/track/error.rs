use crate::{file::chunk::ChunkError, reader::ReaderError};
use thiserror::Error;

#[doc = r#"
Errors reading or writing a single track.
"#]
#[derive(Debug, Error)]
pub enum TrackError {
    /// The chunk around the track could not be read or written. When reading,
    /// the stream position is no longer trustworthy.
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    /// The chunk was read in full but its events are malformed.
    #[error("Track {track}: {source}")]
    Parse {
        /// Index of the failing track
        track: u32,
        /// Where and why decoding stopped
        #[source]
        source: ReaderError,
    },
}

impl TrackError {
    /// True if the stream is still positioned at a chunk boundary, so later
    /// chunks can still be read.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
