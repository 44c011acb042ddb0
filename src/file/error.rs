use super::chunk::ChunkError;
use crate::{HeaderError, reader::ReaderError, stream::StreamError};
use thiserror::Error;

#[doc = r#"
Errors that abort reading or writing a whole file
"#]
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be opened, read or written.
    #[error(transparent)]
    Stream(#[from] StreamError),
    /// The chunk framing is broken.
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    /// The header chunk holds invalid values.
    #[error("Invalid file header: {0}")]
    Header(#[from] HeaderError),
    /// More tracks than a header can declare.
    #[error("{0} tracks do not fit in a file header")]
    TooManyTracks(usize),
}

#[doc = r#"
Problems found while reading a file that did not stop the read.
"#]
#[derive(Debug, Error)]
pub enum ReadWarning {
    /// A track's events were malformed; the track was dropped.
    #[error("Skipped track {track}: {source}")]
    Track {
        /// Index of the dropped track
        track: u32,
        /// Where and why decoding stopped
        source: ReaderError,
    },
    /// The chunk framing broke; no further tracks were read.
    #[error("Stopped reading after {tracks_read} track(s): {source}")]
    Framing {
        /// Track chunks seen before the failure
        tracks_read: u32,
        /// The framing error
        source: ChunkError,
    },
    /// The file ended before the declared number of tracks were found.
    #[error("Header declares {declared} track(s), found {found}")]
    MissingTracks {
        /// Track count from the header
        declared: u16,
        /// Track chunks found
        found: u32,
    },
    /// A format 0 file declares more than one track.
    #[error("Format 0 file declares {track_count} tracks")]
    SingleTrackFormat {
        /// Track count from the header
        track_count: u16,
    },
}
