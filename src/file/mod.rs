#![doc = r#"
Rusty representation of a [`MidiFile`]

A file is an `MThd` header chunk followed by track chunks. [`MidiFile::read`]
validates the header and then reads as many tracks as the header declares.
Chunks with unknown tags are skipped and do not count as tracks.

Header problems abort the read. Problems with a single track do not: the
track is dropped and a [`ReadWarning`] is recorded, so one damaged track does
not cost the rest of the file.
"#]

pub mod chunk;

mod error;
pub use error::*;

mod format;
pub use format::*;

mod merge;
pub use merge::*;

mod timing;
pub use timing::*;

use crate::{
    HeaderError, UMicros,
    stream::ByteStream,
    track::{Track, TrackError},
};
use chunk::{ChunkError, ChunkHeader, ChunkKind};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

#[doc = r#"
A parsed Standard MIDI File.

Tracks are keyed by their position among the file's track chunks. Tracks
that contained no messages are not kept, so the keys may have gaps.
"#]
#[derive(Debug, Default)]
pub struct MidiFile {
    format: Format,
    timing: Timing,
    tracks: BTreeMap<u32, Track>,
    declared_track_count: u16,
    path: Option<PathBuf>,
    warnings: Vec<ReadWarning>,
    edited: bool,
}

impl MidiFile {
    /// An empty file
    pub fn new(format: Format, timing: Timing) -> Self {
        Self {
            format,
            timing,
            ..Default::default()
        }
    }

    /// Read a file from disk.
    ///
    /// # Errors
    /// - [`FileError::Stream`] if the file cannot be opened
    /// - [`FileError::Chunk`] or [`FileError::Header`] if the header is invalid
    pub fn read(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();
        let mut stream = ByteStream::read_file(path)?;
        let mut file = Self::read_from(&mut stream)?;
        stream.close()?;
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    /// Parse a file held in memory
    pub fn parse(bytes: impl Into<Vec<u8>>) -> Result<Self, FileError> {
        Self::read_from(&mut ByteStream::from_bytes(bytes))
    }

    /// Read a file from an open stream.
    ///
    /// See [`read`](Self::read).
    pub fn read_from(stream: &mut ByteStream) -> Result<Self, FileError> {
        let header = ChunkHeader::read(stream)?;
        if header.kind() != ChunkKind::File {
            return Err(ChunkError::UnexpectedTag {
                expected: ChunkKind::FILE_TAG,
                found: header.kind().tag(),
            }
            .into());
        }
        let (Some(format), Some(track_count), Some(division), 6) = (
            header.format(),
            header.track_count(),
            header.division(),
            header.length(),
        ) else {
            return Err(HeaderError::Length(header.length()).into());
        };
        let format = Format::from_header_value(format)?;
        let timing = Timing::from_division(division)?;

        let mut file = Self::new(format, timing);
        file.declared_track_count = track_count;

        if let Timing::Smpte(_smpte) = timing {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "File uses SMPTE time code: {} fps, {} ticks per frame",
                _smpte.frames_per_second(),
                _smpte.ticks_per_frame()
            );
        }
        if format == Format::SingleMultiChannel && track_count > 1 {
            file.warn(ReadWarning::SingleTrackFormat { track_count });
        }

        let mut seen = 0u32;
        while seen < track_count as u32 && stream.bytes_remaining() > 0 {
            match Track::read(stream, seen) {
                Ok(None) => continue,
                Ok(Some(track)) => {
                    if !track.is_empty() {
                        file.tracks.insert(seen, track);
                    }
                }
                Err(TrackError::Parse { track, source }) => {
                    file.warn(ReadWarning::Track { track, source });
                }
                Err(TrackError::Chunk(source)) => {
                    file.warn(ReadWarning::Framing {
                        tracks_read: seen,
                        source,
                    });
                    break;
                }
            }
            seen += 1;
        }
        if seen < track_count as u32 {
            file.warn(ReadWarning::MissingTracks {
                declared: track_count,
                found: seen,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Read {} of {} declared tracks, {} warning(s)",
            file.tracks.len(),
            track_count,
            file.warnings.len()
        );
        Ok(file)
    }

    fn warn(&mut self, warning: ReadWarning) {
        #[cfg(feature = "tracing")]
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Write the file to disk.
    ///
    /// The header's track count is the number of tracks held. On success every
    /// track is marked saved and the path is remembered. A failed write may
    /// leave a partial file behind.
    ///
    /// # Errors
    /// - [`FileError::Stream`] with [`StreamError::AlreadyExists`](crate::stream::StreamError::AlreadyExists)
    ///   if the file exists and `overwrite` is false
    /// - [`FileError::TooManyTracks`] if the count does not fit the header
    pub fn write(&mut self, path: impl AsRef<Path>, overwrite: bool) -> Result<(), FileError> {
        let path = path.as_ref();
        let mut stream = ByteStream::write_file(path, overwrite)?;
        self.write_chunks(&mut stream)?;
        stream.close()?;
        self.mark_saved();
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Write the file to an open stream. On success every track is marked saved.
    pub fn write_to(&mut self, stream: &mut ByteStream) -> Result<(), FileError> {
        self.write_chunks(stream)?;
        self.mark_saved();
        Ok(())
    }

    fn write_chunks(&self, stream: &mut ByteStream) -> Result<(), FileError> {
        let track_count = u16::try_from(self.tracks.len())
            .map_err(|_| FileError::TooManyTracks(self.tracks.len()))?;
        ChunkHeader::file(self.format.into(), track_count, self.timing.to_division())
            .write(stream)?;
        for track in self.tracks.values() {
            track.write(stream)?;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("Wrote {track_count} tracks, {} bytes", stream.length());
        Ok(())
    }

    fn mark_saved(&mut self) {
        self.declared_track_count = self.tracks.len() as u16;
        self.edited = false;
        self.tracks.values_mut().for_each(Track::mark_saved);
    }

    /// The file format
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Change the format written by the next write
    pub fn set_format(&mut self, format: Format) {
        self.format = format;
        self.edited = true;
    }

    /// The header division
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Change the division written by the next write. Tick values are not rescaled.
    pub fn set_timing(&mut self, timing: Timing) {
        self.timing = timing;
        self.edited = true;
    }

    /// The track count from the header that was last read or written
    pub const fn declared_track_count(&self) -> u16 {
        self.declared_track_count
    }

    /// Microseconds per tick at the default tempo (see [`Timing::usecs_per_tick`])
    pub fn usecs_per_tick(&self) -> f64 {
        self.timing.usecs_per_tick()
    }

    /// The wall-clock position of `tick` at the default tempo
    pub fn tick_to_micros(&self, tick: u64) -> UMicros {
        UMicros::from_ticks(tick, self.usecs_per_tick())
    }

    /// Path last read from or written to
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// File name component of [`path`](Self::path)
    pub fn file_name(&self) -> Option<&str> {
        self.path.as_deref()?.file_name()?.to_str()
    }

    /// Problems found while reading
    pub fn warnings(&self) -> &[ReadWarning] {
        &self.warnings
    }

    /// All tracks by index
    pub fn tracks(&self) -> &BTreeMap<u32, Track> {
        &self.tracks
    }

    /// The track at `index`
    pub fn track(&self, index: u32) -> Option<&Track> {
        self.tracks.get(&index)
    }

    /// The track at `index`, mutably
    pub fn track_mut(&mut self, index: u32) -> Option<&mut Track> {
        self.tracks.get_mut(&index)
    }

    /// Put `track` at `index`, returning the track it replaces
    pub fn insert_track(&mut self, index: u32, mut track: Track) -> Option<Track> {
        track.set_index(index);
        self.edited = true;
        self.tracks.insert(index, track)
    }

    /// Add `track` after the last track, returning its index
    pub fn add_track(&mut self, track: Track) -> u32 {
        let index = self
            .tracks
            .last_key_value()
            .map_or(0, |(index, _)| index + 1);
        self.insert_track(index, track);
        index
    }

    /// Remove the track at `index`
    pub fn remove_track(&mut self, index: u32) -> Option<Track> {
        let removed = self.tracks.remove(&index)?;
        self.edited = true;
        Some(removed)
    }

    /// True if anything changed since the last read or write
    pub fn has_unsaved_edits(&self) -> bool {
        self.edited || self.tracks.values().any(Track::is_dirty)
    }

    /// A lazy tick-ordered merge of every track
    pub fn merge_iter(&self) -> TickMerge<'_> {
        TickMerge::new(self.tracks.iter().map(|(index, track)| (*index, track)))
    }

    /// Merge every track into one tick-ordered sequence.
    ///
    /// Tracks that do not end with End of Track, or a file with no tracks,
    /// produce [`MergeWarning`]s; the merge still covers every message.
    pub fn merge_tracks_by_tick(&self) -> PlayableSequence<'_> {
        PlayableSequence::new(self.tracks.iter().map(|(index, track)| (*index, track)))
    }
}
