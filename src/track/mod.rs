#![doc = r#"
A single track: the messages of one `MTrk` chunk

Messages are kept in tick order. Messages sharing a tick keep the order they
were read or inserted in, which is the order they are written back out.

# Reading
[`Track::read`] consumes the next chunk from a stream. Chunks that are not
`MTrk` are skipped and yield `Ok(None)`. A track chunk is read in full before
its events are decoded, so a malformed track leaves the stream at the start
of the next chunk.

# Editing
Every structural change marks the track dirty until the owning file is
written. The [`TrackSummary`] is only refreshed by
[`Track::update_derived_metadata`].
"#]

mod error;
pub use error::*;

mod summary;
pub use summary::*;

use crate::{
    ParseError,
    file::chunk::{ChunkError, ChunkHeader, ChunkKind},
    message::{Message, MessageId, ParseState},
    reader::{ReadResult, Reader, ReaderError},
    stream::ByteStream,
};

/// The messages of one track chunk
#[derive(Debug, Clone, Default)]
pub struct Track {
    index: u32,
    messages: Vec<Message>,
    next_serial: u64,
    dirty: bool,
    summary: TrackSummary,
}

impl Track {
    /// An empty track
    pub fn new(index: u32) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    /// Read the next chunk from `stream` as track `index`.
    ///
    /// Returns `Ok(None)` if the chunk is not a track chunk; its payload is
    /// skipped.
    ///
    /// # Errors
    /// - [`TrackError::Chunk`] if the chunk framing cannot be read. The stream
    ///   should not be read further.
    /// - [`TrackError::Parse`] if the events are malformed, or do not add up
    ///   to the declared length. The stream is positioned at the next chunk.
    pub fn read(stream: &mut ByteStream, index: u32) -> Result<Option<Self>, TrackError> {
        let header = ChunkHeader::read(stream)?;
        match header.kind() {
            ChunkKind::Track => {}
            ChunkKind::File => {
                // header chunks arrive with their payload already consumed
                #[cfg(feature = "tracing")]
                tracing::info!("Skipping stray MThd chunk of {} bytes", header.length());
                return Ok(None);
            }
            ChunkKind::Unknown(_tag) => {
                #[cfg(feature = "tracing")]
                tracing::info!(
                    "Skipping {} chunk of {} bytes",
                    String::from_utf8_lossy(&_tag),
                    header.length()
                );
                header.skip_payload(stream)?;
                return Ok(None);
            }
        }

        let payload = header.read_payload(stream)?;
        Self::parse(index, &payload)
            .map(Some)
            .map_err(|source| TrackError::Parse {
                track: index,
                source,
            })
    }

    /// Decode the payload of a track chunk.
    ///
    /// # Errors
    /// A message that runs past the end of `bytes` fails with
    /// [`ParseError::TrackLength`], positioned at the start of that message.
    pub fn parse(index: u32, bytes: &[u8]) -> ReadResult<Self> {
        let mut track = Self::new(index);
        let mut reader = Reader::from_byte_slice(bytes);
        let mut state = ParseState::new();
        let mut tick = 0u64;

        while reader.peek().is_some() {
            let start = reader.buffer_position();
            let read = match reader.read_vlq() {
                Ok((delta, _)) => Message::read(tick + delta as u64, &mut state, &mut reader),
                Err(e) => Err(e),
            };
            match read {
                Ok((message, _)) => {
                    tick = message.tick();
                    track.append(message);
                }
                Err(e) if e.is_out_of_bounds() => {
                    return Err(ReaderError::invalid(
                        start,
                        ParseError::TrackLength {
                            declared: bytes.len() as u32,
                            consumed: start as u64,
                        },
                    ));
                }
                Err(e) => return Err(e),
            }
        }

        track.update_derived_metadata();
        Ok(track)
    }

    /// Write the chunk prefix and every message.
    ///
    /// Delta times are measured from tick zero; running status is not used.
    ///
    /// # Errors
    /// [`ChunkError::Oversized`] if the events do not fit a chunk, otherwise
    /// any stream failure.
    pub fn write(&self, stream: &mut ByteStream) -> Result<(), ChunkError> {
        let length = self.length_in_bytes();
        let length = u32::try_from(length).map_err(|_| ChunkError::Oversized(length))?;
        ChunkHeader::track(length).write(stream)?;

        let mut current_tick = 0;
        for message in &self.messages {
            stream.write_all(&message.to_bytes(&mut current_tick))?;
        }
        Ok(())
    }

    /// Size of the encoded events, excluding the chunk prefix
    pub fn length_in_bytes(&self) -> u64 {
        let mut current_tick = 0;
        self.messages
            .iter()
            .map(|m| m.length_in_bytes(&mut current_tick) as u64)
            .sum()
    }

    /// The track's position in its file
    pub const fn index(&self) -> u32 {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: u32) {
        self.index = index;
    }

    /// All messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Iterate the messages in order
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if the track has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The message at `index`
    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// The message at `index`, mutably. Marks the track dirty.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Message> {
        let message = self.messages.get_mut(index)?;
        self.dirty = true;
        Some(message)
    }

    /// Position of the message with `id`
    pub fn find_index(&self, id: MessageId) -> Option<usize> {
        self.messages.iter().position(|m| m.id() == id)
    }

    /// True if there are unsaved structural changes
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// True if the last message is End of Track
    pub fn ends_with_end_of_track(&self) -> bool {
        self.messages.last().is_some_and(Message::is_end_of_track)
    }

    fn next_id(&mut self) -> MessageId {
        let id = MessageId {
            track: self.index,
            serial: self.next_serial,
        };
        self.next_serial += 1;
        id
    }

    fn append(&mut self, mut message: Message) {
        message.set_id(self.next_id());
        self.messages.push(message);
    }

    fn insert_at(&mut self, index: usize, mut message: Message) -> MessageId {
        let id = self.next_id();
        message.set_id(id);
        self.messages.insert(index, message);
        self.dirty = true;
        id
    }

    /// Add a message after every message at the same or an earlier tick
    pub fn push(&mut self, message: Message) -> MessageId {
        self.insert_after_equal_tick(message)
    }

    /// Insert before any messages already at the same tick
    pub fn insert_before_equal_tick(&mut self, message: Message) -> MessageId {
        let tick = message.tick();
        let index = self.messages.partition_point(|m| m.tick() < tick);
        self.insert_at(index, message)
    }

    /// Insert after any messages already at the same tick
    pub fn insert_after_equal_tick(&mut self, message: Message) -> MessageId {
        let tick = message.tick();
        let index = self.messages.partition_point(|m| m.tick() <= tick);
        self.insert_at(index, message)
    }

    /// Remove the message with `id`
    pub fn remove(&mut self, id: MessageId) -> Option<Message> {
        let index = self.find_index(id)?;
        self.remove_at(index)
    }

    /// Remove the message at `index`
    pub fn remove_at(&mut self, index: usize) -> Option<Message> {
        if index >= self.messages.len() {
            return None;
        }
        self.dirty = true;
        Some(self.messages.remove(index))
    }

    /// Move the message with `id` to `tick`, after any messages already there.
    ///
    /// Returns false if no such message exists.
    pub fn set_tick(&mut self, id: MessageId, tick: u64) -> bool {
        let Some(index) = self.find_index(id) else {
            return false;
        };
        let mut message = self.messages.remove(index);
        message.set_tick(tick);
        let index = self.messages.partition_point(|m| m.tick() <= tick);
        self.messages.insert(index, message);
        self.dirty = true;
        true
    }

    /// Recompute the [`TrackSummary`] from the current messages
    pub fn update_derived_metadata(&mut self) {
        self.summary = TrackSummary::from_messages(&self.messages);
    }

    /// Facts derived by the last [`update_derived_metadata`](Self::update_derived_metadata)
    pub fn summary(&self) -> &TrackSummary {
        &self.summary
    }

    /// Distinct note numbers, ascending
    pub fn note_values(&self) -> Vec<u8> {
        self.summary.note_values.iter().copied().collect()
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;
    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{channel::ChannelMessage, meta::MetaMessage};
    use pretty_assertions::assert_eq;

    fn note(tick: u64, key: u8) -> Message {
        Message::new(tick, ChannelMessage::note_on(0, key, 100))
    }

    #[test]
    fn parse_accumulates_ticks() {
        let bytes = [
            0x00, 0x90, 60, 100, //
            0x60, 62, 80, //
            0x81, 0x00, 0x80, 60, 0, //
            0x00, 0xFF, 0x2F, 0x00,
        ];
        let track = Track::parse(2, &bytes).unwrap();
        let ticks: Vec<u64> = track.iter().map(Message::tick).collect();
        assert_eq!(ticks, vec![0, 96, 224, 224]);
        assert!(track.ends_with_end_of_track());
        assert_eq!(track.get(1).unwrap().id(), MessageId { track: 2, serial: 1 });
        assert!(!track.is_dirty());
        assert_eq!(track.length_in_bytes(), bytes.len() as u64 + 1);
    }

    #[test]
    fn truncated_event_fails_the_track() {
        let bytes = [0x00, 0x90, 60, 100, 0x00, 0xFF, 0x2F];
        let err = Track::parse(0, &bytes).unwrap_err();
        assert_eq!(err.position(), 4);
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::TrackLength {
                declared: 7,
                consumed: 4
            })
        );

        // a delta-time cut off by the chunk end
        let err = Track::parse(0, &[0x00, 0x90, 60, 100, 0x81]).unwrap_err();
        assert!(matches!(
            err.parse_error(),
            Some(ParseError::TrackLength { consumed: 4, .. })
        ));
    }

    #[test]
    fn summary_classifies_tracks() {
        let mut track = Track::new(0);
        track.push(Message::new(0, MetaMessage::set_tempo(400_000)));
        track.update_derived_metadata();
        assert_eq!(track.summary().track_type, TrackType::Meta);

        track.push(Message::new(10, ChannelMessage::note_on(3, 64, 90)));
        track.push(Message::new(20, ChannelMessage::note_off(3, 52, 0)));
        track.push(Message::new(20, ChannelMessage::program_change(4, 1)));
        track.update_derived_metadata();
        let summary = track.summary();
        assert_eq!(summary.track_type, TrackType::Note);
        assert_eq!(summary.min_note, Some(52));
        assert_eq!(summary.max_note, Some(64));
        assert_eq!(summary.channels_used.iter().copied().collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(summary.channels_with_notes.len(), 1);
        assert_eq!(track.note_values(), vec![52, 64]);

        track.push(Message::new(30, ChannelMessage::note_on(DRUM_CHANNEL, 36, 90)));
        track.update_derived_metadata();
        assert_eq!(track.summary().track_type, TrackType::Drum);

        assert_eq!(TrackSummary::from_messages(&[]).track_type, TrackType::Unknown);
    }

    #[test]
    fn insertion_keeps_tick_order() {
        let mut track = Track::new(1);
        let a = track.push(note(100, 1));
        let b = track.push(note(50, 2));
        let c = track.insert_after_equal_tick(note(100, 3));
        let d = track.insert_before_equal_tick(note(100, 4));
        assert!(track.is_dirty());

        let order: Vec<MessageId> = track.iter().map(Message::id).collect();
        assert_eq!(order, vec![b, d, a, c]);

        assert!(track.set_tick(b, 100));
        let order: Vec<MessageId> = track.iter().map(Message::id).collect();
        assert_eq!(order, vec![d, a, c, b]);

        let removed = track.remove(a).unwrap();
        assert_eq!(removed.tick(), 100);
        assert_eq!(track.find_index(a), None);
        assert_eq!(track.remove_at(10), None);
        assert_eq!(track.len(), 3);
    }

    #[test]
    fn write_then_parse() {
        let mut track = Track::new(0);
        track.push(note(0, 60));
        track.push(Message::new(480, ChannelMessage::note_on(0, 60, 0)));
        track.push(Message::new(480, MetaMessage::end_of_track()));

        let mut stream = ByteStream::memory();
        track.write(&mut stream).unwrap();
        let bytes = stream.into_bytes();
        assert_eq!(&bytes[..8], b"MTrk\0\0\0\x0D");
        assert_eq!(bytes.len() as u64, 8 + track.length_in_bytes());

        let mut stream = ByteStream::from_bytes(bytes);
        let read = Track::read(&mut stream, 0).unwrap().unwrap();
        assert_eq!(read.messages(), track.messages());
    }
}
