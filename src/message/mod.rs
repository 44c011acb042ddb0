#![doc = r#"
Messages stored in a track

A track chunk is a list of `(delta-time, event)` pairs. This module decodes
one event at a time with [`Message::read`], which resolves running status and
tracks the channel and port prefixes, and encodes it back with
[`Message::to_bytes`].

Every [`Message`] carries an absolute tick rather than the delta it was
stored with. Deltas are recomputed from the previous message on write.

# Kinds
- [`ChannelMessage`](channel::ChannelMessage): status `0x80..=0xEF`
- [`MetaMessage`](meta::MetaMessage): status `0xFF`
- [`SysexMessage`]: status `0xF0` or `0xF7`
"#]

pub mod channel;
pub mod meta;
mod sysex;
pub use sysex::*;

use crate::{
    ParseError,
    reader::{ReadResult, Reader, ReaderError},
    vlq,
};
use channel::ChannelMessage;
use core::fmt;
use meta::MetaMessage;

/// Identifies a message within the track that owns it.
///
/// Identifiers are handed out by the track, in order, as messages are read or
/// inserted. They are not persisted and play no part in ordering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageId {
    /// Index of the owning track
    pub track: u32,
    /// Position in the track's generation sequence
    pub serial: u64,
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.track, self.serial)
    }
}

/// The three kinds of event a track can hold
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    /// A channel voice or mode message
    Channel(ChannelMessage),
    /// A meta message
    Meta(MetaMessage),
    /// A system exclusive message
    Sysex(SysexMessage),
}

impl MessageKind {
    /// The status byte written for this message
    pub fn status(&self) -> u8 {
        match self {
            Self::Channel(c) => c.status(),
            Self::Meta(_) => MetaMessage::STATUS,
            Self::Sysex(s) => s.kind().status(),
        }
    }

    /// Bytes on the wire, excluding the delta-time
    pub fn wire_len(&self) -> usize {
        match self {
            Self::Channel(c) => c.wire_len(),
            Self::Meta(m) => m.wire_len(),
            Self::Sysex(s) => s.wire_len(),
        }
    }

    fn write_wire_bytes(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Channel(c) => c.write_wire_bytes(buf),
            Self::Meta(m) => m.write_wire_bytes(buf),
            Self::Sysex(s) => s.write_wire_bytes(buf),
        }
    }
}

impl From<ChannelMessage> for MessageKind {
    fn from(value: ChannelMessage) -> Self {
        Self::Channel(value)
    }
}

impl From<MetaMessage> for MessageKind {
    fn from(value: MetaMessage) -> Self {
        Self::Meta(value)
    }
}

impl From<SysexMessage> for MessageKind {
    fn from(value: SysexMessage) -> Self {
        Self::Sysex(value)
    }
}

/// Decoder state carried from one message to the next within a track.
///
/// A fresh state is used for every track.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseState {
    running_status: u8,
    channel_prefix: u8,
    port_prefix: u8,
}

impl ParseState {
    /// The state at the start of a track: no running status, both prefixes zero
    pub const fn new() -> Self {
        Self {
            running_status: 0,
            channel_prefix: 0,
            port_prefix: 0,
        }
    }

    /// The last channel status byte seen, or zero
    pub const fn running_status(&self) -> u8 {
        self.running_status
    }

    /// Channel set by the most recent Channel Prefix message
    pub const fn channel_prefix(&self) -> u8 {
        self.channel_prefix
    }

    /// Port set by the most recent Port Prefix message
    pub const fn port_prefix(&self) -> u8 {
        self.port_prefix
    }
}

#[doc = r#"
A single timed event of a track.

Equality compares the tick and the event only; the identifier and the
prefixes recorded while parsing are ignored.
"#]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    id: MessageId,
    tick: u64,
    kind: MessageKind,
    channel_prefix: u8,
    port_prefix: u8,
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick && self.kind == other.kind
    }
}

impl Eq for Message {}

impl Message {
    /// Create a message at an absolute tick.
    ///
    /// It receives its identifier when it is added to a track.
    pub fn new(tick: u64, kind: impl Into<MessageKind>) -> Self {
        Self {
            id: MessageId::default(),
            tick,
            kind: kind.into(),
            channel_prefix: 0,
            port_prefix: 0,
        }
    }

    #[doc = r#"
Decode one event (without its delta-time) at `tick`.

A byte with its high bit set is consumed as the status; channel statuses
become the new running status. A data byte reuses the running status without
being consumed. Meta and sysex messages leave the running status alone.

Returns the message and the number of bytes it occupied.

# Errors
- [`ParseError::UnrecognizedStatus`] for system common/real-time statuses, or
  a data byte while no running status is in effect
- [`ReaderErrorKind::OutOfBounds`](crate::reader::ReaderErrorKind::OutOfBounds)
  if the track ends mid-message
- [`ParseError::MalformedVlq`] for a bad meta/sysex length
"#]
    pub fn read(
        tick: u64,
        state: &mut ParseState,
        reader: &mut Reader<'_>,
    ) -> ReadResult<(Self, usize)> {
        let start = reader.buffer_position();
        let first = reader.peek().ok_or(ReaderError::oob(start))?;

        let status = if first & 0x80 != 0 {
            reader.read_byte()?;
            if first < 0xF0 {
                state.running_status = first;
            }
            first
        } else {
            state.running_status
        };

        let kind = match status {
            0x80..=0xEF => MessageKind::Channel(ChannelMessage::read(status, reader)?),
            0xFF => {
                let meta = MetaMessage::read(reader)?;
                if let Some(channel) = meta.channel_prefix() {
                    state.channel_prefix = channel;
                }
                if let Some(port) = meta.port_prefix() {
                    state.port_prefix = port;
                }
                MessageKind::Meta(meta)
            }
            0xF0 => MessageKind::Sysex(SysexMessage::read(SysexKind::Start, reader)?),
            0xF7 => MessageKind::Sysex(SysexMessage::read(
                SysexKind::ContinuationOrEscape,
                reader,
            )?),
            other => {
                return Err(ReaderError::invalid(
                    start,
                    ParseError::UnrecognizedStatus(other),
                ));
            }
        };

        let message = Self {
            id: MessageId::default(),
            tick,
            kind,
            channel_prefix: state.channel_prefix,
            port_prefix: state.port_prefix,
        };
        Ok((message, reader.buffer_position() - start))
    }

    /// The identifier assigned by the owning track
    pub const fn id(&self) -> MessageId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: MessageId) {
        self.id = id;
    }

    /// Absolute position in ticks
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    /// The event
    pub const fn kind(&self) -> &MessageKind {
        &self.kind
    }

    /// The event, mutably. Changing a payload also changes the encoded length.
    pub fn kind_mut(&mut self) -> &mut MessageKind {
        &mut self.kind
    }

    /// The status byte written for this message
    pub fn status(&self) -> u8 {
        self.kind.status()
    }

    /// Channel of a channel message
    pub fn channel(&self) -> Option<u8> {
        self.as_channel().map(ChannelMessage::channel)
    }

    /// The channel message, if this is one
    pub fn as_channel(&self) -> Option<&ChannelMessage> {
        match &self.kind {
            MessageKind::Channel(c) => Some(c),
            _ => None,
        }
    }

    /// The meta message, if this is one
    pub fn as_meta(&self) -> Option<&MetaMessage> {
        match &self.kind {
            MessageKind::Meta(m) => Some(m),
            _ => None,
        }
    }

    /// The sysex message, if this is one
    pub fn as_sysex(&self) -> Option<&SysexMessage> {
        match &self.kind {
            MessageKind::Sysex(s) => Some(s),
            _ => None,
        }
    }

    /// True for the End of Track meta message
    pub fn is_end_of_track(&self) -> bool {
        self.as_meta().is_some_and(MetaMessage::is_end_of_track)
    }

    /// Channel prefix in effect when this message was read
    pub const fn channel_prefix(&self) -> u8 {
        self.channel_prefix
    }

    /// Port prefix in effect when this message was read
    pub const fn port_prefix(&self) -> u8 {
        self.port_prefix
    }

    /// Bytes on the wire, excluding the delta-time
    pub fn wire_len(&self) -> usize {
        self.kind.wire_len()
    }

    /// Status and body, without the delta-time
    pub fn wire_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.wire_len());
        self.write_wire_bytes(&mut buf);
        buf
    }

    /// Append the status and body to `buf`
    pub fn write_wire_bytes(&self, buf: &mut Vec<u8>) {
        self.kind.write_wire_bytes(buf);
    }

    /// The delta from `current_tick`, clamped to what a delta-time can hold.
    fn delta_from(&self, current_tick: u64) -> u32 {
        self.tick
            .saturating_sub(current_tick)
            .min(vlq::MAX as u64) as u32
    }

    #[doc = r#"
Encode the delta-time followed by the event.

The delta is measured from `current_tick`, which is then advanced to this
message. The status byte is always written out; running status is never used.
A message earlier than `current_tick` is written with a delta of zero.
"#]
    pub fn to_bytes(&self, current_tick: &mut u64) -> Vec<u8> {
        let delta = self.delta_from(*current_tick);
        let mut buf = Vec::with_capacity(vlq::encoded_length(delta) as usize + self.wire_len());
        vlq::encode_into(delta, &mut buf);
        self.write_wire_bytes(&mut buf);
        *current_tick += delta as u64;
        buf
    }

    /// The length [`to_bytes`](Self::to_bytes) would produce, advancing
    /// `current_tick` the same way.
    pub fn length_in_bytes(&self, current_tick: &mut u64) -> u32 {
        let delta = self.delta_from(*current_tick);
        *current_tick += delta as u64;
        vlq::encoded_length(delta) + self.wire_len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::meta::MetaType;
    use pretty_assertions::assert_eq;

    fn read_all(bytes: &[u8]) -> ReadResult<Vec<(Message, usize)>> {
        let mut reader = Reader::from_byte_slice(bytes);
        let mut state = ParseState::new();
        let mut out = Vec::new();
        while reader.peek().is_some() {
            out.push(Message::read(0, &mut state, &mut reader)?);
        }
        Ok(out)
    }

    #[test]
    fn running_status_reuses_last_channel_status() {
        let read = read_all(&[0x90, 60, 100, 62, 80]).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].0.wire_bytes(), vec![0x90, 60, 100]);
        assert_eq!(read[0].1, 3);
        assert_eq!(read[1].0.wire_bytes(), vec![0x90, 62, 80]);
        assert_eq!(read[1].1, 2);
    }

    #[test]
    fn meta_does_not_reset_running_status() {
        let read = read_all(&[0x91, 60, 100, 0xFF, 0x01, 0x01, b'x', 60, 0]).unwrap();
        assert_eq!(read[2].0.status(), 0x91);
        assert!(read[2].0.as_channel().unwrap().is_note_release());
    }

    #[test]
    fn meta_round_trip() {
        let bytes = [0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20];
        let (message, consumed) = read_all(&bytes).unwrap().remove(0);
        assert_eq!(consumed, 6);
        assert_eq!(message.as_meta().unwrap().tempo(), Some(500_000));
        assert_eq!(message.wire_bytes(), bytes.to_vec());
    }

    #[test]
    fn sysex_forms() {
        let read = read_all(&[0xF0, 0x02, 0x43, 0x12, 0xF7, 0x01, 0xF7]).unwrap();
        assert_eq!(read[0].0.as_sysex().unwrap().kind(), SysexKind::Start);
        assert_eq!(
            read[1].0.as_sysex().unwrap().kind(),
            SysexKind::ContinuationOrEscape
        );
        assert_eq!(read[1].0.as_sysex().unwrap().payload(), &[0xF7]);
    }

    #[test]
    fn data_byte_without_running_status() {
        let err = read_all(&[0x40, 0x40]).unwrap_err();
        assert_eq!(err.parse_error(), Some(&ParseError::UnrecognizedStatus(0)));
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn system_common_status_is_rejected() {
        let err = read_all(&[0x90, 60, 100, 0xF2, 0, 0]).unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::UnrecognizedStatus(0xF2))
        );
        assert_eq!(err.position(), 3);
    }

    #[test]
    fn prefixes_are_stamped() {
        let bytes = [
            0x90, 60, 100, //
            0xFF, 0x20, 0x01, 0x05, //
            0xFF, 0x21, 0x01, 0x02, //
            0xF0, 0x01, 0xF7,
        ];
        let read = read_all(&bytes).unwrap();
        assert_eq!(read[0].0.channel_prefix(), 0);
        assert_eq!(read[1].0.channel_prefix(), 5);
        assert_eq!(read[1].0.port_prefix(), 0);
        assert_eq!(read[3].0.channel_prefix(), 5);
        assert_eq!(read[3].0.port_prefix(), 2);
    }

    #[test]
    fn delta_times_are_relative() {
        let a = Message::new(100, ChannelMessage::note_on(0, 60, 100));
        let b = Message::new(
            300,
            MetaMessage::text_event(MetaType::Marker, "verse"),
        );
        let mut tick = 0;
        assert_eq!(a.to_bytes(&mut tick), vec![0x64, 0x90, 60, 100]);
        assert_eq!(tick, 100);

        let mut measured = 100;
        let length = b.length_in_bytes(&mut measured);
        let bytes = b.to_bytes(&mut tick);
        assert_eq!(&bytes[..2], &[0x81, 0x48]);
        assert_eq!(length as usize, bytes.len());
        assert_eq!(measured, tick);
    }

    #[test]
    fn equality_ignores_identity() {
        let mut a = Message::new(10, ChannelMessage::program_change(1, 5));
        let b = a.clone();
        a.set_id(MessageId { track: 3, serial: 9 });
        assert_eq!(a, b);
        assert_eq!(a.id().to_string(), "3:9");
    }
}
