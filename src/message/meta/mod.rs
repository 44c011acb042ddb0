#![doc = r#"
Meta messages (`FF type length payload`)

Meta messages only appear in files; they are never sent to a device. The
codec stores the type byte and the payload as-is, so unknown types survive a
round-trip untouched. [`MetaType`] names the types defined by the SMF
specification, and the accessors on [`MetaMessage`] decode the common ones.
"#]

mod smpte_offset;
pub use smpte_offset::*;

use crate::{
    SmpteError,
    reader::{ReadResult, Reader},
    vlq,
};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::borrow::Cow;

/// Tempo assumed when a file has no Set Tempo message: 120 beats per minute.
pub const DEFAULT_TEMPO: u32 = 500_000;

/// The meta message types defined by the Standard MIDI File specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaType {
    /// `FF 00 02 ssss` Sequence number
    SequenceNumber = 0x00,
    /// `FF 01` Arbitrary text
    Text = 0x01,
    /// `FF 02` Copyright notice
    Copyright = 0x02,
    /// `FF 03` Sequence or track name
    TrackName = 0x03,
    /// `FF 04` Instrument name
    InstrumentName = 0x04,
    /// `FF 05` Lyric
    Lyric = 0x05,
    /// `FF 06` Marker
    Marker = 0x06,
    /// `FF 07` Cue point
    CuePoint = 0x07,
    /// `FF 20 01 cc` Channel prefix for the meta and sysex messages that follow
    ChannelPrefix = 0x20,
    /// `FF 21 01 pp` MIDI port for the track
    PortPrefix = 0x21,
    /// `FF 2F 00` End of track
    EndOfTrack = 0x2F,
    /// `FF 51 03 tttttt` Microseconds per quarter note
    SetTempo = 0x51,
    /// `FF 54 05 hr mn se fr ff` SMPTE offset
    SmpteOffset = 0x54,
    /// `FF 58 04 nn dd cc bb` Time signature
    TimeSignature = 0x58,
    /// `FF 59 02 sf mi` Key signature
    KeySignature = 0x59,
    /// `FF 7F` Sequencer specific data
    SequencerSpecific = 0x7F,
}

impl MetaType {
    /// True for the text-carrying types, `0x01..=0x07`
    pub fn is_text(&self) -> bool {
        (0x01..=0x07).contains(&u8::from(*self))
    }
}

#[doc = r#"
A meta message: a type byte and its payload.

The length field written to the file is always derived from the payload, so
the two cannot disagree. Payloads longer than [`vlq::MAX`] bytes cannot be
encoded and are truncated on construction.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaMessage {
    meta_type: u8,
    payload: Vec<u8>,
}

impl MetaMessage {
    /// The status byte shared by all meta messages
    pub const STATUS: u8 = 0xFF;

    /// Create a meta message of any type
    pub fn new(meta_type: impl Into<u8>, payload: impl Into<Vec<u8>>) -> Self {
        let mut payload = payload.into();
        payload.truncate(vlq::MAX as usize);
        Self {
            meta_type: meta_type.into(),
            payload,
        }
    }

    /// `FF 2F 00`
    pub fn end_of_track() -> Self {
        Self::new(MetaType::EndOfTrack, Vec::new())
    }

    /// `FF 51 03 tttttt`. The tempo is masked to 24 bits.
    pub fn set_tempo(micros_per_quarter_note: u32) -> Self {
        let [_, a, b, c] = micros_per_quarter_note.to_be_bytes();
        Self::new(MetaType::SetTempo, vec![a, b, c])
    }

    /// A text message (types `0x01..=0x07`)
    pub fn text_event(meta_type: MetaType, text: &str) -> Self {
        Self::new(meta_type, text.as_bytes())
    }

    /// Reads the type byte, length and payload. The `0xFF` status has
    /// already been consumed.
    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let meta_type = reader.read_byte()?;
        let (len, _) = reader.read_vlq()?;
        let payload = reader.read_exact(len as usize)?.to_vec();
        Ok(Self { meta_type, payload })
    }

    /// The raw type byte
    pub const fn meta_type(&self) -> u8 {
        self.meta_type
    }

    /// The type, if it is one defined by the specification
    pub fn known_type(&self) -> Option<MetaType> {
        MetaType::try_from(self.meta_type).ok()
    }

    /// The payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Replace the payload. The encoded length follows automatically.
    pub fn set_payload(&mut self, payload: impl Into<Vec<u8>>) {
        let mut payload = payload.into();
        payload.truncate(vlq::MAX as usize);
        self.payload = payload;
    }

    /// Consume the message, returning the payload
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// True for `FF 2F`
    pub fn is_end_of_track(&self) -> bool {
        self.meta_type == u8::from(MetaType::EndOfTrack)
    }

    /// The text of a text-carrying message, decoded as UTF-8 (lossy).
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self.known_type() {
            Some(t) if t.is_text() => Some(String::from_utf8_lossy(&self.payload)),
            _ => None,
        }
    }

    /// Microseconds per quarter note from a Set Tempo message
    pub fn tempo(&self) -> Option<u32> {
        match (self.known_type(), self.payload.as_slice()) {
            (Some(MetaType::SetTempo), &[a, b, c]) => Some(u32::from_be_bytes([0, a, b, c])),
            _ => None,
        }
    }

    /// The channel of a Channel Prefix message
    pub fn channel_prefix(&self) -> Option<u8> {
        match self.known_type() {
            Some(MetaType::ChannelPrefix) => self.payload.first().copied(),
            _ => None,
        }
    }

    /// The port of a Port Prefix message
    pub fn port_prefix(&self) -> Option<u8> {
        match self.known_type() {
            Some(MetaType::PortPrefix) => self.payload.first().copied(),
            _ => None,
        }
    }

    /// The decoded payload of an SMPTE Offset message
    pub fn smpte_offset(&self) -> Option<Result<SmpteOffset, SmpteError>> {
        match self.known_type() {
            Some(MetaType::SmpteOffset) => Some(SmpteOffset::parse(&self.payload)),
            _ => None,
        }
    }

    /// Number of bytes on the wire: status, type, length and payload
    pub fn wire_len(&self) -> usize {
        2 + vlq::encoded_length(self.payload.len() as u32) as usize + self.payload.len()
    }

    pub(crate) fn write_wire_bytes(&self, buf: &mut Vec<u8>) {
        buf.push(Self::STATUS);
        buf.push(self.meta_type);
        vlq::encode_into(self.payload.len() as u32, buf);
        buf.extend_from_slice(&self.payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tempo_payload() {
        let bytes = [0x51, 0x03, 0x07, 0xA1, 0x20];
        let mut reader = Reader::from_byte_slice(&bytes);
        let meta = MetaMessage::read(&mut reader).unwrap();
        assert_eq!(meta.known_type(), Some(MetaType::SetTempo));
        assert_eq!(meta.payload(), &[0x07, 0xA1, 0x20]);
        assert_eq!(meta.tempo(), Some(DEFAULT_TEMPO));
        assert_eq!(meta, MetaMessage::set_tempo(500_000));

        let mut out = Vec::new();
        meta.write_wire_bytes(&mut out);
        assert_eq!(out, vec![0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
        assert_eq!(meta.wire_len(), 6);
    }

    #[test]
    fn truncated_payload() {
        let bytes = [0x03, 0x05, b'P', b'i'];
        let mut reader = Reader::from_byte_slice(&bytes);
        assert!(MetaMessage::read(&mut reader).unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn text_accessors() {
        let name = MetaMessage::text_event(MetaType::TrackName, "Piano");
        assert_eq!(name.text().as_deref(), Some("Piano"));
        assert_eq!(name.tempo(), None);
        assert_eq!(MetaMessage::end_of_track().text(), None);
        assert!(MetaMessage::end_of_track().is_end_of_track());
    }

    #[test]
    fn prefixes_and_unknown_types() {
        assert_eq!(MetaMessage::new(MetaType::ChannelPrefix, [4u8]).channel_prefix(), Some(4));
        assert_eq!(MetaMessage::new(MetaType::PortPrefix, [1u8]).port_prefix(), Some(1));
        assert_eq!(MetaMessage::new(MetaType::PortPrefix, Vec::new()).port_prefix(), None);

        let unknown = MetaMessage::new(0x60u8, [1u8, 2, 3]);
        assert_eq!(unknown.known_type(), None);
        assert_eq!(unknown.wire_len(), 6);
    }

    #[test]
    fn long_payload_uses_multibyte_length() {
        let meta = MetaMessage::new(0x7Fu8, vec![0; 200]);
        let mut out = Vec::new();
        meta.write_wire_bytes(&mut out);
        assert_eq!(&out[..4], &[0xFF, 0x7F, 0x81, 0x48]);
        assert_eq!(out.len(), meta.wire_len());
    }
}
