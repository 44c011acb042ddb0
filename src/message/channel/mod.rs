#![doc = r#"
Contains all Channel Message types

# Layout
```text
 status byte          data bytes
|-----------|-------| |--------| |--------|
| msg type  | chan  | | 0ddddddd| 0ddddddd|  <- second byte absent for
|  8 - E    | 0 - F | |--------| |--------|     Program Change and
|-----------|-------|                           Channel Pressure
```
"#]
mod controller;
pub use controller::*;

use crate::{
    ParseError,
    reader::{ReadResult, Reader, ReaderError},
};
use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The high nibble of a channel status byte
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ChannelMsgType {
    /// Release a key
    NoteOff = 0x80,
    /// Press a key. A velocity of zero is treated as a release by most receivers.
    NoteOn = 0x90,
    /// Aftertouch for a single key
    PolyKeyPressure = 0xA0,
    /// Controller change (including channel mode messages, controllers 120-127)
    ControlChange = 0xB0,
    /// Select a program (one data byte)
    ProgramChange = 0xC0,
    /// Aftertouch for the whole channel (one data byte)
    ChannelPressure = 0xD0,
    /// 14-bit pitch wheel change
    PitchBend = 0xE0,
}

impl ChannelMsgType {
    /// Number of data bytes following the status byte
    pub const fn data_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }
}

#[doc = r#"
A channel voice or channel mode message.

Data bytes are always stored with their high bit clear.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelMessage {
    msg_type: ChannelMsgType,
    channel: u8,
    data: [u8; 2],
}

impl ChannelMessage {
    /// Create a channel message from a status byte and its data bytes.
    ///
    /// # Errors
    /// - [`ParseError::UnrecognizedStatus`] if `status` is not in `0x80..=0xEF`
    /// - [`ParseError::DataLength`] if `data` has the wrong length for the status
    /// - [`ParseError::InvalidDataByte`] if a data byte has its high bit set
    pub fn new(status: u8, data: &[u8]) -> Result<Self, ParseError> {
        let msg_type = ChannelMsgType::try_from(status & 0xF0)
            .map_err(|_| ParseError::UnrecognizedStatus(status))?;
        if data.len() != msg_type.data_len() {
            return Err(ParseError::DataLength {
                status,
                expected: msg_type.data_len(),
                found: data.len(),
            });
        }
        let mut bytes = [0; 2];
        for (slot, &byte) in bytes.iter_mut().zip(data) {
            if byte > 0x7F {
                return Err(ParseError::InvalidDataByte(byte));
            }
            *slot = byte;
        }
        Ok(Self {
            msg_type,
            channel: status & 0x0F,
            data: bytes,
        })
    }

    /// Note On for `channel` (0-15). Values are masked to their valid ranges.
    pub const fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self::from_masked(ChannelMsgType::NoteOn, channel, [note, velocity])
    }

    /// Note Off for `channel` (0-15). Values are masked to their valid ranges.
    pub const fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self::from_masked(ChannelMsgType::NoteOff, channel, [note, velocity])
    }

    /// Control Change for `channel` (0-15). Values are masked to their valid ranges.
    pub const fn control_change(channel: u8, controller: u8, value: u8) -> Self {
        Self::from_masked(ChannelMsgType::ControlChange, channel, [controller, value])
    }

    /// Program Change for `channel` (0-15). Values are masked to their valid ranges.
    pub const fn program_change(channel: u8, program: u8) -> Self {
        Self::from_masked(ChannelMsgType::ProgramChange, channel, [program, 0])
    }

    const fn from_masked(msg_type: ChannelMsgType, channel: u8, data: [u8; 2]) -> Self {
        let second = if msg_type.data_len() == 2 { data[1] & 0x7F } else { 0 };
        Self {
            msg_type,
            channel: channel & 0x0F,
            data: [data[0] & 0x7F, second],
        }
    }

    /// Decode the data bytes for `status`, which has already been consumed
    /// (or implied by running status).
    ///
    /// Data bytes are masked to 7 bits.
    pub(crate) fn read(status: u8, reader: &mut Reader<'_>) -> ReadResult<Self> {
        let msg_type = ChannelMsgType::try_from(status & 0xF0).map_err(|_| {
            ReaderError::invalid(reader.buffer_position(), ParseError::UnrecognizedStatus(status))
        })?;
        let bytes = reader.read_exact(msg_type.data_len())?;
        let mut data = [0; 2];
        for (slot, byte) in data.iter_mut().zip(bytes) {
            *slot = byte & 0x7F;
        }
        Ok(Self {
            msg_type,
            channel: status & 0x0F,
            data,
        })
    }

    /// The full status byte
    pub fn status(&self) -> u8 {
        u8::from(self.msg_type) | self.channel
    }

    /// The message type (high nibble of the status)
    pub const fn msg_type(&self) -> ChannelMsgType {
        self.msg_type
    }

    /// Zero-based channel, 0-15
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// The data bytes (one or two)
    pub fn data(&self) -> &[u8] {
        &self.data[..self.msg_type.data_len()]
    }

    /// The key for note and polyphonic pressure messages
    pub const fn note(&self) -> Option<u8> {
        match self.msg_type {
            ChannelMsgType::NoteOn | ChannelMsgType::NoteOff | ChannelMsgType::PolyKeyPressure => {
                Some(self.data[0])
            }
            _ => None,
        }
    }

    /// The velocity of a note message
    pub const fn velocity(&self) -> Option<u8> {
        match self.msg_type {
            ChannelMsgType::NoteOn | ChannelMsgType::NoteOff => Some(self.data[1]),
            _ => None,
        }
    }

    /// True for Note On and Note Off messages
    pub const fn is_note(&self) -> bool {
        matches!(
            self.msg_type,
            ChannelMsgType::NoteOn | ChannelMsgType::NoteOff
        )
    }

    /// True for a Note Off, or a Note On with velocity zero.
    pub const fn is_note_release(&self) -> bool {
        match self.msg_type {
            ChannelMsgType::NoteOff => true,
            ChannelMsgType::NoteOn => self.data[1] == 0,
            _ => false,
        }
    }

    /// Controller number and value of a Control Change
    pub const fn controller(&self) -> Option<(u8, u8)> {
        match self.msg_type {
            ChannelMsgType::ControlChange => Some((self.data[0], self.data[1])),
            _ => None,
        }
    }

    /// The named controller of a Control Change, if the number is a known one.
    pub fn known_controller(&self) -> Option<Controller> {
        self.controller()
            .and_then(|(number, _)| Controller::try_from(number).ok())
    }

    /// The program of a Program Change
    pub const fn program(&self) -> Option<u8> {
        match self.msg_type {
            ChannelMsgType::ProgramChange => Some(self.data[0]),
            _ => None,
        }
    }

    /// The 14-bit value of a Pitch Bend, where 0x2000 is centered
    pub const fn pitch_bend(&self) -> Option<u16> {
        match self.msg_type {
            ChannelMsgType::PitchBend => Some(((self.data[1] as u16) << 7) | self.data[0] as u16),
            _ => None,
        }
    }

    /// Number of bytes on the wire, status included
    pub const fn wire_len(&self) -> usize {
        1 + self.msg_type.data_len()
    }

    pub(crate) fn write_wire_bytes(&self, buf: &mut Vec<u8>) {
        buf.push(self.status());
        buf.extend_from_slice(self.data());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn data_bytes_are_masked_on_read() {
        let bytes = [0xBC, 0xE4];
        let mut reader = Reader::from_byte_slice(&bytes);
        let msg = ChannelMessage::read(0x93, &mut reader).unwrap();
        assert_eq!(msg.msg_type(), ChannelMsgType::NoteOn);
        assert_eq!(msg.channel(), 3);
        assert_eq!(msg.data(), &[0x3C, 0x64]);
        assert_eq!(msg.status(), 0x93);
    }

    #[test]
    fn single_data_byte_types() {
        let bytes = [0x05, 0x40];
        let mut reader = Reader::from_byte_slice(&bytes);
        let msg = ChannelMessage::read(0xC1, &mut reader).unwrap();
        assert_eq!(msg.program(), Some(5));
        assert_eq!(msg.data(), &[5]);
        assert_eq!(reader.buffer_position(), 1);

        let msg = ChannelMessage::read(0xD1, &mut reader).unwrap();
        assert_eq!(msg.data(), &[0x40]);
        assert_eq!(msg.wire_len(), 2);
    }

    #[test]
    fn truncated_data_is_out_of_bounds() {
        let bytes = [0x3C];
        let mut reader = Reader::from_byte_slice(&bytes);
        let err = ChannelMessage::read(0x90, &mut reader).unwrap_err();
        assert!(err.is_out_of_bounds());
    }

    #[test]
    fn construction_is_validated() {
        assert_eq!(
            ChannelMessage::new(0xF0, &[0]),
            Err(ParseError::UnrecognizedStatus(0xF0))
        );
        assert_eq!(
            ChannelMessage::new(0x90, &[60]),
            Err(ParseError::DataLength {
                status: 0x90,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            ChannelMessage::new(0xB0, &[7, 0x80]),
            Err(ParseError::InvalidDataByte(0x80))
        );
        let bend = ChannelMessage::new(0xE2, &[0x00, 0x40]).unwrap();
        assert_eq!(bend.pitch_bend(), Some(0x2000));
        assert_eq!(bend.channel(), 2);
    }

    #[test]
    fn controllers() {
        let cc = ChannelMessage::control_change(0, 0x40, 127);
        assert_eq!(cc.controller(), Some((0x40, 127)));
        assert_eq!(cc.known_controller(), Some(Controller::DamperPedal));
        assert!(!Controller::DamperPedal.is_channel_mode());
        assert!(Controller::AllNotesOff.is_channel_mode());

        let unnamed = ChannelMessage::control_change(0, 0x03, 1);
        assert_eq!(unnamed.known_controller(), None);
    }

    #[test]
    fn note_release() {
        assert!(ChannelMessage::note_on(0, 60, 0).is_note_release());
        assert!(ChannelMessage::note_off(0, 60, 64).is_note_release());
        assert!(!ChannelMessage::note_on(0, 60, 1).is_note_release());
        assert_eq!(ChannelMessage::note_on(9, 36, 100).velocity(), Some(100));
    }
}
