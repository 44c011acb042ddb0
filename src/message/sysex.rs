use crate::{
    reader::{ReadResult, Reader},
    vlq,
};

/// Which of the two file sysex forms a message uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SysexKind {
    /// `F0 length bytes`: a complete message or the first packet of one
    Start,
    /// `F7 length bytes`: a continuation packet, or an escape carrying arbitrary bytes
    ContinuationOrEscape,
}

impl SysexKind {
    /// The status byte for this kind
    pub const fn status(&self) -> u8 {
        match self {
            Self::Start => 0xF0,
            Self::ContinuationOrEscape => 0xF7,
        }
    }

    /// The kind for a status byte, if it is `0xF0` or `0xF7`
    pub const fn from_status(status: u8) -> Option<Self> {
        match status {
            0xF0 => Some(Self::Start),
            0xF7 => Some(Self::ContinuationOrEscape),
            _ => None,
        }
    }
}

/// A system exclusive message as stored in a file. The payload is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SysexMessage {
    kind: SysexKind,
    payload: Vec<u8>,
}

impl SysexMessage {
    /// Create a sysex message. Payloads longer than [`vlq::MAX`] are truncated.
    pub fn new(kind: SysexKind, payload: impl Into<Vec<u8>>) -> Self {
        let mut payload = payload.into();
        payload.truncate(vlq::MAX as usize);
        Self { kind, payload }
    }

    /// Reads the length and payload; the status byte has already been consumed.
    pub(crate) fn read(kind: SysexKind, reader: &mut Reader<'_>) -> ReadResult<Self> {
        let (len, _) = reader.read_vlq()?;
        let payload = reader.read_exact(len as usize)?.to_vec();
        Ok(Self { kind, payload })
    }

    /// Start or continuation/escape
    pub const fn kind(&self) -> SysexKind {
        self.kind
    }

    /// The payload, exactly as stored after the length field
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Replace the payload. The encoded length follows automatically.
    pub fn set_payload(&mut self, payload: impl Into<Vec<u8>>) {
        let mut payload = payload.into();
        payload.truncate(vlq::MAX as usize);
        self.payload = payload;
    }

    /// The bytes a device receives: `F0` and the payload for a start packet,
    /// the bare payload for a continuation or escape packet.
    pub fn transmit_bytes(&self) -> Vec<u8> {
        match self.kind {
            SysexKind::Start => {
                let mut buf = Vec::with_capacity(1 + self.payload.len());
                buf.push(SysexKind::Start.status());
                buf.extend_from_slice(&self.payload);
                buf
            }
            SysexKind::ContinuationOrEscape => self.payload.clone(),
        }
    }

    /// Number of bytes on the wire: status, length and payload
    pub fn wire_len(&self) -> usize {
        1 + vlq::encoded_length(self.payload.len() as u32) as usize + self.payload.len()
    }

    pub(crate) fn write_wire_bytes(&self, buf: &mut Vec<u8>) {
        buf.push(self.kind.status());
        vlq::encode_into(self.payload.len() as u32, buf);
        buf.extend_from_slice(&self.payload);
    }
}

#[test]
fn reads_length_prefixed_payload() {
    use pretty_assertions::assert_eq;
    let bytes = [0x05, 0x7E, 0x7F, 0x09, 0x01, 0xF7, 0x00];
    let mut reader = Reader::from_byte_slice(&bytes);
    let sysex = SysexMessage::read(SysexKind::Start, &mut reader).unwrap();
    assert_eq!(sysex.payload(), &[0x7E, 0x7F, 0x09, 0x01, 0xF7]);
    assert_eq!(reader.unread_count(), 1);

    let mut out = Vec::new();
    sysex.write_wire_bytes(&mut out);
    assert_eq!(out, vec![0xF0, 0x05, 0x7E, 0x7F, 0x09, 0x01, 0xF7]);
    assert_eq!(sysex.wire_len(), out.len());
}
