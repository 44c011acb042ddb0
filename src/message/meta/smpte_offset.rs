#![doc = r#"
The SMPTE Offset meta message (`FF 54 05 hr mn se fr ff`)

It gives the SMPTE time at which a track is meant to start. The codec keeps
the payload as raw bytes; [`SmpteOffset`] is a decoded view of it, obtained
through [`MetaMessage::smpte_offset`](super::MetaMessage::smpte_offset).

```text
byte 0   0 rr hhhhh   rr = frame rate (00=24, 01=25, 10=29.97, 11=30), hhhhh = hours
byte 1   minutes      0-59
byte 2   seconds      0-59
byte 3   frames
byte 4   subframes    hundredths of a frame, 0-99
```
"#]

use crate::{SmpteError, file::SmpteFps};

/// A decoded SMPTE offset payload.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// The frame rate the offset is expressed in.
    ///
    /// For files with SMPTE division this should match the header's rate.
    pub fps: SmpteFps,
    /// Hour component of the time code (0-23).
    pub hour: u8,
    /// Minute component of the time code (0-59).
    pub minute: u8,
    /// Second component of the time code (0-59).
    pub second: u8,
    /// Frame number within the current second.
    pub frame: u8,
    /// Hundredths of a frame (0-99).
    pub subframe: u8,
}

impl SmpteOffset {
    /// Offset in microseconds, measured with `fps` instead of the offset's own rate.
    pub const fn as_micros_with_override(&self, fps: SmpteFps) -> f64 {
        let whole_seconds =
            (self.hour as u64 * 3600) + (self.minute as u64) * 60 + self.second as u64;
        (whole_seconds * 1_000_000) as f64
            + ((self.frame as u64) * 1_000_000) as f64 / fps.as_f64()
            + ((self.subframe as u32) * 10_000) as f64 / fps.as_f64()
    }

    /// Offset in microseconds
    pub const fn as_micros(&self) -> f64 {
        self.as_micros_with_override(self.fps)
    }

    /// Decode a five byte SMPTE offset payload.
    ///
    /// # Errors
    /// - `SmpteError::Length` if data is not exactly 5 bytes
    /// - `SmpteError::TrackFrame` if the frame rate bits are invalid
    /// - `SmpteError::HourOffset` if hours > 23
    /// - `SmpteError::MinuteOffset` if minutes > 59
    /// - `SmpteError::SecondOffset` if seconds > 59
    /// - `SmpteError::Subframe` if subframes > 99
    pub const fn parse(data: &[u8]) -> Result<Self, SmpteError> {
        if data.len() != 5 {
            return Err(SmpteError::Length(data.len()));
        }

        // 0 rr hhhhh
        let fps = match data[0] >> 5 {
            0 => SmpteFps::TwentyFour,
            1 => SmpteFps::TwentyFive,
            2 => SmpteFps::TwentyNine,
            3 => SmpteFps::Thirty,
            v => return Err(SmpteError::TrackFrame(v)),
        };
        let hour = data[0] & 0b0001_1111;
        if hour > 23 {
            return Err(SmpteError::HourOffset(hour));
        }
        let minute = data[1];
        if minute > 59 {
            return Err(SmpteError::MinuteOffset(minute));
        }
        let second = data[2];
        if second > 59 {
            return Err(SmpteError::SecondOffset(second));
        }
        let frame = data[3];
        let subframe = data[4];
        if subframe > 99 {
            return Err(SmpteError::Subframe(subframe));
        }
        Ok(Self {
            fps,
            hour,
            minute,
            second,
            frame,
            subframe,
        })
    }

    /// Encode back into the five byte payload.
    pub const fn to_payload(&self) -> [u8; 5] {
        let rate_bits = match self.fps {
            SmpteFps::TwentyFour => 0,
            SmpteFps::TwentyFive => 1,
            SmpteFps::TwentyNine => 2,
            SmpteFps::Thirty => 3,
        };
        [
            (rate_bits << 5) | (self.hour & 0b0001_1111),
            self.minute,
            self.second,
            self.frame,
            self.subframe,
        ]
    }
}

#[test]
fn parse_smpte_offset() {
    use pretty_assertions::assert_eq;
    // the bytes after 00 FF 54 05
    let bytes = [0x41, 0x17, 0x2D, 0x0C, 0x22];
    let offset = SmpteOffset::parse(&bytes).unwrap();

    assert_eq!(offset.fps, SmpteFps::TwentyNine);
    assert_eq!(offset.hour, 1);
    assert_eq!(offset.minute, 23);
    assert_eq!(offset.second, 45);
    assert_eq!(offset.frame, 12);
    assert_eq!(offset.subframe, 34);
    assert_eq!(offset.to_payload(), bytes);
}

#[test]
fn parse_invalid_smpte_offset() {
    use pretty_assertions::assert_eq;
    let bytes = [0x7F, 0x17, 0x2D, 0x0C, 0x22];
    assert_eq!(SmpteOffset::parse(&bytes), Err(SmpteError::HourOffset(31)));

    let bytes = [0x41, 0x50, 0x2D, 0x0C, 0x22];
    assert_eq!(SmpteOffset::parse(&bytes), Err(SmpteError::MinuteOffset(80)));

    assert_eq!(SmpteOffset::parse(&bytes[..4]), Err(SmpteError::Length(4)));
}
