#![doc = r#"
SMPTE frame rates

A file may measure its ticks in fractions of an SMPTE frame instead of
fractions of a quarter note. The header then stores the frame rate as a
negative number in the high byte of the division and the ticks per frame in
the low byte.

Only four rates are standard: 24 (film), 25 (PAL/SECAM), 29.97 (NTSC
drop-frame, stored as -29) and 30.
"#]

use crate::HeaderError;

/// The four standard SMPTE frame rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteFps {
    /// 24 frames per second
    TwentyFour,
    /// 25 frames per second
    TwentyFive,
    /// 29.97 frames per second (30000/1001), drop-frame
    TwentyNine,
    /// 30 frames per second
    Thirty,
}

impl SmpteFps {
    /// The value stored in the high byte of a header division
    pub const fn header_value(&self) -> i8 {
        match self {
            Self::TwentyFour => -24,
            Self::TwentyFive => -25,
            Self::TwentyNine => -29,
            Self::Thirty => -30,
        }
    }

    /// The rate for a header value, if it is one of the standard four
    pub const fn from_header_value(value: i8) -> Option<Self> {
        match value {
            -24 => Some(Self::TwentyFour),
            -25 => Some(Self::TwentyFive),
            -29 => Some(Self::TwentyNine),
            -30 => Some(Self::Thirty),
            _ => None,
        }
    }

    /// The precise frame rate; drop-frame is 29.97...
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }
}

const DROP_FRAME: f64 = 30_000. / 1001.;

/// SMPTE division: a frame rate and a number of ticks per frame.
///
/// The frame rate is kept exactly as stored in the file. Non-standard rates
/// are preserved so the header survives a round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteHeader {
    frames_per_second: i8,
    ticks_per_frame: u8,
}

impl SmpteHeader {
    /// Division for one of the standard frame rates.
    ///
    /// # Errors
    /// [`HeaderError::ZeroTicksPerFrame`] if `ticks_per_frame` is zero
    pub const fn new(fps: SmpteFps, ticks_per_frame: u8) -> Result<Self, HeaderError> {
        Self::from_raw(fps.header_value(), ticks_per_frame)
    }

    /// Division from the two header bytes as stored.
    ///
    /// # Errors
    /// - [`HeaderError::ZeroFrameRate`] if the frame rate byte is zero
    /// - [`HeaderError::ZeroTicksPerFrame`] if the ticks per frame are zero
    pub const fn from_raw(frames_per_second: i8, ticks_per_frame: u8) -> Result<Self, HeaderError> {
        if frames_per_second == 0 {
            return Err(HeaderError::ZeroFrameRate);
        }
        if ticks_per_frame == 0 {
            return Err(HeaderError::ZeroTicksPerFrame);
        }
        Ok(Self {
            frames_per_second,
            ticks_per_frame,
        })
    }

    /// The frame rate byte, normally negative
    pub const fn frames_per_second(&self) -> i8 {
        self.frames_per_second
    }

    /// The frame rate, if it is a standard one
    pub const fn fps(&self) -> Option<SmpteFps> {
        SmpteFps::from_header_value(self.frames_per_second)
    }

    /// Ticks per frame
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }

    /// `1_000_000 / |fps| / ticks_per_frame`
    pub fn usecs_per_tick(&self) -> f64 {
        1_000_000.0 / self.frames_per_second.unsigned_abs() as f64 / self.ticks_per_frame as f64
    }

    /// The 16-bit header division. A positive rate is stored negated so bit 15
    /// stays set.
    pub const fn to_division(&self) -> u16 {
        let rate = if self.frames_per_second > 0 {
            -self.frames_per_second
        } else {
            self.frames_per_second
        };
        u16::from_be_bytes([rate as u8, self.ticks_per_frame])
    }
}

#[test]
fn standard_rates_round_trip_through_the_header() {
    use pretty_assertions::assert_eq;
    let header = SmpteHeader::new(SmpteFps::TwentyFive, 40).unwrap();
    assert_eq!(header.to_division(), 0xE728);
    assert_eq!(header.fps(), Some(SmpteFps::TwentyFive));
    assert_eq!(header.usecs_per_tick(), 1000.0);

    let odd = SmpteHeader::from_raw(-128, 1).unwrap();
    assert_eq!(odd.fps(), None);
    assert_eq!(odd.usecs_per_tick(), 1_000_000.0 / 128.0);
}
