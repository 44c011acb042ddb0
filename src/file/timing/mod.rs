mod smpte;
pub use smpte::*;

use crate::HeaderError;

/// The header division: how long a tick is.
///
/// Bit 15 of the stored division selects the form:
///
/// ```text
/// 0ttttttt tttttttt   ticks per quarter note, 1-32767
/// 1fffffff tttttttt   SMPTE: -fps as i8, ticks per frame
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// Delta times are fractions of a quarter note
    TicksPerQuarterNote(u16),
    /// Delta times are fractions of an SMPTE frame
    Smpte(SmpteHeader),
}

impl Default for Timing {
    fn default() -> Self {
        Self::TicksPerQuarterNote(480)
    }
}

impl Timing {
    /// Ticks-per-quarter-note timing. The leading bit is disregarded, so 1-32767.
    ///
    /// # Errors
    /// [`HeaderError::ZeroTicksPerQuarterNote`] if the result is zero
    pub const fn new_ticks_per_quarter_note(tpqn: u16) -> Result<Self, HeaderError> {
        match tpqn & 0x7FFF {
            0 => Err(HeaderError::ZeroTicksPerQuarterNote),
            tpqn => Ok(Self::TicksPerQuarterNote(tpqn)),
        }
    }

    /// Decode a header division.
    ///
    /// # Errors
    /// - [`HeaderError::ZeroTicksPerQuarterNote`]
    /// - [`HeaderError::ZeroFrameRate`]
    /// - [`HeaderError::ZeroTicksPerFrame`]
    pub const fn from_division(division: u16) -> Result<Self, HeaderError> {
        let [high, low] = division.to_be_bytes();
        if high & 0x80 == 0 {
            Self::new_ticks_per_quarter_note(division)
        } else {
            match SmpteHeader::from_raw(high as i8, low) {
                Ok(smpte) => Ok(Self::Smpte(smpte)),
                Err(e) => Err(e),
            }
        }
    }

    /// Encode as a header division
    pub const fn to_division(&self) -> u16 {
        match self {
            Self::TicksPerQuarterNote(tpqn) => *tpqn & 0x7FFF,
            Self::Smpte(smpte) => smpte.to_division(),
        }
    }

    /// Ticks per quarter note, if that is the form in use
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(*t),
            Self::Smpte(_) => None,
        }
    }

    /// The SMPTE division, if that is the form in use
    pub const fn smpte(&self) -> Option<SmpteHeader> {
        match self {
            Self::Smpte(s) => Some(*s),
            Self::TicksPerQuarterNote(_) => None,
        }
    }

    /// Microseconds per tick.
    ///
    /// For quarter-note timing this assumes the default tempo of 120 beats per
    /// minute ([`DEFAULT_TEMPO`](crate::message::meta::DEFAULT_TEMPO)); tempo
    /// changes inside the file are not applied.
    pub fn usecs_per_tick(&self) -> f64 {
        match self {
            Self::TicksPerQuarterNote(tpqn) => {
                crate::message::meta::DEFAULT_TEMPO as f64 / *tpqn as f64
            }
            Self::Smpte(smpte) => smpte.usecs_per_tick(),
        }
    }
}
