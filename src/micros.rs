use core::{
    fmt,
    ops::{Add, AddAssign},
};

/// Unsigned Microseconds
///
/// The wall-clock position of a tick, as produced by
/// [`MidiFile::tick_to_micros`](crate::file::MidiFile::tick_to_micros).
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UMicros(u64);

impl UMicros {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates a new instance of microseconds
    #[inline]
    pub const fn new(microseconds: u64) -> Self {
        Self(microseconds)
    }

    /// Converts an absolute tick into microseconds using a fixed
    /// microseconds-per-tick factor. Fractions of a microsecond are truncated.
    #[inline]
    pub fn from_ticks(tick: u64, usecs_per_tick: f64) -> Self {
        Self((tick as f64 * usecs_per_tick) as u64)
    }

    /// Returns the microseconds as a u64
    #[inline]
    pub const fn us(&self) -> u64 {
        self.0
    }

    /// Returns seconds
    #[inline]
    pub const fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000.
    }
}

impl fmt::Display for UMicros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}µs", self.0)
    }
}

impl Add for UMicros {
    type Output = UMicros;
    fn add(self, rhs: Self) -> Self::Output {
        UMicros(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for UMicros {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

#[test]
fn ticks_at_default_tempo() {
    use pretty_assertions::assert_eq;
    // 500 tpqn at 120 bpm
    let usecs_per_tick = 500_000. / 500.;
    assert_eq!(UMicros::from_ticks(500, usecs_per_tick), UMicros::new(500_000));
    assert_eq!(UMicros::from_ticks(0, usecs_per_tick), UMicros::ZERO);

    let mut total = UMicros::from_ticks(250, usecs_per_tick);
    total += UMicros::new(250_000);
    assert_eq!(total.us(), 500_000);
    assert_eq!(total.to_string(), "500000µs");
}
