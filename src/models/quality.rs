//! Recall quality scores and the mapping from the coarse remembered/forgot input.

use std::fmt;

/// Recall quality in `0..=5`. Three and above counts as a successful recall.
///
/// 5 - effortless recall
/// 4 - recalled with a hint
/// 3 - correct with serious difficulty
/// 2 - recognized after seeing the answer
/// 1 - forgotten
/// 0 - complete blackout
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;
    /// Lowest score that counts as a success.
    pub const PASS: u8 = 3;

    /// Clamps any integer into `0..=5`. Out-of-range input is logged, never rejected.
    pub fn clamped(value: i32) -> Self {
        let clamped = value.clamp(0, Self::MAX as i32);
        if clamped != value {
            log::warn!("quality {} out of range, clamped to {}", value, clamped);
        }
        Quality(clamped as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self.0 >= Self::PASS
    }
}

impl From<u8> for Quality {
    fn from(value: u8) -> Self {
        Quality::clamped(value as i32)
    }
}

impl From<i32> for Quality {
    fn from(value: i32) -> Self {
        Quality::clamped(value)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps the "remembered / forgot" answer, plus whether the answer was shown
/// first, to a quality score. Zero is never produced here.
pub fn map_user_signal_to_quality(remembered: bool, was_revealed: bool) -> Quality {
    let score = match (remembered, was_revealed) {
        (true, false) => 5,
        (true, true) => 4,
        (false, true) => 2,
        (false, false) => 1,
    };
    Quality(score)
}
