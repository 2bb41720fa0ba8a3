//! Phase model: CBTmin placement, phase difference and phase-response presets.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::clock::{ClockTime, MINUTES_PER_DAY};

/// CBTmin sits this many minutes before habitual wake time.
pub const CBTMIN_BEFORE_WAKE_MINUTES: i64 = 3 * 60;

const HALF_DAY_MINUTES: i64 = MINUTES_PER_DAY / 2;

/// Estimate the core-body-temperature minimum from the wake clock.
pub fn cbtmin_from_wake(wake: ClockTime) -> ClockTime {
    wake.shifted(-CBTMIN_BEFORE_WAKE_MINUTES)
}

/// Signed distance from `current` to `dest` on the 24-hour dial, in minutes.
///
/// The result lies in `(-720, 720]`: a difference of exactly half a day is
/// reported as a delay (`+720`).
pub fn signed_diff_minutes(dest: ClockTime, current: ClockTime) -> i64 {
    let diff =
        (dest.minutes() - current.minutes() + HALF_DAY_MINUTES).rem_euclid(MINUTES_PER_DAY)
            - HALF_DAY_MINUTES;
    if diff == -HALF_DAY_MINUTES {
        HALF_DAY_MINUTES
    } else {
        diff
    }
}

pub fn signed_diff_hours(dest: ClockTime, current: ClockTime) -> f64 {
    signed_diff_minutes(dest, current) as f64 / 60.0
}

/// Which way the body clock has to move to reach the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseDirection {
    /// Move the clock earlier (destination CBTmin is earlier on the dial).
    Advance,
    /// Move the clock later.
    Delay,
    /// Origin and destination already coincide; nothing ever shifts.
    Aligned,
}

impl PhaseDirection {
    pub fn from_diff_minutes(diff: i64) -> Self {
        match diff {
            d if d > 0 => PhaseDirection::Delay,
            d if d < 0 => PhaseDirection::Advance,
            _ => PhaseDirection::Aligned,
        }
    }

    /// `+1` for delay, `-1` for advance, `0` when aligned.
    pub fn sign(self) -> i64 {
        match self {
            PhaseDirection::Delay => 1,
            PhaseDirection::Advance => -1,
            PhaseDirection::Aligned => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PhaseDirection::Advance => "advance",
            PhaseDirection::Delay => "delay",
            PhaseDirection::Aligned => "aligned",
        }
    }
}

impl fmt::Display for PhaseDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hour offsets of a window relative to the previous CBTmin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetWindow {
    pub start_hours: f64,
    pub end_hours: f64,
}

impl OffsetWindow {
    pub fn start(&self) -> Duration {
        hours(self.start_hours)
    }

    pub fn end(&self) -> Duration {
        hours(self.end_hours)
    }
}

/// Phase-response timings for one shift direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhasePreset {
    pub melatonin_hours: f64,
    /// Added on top of the melatonin offset so the dose lands in the following day.
    pub melatonin_day_rollover: bool,
    pub exercise: OffsetWindow,
    pub light: OffsetWindow,
    pub dark: OffsetWindow,
}

pub const ADVANCE_PRESET: PhasePreset = PhasePreset {
    melatonin_hours: -11.5,
    melatonin_day_rollover: true,
    exercise: OffsetWindow {
        start_hours: 0.0,
        end_hours: 3.0,
    },
    light: OffsetWindow {
        start_hours: 0.0,
        end_hours: 3.0,
    },
    dark: OffsetWindow {
        start_hours: -3.0,
        end_hours: 0.0,
    },
};

pub const DELAY_PRESET: PhasePreset = PhasePreset {
    melatonin_hours: 4.0,
    melatonin_day_rollover: false,
    exercise: OffsetWindow {
        start_hours: -3.0,
        end_hours: 0.0,
    },
    light: OffsetWindow {
        start_hours: -3.0,
        end_hours: 0.0,
    },
    dark: OffsetWindow {
        start_hours: 0.0,
        end_hours: 3.0,
    },
};

impl PhasePreset {
    pub fn for_direction(direction: PhaseDirection) -> Option<&'static PhasePreset> {
        match direction {
            PhaseDirection::Advance => Some(&ADVANCE_PRESET),
            PhaseDirection::Delay => Some(&DELAY_PRESET),
            PhaseDirection::Aligned => None,
        }
    }

    /// Melatonin offset from the previous CBTmin, rollover included.
    pub fn melatonin_offset(&self) -> Duration {
        let offset = hours(self.melatonin_hours);
        if self.melatonin_day_rollover {
            offset + Duration::days(1)
        } else {
            offset
        }
    }
}

fn hours(h: f64) -> Duration {
    Duration::minutes((h * 60.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cbtmin_is_three_hours_before_wake() {
        assert_eq!(cbtmin_from_wake(ClockTime::from_hm(7, 0)), ClockTime::from_hm(4, 0));
        assert_eq!(cbtmin_from_wake(ClockTime::from_hm(1, 30)), ClockTime::from_hm(22, 30));
    }

    #[test]
    fn signed_diff_wraps_into_half_open_range() {
        let four = ClockTime::from_hm(4, 0);
        let twenty = ClockTime::from_hm(20, 0);
        assert_eq!(signed_diff_minutes(twenty, four), -480);
        assert_eq!(signed_diff_minutes(four, twenty), 480);
        assert_eq!(signed_diff_minutes(four, four), 0);
        assert_eq!(signed_diff_minutes(ClockTime::from_hm(16, 0), four), 720);
        assert_eq!(signed_diff_minutes(four, ClockTime::from_hm(16, 0)), 720);
        assert_eq!(signed_diff_hours(ClockTime::from_hm(7, 30), four), 3.5);
    }

    #[test]
    fn direction_follows_sign_of_difference() {
        assert_eq!(PhaseDirection::from_diff_minutes(90), PhaseDirection::Delay);
        assert_eq!(PhaseDirection::from_diff_minutes(-90), PhaseDirection::Advance);
        assert_eq!(PhaseDirection::from_diff_minutes(0), PhaseDirection::Aligned);
        assert_eq!(PhaseDirection::Aligned.sign(), 0);
    }

    #[test]
    fn advance_melatonin_rolls_into_next_day() {
        let preset = PhasePreset::for_direction(PhaseDirection::Advance).unwrap();
        assert_eq!(preset.melatonin_offset(), Duration::minutes(12 * 60 + 30));
        let delay = PhasePreset::for_direction(PhaseDirection::Delay).unwrap();
        assert_eq!(delay.melatonin_offset(), Duration::hours(4));
        assert!(PhasePreset::for_direction(PhaseDirection::Aligned).is_none());
    }
}
