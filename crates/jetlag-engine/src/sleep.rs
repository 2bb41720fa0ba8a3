//! Sleep window generation around a travel interval.
//!
//! Sleep follows the origin schedule until the first night that would run
//! into travel, then switches to the destination schedule for good. Travel is
//! carved out of every destination night.

use chrono::{DateTime, Duration, Utc};

use crate::clock::{ClockTime, UtcOffset, MINUTES_PER_DAY};
use crate::interval::Interval;

/// A habitual sleep schedule read on the local clock at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepSchedule {
    pub start: ClockTime,
    pub end: ClockTime,
    pub offset: UtcOffset,
}

impl SleepSchedule {
    pub fn new(start: ClockTime, end: ClockTime, offset: UtcOffset) -> Self {
        Self { start, end, offset }
    }

    /// Sleep length; a night crossing midnight wraps around.
    pub fn duration(&self) -> Duration {
        Duration::minutes((self.end.minutes() - self.start.minutes()).rem_euclid(MINUTES_PER_DAY))
    }

    /// Local wake time, used to place CBTmin.
    pub fn wake(&self) -> ClockTime {
        self.end
    }

    /// The first night starting at or after `from`, or `None` for a zero-length schedule.
    pub fn next_occurrence(&self, from: DateTime<Utc>) -> Option<Interval> {
        let start = self.start.to_utc(self.offset).occurrence_on_or_after(from);
        Interval::new(start, start + self.duration())
    }

    /// The next night with `exclusion` removed.
    ///
    /// Returns the untouched occurrence (used to advance the walk) together
    /// with whatever pieces survive the exclusion.
    pub fn occurrence_from(
        &self,
        from: DateTime<Utc>,
        exclusion: Option<&Interval>,
    ) -> Option<(Interval, Vec<Interval>)> {
        let night = self.next_occurrence(from)?;
        let pieces = match exclusion {
            Some(blocked) => night.subtract(std::slice::from_ref(blocked)),
            None => vec![night],
        };
        Some((night, pieces))
    }
}

/// Walk `horizon` and produce non-overlapping sleep windows.
///
/// The walk stops at the first night starting at or after `horizon.end()`.
pub fn generate_sleep_windows(
    origin: &SleepSchedule,
    destination: &SleepSchedule,
    travel: &Interval,
    horizon: &Interval,
) -> Vec<Interval> {
    let mut windows = Vec::new();
    let mut cursor = horizon.start();

    // Origin nights that end before travel starts.
    while let Some(night) = origin.next_occurrence(cursor) {
        if night.start() >= horizon.end() || night.end() > travel.start() {
            break;
        }
        windows.push(night);
        cursor = night.end();
    }

    while let Some((night, pieces)) = destination.occurrence_from(cursor, Some(travel)) {
        if night.start() >= horizon.end() {
            break;
        }
        windows.extend(pieces);
        cursor = night.end();
    }

    windows
}
