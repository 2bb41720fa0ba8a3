//! Clock times, UTC offsets and instants.
//!
//! `ClockTime` is a wall-clock reading with no date and no zone attached.
//! Instants are `DateTime<Utc>`. The two never mix without an explicit
//! [`UtcOffset`] or an explicit occurrence lookup.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Timelike, Utc};

use crate::error::{JetLagError, Result};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Largest accepted distance from UTC, in hours.
const MAX_OFFSET_HOURS: f64 = 18.0;

/// Minutes since midnight, always in `0..1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    /// Wrap any minute count onto the 24-hour dial.
    pub fn from_minutes(minutes: i64) -> Self {
        Self(minutes.rem_euclid(MINUTES_PER_DAY) as u16)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Self {
        Self::from_minutes(i64::from(hour) * 60 + i64::from(minute))
    }

    /// Parse a 24-hour `HH:MM` string.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || JetLagError::InvalidTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if h.is_empty() || h.len() > 2 || m.len() != 2 || !all_digits(h) || !all_digits(m) {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        Ok(Self::from_hm(hour, minute))
    }

    /// The UTC clock reading of an instant.
    pub fn of_instant(instant: DateTime<Utc>) -> Self {
        Self::from_hm(instant.hour(), instant.minute())
    }

    pub fn minutes(self) -> i64 {
        i64::from(self.0)
    }

    pub fn hours(self) -> f64 {
        self.minutes() as f64 / 60.0
    }

    pub fn shifted(self, minutes: i64) -> Self {
        Self::from_minutes(self.minutes() + minutes)
    }

    /// Convert a local reading at `offset` to the UTC reading.
    pub fn to_utc(self, offset: UtcOffset) -> Self {
        self.shifted(-offset.minutes())
    }

    /// Convert a UTC reading to the local reading at `offset`.
    pub fn to_local(self, offset: UtcOffset) -> Self {
        self.shifted(offset.minutes())
    }

    /// First instant at or after `from` whose UTC clock reads `self`.
    pub fn occurrence_on_or_after(self, from: DateTime<Utc>) -> DateTime<Utc> {
        let candidate = from.date_naive().and_time(NaiveTime::MIN).and_utc()
            + Duration::minutes(self.minutes());
        if candidate < from {
            candidate + Duration::days(1)
        } else {
            candidate
        }
    }

    /// First instant strictly after `after` whose UTC clock reads `self`.
    pub fn occurrence_after(self, after: DateTime<Utc>) -> DateTime<Utc> {
        let candidate = self.occurrence_on_or_after(after);
        if candidate == after {
            candidate + Duration::days(1)
        } else {
            candidate
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// A fixed UTC offset in whole minutes east of UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UtcOffset {
    minutes: i64,
}

impl UtcOffset {
    pub const UTC: UtcOffset = UtcOffset { minutes: 0 };

    /// Build an offset from (possibly fractional) hours, rounded to the minute.
    pub fn from_hours(hours: f64) -> Result<Self> {
        if !hours.is_finite() || hours.abs() > MAX_OFFSET_HOURS {
            return Err(JetLagError::InvalidOffset(hours.to_string()));
        }
        Ok(Self {
            minutes: (hours * 60.0).round() as i64,
        })
    }

    pub fn from_minutes(minutes: i64) -> Result<Self> {
        Self::from_hours(minutes as f64 / 60.0)
    }

    pub fn minutes(self) -> i64 {
        self.minutes
    }

    pub fn hours(self) -> f64 {
        self.minutes as f64 / 60.0
    }

    /// Interpret a wall-clock datetime read at this offset as a UTC instant.
    pub fn local_to_utc(self, local: NaiveDateTime) -> DateTime<Utc> {
        (local - Duration::minutes(self.minutes)).and_utc()
    }

    pub fn utc_to_local(self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.naive_utc() + Duration::minutes(self.minutes)
    }
}

/// Parse a `YYYY-MM-DDTHH:MM` wall-clock datetime (no zone).
pub fn parse_local_datetime(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M")
        .map_err(|_| JetLagError::InvalidDateTime(s.to_string()))
}

/// Fixed-width ISO 8601 rendering with a `Z` suffix and no fractional seconds.
///
/// Every instant shares this width, so lexicographic order equals
/// chronological order.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
