//! Interval algebra on half-open UTC ranges.
//!
//! Every interval is `[start, end)` with `start < end`. Empty or inverted
//! ranges are never represented: [`Interval::new`] returns `None` for them and
//! every operation here drops degenerate results.

use chrono::{DateTime, Duration, Utc};

/// A half-open `[start, end)` UTC time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    /// Build an interval, or `None` when `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True when `instant` lies in `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    ///
    /// Adjacent intervals (one ends exactly when the other starts) do NOT overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        Interval::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Length of the shared portion of two intervals, zero when disjoint.
    pub fn overlap_duration(&self, other: &Interval) -> Duration {
        self.intersection(other)
            .map(|shared| shared.duration())
            .unwrap_or_else(Duration::zero)
    }

    /// Remove every exclusion from this interval.
    ///
    /// Exclusions may overlap each other and may be given in any order; they
    /// are merged first. The remaining pieces are returned sorted by start.
    pub fn subtract(&self, exclusions: &[Interval]) -> Vec<Interval> {
        let mut pieces = Vec::new();
        let mut cursor = self.start;

        for block in merge(exclusions) {
            if block.end <= cursor {
                continue;
            }
            if block.start >= self.end {
                break;
            }
            if let Some(piece) = Interval::new(cursor, block.start.min(self.end)) {
                pieces.push(piece);
            }
            cursor = cursor.max(block.end);
            if cursor >= self.end {
                return pieces;
            }
        }

        // Trailing piece after the last exclusion.
        if let Some(piece) = Interval::new(cursor, self.end) {
            pieces.push(piece);
        }
        pieces
    }
}

/// Merge overlapping or adjacent intervals.
///
/// Returns a sorted, non-overlapping list.
pub fn merge(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|i| (i.start, i.end));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }
    merged
}
