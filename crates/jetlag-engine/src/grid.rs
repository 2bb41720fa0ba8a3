//! Half-hour UTC grid view of a timetable.
//!
//! Each UTC day is split into 48 slots of 30 minutes. A slot records every
//! event kind that touches it; rendering picks one symbol per slot.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, DurationRound, NaiveDate, Timelike, Utc};

use crate::event::{EventKind, JetLagEvent};

pub const SLOT_MINUTES: i64 = 30;
pub const SLOTS_PER_DAY: usize = 48;

const DATE_COLUMN_WIDTH: usize = 10;

/// Event kinds present in one 30-minute slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotMarks {
    pub sleep: bool,
    pub travel: bool,
    pub cbtmin: bool,
    pub melatonin: bool,
    pub exercise: bool,
    pub light: bool,
    pub dark: bool,
}

impl SlotMarks {
    fn mark(&mut self, kind: &EventKind) {
        match kind {
            EventKind::Sleep(_) => self.sleep = true,
            EventKind::Travel(_) => self.travel = true,
            EventKind::CbtMin(_) => self.cbtmin = true,
            EventKind::Melatonin(_) => self.melatonin = true,
            EventKind::Exercise(_) => self.exercise = true,
            EventKind::Light(_) => self.light = true,
            EventKind::Dark(_) => self.dark = true,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == SlotMarks::default()
    }

    /// Highest-priority symbol for the slot.
    pub fn symbol(&self) -> char {
        let ranked = [
            (self.melatonin, 'M'),
            (self.cbtmin, 'C'),
            (self.travel, 'T'),
            (self.light, 'L'),
            (self.dark, 'D'),
            (self.exercise, 'E'),
            (self.sleep, 'z'),
        ];
        ranked
            .into_iter()
            .find_map(|(set, symbol)| set.then_some(symbol))
            .unwrap_or('.')
    }
}

/// One UTC calendar day of slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    pub slots: [SlotMarks; SLOTS_PER_DAY],
}

fn slot_index(instant: DateTime<Utc>) -> usize {
    (instant.hour() as usize * 60 + instant.minute() as usize) / SLOT_MINUTES as usize
}

/// Bucket events into days of half-hour slots, ordered by date.
///
/// Interval events mark every slot they overlap; point events mark the slot
/// containing them. Days no event touches are omitted.
pub fn bucket_events(events: &[JetLagEvent]) -> Vec<GridDay> {
    let mut days: BTreeMap<NaiveDate, [SlotMarks; SLOTS_PER_DAY]> = BTreeMap::new();
    let slot = chrono::Duration::minutes(SLOT_MINUTES);

    let mut mark = |instant: DateTime<Utc>, kind: &EventKind| {
        let slots = days
            .entry(instant.date_naive())
            .or_insert([SlotMarks::default(); SLOTS_PER_DAY]);
        slots[slot_index(instant)].mark(kind);
    };

    for event in events {
        match event.kind.interval() {
            Some(interval) => {
                let mut cursor = interval
                    .start()
                    .duration_trunc(slot)
                    .unwrap_or_else(|_| interval.start());
                while cursor < interval.end() {
                    mark(cursor, &event.kind);
                    cursor += slot;
                }
            }
            None => mark(event.start(), &event.kind),
        }
    }

    days.into_iter()
        .map(|(date, slots)| GridDay { date, slots })
        .collect()
}

/// Render days as an ASCII table, one row per day, two characters per hour.
pub fn render_ascii(days: &[GridDay]) -> String {
    let mut out = String::new();

    let mut header = format!("{:<DATE_COLUMN_WIDTH$} |", "UTC");
    for hour in 0..24 {
        let _ = write!(header, "{hour:<2}");
    }
    let rule = "-".repeat(header.len());
    out.push_str(&header);
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');

    for day in days {
        let _ = write!(out, "{:<DATE_COLUMN_WIDTH$} |", day.date.to_string());
        out.extend(day.slots.iter().map(SlotMarks::symbol));
        out.push('\n');
    }

    out.push_str(&rule);
    out.push('\n');
    out.push_str("M melatonin  C CBTmin  T travel  L light  D dark  E exercise  z sleep\n");
    out
}
