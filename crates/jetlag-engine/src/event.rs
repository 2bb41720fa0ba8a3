//! Output events and the assembler that produces them.
//!
//! Each [`JetLagEvent`] carries a tagged [`EventKind`]; the start/end instants
//! and the boolean flags of the wire format are derived from the tag, so an
//! event can never claim to be two kinds at once.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::clock::format_instant;
use crate::interval::Interval;
use crate::phase::PhaseDirection;
use crate::scheduler::CbtEntry;

/// What an event is, with its timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Sleep(Interval),
    Travel(Interval),
    CbtMin(DateTime<Utc>),
    Melatonin(DateTime<Utc>),
    Exercise(Interval),
    Light(Interval),
    Dark(Interval),
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Sleep(_) => "sleep",
            EventKind::Travel(_) => "travel",
            EventKind::CbtMin(_) => "cbtmin",
            EventKind::Melatonin(_) => "melatonin",
            EventKind::Exercise(_) => "exercise",
            EventKind::Light(_) => "light",
            EventKind::Dark(_) => "dark",
        }
    }

    /// The interval of an interval event, `None` for point events.
    pub fn interval(&self) -> Option<Interval> {
        match *self {
            EventKind::Sleep(i)
            | EventKind::Travel(i)
            | EventKind::Exercise(i)
            | EventKind::Light(i)
            | EventKind::Dark(i) => Some(i),
            EventKind::CbtMin(_) | EventKind::Melatonin(_) => None,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        match *self {
            EventKind::CbtMin(at) | EventKind::Melatonin(at) => at,
            EventKind::Sleep(i)
            | EventKind::Travel(i)
            | EventKind::Exercise(i)
            | EventKind::Light(i)
            | EventKind::Dark(i) => i.start(),
        }
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.interval().map(|i| i.end())
    }
}

/// One timetable entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JetLagEvent {
    pub kind: EventKind,
    pub phase_direction: PhaseDirection,
    pub signed_initial_diff_hours: f64,
}

impl JetLagEvent {
    pub fn start(&self) -> DateTime<Utc> {
        self.kind.start()
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.kind.end()
    }

    pub fn is_sleep(&self) -> bool {
        matches!(self.kind, EventKind::Sleep(_))
    }

    pub fn is_travel(&self) -> bool {
        matches!(self.kind, EventKind::Travel(_))
    }

    pub fn is_cbtmin(&self) -> bool {
        matches!(self.kind, EventKind::CbtMin(_))
    }

    pub fn is_melatonin(&self) -> bool {
        matches!(self.kind, EventKind::Melatonin(_))
    }

    pub fn is_exercise(&self) -> bool {
        matches!(self.kind, EventKind::Exercise(_))
    }

    pub fn is_light(&self) -> bool {
        matches!(self.kind, EventKind::Light(_))
    }

    pub fn is_dark(&self) -> bool {
        matches!(self.kind, EventKind::Dark(_))
    }

    /// True for the interval interventions that are carved around sleep.
    pub fn is_intervention_window(&self) -> bool {
        self.is_exercise() || self.is_light() || self.is_dark()
    }

    pub fn flags(&self) -> EventFlags {
        EventFlags {
            is_sleep: self.is_sleep(),
            is_light: self.is_light(),
            is_dark: self.is_dark(),
            is_travel: self.is_travel(),
            is_exercise: self.is_exercise(),
            is_melatonin: self.is_melatonin(),
            is_cbtmin: self.is_cbtmin(),
        }
    }
}

/// The boolean flag block of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EventFlags {
    pub is_sleep: bool,
    pub is_light: bool,
    pub is_dark: bool,
    pub is_travel: bool,
    pub is_exercise: bool,
    pub is_melatonin: bool,
    pub is_cbtmin: bool,
}

#[derive(Serialize)]
struct EventRecord {
    kind: &'static str,
    start: String,
    end: Option<String>,
    flags: EventFlags,
    phase_direction: PhaseDirection,
    signed_initial_diff_hours: f64,
}

impl Serialize for JetLagEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EventRecord {
            kind: self.kind.label(),
            start: format_instant(self.start()),
            end: self.end().map(format_instant),
            flags: self.flags(),
            phase_direction: self.phase_direction,
            signed_initial_diff_hours: self.signed_initial_diff_hours,
        }
        .serialize(serializer)
    }
}

/// Merge sleep, travel and scheduled days into one sorted event list.
///
/// Exercise, light and dark windows have every sleep window removed and may
/// come out split or dropped. Melatonin is a point event and is kept as is.
/// The final sort is stable, so events sharing a start keep insertion order.
pub fn assemble_events(
    entries: &[CbtEntry],
    sleep: &[Interval],
    travel: &Interval,
    direction: PhaseDirection,
    initial_diff_minutes: i64,
) -> Vec<JetLagEvent> {
    let signed_initial_diff_hours = initial_diff_minutes as f64 / 60.0;
    let event = |kind| JetLagEvent {
        kind,
        phase_direction: direction,
        signed_initial_diff_hours,
    };

    let mut events: Vec<JetLagEvent> = sleep.iter().map(|w| event(EventKind::Sleep(*w))).collect();
    events.push(event(EventKind::Travel(*travel)));

    for entry in entries {
        events.push(event(EventKind::CbtMin(entry.cbtmin)));

        let schedule = &entry.interventions;
        if let Some(at) = schedule.enabled_melatonin() {
            events.push(event(EventKind::Melatonin(at)));
        }

        let windows: [(Option<Interval>, fn(Interval) -> EventKind); 3] = [
            (schedule.enabled_exercise(), EventKind::Exercise),
            (schedule.enabled_light(), EventKind::Light),
            (schedule.enabled_dark(), EventKind::Dark),
        ];
        for (window, kind) in windows {
            let Some(window) = window else { continue };
            events.extend(window.subtract(sleep).into_iter().map(|piece| event(kind(piece))));
        }
    }

    events.sort_by_key(JetLagEvent::start);
    events
}
