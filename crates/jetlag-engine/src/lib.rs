//! # jetlag-engine
//!
//! Deterministic jet-lag adjustment timetables.
//!
//! Given a traveler's origin and destination sleep schedules, UTC offsets and
//! flight times, the engine estimates the core-body-temperature minimum
//! (CBTmin), moves it day by day toward the destination clock, and emits a
//! sorted list of sleep, travel, CBTmin, melatonin, exercise, light and dark
//! events in UTC.
//!
//! ## Modules
//!
//! - [`timetable`] — Request validation and the `compute_timetable` entry point
//! - [`scheduler`] — Day-by-day convergence loop over an explicit state
//! - [`intervention`] — Daily intervention windows and suppression rules
//! - [`phase`] — CBTmin placement, phase difference and shift presets
//! - [`sleep`] — Sleep windows around the travel interval
//! - [`event`] — Output events and the assembler
//! - [`interval`] — Half-open interval algebra
//! - [`clock`] — Clock times, UTC offsets and parsing
//! - [`grid`] — Half-hour ASCII grid rendering
//! - [`zones`] — IANA timezone offset lookup
//! - [`settings`] — Loop limits
//! - [`error`] — Error types

pub mod clock;
pub mod error;
pub mod event;
pub mod grid;
pub mod intervention;
pub mod interval;
pub mod phase;
pub mod scheduler;
pub mod settings;
pub mod sleep;
pub mod timetable;
pub mod zones;

pub use error::JetLagError;
pub use event::{EventKind, JetLagEvent};
pub use grid::{bucket_events, render_ascii};
pub use interval::Interval;
pub use phase::PhaseDirection;
pub use settings::ScheduleSettings;
pub use timetable::{compute_timetable, compute_timetable_with, StartMode, TimetableRequest};
pub use zones::offset_hours_at;
