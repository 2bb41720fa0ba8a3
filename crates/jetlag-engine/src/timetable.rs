//! Timetable entry point: request validation, start-mode resolution and
//! orchestration of the scheduling pipeline.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::{format_instant, parse_local_datetime, ClockTime, UtcOffset};
use crate::error::{JetLagError, Result};
use crate::event::{assemble_events, JetLagEvent};
use crate::intervention::InterventionFlags;
use crate::interval::Interval;
use crate::phase::{cbtmin_from_wake, signed_diff_minutes, PhaseDirection};
use crate::scheduler::{run, SchedulerState, ShiftContext};
use crate::settings::ScheduleSettings;
use crate::sleep::{generate_sleep_windows, SleepSchedule};

/// Days of origin schedule shown before shifting or travel begins.
const LEAD_IN_DAYS: i64 = 2;

/// Longest accepted preconditioning run, in days.
pub const MAX_PRE_DAYS: u32 = 365;

/// A timetable request as submitted by the planner form.
///
/// Sleep times are `HH:MM` on the respective local clock. `travel_start` is
/// read on the origin clock and `travel_end` on the destination clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRequest {
    pub origin_offset: f64,
    pub dest_offset: f64,
    pub origin_sleep_start: String,
    pub origin_sleep_end: String,
    pub dest_sleep_start: String,
    pub dest_sleep_end: String,
    pub travel_start: String,
    pub travel_end: String,
    pub use_melatonin: bool,
    pub use_light_dark: bool,
    pub use_exercise: bool,
    #[serde(default)]
    pub pre_days: u32,
    #[serde(default = "default_adjustment_start")]
    pub adjustment_start: String,
}

fn default_adjustment_start() -> String {
    StartMode::default().as_str().to_string()
}

/// When shifting begins and whether travel blocks interventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StartMode {
    /// Shift from arrival; nothing happens during travel.
    #[default]
    AfterArrival,
    /// Shift from departure, travel included.
    TravelStart,
    /// Shift `pre_days` before departure at a reduced rate; travel is blocked.
    Precondition,
    /// Like `Precondition`, but interventions continue through travel.
    PreconditionWithTravel,
}

impl StartMode {
    pub fn as_str(self) -> &'static str {
        match self {
            StartMode::AfterArrival => "after_arrival",
            StartMode::TravelStart => "travel_start",
            StartMode::Precondition => "precondition",
            StartMode::PreconditionWithTravel => "precondition_with_travel",
        }
    }

    /// `None` when `pre_days` reaches past the representable calendar.
    pub fn shift_start(self, travel: &Interval, pre_days: u32) -> Option<DateTime<Utc>> {
        match self {
            StartMode::AfterArrival => Some(travel.end()),
            StartMode::TravelStart => Some(travel.start()),
            StartMode::Precondition | StartMode::PreconditionWithTravel => travel
                .start()
                .checked_sub_signed(Duration::days(i64::from(pre_days))),
        }
    }

    /// The window in which interventions and shifting are suppressed.
    pub fn no_intervention(self, travel: &Interval) -> Option<Interval> {
        match self {
            StartMode::AfterArrival | StartMode::Precondition => Some(*travel),
            StartMode::TravelStart | StartMode::PreconditionWithTravel => None,
        }
    }

    pub fn shifts_before_travel(self) -> bool {
        matches!(self, StartMode::Precondition | StartMode::PreconditionWithTravel)
    }
}

impl FromStr for StartMode {
    type Err = JetLagError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "after_arrival" => Ok(StartMode::AfterArrival),
            "travel_start" => Ok(StartMode::TravelStart),
            "precondition" => Ok(StartMode::Precondition),
            "precondition_with_travel" => Ok(StartMode::PreconditionWithTravel),
            other => Err(JetLagError::InvalidStartMode(other.to_string())),
        }
    }
}

impl fmt::Display for StartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request with every field parsed and every clock normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimetableInputs {
    pub origin_sleep: SleepSchedule,
    pub destination_sleep: SleepSchedule,
    pub travel: Interval,
    pub flags: InterventionFlags,
    pub pre_days: u32,
    pub mode: StartMode,
}

impl TryFrom<&TimetableRequest> for TimetableInputs {
    type Error = JetLagError;

    fn try_from(req: &TimetableRequest) -> Result<Self> {
        let origin_offset = UtcOffset::from_hours(req.origin_offset)?;
        let dest_offset = UtcOffset::from_hours(req.dest_offset)?;

        let origin_sleep = SleepSchedule::new(
            ClockTime::parse(&req.origin_sleep_start)?,
            ClockTime::parse(&req.origin_sleep_end)?,
            origin_offset,
        );
        let destination_sleep = SleepSchedule::new(
            ClockTime::parse(&req.dest_sleep_start)?,
            ClockTime::parse(&req.dest_sleep_end)?,
            dest_offset,
        );

        let start = origin_offset.local_to_utc(parse_local_datetime(&req.travel_start)?);
        let end = dest_offset.local_to_utc(parse_local_datetime(&req.travel_end)?);
        let travel = Interval::new(start, end).ok_or(JetLagError::TravelOrder { start, end })?;

        if req.pre_days > MAX_PRE_DAYS {
            return Err(JetLagError::InvalidPreDays(req.pre_days));
        }

        Ok(Self {
            origin_sleep,
            destination_sleep,
            travel,
            flags: InterventionFlags {
                melatonin: req.use_melatonin,
                light_dark: req.use_light_dark,
                exercise: req.use_exercise,
            },
            pre_days: req.pre_days,
            mode: req.adjustment_start.parse()?,
        })
    }
}

/// Compute the full timetable with default settings.
///
/// # Errors
/// Returns a validation error for malformed input, or
/// `JetLagError::IterationLimitExceeded` if scheduling does not settle.
///
/// # Example
///
/// ```
/// use jetlag_engine::timetable::{compute_timetable, TimetableRequest};
///
/// let request: TimetableRequest = serde_json::from_str(r#"{
///     "originOffset": 0, "destOffset": 8,
///     "originSleepStart": "23:00", "originSleepEnd": "07:00",
///     "destSleepStart": "23:00", "destSleepEnd": "07:00",
///     "travelStart": "2025-06-01T10:00", "travelEnd": "2025-06-02T06:00",
///     "useMelatonin": true, "useLightDark": true, "useExercise": true
/// }"#).unwrap();
///
/// let events = compute_timetable(&request).unwrap();
/// assert!(events.iter().any(|e| e.is_travel()));
/// ```
pub fn compute_timetable(request: &TimetableRequest) -> Result<Vec<JetLagEvent>> {
    compute_timetable_with(request, &ScheduleSettings::default())
}

/// Compute the full timetable under explicit settings.
pub fn compute_timetable_with(
    request: &TimetableRequest,
    settings: &ScheduleSettings,
) -> Result<Vec<JetLagEvent>> {
    let inputs = TimetableInputs::try_from(request)?;
    plan(&inputs, settings)
}

/// Run the pipeline on already validated inputs.
pub fn plan(inputs: &TimetableInputs, settings: &ScheduleSettings) -> Result<Vec<JetLagEvent>> {
    let origin_cbtmin =
        cbtmin_from_wake(inputs.origin_sleep.wake()).to_utc(inputs.origin_sleep.offset);
    let dest_cbtmin =
        cbtmin_from_wake(inputs.destination_sleep.wake()).to_utc(inputs.destination_sleep.offset);
    let initial_diff = signed_diff_minutes(dest_cbtmin, origin_cbtmin);
    let direction = PhaseDirection::from_diff_minutes(initial_diff);

    let travel = inputs.travel;
    let shift_start = inputs
        .mode
        .shift_start(&travel, inputs.pre_days)
        .ok_or(JetLagError::InvalidPreDays(inputs.pre_days))?;
    let ctx = ShiftContext {
        dest_cbtmin,
        direction,
        flags: inputs.flags,
        travel,
        no_intervention: inputs.mode.no_intervention(&travel),
        shift_start,
        shifts_before_travel: inputs.mode.shifts_before_travel(),
    };

    let horizon_start = shift_start
        .min(travel.start())
        .checked_sub_signed(Duration::days(LEAD_IN_DAYS))
        .ok_or_else(|| JetLagError::TravelOutOfRange(format_instant(travel.start())))?;
    let seed = SchedulerState::seed(origin_cbtmin, horizon_start);
    let entries = run(seed, &ctx, settings)?;

    let last_cbtmin = entries.last().map_or(seed.cursor, |e| e.cbtmin);
    let sleep = Interval::new(horizon_start, last_cbtmin + Duration::days(1))
        .map(|horizon| {
            generate_sleep_windows(
                &inputs.origin_sleep,
                &inputs.destination_sleep,
                &travel,
                &horizon,
            )
        })
        .unwrap_or_default();

    let events = assemble_events(&entries, &sleep, &travel, direction, initial_diff);

    info!(
        mode = %inputs.mode,
        direction = %direction,
        initial_diff_hours = initial_diff as f64 / 60.0,
        days = entries.len(),
        sleep_windows = sleep.len(),
        events = events.len(),
        "timetable computed"
    );

    Ok(events)
}
