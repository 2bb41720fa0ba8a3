//! Convergence loop: day-by-day movement of CBTmin toward the destination.
//!
//! The loop state is an explicit [`SchedulerState`] value. [`step`] is a pure
//! function from one state to the next plus the day's [`CbtEntry`]; [`run`]
//! drives it from a seed until the clock has converged and the stabilization
//! days have been emitted.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::clock::ClockTime;
use crate::error::{JetLagError, Result};
use crate::intervention::{build_interventions, InterventionFlags, InterventionSchedule};
use crate::interval::Interval;
use crate::phase::{signed_diff_minutes, PhaseDirection};
use crate::settings::ScheduleSettings;

/// Daily shift with at least one active intervention.
const ASSISTED_SHIFT_MINUTES: i64 = 90;
/// Daily shift with interventions during a precondition day.
const PRECONDITION_ASSISTED_SHIFT_MINUTES: i64 = 60;
/// Daily drift toward the destination without any intervention.
const UNASSISTED_SHIFT_MINUTES: i64 = 60;
/// A day stays put when this window before its CBTmin touches travel.
const TRAVEL_GUARD_HOURS: i64 = 8;

/// One day's CBTmin and the interventions that lead up to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CbtEntry {
    pub cbtmin: DateTime<Utc>,
    pub interventions: InterventionSchedule,
}

/// Loop state threaded from one day to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerState {
    /// Current CBTmin on the UTC dial.
    pub current_cbtmin: ClockTime,
    /// The most recent CBTmin instant.
    pub cursor: DateTime<Utc>,
    /// Days emitted after convergence.
    pub extra_days: u32,
}

impl SchedulerState {
    /// Seed the loop at the first origin CBTmin at or after `from`.
    pub fn seed(origin_cbtmin: ClockTime, from: DateTime<Utc>) -> Self {
        Self {
            current_cbtmin: origin_cbtmin,
            cursor: origin_cbtmin.occurrence_on_or_after(from),
            extra_days: 0,
        }
    }
}

/// Everything a step needs that does not change between days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftContext {
    pub dest_cbtmin: ClockTime,
    pub direction: PhaseDirection,
    pub flags: InterventionFlags,
    pub travel: Interval,
    /// Window in which interventions and shifting are suppressed, if any.
    pub no_intervention: Option<Interval>,
    /// No shifting happens while the cursor is before this instant.
    pub shift_start: DateTime<Utc>,
    /// Whether days between `shift_start` and travel count as precondition days.
    pub shifts_before_travel: bool,
}

impl ShiftContext {
    /// Remaining signed distance to the destination, in minutes.
    pub fn remaining_minutes(&self, state: &SchedulerState) -> i64 {
        signed_diff_minutes(self.dest_cbtmin, state.current_cbtmin)
    }

    /// Entries before this instant do not count toward the day limit.
    ///
    /// Lead-in and precondition days are bounded by the request itself; only
    /// the days from departure or shift start onward must converge.
    pub fn limit_start(&self) -> DateTime<Utc> {
        self.shift_start.max(self.travel.start())
    }

    fn is_precondition(&self, cursor: DateTime<Utc>) -> bool {
        self.shifts_before_travel && self.shift_start < cursor && cursor < self.travel.start()
    }
}

/// Advance the schedule by one day.
pub fn step(state: &SchedulerState, ctx: &ShiftContext) -> (SchedulerState, CbtEntry) {
    let naive = state.current_cbtmin.occurrence_after(state.cursor);
    let remaining = ctx.remaining_minutes(state);

    let interventions = build_interventions(
        naive - Duration::days(1),
        ctx.direction,
        ctx.flags,
        ctx.no_intervention.as_ref(),
        remaining,
    );

    let delta = shift_minutes(state, ctx, naive, remaining, &interventions);
    let signed = delta * ctx.direction.sign();
    let cbtmin = naive + Duration::minutes(signed);

    let next = SchedulerState {
        current_cbtmin: state.current_cbtmin.shifted(signed),
        cursor: cbtmin,
        extra_days: if remaining == 0 {
            state.extra_days + 1
        } else {
            state.extra_days
        },
    };

    debug!(
        cursor = %state.cursor,
        cbtmin = %cbtmin,
        clock = %next.current_cbtmin,
        delta_minutes = signed,
        remaining_minutes = ctx.remaining_minutes(&next),
        interventions = interventions.enabled_count(),
        "scheduled day"
    );

    (
        next,
        CbtEntry {
            cbtmin,
            interventions,
        },
    )
}

/// Unsigned shift for the day, in minutes.
fn shift_minutes(
    state: &SchedulerState,
    ctx: &ShiftContext,
    naive: DateTime<Utc>,
    remaining: i64,
    interventions: &InterventionSchedule,
) -> i64 {
    if state.cursor < ctx.shift_start {
        return 0;
    }

    if let Some(blocked) = &ctx.no_intervention {
        let guard = Interval::new(naive - Duration::hours(TRAVEL_GUARD_HOURS), naive);
        if guard.is_some_and(|g| g.overlaps(blocked)) {
            return 0;
        }
    }

    let precondition = ctx.is_precondition(state.cursor);
    let base = match (interventions.any_enabled(), precondition) {
        (true, true) => PRECONDITION_ASSISTED_SHIFT_MINUTES,
        (true, false) => ASSISTED_SHIFT_MINUTES,
        (false, true) => 0,
        (false, false) => UNASSISTED_SHIFT_MINUTES,
    };
    base.min(remaining.abs())
}

/// True once the clock matches the destination and the stabilization days are out.
pub fn is_settled(state: &SchedulerState, ctx: &ShiftContext, stabilization_days: u32) -> bool {
    ctx.remaining_minutes(state) == 0 && state.extra_days >= stabilization_days
}

/// Run the loop from `seed` until settled.
///
/// The seed itself is the first entry; it carries no interventions and is
/// never shifted.
///
/// # Errors
/// Returns `JetLagError::IterationLimitExceeded` when more than
/// `settings.max_days` entries at or after [`ShiftContext::limit_start`]
/// would be produced.
pub fn run(
    seed: SchedulerState,
    ctx: &ShiftContext,
    settings: &ScheduleSettings,
) -> Result<Vec<CbtEntry>> {
    let limit_start = ctx.limit_start();
    let mut entries = vec![CbtEntry {
        cbtmin: seed.cursor,
        interventions: InterventionSchedule::default(),
    }];
    let mut counted = u32::from(seed.cursor >= limit_start);
    let mut state = seed;

    while !is_settled(&state, ctx, settings.stabilization_days) {
        if counted >= settings.max_days {
            warn!(
                limit = settings.max_days,
                remaining_minutes = ctx.remaining_minutes(&state),
                "convergence loop hit the day limit"
            );
            return Err(JetLagError::IterationLimitExceeded {
                limit: settings.max_days,
            });
        }
        let (next, entry) = step(&state, ctx);
        if entry.cbtmin >= limit_start {
            counted += 1;
        }
        entries.push(entry);
        state = next;
    }

    Ok(entries)
}
