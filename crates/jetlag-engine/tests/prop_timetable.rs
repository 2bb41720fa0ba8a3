//! Property-based tests for timetable invariants using proptest.
//!
//! Requests are generated across offsets, sleep schedules, flight lengths,
//! intervention flags and start modes; every one must produce a timetable
//! that satisfies the invariants below.

use chrono::{Duration, NaiveDate};
use jetlag_engine::clock::{ClockTime, UtcOffset};
use jetlag_engine::phase::{cbtmin_from_wake, signed_diff_minutes};
use jetlag_engine::{compute_timetable, JetLagEvent, TimetableRequest};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Half-hour offsets from UTC-12 to UTC+14.
fn arb_offset() -> impl Strategy<Value = f64> {
    (-24i32..=28).prop_map(|half_hours| f64::from(half_hours) / 2.0)
}

/// A sleep schedule as `(start, end)` strings, 6-9 hours long.
fn arb_sleep() -> impl Strategy<Value = (String, String)> {
    (20u32..=26, prop_oneof![Just(0u32), Just(30u32)], 6u32..=9).prop_map(|(h, m, len)| {
        let start = ClockTime::from_hm(h, m);
        let end = start.shifted(i64::from(len) * 60);
        (start.to_string(), end.to_string())
    })
}

fn arb_mode() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("after_arrival".to_string()),
        Just("travel_start".to_string()),
        Just("precondition".to_string()),
        Just("precondition_with_travel".to_string()),
    ]
}

prop_compose! {
    fn arb_request()(
        origin_offset in arb_offset(),
        dest_offset in arb_offset(),
        origin_sleep in arb_sleep(),
        dest_sleep in arb_sleep(),
        depart_minutes in 0i64..(24 * 60),
        flight_hours in 2i64..=16,
        flags in any::<(bool, bool, bool)>(),
        pre_days in 0u32..=4,
        mode in arb_mode(),
    ) -> TimetableRequest {
        let day = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let depart_local = day + Duration::minutes(depart_minutes);
        // Arrival on the destination clock.
        let arrive_local = depart_local
            + Duration::hours(flight_hours)
            + Duration::minutes(((dest_offset - origin_offset) * 60.0) as i64);

        TimetableRequest {
            origin_offset,
            dest_offset,
            origin_sleep_start: origin_sleep.0,
            origin_sleep_end: origin_sleep.1,
            dest_sleep_start: dest_sleep.0,
            dest_sleep_end: dest_sleep.1,
            travel_start: depart_local.format("%Y-%m-%dT%H:%M").to_string(),
            travel_end: arrive_local.format("%Y-%m-%dT%H:%M").to_string(),
            use_melatonin: flags.0,
            use_light_dark: flags.1,
            use_exercise: flags.2,
            pre_days,
            adjustment_start: mode,
        }
    }
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

/// Destination CBTmin on the UTC dial.
fn dest_cbtmin(req: &TimetableRequest) -> ClockTime {
    let offset = UtcOffset::from_hours(req.dest_offset).unwrap();
    cbtmin_from_wake(ClockTime::parse(&req.dest_sleep_end).unwrap()).to_utc(offset)
}

// ---------------------------------------------------------------------------
// Property 1: Output is sorted by start
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn events_are_sorted(req in arb_request()) {
        let events = compute_timetable(&req).unwrap();
        for pair in events.windows(2) {
            prop_assert!(
                pair[0].start() <= pair[1].start(),
                "events not sorted: {:?} > {:?}",
                pair[0],
                pair[1]
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Remaining phase difference never grows and reaches zero
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn convergence_is_monotonic(req in arb_request()) {
        let events = compute_timetable(&req).unwrap();
        let target = dest_cbtmin(&req);

        let remaining: Vec<i64> = events
            .iter()
            .filter(|e| e.is_cbtmin())
            .map(|e| signed_diff_minutes(target, ClockTime::of_instant(e.start())).abs())
            .collect();

        prop_assert!(remaining.len() >= 3);
        for pair in remaining.windows(2) {
            prop_assert!(pair[1] <= pair[0], "difference grew: {:?}", remaining);
        }
        // The last three entries are the converged day and two stabilization days.
        prop_assert!(remaining[remaining.len() - 3..].iter().all(|r| *r == 0));
    }
}

// ---------------------------------------------------------------------------
// Property 3: Sleep never overlaps sleep or interval interventions
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn sleep_is_kept_clear(req in arb_request()) {
        let events = compute_timetable(&req).unwrap();
        let sleep: Vec<&JetLagEvent> = events.iter().filter(|e| e.is_sleep()).collect();

        for pair in sleep.windows(2) {
            prop_assert!(pair[0].end().unwrap() <= pair[1].start());
        }
        for window in events.iter().filter(|e| e.is_intervention_window()) {
            let w = window.kind.interval().unwrap();
            for night in &sleep {
                let n = night.kind.interval().unwrap();
                prop_assert!(!w.overlaps(&n), "{:?} overlaps {:?}", window, night);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Every event shares the run's direction and initial difference
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn run_metadata_is_uniform(req in arb_request()) {
        let events = compute_timetable(&req).unwrap();
        let first = events[0];
        let all_consistent = events.iter().all(|e| {
            e.phase_direction == first.phase_direction
                && e.signed_initial_diff_hours == first.signed_initial_diff_hours
        });
        prop_assert!(all_consistent);
        prop_assert_eq!(events.iter().filter(|e| e.is_travel()).count(), 1);
    }
}
