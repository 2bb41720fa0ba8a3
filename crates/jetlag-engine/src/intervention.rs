//! Per-day intervention windows and their suppression rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::Interval;
use crate::phase::{OffsetWindow, PhaseDirection, PhasePreset};

/// Below this remaining misalignment every intervention is switched off.
pub const SMALL_DIFF_THRESHOLD_MINUTES: i64 = 3 * 60;

/// Which interventions the traveler is willing to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterventionFlags {
    pub melatonin: bool,
    /// Covers both light seeking and dark (light avoidance) windows.
    pub light_dark: bool,
    pub exercise: bool,
}

impl InterventionFlags {
    pub fn all() -> Self {
        Self {
            melatonin: true,
            light_dark: true,
            exercise: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// A point intervention (melatonin dose).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dose {
    pub at: DateTime<Utc>,
    pub enabled: bool,
}

/// An interval intervention (exercise, light, dark).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub interval: Interval,
    pub enabled: bool,
}

/// One day's interventions. A slot is `None` when no preset applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterventionSchedule {
    pub melatonin: Option<Dose>,
    pub exercise: Option<Window>,
    pub light: Option<Window>,
    pub dark: Option<Window>,
}

impl InterventionSchedule {
    pub fn any_enabled(&self) -> bool {
        self.enabled_melatonin().is_some()
            || self.enabled_exercise().is_some()
            || self.enabled_light().is_some()
            || self.enabled_dark().is_some()
    }

    pub fn enabled_count(&self) -> usize {
        [
            self.enabled_melatonin().is_some(),
            self.enabled_exercise().is_some(),
            self.enabled_light().is_some(),
            self.enabled_dark().is_some(),
        ]
        .into_iter()
        .filter(|enabled| *enabled)
        .count()
    }

    pub fn enabled_melatonin(&self) -> Option<DateTime<Utc>> {
        self.melatonin.filter(|d| d.enabled).map(|d| d.at)
    }

    pub fn enabled_exercise(&self) -> Option<Interval> {
        enabled_interval(self.exercise)
    }

    pub fn enabled_light(&self) -> Option<Interval> {
        enabled_interval(self.light)
    }

    pub fn enabled_dark(&self) -> Option<Interval> {
        enabled_interval(self.dark)
    }

    fn disable_all(&mut self) {
        if let Some(dose) = self.melatonin.as_mut() {
            dose.enabled = false;
        }
        for window in [&mut self.exercise, &mut self.light, &mut self.dark]
            .into_iter()
            .flatten()
        {
            window.enabled = false;
        }
    }
}

fn enabled_interval(window: Option<Window>) -> Option<Interval> {
    window.filter(|w| w.enabled).map(|w| w.interval)
}

/// Compute the day's interventions from the previous day's CBTmin.
///
/// Suppression is applied in order:
/// 1. any slot that touches `no_intervention` is disabled;
/// 2. when `abs(remaining_diff_minutes)` is under three hours, all slots are disabled.
pub fn build_interventions(
    previous_cbtmin: DateTime<Utc>,
    direction: PhaseDirection,
    flags: InterventionFlags,
    no_intervention: Option<&Interval>,
    remaining_diff_minutes: i64,
) -> InterventionSchedule {
    let Some(preset) = PhasePreset::for_direction(direction) else {
        return InterventionSchedule::default();
    };

    let window = |offsets: &OffsetWindow, enabled: bool| {
        Interval::new(previous_cbtmin + offsets.start(), previous_cbtmin + offsets.end())
            .map(|interval| Window { interval, enabled })
    };

    let mut schedule = InterventionSchedule {
        melatonin: Some(Dose {
            at: previous_cbtmin + preset.melatonin_offset(),
            enabled: flags.melatonin,
        }),
        exercise: window(&preset.exercise, flags.exercise),
        light: window(&preset.light, flags.light_dark),
        dark: window(&preset.dark, flags.light_dark),
    };

    if let Some(blocked) = no_intervention {
        if let Some(dose) = schedule.melatonin.as_mut() {
            if blocked.contains(dose.at) {
                dose.enabled = false;
            }
        }
        for slot in [&mut schedule.exercise, &mut schedule.light, &mut schedule.dark]
            .into_iter()
            .flatten()
        {
            if slot.interval.overlaps(blocked) {
                slot.enabled = false;
            }
        }
    }

    if remaining_diff_minutes.abs() < SMALL_DIFF_THRESHOLD_MINUTES {
        schedule.disable_all();
    }

    schedule
}
