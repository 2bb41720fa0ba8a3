//! Error types for jetlag-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JetLagError {
    #[error("Invalid HH:MM time: {0}")]
    InvalidTime(String),

    #[error("Invalid datetime (expected YYYY-MM-DDTHH:MM): {0}")]
    InvalidDateTime(String),

    #[error("Invalid UTC offset: {0}")]
    InvalidOffset(String),

    /// Travel end, after offset conversion, does not come strictly after travel start.
    #[error("Travel end {end} must be after travel start {start}")]
    TravelOrder {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid adjustment start mode: {0} (expected after_arrival, travel_start, precondition or precondition_with_travel)")]
    InvalidStartMode(String),

    #[error("Invalid preDays: {0} (expected at most {max})", max = crate::timetable::MAX_PRE_DAYS)]
    InvalidPreDays(u32),

    /// Travel lies so close to the calendar limits that the schedule cannot be laid out.
    #[error("Travel start {0} is outside the supported date range")]
    TravelOutOfRange(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The convergence loop did not settle within the configured number of days.
    #[error("Scheduling error: timetable did not converge within {limit} days")]
    IterationLimitExceeded { limit: u32 },
}

pub type Result<T> = std::result::Result<T, JetLagError>;
