//! IANA timezone lookup for callers that know zone names rather than offsets.

use chrono::{LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

use crate::clock::UtcOffset;
use crate::error::{JetLagError, Result};

/// The UTC offset in effect in `zone` at wall-clock time `local`.
///
/// An ambiguous local time (DST fall-back) resolves to the earlier instant.
/// A local time inside a DST gap uses the offset in effect at the same
/// reading taken as UTC, which lands on one side of the transition.
///
/// # Errors
/// Returns `JetLagError::InvalidTimezone` if `zone` is not a valid IANA identifier.
pub fn utc_offset_at(zone: &str, local: NaiveDateTime) -> Result<UtcOffset> {
    let tz: Tz = zone
        .parse()
        .map_err(|_| JetLagError::InvalidTimezone(zone.to_string()))?;

    let seconds = match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.offset().fix(),
        LocalResult::None => tz.offset_from_utc_datetime(&local).fix(),
    }
    .local_minus_utc();

    UtcOffset::from_minutes(i64::from(seconds) / 60)
}

/// [`utc_offset_at`] in hours, as used by the request's offset fields.
pub fn offset_hours_at(zone: &str, local: NaiveDateTime) -> Result<f64> {
    utc_offset_at(zone, local).map(UtcOffset::hours)
}
