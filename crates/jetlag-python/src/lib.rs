//! # jetlag-python
//!
//! Python bindings for jetlag-engine, built with PyO3.
//!
//! Exposes the following functions to Python as the `jetlag` module:
//!
//! - `compute_timetable(request_json)` -- request JSON -> JSON array of events
//! - `render_grid(request_json)` -- request JSON -> ASCII half-hour grid
//! - `zone_offset(zone, local)` -- IANA zone + local time -> offset in hours

use jetlag_engine::clock::parse_local_datetime;
use jetlag_engine::{JetLagEvent, TimetableRequest};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn events_for(request_json: &str) -> PyResult<Vec<JetLagEvent>> {
    let request: TimetableRequest = serde_json::from_str(request_json)
        .map_err(|e| PyValueError::new_err(format!("Invalid request JSON: {}", e)))?;
    jetlag_engine::compute_timetable(&request).map_err(value_error)
}

/// Compute a jet-lag timetable.
///
/// Args:
///     request_json: A camelCase request, e.g. with ``originOffset``,
///         ``destSleepStart`` and ``travelStart`` fields.
///
/// Returns:
///     A JSON string containing the sorted array of events. Each event has
///     ``kind``, ``start``, ``end`` (null for point events), ``flags``,
///     ``phase_direction`` and ``signed_initial_diff_hours``.
///
/// Raises:
///     ValueError: If the request is malformed or scheduling fails.
#[pyfunction]
fn compute_timetable(request_json: &str) -> PyResult<String> {
    let events = events_for(request_json)?;
    serde_json::to_string(&events).map_err(value_error)
}

/// Compute a timetable and render it as a half-hour UTC grid.
///
/// Raises:
///     ValueError: If the request is malformed or scheduling fails.
#[pyfunction]
fn render_grid(request_json: &str) -> PyResult<String> {
    let events = events_for(request_json)?;
    Ok(jetlag_engine::render_ascii(&jetlag_engine::bucket_events(&events)))
}

/// UTC offset in hours of an IANA zone at a local wall-clock time.
///
/// Args:
///     zone: IANA timezone identifier (e.g., "Asia/Tokyo").
///     local: Local datetime string (e.g., "2025-06-01T09:00").
///
/// Raises:
///     ValueError: If the zone or datetime is invalid.
#[pyfunction]
fn zone_offset(zone: &str, local: &str) -> PyResult<f64> {
    let local = parse_local_datetime(local).map_err(value_error)?;
    jetlag_engine::offset_hours_at(zone, local).map_err(value_error)
}

/// The `jetlag` Python module, implemented in Rust via PyO3.
#[pymodule]
fn jetlag(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(compute_timetable, m)?)?;
    m.add_function(wrap_pyfunction!(render_grid, m)?)?;
    m.add_function(wrap_pyfunction!(zone_offset, m)?)?;
    Ok(())
}
