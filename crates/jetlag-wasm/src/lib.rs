//! WASM bindings for jetlag-engine.
//!
//! Exposes timetable computation, grid rendering and zone offset lookup to
//! JavaScript via `wasm-bindgen`. Requests and results cross the boundary as
//! JSON strings in the same camelCase shape the planner form submits.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p jetlag-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg/ \
//!   target/wasm32-unknown-unknown/release/jetlag_wasm.wasm
//! ```

use jetlag_engine::clock::parse_local_datetime;
use jetlag_engine::{
    bucket_events, compute_timetable, offset_hours_at, render_ascii, JetLagEvent,
    TimetableRequest,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Boundary-free helpers (plain `String` errors so they run off-wasm too)
// ---------------------------------------------------------------------------

fn events_for(request_json: &str) -> Result<Vec<JetLagEvent>, String> {
    let request: TimetableRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid request JSON: {}", e))?;
    compute_timetable(&request).map_err(|e| e.to_string())
}

fn timetable_json(request_json: &str) -> Result<String, String> {
    let events = events_for(request_json)?;
    serde_json::to_string(&events).map_err(|e| format!("Serialization error: {}", e))
}

fn grid_text(request_json: &str) -> Result<String, String> {
    Ok(render_ascii(&bucket_events(&events_for(request_json)?)))
}

fn zone_offset_hours(zone: &str, local: &str) -> Result<f64, String> {
    let local = parse_local_datetime(local).map_err(|e| e.to_string())?;
    offset_hours_at(zone, local).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute a timetable.
///
/// `request_json` is a camelCase timetable request. Returns a JSON string
/// containing the sorted array of events.
#[wasm_bindgen(js_name = "computeTimetable")]
pub fn compute_timetable_js(request_json: &str) -> Result<String, JsValue> {
    timetable_json(request_json).map_err(|e| JsValue::from_str(&e))
}

/// Compute a timetable and render it as a half-hour UTC grid.
#[wasm_bindgen(js_name = "renderGrid")]
pub fn render_grid(request_json: &str) -> Result<String, JsValue> {
    grid_text(request_json).map_err(|e| JsValue::from_str(&e))
}

/// UTC offset in hours of an IANA `zone` at local time `local` (`YYYY-MM-DDTHH:MM`).
#[wasm_bindgen(js_name = "zoneOffset")]
pub fn zone_offset(zone: &str, local: &str) -> Result<f64, JsValue> {
    zone_offset_hours(zone, local).map_err(|e| JsValue::from_str(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = r#"{
        "originOffset": -5, "destOffset": 1,
        "originSleepStart": "22:30", "originSleepEnd": "06:30",
        "destSleepStart": "23:00", "destSleepEnd": "07:00",
        "travelStart": "2025-06-10T18:00", "travelEnd": "2025-06-11T08:00",
        "useMelatonin": true, "useLightDark": true, "useExercise": false,
        "adjustmentStart": "precondition", "preDays": 2
    }"#;

    #[test]
    fn timetable_json_is_an_event_array() {
        let json: serde_json::Value = serde_json::from_str(&timetable_json(REQUEST).unwrap()).unwrap();
        let events = json.as_array().unwrap();
        assert!(!events.is_empty());
        assert!(events.iter().any(|e| e["kind"] == "travel"));
        assert!(!events.iter().any(|e| e["kind"] == "exercise"));
    }

    #[test]
    fn grid_text_has_legend() {
        assert!(grid_text(REQUEST).unwrap().contains("z sleep"));
    }

    #[test]
    fn errors_are_messages() {
        let err = timetable_json("{}").unwrap_err();
        assert!(err.starts_with("Invalid request JSON"));
        let err = zone_offset_hours("Europe/Paris", "yesterday").unwrap_err();
        assert!(err.contains("yesterday"));
        assert_eq!(zone_offset_hours("Europe/Paris", "2025-01-15T12:00"), Ok(1.0));
    }
}
