//! Test fixtures for common test data
//!
//! All dates lie in January 2030 so override creation never trips the
//! past-date check: 2030-01-05 is a Saturday, 2030-01-07 a Monday.

use serde_json::{json, Value};

/// Fixed evaluation instant used by booking validation requests
pub const EVALUATION_INSTANT: &str = "2030-01-01T08:00:00Z";

pub const SATURDAY: &str = "2030-01-05";
pub const MONDAY: &str = "2030-01-07";
pub const TUESDAY: &str = "2030-01-08";

/// Weekly schedule with every day open 09:00-17:00
pub fn every_day_nine_to_five() -> Value {
    let day = json!({ "is_open": true, "open_time": "09:00", "close_time": "17:00" });
    json!({
        "0": day, "1": day, "2": day, "3": day,
        "4": day, "5": day, "6": day,
    })
}

/// Monday to Friday 09:00-17:00, weekend closed
pub fn office_week() -> Value {
    let day = json!({ "is_open": true, "open_time": "09:00", "close_time": "17:00" });
    json!({
        "0": { "is_open": false },
        "1": day, "2": day, "3": day, "4": day, "5": day,
        "6": { "is_open": false },
    })
}

/// Body for the booking validation endpoint
pub fn booking(start: &str, end: &str) -> Value {
    json!({
        "requested_start": start,
        "requested_end": end,
        "evaluation_instant": EVALUATION_INSTANT,
    })
}
