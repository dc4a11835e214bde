//! Booking window request and validation verdict

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::working_hours::{serialize_weekday, weekday_name, TimeOfDay};

/// Naive timestamp layouts accepted as UTC, tried in order
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an absolute timestamp.
///
/// RFC 3339 values keep their offset and are normalized to UTC. Values
/// without an offset are read as UTC; no local timezone is ever applied.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// A proposed booking interval for one organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingWindowRequest {
    pub organization_id: Uuid,
    pub requested_start: DateTime<Utc>,
    pub requested_end: DateTime<Utc>,
    /// The instant the buffer is measured from
    pub evaluation_instant: DateTime<Utc>,
}

impl BookingWindowRequest {
    pub fn at(
        organization_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        evaluation_instant: DateTime<Utc>,
    ) -> Self {
        Self {
            organization_id,
            requested_start: start,
            requested_end: end,
            evaluation_instant,
        }
    }
}

/// Unparsed booking window as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBookingWindow {
    pub requested_start: String,
    pub requested_end: String,
    /// Defaults to the time of the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_instant: Option<String>,
}

/// A single reason a booking window was rejected
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Violation {
    /// Unparseable timestamps or end not after start; always reported alone
    InvalidRange { reason: String },

    /// The booking touches a date outside its open hours. Absent open and
    /// close times mean the date is closed.
    OutsideWorkingHours {
        date: NaiveDate,
        #[serde(serialize_with = "serialize_weekday")]
        weekday: Weekday,
        open_time: Option<TimeOfDay>,
        close_time: Option<TimeOfDay>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    BufferViolation {
        required_buffer_hours: u32,
        actual_lead_hours: f64,
    },

    /// `actual_hours` is the raw duration, `effective_hours` the duration
    /// after skipping closed days (equal when skipping is off)
    MaxLengthExceeded {
        max_hours: u32,
        actual_hours: f64,
        effective_hours: f64,
    },
}

impl Violation {
    /// Fatal input problems; the caller must not submit the booking
    pub fn is_fatal(&self) -> bool {
        matches!(self, Violation::InvalidRange { .. })
    }
}

fn plural_hours(n: u32) -> &'static str {
    if n == 1 {
        "hour"
    } else {
        "hours"
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::InvalidRange { reason } => write!(f, "Invalid booking dates: {}", reason),
            Violation::OutsideWorkingHours {
                date,
                weekday,
                open_time: Some(open),
                close_time: Some(close),
                ..
            } => write!(
                f,
                "Booking must be within working hours on {} {} ({} - {})",
                weekday_name(*weekday),
                date,
                open,
                close
            ),
            Violation::OutsideWorkingHours {
                date,
                reason: Some(reason),
                ..
            } => write!(f, "Organization is closed on {} ({})", date, reason),
            Violation::OutsideWorkingHours { weekday, .. } => {
                write!(f, "Organization is closed on {}", weekday_name(*weekday))
            }
            Violation::BufferViolation {
                required_buffer_hours,
                ..
            } => write!(
                f,
                "Booking must be made at least {} {} in advance",
                required_buffer_hours,
                plural_hours(*required_buffer_hours)
            ),
            Violation::MaxLengthExceeded { max_hours, .. } => {
                write!(f, "Booking exceeds the {}-hour maximum length", max_hours)
            }
        }
    }
}

/// Outcome of evaluating one booking window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationVerdict {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationVerdict {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }

    pub fn invalid_range(reason: impl Into<String>) -> Self {
        Self::from_violations(vec![Violation::InvalidRange {
            reason: reason.into(),
        }])
    }

    /// One human-readable line per violation, in order
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}
