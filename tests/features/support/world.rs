//! Test world for Cucumber scenarios
//!
//! Scenarios run against the evaluator directly with an in-memory
//! configuration snapshot; no database or HTTP server is involved.

use chrono::{DateTime, TimeZone, Utc};
use cucumber::World;
use uuid::Uuid;

use booking_window::{
    evaluate_raw,
    models::{BookingPolicy, RawBookingWindow, ValidationVerdict, WorkingHoursConfig},
};

/// Test world that maintains state across scenario steps
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct BookingWorld {
    pub organization_id: Uuid,
    pub config: WorkingHoursConfig,
    pub policy: BookingPolicy,
    /// Evaluation instant handed to every validation
    pub now: DateTime<Utc>,
    pub last_request: Option<RawBookingWindow>,
    /// Every verdict produced in the scenario, oldest first
    pub verdicts: Vec<ValidationVerdict>,
}

impl BookingWorld {
    pub fn new() -> Self {
        Self {
            organization_id: Uuid::new_v4(),
            config: WorkingHoursConfig::default(),
            policy: BookingPolicy::default(),
            now: Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap(),
            last_request: None,
            verdicts: Vec::new(),
        }
    }

    /// Evaluate a booking window and remember the verdict
    pub fn validate(&mut self, start: &str, end: &str) {
        let raw = RawBookingWindow {
            requested_start: start.to_string(),
            requested_end: end.to_string(),
            evaluation_instant: None,
        };
        self.replay(raw);
    }

    /// Evaluate a previously built request again
    pub fn replay(&mut self, raw: RawBookingWindow) {
        let verdict = evaluate_raw(
            self.organization_id,
            &raw,
            self.now,
            &self.config,
            &self.policy,
        );
        self.last_request = Some(raw);
        self.verdicts.push(verdict);
    }

    pub fn last_verdict(&self) -> &ValidationVerdict {
        self.verdicts
            .last()
            .expect("No booking has been validated in this scenario")
    }
}
