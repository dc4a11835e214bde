//! Booking window evaluation
//!
//! Decides whether a proposed booking start/end pair is acceptable for an
//! organization, given its working hours, date overrides and booking policy.
//!
//! [`evaluate`] is a pure function of its inputs: no I/O, no shared state,
//! safe to call from any number of tasks at once. Checks run independently
//! and every applicable violation is reported, except for an invalid range
//! which is reported alone.
//!
//! [`BookingWindowService`] is the thin adapter the HTTP layer uses: it reads
//! the organization's configuration snapshot from the database and hands it
//! to the evaluator.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::{BookingSettingsRepository, WorkingHoursRepository};
use crate::models::{
    parse_timestamp, BookingPolicy, BookingWindowRequest, RawBookingWindow, ResolvedDay,
    ValidationVerdict, Violation, WorkingHoursConfig,
};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Evaluate a booking window against a configuration snapshot
pub fn evaluate(
    request: &BookingWindowRequest,
    config: &WorkingHoursConfig,
    policy: &BookingPolicy,
) -> ValidationVerdict {
    let start = request.requested_start;
    let end = request.requested_end;

    if end <= start {
        return ValidationVerdict::invalid_range("the end of a booking must be after its start");
    }

    let mut violations = Vec::new();

    // Buffer is its own policy axis and applies even with working hours off
    if let Some(v) = check_buffer(start, request.evaluation_instant, policy) {
        violations.push(v);
    }

    if config.enabled {
        violations.extend(check_working_hours(start, end, config));
    }

    if let Some(v) = check_max_length(start, end, config, policy) {
        violations.push(v);
    }

    ValidationVerdict::from_violations(violations)
}

/// Evaluate a booking window submitted as raw strings.
///
/// Unparseable timestamps produce a single `InvalidRange` violation. When no
/// evaluation instant is supplied `now` is used.
pub fn evaluate_raw(
    organization_id: Uuid,
    raw: &RawBookingWindow,
    now: DateTime<Utc>,
    config: &WorkingHoursConfig,
    policy: &BookingPolicy,
) -> ValidationVerdict {
    let Some(start) = parse_timestamp(&raw.requested_start) else {
        return ValidationVerdict::invalid_range(format!(
            "'{}' is not a valid start timestamp",
            raw.requested_start
        ));
    };
    let Some(end) = parse_timestamp(&raw.requested_end) else {
        return ValidationVerdict::invalid_range(format!(
            "'{}' is not a valid end timestamp",
            raw.requested_end
        ));
    };
    let evaluation_instant = match raw.evaluation_instant.as_deref() {
        Some(value) => match parse_timestamp(value) {
            Some(instant) => instant,
            None => {
                return ValidationVerdict::invalid_range(format!(
                    "'{}' is not a valid evaluation instant",
                    value
                ))
            }
        },
        None => now,
    };

    let request = BookingWindowRequest::at(organization_id, start, end, evaluation_instant);
    evaluate(&request, config, policy)
}

/// Exact fractional hours from `from` to `to`
fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

fn check_buffer(
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    policy: &BookingPolicy,
) -> Option<Violation> {
    if policy.buffer_start_time == 0 {
        return None;
    }

    let lead_hours = hours_between(now, start);
    (lead_hours < f64::from(policy.buffer_start_time)).then(|| Violation::BufferViolation {
        required_buffer_hours: policy.buffer_start_time,
        actual_lead_hours: lead_hours,
    })
}

fn outside_hours(day: ResolvedDay) -> Violation {
    Violation::OutsideWorkingHours {
        date: day.date,
        weekday: day.weekday,
        open_time: day.hours.open_time(),
        close_time: day.hours.close_time(),
        reason: day.reason,
    }
}

/// Only the boundary dates are constrained: the start must fall within the
/// start date's hours and the end within the end date's hours.
///
/// Dates in between are not checked and may be closed. Requiring them to be
/// open would reject every booking that `max_booking_length_skip_closed_days`
/// exists for, since the closed days it discounts lie strictly inside the
/// booking. The cost is that a booking may hold a resource across a closed
/// date.
fn check_working_hours(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    config: &WorkingHoursConfig,
) -> Vec<Violation> {
    let start_date = start.date_naive();
    let end_date = end.date_naive();
    let mut violations = Vec::new();

    let first = config.resolve(start_date);
    if start_date == end_date {
        if !first.hours.admits(start.time()) || !first.hours.admits(end.time()) {
            violations.push(outside_hours(first));
        }
        return violations;
    }

    if !first.hours.admits(start.time()) {
        violations.push(outside_hours(first));
    }

    let last = config.resolve(end_date);
    if !last.hours.admits(end.time()) {
        violations.push(outside_hours(last));
    }

    violations
}

fn check_max_length(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    config: &WorkingHoursConfig,
    policy: &BookingPolicy,
) -> Option<Violation> {
    let max_hours = policy.max_booking_length?;
    let actual_hours = hours_between(start, end);

    let effective_hours = if policy.max_booking_length_skip_closed_days {
        let closed = config.closed_days_between(start.date_naive(), end.date_naive());
        actual_hours - closed as f64 * HOURS_PER_DAY
    } else {
        actual_hours
    };

    (effective_hours > f64::from(max_hours)).then_some(Violation::MaxLengthExceeded {
        max_hours,
        actual_hours,
        effective_hours,
    })
}

/// Loads organization snapshots and evaluates booking windows against them
pub struct BookingWindowService {
    pool: SqlitePool,
}

impl BookingWindowService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch the working hours and booking policy of an organization.
    ///
    /// Organizations that never saved settings get the defaults: working
    /// hours disabled and no buffer or length limit.
    pub async fn load_snapshot(
        &self,
        organization_id: Uuid,
    ) -> Result<(WorkingHoursConfig, BookingPolicy)> {
        let config = WorkingHoursRepository::new(&self.pool)
            .get_config(organization_id)
            .await?;
        let policy = BookingSettingsRepository::new(&self.pool)
            .get(organization_id)
            .await?
            .unwrap_or_default();

        Ok((config, policy))
    }

    /// Validate a raw booking window for an organization
    pub async fn validate(
        &self,
        organization_id: Uuid,
        raw: &RawBookingWindow,
    ) -> Result<ValidationVerdict> {
        let (config, policy) = self.load_snapshot(organization_id).await?;
        let verdict = evaluate_raw(organization_id, raw, Utc::now(), &config, &policy);

        if verdict.valid {
            debug!(
                organization_id = %organization_id,
                start = %raw.requested_start,
                end = %raw.requested_end,
                "Booking window accepted"
            );
        } else {
            info!(
                organization_id = %organization_id,
                start = %raw.requested_start,
                end = %raw.requested_end,
                violations = verdict.violations.len(),
                "Booking window rejected"
            );
        }

        Ok(verdict)
    }
}
