//! Booking window validation endpoint tests
//!
//! Every request pins `evaluation_instant` so buffer checks do not depend on
//! the wall clock.

use serde_json::json;
use uuid::Uuid;

use crate::common::{booking, every_day_nine_to_five, office_week, TestApp, MONDAY};

fn validate_uri(id: Uuid) -> String {
    format!("/api/v1/organizations/{}/bookings/validate", id)
}

async fn enable_hours(app: &TestApp, id: Uuid, schedule: serde_json::Value) {
    app.put_json(
        &format!("/api/v1/organizations/{}/working-hours", id),
        json!({ "enabled": true, "weekly_schedule": schedule }),
    )
    .await
    .assert_ok();
}

async fn set_policy(app: &TestApp, id: Uuid, policy: serde_json::Value) {
    app.put_json(
        &format!("/api/v1/organizations/{}/booking-settings", id),
        policy,
    )
    .await
    .assert_ok();
}

#[tokio::test]
async fn test_unknown_organization_is_not_found() {
    let app = TestApp::new().await;
    app.post_json(
        &validate_uri(Uuid::new_v4()),
        booking("2030-01-07T10:00:00Z", "2030-01-07T12:00:00Z"),
    )
    .await
    .assert_not_found();
}

#[tokio::test]
async fn test_unconfigured_organization_accepts_any_window() {
    let app = TestApp::new().await;
    let id = app.create_organization("open-all-hours").await;

    let response = app
        .post_json(
            &validate_uri(id),
            booking("2030-01-05T02:00:00Z", "2030-01-09T23:00:00Z"),
        )
        .await;
    response.assert_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["valid"], true);
    assert!(json["violations"].as_array().unwrap().is_empty());
    assert!(json["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_inverted_range_is_a_verdict_not_an_error() {
    let app = TestApp::new().await;
    let id = app.create_organization("inverted-range").await;
    set_policy(&app, id, json!({ "buffer_start_time": 48 })).await;

    let response = app
        .post_json(
            &validate_uri(id),
            booking("2030-01-07T12:00:00Z", "2030-01-07T10:00:00Z"),
        )
        .await;
    response.assert_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["valid"], false);
    let violations = json["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["type"], "invalid_range");
}

#[tokio::test]
async fn test_unparseable_timestamp_is_invalid_range() {
    let app = TestApp::new().await;
    let id = app.create_organization("garbage-dates").await;

    let json: serde_json::Value = app
        .post_json(&validate_uri(id), booking("next monday", "2030-01-07T10:00:00Z"))
        .await
        .json();

    assert_eq!(json["valid"], false);
    assert_eq!(json["violations"][0]["type"], "invalid_range");
}

#[tokio::test]
async fn test_multi_day_booking_inside_hours() {
    let app = TestApp::new().await;
    let id = app.create_organization("multi-day").await;
    enable_hours(&app, id, every_day_nine_to_five()).await;

    let json: serde_json::Value = app
        .post_json(
            &validate_uri(id),
            booking("2030-01-07T10:00:00Z", "2030-01-08T16:00:00Z"),
        )
        .await
        .json();
    assert_eq!(json["valid"], true);

    let json: serde_json::Value = app
        .post_json(
            &validate_uri(id),
            booking("2030-01-07T08:00:00Z", "2030-01-08T16:00:00Z"),
        )
        .await
        .json();
    assert_eq!(json["valid"], false);
    let violations = json["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["type"], "outside_working_hours");
    assert_eq!(violations[0]["date"], MONDAY);
    assert_eq!(violations[0]["weekday"], "Monday");
    assert_eq!(
        json["messages"][0],
        "Booking must be within working hours on Monday 2030-01-07 (09:00 - 17:00)"
    );
}

#[tokio::test]
async fn test_weekend_booking_is_rejected() {
    let app = TestApp::new().await;
    let id = app.create_organization("weekdays").await;
    enable_hours(&app, id, office_week()).await;

    let json: serde_json::Value = app
        .post_json(
            &validate_uri(id),
            booking("2030-01-05T10:00:00Z", "2030-01-05T12:00:00Z"),
        )
        .await
        .json();

    assert_eq!(json["valid"], false);
    assert_eq!(json["messages"][0], "Organization is closed on Saturday");
}

#[tokio::test]
async fn test_closed_override_blocks_open_weekday() {
    let app = TestApp::new().await;
    let id = app.create_organization("holiday").await;
    enable_hours(&app, id, every_day_nine_to_five()).await;

    app.post_json(
        &format!("/api/v1/organizations/{}/working-hours/overrides", id),
        json!({ "date": MONDAY, "is_open": false, "reason": "Holiday" }),
    )
    .await
    .assert_created();

    let json: serde_json::Value = app
        .post_json(
            &validate_uri(id),
            booking("2030-01-07T10:00:00Z", "2030-01-07T12:00:00Z"),
        )
        .await
        .json();

    assert_eq!(json["valid"], false);
    assert_eq!(json["violations"][0]["type"], "outside_working_hours");
    assert_eq!(
        json["messages"][0],
        "Organization is closed on 2030-01-07 (Holiday)"
    );
}

#[tokio::test]
async fn test_buffer_applies_with_working_hours_disabled() {
    let app = TestApp::new().await;
    let id = app.create_organization("buffered").await;
    set_policy(&app, id, json!({ "buffer_start_time": 4 })).await;

    // Evaluation instant is 2030-01-01T08:00:00Z
    let json: serde_json::Value = app
        .post_json(
            &validate_uri(id),
            booking("2030-01-01T12:00:00Z", "2030-01-01T13:00:00Z"),
        )
        .await
        .json();
    assert_eq!(json["valid"], true);

    let json: serde_json::Value = app
        .post_json(
            &validate_uri(id),
            booking("2030-01-01T11:59:00Z", "2030-01-01T13:00:00Z"),
        )
        .await
        .json();
    assert_eq!(json["valid"], false);
    assert_eq!(json["violations"][0]["type"], "buffer_violation");
    assert_eq!(json["violations"][0]["required_buffer_hours"], 4);
    assert_eq!(
        json["messages"][0],
        "Booking must be made at least 4 hours in advance"
    );
}

#[tokio::test]
async fn test_all_violations_are_reported_together() {
    let app = TestApp::new().await;
    let id = app.create_organization("everything-wrong").await;
    enable_hours(&app, id, office_week()).await;
    set_policy(
        &app,
        id,
        json!({ "buffer_start_time": 48, "max_booking_length": 2 }),
    )
    .await;

    // Tuesday 07:00-18:00, starting before the evaluation instant
    let json: serde_json::Value = app
        .post_json(
            &validate_uri(id),
            booking("2030-01-01T07:00:00Z", "2030-01-01T18:00:00Z"),
        )
        .await
        .json();

    assert_eq!(json["valid"], false);
    let kinds: Vec<&str> = json["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["buffer_violation", "outside_working_hours", "max_length_exceeded"]
    );
    assert_eq!(json["messages"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_skip_closed_days_over_the_api() {
    let app = TestApp::new().await;
    let id = app.create_organization("long-weekend").await;
    // Sunday closed, every other day open around the clock
    let day = json!({ "is_open": true, "open_time": "00:00", "close_time": "23:59" });
    enable_hours(
        &app,
        id,
        json!({
            "0": { "is_open": false },
            "1": day, "2": day, "3": day, "4": day, "5": day, "6": day
        }),
    )
    .await;
    set_policy(
        &app,
        id,
        json!({ "max_booking_length": 24, "max_booking_length_skip_closed_days": true }),
    )
    .await;

    // Saturday 12:00 to Monday 12:00: 48h raw, 24h once Sunday is skipped
    let json: serde_json::Value = app
        .post_json(
            &validate_uri(id),
            booking("2030-01-05T12:00:00Z", "2030-01-07T12:00:00Z"),
        )
        .await
        .json();
    assert_eq!(json["valid"], true, "{}", json);
}
