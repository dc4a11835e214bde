//! Working hours API integration tests

use serde_json::json;
use uuid::Uuid;

use crate::common::{office_week, TestApp, MONDAY, SATURDAY};

fn working_hours_uri(id: Uuid) -> String {
    format!("/api/v1/organizations/{}/working-hours", id)
}

#[tokio::test]
async fn test_new_organization_gets_default_working_hours() {
    let app = TestApp::new().await;
    let id = app.create_organization("defaults").await;

    let response = app.get(&working_hours_uri(id)).await;
    response.assert_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["enabled"], false);
    assert_eq!(json["weekly_schedule"]["1"]["is_open"], true);
    assert_eq!(json["weekly_schedule"]["1"]["open_time"], "09:00");
    assert_eq!(json["weekly_schedule"]["0"]["is_open"], false);
    assert!(json["overrides"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_working_hours_for_unknown_organization() {
    let app = TestApp::new().await;
    app.get(&working_hours_uri(Uuid::new_v4()))
        .await
        .assert_not_found();
}

#[tokio::test]
async fn test_update_working_hours() {
    let app = TestApp::new().await;
    let id = app.create_organization("update").await;

    let response = app
        .put_json(
            &working_hours_uri(id),
            json!({ "enabled": true, "weekly_schedule": office_week() }),
        )
        .await;
    response.assert_ok();

    let json: serde_json::Value = app.get(&working_hours_uri(id)).await.json();
    assert_eq!(json["enabled"], true);
    assert_eq!(json["weekly_schedule"]["6"]["is_open"], false);
    assert_eq!(json["weekly_schedule"]["5"]["close_time"], "17:00");
}

#[tokio::test]
async fn test_update_enabled_only_keeps_schedule() {
    let app = TestApp::new().await;
    let id = app.create_organization("toggle").await;

    let mut schedule = office_week();
    schedule["3"] = json!({ "is_open": true, "open_time": "07:30", "close_time": "12:00" });
    app.put_json(
        &working_hours_uri(id),
        json!({ "enabled": true, "weekly_schedule": schedule }),
    )
    .await
    .assert_ok();

    app.put_json(&working_hours_uri(id), json!({ "enabled": false }))
        .await
        .assert_ok();

    let json: serde_json::Value = app.get(&working_hours_uri(id)).await.json();
    assert_eq!(json["enabled"], false);
    assert_eq!(json["weekly_schedule"]["3"]["open_time"], "07:30");
}

#[tokio::test]
async fn test_update_rejects_inverted_window() {
    let app = TestApp::new().await;
    let id = app.create_organization("inverted").await;

    let mut schedule = office_week();
    schedule["2"] = json!({ "is_open": true, "open_time": "17:00", "close_time": "09:00" });

    let response = app
        .put_json(
            &working_hours_uri(id),
            json!({ "enabled": true, "weekly_schedule": schedule }),
        )
        .await;
    response.assert_unprocessable();

    let json: serde_json::Value = response.json();
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_update_rejects_open_day_without_times() {
    let app = TestApp::new().await;
    let id = app.create_organization("missing-times").await;

    app.put_json(
        &working_hours_uri(id),
        json!({ "enabled": true, "weekly_schedule": { "1": { "is_open": true } } }),
    )
    .await
    .assert_unprocessable();
}

#[tokio::test]
async fn test_update_rejects_unknown_day() {
    let app = TestApp::new().await;
    let id = app.create_organization("unknown-day").await;

    app.put_json(
        &working_hours_uri(id),
        json!({ "enabled": true, "weekly_schedule": { "7": { "is_open": false } } }),
    )
    .await
    .assert_unprocessable();
}

#[tokio::test]
async fn test_create_and_delete_override() {
    let app = TestApp::new().await;
    let id = app.create_organization("holidays").await;
    let uri = format!("{}/overrides", working_hours_uri(id));

    let response = app
        .post_json(
            &uri,
            json!({ "date": MONDAY, "is_open": false, "reason": "Holiday" }),
        )
        .await;
    response.assert_created();

    let created: serde_json::Value = response.json();
    assert_eq!(created["date"], MONDAY);
    assert_eq!(created["reason"], "Holiday");
    let override_id = created["id"].as_str().unwrap().to_string();

    let config: serde_json::Value = app.get(&working_hours_uri(id)).await.json();
    assert_eq!(config["overrides"].as_array().unwrap().len(), 1);

    app.delete(&format!("{}/{}", uri, override_id))
        .await
        .assert_no_content();
    app.delete(&format!("{}/{}", uri, override_id))
        .await
        .assert_not_found();
}

#[tokio::test]
async fn test_overrides_are_listed_by_date() {
    let app = TestApp::new().await;
    let id = app.create_organization("ordering").await;
    let uri = format!("{}/overrides", working_hours_uri(id));

    for date in [MONDAY, SATURDAY] {
        app.post_json(&uri, json!({ "date": date, "is_open": false }))
            .await
            .assert_created();
    }

    let config: serde_json::Value = app.get(&working_hours_uri(id)).await.json();
    let dates: Vec<&str> = config["overrides"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec![SATURDAY, MONDAY]);
}

#[tokio::test]
async fn test_duplicate_override_conflicts() {
    let app = TestApp::new().await;
    let id = app.create_organization("duplicates").await;
    let uri = format!("{}/overrides", working_hours_uri(id));

    app.post_json(&uri, json!({ "date": MONDAY, "is_open": false }))
        .await
        .assert_created();

    let response = app
        .post_json(
            &uri,
            json!({ "date": MONDAY, "is_open": true, "open_time": "10:00", "close_time": "12:00" }),
        )
        .await;
    response.assert_conflict();
}

#[tokio::test]
async fn test_same_date_overrides_in_different_organizations() {
    let app = TestApp::new().await;
    let first = app.create_organization("first").await;
    let second = app.create_organization("second").await;

    for id in [first, second] {
        app.post_json(
            &format!("{}/overrides", working_hours_uri(id)),
            json!({ "date": MONDAY, "is_open": false }),
        )
        .await
        .assert_created();
    }
}

#[tokio::test]
async fn test_override_in_the_past_is_rejected() {
    let app = TestApp::new().await;
    let id = app.create_organization("past").await;

    app.post_json(
        &format!("{}/overrides", working_hours_uri(id)),
        json!({ "date": "2020-01-01", "is_open": false }),
    )
    .await
    .assert_bad_request();
}

#[tokio::test]
async fn test_open_override_requires_valid_times() {
    let app = TestApp::new().await;
    let id = app.create_organization("open-override").await;
    let uri = format!("{}/overrides", working_hours_uri(id));

    app.post_json(&uri, json!({ "date": MONDAY, "is_open": true }))
        .await
        .assert_unprocessable();

    app.post_json(
        &uri,
        json!({ "date": MONDAY, "is_open": true, "open_time": "25:00", "close_time": "26:00" }),
    )
    .await
    .assert_unprocessable();

    app.post_json(
        &uri,
        json!({ "date": MONDAY, "is_open": true, "open_time": "14:00", "close_time": "10:00" }),
    )
    .await
    .assert_unprocessable();
}

#[tokio::test]
async fn test_day_preview_uses_weekly_schedule() {
    let app = TestApp::new().await;
    let id = app.create_organization("preview").await;

    app.put_json(
        &working_hours_uri(id),
        json!({ "enabled": true, "weekly_schedule": office_week() }),
    )
    .await
    .assert_ok();

    let monday: serde_json::Value = app
        .get(&format!("{}/days/{}", working_hours_uri(id), MONDAY))
        .await
        .json();
    assert_eq!(monday["enabled"], true);
    assert_eq!(monday["weekday"], "Monday");
    assert_eq!(monday["status"], "open");
    assert_eq!(monday["open"], "09:00");
    assert_eq!(monday["close"], "17:00");
    assert_eq!(monday["source"], "weekly");

    let saturday: serde_json::Value = app
        .get(&format!("{}/days/{}", working_hours_uri(id), SATURDAY))
        .await
        .json();
    assert_eq!(saturday["status"], "closed");
}

#[tokio::test]
async fn test_day_preview_prefers_override() {
    let app = TestApp::new().await;
    let id = app.create_organization("preview-override").await;

    app.post_json(
        &format!("{}/overrides", working_hours_uri(id)),
        json!({
            "date": SATURDAY,
            "is_open": true,
            "open_time": "10:00",
            "close_time": "14:00",
            "reason": "Open house"
        }),
    )
    .await
    .assert_created();

    let saturday: serde_json::Value = app
        .get(&format!("{}/days/{}", working_hours_uri(id), SATURDAY))
        .await
        .json();
    assert_eq!(saturday["status"], "open");
    assert_eq!(saturday["open"], "10:00");
    assert_eq!(saturday["source"], "override");
    assert_eq!(saturday["reason"], "Open house");
}

#[tokio::test]
async fn test_day_preview_rejects_bad_date() {
    let app = TestApp::new().await;
    let id = app.create_organization("bad-date").await;

    app.get(&format!("{}/days/05-01-2030", working_hours_uri(id)))
        .await
        .assert_bad_request();
}
