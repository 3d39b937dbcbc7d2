//! Planner endpoints.

use axum::http::StatusCode;
use chrono::{Days, Utc};
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_new_user_gets_empty_planner() {
    let app = TestApp::new().await;
    let token = app.user_token("bob");

    let response = app.request("GET", "/api/planner", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.data(),
        &json!({ "tasks": [], "assignments": [], "exams": [], "records": [] })
    );
}

#[tokio::test]
async fn test_add_progress_and_delete_task() {
    let app = TestApp::new().await;
    let token = app.user_token("bob");

    let added = app
        .request(
            "POST",
            "/api/planner/tasks",
            Some(json!({ "name": "Read chapter 3", "time": "09:00-10:00" })),
            Some(&token),
        )
        .await;
    assert_eq!(added.status, StatusCode::OK, "{:?}", added.body);
    assert_eq!(added.data()["tasks"][0]["name"], "Read chapter 3");

    let progressed = app
        .request(
            "PUT",
            "/api/planner/tasks/0/progress",
            Some(json!({ "progress": 40 })),
            Some(&token),
        )
        .await;
    assert_eq!(progressed.status, StatusCode::OK);
    assert_eq!(progressed.data()["tasks"][0]["progress"], 40);

    let too_much = app
        .request(
            "PUT",
            "/api/planner/tasks/0/progress",
            Some(json!({ "progress": 101 })),
            Some(&token),
        )
        .await;
    assert_eq!(too_much.status, StatusCode::BAD_REQUEST);

    let deleted = app
        .request("DELETE", "/api/planner/tasks/0", None, Some(&token))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.data()["tasks"], json!([]));

    let out_of_range = app
        .request("DELETE", "/api/planner/tasks/0", None, Some(&token))
        .await;
    assert_eq!(out_of_range.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_section_is_rejected() {
    let app = TestApp::new().await;
    let token = app.user_token("bob");

    let response = app
        .request(
            "POST",
            "/api/planner/chores",
            Some(json!({ "name": "Laundry", "date": "2030-01-01" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_planners_are_per_user() {
    let app = TestApp::new().await;
    let bob = app.user_token("bob");
    let carol = app.user_token("carol");

    app.request(
        "POST",
        "/api/planner/exams",
        Some(json!({ "name": "Algebra final", "date": "2030-06-01" })),
        Some(&bob),
    )
    .await;

    let carols = app.request("GET", "/api/planner", None, Some(&carol)).await;
    assert_eq!(carols.data()["exams"], json!([]));

    let bobs = app.request("GET", "/api/planner", None, Some(&bob)).await;
    assert_eq!(bobs.data()["exams"][0]["name"], "Algebra final");
}

#[tokio::test]
async fn test_dashboard_lists_upcoming_items() {
    let app = TestApp::new().await;
    let token = app.user_token("bob");
    let today = Utc::now().date_naive();
    let soon = today.checked_add_days(Days::new(3)).expect("date");
    let later = today.checked_add_days(Days::new(10)).expect("date");
    let past = today.checked_sub_days(Days::new(5)).expect("date");

    for (section, name, date) in [
        ("exams", "Later exam", later),
        ("exams", "Sooner exam", soon),
        ("exams", "Old exam", past),
        ("assignments", "Essay", soon),
    ] {
        let response = app
            .request(
                "POST",
                &format!("/api/planner/{section}"),
                Some(json!({ "name": name, "date": date.format("%Y-%m-%d").to_string() })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    }

    let dashboard = app
        .request("GET", "/api/planner/dashboard", None, Some(&token))
        .await;
    assert_eq!(dashboard.status, StatusCode::OK);
    let data = dashboard.data();
    assert_eq!(data["exam_count"], 3);
    assert_eq!(data["assignment_count"], 1);
    assert_eq!(data["upcoming_exams"][0]["name"], "Sooner exam");
    assert_eq!(data["upcoming_exams"][0]["days_until"], 3);
    assert_eq!(data["upcoming_exams"].as_array().map(Vec::len), Some(2));
    assert_eq!(data["upcoming_assignments"][0]["name"], "Essay");
}
