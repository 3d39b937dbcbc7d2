//! Contact form endpoint.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_submit_contact_request() {
    let app = TestApp::new().await;
    let token = app.user_token("dave");

    let response = app
        .request(
            "POST",
            "/api/contact",
            Some(json!({
                "name": "  Dave  ",
                "email": "dave@test.com",
                "message": "The upload button does nothing."
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.data()["name"], "Dave");
    assert_eq!(response.data()["status"], "pending");
    assert_eq!(response.data()["userId"], "dave");
}

#[tokio::test]
async fn test_invalid_contact_request_is_rejected() {
    let app = TestApp::new().await;
    let token = app.user_token("dave");

    let bad_email = app
        .request(
            "POST",
            "/api/contact",
            Some(json!({ "name": "Dave", "email": "not-an-email", "message": "hi" })),
            Some(&token),
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);

    let blank = app
        .request(
            "POST",
            "/api/contact",
            Some(json!({ "name": "Dave", "email": "dave@test.com", "message": "   " })),
            Some(&token),
        )
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_contact_requires_authentication() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/contact",
            Some(json!({ "name": "Anon", "email": "a@test.com", "message": "hello" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
