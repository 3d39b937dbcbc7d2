//! Bearer token handling.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["database"], true);
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/materials/tree", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/planner", None, Some("not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unauthenticated_write_leaves_no_trace() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/materials/folders",
            Some(serde_json::json!({ "name": "Math" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let token = app.user_token("alice");
    let tree = app
        .request("GET", "/api/materials/tree", None, Some(&token))
        .await;
    assert_eq!(tree.status, StatusCode::OK);
    assert_eq!(tree.data(), &serde_json::json!([]));
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = TestApp::new().await;
    let mut other = app.config.auth.clone();
    other.jwt_secret = "some-other-secret".to_string();
    let token = studyhub_auth::JwtEncoder::new(&other)
        .mint(
            &studyhub_core::types::UserId::new("mallory"),
            "mallory@test.com",
            studyhub_entity::user::UserRole::Admin,
            30,
        )
        .expect("mint");

    let response = app
        .request("GET", "/api/admin/stats", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_first_request_creates_profile() {
    let app = TestApp::new().await;
    let token = app.user_token("zoe");

    let response = app.request("GET", "/api/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["id"], "zoe");
    assert_eq!(response.data()["email"], "zoe@test.com");
    assert_eq!(response.data()["role"], "user");
}
