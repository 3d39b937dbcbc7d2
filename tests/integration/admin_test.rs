//! Admin panel endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_regular_user_is_forbidden() {
    let app = TestApp::new().await;
    let token = app.user_token("eve");

    for path in ["/api/admin/users", "/api/admin/stats", "/api/admin/contact"] {
        let response = app.request("GET", path, None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{path}");
    }
}

#[tokio::test]
async fn test_admin_lists_and_updates_users() {
    let app = TestApp::new().await;
    let admin = app.admin_token("root");
    let user = app.user_token("frank");
    // First request creates the profile.
    app.request("GET", "/api/planner", None, Some(&user)).await;

    let users = app
        .request("GET", "/api/admin/users?q=frank", None, Some(&admin))
        .await;
    assert_eq!(users.status, StatusCode::OK);
    assert_eq!(users.data().as_array().map(Vec::len), Some(1));
    assert_eq!(users.data()[0]["email"], "frank@test.com");

    let promoted = app
        .request(
            "PUT",
            "/api/admin/users/frank",
            Some(json!({ "username": "Frank", "role": "admin" })),
            Some(&admin),
        )
        .await;
    assert_eq!(promoted.status, StatusCode::OK, "{:?}", promoted.body);
    assert_eq!(promoted.data()["role"], "admin");
    assert_eq!(promoted.data()["username"], "Frank");

    // The stored role now wins over the token's `user` claim.
    let stats = app
        .request("GET", "/api/admin/stats", None, Some(&user))
        .await;
    assert_eq!(stats.status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_cannot_demote_or_delete_self() {
    let app = TestApp::new().await;
    let admin = app.admin_token("root");

    let demote = app
        .request(
            "PUT",
            "/api/admin/users/root",
            Some(json!({ "role": "user" })),
            Some(&admin),
        )
        .await;
    assert_eq!(demote.status, StatusCode::FORBIDDEN);

    let delete = app
        .request("DELETE", "/api/admin/users/root", None, Some(&admin))
        .await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_deletes_user_and_planner() {
    let app = TestApp::new().await;
    let admin = app.admin_token("root");
    let user = app.user_token("gina");
    app.request(
        "POST",
        "/api/planner/records",
        Some(json!({ "name": "Quiz 1", "date": "2024-02-01" })),
        Some(&user),
    )
    .await;

    let deleted = app
        .request("DELETE", "/api/admin/users/gina", None, Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.data()["deleted"], true);

    let again = app
        .request("DELETE", "/api/admin/users/gina", None, Some(&admin))
        .await;
    assert_eq!(again.data()["deleted"], false);

    // The removed account stays out, whatever role its token claims.
    let comeback = app.request("GET", "/api/planner", None, Some(&user)).await;
    assert_eq!(comeback.status, StatusCode::FORBIDDEN);
    let as_admin = app.admin_token("gina");
    let comeback = app.request("GET", "/api/admin/stats", None, Some(&as_admin)).await;
    assert_eq!(comeback.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_manages_folders() {
    let app = TestApp::new().await;
    let admin = app.admin_token("root");
    let user = app.user_token("hank");
    let root = app.create_folder("Biology", None, &user).await;
    app.create_folder("Cells", Some(&root), &user).await;

    let listed = app
        .request("GET", "/api/admin/folders", None, Some(&admin))
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let paths: Vec<&str> = listed
        .data()
        .as_array()
        .expect("folders")
        .iter()
        .filter_map(|f| f["path"].as_str())
        .collect();
    assert_eq!(paths, vec!["/Biology", "/Biology/Cells"]);

    let renamed = app
        .request(
            "PUT",
            &format!("/api/admin/folders/{root}"),
            Some(json!({ "name": "Bio 101" })),
            Some(&admin),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.data()["name"], "Bio 101");

    let deleted = app
        .request(
            "DELETE",
            &format!("/api/admin/folders/{root}"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.data()["foldersRemoved"], 2);

    let forbidden = app
        .request(
            "DELETE",
            &format!("/api/admin/folders/{root}"),
            None,
            Some(&user),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_stats_and_contact_workflow() {
    let app = TestApp::new().await;
    let admin = app.admin_token("root");
    let user = app.user_token("ivy");

    let submitted = app
        .request(
            "POST",
            "/api/contact",
            Some(json!({ "name": "Ivy", "email": "ivy@test.com", "message": "Dark mode?" })),
            Some(&user),
        )
        .await;
    let request_id = submitted.data()["id"].as_str().expect("id").to_string();

    let stats = app
        .request("GET", "/api/admin/stats", None, Some(&admin))
        .await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.data()["totalUsers"], 2);
    assert_eq!(stats.data()["adminUsers"], 1);
    assert_eq!(stats.data()["pendingContactRequests"], 1);
    assert_eq!(stats.data()["maxUploadSizeBytes"], 1024);

    let pending = app
        .request(
            "GET",
            "/api/admin/contact?status=pending",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(pending.data()[0]["id"], request_id.as_str());

    let resolved = app
        .request(
            "PUT",
            &format!("/api/admin/contact/{request_id}"),
            Some(json!({ "status": "resolved" })),
            Some(&admin),
        )
        .await;
    assert_eq!(resolved.status, StatusCode::OK);
    assert_eq!(resolved.data()["status"], "resolved");

    let still_pending = app
        .request(
            "GET",
            "/api/admin/contact?status=pending",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(still_pending.data(), &json!([]));
}
