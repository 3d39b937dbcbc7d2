//! Folder tree and file endpoints.

use axum::http::{StatusCode, header};
use serde_json::json;

use studyhub_core::traits::storage::StorageProvider;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_create_nested_folders_and_read_tree() {
    let app = TestApp::new().await;
    let token = app.user_token("alice");

    let math = app.create_folder("Math", None, &token).await;
    let week1 = app.create_folder("Week 1", Some(&math), &token).await;

    let tree = app
        .request("GET", "/api/materials/tree", None, Some(&token))
        .await;
    assert_eq!(tree.status, StatusCode::OK);
    let roots = tree.data().as_array().expect("tree array");
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["name"], "Math");
    assert_eq!(roots[0]["subFolders"][0]["id"], week1.as_str());
    assert_eq!(roots[0]["subFolders"][0]["parentId"], math.as_str());

    let crumbs = app
        .request(
            "GET",
            &format!("/api/materials/folders/{week1}/breadcrumbs"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(crumbs.status, StatusCode::OK);
    let names: Vec<&str> = crumbs
        .data()
        .as_array()
        .expect("breadcrumbs")
        .iter()
        .filter_map(|f| f["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Math", "Week 1"]);
}

#[tokio::test]
async fn test_same_name_folders_get_distinct_ids() {
    let app = TestApp::new().await;
    let token = app.user_token("alice");

    let first = app.create_folder("Physics", None, &token).await;
    let second = app.create_folder("Physics", None, &token).await;

    assert_ne!(first, second);
}

#[tokio::test]
async fn test_create_under_missing_parent_is_not_found() {
    let app = TestApp::new().await;
    let token = app.user_token("alice");

    let response = app
        .request(
            "POST",
            "/api/materials/folders",
            Some(json!({ "name": "Orphan", "parentId": "does-not-exist" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_folder_name_is_rejected() {
    let app = TestApp::new().await;
    let token = app.user_token("alice");

    let response = app
        .request(
            "POST",
            "/api/materials/folders",
            Some(json!({ "name": "" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rename_and_search() {
    let app = TestApp::new().await;
    let token = app.user_token("alice");
    let id = app.create_folder("Chem", None, &token).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/materials/folders/{id}"),
            Some(json!({ "name": "Chemistry", "tags": ["lab"] })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["name"], "Chemistry");

    let hits = app
        .request("GET", "/api/materials/search?q=lab", None, Some(&token))
        .await;
    assert_eq!(hits.status, StatusCode::OK);
    assert_eq!(hits.data()[0]["id"], id.as_str());
}

#[tokio::test]
async fn test_upload_download_and_delete_file() {
    let app = TestApp::new().await;
    let token = app.user_token("alice");
    let folder = app.create_folder("Notes", None, &token).await;

    let uploaded = app
        .upload(&folder, "lecture.pdf", b"%PDF-1.7 notes", &token)
        .await;
    assert_eq!(uploaded.status, StatusCode::CREATED, "{:?}", uploaded.body);
    let file = uploaded.data();
    assert_eq!(file["name"], "lecture.pdf");
    assert_eq!(file["type"], "application/pdf");
    assert_eq!(file["uploadedBy"]["id"], "alice");
    let file_id = file["id"].as_str().expect("file id").to_string();
    let storage_path = file["storagePath"].as_str().expect("path").to_string();
    assert!(
        file["url"]
            .as_str()
            .is_some_and(|u| u.starts_with("https://cdn.test/blobs/"))
    );
    assert!(app.storage.exists(&storage_path).await.expect("exists"));

    let (status, headers, bytes) = app
        .get_raw(
            &format!("/api/materials/folders/{folder}/files/{file_id}"),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(&bytes[..], b"%PDF-1.7 notes");

    let path = format!("/api/materials/folders/{folder}/files/{file_id}");
    let deleted = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.data()["deleted"], true);
    assert!(!app.storage.exists(&storage_path).await.expect("exists"));

    let again = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.data()["deleted"], false);
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = TestApp::new().await;
    let token = app.user_token("alice");
    let folder = app.create_folder("Notes", None, &token).await;

    let missing = app.upload("nope", "a.txt", b"x", &token).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let too_big = app.upload(&folder, "big.bin", &[0u8; 2048], &token).await;
    assert_eq!(too_big.status, StatusCode::BAD_REQUEST);

    let first = app.upload(&folder, "a.txt", b"one", &token).await;
    assert_eq!(first.status, StatusCode::CREATED);
    let clash = app.upload(&folder, "a.txt", b"two", &token).await;
    assert_eq!(clash.status, StatusCode::CONFLICT);

    assert_eq!(app.storage.len(), 1);
}

#[tokio::test]
async fn test_move_file_between_folders() {
    let app = TestApp::new().await;
    let token = app.user_token("alice");
    let src = app.create_folder("Inbox", None, &token).await;
    let dst = app.create_folder("Archive", None, &token).await;

    let uploaded = app.upload(&src, "essay.txt", b"draft", &token).await;
    let file_id = uploaded.data()["id"].as_str().expect("id").to_string();
    let old_path = uploaded.data()["storagePath"]
        .as_str()
        .expect("path")
        .to_string();

    let moved = app
        .request(
            "POST",
            &format!("/api/materials/files/{file_id}/move"),
            Some(json!({ "sourceFolderId": src, "destinationFolderId": dst })),
            Some(&token),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{:?}", moved.body);
    assert_eq!(moved.data()["id"], file_id.as_str());
    assert_eq!(moved.data()["folderId"], dst.as_str());

    let src_folder = app
        .request(
            "GET",
            &format!("/api/materials/folders/{src}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(src_folder.data()["files"], json!([]));

    let dst_folder = app
        .request(
            "GET",
            &format!("/api/materials/folders/{dst}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(dst_folder.data()["files"][0]["name"], "essay.txt");
    assert!(!app.storage.exists(&old_path).await.expect("exists"));
    assert_eq!(app.storage.len(), 1);

    let same = app
        .request(
            "POST",
            &format!("/api/materials/files/{file_id}/move"),
            Some(json!({ "sourceFolderId": dst, "destinationFolderId": dst })),
            Some(&token),
        )
        .await;
    assert_eq!(same.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_folder_cascades_and_is_idempotent() {
    let app = TestApp::new().await;
    let token = app.user_token("alice");
    let root = app.create_folder("Term 1", None, &token).await;
    let child = app.create_folder("Week 1", Some(&root), &token).await;
    app.upload(&child, "slides.pdf", b"slides", &token).await;
    app.upload(&root, "syllabus.txt", b"plan", &token).await;
    assert_eq!(app.storage.len(), 2);

    let path = format!("/api/materials/folders/{root}");
    let response = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["deleted"], true);
    assert_eq!(response.data()["foldersRemoved"], 2);
    assert_eq!(response.data()["filesRemoved"], 2);
    assert!(app.storage.is_empty());

    let again = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.data()["deleted"], false);

    let child_lookup = app
        .request(
            "GET",
            &format!("/api/materials/folders/{child}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(child_lookup.status, StatusCode::NOT_FOUND);
}
