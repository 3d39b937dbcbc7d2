//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use studyhub_auth::JwtEncoder;
use studyhub_core::config::AppConfig;
use studyhub_core::types::UserId;
use studyhub_database::DatabasePool;
use studyhub_entity::user::UserRole;
use studyhub_storage::providers::memory::MemoryStorageProvider;

const MULTIPART_BOUNDARY: &str = "studyhub-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database handle for direct queries
    pub db: DatabasePool,
    /// Blob storage shared with the router
    pub storage: MemoryStorageProvider,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.storage.provider = "memory".to_string();
        config.storage.public_url_base = "https://cdn.test/blobs".to_string();
        config.storage.max_upload_size_bytes = 1024;
        config.janitor.enabled = false;

        let db = DatabasePool::in_memory()
            .await
            .expect("Failed to open in-memory database");
        let storage = MemoryStorageProvider::new();

        let state = studyhub_api::build_state(config.clone(), &db, Arc::new(storage.clone()));
        let router = studyhub_api::build_app(state);

        Self {
            router,
            db,
            storage,
            config,
        }
    }

    /// Mint a bearer token the router will accept
    pub fn token(&self, user_id: &str, role: UserRole) -> String {
        JwtEncoder::new(&self.config.auth)
            .mint(
                &UserId::new(user_id),
                &format!("{user_id}@test.com"),
                role,
                30,
            )
            .expect("Failed to mint token")
    }

    /// Token for a regular student
    pub fn user_token(&self, user_id: &str) -> String {
        self.token(user_id, UserRole::User)
    }

    /// Token for an administrator
    pub fn admin_token(&self, user_id: &str) -> String {
        self.token(user_id, UserRole::Admin)
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let (status, _, bytes) = self.send(req).await;
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }

    /// Upload one file into a folder as multipart field `file`
    pub async fn upload(
        &self,
        folder_id: &str,
        file_name: &str,
        content: &[u8],
        token: &str,
    ) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri(format!("/api/materials/folders/{folder_id}/files"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body))
            .expect("Failed to build request");

        let (status, _, bytes) = self.send(req).await;
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }

    /// GET a path and return the raw response
    pub async fn get_raw(&self, path: &str, token: &str) -> (StatusCode, HeaderMap, Bytes) {
        let req = Request::builder()
            .method("GET")
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Create a folder and return its id
    pub async fn create_folder(&self, name: &str, parent_id: Option<&str>, token: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/materials/folders",
                Some(serde_json::json!({ "name": name, "parentId": parent_id })),
                Some(token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Folder create failed: {:?}",
            response.body
        );
        response.data()["id"]
            .as_str()
            .expect("No id in folder response")
            .to_string()
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        (status, headers, bytes)
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` code of a failure body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
