//! In-process mock of the BlockShareX backend
//!
//! Serves `/register`, `/login`, `/upload` and `/recommend` on an ephemeral
//! localhost port, records every request it receives, and answers with
//! per-route canned responses that tests can override.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode, Uri},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

pub const DEFAULT_TOKEN: &str = "test-token-123";
pub const DEFAULT_HASH: &str = "Qm123";

/// One uploaded multipart field
#[derive(Debug, Clone)]
pub struct UploadedPart {
    pub field_name: Option<String>,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Everything the mock saw for one request
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub json: Option<Value>,
    pub parts: Vec<UploadedPart>,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responses: Arc<Mutex<HashMap<String, (StatusCode, Value)>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
}

impl MockState {
    /// Hold the reply for `path` if a delay is configured; the request is
    /// already recorded by then
    async fn hold(&self, path: &str) {
        let delay = self.delays.lock().unwrap().get(path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn response_for(&self, path: &str) -> (StatusCode, Json<Value>) {
        let responses = self.responses.lock().unwrap();
        let (status, body) = responses
            .get(path)
            .cloned()
            .unwrap_or_else(|| default_response(path));
        (status, Json(body))
    }
}

fn default_response(path: &str) -> (StatusCode, Value) {
    match path {
        "/register" => (
            StatusCode::OK,
            json!({"message": "User registered successfully"}),
        ),
        "/login" => (StatusCode::OK, json!({"token": DEFAULT_TOKEN})),
        "/upload" => (
            StatusCode::OK,
            json!({"ipfs_hash": DEFAULT_HASH, "tags": ["example-tag1", "example-tag2"]}),
        ),
        "/recommend" => (StatusCode::OK, json!({"recommendation": 1})),
        _ => (StatusCode::NOT_FOUND, json!({"error": "not found"})),
    }
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn json_endpoint(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        path: path.clone(),
        authorization: header_string(&headers, header::AUTHORIZATION),
        content_type: header_string(&headers, header::CONTENT_TYPE),
        json: serde_json::from_slice(&body).ok(),
        parts: Vec::new(),
    });
    state.hold(&path).await;
    state.response_for(&path)
}

async fn upload_endpoint(
    State(state): State<MockState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        parts.push(UploadedPart {
            field_name,
            file_name,
            bytes,
        });
    }

    state.requests.lock().unwrap().push(RecordedRequest {
        path: "/upload".to_string(),
        authorization: header_string(&headers, header::AUTHORIZATION),
        content_type: header_string(&headers, header::CONTENT_TYPE),
        json: None,
        parts,
    });
    state.hold("/upload").await;
    state.response_for("/upload")
}

/// Running mock server
pub struct MockBackend {
    pub url: String,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Bind an ephemeral port and start serving
    pub async fn start() -> Self {
        let state = MockState::default();

        let router = Router::new()
            .route("/register", post(json_endpoint))
            .route("/login", post(json_endpoint))
            .route("/recommend", post(json_endpoint))
            .route("/upload", post(upload_endpoint))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    /// Override the canned response for `path`
    pub fn respond(&self, path: &str, status: StatusCode, body: Value) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body));
    }

    /// Delay every reply on `path` by `delay`
    pub fn delay(&self, path: &str, delay: Duration) {
        self.state
            .delays
            .lock()
            .unwrap()
            .insert(path.to_string(), delay);
    }

    /// Wait until at least `count` requests to `path` have arrived
    pub async fn wait_for_requests(&self, path: &str, count: usize) {
        for _ in 0..200 {
            if self.requests_to(path).len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for {} request(s) to {}", count, path);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
