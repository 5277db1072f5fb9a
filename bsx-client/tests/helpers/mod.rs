//! Shared helpers for bsx-client integration tests

#![allow(dead_code)]

pub mod mock_backend;

use bsx_client::{ClientConfig, ClientController};

pub use mock_backend::MockBackend;

/// Controller talking to `backend`, streaming uploads in 16-byte chunks
pub fn controller_for(backend: &MockBackend) -> ClientController {
    let mut config = ClientConfig::new(&backend.url).unwrap();
    config.upload_chunk_size = 16;
    ClientController::new(config).unwrap()
}

/// Base URL on which nothing is listening
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Log in against `backend` with its default token response
pub async fn logged_in_controller(backend: &MockBackend) -> ClientController {
    let controller = controller_for(backend);
    let status = controller.login("alice", "wonderland").await;
    assert!(!status.is_failure(), "login failed: {:?}", status);
    controller
}
