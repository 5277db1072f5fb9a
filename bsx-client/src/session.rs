//! Session-scoped client state
//!
//! Everything here lives for one process and is never persisted:
//! the session token, the pending file selection, the recommendation input
//! text and the last recommendation result.

use std::path::Path;

use bsx_common::{Error, Result};
use bytes::Bytes;
use uuid::Uuid;

/// Holder of the authentication token
///
/// Absent token = anonymous, present token = authenticated. The token is
/// never validated locally; the server decides on every request.
#[derive(Default)]
pub struct SessionStore {
    token: Option<String>,
}

impl SessionStore {
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

// Token stays out of logs
impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.has_token())
            .finish()
    }
}

/// File selected for upload, held in memory
///
/// Cloning is cheap; the bytes are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFile {
    name: String,
    bytes: Bytes,
}

impl PendingFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes: Bytes::from(bytes),
        }
    }

    /// Read a file from disk; the file name (without directories) becomes
    /// the upload name
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::InvalidInput(format!("Not a file path: {}", path.display()))
            })?
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the contents; slicing it does not copy
    pub fn contents(&self) -> Bytes {
        self.bytes.clone()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Label returned by the recommendation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationResult {
    pub label: String,
}

/// Application state owned by the controller and injected into every flow
#[derive(Debug)]
pub struct AppState {
    /// Process-unique id for log correlation
    pub session_id: Uuid,
    pub session: SessionStore,
    pub pending_file: Option<PendingFile>,
    /// Raw comma-separated feature text as typed by the user
    pub recommend_input: String,
    pub recommendation: Option<RecommendationResult>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            session: SessionStore::default(),
            pending_file: None,
            recommend_input: String::new(),
            recommendation: None,
        }
    }

    /// Return to the anonymous state
    ///
    /// Clears token, pending file, recommendation input and result in one
    /// step. Callers hold the state write lock for the whole call.
    pub fn reset(&mut self) {
        self.session.clear_token();
        self.pending_file = None;
        self.recommend_input.clear();
        self.recommendation = None;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
