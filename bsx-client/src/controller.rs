//! Top-level client controller
//!
//! Owns the application state, the backend client and the status reporter,
//! and injects them into each flow. Cloning the controller is cheap; clones
//! share one session, so flows may run concurrently from spawned tasks.
//!
//! State locks are short and never held across an `.await`.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bsx_common::{ClientEvent, EventBus, StatusMessage};
use tokio::sync::broadcast;
use tracing::info;

use crate::api_client::BackendClient;
use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::session::{AppState, PendingFile};
use crate::status::StatusReporter;
use crate::{credentials, recommend, upload};

/// Event channel capacity (progress ticks are the bulk of the traffic)
const EVENT_CAPACITY: usize = 256;

/// Dependencies shared by every flow
pub struct ClientContext {
    pub backend: BackendClient,
    pub status: StatusReporter,
    pub events: EventBus,
    state: RwLock<AppState>,
}

impl ClientContext {
    pub fn new(backend: BackendClient, events: EventBus) -> Self {
        Self {
            backend,
            status: StatusReporter::new(events.clone()),
            events,
            state: RwLock::new(AppState::new()),
        }
    }

    pub fn read_state(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write_state(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Point-in-time view of the client for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    pub authenticated: bool,
    /// Selected file name and size in bytes
    pub pending_file: Option<(String, usize)>,
    pub recommend_input: String,
    pub recommendation: Option<String>,
    pub status: Option<StatusMessage>,
}

/// Entry point for all user intents
#[derive(Clone)]
pub struct ClientController {
    ctx: Arc<ClientContext>,
}

impl ClientController {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let backend = BackendClient::new(config)?;
        let events = EventBus::new(EVENT_CAPACITY);
        let ctx = ClientContext::new(backend, events);

        info!(
            session_id = %ctx.read_state().session_id,
            api_url = ctx.backend.config().api_url(),
            "Client session started"
        );

        Ok(Self { ctx: Arc::new(ctx) })
    }

    /// Subscribe to status, progress and session events
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.ctx.events.subscribe()
    }

    pub async fn register(&self, username: &str, password: &str) -> StatusMessage {
        credentials::register(&self.ctx, username, password).await
    }

    pub async fn login(&self, username: &str, password: &str) -> StatusMessage {
        credentials::login(&self.ctx, username, password).await
    }

    pub fn logout(&self) -> StatusMessage {
        credentials::logout(&self.ctx)
    }

    /// Read `path` into memory and make it the pending file
    ///
    /// Replaces any previous selection. Read errors leave the previous
    /// selection untouched.
    pub async fn select_file(&self, path: &Path) -> bsx_common::Result<PendingFile> {
        let file = PendingFile::from_path(path).await?;
        self.set_pending_file(file.clone());
        Ok(file)
    }

    pub fn set_pending_file(&self, file: PendingFile) {
        info!(file = file.name(), bytes = file.len(), "File selected");
        self.ctx.write_state().pending_file = Some(file);
    }

    pub fn set_recommend_input(&self, text: impl Into<String>) {
        self.ctx.write_state().recommend_input = text.into();
    }

    pub async fn upload(&self) -> StatusMessage {
        upload::upload_pending_file(&self.ctx).await
    }

    pub async fn recommend(&self) -> StatusMessage {
        recommend::request_recommendation(&self.ctx).await
    }

    pub fn is_authenticated(&self) -> bool {
        self.ctx.read_state().session.has_token()
    }

    pub fn latest_status(&self) -> Option<StatusMessage> {
        self.ctx.status.latest()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let state = self.ctx.read_state();
        StateSnapshot {
            authenticated: state.session.has_token(),
            pending_file: state
                .pending_file
                .as_ref()
                .map(|f| (f.name().to_string(), f.len())),
            recommend_input: state.recommend_input.clone(),
            recommendation: state.recommendation.as_ref().map(|r| r.label.clone()),
            status: self.ctx.status.latest(),
        }
    }
}
