//! Event types for the BlockShareX client
//!
//! Provides the ClientEvent enum and an EventBus the presentation layer
//! subscribes to. Flows emit; nothing in the core depends on a listener.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::status::StatusMessage;

/// Client event types
///
/// Events are broadcast via EventBus. The presentation layer renders them;
/// tests subscribe to observe intermediate progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Status slot overwritten
    StatusChanged {
        status: StatusMessage,
    },

    /// Upload transfer advanced
    ///
    /// Emitted only when the rounded percentage changes.
    UploadProgress {
        /// Name of the file being transferred
        file_name: String,
        /// `round(bytes_sent * 100 / total_bytes)`
        percent: u8,
    },

    /// Session switched between anonymous and authenticated
    SessionChanged {
        authenticated: bool,
    },

    /// Recommendation service returned a label
    RecommendationReceived {
        label: String,
    },
}

/// Broadcast bus for [`ClientEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ClientEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use bsx_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// let _rx = event_bus.subscribe();
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// # Examples
    ///
    /// ```
    /// use bsx_common::events::{ClientEvent, EventBus};
    ///
    /// let event_bus = EventBus::new(10);
    /// event_bus.emit_lossy(ClientEvent::SessionChanged { authenticated: true });
    /// ```
    pub fn emit_lossy(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}
