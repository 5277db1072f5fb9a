//! Status reporter
//!
//! Single-slot, last-write-wins feedback channel. Every flow writes exactly
//! one message when it finishes; concurrent flows may overwrite each other's
//! message and that is accepted.

use std::sync::{PoisonError, RwLock};

use bsx_common::{ClientEvent, EventBus, Severity, StatusMessage};

/// Holds the latest status message and announces every overwrite
pub struct StatusReporter {
    slot: RwLock<Option<StatusMessage>>,
    events: EventBus,
}

impl StatusReporter {
    pub fn new(events: EventBus) -> Self {
        Self {
            slot: RwLock::new(None),
            events,
        }
    }

    /// Overwrite the slot and broadcast the new value
    pub fn report(&self, severity: Severity, text: impl Into<String>) -> StatusMessage {
        let message = StatusMessage::new(severity, text);
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(message.clone());
        self.events.emit_lossy(ClientEvent::StatusChanged {
            status: message.clone(),
        });
        message
    }

    pub fn success(&self, text: impl Into<String>) -> StatusMessage {
        self.report(Severity::Success, text)
    }

    pub fn info(&self, text: impl Into<String>) -> StatusMessage {
        self.report(Severity::Info, text)
    }

    pub fn warning(&self, text: impl Into<String>) -> StatusMessage {
        self.report(Severity::Warning, text)
    }

    pub fn error(&self, text: impl Into<String>) -> StatusMessage {
        self.report(Severity::Error, text)
    }

    /// Latest message, if any flow has finished yet
    pub fn latest(&self) -> Option<StatusMessage> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
