//! Status message types
//!
//! A status message is the single user-facing feedback value. Each terminal
//! action of a flow produces exactly one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Operation completed
    Success,
    /// Neutral notice (e.g. logged out)
    Info,
    /// Local validation failure or missing login; no request was sent
    Warning,
    /// Transport or server failure
    Error,
}

impl Severity {
    /// Warnings and errors are both rendered as failures
    pub fn is_failure(self) -> bool {
        matches!(self, Severity::Warning | Severity::Error)
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// User-facing status message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// Message text shown to the user
    pub text: String,
    /// Message severity
    pub severity: Severity,
    /// When the message was written
    pub timestamp: DateTime<Utc>,
}

impl StatusMessage {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity,
            timestamp: Utc::now(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.severity.is_failure()
    }
}
