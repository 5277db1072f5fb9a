//! # BlockShareX Common Library
//!
//! Shared code for the BlockShareX client crates:
//! - Wire types for the authentication, storage and recommendation services
//! - Status and event types (ClientEvent enum, EventBus)
//! - Configuration loading
//! - Error types

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod status;

pub use error::{Error, Result};
pub use events::{ClientEvent, EventBus};
pub use status::{Severity, StatusMessage};
