//! # BlockShareX Client
//!
//! Session-scoped client for the BlockShareX backend: authenticate, upload
//! one file at a time to content-addressed storage, and request a
//! recommendation for a numeric feature vector.
//!
//! All state lives for one process. The [`controller::ClientController`]
//! owns it and hands it to the flows:
//! - [`credentials`] - register / login / logout
//! - [`upload`] - progress-tracked multipart upload
//! - [`recommend`] - feature parsing and recommendation request
//!
//! Every flow ends by writing one message to the [`status::StatusReporter`].

pub mod api_client;
pub mod config;
pub mod controller;
pub mod credentials;
pub mod error;
pub mod messages;
pub mod recommend;
pub mod session;
pub mod shell;
pub mod status;
pub mod upload;

pub use config::ClientConfig;
pub use controller::{ClientController, StateSnapshot};
pub use error::{ApiError, ApiResult};
