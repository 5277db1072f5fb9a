//! API module for the backend wire protocol
//!
//! Request/response bodies and bearer-credential helpers for the four
//! backend calls (register, login, upload, recommend).
//!
//! # Design Principle
//!
//! This module contains ONLY pure functions and shared types. The HTTP
//! client itself lives in `bsx-client`.

pub mod auth;
pub mod types;

pub use auth::{bearer_header_value, BEARER_SCHEME};
pub use types::{
    registration_error_message, CredentialsRequest, LoginResponse, RecommendRequest,
    RecommendResponse, UploadResponse, UPLOAD_FIELD_NAME,
};
