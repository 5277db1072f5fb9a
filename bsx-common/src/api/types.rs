//! Request/response bodies for the backend services
//!
//! | Call      | Body                    | Success fields used        |
//! |-----------|-------------------------|----------------------------|
//! | register  | `{username, password}`  | none                       |
//! | login     | `{username, password}`  | `token`                    |
//! | upload    | multipart `file`        | `ipfs_hash`, `tags`        |
//! | recommend | `{features}`            | `recommendation`           |

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Multipart field name the storage service reads the file from
pub const UPLOAD_FIELD_NAME: &str = "file";

// ========================================
// Request Types
// ========================================

/// Body of `/register` and `/login`
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

impl CredentialsRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Password stays out of logs
impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `/recommend`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub features: Vec<f64>,
}

// ========================================
// Response Types
// ========================================

/// Success body of `/login`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: Option<String>,
}

impl LoginResponse {
    /// Issued token, if the body carried a non-empty one
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Success body of `/upload`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UploadResponse {
    /// Content hash of the stored blob
    pub ipfs_hash: Option<String>,
    /// Tags the storage service attached to the file
    ///
    /// Informational only: non-string entries are skipped and a field of
    /// any other shape reads as absent, so it can never fail the upload.
    #[serde(default, deserialize_with = "string_entries")]
    pub tags: Option<Vec<String>>,
}

fn string_entries<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(tag) => Some(tag),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

/// Success body of `/recommend`
///
/// The service returns either a string label or a numeric class index.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecommendResponse {
    pub recommendation: Option<Value>,
}

impl RecommendResponse {
    /// Recommendation rendered as a display label
    ///
    /// # Examples
    ///
    /// ```
    /// use bsx_common::api::types::RecommendResponse;
    ///
    /// let resp: RecommendResponse = serde_json::from_str(r#"{"recommendation": 2}"#).unwrap();
    /// assert_eq!(resp.label().as_deref(), Some("2"));
    /// ```
    pub fn label(&self) -> Option<String> {
        match self.recommendation.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

// ========================================
// Error Bodies
// ========================================

/// Pick the message to show for a failed registration
///
/// Precedence, most specific first:
/// 1. `error[0].msg` (field-level validation error)
/// 2. top-level `message`
///
/// Empty strings count as absent. `None` means the caller falls back to its
/// generic text. An `error` that is a plain string (e.g. a rate-limit notice)
/// is not a field error and is skipped.
///
/// # Examples
///
/// ```
/// use bsx_common::api::types::registration_error_message;
/// use serde_json::json;
///
/// let body = json!({"error": [{"msg": "username taken"}], "message": "Bad request"});
/// assert_eq!(registration_error_message(&body).as_deref(), Some("username taken"));
///
/// let body = json!({"message": "User already exists"});
/// assert_eq!(registration_error_message(&body).as_deref(), Some("User already exists"));
/// ```
pub fn registration_error_message(body: &Value) -> Option<String> {
    field_error_message(body).or_else(|| general_error_message(body))
}

fn field_error_message(body: &Value) -> Option<String> {
    body.get("error")?
        .as_array()?
        .first()?
        .get("msg")?
        .as_str()
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn general_error_message(body: &Value) -> Option<String> {
    body.get("message")?
        .as_str()
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

// ========================================
// Tests
// ========================================
