//! Backend API client
//!
//! Thin reqwest wrapper over the four backend calls. Knows URLs, headers and
//! body shapes; knows nothing about session state or status messages.

use bsx_common::api::{
    bearer_header_value, CredentialsRequest, LoginResponse, RecommendRequest, RecommendResponse,
    UploadResponse,
};
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::Form;
use reqwest::Response;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};

const USER_AGENT: &str = concat!("BlockShareX/", env!("CARGO_PKG_VERSION"));

/// Decoded success response of `/upload`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Content hash addressing the stored blob
    pub ipfs_hash: String,
    pub tags: Vec<String>,
}

/// HTTP client for the authentication, storage and recommendation services
pub struct BackendClient {
    http_client: reqwest::Client,
    config: ClientConfig,
}

impl BackendClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST `/register`; the success body is ignored
    pub async fn register(&self, credentials: &CredentialsRequest) -> ApiResult<()> {
        let response = self
            .http_client
            .post(self.config.endpoint("/register"))
            .json(credentials)
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    /// POST `/login`, returning the issued session token
    pub async fn login(&self, credentials: &CredentialsRequest) -> ApiResult<String> {
        let response = self
            .http_client
            .post(self.config.endpoint("/login"))
            .json(credentials)
            .send()
            .await?;

        let body: LoginResponse = Self::decode(Self::check_status(response).await?).await?;

        body.token()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Decode("login response has no token".to_string()))
    }

    /// POST `/upload` with a prepared multipart form
    ///
    /// The Content-Type header (with its boundary) is derived from the form
    /// by reqwest and must not be set here.
    pub async fn upload(&self, token: &str, form: Form) -> ApiResult<UploadReceipt> {
        let response = self
            .http_client
            .post(self.config.endpoint("/upload"))
            .header(AUTHORIZATION, bearer_header_value(token))
            .multipart(form)
            .send()
            .await?;

        let body: UploadResponse = Self::decode(Self::check_status(response).await?).await?;

        let ipfs_hash = body
            .ipfs_hash
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ApiError::Decode("upload response has no ipfs_hash".to_string()))?;

        Ok(UploadReceipt {
            ipfs_hash,
            tags: body.tags.unwrap_or_default(),
        })
    }

    /// POST `/recommend`, returning the recommendation label
    pub async fn recommend(&self, token: &str, features: &[f64]) -> ApiResult<String> {
        let request = RecommendRequest {
            features: features.to_vec(),
        };

        let response = self
            .http_client
            .post(self.config.endpoint("/recommend"))
            .header(AUTHORIZATION, bearer_header_value(token))
            .json(&request)
            .send()
            .await?;

        let body: RecommendResponse = Self::decode(Self::check_status(response).await?).await?;

        body.label().ok_or_else(|| {
            ApiError::Decode("recommend response has no recommendation".to_string())
        })
    }

    /// Turn a non-success status into [`ApiError::Status`], keeping the JSON
    /// body when there is one
    async fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).ok();

        tracing::debug!(status = status.as_u16(), body = %text, "Backend returned error status");

        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> ApiResult<T> {
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
