//! Client configuration
//!
//! Combines the resolved base URL with the optional TOML settings into a
//! validated [`ClientConfig`].

use std::time::Duration;

use bsx_common::config::{
    resolve_api_url, TomlConfig, API_URL_ENV_VAR, DEFAULT_UPLOAD_CHUNK_SIZE,
};
use bsx_common::{Error, Result};
use reqwest::Url;
use tracing::info;

/// Validated client settings
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base address without trailing slash
    api_url: String,
    /// Per-request timeout (None = wait indefinitely)
    pub request_timeout: Option<Duration>,
    /// Upload streaming granularity in bytes
    pub upload_chunk_size: usize,
}

impl ClientConfig {
    /// Build a config for `api_url` with default settings
    pub fn new(api_url: &str) -> Result<Self> {
        Ok(Self {
            api_url: normalize_api_url(api_url)?,
            request_timeout: None,
            upload_chunk_size: DEFAULT_UPLOAD_CHUNK_SIZE,
        })
    }

    /// Resolve from CLI argument, environment and TOML config
    pub fn resolve(cli_api_url: Option<&str>, toml_config: &TomlConfig) -> Result<Self> {
        let raw = resolve_api_url(cli_api_url, API_URL_ENV_VAR, toml_config);
        let mut config = Self::new(&raw)?;

        config.request_timeout = toml_config.request_timeout_secs.map(Duration::from_secs);

        if let Some(chunk) = toml_config.upload_chunk_size {
            if chunk == 0 {
                return Err(Error::Config(
                    "upload_chunk_size must be greater than zero".to_string(),
                ));
            }
            config.upload_chunk_size = chunk;
        }

        info!(api_url = %config.api_url, "Client configuration resolved");
        Ok(config)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Absolute URL of a backend endpoint, e.g. `endpoint("/login")`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

/// Validate a base URL and strip trailing slashes
///
/// Only `http` and `https` are accepted.
pub fn normalize_api_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| Error::Config(format!("Invalid API URL '{}': {}", trimmed, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "API URL must use http or https: {}",
            trimmed
        )));
    }
    if url.host_str().is_none() {
        return Err(Error::Config(format!("API URL has no host: {}", trimmed)));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
