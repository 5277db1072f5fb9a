//! Configuration loading and API base URL resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Compiled default for the backend base address
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Environment variable consulted for the backend base address
pub const API_URL_ENV_VAR: &str = "BSX_API_URL";

/// Default streaming granularity for uploads (bytes per progress step)
pub const DEFAULT_UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Contents of `config.toml`
///
/// Every key is optional; a missing file behaves like an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Backend base address, e.g. `http://localhost:5000`
    pub api_url: Option<String>,

    /// Per-request timeout in seconds (absent = requests may run indefinitely)
    pub request_timeout_secs: Option<u64>,

    /// Upload chunk size in bytes
    pub upload_chunk_size: Option<usize>,

    /// Logging section
    pub logging: LoggingConfig,
}

/// `[logging]` section of `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Platform config file location: `<config_dir>/blocksharex/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("blocksharex").join("config.toml"))
}

/// Load the TOML config file
///
/// An explicitly requested file must exist. The platform default file is
/// optional: when it is absent the defaults are returned.
pub fn load_toml_config(explicit_path: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit_path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                tracing::debug!("No config file found, using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path)?;
    let config = parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse TOML text into a [`TomlConfig`]
pub fn parse_toml_config(content: &str) -> std::result::Result<TomlConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Resolve the backend base address following priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. Compiled default (fallback)
///
/// Blank values at any tier are skipped.
pub fn resolve_api_url(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> String {
    // Priority 1: Command-line argument
    if let Some(url) = cli_arg.filter(|u| !u.trim().is_empty()) {
        return url.trim().to_string();
    }

    // Priority 2: Environment variable
    if let Ok(url) = std::env::var(env_var_name) {
        if !url.trim().is_empty() {
            return url.trim().to_string();
        }
    }

    // Priority 3: TOML config file
    if let Some(url) = toml_config
        .api_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
    {
        return url.trim().to_string();
    }

    // Priority 4: Compiled default
    DEFAULT_API_URL.to_string()
}
