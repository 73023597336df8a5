//! Storage configuration.
//!
//! Base URLs for the pinning API and the retrieval gateway default to the
//! public Pinata endpoints. Override via environment variables or explicit
//! construction for tests.

use std::fmt;
use std::path::PathBuf;

use url::Url;
use zeroize::Zeroizing;

/// Endpoints for the pinning service and retrieval gateway.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Pinning API base. Default: <https://api.pinata.cloud>
    pub api_url: Url,
    /// Retrieval gateway base. Default: <https://gateway.pinata.cloud>
    pub gateway_url: Url,
    /// Optional request timeout. `None` waits for the service to answer.
    pub timeout_secs: Option<u64>,
    /// Snapshot file for the local fallback store. `None` keeps fallback
    /// content in memory only.
    pub local_store_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ACAD_PINATA_API_URL` (default: `https://api.pinata.cloud`)
    /// - `ACAD_IPFS_GATEWAY_URL` (default: `https://gateway.pinata.cloud`)
    /// - `ACAD_STORAGE_TIMEOUT_SECS` (default: unset)
    /// - `ACAD_LOCAL_STORE_PATH` (default: unset)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: env_url("ACAD_PINATA_API_URL", "https://api.pinata.cloud")?,
            gateway_url: env_url("ACAD_IPFS_GATEWAY_URL", "https://gateway.pinata.cloud")?,
            timeout_secs: std::env::var("ACAD_STORAGE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
            local_store_path: std::env::var_os("ACAD_LOCAL_STORE_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        })
    }

    /// Point both API and gateway at one local mock server.
    pub fn local_mock(base: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(base).map_err(|e| ConfigError::InvalidUrl(base.to_string(), e.to_string()))?;
        Ok(Self {
            api_url: url.clone(),
            gateway_url: url,
            timeout_secs: Some(5),
            local_store_path: None,
        })
    }
}

/// API key pair for the pinning service.
///
/// Custom `Debug` redacts the secret so credentials never reach logs.
#[derive(Clone)]
pub struct PinningCredentials {
    pub api_key: String,
    pub secret_key: Zeroizing<String>,
}

impl fmt::Debug for PinningCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinningCredentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl PinningCredentials {
    /// Both halves must be non-empty; otherwise no credentials were supplied.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Option<Self> {
        let api_key = api_key.into();
        let secret_key = Zeroizing::new(secret_key.into());
        if api_key.trim().is_empty() || secret_key.trim().is_empty() {
            return None;
        }
        Some(Self {
            api_key,
            secret_key,
        })
    }

    /// Read `PINATA_API_KEY` and `PINATA_SECRET_KEY`.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("PINATA_API_KEY").ok()?;
        let secret_key = std::env::var("PINATA_SECRET_KEY").ok()?;
        Self::new(api_key, secret_key)
    }
}

pub(crate) fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
