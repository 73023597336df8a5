//! Wallet bridge configuration.
//!
//! The JSON-RPC bridge is optional: when `ACAD_WALLET_RPC_URL` is unset
//! there is no wallet provider in the environment at all.

use url::Url;

/// Endpoint of an EIP-1193 JSON-RPC wallet bridge.
#[derive(Debug, Clone)]
pub struct WalletBridgeConfig {
    pub rpc_url: Url,
    /// Optional request timeout. `None` waits for the wallet to answer,
    /// which may include a human approving a prompt.
    pub timeout_secs: Option<u64>,
}

impl WalletBridgeConfig {
    /// Load from the environment.
    ///
    /// Variables:
    /// - `ACAD_WALLET_RPC_URL` (unset: no provider)
    /// - `ACAD_WALLET_TIMEOUT_SECS` (default: unset)
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(raw) = std::env::var("ACAD_WALLET_RPC_URL") else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let rpc_url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidUrl("ACAD_WALLET_RPC_URL".to_string(), e.to_string()))?;
        Ok(Some(Self {
            rpc_url,
            timeout_secs: std::env::var("ACAD_WALLET_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
        }))
    }

    pub fn new(rpc_url: &str) -> Result<Self, ConfigError> {
        let rpc_url = Url::parse(rpc_url)
            .map_err(|e| ConfigError::InvalidUrl(rpc_url.to_string(), e.to_string()))?;
        Ok(Self {
            rpc_url,
            timeout_secs: None,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
