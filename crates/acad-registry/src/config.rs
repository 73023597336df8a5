//! Registry configuration.

use std::time::Duration;

use acad_core::Address;
use url::Url;

/// Contract gateway endpoint and the two contract addresses.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Contract gateway base URL. Default: `http://localhost:8545`
    pub gateway_url: Url,
    /// Credential NFT contract (authorization list, mint).
    pub credential_nft: Address,
    /// Verification contract (lookup, ownership).
    pub verification_contract: Address,
    /// Interval between receipt polls while awaiting finalization.
    pub receipt_poll: Duration,
    /// Optional request timeout. `None` waits for the gateway to answer.
    pub timeout_secs: Option<u64>,
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ACAD_REGISTRY_URL` (default: `http://localhost:8545`)
    /// - `ACAD_CREDENTIAL_NFT_ADDRESS` (default: zero address)
    /// - `ACAD_VERIFICATION_CONTRACT_ADDRESS` (default: zero address)
    /// - `ACAD_RECEIPT_POLL_MS` (default: 1000)
    /// - `ACAD_REGISTRY_TIMEOUT_SECS` (default: unset)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            gateway_url: env_url("ACAD_REGISTRY_URL", "http://localhost:8545")?,
            credential_nft: env_address("ACAD_CREDENTIAL_NFT_ADDRESS")?,
            verification_contract: env_address("ACAD_VERIFICATION_CONTRACT_ADDRESS")?,
            receipt_poll: Duration::from_millis(
                std::env::var("ACAD_RECEIPT_POLL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1000),
            ),
            timeout_secs: std::env::var("ACAD_REGISTRY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
        })
    }

    /// Point the gateway at a local mock server with fast receipt polling.
    pub fn local_mock(base: &str, credential_nft: Address, verification_contract: Address) -> Result<Self, ConfigError> {
        let gateway_url =
            Url::parse(base).map_err(|e| ConfigError::InvalidUrl(base.to_string(), e.to_string()))?;
        Ok(Self {
            gateway_url,
            credential_nft,
            verification_contract,
            receipt_poll: Duration::from_millis(10),
            timeout_secs: Some(5),
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_address(var: &str) -> Result<Address, ConfigError> {
    match std::env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => {
            Address::parse(&raw).map_err(|e| ConfigError::InvalidAddress(var.to_string(), e.to_string()))
        }
        _ => Ok(Address::zero()),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid contract address for {0}: {1}")]
    InvalidAddress(String, String),
}
