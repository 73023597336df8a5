//! Registry error types.

/// Errors from a contract call.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The gateway returned a non-2xx status other than a revert.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The reply was not the expected JSON shape.
    #[error("failed to deserialize response from {endpoint}: {reason}")]
    Deserialization { endpoint: String, reason: String },
    /// The contract reverted. `reason` is the revert string as reported.
    #[error("{reason}")]
    Reverted { reason: String },
    /// The registry could not be reached or is not in a readable state.
    #[error("registry unavailable: {reason}")]
    Unavailable { reason: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
