//! Storage backend error types.
//!
//! These never escape [`crate::StoragePublisher`]; they exist so the
//! backend can report precisely what went wrong before the publisher
//! logs and degrades.

/// Errors from a storage backend call.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The reply was not the expected JSON shape.
    #[error("failed to deserialize response from {endpoint}: {reason}")]
    Deserialization { endpoint: String, reason: String },
    /// The reply decoded but carried no usable content hash.
    #[error("{endpoint} returned an unusable content hash: {hash:?}")]
    InvalidHash { endpoint: String, hash: String },
    /// The backend cannot perform network operations.
    #[error("storage backend {backend} is offline")]
    Offline { backend: String },
    /// The local store snapshot could not be read or written.
    #[error("local store snapshot {path}: {reason}")]
    Snapshot { path: String, reason: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
