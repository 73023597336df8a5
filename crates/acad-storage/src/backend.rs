//! # Storage Backend Interface
//!
//! The publisher depends only on this trait. Production wires in
//! [`crate::PinataBackend`]; tests substitute recording or failing fakes;
//! [`OfflineBackend`] serves deployments with no network storage at all.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PinningCredentials;
use crate::error::StorageError;

/// A binary attachment such as a transcript PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Content as held by the store or returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum StoredContent {
    Json(Value),
    File(Attachment),
}

impl StoredContent {
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::File(_) => None,
        }
    }
}

/// Remote content-addressed storage service.
///
/// Implementations must be `Send + Sync` so one backend can be shared by
/// concurrent issuance and verification flows behind an `Arc`.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Pin a JSON document under a human-readable name; returns its content hash.
    async fn pin_json(
        &self,
        content: &Value,
        name: &str,
        auth: &PinningCredentials,
    ) -> Result<String, StorageError>;

    /// Pin a binary file; returns its content hash.
    async fn pin_file(
        &self,
        file: &Attachment,
        auth: &PinningCredentials,
    ) -> Result<String, StorageError>;

    /// Fetch content by hash. `Ok(None)` means the service answered that
    /// nothing is stored under the hash.
    async fn fetch(&self, content_hash: &str) -> Result<Option<StoredContent>, StorageError>;

    /// Human-readable backend name for logs.
    fn backend_name(&self) -> &str;
}

/// Backend with no network reach. Pins fail (forcing the local path) and
/// fetches find nothing.
#[derive(Debug, Clone, Default)]
pub struct OfflineBackend;

#[async_trait]
impl StorageBackend for OfflineBackend {
    async fn pin_json(
        &self,
        _content: &Value,
        _name: &str,
        _auth: &PinningCredentials,
    ) -> Result<String, StorageError> {
        Err(StorageError::Offline {
            backend: self.backend_name().to_string(),
        })
    }

    async fn pin_file(
        &self,
        _file: &Attachment,
        _auth: &PinningCredentials,
    ) -> Result<String, StorageError> {
        Err(StorageError::Offline {
            backend: self.backend_name().to_string(),
        })
    }

    async fn fetch(&self, _content_hash: &str) -> Result<Option<StoredContent>, StorageError> {
        Ok(None)
    }

    fn backend_name(&self) -> &str {
        "OfflineBackend"
    }
}
