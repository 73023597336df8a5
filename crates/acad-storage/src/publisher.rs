//! # Storage Publisher
//!
//! Two-path publish/resolve protocol over a [`StorageBackend`] and a
//! [`LocalStore`].
//!
//! ```text
//! publish ─┬─ credentials? ── yes ──▶ backend.pin_* ── Ok ──▶ Remote(ref)
//!          │                                 │
//!          │                                 └─ Err ──┐
//!          └─────────────── no ──────────────────────┴─▶ LocalStore ──▶ Local(ref)
//!
//! resolve ──▶ LocalStore hit? ── yes ──▶ content
//!                     └─ no ──▶ backend.fetch ── Ok(Some) ──▶ content
//!                                      └─ Ok(None) | Err ──▶ None
//! ```
//!
//! Neither path surfaces an error. Backend failures are logged at `warn`.

use std::sync::Arc;

use acad_core::PublishedReference;
use serde_json::Value;

use crate::backend::{Attachment, OfflineBackend, StorageBackend, StoredContent};
use crate::config::PinningCredentials;
use crate::local::{HashKind, LocalStore};

/// Where a published item ended up. Both variants expose the same
/// reference shape, so callers collapse it with [`Publication::into_reference`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Publication {
    /// Pinned on the remote service.
    Remote(PublishedReference),
    /// Kept in the in-process fallback store.
    Local(PublishedReference),
}

impl Publication {
    pub fn reference(&self) -> &PublishedReference {
        match self {
            Self::Remote(r) | Self::Local(r) => r,
        }
    }

    pub fn into_reference(self) -> PublishedReference {
        match self {
            Self::Remote(r) | Self::Local(r) => r,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

/// Publishes and resolves content-addressed items.
///
/// Cheaply cloneable; clones share the backend and the local store.
#[derive(Clone)]
pub struct StoragePublisher {
    backend: Arc<dyn StorageBackend>,
    local: Arc<LocalStore>,
}

impl std::fmt::Debug for StoragePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoragePublisher")
            .field("backend", &self.backend.backend_name())
            .field("local_entries", &self.local.len())
            .finish()
    }
}

impl StoragePublisher {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_local_store(backend, LocalStore::new())
    }

    /// Publisher falling back to `local`, e.g. a store opened from a
    /// snapshot file.
    pub fn with_local_store(backend: Arc<dyn StorageBackend>, local: LocalStore) -> Self {
        Self {
            backend,
            local: Arc::new(local),
        }
    }

    /// Publisher with no network storage: everything goes to the local store.
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineBackend))
    }

    pub fn local_store(&self) -> &LocalStore {
        &self.local
    }

    /// Publish a JSON document. `pin_name` labels the remote pin.
    pub async fn publish_json(
        &self,
        content: &Value,
        pin_name: &str,
        credentials: Option<&PinningCredentials>,
    ) -> Publication {
        if let Some(auth) = credentials {
            match self.backend.pin_json(content, pin_name, auth).await {
                Ok(hash) => match PublishedReference::from_hash(&hash) {
                    Ok(reference) => {
                        tracing::info!(%reference, backend = self.backend.backend_name(), "pinned JSON");
                        return Publication::Remote(reference);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "pinning service returned unusable hash, falling back to local store");
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "JSON pin failed, falling back to local store");
                }
            }
        }
        let reference = self.store_locally(HashKind::Metadata, StoredContent::Json(content.clone()));
        tracing::info!(%reference, "published JSON to local store");
        Publication::Local(reference)
    }

    /// Publish a binary attachment.
    pub async fn publish_file(
        &self,
        file: &Attachment,
        credentials: Option<&PinningCredentials>,
    ) -> Publication {
        if let Some(auth) = credentials {
            match self.backend.pin_file(file, auth).await {
                Ok(hash) => match PublishedReference::from_hash(&hash) {
                    Ok(reference) => {
                        tracing::info!(%reference, file_name = %file.file_name, "pinned file");
                        return Publication::Remote(reference);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "pinning service returned unusable hash, falling back to local store");
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, file_name = %file.file_name, "file pin failed, falling back to local store");
                }
            }
        }
        let reference = self.store_locally(HashKind::File, StoredContent::File(file.clone()));
        tracing::info!(%reference, file_name = %file.file_name, "published file to local store");
        Publication::Local(reference)
    }

    /// Resolve a reference. `None` means temporarily or permanently
    /// unavailable; it is never an error.
    pub async fn resolve(&self, reference: &PublishedReference) -> Option<StoredContent> {
        let hash = reference.content_hash();
        if let Some(content) = self.local.get(hash) {
            tracing::debug!(%reference, "resolved from local store");
            return Some(content);
        }
        match self.backend.fetch(hash).await {
            Ok(Some(content)) => {
                tracing::debug!(%reference, backend = self.backend.backend_name(), "resolved from backend");
                Some(content)
            }
            Ok(None) => {
                tracing::warn!(%reference, "reference not found");
                None
            }
            Err(e) => {
                tracing::warn!(%reference, error = %e, "failed to fetch reference");
                None
            }
        }
    }

    /// Resolve a reference expected to hold JSON.
    pub async fn resolve_json(&self, reference: &PublishedReference) -> Option<Value> {
        self.resolve(reference).await.and_then(StoredContent::into_json)
    }

    fn store_locally(&self, kind: HashKind, content: StoredContent) -> PublishedReference {
        self.local.insert_new(kind, content)
    }
}
