//! # Local Fallback Store
//!
//! Process-local map from synthetic content hash to content. Shared by
//! every flow in the process; `DashMap` shards keep interleaved publishes
//! and resolves from concurrent tasks consistent without a global lock.
//!
//! A store opened with [`LocalStore::open`] also mirrors its entries to a
//! JSON snapshot file, so short-lived processes (one CLI invocation per
//! command) see each other's fallback content. Snapshots are written to a
//! sibling `.tmp` file and renamed into place.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use acad_core::PublishedReference;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::Rng;

use crate::backend::StoredContent;
use crate::error::StorageError;

/// Alphabet of base58btc, the encoding of CIDv0 hashes.
const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Random characters after the `Qm` prefix, matching a CIDv0 length.
const HASH_BODY_LEN: usize = 44;

/// Marker embedded in synthetic attachment hashes.
const FILE_MARKER: &str = "file";

/// Which reference namespace a synthetic hash belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    Metadata,
    File,
}

/// Generate a CIDv0-shaped pseudo-random hash.
///
/// Attachment hashes carry a `file` marker in the middle so metadata and
/// file references can never collide.
pub fn synthetic_hash(kind: HashKind) -> String {
    let mut rng = rand::thread_rng();
    let mut body = |len: usize| -> String {
        (0..len)
            .map(|_| BASE58_ALPHABET[rng.gen_range(0..BASE58_ALPHABET.len())] as char)
            .collect()
    };
    match kind {
        HashKind::Metadata => format!("Qm{}", body(HASH_BODY_LEN)),
        HashKind::File => {
            let half = (HASH_BODY_LEN - FILE_MARKER.len()) / 2;
            let head = body(half);
            let tail = body(half);
            format!("Qm{head}{FILE_MARKER}{tail}")
        }
    }
}

#[derive(Debug)]
struct SnapshotFile {
    path: PathBuf,
    /// Held while a snapshot is written so renames never interleave.
    write: Mutex<()>,
}

/// Content store keyed by content hash, optionally backed by a snapshot file.
#[derive(Debug, Default)]
pub struct LocalStore {
    entries: DashMap<String, StoredContent>,
    snapshot: Option<SnapshotFile>,
}

impl LocalStore {
    /// Memory-only store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store mirrored to the snapshot at `path`. A missing file starts an
    /// empty store; an unreadable or malformed one is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = DashMap::new();
        match std::fs::read(&path) {
            Ok(raw) => {
                let saved: BTreeMap<String, StoredContent> =
                    serde_json::from_slice(&raw).map_err(|e| snapshot_error(&path, e))?;
                for (hash, content) in saved {
                    entries.insert(hash, content);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(snapshot_error(&path, e)),
        }
        tracing::debug!(path = %path.display(), entries = entries.len(), "opened local store snapshot");
        Ok(Self {
            entries,
            snapshot: Some(SnapshotFile {
                path,
                write: Mutex::new(()),
            }),
        })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot.as_ref().map(|s| s.path.as_path())
    }

    /// Store content under a freshly generated hash and return its reference.
    ///
    /// Regenerates on a collision so every call yields a distinct key.
    pub fn insert_new(&self, kind: HashKind, content: StoredContent) -> PublishedReference {
        let mut content = Some(content);
        let reference = loop {
            let hash = synthetic_hash(kind);
            let Ok(reference) = PublishedReference::from_hash(&hash) else {
                continue;
            };
            let inserted = match self.entries.entry(hash) {
                Entry::Vacant(slot) => {
                    if let Some(c) = content.take() {
                        slot.insert(c);
                    }
                    true
                }
                Entry::Occupied(_) => false,
            };
            if inserted {
                break reference;
            }
        };
        // Best effort: memory already holds the entry.
        if let Err(e) = self.write_snapshot() {
            tracing::warn!(error = %e, "failed to persist local store snapshot");
        }
        reference
    }

    fn write_snapshot(&self) -> Result<(), StorageError> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };
        let _guard = snapshot.write.lock();
        let entries: BTreeMap<String, StoredContent> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let raw = serde_json::to_vec(&entries).map_err(|e| snapshot_error(&snapshot.path, e))?;

        if let Some(parent) = snapshot.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| snapshot_error(&snapshot.path, e))?;
        }
        let temp_path = snapshot.path.with_extension("tmp");
        std::fs::write(&temp_path, raw).map_err(|e| snapshot_error(&snapshot.path, e))?;
        std::fs::rename(&temp_path, &snapshot.path).map_err(|e| snapshot_error(&snapshot.path, e))?;
        Ok(())
    }

    pub fn get(&self, content_hash: &str) -> Option<StoredContent> {
        self.entries.get(content_hash).map(|e| e.value().clone())
    }

    pub fn contains(&self, content_hash: &str) -> bool {
        self.entries.contains_key(content_hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn snapshot_error(path: &Path, e: impl std::fmt::Display) -> StorageError {
    StorageError::Snapshot {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Attachment;

    #[test]
    fn metadata_hash_is_cidv0_shaped() {
        let h = synthetic_hash(HashKind::Metadata);
        assert!(h.starts_with("Qm"));
        assert_eq!(h.len(), 2 + HASH_BODY_LEN);
        assert!(h[2..].bytes().all(|b| BASE58_ALPHABET.contains(&b)));
    }

    #[test]
    fn file_hash_carries_marker() {
        let h = synthetic_hash(HashKind::File);
        assert!(h.starts_with("Qm"));
        assert!(h.contains(FILE_MARKER));
        assert_eq!(h.len(), 2 + HASH_BODY_LEN);
    }

    #[test]
    fn hashes_are_distinct() {
        let a = synthetic_hash(HashKind::Metadata);
        let b = synthetic_hash(HashKind::Metadata);
        assert_ne!(a, b);
    }

    #[test]
    fn insert_then_get_returns_content() {
        let store = LocalStore::new();
        let content = StoredContent::Json(serde_json::json!({"name": "Diploma"}));
        let reference = store.insert_new(HashKind::Metadata, content.clone());
        assert_eq!(store.get(reference.content_hash()), Some(content));
        assert!(store.contains(reference.content_hash()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_hash_is_none() {
        let store = LocalStore::new();
        assert!(store.is_empty());
        assert!(store.get("QmNothing").is_none());
    }

    #[test]
    fn reopened_snapshot_serves_earlier_entries() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fallback").join("store.json");
        let doc = StoredContent::Json(serde_json::json!({"name": "Diploma", "attributes": []}));
        let file = StoredContent::File(Attachment::new("transcript.pdf", vec![0x25, 0x50, 0x44, 0x46]));

        let (doc_ref, file_ref) = {
            let store = LocalStore::open(&path).unwrap();
            assert!(store.is_empty());
            (
                store.insert_new(HashKind::Metadata, doc.clone()),
                store.insert_new(HashKind::File, file.clone()),
            )
        };

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get(doc_ref.content_hash()), Some(doc));
        assert_eq!(reopened.get(file_ref.content_hash()), Some(file));
        assert_eq!(reopened.snapshot_path(), Some(path.as_path()));
    }

    #[test]
    fn malformed_snapshot_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"not json").unwrap();

        let err = LocalStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Snapshot { .. }));
    }

    #[test]
    fn memory_store_has_no_snapshot() {
        let store = LocalStore::new();
        store.insert_new(HashKind::Metadata, StoredContent::Json(serde_json::json!({})));
        assert!(store.snapshot_path().is_none());
    }

    #[test]
    fn concurrent_inserts_keep_every_entry() {
        let store = std::sync::Arc::new(LocalStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .map(|j| {
                            let file = Attachment::new(format!("t{i}-{j}.pdf"), vec![i as u8, j as u8]);
                            let reference = store.insert_new(HashKind::File, StoredContent::File(file.clone()));
                            (reference, file)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = Vec::new();
        for h in handles {
            all.extend(h.join().unwrap());
        }
        assert_eq!(store.len(), 400);
        for (reference, file) in all {
            assert_eq!(store.get(reference.content_hash()), Some(StoredContent::File(file)));
        }
    }
}
