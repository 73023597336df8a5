//! # acad-storage: Content-Addressed Publication
//!
//! Publishes credential metadata (JSON) and binary attachments to an
//! IPFS pinning service and resolves `ipfs://` references back to content.
//!
//! ## Availability over consistency
//!
//! Publication never fails. When no pinning credentials are supplied, or
//! the pinning service errors in any way, [`StoragePublisher`] mints a
//! synthetic reference and keeps the content in an in-process
//! [`LocalStore`]. Resolution consults that store first, so every reference
//! the publisher ever returned stays resolvable for the life of the process,
//! or across processes when the store is opened from a snapshot file.
//!
//! ## Layout
//!
//! - [`backend`]: the [`StorageBackend`] trait the publisher talks to.
//! - [`pinata`]: HTTP implementation against the Pinata API and gateway.
//! - [`local`]: synthetic references and the concurrent local store.
//! - [`publisher`]: the two-path publish/resolve protocol.

pub mod backend;
pub mod config;
pub mod error;
pub mod local;
pub mod pinata;
pub mod publisher;

pub use backend::{Attachment, OfflineBackend, StorageBackend, StoredContent};
pub use config::{ConfigError, PinningCredentials, StorageConfig};
pub use error::StorageError;
pub use local::LocalStore;
pub use pinata::PinataBackend;
pub use publisher::{Publication, StoragePublisher};
