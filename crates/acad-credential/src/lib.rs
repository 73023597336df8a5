//! # acad-credential: Credential Lifecycle
//!
//! Coordinates the wallet session, the storage publisher and the contract
//! registry into the two user-facing flows.
//!
//! ## Issuance
//!
//! ```text
//! Connected? ─▶ recipient valid? ─▶ IssuerGate ─▶ publish attachment? ─▶ publish metadata ─▶ mint ─▶ decode event
//! ```
//!
//! Every step except publication propagates its failure as an
//! [`IssueError`]. Publication degrades to the local store instead.
//!
//! ## Verification
//!
//! ```text
//! Connected? ─▶ lookup ─▶ resolve metadata ─▶ ownership check (opt-in) ─▶ verdict
//! ```
//!
//! Verification never fails. Every error collapses into a negative
//! [`acad_core::VerificationVerdict`].
//!
//! ## Contract bindings
//!
//! [`CredentialService`] binds the registry to the session's signing
//! handle and rebinds whenever the session's reload generation moves, so
//! flows started after a chain change never reuse stale bindings.

pub mod error;
pub mod gate;
pub mod issuer;
pub mod link;
pub mod request;
pub mod service;
pub mod verifier;

pub use error::IssueError;
pub use gate::IssuerGate;
pub use issuer::CredentialIssuer;
pub use link::{ConfigError, LinkConfig, DEFAULT_APP_ORIGIN};
pub use request::IssueRequest;
pub use service::CredentialService;
pub use verifier::{CredentialVerifier, VerifyOutcome};
