//! # acad-registry: Credential Contract Interface
//!
//! Client-side view of the two contracts the credential system talks to:
//!
//! - **Credential NFT**: issuer authorization list and `mintCredential`.
//! - **Verification contract**: `getCredentialDetails` and `verifyOwnership`.
//!
//! Contract logic itself lives on-chain. This crate only exposes the
//! operations as the [`CredentialRegistry`] trait, bound to one signing
//! handle through a [`RegistryConnector`].
//!
//! ## Implementations
//!
//! | Type | Transport |
//! |------|-----------|
//! | [`HttpRegistryConnector`] | Contract gateway over HTTP, receipts polled until final. |
//! | [`InMemoryLedger`] | Process-local ledger for tests and offline development. |
//!
//! ## Mint confirmation
//!
//! The registry assigns token identifiers. Callers recover the identifier
//! with [`decode_credential_minted`], which returns `None` rather than
//! failing when the finalization carries no confirmation event.

pub mod config;
pub mod contract;
pub mod error;
pub mod events;
pub mod explorer;
pub mod http;
pub mod ledger;

pub use config::{ConfigError, RegistryConfig};
pub use contract::{
    CredentialRecord, CredentialRegistry, EventLog, Finalization, PendingTransaction,
    RegistryConnector,
};
pub use error::RegistryError;
pub use events::{decode_credential_minted, CredentialMinted, CREDENTIAL_MINTED_EVENT};
pub use explorer::ExplorerLinks;
pub use http::{HttpPendingTransaction, HttpRegistry, HttpRegistryConnector};
pub use ledger::{InMemoryLedger, LedgerCall, LedgerRegistry};
