//! # acad-core: Foundational Types for Credential Issuance
//!
//! Every other crate in the workspace depends on `acad-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for on-chain identifiers.** `Address` and `TokenId` are
//!    validated at construction. An account address cannot be passed where
//!    a token identifier is expected.
//!
//! 2. **References are opaque.** A [`PublishedReference`] is only produced
//!    by the storage layer or parsed from an `ipfs://` URI; callers never
//!    build content hashes by hand.
//!
//! 3. **Negative outcomes are values.** "No such credential" and "metadata
//!    unavailable" are [`VerificationVerdict`] states, not errors.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `acad-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod metadata;
pub mod outcome;
pub mod reference;
pub mod temporal;

pub use error::CoreError;
pub use identity::{Address, TokenId};
pub use metadata::{AcademicRecord, CredentialMetadata};
pub use outcome::{MintResult, VerificationVerdict, UNCONFIRMED_TOKEN_ID};
pub use reference::{PublishedReference, IPFS_SCHEME};
pub use temporal::Timestamp;
