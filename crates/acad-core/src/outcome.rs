//! # Flow Outcomes
//!
//! [`MintResult`] is produced only by a successful mint; [`VerificationVerdict`]
//! is the single output of verification, covering both positive and
//! negative outcomes.

use serde::{Deserialize, Serialize};

use crate::identity::TokenId;
use crate::metadata::CredentialMetadata;
use crate::reference::PublishedReference;

/// Identifier rendered when a mint finalized without a confirmation event.
pub const UNCONFIRMED_TOKEN_ID: &str = "0";

/// Result of a finalized mint transaction.
///
/// `token_id` is `None` when the finalization carried no confirmation
/// event. The mint did happen; only the registry-assigned identifier is
/// unknown. [`MintResult::assigned_identifier`] renders that case as
/// [`UNCONFIRMED_TOKEN_ID`] for display, while [`MintResult::is_confirmed`]
/// keeps it distinguishable from a real token `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintResult {
    pub token_id: Option<TokenId>,
    pub transaction_hash: String,
    pub metadata_reference: PublishedReference,
}

impl MintResult {
    pub fn assigned_identifier(&self) -> String {
        self.token_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| UNCONFIRMED_TOKEN_ID.to_string())
    }

    pub fn is_confirmed(&self) -> bool {
        self.token_id.is_some()
    }
}

/// Verification outcome for one credential identifier.
///
/// - `trusted = false`, `metadata = None`: unknown credential or unreadable state.
/// - `trusted = false`, `metadata = Some(_)`: the credential exists but the
///   requested ownership assertion failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationVerdict {
    pub trusted: bool,
    /// Current on-chain owner, empty when the lookup failed.
    pub current_owner: String,
    pub metadata: Option<CredentialMetadata>,
    /// Metadata reference recorded on-chain, empty when the lookup failed.
    pub source_reference: String,
    /// Whether `trusted` reflects an explicit ownership assertion rather
    /// than existence plus readable metadata.
    pub ownership_checked: bool,
}

impl VerificationVerdict {
    /// The collapsed negative verdict. Deliberately identical for "not
    /// found" and "backend failure".
    pub fn unknown() -> Self {
        Self {
            trusted: false,
            current_owner: String::new(),
            metadata: None,
            source_reference: String::new(),
            ownership_checked: false,
        }
    }

    /// The credential exists on-chain but its metadata could not be read.
    pub fn metadata_unavailable(owner: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            trusted: false,
            current_owner: owner.into(),
            metadata: None,
            source_reference: reference.into(),
            ownership_checked: false,
        }
    }

    /// Valid and readable: the positive display state.
    pub fn is_valid(&self) -> bool {
        self.trusted && self.metadata.is_some()
    }
}
