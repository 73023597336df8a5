//! # Credential Verifier
//!
//! Lookup, metadata resolution, then an optional ownership assertion.
//! Nothing here returns an error: unknown identifiers, registry faults
//! and unreadable metadata all become negative verdicts. "Not found" and
//! "backend failure" are indistinguishable to the caller.

use acad_core::{Address, CredentialMetadata, PublishedReference, TokenId, VerificationVerdict};
use acad_registry::CredentialRegistry;
use acad_storage::StoragePublisher;
use acad_wallet::Session;

/// Result of a verification request.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    /// No connected session; the caller should prompt for a wallet
    /// connection and retry.
    ConnectRequired,
    Verdict(VerificationVerdict),
}

impl VerifyOutcome {
    pub fn verdict(&self) -> Option<&VerificationVerdict> {
        match self {
            Self::Verdict(v) => Some(v),
            Self::ConnectRequired => None,
        }
    }

    pub fn into_verdict(self) -> Option<VerificationVerdict> {
        match self {
            Self::Verdict(v) => Some(v),
            Self::ConnectRequired => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    publisher: StoragePublisher,
}

impl CredentialVerifier {
    pub fn new(publisher: StoragePublisher) -> Self {
        Self { publisher }
    }

    pub async fn verify(
        &self,
        session: &Session,
        registry: &dyn CredentialRegistry,
        identifier: &str,
        ownership_claim: Option<&str>,
    ) -> VerifyOutcome {
        if !session.is_connected() {
            return VerifyOutcome::ConnectRequired;
        }
        VerifyOutcome::Verdict(self.verdict(registry, identifier, ownership_claim).await)
    }

    async fn verdict(
        &self,
        registry: &dyn CredentialRegistry,
        identifier: &str,
        ownership_claim: Option<&str>,
    ) -> VerificationVerdict {
        let Ok(token_id) = TokenId::parse(identifier) else {
            tracing::debug!(identifier, "malformed credential identifier");
            return VerificationVerdict::unknown();
        };

        let record = match registry.get_credential(&token_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::info!(%token_id, "credential not found");
                return VerificationVerdict::unknown();
            }
            Err(e) => {
                tracing::warn!(%token_id, error = %e, "credential lookup failed");
                return VerificationVerdict::unknown();
            }
        };

        let owner = record.owner.to_string();
        let Some(metadata) = self.resolve_metadata(&record.token_uri).await else {
            return VerificationVerdict::metadata_unavailable(owner, record.token_uri);
        };

        let (trusted, ownership_checked) = match ownership_claim {
            None => (true, false),
            Some(raw) => match Address::parse(raw) {
                // A malformed claimant cannot own anything.
                Err(e) => {
                    tracing::info!(%token_id, claimant = raw, error = %e, "malformed ownership claim");
                    (false, true)
                }
                Ok(claimant) => match registry.check_ownership(&claimant, &token_id).await {
                    Ok(owns) => (owns, true),
                    Err(e) => {
                        tracing::warn!(%token_id, error = %e, "ownership check failed");
                        return VerificationVerdict::unknown();
                    }
                },
            },
        };

        tracing::info!(%token_id, trusted, ownership_checked, "credential verified");
        VerificationVerdict {
            trusted,
            current_owner: owner,
            metadata: Some(metadata),
            source_reference: record.token_uri,
            ownership_checked,
        }
    }

    async fn resolve_metadata(&self, token_uri: &str) -> Option<CredentialMetadata> {
        let reference = match PublishedReference::parse(token_uri) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(token_uri, error = %e, "credential carries an unusable metadata reference");
                return None;
            }
        };
        let document = self.publisher.resolve_json(&reference).await?;
        match serde_json::from_value(document) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::warn!(%reference, error = %e, "metadata is not a credential record");
                None
            }
        }
    }
}
