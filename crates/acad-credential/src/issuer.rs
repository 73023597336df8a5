//! # Credential Issuer
//!
//! One issuance, in order, each failure short-circuiting the rest:
//!
//! 1. Session must be connected.
//! 2. Recipient must be a well-formed address.
//! 3. [`IssuerGate`] must confirm the session account.
//! 4. Attachment, if any, is published.
//! 5. Metadata is composed and published.
//! 6. The mint is submitted and awaited; the assigned identifier is
//!    decoded from the `CredentialMinted` event.
//!
//! Steps 4 and 5 cannot fail: publication degrades to the local store.
//! Once the mint has finalized there is no rollback. A missing event
//! yields an unconfirmed [`MintResult`], not an error.

use acad_core::{Address, CredentialMetadata, MintResult, Timestamp};
use acad_registry::{decode_credential_minted, CredentialRegistry};
use acad_storage::StoragePublisher;
use acad_wallet::Session;

use crate::error::IssueError;
use crate::gate::IssuerGate;
use crate::request::IssueRequest;

#[derive(Debug, Clone)]
pub struct CredentialIssuer {
    publisher: StoragePublisher,
    gate: IssuerGate,
}

impl CredentialIssuer {
    pub fn new(publisher: StoragePublisher) -> Self {
        Self {
            publisher,
            gate: IssuerGate,
        }
    }

    pub fn publisher(&self) -> &StoragePublisher {
        &self.publisher
    }

    /// Issue one credential through `registry`, which must be bound to the
    /// session's signing handle.
    pub async fn issue(
        &self,
        session: &Session,
        registry: &dyn CredentialRegistry,
        request: &IssueRequest,
    ) -> Result<MintResult, IssueError> {
        let issuer = match (session.is_connected(), session.account()) {
            (true, Some(account)) => account.clone(),
            _ => return Err(IssueError::NotConnected),
        };

        let recipient = Address::parse(&request.recipient_address).map_err(|e| IssueError::InvalidRequest {
            field: "recipient_address",
            reason: e.to_string(),
        })?;

        if !self.gate.is_authorized(session, registry, &issuer).await {
            return Err(IssueError::NotAuthorized {
                account: issuer.to_string(),
            });
        }

        let credentials = request.credentials.as_ref();

        let attachment = match &request.attachment {
            Some(file) => {
                let publication = self.publisher.publish_file(file, credentials).await;
                if publication.is_local() {
                    tracing::warn!(reference = %publication.reference(), "attachment held in local store only");
                }
                Some(publication.into_reference())
            }
            None => None,
        };

        let issued_at = Timestamp::now();
        let metadata =
            CredentialMetadata::compose(&request.record(), &recipient, &issuer, issued_at, attachment.as_ref());
        let document = serde_json::to_value(&metadata).map_err(|e| IssueError::InvalidRequest {
            field: "metadata",
            reason: e.to_string(),
        })?;

        let pin_name = format!("Credential-{}-{}", recipient, issued_at.timestamp_millis());
        let publication = self.publisher.publish_json(&document, &pin_name, credentials).await;
        if publication.is_local() {
            tracing::warn!(reference = %publication.reference(), "metadata held in local store only");
        }
        let metadata_reference = publication.into_reference();

        let pending = registry
            .mint(&recipient, &metadata_reference)
            .await
            .map_err(IssueError::Mint)?;
        tracing::info!(tx_hash = pending.transaction_hash(), %recipient, "mint submitted, awaiting finalization");

        let finalization = pending.wait().await.map_err(IssueError::Mint)?;

        let token_id = decode_credential_minted(&finalization).map(|event| event.token_id);
        match &token_id {
            Some(id) => {
                tracing::info!(token_id = %id, tx_hash = %finalization.transaction_hash, "credential minted")
            }
            None => tracing::warn!(
                tx_hash = %finalization.transaction_hash,
                "mint finalized without a CredentialMinted event, token id unknown"
            ),
        }

        Ok(MintResult {
            token_id,
            transaction_hash: finalization.transaction_hash,
            metadata_reference,
        })
    }
}
