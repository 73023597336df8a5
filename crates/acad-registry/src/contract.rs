//! # Contract Interface
//!
//! Operations consumed from the credential NFT and verification
//! contracts, expressed as traits so issuance and verification flows run
//! unchanged against the HTTP gateway or the in-memory ledger.

use std::sync::Arc;

use acad_core::{Address, PublishedReference, TokenId};
use acad_wallet::SigningHandle;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RegistryError;

/// One decoded event emitted by a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

/// Outcome of a transaction once the network has confirmed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Finalization {
    pub transaction_hash: String,
    /// Emitted events in log order.
    pub logs: Vec<EventLog>,
}

/// A credential as recorded by the verification contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub owner: Address,
    /// Metadata reference stored with the token, usually `ipfs://<hash>`.
    pub token_uri: String,
}

/// A submitted, not yet finalized, transaction.
#[async_trait]
pub trait PendingTransaction: Send + Sync {
    fn transaction_hash(&self) -> &str;

    /// Wait for finalization. A reverted transaction fails with
    /// [`RegistryError::Reverted`].
    async fn wait(&self) -> Result<Finalization, RegistryError>;
}

/// Contract operations, acting as one signing account.
#[async_trait]
pub trait CredentialRegistry: Send + Sync {
    /// The account this binding signs transactions as.
    fn signer(&self) -> &Address;

    /// `authorizedIssuers(account)` on the credential NFT.
    async fn is_authorized_issuer(&self, account: &Address) -> Result<bool, RegistryError>;

    /// `mintCredential(recipient, tokenURI)` on the credential NFT.
    async fn mint(
        &self,
        recipient: &Address,
        metadata: &PublishedReference,
    ) -> Result<Box<dyn PendingTransaction>, RegistryError>;

    /// `getCredentialDetails(tokenId)` on the verification contract.
    /// `Ok(None)` when the token does not exist.
    async fn get_credential(&self, token_id: &TokenId) -> Result<Option<CredentialRecord>, RegistryError>;

    /// `verifyOwnership(claimant, tokenId)` on the verification contract.
    async fn check_ownership(&self, claimant: &Address, token_id: &TokenId) -> Result<bool, RegistryError>;
}

/// Produces contract bindings for a signing handle.
pub trait RegistryConnector: Send + Sync {
    fn bind(&self, handle: &SigningHandle) -> Arc<dyn CredentialRegistry>;
}
