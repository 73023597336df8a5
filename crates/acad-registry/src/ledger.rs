//! # In-Memory Ledger
//!
//! A process-local stand-in for both contracts. Bindings created through
//! [`RegistryConnector::bind`] share one ledger, so a credential minted by
//! one account is visible to every other binding.
//!
//! Token identifiers are assigned sequentially from `0`. Transactions are
//! final as soon as they are submitted. Faults can be injected to exercise
//! fail-closed and degraded paths.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use acad_core::{Address, PublishedReference, TokenId};
use acad_wallet::SigningHandle;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::contract::{
    CredentialRecord, CredentialRegistry, EventLog, Finalization, PendingTransaction, RegistryConnector,
};
use crate::error::RegistryError;
use crate::events::CREDENTIAL_MINTED_EVENT;

/// A contract operation observed by the ledger, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    IsAuthorizedIssuer(Address),
    Mint { recipient: Address, token_uri: String },
    GetCredential(TokenId),
    CheckOwnership { claimant: Address, token_id: TokenId },
}

#[derive(Debug, Default)]
struct LedgerState {
    issuers: HashSet<Address>,
    tokens: BTreeMap<u64, CredentialRecord>,
    next_token: u64,
    tx_count: u64,
    calls: Vec<LedgerCall>,
    binds: usize,
    read_failure: Option<String>,
    mint_revert: Option<String>,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<LedgerState>,
    suppress_mint_event: AtomicBool,
}

/// Shared in-memory ledger. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    shared: Arc<Shared>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `account` to the credential NFT's authorization list.
    pub fn authorize_issuer(&self, account: Address) {
        self.shared.state.lock().issuers.insert(account);
    }

    pub fn revoke_issuer(&self, account: &Address) {
        self.shared.state.lock().issuers.remove(account);
    }

    /// Record a credential directly, bypassing mint.
    pub fn insert_credential(&self, owner: Address, token_uri: impl Into<String>) -> TokenId {
        let mut state = self.shared.state.lock();
        let id = state.next_token;
        state.next_token += 1;
        state.tokens.insert(
            id,
            CredentialRecord {
                owner,
                token_uri: token_uri.into(),
            },
        );
        TokenId::from_u64(id)
    }

    /// Make every read call fail with [`RegistryError::Unavailable`].
    pub fn fail_reads(&self, reason: impl Into<String>) {
        self.shared.state.lock().read_failure = Some(reason.into());
    }

    /// Make subsequent mints revert with `reason`.
    pub fn revert_mints(&self, reason: impl Into<String>) {
        self.shared.state.lock().mint_revert = Some(reason.into());
    }

    /// Finalize mints without emitting `CredentialMinted`.
    pub fn suppress_mint_events(&self) {
        self.shared.suppress_mint_event.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<LedgerCall> {
        self.shared.state.lock().calls.clone()
    }

    pub fn mint_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, LedgerCall::Mint { .. }))
            .count()
    }

    /// Number of bindings handed out so far.
    pub fn bind_count(&self) -> usize {
        self.shared.state.lock().binds
    }

    pub fn credential(&self, token_id: &TokenId) -> Option<CredentialRecord> {
        let id: u64 = token_id.as_str().parse().ok()?;
        self.shared.state.lock().tokens.get(&id).cloned()
    }

    /// Binding that signs as `account`.
    pub fn bind_account(&self, account: Address) -> LedgerRegistry {
        self.shared.state.lock().binds += 1;
        LedgerRegistry {
            ledger: self.clone(),
            signer: account,
        }
    }

    fn read<T>(&self, call: LedgerCall, f: impl FnOnce(&LedgerState) -> T) -> Result<T, RegistryError> {
        let mut state = self.shared.state.lock();
        state.calls.push(call);
        if let Some(reason) = &state.read_failure {
            return Err(RegistryError::Unavailable { reason: reason.clone() });
        }
        Ok(f(&state))
    }
}

impl RegistryConnector for InMemoryLedger {
    fn bind(&self, handle: &SigningHandle) -> Arc<dyn CredentialRegistry> {
        Arc::new(self.bind_account(handle.account().clone()))
    }
}

fn transaction_hash(sequence: u64, from: &Address, recipient: &Address, token_uri: &str) -> String {
    let digest = Sha256::new()
        .chain_update(sequence.to_be_bytes())
        .chain_update(from.as_str())
        .chain_update(recipient.as_str())
        .chain_update(token_uri)
        .finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("0x{hex}")
}

/// [`CredentialRegistry`] binding over an [`InMemoryLedger`].
#[derive(Debug, Clone)]
pub struct LedgerRegistry {
    ledger: InMemoryLedger,
    signer: Address,
}

#[async_trait]
impl CredentialRegistry for LedgerRegistry {
    fn signer(&self) -> &Address {
        &self.signer
    }

    async fn is_authorized_issuer(&self, account: &Address) -> Result<bool, RegistryError> {
        self.ledger
            .read(LedgerCall::IsAuthorizedIssuer(account.clone()), |s| s.issuers.contains(account))
    }

    async fn mint(
        &self,
        recipient: &Address,
        metadata: &PublishedReference,
    ) -> Result<Box<dyn PendingTransaction>, RegistryError> {
        let token_uri = metadata.as_str().to_string();
        let mut state = self.ledger.shared.state.lock();
        state.calls.push(LedgerCall::Mint {
            recipient: recipient.clone(),
            token_uri: token_uri.clone(),
        });
        if let Some(reason) = &state.mint_revert {
            return Err(RegistryError::Reverted { reason: reason.clone() });
        }
        if !state.issuers.contains(&self.signer) {
            return Err(RegistryError::Reverted {
                reason: "Not an authorized issuer".to_string(),
            });
        }

        let id = state.next_token;
        state.next_token += 1;
        state.tx_count += 1;
        state.tokens.insert(
            id,
            CredentialRecord {
                owner: recipient.clone(),
                token_uri: token_uri.clone(),
            },
        );
        let hash = transaction_hash(state.tx_count, &self.signer, recipient, &token_uri);

        let mut logs = vec![EventLog {
            name: "Transfer".to_string(),
            args: json!({ "from": Address::zero(), "to": recipient, "tokenId": id.to_string() }),
        }];
        if !self.ledger.shared.suppress_mint_event.load(Ordering::SeqCst) {
            logs.push(EventLog {
                name: CREDENTIAL_MINTED_EVENT.to_string(),
                args: json!({ "tokenId": id.to_string(), "recipient": recipient, "tokenURI": token_uri }),
            });
        }

        Ok(Box::new(FinalizedTransaction {
            finalization: Finalization {
                transaction_hash: hash,
                logs,
            },
        }))
    }

    async fn get_credential(&self, token_id: &TokenId) -> Result<Option<CredentialRecord>, RegistryError> {
        let id = token_id.as_str().parse::<u64>().ok();
        self.ledger.read(LedgerCall::GetCredential(token_id.clone()), |s| {
            id.and_then(|id| s.tokens.get(&id).cloned())
        })
    }

    async fn check_ownership(&self, claimant: &Address, token_id: &TokenId) -> Result<bool, RegistryError> {
        let id = token_id.as_str().parse::<u64>().ok();
        self.ledger.read(
            LedgerCall::CheckOwnership {
                claimant: claimant.clone(),
                token_id: token_id.clone(),
            },
            |s| {
                id.and_then(|id| s.tokens.get(&id))
                    .is_some_and(|record| &record.owner == claimant)
            },
        )
    }
}

#[derive(Debug)]
struct FinalizedTransaction {
    finalization: Finalization,
}

#[async_trait]
impl PendingTransaction for FinalizedTransaction {
    fn transaction_hash(&self) -> &str {
        &self.finalization.transaction_hash
    }

    async fn wait(&self) -> Result<Finalization, RegistryError> {
        Ok(self.finalization.clone())
    }
}
