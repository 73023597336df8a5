//! # Wallet Provider Interface
//!
//! Abstracts the external wallet (a browser extension behind a bridge, a
//! hardware signer, or a test double). The session manager never talks to
//! a wallet any other way.

use std::collections::HashMap;

use acad_core::Address;
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::chain::ChainDescriptor;

/// Errors a wallet provider reports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The wallet does not know the requested chain (code 4902).
    #[error("chain {chain_id} is not registered with the wallet")]
    UnknownChain { chain_id: String },

    /// The wallet answered with an error (user rejection, bad params, ...).
    #[error("wallet rejected request (code {code}): {message}")]
    Rejected { code: i64, message: String },

    /// The wallet could not be reached or answered garbage.
    #[error("wallet transport error: {reason}")]
    Transport { reason: String },
}

/// Notification pushed by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The set of exposed accounts changed; empty means the wallet locked
    /// or revoked access.
    AccountsChanged(Vec<Address>),
    /// The wallet switched to another chain.
    ChainChanged(String),
}

/// Handle for releasing a notification subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// External wallet capabilities the session manager consumes.
///
/// Implementations must be `Send + Sync`; the signing handle keeps an
/// `Arc` to the provider that produced it.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the user to expose their accounts. First entry is the active one.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Switch to `chain_id`. Fails with [`ProviderError::UnknownChain`]
    /// when the chain has not been registered.
    async fn switch_chain(&self, chain_id: &str) -> Result<(), ProviderError>;

    /// Register a chain with the wallet.
    async fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<(), ProviderError>;

    /// Deliver `accountsChanged` / `chainChanged` notifications to `sink`
    /// until unsubscribed.
    fn subscribe(&self, sink: UnboundedSender<WalletEvent>) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);

    /// Human-readable provider name for logs.
    fn provider_name(&self) -> &str;
}

/// Subscriber registry shared by provider implementations.
#[derive(Debug, Default)]
pub struct Subscribers {
    sinks: Mutex<HashMap<SubscriptionId, UnboundedSender<WalletEvent>>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, sink: UnboundedSender<WalletEvent>) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.sinks.lock().insert(id, sink);
        id
    }

    pub fn remove(&self, id: SubscriptionId) {
        self.sinks.lock().remove(&id);
    }

    /// Send `event` to every live subscriber, pruning closed channels.
    pub fn broadcast(&self, event: &WalletEvent) {
        self.sinks
            .lock()
            .retain(|_, sink| sink.send(event.clone()).is_ok());
    }

    pub fn len(&self) -> usize {
        self.sinks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.lock().is_empty()
    }
}
