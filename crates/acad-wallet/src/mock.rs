//! # Mock Wallet Provider
//!
//! Scriptable in-memory wallet for tests and offline development.
//!
//! Starts knowing no chains, so the first connect exercises the
//! switch → add fallback. Every call is recorded in order; failures can be
//! injected per operation; notifications are pushed with [`MockWalletProvider::emit`].

use std::collections::HashSet;

use acad_core::Address;
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use crate::chain::ChainDescriptor;
use crate::provider::{ProviderError, Subscribers, SubscriptionId, WalletEvent, WalletProvider};

/// A call observed by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    SwitchChain(String),
    AddChain(ChainDescriptor),
    RequestAccounts,
}

#[derive(Debug, Default)]
struct Failures {
    switch_chain: Option<ProviderError>,
    add_chain: Option<ProviderError>,
    request_accounts: Option<ProviderError>,
}

/// In-memory [`WalletProvider`].
#[derive(Debug, Default)]
pub struct MockWalletProvider {
    accounts: Mutex<Vec<Address>>,
    known_chains: Mutex<HashSet<String>>,
    active_chain: Mutex<Option<String>>,
    failures: Mutex<Failures>,
    calls: Mutex<Vec<ProviderCall>>,
    subscribers: Subscribers,
}

impl MockWalletProvider {
    /// A wallet exposing `accounts` (first is active).
    pub fn new(accounts: Vec<Address>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
            ..Self::default()
        }
    }

    /// Pre-register a chain so `switch_chain` succeeds directly.
    pub fn with_known_chain(self, chain_id: &str) -> Self {
        self.known_chains.lock().insert(chain_id.to_ascii_lowercase());
        self
    }

    pub fn fail_switch_chain(&self, err: ProviderError) {
        self.failures.lock().switch_chain = Some(err);
    }

    pub fn fail_add_chain(&self, err: ProviderError) {
        self.failures.lock().add_chain = Some(err);
    }

    pub fn fail_request_accounts(&self, err: ProviderError) {
        self.failures.lock().request_accounts = Some(err);
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.lock() = accounts;
    }

    /// Push a notification to every subscriber.
    pub fn emit(&self, event: WalletEvent) {
        if let WalletEvent::AccountsChanged(accounts) = &event {
            self.set_accounts(accounts.clone());
        }
        if let WalletEvent::ChainChanged(chain_id) = &event {
            *self.active_chain.lock() = Some(chain_id.clone());
        }
        self.subscribers.broadcast(&event);
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().clone()
    }

    pub fn active_chain(&self) -> Option<String> {
        self.active_chain.lock().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.record(ProviderCall::RequestAccounts);
        if let Some(err) = self.failures.lock().request_accounts.clone() {
            return Err(err);
        }
        Ok(self.accounts.lock().clone())
    }

    async fn switch_chain(&self, chain_id: &str) -> Result<(), ProviderError> {
        self.record(ProviderCall::SwitchChain(chain_id.to_string()));
        if let Some(err) = self.failures.lock().switch_chain.clone() {
            return Err(err);
        }
        if !self.known_chains.lock().contains(&chain_id.to_ascii_lowercase()) {
            return Err(ProviderError::UnknownChain {
                chain_id: chain_id.to_string(),
            });
        }
        *self.active_chain.lock() = Some(chain_id.to_string());
        Ok(())
    }

    async fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<(), ProviderError> {
        self.record(ProviderCall::AddChain(descriptor.clone()));
        if let Some(err) = self.failures.lock().add_chain.clone() {
            return Err(err);
        }
        self.known_chains
            .lock()
            .insert(descriptor.chain_id.to_ascii_lowercase());
        // Wallets switch to a chain right after adding it.
        *self.active_chain.lock() = Some(descriptor.chain_id.clone());
        Ok(())
    }

    fn subscribe(&self, sink: UnboundedSender<WalletEvent>) -> SubscriptionId {
        self.subscribers.add(sink)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.remove(id);
    }

    fn provider_name(&self) -> &str {
        "MockWalletProvider"
    }
}
