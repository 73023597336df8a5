//! Wiring from environment configuration to a [`CredentialService`].

use std::sync::Arc;
use std::time::Duration;

use acad_credential::{CredentialService, LinkConfig};
use acad_registry::{HttpRegistryConnector, RegistryConfig};
use acad_core::Address;
use acad_storage::{LocalStore, PinataBackend, StorageConfig, StoragePublisher};
use acad_wallet::{JsonRpcWalletProvider, SessionManager, WalletBridgeConfig, WalletProvider};
use anyhow::{Context, Result};
use tokio::task::JoinHandle;

/// A service built from the environment plus the wallet event poller
/// feeding it. The poller stops when the context is dropped.
pub struct AppContext {
    pub service: CredentialService,
    /// Credential NFT contract the registry client talks to.
    pub credential_nft: Address,
    bridge: Option<Arc<JsonRpcWalletProvider>>,
    poller: Option<JoinHandle<()>>,
}

impl AppContext {
    /// Must be called inside a Tokio runtime.
    pub fn from_env() -> Result<Self> {
        let bridge = match WalletBridgeConfig::from_env().context("wallet bridge configuration")? {
            Some(config) => Some(Arc::new(
                JsonRpcWalletProvider::new(config).context("wallet bridge client")?,
            )),
            None => {
                tracing::debug!("ACAD_WALLET_RPC_URL not set, no wallet provider available");
                None
            }
        };
        let provider = bridge.clone().map(|b| b as Arc<dyn WalletProvider>);

        let storage = StorageConfig::from_env().context("storage configuration")?;
        let local = match &storage.local_store_path {
            Some(path) => LocalStore::open(path).context("local fallback store")?,
            None => LocalStore::new(),
        };
        let backend = PinataBackend::new(storage).context("pinning client")?;
        let publisher = StoragePublisher::with_local_store(Arc::new(backend), local);

        let registry = RegistryConfig::from_env().context("registry configuration")?;
        let credential_nft = registry.credential_nft.clone();
        let connector = HttpRegistryConnector::new(registry).context("registry client")?;

        let links = LinkConfig::from_env().context("link configuration")?;

        Ok(Self {
            service: CredentialService::new(SessionManager::new(provider), Arc::new(connector), publisher, links),
            credential_nft,
            bridge,
            poller: None,
        })
    }

    /// Connect the wallet, then start watching it for account and chain
    /// changes. Watching starts after network enforcement so the switch to
    /// the target chain is not itself reported as a change.
    pub async fn connect(&mut self) -> Result<()> {
        let session = self.service.connect().await?;
        if let Some(account) = session.account() {
            tracing::info!(%account, "using wallet account");
        }
        if self.poller.is_none() {
            if let Some(bridge) = &self.bridge {
                self.poller = Some(bridge.spawn_event_poller(Duration::from_secs(2)));
            }
        }
        Ok(())
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
    }
}
