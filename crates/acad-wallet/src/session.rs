//! # Session Manager
//!
//! A single owned state cell holding the process's wallet [`Session`].
//! Every change goes through [`reduce`], a pure transition function over
//! [`SessionMsg`]. Connect steps and wallet notifications are both just
//! messages.
//!
//! ## States
//!
//! ```text
//!               connect()                 accounts granted
//! Disconnected ───────────▶ Connecting ─────────────────────▶ Connected
//!      ▲                        │                                 │
//!      │      any failure       │                                 │
//!      ├────────────────────────┘                                 │
//!      │   disconnect() | accountsChanged([]) | chainChanged      │
//!      └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//!
//! `signing_handle.is_some() == account.is_some() == (state == Connected)`.
//! [`reduce`] is the only writer and preserves it for every message.
//!
//! ## Chain changes
//!
//! A `chainChanged` notification is never reconciled in place. It resets
//! the session and bumps the reload generation; owners of contract
//! bindings compare generations and rebuild.

use std::fmt;
use std::sync::Arc;

use acad_core::Address;
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::Mutex as AsyncMutex;

use crate::chain::{blockdag_testnet, ChainDescriptor};
use crate::provider::{ProviderError, SubscriptionId, WalletEvent, WalletProvider};

/// Errors from the connect sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No wallet provider in the environment. Not retryable until the user
    /// installs one.
    #[error("no wallet provider found: install a browser wallet such as MetaMask to use this application")]
    NoProvider,

    /// Network enforcement or account access failed. The user may retry.
    #[error("failed to connect wallet, please try again: {reason}")]
    Connection { reason: String },
}

/// Connection state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
        }
    }
}

/// Capability to act as one account on one chain.
///
/// Bound at connect time. Flows capture a clone when they start and keep
/// using it even if the session changes underneath them.
#[derive(Clone)]
pub struct SigningHandle {
    account: Address,
    chain_id: String,
    provider: Arc<dyn WalletProvider>,
}

impl SigningHandle {
    pub fn new(account: Address, chain_id: impl Into<String>, provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            account,
            chain_id: chain_id.into(),
            provider,
        }
    }

    /// The account this handle signs for.
    pub fn account(&self) -> &Address {
        &self.account
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn provider(&self) -> &Arc<dyn WalletProvider> {
        &self.provider
    }
}

impl fmt::Debug for SigningHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningHandle")
            .field("account", &self.account)
            .field("chain_id", &self.chain_id)
            .field("provider", &self.provider.provider_name())
            .finish()
    }
}

impl PartialEq for SigningHandle {
    fn eq(&self, other: &Self) -> bool {
        self.account == other.account
            && self.chain_id == other.chain_id
            && Arc::ptr_eq(&self.provider, &other.provider)
    }
}

/// Snapshot of the wallet session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    account: Option<Address>,
    signing_handle: Option<SigningHandle>,
    state: ConnectionState,
}

impl Session {
    pub fn disconnected() -> Self {
        Self {
            account: None,
            signing_handle: None,
            state: ConnectionState::Disconnected,
        }
    }

    fn connecting() -> Self {
        Self {
            account: None,
            signing_handle: None,
            state: ConnectionState::Connecting,
        }
    }

    fn connected(account: Address, handle: SigningHandle) -> Self {
        Self {
            account: Some(account),
            signing_handle: Some(handle),
            state: ConnectionState::Connected,
        }
    }

    /// Build a connected session directly from a signing handle.
    pub fn from_handle(handle: SigningHandle) -> Self {
        Self::connected(handle.account().clone(), handle)
    }

    /// The active account. May differ from the signing handle's account
    /// after an `accountsChanged` notification.
    pub fn account(&self) -> Option<&Address> {
        self.account.as_ref()
    }

    pub fn signing_handle(&self) -> Option<&SigningHandle> {
        self.signing_handle.as_ref()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::disconnected()
    }
}

/// Session plus the reload generation it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub session: Session,
    /// Incremented on every chain change.
    pub generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            session: Session::disconnected(),
            generation: 0,
        }
    }
}

/// Inputs to [`reduce`].
#[derive(Debug, Clone)]
pub enum SessionMsg {
    ConnectStarted,
    /// Connect finished. `generation` is the generation observed when the
    /// connect started.
    ConnectSucceeded { handle: SigningHandle, generation: u64 },
    ConnectFailed,
    Disconnect,
    Wallet(WalletEvent),
}

/// Pure session transition function.
pub fn reduce(state: &SessionState, msg: SessionMsg) -> SessionState {
    let generation = state.generation;
    match msg {
        SessionMsg::ConnectStarted => SessionState {
            session: Session::connecting(),
            generation,
        },
        SessionMsg::ConnectSucceeded { handle, generation: started } => {
            // A chain change during connect means the handle is bound to a
            // stale network. A disconnect during connect wins.
            if started != generation || state.session.state == ConnectionState::Disconnected {
                return SessionState {
                    session: Session::disconnected(),
                    generation,
                };
            }
            SessionState {
                session: Session::connected(handle.account().clone(), handle),
                generation,
            }
        }
        SessionMsg::ConnectFailed | SessionMsg::Disconnect => SessionState {
            session: Session::disconnected(),
            generation,
        },
        SessionMsg::Wallet(WalletEvent::AccountsChanged(accounts)) => {
            match (accounts.into_iter().next(), &state.session.signing_handle) {
                (None, _) => SessionState {
                    session: Session::disconnected(),
                    generation,
                },
                (Some(first), Some(handle)) if state.session.is_connected() => SessionState {
                    session: Session::connected(first, handle.clone()),
                    generation,
                },
                // Not connected: nothing to re-point.
                (Some(_), _) => state.clone(),
            }
        }
        SessionMsg::Wallet(WalletEvent::ChainChanged(_)) => SessionState {
            session: Session::disconnected(),
            generation: generation + 1,
        },
    }
}

struct Cell {
    state: SessionState,
    events: Option<UnboundedReceiver<WalletEvent>>,
}

impl Cell {
    fn apply(&mut self, msg: SessionMsg) {
        self.state = reduce(&self.state, msg);
    }

    /// Fold every notification delivered so far into the state.
    fn drain(&mut self) {
        let mut pending = Vec::new();
        if let Some(rx) = self.events.as_mut() {
            while let Ok(event) = rx.try_recv() {
                pending.push(event);
            }
        }
        for event in pending {
            match &event {
                WalletEvent::AccountsChanged(accounts) if accounts.is_empty() => {
                    tracing::info!("wallet exposed no accounts, disconnecting");
                }
                WalletEvent::AccountsChanged(accounts) => {
                    tracing::info!(account = %accounts[0], "wallet account changed");
                }
                WalletEvent::ChainChanged(chain_id) => {
                    tracing::warn!(%chain_id, "wallet chain changed, reloading session context");
                }
            }
            self.apply(SessionMsg::Wallet(event));
        }
    }
}

/// Owner of the process's single wallet session.
pub struct SessionManager {
    provider: Option<Arc<dyn WalletProvider>>,
    chain: ChainDescriptor,
    cell: Mutex<Cell>,
    /// Serializes connect sequences.
    connecting: AsyncMutex<()>,
    subscription: Option<SubscriptionId>,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.cell.lock();
        f.debug_struct("SessionManager")
            .field("provider", &self.provider.as_ref().map(|p| p.provider_name().to_string()))
            .field("chain", &self.chain.chain_id)
            .field("state", &cell.state.session.state)
            .field("generation", &cell.state.generation)
            .finish()
    }
}

impl SessionManager {
    /// Manager targeting the BlockDAG testnet.
    pub fn new(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        Self::with_chain(provider, blockdag_testnet())
    }

    /// Manager targeting `chain`. Subscribes to wallet notifications for
    /// as long as the manager lives.
    pub fn with_chain(provider: Option<Arc<dyn WalletProvider>>, chain: ChainDescriptor) -> Self {
        let (events, subscription) = match &provider {
            Some(p) => {
                let (tx, rx) = mpsc::unbounded_channel();
                let id = p.subscribe(tx);
                tracing::debug!(provider = p.provider_name(), "subscribed to wallet notifications");
                (Some(rx), Some(id))
            }
            None => (None, None),
        };
        Self {
            provider,
            chain,
            cell: Mutex::new(Cell {
                state: SessionState::default(),
                events,
            }),
            connecting: AsyncMutex::new(()),
            subscription,
        }
    }

    pub fn chain(&self) -> &ChainDescriptor {
        &self.chain
    }

    /// Run the connect sequence.
    pub async fn connect(&self) -> Result<Session, SessionError> {
        let provider = self.provider.clone().ok_or(SessionError::NoProvider)?;
        let _serial = self.connecting.lock().await;

        let generation = {
            let mut cell = self.cell.lock();
            cell.drain();
            cell.apply(SessionMsg::ConnectStarted);
            cell.state.generation
        };
        tracing::info!(provider = provider.provider_name(), chain = %self.chain.chain_id, "connecting wallet");

        match self.establish(provider).await {
            Ok(handle) => {
                let mut cell = self.cell.lock();
                cell.drain();
                cell.apply(SessionMsg::ConnectSucceeded { handle, generation });
                if cell.state.session.is_connected() {
                    let session = cell.state.session.clone();
                    if let Some(account) = session.account() {
                        tracing::info!(%account, "wallet connected");
                    }
                    Ok(session)
                } else {
                    tracing::warn!("session reset while connecting");
                    Err(SessionError::Connection {
                        reason: "session reset while connecting (network change or disconnect)".to_string(),
                    })
                }
            }
            Err(reason) => {
                let mut cell = self.cell.lock();
                cell.apply(SessionMsg::ConnectFailed);
                tracing::error!(%reason, "failed to connect wallet");
                Err(SessionError::Connection { reason })
            }
        }
    }

    /// Network enforcement, then account access.
    async fn establish(&self, provider: Arc<dyn WalletProvider>) -> Result<SigningHandle, String> {
        self.enforce_network(provider.as_ref())
            .await
            .map_err(|e| e.to_string())?;

        let accounts = provider.request_accounts().await.map_err(|e| e.to_string())?;
        let account = accounts
            .into_iter()
            .next()
            .ok_or_else(|| "wallet returned no accounts".to_string())?;

        Ok(SigningHandle::new(account, self.chain.chain_id.clone(), provider))
    }

    async fn enforce_network(&self, provider: &dyn WalletProvider) -> Result<(), ProviderError> {
        match provider.switch_chain(&self.chain.chain_id).await {
            Ok(()) => Ok(()),
            Err(ProviderError::UnknownChain { .. }) => {
                tracing::info!(chain = %self.chain.chain_name, "chain unknown to wallet, registering it");
                provider.add_chain(&self.chain).await
            }
            Err(e) => Err(e),
        }
    }

    /// Drop the session. Subscriptions stay active.
    pub fn disconnect(&self) {
        let mut cell = self.cell.lock();
        cell.drain();
        cell.apply(SessionMsg::Disconnect);
        tracing::info!("wallet disconnected");
    }

    /// The session after every notification delivered so far.
    pub fn current_session(&self) -> Session {
        let mut cell = self.cell.lock();
        cell.drain();
        cell.state.session.clone()
    }

    /// Session together with its reload generation.
    pub fn snapshot(&self) -> SessionState {
        let mut cell = self.cell.lock();
        cell.drain();
        cell.state.clone()
    }

    /// Number of chain changes observed so far.
    pub fn reload_generation(&self) -> u64 {
        self.snapshot().generation
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        if let (Some(provider), Some(id)) = (&self.provider, self.subscription.take()) {
            provider.unsubscribe(id);
            tracing::debug!(provider = provider.provider_name(), "released wallet subscriptions");
        }
    }
}
