//! # acad-wallet: Wallet Session Management
//!
//! Owns the single wallet connection of the process.
//!
//! ## Connect sequence
//!
//! ```text
//! provider present? ──no──▶ SessionError::NoProvider
//!        │
//!        ▼
//! switch_chain(0x413) ──UnknownChain (4902)──▶ add_chain(BlockDAG descriptor)
//!        │                                             │
//!        ├──────────────────────◀──────────────────────┘
//!        ▼
//! request_accounts ──▶ SigningHandle(first account) ──▶ Connected
//! ```
//!
//! Any failure after the provider check leaves the session `Disconnected`
//! and surfaces [`SessionError::Connection`].
//!
//! ## Notifications
//!
//! Providers push [`WalletEvent`]s into a channel owned by the
//! [`SessionManager`]. The manager folds them into its state cell through a
//! pure reducer before every read, so a flow that starts after a chain
//! change always observes the reset session.

pub mod chain;
pub mod config;
pub mod jsonrpc;
pub mod mock;
pub mod provider;
pub mod session;

pub use chain::{blockdag_testnet, same_chain_id, ChainDescriptor, NativeCurrency, UNKNOWN_CHAIN_ERROR_CODE};
pub use config::{ConfigError, WalletBridgeConfig};
pub use jsonrpc::{JsonRpcWalletProvider, ObservedWalletState};
pub use mock::{MockWalletProvider, ProviderCall};
pub use provider::{ProviderError, Subscribers, SubscriptionId, WalletEvent, WalletProvider};
pub use session::{
    reduce, ConnectionState, Session, SessionError, SessionManager, SessionMsg, SessionState,
    SigningHandle,
};
