//! # JSON-RPC Wallet Bridge
//!
//! [`WalletProvider`] backed by an EIP-1193 style JSON-RPC endpoint, for
//! example a local signer daemon or a browser-wallet relay.
//!
//! ## Methods
//!
//! | Method | Params | Used by |
//! |--------|--------|---------|
//! | `wallet_switchEthereumChain` | `[{"chainId": "0x413"}]` | [`WalletProvider::switch_chain`] |
//! | `wallet_addEthereumChain` | `[ChainDescriptor]` | [`WalletProvider::add_chain`] |
//! | `eth_requestAccounts` | `[]` | [`WalletProvider::request_accounts`] |
//! | `eth_accounts` | `[]` | [`JsonRpcWalletProvider::poll_changes`] |
//! | `eth_chainId` | `[]` | [`JsonRpcWalletProvider::poll_changes`] |
//!
//! The bridge has no push channel. Account and chain notifications are
//! derived by polling and diffing against the last observed state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use acad_core::Address;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::chain::{same_chain_id, ChainDescriptor, UNKNOWN_CHAIN_ERROR_CODE};
use crate::config::WalletBridgeConfig;
use crate::provider::{ProviderError, Subscribers, SubscriptionId, WalletEvent, WalletProvider};

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

/// Last account list and chain id seen by the poller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedWalletState {
    pub accounts: Option<Vec<Address>>,
    pub chain_id: Option<String>,
}

/// JSON-RPC wallet bridge client.
#[derive(Debug)]
pub struct JsonRpcWalletProvider {
    http: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
    subscribers: Subscribers,
}

impl JsonRpcWalletProvider {
    pub fn new(config: WalletBridgeConfig) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| ProviderError::Transport {
            reason: format!("client init: {e}"),
        })?;
        Ok(Self {
            http,
            endpoint: config.rpc_url.to_string(),
            next_id: AtomicU64::new(1),
            subscribers: Subscribers::new(),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport {
                reason: format!("{method}: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Transport {
                reason: format!("{method}: bridge returned HTTP {}", status.as_u16()),
            });
        }

        let reply: RpcResponse = resp.json().await.map_err(|e| ProviderError::Transport {
            reason: format!("{method}: malformed reply: {e}"),
        })?;

        if let Some(err) = reply.error {
            if err.code == UNKNOWN_CHAIN_ERROR_CODE {
                let chain_id = params
                    .get(0)
                    .and_then(|p| p.get("chainId"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                return Err(ProviderError::UnknownChain { chain_id });
            }
            return Err(ProviderError::Rejected {
                code: err.code,
                message: err.message,
            });
        }

        serde_json::from_value(reply.result.unwrap_or(Value::Null)).map_err(|e| ProviderError::Transport {
            reason: format!("{method}: unexpected result: {e}"),
        })
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let raw: Vec<String> = self.call("eth_accounts", json!([])).await?;
        parse_accounts(raw)
    }

    async fn chain_id(&self) -> Result<String, ProviderError> {
        let raw: String = self.call("eth_chainId", json!([])).await?;
        Ok(raw.to_ascii_lowercase())
    }

    /// Query the bridge once and broadcast whatever changed since `last`.
    ///
    /// The first observation of each value only seeds `last`.
    pub async fn poll_changes(&self, last: &mut ObservedWalletState) -> Vec<WalletEvent> {
        let mut events = Vec::new();

        match self.accounts().await {
            Ok(accounts) => {
                if let Some(previous) = &last.accounts {
                    if previous != &accounts {
                        events.push(WalletEvent::AccountsChanged(accounts.clone()));
                    }
                }
                last.accounts = Some(accounts);
            }
            Err(e) => tracing::warn!(error = %e, "wallet bridge account poll failed"),
        }

        match self.chain_id().await {
            Ok(chain_id) => {
                if let Some(previous) = &last.chain_id {
                    if !same_chain_id(previous, &chain_id) {
                        events.push(WalletEvent::ChainChanged(chain_id.clone()));
                    }
                }
                last.chain_id = Some(chain_id);
            }
            Err(e) => tracing::warn!(error = %e, "wallet bridge chain poll failed"),
        }

        for event in &events {
            self.subscribers.broadcast(event);
        }
        events
    }

    /// Poll the bridge every `every` until the returned task is aborted.
    pub fn spawn_event_poller(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let provider = Arc::clone(self);
        tokio::spawn(async move {
            let mut last = ObservedWalletState::default();
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                provider.poll_changes(&mut last).await;
            }
        })
    }
}

fn parse_accounts(raw: Vec<String>) -> Result<Vec<Address>, ProviderError> {
    raw.iter()
        .map(|s| {
            Address::parse(s).map_err(|e| ProviderError::Transport {
                reason: format!("bridge returned invalid account: {e}"),
            })
        })
        .collect()
}

#[async_trait]
impl WalletProvider for JsonRpcWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let raw: Vec<String> = self.call("eth_requestAccounts", json!([])).await?;
        parse_accounts(raw)
    }

    async fn switch_chain(&self, chain_id: &str) -> Result<(), ProviderError> {
        let _: Value = self
            .call("wallet_switchEthereumChain", json!([{ "chainId": chain_id }]))
            .await?;
        Ok(())
    }

    async fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<(), ProviderError> {
        let _: Value = self.call("wallet_addEthereumChain", json!([descriptor])).await?;
        Ok(())
    }

    fn subscribe(&self, sink: UnboundedSender<WalletEvent>) -> SubscriptionId {
        self.subscribers.add(sink)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.remove(id);
    }

    fn provider_name(&self) -> &str {
        "json-rpc"
    }
}
