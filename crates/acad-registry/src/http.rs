//! # Contract Gateway Client
//!
//! [`CredentialRegistry`] over an HTTP contract gateway: a service that
//! holds the contract ABIs, forwards read calls to the node, and relays
//! signed transactions on behalf of `from`.
//!
//! ## Endpoints
//!
//! | Method | Path | Body | Reply |
//! |--------|------|------|-------|
//! | POST | `/contracts/{address}/call` | `{from, method, args}` | `{result}` |
//! | POST | `/contracts/{address}/send` | `{from, method, args}` | `{transactionHash}` |
//! | GET  | `/transactions/{hash}/receipt` | | `{transactionHash, status, logs, revertReason}` |
//!
//! A revert is reported as HTTP 422 with `{reason}`. The receipt endpoint
//! answers 404 until the transaction is final; [`HttpPendingTransaction`]
//! polls it at the configured interval without an overall deadline.

use std::sync::Arc;
use std::time::Duration;

use acad_core::{Address, PublishedReference, TokenId};
use acad_wallet::SigningHandle;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::RegistryConfig;
use crate::contract::{
    CredentialRecord, CredentialRegistry, EventLog, Finalization, PendingTransaction, RegistryConnector,
};
use crate::error::RegistryError;

#[derive(Debug, Deserialize)]
struct CallReply {
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendReply {
    transaction_hash: String,
}

#[derive(Debug, Deserialize)]
struct RevertReply {
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptReply {
    transaction_hash: String,
    status: String,
    #[serde(default)]
    logs: Vec<EventLog>,
    #[serde(default)]
    revert_reason: Option<String>,
}

/// Shared HTTP plumbing for every binding.
#[derive(Debug)]
struct GatewayClient {
    http: reqwest::Client,
    base: String,
    receipt_poll: Duration,
}

impl GatewayClient {
    fn contract_url(&self, contract: &Address, action: &str) -> String {
        format!("{}/contracts/{}/{}", self.base, contract, action)
    }

    async fn post<T: DeserializeOwned>(&self, endpoint: String, body: Value) -> Result<T, RegistryError> {
        let resp = self
            .http
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| RegistryError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
            let body = resp.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<RevertReply>(&body)
                .ok()
                .and_then(|r| r.reason)
                .unwrap_or_else(|| "execution reverted".to_string());
            return Err(RegistryError::Reverted { reason });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RegistryError::Api {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        resp.json().await.map_err(|e| RegistryError::Deserialization {
            endpoint,
            reason: e.to_string(),
        })
    }

    async fn call(&self, contract: &Address, from: &Address, method: &str, args: Value) -> Result<Value, RegistryError> {
        let reply: CallReply = self
            .post(
                self.contract_url(contract, "call"),
                json!({ "from": from, "method": method, "args": args }),
            )
            .await?;
        Ok(reply.result)
    }

    /// Poll the receipt endpoint once. `Ok(None)` while pending.
    async fn receipt(&self, tx_hash: &str) -> Result<Option<Finalization>, RegistryError> {
        let endpoint = format!("{}/transactions/{}/receipt", self.base, tx_hash);
        let resp = self.http.get(&endpoint).send().await.map_err(|e| RegistryError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RegistryError::Api {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let receipt: ReceiptReply = resp.json().await.map_err(|e| RegistryError::Deserialization {
            endpoint,
            reason: e.to_string(),
        })?;

        if receipt.status != "success" {
            return Err(RegistryError::Reverted {
                reason: receipt
                    .revert_reason
                    .unwrap_or_else(|| "transaction reverted".to_string()),
            });
        }
        Ok(Some(Finalization {
            transaction_hash: receipt.transaction_hash,
            logs: receipt.logs,
        }))
    }
}

fn decode<T: DeserializeOwned>(method: &str, value: Value) -> Result<T, RegistryError> {
    serde_json::from_value(value).map_err(|e| RegistryError::Deserialization {
        endpoint: method.to_string(),
        reason: e.to_string(),
    })
}

/// Connects signing handles to the contract gateway.
#[derive(Debug, Clone)]
pub struct HttpRegistryConnector {
    client: Arc<GatewayClient>,
    credential_nft: Address,
    verification_contract: Address,
}

impl HttpRegistryConnector {
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| RegistryError::Http {
            endpoint: "client_init".into(),
            source: e,
        })?;
        Ok(Self {
            client: Arc::new(GatewayClient {
                http,
                base: config.gateway_url.as_str().trim_end_matches('/').to_string(),
                receipt_poll: config.receipt_poll,
            }),
            credential_nft: config.credential_nft,
            verification_contract: config.verification_contract,
        })
    }

    /// Binding that signs as `account`.
    pub fn bind_account(&self, account: Address) -> HttpRegistry {
        HttpRegistry {
            client: Arc::clone(&self.client),
            signer: account,
            credential_nft: self.credential_nft.clone(),
            verification_contract: self.verification_contract.clone(),
        }
    }
}

impl RegistryConnector for HttpRegistryConnector {
    fn bind(&self, handle: &SigningHandle) -> Arc<dyn CredentialRegistry> {
        Arc::new(self.bind_account(handle.account().clone()))
    }
}

/// Contract binding for one signing account.
#[derive(Debug, Clone)]
pub struct HttpRegistry {
    client: Arc<GatewayClient>,
    signer: Address,
    credential_nft: Address,
    verification_contract: Address,
}

#[async_trait]
impl CredentialRegistry for HttpRegistry {
    fn signer(&self) -> &Address {
        &self.signer
    }

    async fn is_authorized_issuer(&self, account: &Address) -> Result<bool, RegistryError> {
        let result = self
            .client
            .call(&self.credential_nft, &self.signer, "authorizedIssuers", json!([account]))
            .await?;
        decode("authorizedIssuers", result)
    }

    async fn mint(
        &self,
        recipient: &Address,
        metadata: &PublishedReference,
    ) -> Result<Box<dyn PendingTransaction>, RegistryError> {
        let reply: SendReply = self
            .client
            .post(
                self.client.contract_url(&self.credential_nft, "send"),
                json!({
                    "from": self.signer,
                    "method": "mintCredential",
                    "args": [recipient, metadata.as_str()],
                }),
            )
            .await?;
        tracing::debug!(tx_hash = %reply.transaction_hash, "mint transaction submitted");
        Ok(Box::new(HttpPendingTransaction {
            client: Arc::clone(&self.client),
            hash: reply.transaction_hash,
        }))
    }

    async fn get_credential(&self, token_id: &TokenId) -> Result<Option<CredentialRecord>, RegistryError> {
        let result = self
            .client
            .call(
                &self.verification_contract,
                &self.signer,
                "getCredentialDetails",
                json!([token_id]),
            )
            .await;
        let value = match result {
            Ok(value) => value,
            // Nonexistent tokens revert.
            Err(RegistryError::Reverted { reason }) => {
                tracing::debug!(%token_id, %reason, "credential lookup reverted");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let (owner, token_uri): (Address, String) = decode("getCredentialDetails", value)?;
        Ok(Some(CredentialRecord { owner, token_uri }))
    }

    async fn check_ownership(&self, claimant: &Address, token_id: &TokenId) -> Result<bool, RegistryError> {
        let result = self
            .client
            .call(
                &self.verification_contract,
                &self.signer,
                "verifyOwnership",
                json!([claimant, token_id]),
            )
            .await?;
        decode("verifyOwnership", result)
    }
}

/// A transaction submitted through the gateway.
#[derive(Debug)]
pub struct HttpPendingTransaction {
    client: Arc<GatewayClient>,
    hash: String,
}

#[async_trait]
impl PendingTransaction for HttpPendingTransaction {
    fn transaction_hash(&self) -> &str {
        &self.hash
    }

    async fn wait(&self) -> Result<Finalization, RegistryError> {
        loop {
            if let Some(finalization) = self.client.receipt(&self.hash).await? {
                return Ok(finalization);
            }
            tokio::time::sleep(self.client.receipt_poll).await;
        }
    }
}
