//! Shared fixtures for the credential flow tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use acad_core::{Address, PublishedReference, TokenId};
use acad_credential::{CredentialService, IssueRequest, LinkConfig};
use acad_registry::{
    CredentialRecord, CredentialRegistry, InMemoryLedger, PendingTransaction, RegistryConnector, RegistryError,
};
use acad_storage::{
    Attachment, PinningCredentials, StorageBackend, StorageError, StoragePublisher, StoredContent,
};
use acad_wallet::{MockWalletProvider, SessionManager, SigningHandle, WalletProvider};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

pub const ISSUER: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const RECIPIENT: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
pub const STRANGER: &str = "0xcccccccccccccccccccccccccccccccccccccccc";

pub fn addr(raw: &str) -> Address {
    Address::parse(raw).unwrap()
}

/// Ordered log of storage and registry operations across one flow.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Storage backend that succeeds, remembers content, and logs each call.
#[derive(Default)]
pub struct RecordingBackend {
    pub log: CallLog,
    content: Mutex<HashMap<String, StoredContent>>,
    fail: bool,
}

impl RecordingBackend {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    pub fn failing(log: CallLog) -> Self {
        Self {
            log,
            fail: true,
            ..Self::default()
        }
    }

    fn store(&self, content: StoredContent) -> String {
        let mut map = self.content.lock();
        let hash = format!("QmRecorded{}", map.len());
        map.insert(hash.clone(), content);
        hash
    }
}

#[async_trait]
impl StorageBackend for RecordingBackend {
    async fn pin_json(&self, content: &Value, name: &str, _auth: &PinningCredentials) -> Result<String, StorageError> {
        self.log.lock().push(format!("pin_json:{name}"));
        if self.fail {
            return Err(StorageError::Api {
                endpoint: "pin_json".into(),
                status: 500,
                body: "down".into(),
            });
        }
        Ok(self.store(StoredContent::Json(content.clone())))
    }

    async fn pin_file(&self, file: &Attachment, _auth: &PinningCredentials) -> Result<String, StorageError> {
        self.log.lock().push(format!("pin_file:{}", file.file_name));
        if self.fail {
            return Err(StorageError::Api {
                endpoint: "pin_file".into(),
                status: 500,
                body: "down".into(),
            });
        }
        Ok(self.store(StoredContent::File(file.clone())))
    }

    async fn fetch(&self, hash: &str) -> Result<Option<StoredContent>, StorageError> {
        Ok(self.content.lock().get(hash).cloned())
    }

    fn backend_name(&self) -> &str {
        "recording"
    }
}

/// Registry binding that logs mints into the shared call log.
struct RecordingRegistry {
    inner: Arc<dyn CredentialRegistry>,
    log: CallLog,
}

#[async_trait]
impl CredentialRegistry for RecordingRegistry {
    fn signer(&self) -> &Address {
        self.inner.signer()
    }

    async fn is_authorized_issuer(&self, account: &Address) -> Result<bool, RegistryError> {
        self.log.lock().push("is_authorized".to_string());
        self.inner.is_authorized_issuer(account).await
    }

    async fn mint(
        &self,
        recipient: &Address,
        metadata: &PublishedReference,
    ) -> Result<Box<dyn PendingTransaction>, RegistryError> {
        self.log.lock().push(format!("mint:{metadata}"));
        self.inner.mint(recipient, metadata).await
    }

    async fn get_credential(&self, token_id: &TokenId) -> Result<Option<CredentialRecord>, RegistryError> {
        self.inner.get_credential(token_id).await
    }

    async fn check_ownership(&self, claimant: &Address, token_id: &TokenId) -> Result<bool, RegistryError> {
        self.inner.check_ownership(claimant, token_id).await
    }
}

pub struct RecordingConnector {
    pub ledger: InMemoryLedger,
    pub log: CallLog,
}

impl RegistryConnector for RecordingConnector {
    fn bind(&self, handle: &SigningHandle) -> Arc<dyn CredentialRegistry> {
        Arc::new(RecordingRegistry {
            inner: self.ledger.bind(handle),
            log: Arc::clone(&self.log),
        })
    }
}

pub struct Fixture {
    pub service: CredentialService,
    pub wallet: Arc<MockWalletProvider>,
    pub ledger: InMemoryLedger,
    pub log: CallLog,
}

impl Fixture {
    /// Issuer wallet on the target chain, authorized on the ledger,
    /// storage through `backend`.
    pub fn with_backend(backend: impl FnOnce(CallLog) -> Arc<dyn StorageBackend>) -> Self {
        Self::with_wallet_backend(|log, _| backend(log))
    }

    /// Like [`Fixture::with_backend`], with the backend also holding the
    /// wallet so it can emit notifications mid-flow.
    pub fn with_wallet_backend(
        backend: impl FnOnce(CallLog, Arc<MockWalletProvider>) -> Arc<dyn StorageBackend>,
    ) -> Self {
        let log: CallLog = Arc::default();
        let wallet = Arc::new(MockWalletProvider::new(vec![addr(ISSUER)]).with_known_chain("0x413"));
        let ledger = InMemoryLedger::new();
        ledger.authorize_issuer(addr(ISSUER));

        let service = CredentialService::new(
            SessionManager::new(Some(wallet.clone() as Arc<dyn WalletProvider>)),
            Arc::new(RecordingConnector {
                ledger: ledger.clone(),
                log: Arc::clone(&log),
            }),
            StoragePublisher::new(backend(Arc::clone(&log), Arc::clone(&wallet))),
            LinkConfig::new("https://credentials.example.edu").unwrap(),
        );
        Self {
            service,
            wallet,
            ledger,
            log,
        }
    }

    pub fn recording() -> Self {
        Self::with_backend(|log| Arc::new(RecordingBackend::new(log)))
    }

    pub fn offline() -> Self {
        Self::with_backend(|_| Arc::new(acad_storage::OfflineBackend))
    }

    pub async fn connected() -> Self {
        let fixture = Self::recording();
        fixture.service.connect().await.unwrap();
        fixture
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

pub fn credentials() -> PinningCredentials {
    PinningCredentials::new("key", "secret").unwrap()
}

pub fn request() -> IssueRequest {
    IssueRequest {
        recipient_address: RECIPIENT.to_string(),
        recipient_name: "Ada Lovelace".to_string(),
        degree_type: "Bachelor of Science".to_string(),
        major: "Mathematics".to_string(),
        gpa: "3.9".to_string(),
        graduation_date: "2024-06-01".to_string(),
        description: "Awarded with honors".to_string(),
        attachment: None,
        credentials: Some(credentials()),
    }
}
