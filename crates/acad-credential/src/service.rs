//! # Credential Service
//!
//! The session-owning context. Holds the [`SessionManager`], the storage
//! publisher and a registry connector, and hands each flow a registry
//! bound to the signing handle it captured when it started.
//!
//! The binding is cached per (reload generation, signer, chain). A chain
//! change bumps the generation, so the next flow rebinds instead of
//! reusing a binding made against the old network.

use std::sync::Arc;

use acad_core::{Address, MintResult};
use acad_registry::{CredentialRegistry, RegistryConnector};
use acad_storage::StoragePublisher;
use acad_wallet::{Session, SessionError, SessionManager, SigningHandle};
use parking_lot::Mutex;

use crate::error::IssueError;
use crate::issuer::CredentialIssuer;
use crate::link::LinkConfig;
use crate::request::IssueRequest;
use crate::verifier::{CredentialVerifier, VerifyOutcome};

struct Binding {
    generation: u64,
    signer: Address,
    chain_id: String,
    registry: Arc<dyn CredentialRegistry>,
}

impl Binding {
    fn matches(&self, generation: u64, handle: &SigningHandle) -> bool {
        self.generation == generation && &self.signer == handle.account() && self.chain_id == handle.chain_id()
    }
}

pub struct CredentialService {
    sessions: SessionManager,
    connector: Arc<dyn RegistryConnector>,
    issuer: CredentialIssuer,
    verifier: CredentialVerifier,
    links: LinkConfig,
    binding: Mutex<Option<Binding>>,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("sessions", &self.sessions)
            .field("publisher", self.issuer.publisher())
            .field("links", &self.links)
            .finish()
    }
}

impl CredentialService {
    pub fn new(
        sessions: SessionManager,
        connector: Arc<dyn RegistryConnector>,
        publisher: StoragePublisher,
        links: LinkConfig,
    ) -> Self {
        Self {
            sessions,
            connector,
            issuer: CredentialIssuer::new(publisher.clone()),
            verifier: CredentialVerifier::new(publisher),
            links,
            binding: Mutex::new(None),
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn publisher(&self) -> &StoragePublisher {
        self.issuer.publisher()
    }

    pub async fn connect(&self) -> Result<Session, SessionError> {
        self.sessions.connect().await
    }

    pub fn disconnect(&self) {
        self.sessions.disconnect();
        *self.binding.lock() = None;
    }

    pub fn current_session(&self) -> Session {
        self.sessions.current_session()
    }

    /// Session plus a registry bound to its signing handle, rebinding if
    /// the generation or handle changed since the last flow.
    fn bound(&self) -> (Session, Option<Arc<dyn CredentialRegistry>>) {
        let snapshot = self.sessions.snapshot();
        let Some(handle) = snapshot.session.signing_handle().cloned() else {
            return (snapshot.session, None);
        };

        let mut binding = self.binding.lock();
        match binding.as_ref() {
            Some(b) if b.matches(snapshot.generation, &handle) => {
                let registry = Arc::clone(&b.registry);
                (snapshot.session, Some(registry))
            }
            _ => {
                tracing::debug!(
                    generation = snapshot.generation,
                    signer = %handle.account(),
                    "binding registry to signing handle"
                );
                let registry = self.connector.bind(&handle);
                *binding = Some(Binding {
                    generation: snapshot.generation,
                    signer: handle.account().clone(),
                    chain_id: handle.chain_id().to_string(),
                    registry: Arc::clone(&registry),
                });
                (snapshot.session, Some(registry))
            }
        }
    }

    /// Whether the session account may issue. `false` when disconnected.
    pub async fn is_authorized(&self) -> bool {
        let (session, Some(registry)) = self.bound() else {
            return false;
        };
        let Some(account) = session.account().cloned() else {
            return false;
        };
        crate::gate::IssuerGate
            .is_authorized(&session, registry.as_ref(), &account)
            .await
    }

    pub async fn issue(&self, request: &IssueRequest) -> Result<MintResult, IssueError> {
        let (session, Some(registry)) = self.bound() else {
            return Err(IssueError::NotConnected);
        };
        self.issuer.issue(&session, registry.as_ref(), request).await
    }

    pub async fn verify(&self, identifier: &str, ownership_claim: Option<&str>) -> VerifyOutcome {
        let (session, Some(registry)) = self.bound() else {
            return VerifyOutcome::ConnectRequired;
        };
        self.verifier
            .verify(&session, registry.as_ref(), identifier, ownership_claim)
            .await
    }

    pub fn verification_link(&self, identifier: &str) -> String {
        self.links.verification_link(identifier)
    }
}
