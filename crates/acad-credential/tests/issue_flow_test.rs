//! Issuance flow scenarios.

mod common;

use std::sync::Arc;

use acad_core::{CredentialMetadata, PublishedReference, TokenId, UNCONFIRMED_TOKEN_ID};
use acad_credential::{IssueError, IssueRequest};
use acad_storage::{Attachment, PinningCredentials, StorageBackend, StorageError, StoredContent};
use acad_wallet::{MockWalletProvider, WalletEvent};
use async_trait::async_trait;
use common::*;
use proptest::prelude::*;
use serde_json::Value;

#[tokio::test]
async fn issue_publishes_metadata_once_then_mints_once() {
    let fx = Fixture::connected().await;

    let result = fx.service.issue(&request()).await.unwrap();

    let log = fx.log();
    let ops: Vec<&str> = log
        .iter()
        .map(|e| e.split(':').next().unwrap_or_default())
        .filter(|op| *op != "is_authorized")
        .collect();
    assert_eq!(ops, vec!["pin_json", "mint"]);
    assert!(log[0] == "is_authorized", "authorization precedes publication: {log:?}");
    assert!(log[1].starts_with(&format!("pin_json:Credential-{RECIPIENT}-")));
    assert_eq!(log[2], format!("mint:{}", result.metadata_reference));
    assert_eq!(fx.ledger.mint_count(), 1);
}

#[tokio::test]
async fn first_minted_token_is_confirmed_id_zero() {
    let fx = Fixture::connected().await;

    let result = fx.service.issue(&request()).await.unwrap();

    assert!(result.is_confirmed());
    assert_eq!(result.assigned_identifier(), "0");
    assert!(result.transaction_hash.starts_with("0x"));
}

#[tokio::test]
async fn attachment_is_published_before_metadata_and_referenced_by_it() {
    let fx = Fixture::connected().await;
    let mut req = request();
    req.attachment = Some(Attachment::new("transcript.pdf", b"%PDF-1.7".to_vec()));

    let result = fx.service.issue(&req).await.unwrap();

    let log = fx.log();
    assert_eq!(log[1], "pin_file:transcript.pdf");
    assert!(log[2].starts_with("pin_json:"));
    assert!(log[3].starts_with("mint:"));

    let metadata = published_metadata(&fx, &result.metadata_reference).await;
    let attachment = metadata.attachment().expect("attachment reference recorded");
    assert_eq!(metadata.issuer, ISSUER);
    assert_eq!(metadata.recipient, RECIPIENT);
    assert_eq!(metadata.name, "Bachelor of Science - Ada Lovelace");
    assert!(attachment.as_str().starts_with("ipfs://"));
    assert_eq!(metadata.major.as_deref(), Some("Mathematics"));
}

#[tokio::test]
async fn unauthorized_issuer_never_publishes_or_mints() {
    let fx = Fixture::connected().await;
    fx.ledger.revoke_issuer(&addr(ISSUER));

    let err = fx.service.issue(&request()).await.unwrap_err();

    assert!(matches!(err, IssueError::NotAuthorized { ref account } if account == ISSUER));
    assert_eq!(fx.log(), vec!["is_authorized".to_string()]);
    assert_eq!(fx.ledger.mint_count(), 0);
}

#[tokio::test]
async fn failing_authorization_check_is_not_authorized() {
    let fx = Fixture::connected().await;
    fx.ledger.fail_reads("rpc timeout");

    let err = fx.service.issue(&request()).await.unwrap_err();

    assert!(matches!(err, IssueError::NotAuthorized { .. }));
    assert_eq!(fx.ledger.mint_count(), 0);
    assert!(!fx.log().iter().any(|e| e.starts_with("pin_")));
}

#[tokio::test]
async fn missing_mint_event_yields_unconfirmed_result() {
    let fx = Fixture::connected().await;
    fx.ledger.suppress_mint_events();

    let result = fx.service.issue(&request()).await.unwrap();

    assert!(!result.is_confirmed());
    assert_eq!(result.assigned_identifier(), UNCONFIRMED_TOKEN_ID);
    assert!(!result.transaction_hash.is_empty());
}

#[tokio::test]
async fn revert_reason_surfaces_verbatim() {
    let fx = Fixture::connected().await;
    fx.ledger.revert_mints("Recipient already holds this credential");

    let err = fx.service.issue(&request()).await.unwrap_err();

    assert!(matches!(err, IssueError::Mint(_)));
    assert_eq!(err.to_string(), "Recipient already holds this credential");
}

#[tokio::test]
async fn issue_without_session_is_not_connected() {
    let fx = Fixture::recording();

    let err = fx.service.issue(&request()).await.unwrap_err();

    assert!(matches!(err, IssueError::NotConnected));
    assert!(fx.log().is_empty());
}

#[tokio::test]
async fn malformed_recipient_is_rejected_before_publication() {
    let fx = Fixture::connected().await;
    let mut req = request();
    req.recipient_address = "not-an-address".to_string();

    let err = fx.service.issue(&req).await.unwrap_err();

    assert!(matches!(err, IssueError::InvalidRequest { field: "recipient_address", .. }));
    assert!(fx.log().is_empty());
}

#[tokio::test]
async fn storage_outage_degrades_to_local_and_still_mints() {
    let fx = Fixture::with_backend(|log| Arc::new(RecordingBackend::failing(log)));
    fx.service.connect().await.unwrap();

    let result = fx.service.issue(&request()).await.unwrap();

    assert!(result.is_confirmed());
    assert!(held_locally(&fx, &result.metadata_reference));
}

#[tokio::test]
async fn issue_without_credentials_uses_local_store_only() {
    let fx = Fixture::connected().await;
    let mut req = request();
    req.credentials = None;

    let result = fx.service.issue(&req).await.unwrap();

    assert!(!fx.log().iter().any(|e| e.starts_with("pin_")));
    assert!(held_locally(&fx, &result.metadata_reference));
}

#[tokio::test]
async fn chain_change_forces_reconnect_and_rebinding() {
    let fx = Fixture::connected().await;
    fx.service.issue(&request()).await.unwrap();
    let binds_before = fx.ledger.bind_count();

    fx.wallet.emit(WalletEvent::ChainChanged("0x1".into()));

    let err = fx.service.issue(&request()).await.unwrap_err();
    assert!(matches!(err, IssueError::NotConnected));
    assert_eq!(fx.service.sessions().reload_generation(), 1);

    fx.service.connect().await.unwrap();
    fx.service.issue(&request()).await.unwrap();
    assert_eq!(fx.ledger.bind_count(), binds_before + 1);
}

/// Recording backend whose wallet switches networks while metadata is
/// being pinned.
struct ChainSwitchingBackend {
    inner: RecordingBackend,
    wallet: Arc<MockWalletProvider>,
}

#[async_trait]
impl StorageBackend for ChainSwitchingBackend {
    async fn pin_json(&self, content: &Value, name: &str, auth: &PinningCredentials) -> Result<String, StorageError> {
        self.wallet.emit(WalletEvent::ChainChanged("0x1".into()));
        self.inner.pin_json(content, name, auth).await
    }

    async fn pin_file(&self, file: &Attachment, auth: &PinningCredentials) -> Result<String, StorageError> {
        self.inner.pin_file(file, auth).await
    }

    async fn fetch(&self, hash: &str) -> Result<Option<StoredContent>, StorageError> {
        self.inner.fetch(hash).await
    }

    fn backend_name(&self) -> &str {
        "chain-switching"
    }
}

#[tokio::test]
async fn chain_change_mid_flow_lets_the_flow_finish_with_its_handle() {
    let fx = Fixture::with_wallet_backend(|log, wallet| {
        Arc::new(ChainSwitchingBackend {
            inner: RecordingBackend::new(log),
            wallet,
        })
    });
    fx.service.connect().await.unwrap();

    let result = fx.service.issue(&request()).await.unwrap();

    assert!(result.is_confirmed());
    assert_eq!(fx.ledger.mint_count(), 1);
    let minted = fx.ledger.credential(&TokenId::from_u64(0)).expect("token 0 minted");
    assert_eq!(minted.token_uri, result.metadata_reference.to_string());

    let err = fx.service.issue(&request()).await.unwrap_err();
    assert!(matches!(err, IssueError::NotConnected));
    assert_eq!(fx.service.sessions().reload_generation(), 1);
    assert_eq!(fx.ledger.mint_count(), 1);
}

#[tokio::test]
async fn binding_is_reused_within_a_generation() {
    let fx = Fixture::connected().await;
    fx.service.issue(&request()).await.unwrap();
    fx.service.issue(&request()).await.unwrap();
    assert_eq!(fx.ledger.bind_count(), 1);
}

async fn published_metadata(fx: &Fixture, reference: &PublishedReference) -> CredentialMetadata {
    let document = fx.service.publisher().resolve_json(reference).await.expect("metadata resolvable");
    serde_json::from_value(document).unwrap()
}

fn held_locally(fx: &Fixture, reference: &PublishedReference) -> bool {
    fx.service.publisher().local_store().contains(reference.content_hash())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_plain_request_publishes_once_and_mints_that_reference(
        name in "[A-Za-z][A-Za-z .'-]{0,40}",
        degree in "(Bachelor|Master|Doctor) of [A-Z][a-z]{2,20}",
        gpa in "[0-4]\\.[0-9]{1,2}",
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let fx = Fixture::connected().await;
            let req = IssueRequest {
                recipient_name: name.clone(),
                degree_type: degree.clone(),
                gpa: gpa.clone(),
                ..request()
            };

            let result = fx.service.issue(&req).await.unwrap();

            let log = fx.log();
            let pins = log.iter().filter(|e| e.starts_with("pin_")).count();
            let expected_mint = format!("mint:{}", result.metadata_reference);
            let mints: Vec<&String> = log.iter().filter(|e| e.starts_with("mint:")).collect();
            prop_assert_eq!(pins, 1);
            prop_assert_eq!(mints, vec![&expected_mint]);

            let metadata = published_metadata(&fx, &result.metadata_reference).await;
            let expected_name = format!("{degree} - {name}");
            prop_assert_eq!(&metadata.name, &expected_name);
            prop_assert_eq!(metadata.gpa.as_deref(), Some(gpa.as_str()));
            prop_assert!(metadata.attachment().is_none());
            Ok(())
        })?;
    }
}
