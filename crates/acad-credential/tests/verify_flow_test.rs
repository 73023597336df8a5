//! Verification flow scenarios.

mod common;

use acad_core::VerificationVerdict;
use acad_credential::VerifyOutcome;
use common::*;
use proptest::prelude::*;

async fn verdict(fx: &Fixture, id: &str, claim: Option<&str>) -> VerificationVerdict {
    fx.service
        .verify(id, claim)
        .await
        .into_verdict()
        .expect("session connected")
}

#[tokio::test]
async fn verify_without_session_prompts_for_connection() {
    let fx = Fixture::recording();
    assert_eq!(fx.service.verify("0", None).await, VerifyOutcome::ConnectRequired);
}

#[tokio::test]
async fn unknown_identifier_is_untrusted_without_metadata() {
    let fx = Fixture::connected().await;

    let v = verdict(&fx, "999", None).await;

    assert_eq!(v, VerificationVerdict::unknown());
}

#[tokio::test]
async fn malformed_identifier_is_unknown() {
    let fx = Fixture::connected().await;
    assert_eq!(verdict(&fx, "token-7", None).await, VerificationVerdict::unknown());
}

#[tokio::test]
async fn registry_failure_is_indistinguishable_from_not_found() {
    let fx = Fixture::connected().await;
    let minted = fx.service.issue(&request()).await.unwrap();
    fx.ledger.fail_reads("node unreachable");

    let v = verdict(&fx, &minted.assigned_identifier(), None).await;

    assert_eq!(v, VerificationVerdict::unknown());
}

#[tokio::test]
async fn readable_credential_without_claim_is_trusted() {
    let fx = Fixture::connected().await;
    let minted = fx.service.issue(&request()).await.unwrap();

    let v = verdict(&fx, &minted.assigned_identifier(), None).await;

    assert!(v.trusted);
    assert!(!v.ownership_checked);
    assert_eq!(v.current_owner, RECIPIENT);
    assert_eq!(v.source_reference, minted.metadata_reference.as_str());
    assert_eq!(v.metadata.unwrap().name, "Bachelor of Science - Ada Lovelace");
}

#[tokio::test]
async fn ownership_claim_by_owner_is_trusted() {
    let fx = Fixture::connected().await;
    let minted = fx.service.issue(&request()).await.unwrap();

    let v = verdict(&fx, &minted.assigned_identifier(), Some(RECIPIENT)).await;

    assert!(v.trusted);
    assert!(v.ownership_checked);
    assert!(v.is_valid());
}

#[tokio::test]
async fn ownership_claim_by_other_address_fails_with_metadata() {
    let fx = Fixture::connected().await;
    let minted = fx.service.issue(&request()).await.unwrap();

    let v = verdict(&fx, &minted.assigned_identifier(), Some(STRANGER)).await;

    assert!(!v.trusted);
    assert!(v.ownership_checked);
    assert!(v.metadata.is_some());
}

#[tokio::test]
async fn malformed_claim_fails_ownership() {
    let fx = Fixture::connected().await;
    let minted = fx.service.issue(&request()).await.unwrap();

    let v = verdict(&fx, &minted.assigned_identifier(), Some("someone")).await;

    assert!(!v.trusted);
    assert!(v.metadata.is_some());
}

#[tokio::test]
async fn unreadable_metadata_keeps_owner_and_reference() {
    let fx = Fixture::offline();
    fx.service.connect().await.unwrap();
    let id = fx.ledger.insert_credential(addr(RECIPIENT), "ipfs://QmNeverPublished");

    let v = verdict(&fx, id.as_str(), Some(RECIPIENT)).await;

    assert_eq!(v, VerificationVerdict::metadata_unavailable(RECIPIENT, "ipfs://QmNeverPublished"));
    assert!(!fx
        .ledger
        .calls()
        .iter()
        .any(|c| matches!(c, acad_registry::LedgerCall::CheckOwnership { .. })));
}

#[tokio::test]
async fn non_ipfs_token_uri_is_metadata_unavailable() {
    let fx = Fixture::connected().await;
    let id = fx.ledger.insert_credential(addr(RECIPIENT), "https://example.com/meta.json");

    let v = verdict(&fx, id.as_str(), None).await;

    assert!(!v.trusted);
    assert!(v.metadata.is_none());
    assert_eq!(v.current_owner, RECIPIENT);
}

#[tokio::test]
async fn locally_published_metadata_verifies_in_same_process() {
    let fx = Fixture::offline();
    fx.service.connect().await.unwrap();
    let mut req = request();
    req.credentials = None;
    let minted = fx.service.issue(&req).await.unwrap();

    let v = verdict(&fx, &minted.assigned_identifier(), None).await;

    let metadata = v.metadata.expect("local fallback resolvable");
    assert_eq!(metadata.recipient, RECIPIENT);
    assert_eq!(metadata.gpa.as_deref(), Some("3.9"));
}

#[tokio::test]
async fn disconnect_returns_to_connect_prompt() {
    let fx = Fixture::connected().await;
    fx.service.disconnect();
    assert_eq!(fx.service.verify("0", None).await, VerifyOutcome::ConnectRequired);
}

#[test]
fn verification_link_uses_configured_origin() {
    let fx = Fixture::recording();
    assert_eq!(
        fx.service.verification_link("42"),
        "https://credentials.example.edu/verify/42"
    );
}

proptest! {
    #[test]
    fn verification_link_is_stable_and_ends_with_identifier(id in "[0-9]{1,30}") {
        let fx = Fixture::recording();
        let first = fx.service.verification_link(&id);
        prop_assert_eq!(&first, &fx.service.verification_link(&id));
        let suffix = format!("/verify/{id}");
        prop_assert!(first.ends_with(&suffix));
    }
}
