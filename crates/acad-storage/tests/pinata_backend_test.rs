//! Contract tests for PinataBackend and the publisher's fallback path
//! against a wiremock Pinata server.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST   | `/pinning/pinJSONToIPFS` | `pin_json_*`, `publish_json_*` |
//! | POST   | `/pinning/pinFileToIPFS` | `pin_file_*` |
//! | GET    | `/ipfs/{hash}` | `resolve_*` |

use std::sync::Arc;

use acad_core::PublishedReference;
use acad_storage::{
    Attachment, PinataBackend, PinningCredentials, Publication, StorageBackend, StorageConfig,
    StoragePublisher, StoredContent,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> PinataBackend {
    PinataBackend::new(StorageConfig::local_mock(&server.uri()).unwrap()).unwrap()
}

fn publisher(server: &MockServer) -> StoragePublisher {
    StoragePublisher::new(Arc::new(backend(server)))
}

fn creds() -> PinningCredentials {
    PinningCredentials::new("test-key", "test-secret").unwrap()
}

// ── POST /pinning/pinJSONToIPFS ──────────────────────────────────────

#[tokio::test]
async fn pin_json_sends_auth_headers_and_wrapped_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pinning/pinJSONToIPFS"))
        .and(header("pinata_api_key", "test-key"))
        .and(header("pinata_secret_api_key", "test-secret"))
        .and(body_partial_json(json!({
            "pinataContent": { "name": "BSc - Ada" },
            "pinataMetadata": { "name": "Credential-0xabc-1700000000000" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "IpfsHash": "QmPinnedMetadata",
            "PinSize": 321,
            "Timestamp": "2026-01-15T12:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hash = backend(&server)
        .pin_json(&json!({"name": "BSc - Ada"}), "Credential-0xabc-1700000000000", &creds())
        .await
        .unwrap();
    assert_eq!(hash, "QmPinnedMetadata");
}

#[tokio::test]
async fn pin_json_adds_timestamp_to_pinned_copy() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pinning/pinJSONToIPFS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"IpfsHash": "QmX"})))
        .mount(&server)
        .await;

    backend(&server).pin_json(&json!({"name": "n"}), "pin", &creds()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["pinataContent"]["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn publish_json_returns_remote_reference_on_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pinning/pinJSONToIPFS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"IpfsHash": "QmRemote"})))
        .expect(1)
        .mount(&server)
        .await;

    let publication = publisher(&server).publish_json(&json!({"a": 1}), "pin", Some(&creds())).await;
    assert_eq!(
        publication,
        Publication::Remote(PublishedReference::parse("ipfs://QmRemote").unwrap())
    );
}

#[tokio::test]
async fn publish_json_falls_back_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pinning/pinJSONToIPFS"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = publisher(&server);
    let content = json!({"name": "MSc - Grace"});
    let publication = publisher.publish_json(&content, "pin", Some(&creds())).await;

    assert!(publication.is_local());
    assert_eq!(publisher.resolve_json(publication.reference()).await, Some(content));
}

#[tokio::test]
async fn publish_json_falls_back_on_malformed_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pinning/pinJSONToIPFS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let publication = publisher(&server).publish_json(&json!({}), "pin", Some(&creds())).await;
    assert!(publication.is_local());
}

#[tokio::test]
async fn publish_json_falls_back_when_service_unreachable() {
    let config = StorageConfig::local_mock("http://127.0.0.1:1").unwrap();
    let publisher = StoragePublisher::new(Arc::new(PinataBackend::new(config).unwrap()));

    let publication = publisher.publish_json(&json!({"x": 1}), "pin", Some(&creds())).await;
    assert!(publication.is_local());
    assert_eq!(publisher.resolve_json(publication.reference()).await, Some(json!({"x": 1})));
}

#[tokio::test]
async fn publish_without_credentials_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"IpfsHash": "QmNope"})))
        .expect(0)
        .mount(&server)
        .await;

    let publication = publisher(&server).publish_json(&json!({}), "pin", None).await;
    assert!(publication.is_local());
}

// ── POST /pinning/pinFileToIPFS ──────────────────────────────────────

#[tokio::test]
async fn pin_file_posts_multipart_with_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pinning/pinFileToIPFS"))
        .and(header("pinata_api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"IpfsHash": "QmTranscript"})))
        .expect(1)
        .mount(&server)
        .await;

    let file = Attachment::new("transcript.pdf", b"%PDF-1.7 fake".to_vec());
    let hash = backend(&server).pin_file(&file, &creds()).await.unwrap();
    assert_eq!(hash, "QmTranscript");

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("transcript.pdf"));
    assert!(body.contains("pinataMetadata"));
}

#[tokio::test]
async fn pin_file_failure_yields_local_file_reference() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pinning/pinFileToIPFS"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let publisher = publisher(&server);
    let file = Attachment::new("t.pdf", vec![1, 2, 3]);
    let publication = publisher.publish_file(&file, Some(&creds())).await;

    assert!(publication.is_local());
    assert_eq!(publisher.resolve(publication.reference()).await, Some(StoredContent::File(file)));
}

// ── GET /ipfs/{hash} ─────────────────────────────────────────────────

#[tokio::test]
async fn resolve_fetches_from_gateway_when_not_local() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ipfs/QmGateway"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "BA - Lin"})))
        .expect(1)
        .mount(&server)
        .await;

    let reference = PublishedReference::parse("ipfs://QmGateway").unwrap();
    let content = publisher(&server).resolve_json(&reference).await;
    assert_eq!(content, Some(json!({"name": "BA - Lin"})));
}

#[tokio::test]
async fn resolve_returns_binary_content_as_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ipfs/QmBinary"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0x00, 0xfe]))
        .mount(&server)
        .await;

    let reference = PublishedReference::parse("ipfs://QmBinary").unwrap();
    match publisher(&server).resolve(&reference).await {
        Some(StoredContent::File(file)) => assert_eq!(file.bytes, vec![0xff, 0x00, 0xfe]),
        other => panic!("expected file content, got {other:?}"),
    }
}

#[tokio::test]
async fn resolve_missing_reference_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ipfs/QmMissing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let reference = PublishedReference::parse("ipfs://QmMissing").unwrap();
    assert!(publisher(&server).resolve(&reference).await.is_none());
}

#[tokio::test]
async fn resolve_gateway_error_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ipfs/QmFlaky"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let reference = PublishedReference::parse("ipfs://QmFlaky").unwrap();
    assert!(publisher(&server).resolve(&reference).await.is_none());
}

#[tokio::test]
async fn resolve_prefers_local_store_over_gateway() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"from": "gateway"})))
        .expect(0)
        .mount(&server)
        .await;

    let publisher = publisher(&server);
    let publication = publisher.publish_json(&json!({"from": "local"}), "pin", None).await;
    assert_eq!(
        publisher.resolve_json(publication.reference()).await,
        Some(json!({"from": "local"}))
    );
}
