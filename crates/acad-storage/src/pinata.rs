//! # Pinata HTTP Backend
//!
//! Pins JSON and files through the Pinata pinning API and fetches content
//! through a Pinata IPFS gateway.
//!
//! ## Endpoints
//!
//! | Method | Path | Used by |
//! |--------|------|---------|
//! | POST | `{api}/pinning/pinJSONToIPFS` | [`StorageBackend::pin_json`] |
//! | POST | `{api}/pinning/pinFileToIPFS` | [`StorageBackend::pin_file`] |
//! | GET  | `{gateway}/ipfs/{hash}` | [`StorageBackend::fetch`] |
//!
//! Authentication uses the `pinata_api_key` / `pinata_secret_api_key`
//! header pair supplied per call, so one backend can serve issuers that
//! bring their own keys.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::backend::{Attachment, StorageBackend, StoredContent};
use crate::config::{PinningCredentials, StorageConfig};
use crate::error::StorageError;

/// Reply body of both pinning endpoints.
#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// HTTP client for the Pinata API and gateway.
#[derive(Debug, Clone)]
pub struct PinataBackend {
    http: reqwest::Client,
    api_base: String,
    gateway_base: String,
}

impl PinataBackend {
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| StorageError::Http {
            endpoint: "client_init".into(),
            source: e,
        })?;
        Ok(Self {
            http,
            api_base: config.api_url.as_str().trim_end_matches('/').to_string(),
            gateway_base: config.gateway_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn with_auth(request: reqwest::RequestBuilder, auth: &PinningCredentials) -> reqwest::RequestBuilder {
        request
            .header("pinata_api_key", &auth.api_key)
            .header("pinata_secret_api_key", auth.secret_key.as_str())
    }

    /// Send a pinning request and extract the content hash from the reply.
    async fn send_pin(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<String, StorageError> {
        let resp = request.send().await.map_err(|e| StorageError::Http {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let pinned: PinResponse = resp.json().await.map_err(|e| StorageError::Deserialization {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        let hash = pinned.ipfs_hash.trim();
        if hash.is_empty() || hash.contains('/') {
            return Err(StorageError::InvalidHash {
                endpoint: endpoint.to_string(),
                hash: pinned.ipfs_hash,
            });
        }
        Ok(hash.to_string())
    }
}

#[async_trait]
impl StorageBackend for PinataBackend {
    async fn pin_json(
        &self,
        content: &Value,
        name: &str,
        auth: &PinningCredentials,
    ) -> Result<String, StorageError> {
        let endpoint = format!("{}/pinning/pinJSONToIPFS", self.api_base);

        // Pinned copies carry the pin time alongside the caller's fields.
        let mut pinned_content = content.clone();
        if let Value::Object(map) = &mut pinned_content {
            map.insert(
                "timestamp".to_string(),
                Value::String(acad_core::Timestamp::now().to_iso8601()),
            );
        }

        let body = json!({
            "pinataContent": pinned_content,
            "pinataMetadata": { "name": name },
        });

        let request = Self::with_auth(self.http.post(&endpoint), auth).json(&body);
        self.send_pin(request, &endpoint).await
    }

    async fn pin_file(
        &self,
        file: &Attachment,
        auth: &PinningCredentials,
    ) -> Result<String, StorageError> {
        let endpoint = format!("{}/pinning/pinFileToIPFS", self.api_base);

        let part = reqwest::multipart::Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("pinataMetadata", json!({ "name": file.file_name }).to_string());

        let request = Self::with_auth(self.http.post(&endpoint), auth).multipart(form);
        self.send_pin(request, &endpoint).await
    }

    async fn fetch(&self, content_hash: &str) -> Result<Option<StoredContent>, StorageError> {
        let endpoint = format!("{}/ipfs/{}", self.gateway_base, content_hash);

        let resp = self.http.get(&endpoint).send().await.map_err(|e| StorageError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let status = resp.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| StorageError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        // Gateways serve JSON and binary pins from the same path.
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(v) => Ok(Some(StoredContent::Json(v))),
            Err(_) => Ok(Some(StoredContent::File(Attachment::new(
                content_hash,
                bytes.to_vec(),
            )))),
        }
    }

    fn backend_name(&self) -> &str {
        "PinataBackend"
    }
}
