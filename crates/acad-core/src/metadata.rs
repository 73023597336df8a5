//! # Credential Metadata
//!
//! The off-chain record a minted token points at. Published once, then
//! only ever re-fetched. The named academic attributes are optional so that
//! records pinned by other tools still deserialize; anything unrecognized
//! is preserved in `extra`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::Address;
use crate::reference::PublishedReference;
use crate::temporal::Timestamp;

/// Immutable academic credential record, serialized camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Recipient account, as written at issuance.
    pub recipient: String,
    /// Issuing account, as written at issuance.
    pub issuer: String,
    /// ISO-8601 issue time.
    pub issue_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    /// Grade metric (GPA or equivalent), kept as free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_date: Option<String>,
    /// Reference to the attachment (e.g. transcript), or empty when none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_file: Option<String>,
    /// Attributes this crate does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Inputs for composing a fresh [`CredentialMetadata`].
#[derive(Debug, Clone)]
pub struct AcademicRecord<'a> {
    pub recipient_name: &'a str,
    pub degree_type: &'a str,
    pub major: &'a str,
    pub gpa: &'a str,
    pub graduation_date: &'a str,
    pub description: &'a str,
}

impl CredentialMetadata {
    /// Compose the record written at issuance. The display name is
    /// `"<degree type> - <recipient name>"`.
    pub fn compose(
        record: &AcademicRecord<'_>,
        recipient: &Address,
        issuer: &Address,
        issued_at: Timestamp,
        attachment: Option<&PublishedReference>,
    ) -> Self {
        Self {
            name: format!("{} - {}", record.degree_type, record.recipient_name),
            description: record.description.to_string(),
            recipient: recipient.to_string(),
            issuer: issuer.to_string(),
            issue_date: issued_at.to_iso8601(),
            degree_type: Some(record.degree_type.to_string()),
            major: Some(record.major.to_string()),
            gpa: Some(record.gpa.to_string()),
            graduation_date: Some(record.graduation_date.to_string()),
            transcript_file: Some(attachment.map(|r| r.to_string()).unwrap_or_default()),
            extra: BTreeMap::new(),
        }
    }

    /// The attachment reference, if one was recorded.
    pub fn attachment(&self) -> Option<PublishedReference> {
        self.transcript_file
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| PublishedReference::parse(s).ok())
    }
}
