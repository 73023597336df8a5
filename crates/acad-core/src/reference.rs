//! # Content References
//!
//! A [`PublishedReference`] names content in the content-addressed
//! namespace: the `ipfs://` scheme followed by an opaque content hash.
//! Both real pins and synthetic local-fallback references share this shape,
//! so callers cannot tell (and need not care) which path produced one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// URI scheme prefix for every published reference.
pub const IPFS_SCHEME: &str = "ipfs://";

/// URI-shaped reference to previously published content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublishedReference(String);

impl PublishedReference {
    /// Wrap a bare content hash (e.g. `QmXyz...`) in the `ipfs://` scheme.
    pub fn from_hash(hash: &str) -> Result<Self, CoreError> {
        let hash = hash.trim();
        if hash.is_empty() || hash.contains('/') || hash.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidReference(hash.to_string()));
        }
        Ok(Self(format!("{IPFS_SCHEME}{hash}")))
    }

    /// Parse a full `ipfs://<hash>` URI.
    pub fn parse(uri: &str) -> Result<Self, CoreError> {
        let hash = uri
            .trim()
            .strip_prefix(IPFS_SCHEME)
            .ok_or_else(|| CoreError::InvalidReference(uri.to_string()))?;
        Self::from_hash(hash)
    }

    /// The content hash without the scheme prefix.
    pub fn content_hash(&self) -> &str {
        &self.0[IPFS_SCHEME.len()..]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublishedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PublishedReference {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PublishedReference> for String {
    fn from(value: PublishedReference) -> Self {
        value.0
    }
}
