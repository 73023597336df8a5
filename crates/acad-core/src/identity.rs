//! # On-Chain Identifier Newtypes
//!
//! `Address` identifies an externally owned account or contract;
//! `TokenId` identifies a minted credential. Both are validated once at
//! construction and compared in normalized form afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A 20-byte account address rendered as `0x` + 40 hex digits.
///
/// Stored lowercase so that checksummed and non-checksummed spellings of
/// the same account compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// The all-zero address, used as the placeholder contract address when
    /// none is configured.
    pub fn zero() -> Self {
        Self(format!("0x{}", "0".repeat(40)))
    }

    /// Parse an address, accepting any letter case.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| CoreError::InvalidAddress {
                value: raw.to_string(),
                reason: "missing 0x prefix".to_string(),
            })?;
        if hex.len() != 40 {
            return Err(CoreError::InvalidAddress {
                value: raw.to_string(),
                reason: format!("expected 40 hex digits, got {}", hex.len()),
            });
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidAddress {
                value: raw.to_string(),
                reason: "contains non-hex characters".to_string(),
            });
        }
        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    /// The normalized string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0[2..].bytes().all(|b| b == b'0')
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

/// Identifier the registry assigns to a minted credential.
///
/// Kept as a decimal string because registry identifiers are `uint256`
/// and may exceed any native integer width. Leading zeros are stripped so
/// `"007"` and `"7"` name the same token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenId(String);

impl TokenId {
    /// Parse a decimal token identifier.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidTokenId(raw.to_string()));
        }
        let stripped = trimmed.trim_start_matches('0');
        let canonical = if stripped.is_empty() { "0" } else { stripped };
        Ok(Self(canonical.to_string()))
    }

    /// Build from a native integer.
    pub fn from_u64(value: u64) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TokenId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TokenId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TokenId> for String {
    fn from(value: TokenId) -> Self {
        value.0
    }
}
