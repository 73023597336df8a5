//! # Error Types
//!
//! Validation failures for the core newtypes. Component crates define their
//! own error enums and wrap `CoreError` where a request fails validation.

use thiserror::Error;

/// Errors raised while constructing core domain types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An account address was not a `0x`-prefixed 20-byte hex string.
    #[error("invalid address {value:?}: {reason}")]
    InvalidAddress {
        /// The rejected input.
        value: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A token identifier was not a non-negative decimal integer.
    #[error("invalid token id {0:?}: expected a decimal integer")]
    InvalidTokenId(String),

    /// A content reference did not use the `ipfs://` scheme or had no hash.
    #[error("invalid content reference {0:?}")]
    InvalidReference(String),

    /// A timestamp string was not RFC 3339 UTC.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
}
