//! Error types shared by every module in this crate.

use thiserror::Error;

/// Errors raised by the cryptographic core and its wire types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A preference list's amounts did not sum to the requested total, or
    /// contained an amount that is not a power of two.
    #[error("invalid amount preference")]
    InvalidPreference,

    /// The mint returned (or the caller supplied) a signature for an
    /// amount that has no corresponding key in the active keyset.
    #[error("unknown denomination: {0}")]
    UnknownDenomination(u64),

    /// A compressed secp256k1 point failed to decode.
    #[error("invalid point")]
    InvalidPoint(#[from] secp256k1::Error),

    /// A token string failed to decode as `cashuA` + base64url(JSON).
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// Hex decoding failed.
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// JSON (de)serialization failed.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding failed.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}
