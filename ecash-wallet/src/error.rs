//! Errors raised by the wallet orchestrator, deterministic-secret
//! derivation and output planning.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    /// The proofs selected for a `send` don't cover the requested amount.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// A deterministic operation (a supplied counter) was requested
    /// without a seed to derive from.
    #[error("no seed configured for deterministic derivation")]
    NoSeed,

    /// A BIP-39 mnemonic failed validation (bad wordlist entry or checksum).
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(#[from] bip39::Error),

    /// The mint returned a structured error body.
    #[error("mint error {code}: {detail}")]
    MintError { code: u32, detail: String },

    #[error(transparent)]
    Core(#[from] ecash_core::CoreError),

    #[error("bip32 derivation error: {0}")]
    Bip32(#[from] bip32::Error),
}
