//! Cryptographic core and wire types for a Chaumian ecash wallet.
//!
//! Pure and I/O-free: no mint transport, no persistence, no async runtime.
//! See [`dhke`] for the blind Diffie-Hellman issuance protocol and
//! [`token`] for the shareable bearer-token format.

pub mod amount;
pub mod blind;
pub mod dhke;
pub mod error;
pub mod keyset;
pub mod primitives;
pub mod proof;
pub mod token;

pub use error::CoreError;
