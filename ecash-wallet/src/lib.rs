//! Wallet orchestration on top of `ecash-core`: deterministic secrets,
//! output planning and the user-facing receive/send/mint/melt/restore
//! operations. No HTTP client, no persistence — both are injected by the
//! caller through [`client::MintConnector`].

pub mod client;
pub mod error;
pub mod planner;
pub mod secret;
pub mod wallet;

pub use error::WalletError;
pub use wallet::Wallet;
