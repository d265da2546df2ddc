//! The mint transport seam. Everything in this crate is generic over
//! [`MintConnector`] — no HTTP client lives here, per spec.md §1's "HTTP
//! client to the mint" non-goal. A caller supplies a concrete
//! implementation (REST, in-process, a test double).

use async_trait::async_trait;
use ecash_core::blind::BlindedMessage;
use ecash_core::keyset::KeysetId;
use ecash_core::primitives::{
    CurrencyUnit, KeysResponse, KeysetsResponse, MeltQuoteResponse, MintInfoResponse,
    MintQuoteResponse, PostCheckStateResponse, PostMeltResponse, PostMintResponse,
    PostRestoreResponse, PostSwapResponse,
};
use ecash_core::proof::Proofs;

#[cfg(test)]
use mockall::automock;

use crate::error::WalletError;

/// The nine mint operations the wallet orchestrator needs, per spec.md
/// §6. Object-unsafe generics are avoided so this can be boxed or mocked;
/// `?Send` matches wasm targets that don't require `Send` futures, as the
/// teacher's `CashuClient` does.
#[cfg_attr(test, automock)]
#[async_trait(?Send)]
pub trait MintConnector {
    async fn get_keys(&self, keyset_id: Option<&KeysetId>) -> Result<KeysResponse, WalletError>;

    async fn get_keysets(&self) -> Result<KeysetsResponse, WalletError>;

    async fn mint_quote(
        &self,
        amount: u64,
        unit: CurrencyUnit,
    ) -> Result<MintQuoteResponse, WalletError>;

    async fn mint(
        &self,
        quote: &str,
        outputs: Vec<BlindedMessage>,
    ) -> Result<PostMintResponse, WalletError>;

    async fn melt_quote(
        &self,
        request: &str,
        unit: CurrencyUnit,
    ) -> Result<MeltQuoteResponse, WalletError>;

    async fn melt(
        &self,
        quote: &str,
        inputs: Proofs,
        outputs: Vec<BlindedMessage>,
    ) -> Result<PostMeltResponse, WalletError>;

    async fn swap(
        &self,
        inputs: Proofs,
        outputs: Vec<BlindedMessage>,
    ) -> Result<PostSwapResponse, WalletError>;

    async fn check(&self, secrets: Vec<String>) -> Result<PostCheckStateResponse, WalletError>;

    async fn restore(
        &self,
        outputs: Vec<BlindedMessage>,
    ) -> Result<PostRestoreResponse, WalletError>;

    async fn info(&self) -> Result<MintInfoResponse, WalletError>;
}
