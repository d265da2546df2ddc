//! The user-visible wallet operations: receive, send, mint, melt,
//! restore and check-spent. Composes the BDHKE engine, deterministic
//! secrets and output planner with an injected [`MintConnector`].
//!
//! Stateless between calls except for the cached active keyset
//! (spec.md §5) — proofs and counters are owned by the caller.

use ecash_core::amount::{split_amount, AmountPreference};
use ecash_core::dhke::Dhke;
use ecash_core::keyset::{Keys, KeysetId};
use ecash_core::primitives::{CurrencyUnit, MeltQuoteResponse, ProofState};
use ecash_core::proof::{Proof, Proofs};
use ecash_core::token::{Token, TokenEntry};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::client::MintConnector;
use crate::error::WalletError;
use crate::planner::{self, construct_proofs, plan_blank_outputs, plan_outputs};
use crate::secret::DeterministicSecret;

/// Either an already-decoded [`Token`] or its `cashuA...` wire encoding.
/// `receive` accepts both, per spec.md §4.6.
pub enum TokenInput {
    Decoded(Token),
    Encoded(String),
}

impl From<Token> for TokenInput {
    fn from(token: Token) -> Self {
        TokenInput::Decoded(token)
    }
}

impl From<String> for TokenInput {
    fn from(encoded: String) -> Self {
        TokenInput::Encoded(encoded)
    }
}

impl From<&str> for TokenInput {
    fn from(encoded: &str) -> Self {
        TokenInput::Encoded(encoded.to_string())
    }
}

/// Result of [`Wallet::receive`].
#[derive(Debug, Default)]
pub struct ReceiveResult {
    pub token: Vec<TokenEntry>,
    pub tokens_with_errors: Option<Vec<TokenEntry>>,
}

/// Result of [`Wallet::send`].
#[derive(Debug)]
pub struct SendResult {
    pub return_change: Proofs,
    pub send: Proofs,
}

/// Result of [`Wallet::melt_tokens`].
#[derive(Debug)]
pub struct MeltResult {
    pub paid: bool,
    pub preimage: Option<String>,
    pub change: Proofs,
}

/// The wallet orchestrator, generic over the injected mint transport.
///
/// `C` is the only cyclic-reference-free capability this type needs; see
/// spec.md §9's design note on expressing the mint as an interface
/// rather than a concrete type.
pub struct Wallet<C: MintConnector> {
    client: C,
    dhke: Dhke,
    secret: Option<DeterministicSecret>,
    unit: CurrencyUnit,
    active_keyset: RwLock<Option<Keys>>,
}

impl<C: MintConnector> Wallet<C> {
    pub fn new(client: C, unit: CurrencyUnit) -> Self {
        Self {
            client,
            dhke: Dhke::new(),
            secret: None,
            unit,
            active_keyset: RwLock::new(None),
        }
    }

    pub fn with_seed(client: C, unit: CurrencyUnit, seed: DeterministicSecret) -> Self {
        Self {
            client,
            dhke: Dhke::new(),
            secret: Some(seed),
            unit,
            active_keyset: RwLock::new(None),
        }
    }

    pub fn unit(&self) -> &CurrencyUnit {
        &self.unit
    }

    /// Returns the cached active keyset, fetching it from the mint on
    /// first use.
    async fn active_keyset(&self) -> Result<Keys, WalletError> {
        if let Some(keys) = self.active_keyset.read().await.as_ref() {
            return Ok(keys.clone());
        }
        let response = self.client.get_keys(None).await?;
        let keys = response.keysets.into_iter().next().ok_or_else(|| {
            WalletError::MintError {
                code: 0,
                detail: "mint returned no keysets".into(),
            }
        })?;
        *self.active_keyset.write().await = Some(keys.clone());
        Ok(keys)
    }

    /// Returns the keys for `keyset_id`, refreshing the cache if it
    /// currently holds a different keyset (spec.md §5: "refreshed when a
    /// proof's keyset id does not match the cache").
    async fn keyset_for(&self, keyset_id: &str) -> Result<Keys, WalletError> {
        if let Some(keys) = self.active_keyset.read().await.as_ref() {
            if keys.keyset_id.as_str() == keyset_id {
                return Ok(keys.clone());
            }
        }
        let id = KeysetId::new(keyset_id)?;
        let response = self.client.get_keys(Some(&id)).await?;
        let keys = response
            .keysets
            .into_iter()
            .find(|k| k.keyset_id.as_str() == keyset_id)
            .ok_or_else(|| WalletError::MintError {
                code: 0,
                detail: format!("mint has no keyset {keyset_id}"),
            })?;
        *self.active_keyset.write().await = Some(keys.clone());
        Ok(keys)
    }

    /// Swaps a token entry's proofs for fresh ones, per spec.md §4.6
    /// `receive`.
    async fn receive_entry(
        &self,
        entry: &TokenEntry,
        preference: Option<&[AmountPreference]>,
        counter: Option<u32>,
    ) -> Result<TokenEntry, WalletError> {
        let amount: u64 = entry.proofs.iter().map(|p| p.amount).sum();
        let amounts = split_amount(amount, preference)?;
        let keyset = self.active_keyset().await?;
        let plan = plan_outputs(
            &self.dhke,
            &amounts,
            &keyset.keyset_id,
            self.secret.as_ref(),
            counter,
        )?;

        let inputs: Proofs = entry.proofs.clone().into();
        let response = self
            .client
            .swap(inputs, plan.blinded_messages())
            .await?;
        let proofs = construct_proofs(&self.dhke, &plan, &response.signatures, &keyset)?;

        Ok(TokenEntry {
            mint: entry.mint.clone(),
            proofs,
        })
    }

    /// Redeems an incoming token's proofs for fresh ones from this
    /// wallet's mint. Per-entry failures are isolated into
    /// `tokens_with_errors` rather than aborting the whole call.
    #[instrument(skip(self, token), err)]
    pub async fn receive(
        &self,
        token: impl Into<TokenInput>,
        preference: Option<&[AmountPreference]>,
        counter: Option<u32>,
    ) -> Result<ReceiveResult, WalletError> {
        let token = match token.into() {
            TokenInput::Decoded(token) => token,
            TokenInput::Encoded(encoded) => Token::deserialize(&encoded)?,
        };

        let mut out = Vec::new();
        let mut errors = Vec::new();
        for entry in &token.token {
            if entry.proofs.is_empty() {
                continue;
            }
            match self.receive_entry(entry, preference, counter).await {
                Ok(redeemed) => out.push(redeemed),
                Err(_) => errors.push(entry.clone()),
            }
        }

        Ok(ReceiveResult {
            token: out,
            tokens_with_errors: (!errors.is_empty()).then_some(errors),
        })
    }

    /// Selects proofs covering `amount`, swapping for exact change if the
    /// selection overshoots or a preference narrows the denominations.
    #[instrument(skip(self, proofs), err)]
    pub async fn send(
        &self,
        amount: u64,
        proofs: &Proofs,
        preference: Option<&[AmountPreference]>,
        counter: Option<u32>,
    ) -> Result<SendResult, WalletError> {
        let target = match preference {
            Some(preference) => preference.iter().map(|p| p.amount * p.count).sum(),
            None => amount,
        };

        let (selected, untouched_keep) = proofs
            .select_greedy(target)
            .ok_or(WalletError::InsufficientFunds)?;
        let selected_sum = selected.total_amount();

        if selected_sum == target && preference.is_none() {
            return Ok(SendResult {
                return_change: untouched_keep,
                send: selected,
            });
        }

        let keyset = self.active_keyset().await?;
        let keep_amounts = split_amount(selected_sum - target, None)?;
        let send_amounts = split_amount(target, preference)?;

        let keep_plan = plan_outputs(
            &self.dhke,
            &keep_amounts,
            &keyset.keyset_id,
            self.secret.as_ref(),
            counter,
        )?;
        let send_counter = counter.map(|c| c + keep_plan.len() as u32);
        let send_plan = plan_outputs(
            &self.dhke,
            &send_amounts,
            &keyset.keyset_id,
            self.secret.as_ref(),
            send_counter,
        )?;

        let keep_len = keep_plan.len();
        let combined = keep_plan.concat(send_plan);

        let response = self
            .client
            .swap(selected, combined.blinded_messages())
            .await?;
        let proofs = construct_proofs(&self.dhke, &combined, &response.signatures, &keyset)?;

        let mut keep_proofs: Vec<Proof> = proofs[..keep_len].to_vec();
        let send_proofs: Vec<Proof> = proofs[keep_len..].to_vec();

        let mut return_change: Vec<Proof> = untouched_keep.into_vec();
        return_change.append(&mut keep_proofs);

        Ok(SendResult {
            return_change: return_change.into(),
            send: send_proofs.into(),
        })
    }

    /// Mints fresh proofs for a paid mint quote.
    #[instrument(skip(self), err)]
    pub async fn mint_tokens(
        &self,
        amount: u64,
        quote_id: &str,
        preference: Option<&[AmountPreference]>,
        counter: Option<u32>,
    ) -> Result<Proofs, WalletError> {
        let amounts = split_amount(amount, preference)?;
        let keyset = self.active_keyset().await?;
        let plan = plan_outputs(
            &self.dhke,
            &amounts,
            &keyset.keyset_id,
            self.secret.as_ref(),
            counter,
        )?;

        let response = self.client.mint(quote_id, plan.blinded_messages()).await?;
        let proofs = construct_proofs(&self.dhke, &plan, &response.signatures, &keyset)?;
        Ok(proofs.into())
    }

    /// Pays a melt quote, reserving blank outputs for NUT-08 fee change.
    #[instrument(skip(self, proofs_to_send), err)]
    pub async fn melt_tokens(
        &self,
        quote: &MeltQuoteResponse,
        proofs_to_send: Proofs,
        keyset_id: Option<&str>,
        counter: Option<u32>,
    ) -> Result<MeltResult, WalletError> {
        let keyset = match keyset_id {
            Some(id) => self.keyset_for(id).await?,
            None => self.active_keyset().await?,
        };

        let plan = plan_blank_outputs(
            &self.dhke,
            quote.fee_reserve,
            &keyset.keyset_id,
            self.secret.as_ref(),
            counter,
        )?;

        let response = self
            .client
            .melt(&quote.quote, proofs_to_send, plan.blinded_messages())
            .await?;

        let change = match response.change {
            Some(signatures) => construct_proofs(&self.dhke, &plan, &signatures, &keyset)?,
            None => Vec::new(),
        };

        Ok(MeltResult {
            paid: response.paid,
            preimage: response.payment_preimage,
            change: change.into(),
        })
    }

    /// Recovers proofs for a deterministic secret range the mint has
    /// previously signed. Requires a seed.
    #[instrument(skip(self), err)]
    pub async fn restore(
        &self,
        start: u32,
        count: u32,
        keyset_id: &str,
    ) -> Result<Proofs, WalletError> {
        if self.secret.is_none() {
            return Err(WalletError::NoSeed);
        }

        let id = KeysetId::new(keyset_id)?;
        let amounts = vec![0u64; count as usize];
        let plan = plan_outputs(&self.dhke, &amounts, &id, self.secret.as_ref(), Some(start))?;

        let response = self.client.restore(plan.blinded_messages()).await?;

        let mut matched_rs = Vec::new();
        let mut matched_secrets = Vec::new();
        for returned in &response.outputs {
            if let Some(pending) = plan
                .outputs
                .iter()
                .find(|o| o.blinded_message.b_ == returned.b_)
            {
                matched_rs.push(pending.r);
                matched_secrets.push(pending.secret.clone());
            }
        }

        let keyset = self.keyset_for(keyset_id).await?;
        let proofs = self.dhke.construct_proofs(
            &response.signatures,
            &matched_rs,
            &matched_secrets,
            &keyset,
        )?;
        Ok(proofs.into())
    }

    /// Returns the subset of `proofs` the mint reports as spent, in the
    /// order they were supplied.
    #[instrument(skip(self, proofs), err)]
    pub async fn check_spent(&self, proofs: &Proofs) -> Result<Proofs, WalletError> {
        let secrets: Vec<String> = proofs.as_slice().iter().map(|p| p.secret.clone()).collect();
        let response = self.client.check(secrets).await?;

        let spent: Vec<Proof> = proofs
            .as_slice()
            .iter()
            .zip(response.states.iter())
            .filter(|(_, status)| status.state == ProofState::Spent)
            .map(|(proof, _)| proof.clone())
            .collect();
        Ok(spent.into())
    }
}

/// Merges entries sharing the same mint url — the token-format
/// counterpart used after a `receive` so a caller can re-serialize a
/// tidy token. Thin wrapper around [`Token::clean`].
pub fn clean_token(token: Token) -> Token {
    token.clean()
}
