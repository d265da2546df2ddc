//! Plans the outputs one round-trip to the mint needs: a list of
//! [`BlindedMessage`]s plus the `(secret, r)` retained to unblind the
//! mint's eventual signatures into proofs.
//!
//! Used uniformly by mint / swap / melt-change / restore — the teacher
//! inlines this three times (`create_blinded_messages`, `mint_tokens`'s
//! body, `create_blank`); this crate promotes it to the single entry
//! point spec.md §2 names as its own component.

use ecash_core::amount::blank_output_count;
use ecash_core::blind::BlindedMessage;
use ecash_core::dhke::Dhke;
use ecash_core::keyset::{Keys, KeysetId};
use rand::RngCore;
use secp256k1::SecretKey;

use crate::error::WalletError;
use crate::secret::DeterministicSecret;

/// One output plan still waiting on the mint's signature.
pub struct PendingOutput {
    pub blinded_message: BlindedMessage,
    pub secret: String,
    pub r: SecretKey,
}

/// The result of planning `n` outputs: parallel to each other and in the
/// order the caller must submit them to the mint.
pub struct OutputPlan {
    pub outputs: Vec<PendingOutput>,
}

impl OutputPlan {
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn blinded_messages(&self) -> Vec<BlindedMessage> {
        self.outputs
            .iter()
            .map(|o| o.blinded_message.clone())
            .collect()
    }

    pub fn secrets(&self) -> Vec<String> {
        self.outputs.iter().map(|o| o.secret.clone()).collect()
    }

    pub fn rs(&self) -> Vec<SecretKey> {
        self.outputs.iter().map(|o| o.r).collect()
    }

    /// Concatenates two plans, preserving order — used by `send` to
    /// submit one swap covering both the keep and send output groups.
    pub fn concat(mut self, mut other: OutputPlan) -> OutputPlan {
        self.outputs.append(&mut other.outputs);
        self
    }
}

/// Plans one output per entry of `amounts`, in order.
///
/// If `seed` and `counter` are both supplied, secrets and blinding
/// factors are derived deterministically from indices
/// `[counter, counter + amounts.len())`. Otherwise secrets are drawn from
/// a CSPRNG and blinding factors are sampled by [`Dhke::blind`].
///
/// Errors with [`WalletError::NoSeed`] if `counter` is supplied without a
/// seed — deterministic derivation needs both.
pub fn plan_outputs(
    dhke: &Dhke,
    amounts: &[u64],
    keyset_id: &KeysetId,
    seed: Option<&DeterministicSecret>,
    counter: Option<u32>,
) -> Result<OutputPlan, WalletError> {
    if counter.is_some() && seed.is_none() {
        return Err(WalletError::NoSeed);
    }

    let mut outputs = Vec::with_capacity(amounts.len());
    for (i, &amount) in amounts.iter().enumerate() {
        let (secret, r) = match (seed, counter) {
            (Some(seed), Some(counter)) => {
                let index = counter + i as u32;
                let secret = seed.derive_secret(keyset_id.as_int()?, index)?;
                let r = seed.derive_blinding_factor(keyset_id.as_int()?, index)?;
                (secret, Some(r.to_secret_key()))
            }
            _ => {
                let mut bytes = [0u8; 32];
                rand::thread_rng().fill_bytes(&mut bytes);
                (hex::encode(bytes), None)
            }
        };

        // The bytes fed to hash-to-curve are the hex *string*, UTF-8
        // encoded — not the raw secret bytes. Load-bearing: must match
        // the mint bit-exactly.
        let (b_, r) = dhke.blind(secret.as_bytes(), r)?;
        outputs.push(PendingOutput {
            blinded_message: BlindedMessage {
                amount,
                b_,
                keyset_id: keyset_id.to_string(),
            },
            secret,
            r,
        });
    }

    Ok(OutputPlan { outputs })
}

/// Plans the blank (amount-1) outputs NUT-08 uses to receive melt change:
/// `ceil(log2(fee_reserve))` outputs, clamped to at least 1 when
/// `fee_reserve > 0`.
pub fn plan_blank_outputs(
    dhke: &Dhke,
    fee_reserve: u64,
    keyset_id: &KeysetId,
    seed: Option<&DeterministicSecret>,
    counter: Option<u32>,
) -> Result<OutputPlan, WalletError> {
    let count = blank_output_count(fee_reserve);
    let amounts = vec![1u64; count as usize];
    plan_outputs(dhke, &amounts, keyset_id, seed, counter)
}

/// Unblinds a plan's outputs against the mint's returned signatures,
/// using `keys` to look up each denomination's mint public key.
pub fn construct_proofs(
    dhke: &Dhke,
    plan: &OutputPlan,
    signatures: &[ecash_core::blind::BlindedSignature],
    keys: &Keys,
) -> Result<Vec<ecash_core::proof::Proof>, WalletError> {
    let rs = plan.rs();
    let secrets = plan.secrets();
    Ok(dhke.construct_proofs(signatures, &rs, &secrets, keys)?)
}
