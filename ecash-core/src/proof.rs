//! Spendable proofs: the bearer tokens this wallet holds and exchanges.

use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};

/// One unblinded signature over one secret — a single bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proof {
    #[serde(rename = "id")]
    pub keyset_id: String,
    pub amount: u64,
    pub secret: String,
    #[serde(rename = "C")]
    pub c: PublicKey,
}

/// A collection of proofs, as held in a wallet or carried in a token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proofs(Vec<Proof>);

impl Proofs {
    pub fn new(proofs: Vec<Proof>) -> Self {
        Self(proofs)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[Proof] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Proof> {
        self.0
    }

    pub fn total_amount(&self) -> u64 {
        self.0.iter().map(|p| p.amount).sum()
    }

    /// Greedily selects proofs in the given order until their sum is at
    /// least `target`, returning the selected proofs and the untouched
    /// remainder to keep, both in their original relative order. Returns
    /// `None` if the held proofs can't cover `target`.
    pub fn select_greedy(&self, target: u64) -> Option<(Proofs, Proofs)> {
        if self.total_amount() < target {
            return None;
        }

        let mut selected = Vec::new();
        let mut remaining = Vec::new();
        let mut sum = 0u64;
        for proof in self.0.iter().cloned() {
            if sum < target {
                sum += proof.amount;
                selected.push(proof);
            } else {
                remaining.push(proof);
            }
        }
        Some((Proofs(selected), Proofs(remaining)))
    }
}

impl From<Vec<Proof>> for Proofs {
    fn from(proofs: Vec<Proof>) -> Self {
        Self(proofs)
    }
}

impl IntoIterator for Proofs {
    type Item = Proof;
    type IntoIter = std::vec::IntoIter<Proof>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<Proof> for Proofs {
    fn from_iter<T: IntoIterator<Item = Proof>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
