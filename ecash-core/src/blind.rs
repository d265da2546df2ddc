//! Blinded messages and signatures, as exchanged during issuance and swap.
//! See [NUT-00](https://github.com/cashubtc/nuts/blob/main/00.md).

use secp256k1::{PublicKey, SecretKey};
use serde::{Deserialize, Serialize};

/// A signature on a blinded point, returned by the mint for one output of
/// a mint/swap/melt-change request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlindedSignature {
    /// The value of the blinded token.
    pub amount: u64,

    /// The blinded signature on the `b_` of the corresponding [`BlindedMessage`].
    #[serde(rename = "C_")]
    pub c_: PublicKey,

    /// ID of the keyset that signed the token.
    #[serde(rename = "id")]
    pub keyset_id: String,

    /// DLEQ proof, see [NUT-12](https://github.com/cashubtc/nuts/blob/main/12.md).
    /// Carried on the wire but not verified by this crate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dleq: Option<BlindSignatureDleq>,
}

/// A DLEQ proof attached to a [`BlindedSignature`], per NUT-12.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindSignatureDleq {
    pub e: SecretKey,
    pub s: SecretKey,
}

/// A blinded secret message, submitted to the mint for signing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlindedMessage {
    pub amount: u64,

    #[serde(rename = "B_")]
    pub b_: PublicKey,

    #[serde(rename = "id")]
    pub keyset_id: String,
}

/// The blinding factor `r` retained by the wallet for one output, so the
/// eventual signature can be unblinded.
#[derive(Debug, Clone)]
pub struct BlindingFactor(SecretKey);

impl From<SecretKey> for BlindingFactor {
    fn from(sk: SecretKey) -> Self {
        BlindingFactor(sk)
    }
}

impl TryFrom<&str> for BlindingFactor {
    type Error = crate::error::CoreError;

    fn try_from(hex: &str) -> Result<Self, Self::Error> {
        use std::str::FromStr;
        Ok(secp256k1::SecretKey::from_str(hex)?.into())
    }
}

impl BlindingFactor {
    pub fn as_hex(&self) -> String {
        hex::encode(self.0.secret_bytes())
    }

    pub fn to_secret_key(&self) -> SecretKey {
        self.0
    }
}

pub trait TotalAmount {
    fn total_amount(&self) -> u64;
}

impl TotalAmount for Vec<BlindedSignature> {
    fn total_amount(&self) -> u64 {
        self.iter().fold(0, |acc, x| acc + x.amount)
    }
}

impl TotalAmount for Vec<BlindedMessage> {
    fn total_amount(&self) -> u64 {
        self.iter().fold(0, |acc, x| acc + x.amount)
    }
}
