//! Wire DTOs exchanged with a mint, independent of any particular payment
//! rail. Mirrors the mint HTTP API's JSON bodies without depending on an
//! HTTP client or server framework.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::blind::{BlindedMessage, BlindedSignature};
use crate::keyset::{Keys, KeysetInfo};
use crate::proof::Proofs;

/// The unit an amount is denominated in. Mints may advertise units this
/// crate doesn't know about by name, hence [`CurrencyUnit::Custom`].
///
/// Serializes/deserializes as the lowercase string from [`Display`]/
/// [`FromStr`] below rather than a derived tagged representation, since
/// an externally-tagged enum can't fold an open-ended `Custom(String)`
/// variant into the same wire shape as its fixed variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CurrencyUnit {
    Sat,
    Msat,
    Usd,
    Eur,
    Custom(String),
}

impl Serialize for CurrencyUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CurrencyUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().expect("CurrencyUnit::from_str is infallible"))
    }
}

impl Display for CurrencyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sat => write!(f, "sat"),
            Self::Msat => write!(f, "msat"),
            Self::Usd => write!(f, "usd"),
            Self::Eur => write!(f, "eur"),
            Self::Custom(unit) => write!(f, "{unit}"),
        }
    }
}

impl FromStr for CurrencyUnit {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "sat" => Self::Sat,
            "msat" => Self::Msat,
            "usd" => Self::Usd,
            "eur" => Self::Eur,
            other => Self::Custom(other.to_string()),
        })
    }
}

/// `GET /v1/keys` and `GET /v1/keys/{keyset_id}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysResponse {
    pub keysets: Vec<Keys>,
}

impl KeysResponse {
    pub fn new(keyset: Keys) -> Self {
        Self {
            keysets: vec![keyset],
        }
    }
}

/// `GET /v1/keysets` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysetsResponse {
    pub keysets: Vec<KeysetInfo>,
}

/// `POST /v1/mint/quote/{method}` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMintQuoteRequest {
    pub amount: u64,
    pub unit: CurrencyUnit,
}

/// `POST /v1/mint/quote/{method}` and `GET .../{quote_id}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintQuoteResponse {
    pub quote: String,
    pub request: String,
    pub paid: bool,
    pub expiry: u64,
}

/// `POST /v1/mint/{method}` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMintRequest {
    pub quote: String,
    pub outputs: Vec<BlindedMessage>,
}

/// `POST /v1/mint/{method}` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostMintResponse {
    pub signatures: Vec<BlindedSignature>,
}

/// `POST /v1/melt/quote/{method}` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMeltQuoteRequest {
    pub request: String,
    pub unit: CurrencyUnit,
}

/// `POST /v1/melt/quote/{method}` and `GET .../{quote_id}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeltQuoteResponse {
    pub quote: String,
    pub amount: u64,
    pub fee_reserve: u64,
    pub paid: bool,
    pub expiry: u64,
}

/// `POST /v1/melt/{method}` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMeltRequest {
    pub quote: String,
    pub inputs: Proofs,
    /// Blank outputs for NUT-08 fee-reserve change; may be empty.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub outputs: Vec<BlindedMessage>,
}

/// `POST /v1/melt/{method}` response.
///
/// `paid` defaults to `false` on deserialization if the mint omits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMeltResponse {
    #[serde(default)]
    pub paid: bool,
    pub payment_preimage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<Vec<BlindedSignature>>,
}

/// `POST /v1/swap` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSwapRequest {
    pub inputs: Proofs,
    pub outputs: Vec<BlindedMessage>,
}

/// `POST /v1/swap` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostSwapResponse {
    pub signatures: Vec<BlindedSignature>,
}

/// `POST /v1/checkstate` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCheckStateRequest {
    #[serde(rename = "Ys")]
    pub ys: Vec<String>,
}

/// Lifecycle state of a proof, as reported by the mint's check-state
/// endpoint (NUT-07).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProofState {
    Unspent,
    Pending,
    Spent,
}

impl Display for ProofState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unspent => write!(f, "UNSPENT"),
            Self::Pending => write!(f, "PENDING"),
            Self::Spent => write!(f, "SPENT"),
        }
    }
}

/// One proof's reported state in a [`PostCheckStateResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofStatus {
    #[serde(rename = "Y")]
    pub y: String,
    pub state: ProofState,
    pub witness: Option<String>,
}

/// `POST /v1/checkstate` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCheckStateResponse {
    pub states: Vec<ProofStatus>,
}

/// `POST /v1/restore` request — NUT-09 recovery of proofs for a
/// deterministically derived secret range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRestoreRequest {
    pub outputs: Vec<BlindedMessage>,
}

/// `POST /v1/restore` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRestoreResponse {
    pub outputs: Vec<BlindedMessage>,
    pub signatures: Vec<BlindedSignature>,
}

/// `GET /v1/info` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintInfoResponse {
    pub name: Option<String>,
    pub pubkey: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_serialize_empty_swap_response() {
        let response = PostSwapResponse::default();
        let serialized = serde_json::to_string(&response).unwrap();
        assert_eq!(serialized, "{\"signatures\":[]}");
    }

    #[test]
    fn test_currency_unit_roundtrips_through_display_and_fromstr() {
        for unit in [CurrencyUnit::Sat, CurrencyUnit::Usd, CurrencyUnit::Eur] {
            let parsed: CurrencyUnit = unit.to_string().parse().unwrap();
            assert_eq!(parsed, unit);
        }
    }

    #[test]
    fn test_unknown_currency_unit_becomes_custom() {
        let parsed: CurrencyUnit = "gbp".parse().unwrap();
        assert_eq!(parsed, CurrencyUnit::Custom("gbp".into()));
    }

    #[test]
    fn test_serialize_mint_info() {
        let mint_info = MintInfoResponse {
            name: Some("Example Mint".to_string()),
            pubkey: None,
            version: Some("0.1.0".to_string()),
            description: None,
        };
        let out = serde_json::to_string(&mint_info).unwrap();
        assert!(out.contains("Example Mint"));
    }
}
