//! Keyset identifiers and the public-key sets mints publish for them.

use std::collections::BTreeMap;

use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifies one keyset a mint has published, as a lowercase hex string
/// (currently always 16 hex chars / 8 bytes, per NUT-02).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeysetId(String);

impl KeysetId {
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        hex::decode(&id).map_err(CoreError::Hex)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 31-bit integer NUT-13 derives a BIP-32 path segment from: the
    /// low bytes of the keyset id hex, reduced into `[0, 2^31 - 2]`.
    pub fn as_int(&self) -> Result<u32, CoreError> {
        let bytes = hex::decode(&self.0).map_err(CoreError::Hex)?;
        let take = bytes.len().min(8);
        let mut buf = [0u8; 8];
        buf[8 - take..].copy_from_slice(&bytes[..take]);
        let value = u64::from_be_bytes(buf);
        Ok((value % (2u64.pow(31) - 1)) as u32)
    }
}

impl std::fmt::Display for KeysetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for KeysetId {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// The public keys a mint publishes for one keyset: one compressed point
/// per denomination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keys {
    pub keyset_id: KeysetId,
    pub keys: BTreeMap<u64, PublicKey>,
}

impl Keys {
    pub fn new(keyset_id: KeysetId, keys: BTreeMap<u64, PublicKey>) -> Self {
        Self { keyset_id, keys }
    }

    /// The mint's public key for a denomination, if this keyset has one.
    pub fn amount_key(&self, amount: u64) -> Option<&PublicKey> {
        self.keys.get(&amount)
    }
}

/// A mint's advertised keysets, without their keys — used to pick the
/// active keyset and check which ones a proof might belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysetInfo {
    pub id: KeysetId,
    pub unit: String,
    pub active: bool,
}
