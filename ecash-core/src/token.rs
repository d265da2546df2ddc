//! The `cashuA<base64url(json)>` wire format for sharing proofs out of band.
//! See [NUT-00](https://github.com/cashubtc/nuts/blob/main/00.md).

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;
use crate::proof::Proof;

const TOKEN_PREFIX: &str = "cashuA";

/// All proofs from a single mint, as carried in one [`TokenEntry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEntry {
    pub mint: Url,
    pub proofs: Vec<Proof>,
}

/// A shareable token: proofs grouped by the mint that issued them, plus an
/// optional memo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub token: Vec<TokenEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl Token {
    pub fn new(mint: Url, proofs: Vec<Proof>, memo: Option<String>) -> Self {
        Self {
            token: vec![TokenEntry { mint, proofs }],
            memo,
        }
    }

    pub fn total_amount(&self) -> u64 {
        self.token
            .iter()
            .flat_map(|entry| entry.proofs.iter())
            .map(|p| p.amount)
            .sum()
    }

    /// Encodes as `cashuA` + base64url(JSON), no padding.
    pub fn serialize(&self) -> Result<String, CoreError> {
        let json = serde_json::to_vec(self)?;
        Ok(format!("{TOKEN_PREFIX}{}", URL_SAFE_NO_PAD.encode(json)))
    }

    /// Decodes a `cashuA...` string. Entries with no proofs are dropped —
    /// a mint the sender briefly referenced but sent nothing from carries
    /// no information for the receiver.
    pub fn deserialize(token_str: &str) -> Result<Self, CoreError> {
        let encoded = token_str
            .strip_prefix(TOKEN_PREFIX)
            .ok_or_else(|| CoreError::MalformedToken(format!("missing {TOKEN_PREFIX} prefix")))?;
        let json = URL_SAFE_NO_PAD.decode(encoded)?;
        let mut token: Token = serde_json::from_slice(&json)?;
        token.token.retain(|entry| !entry.proofs.is_empty());
        if token.token.is_empty() {
            return Err(CoreError::MalformedToken("token has no proofs".into()));
        }
        Ok(token)
    }

    /// Merges entries that share a mint url into one, preserving proof order.
    pub fn clean(self) -> Self {
        let mut merged: Vec<TokenEntry> = Vec::new();
        for entry in self.token {
            if entry.proofs.is_empty() {
                continue;
            }
            if let Some(existing) = merged.iter_mut().find(|e| e.mint == entry.mint) {
                existing.proofs.extend(entry.proofs);
            } else {
                merged.push(entry);
            }
        }
        Self {
            token: merged,
            memo: self.memo,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn proof(amount: u64) -> Proof {
        let secp = secp256k1::Secp256k1::new();
        let sk = secp256k1::SecretKey::from_slice(&[amount as u8 + 1; 32]).unwrap();
        Proof {
            keyset_id: "00deadbeef".into(),
            amount,
            secret: format!("secret-{amount}"),
            c: sk.public_key(&secp),
        }
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let mint: Url = "https://mint.example".parse().unwrap();
        let token = Token::new(mint, vec![proof(1), proof(2)], Some("thanks".into()));
        let serialized = token.serialize().unwrap();
        assert!(serialized.starts_with(TOKEN_PREFIX));

        let decoded = Token::deserialize(&serialized).unwrap();
        assert_eq!(decoded.total_amount(), 3);
        assert_eq!(decoded.memo, Some("thanks".into()));
    }

    #[test]
    fn test_deserialize_rejects_missing_prefix() {
        assert!(Token::deserialize("not-a-token").is_err());
    }

    #[test]
    fn test_deserialize_drops_empty_entries() {
        let mint: Url = "https://mint.example".parse().unwrap();
        let token = Token {
            token: vec![
                TokenEntry {
                    mint: mint.clone(),
                    proofs: vec![],
                },
                TokenEntry {
                    mint,
                    proofs: vec![proof(4)],
                },
            ],
            memo: None,
        };
        let serialized = token.serialize().unwrap();
        let decoded = Token::deserialize(&serialized).unwrap();
        assert_eq!(decoded.token.len(), 1);
        assert_eq!(decoded.total_amount(), 4);
    }

    #[test]
    fn test_clean_merges_same_mint_entries() {
        let mint: Url = "https://mint.example".parse().unwrap();
        let token = Token {
            token: vec![
                TokenEntry {
                    mint: mint.clone(),
                    proofs: vec![proof(1)],
                },
                TokenEntry {
                    mint,
                    proofs: vec![proof(2)],
                },
            ],
            memo: None,
        };
        let cleaned = token.clean();
        assert_eq!(cleaned.token.len(), 1);
        assert_eq!(cleaned.total_amount(), 3);
    }
}
