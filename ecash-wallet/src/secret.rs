//! Deterministic secret and blinding-factor derivation from a BIP-39 seed.
//!
//! See [NUT-13](https://github.com/cashubtc/nuts/blob/main/13.md): every
//! output of a deterministic wallet derives its secret and blinding
//! factor from `m/129372'/0'/{keyset}'/{counter}'/{0 or 1}'`, so the whole
//! proof set can be recovered from the mnemonic alone.

use std::str::FromStr;

use bip32::{Seed, XPrv};
use bip39::Mnemonic;
use ecash_core::blind::BlindingFactor;
use ecash_core::keyset::KeysetId;
use rand::Rng;
use secp256k1::SecretKey;

use crate::error::WalletError;

/// Selects which of the two sibling paths (NUT-13 §"deriving secrets and
/// blinding factors") to derive: `.../0'` for the secret, `.../1'` for `r`.
enum DerivationType {
    Secret = 0,
    Blinding = 1,
}

/// A BIP-39 seed plus the path-derivation logic layered on top of it.
pub struct DeterministicSecret {
    seed: Seed,
}

impl Clone for DeterministicSecret {
    fn clone(&self) -> Self {
        Self {
            seed: Seed::new(*self.seed.as_bytes()),
        }
    }
}

impl DeterministicSecret {
    pub fn from_seed_words(seed_words: &str) -> Result<Self, WalletError> {
        let mnemonic = Mnemonic::from_str(seed_words)?;
        let seed = Seed::new(mnemonic.to_seed(""));
        Ok(Self { seed })
    }

    pub fn from_random_seed() -> Result<Self, WalletError> {
        let mut rng = rand::thread_rng();
        let entropy: [u8; 16] = rng.gen();
        let mnemonic = Mnemonic::from_entropy(&entropy)?;
        let seed = Seed::new(mnemonic.to_seed(""));
        Ok(Self { seed })
    }

    pub fn generate_random_seed_words() -> Result<String, WalletError> {
        let mut rng = rand::thread_rng();
        let entropy: [u8; 16] = rng.gen();
        let mnemonic = Mnemonic::from_entropy(&entropy)?;
        Ok(mnemonic.words().collect::<Vec<&str>>().join(" "))
    }

    fn derive_private_key(
        &self,
        keyset_id: u32,
        counter: u32,
        branch: DerivationType,
    ) -> Result<[u8; 32], WalletError> {
        let branch = branch as u32;
        let path = format!("m/129372'/0'/{keyset_id}'/{counter}'/{branch}");
        let path = bip32::DerivationPath::from_str(&path)?;
        let key = XPrv::derive_from_path(&self.seed, &path)?;
        let bytes = key.private_key().to_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(out)
    }

    /// The hex-encoded secret for one `(keyset, counter)` output — this is
    /// the exact byte string that later gets UTF-8 encoded and fed to
    /// `hash_to_curve` by the output planner (spec: hex-then-encode).
    pub fn derive_secret(&self, keyset_id: u32, counter: u32) -> Result<String, WalletError> {
        let key = self.derive_private_key(keyset_id, counter, DerivationType::Secret)?;
        Ok(hex::encode(key))
    }

    pub fn derive_blinding_factor(
        &self,
        keyset_id: u32,
        counter: u32,
    ) -> Result<BlindingFactor, WalletError> {
        let key = self.derive_private_key(keyset_id, counter, DerivationType::Blinding)?;
        Ok(SecretKey::from_slice(&key)?.into())
    }

    /// Derives `length` consecutive `(secret, blinding factor)` pairs
    /// starting at `start`, in order — the shape the output planner
    /// consumes directly.
    pub fn derive_range(
        &self,
        keyset_id: &KeysetId,
        start: u32,
        length: u32,
    ) -> Result<Vec<(String, BlindingFactor)>, WalletError> {
        let keyset_int = keyset_id.as_int()?;
        (start..start + length)
            .map(|i| {
                let secret = self.derive_secret(keyset_int, i)?;
                let blinding_factor = self.derive_blinding_factor(keyset_int, i)?;
                Ok((secret, blinding_factor))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use ecash_core::keyset::KeysetId;
    use pretty_assertions::assert_eq;

    use super::DeterministicSecret;

    const PHRASE: &str =
        "half depart obvious quality work element tank gorilla view sugar picture humble";

    #[test]
    fn test_generate_seed_words() {
        let seed_words = DeterministicSecret::generate_random_seed_words().unwrap();
        assert_eq!(12, seed_words.split_whitespace().count());
    }

    #[test]
    fn test_secret_derivation_matches_known_vectors() {
        let deterministic_secret = DeterministicSecret::from_seed_words(PHRASE).unwrap();

        let secrets = [
            "485875df74771877439ac06339e284c3acfcd9be7abf3bc20b516faeadfe77ae",
            "8f2b39e8e594a4056eb1e6dbb4b0c38ef13b1b2c751f64f810ec04ee35b77270",
            "bc628c79accd2364fd31511216a0fab62afd4a18ff77a20deded7b858c9860c8",
            "59284fd1650ea9fa17db2b3acf59ecd0f2d52ec3261dd4152785813ff27a33bf",
            "576c23393a8b31cc8da6688d9c9a96394ec74b40fdaf1f693a6bb84284334ea0",
        ];

        for (i, secret) in secrets.iter().enumerate() {
            let key = deterministic_secret
                .derive_secret(864559728, i as u32)
                .unwrap();
            assert_eq!(secret.to_owned(), key);
        }

        let blinding_factors = [
            "ad00d431add9c673e843d4c2bf9a778a5f402b985b8da2d5550bf39cda41d679",
            "967d5232515e10b81ff226ecf5a9e2e2aff92d66ebc3edf0987eb56357fd6248",
            "b20f47bb6ae083659f3aa986bfa0435c55c6d93f687d51a01f26862d9b9a4899",
            "fb5fca398eb0b1deb955a2988b5ac77d32956155f1c002a373535211a2dfdc29",
            "5f09bfbfe27c439a597719321e061e2e40aad4a36768bb2bcc3de547c9644bf9",
        ];

        for (i, factor) in blinding_factors.iter().enumerate() {
            let key = deterministic_secret
                .derive_blinding_factor(864559728, i as u32)
                .unwrap();
            assert_eq!(factor.to_owned(), key.as_hex());
        }
    }

    #[test]
    fn test_secret_range_matches_individual_derivation() {
        let deterministic_secret = DeterministicSecret::from_seed_words(PHRASE).unwrap();
        let keyset_id = KeysetId::new("009a1f293253e41e").unwrap();

        let range = deterministic_secret.derive_range(&keyset_id, 0, 5).unwrap();
        for (i, (secret, blinding_factor)) in range.iter().enumerate() {
            assert_eq!(
                secret,
                &deterministic_secret
                    .derive_secret(864559728, i as u32)
                    .unwrap()
            );
            assert_eq!(
                blinding_factor.as_hex(),
                deterministic_secret
                    .derive_blinding_factor(864559728, i as u32)
                    .unwrap()
                    .as_hex()
            );
        }
    }
}
