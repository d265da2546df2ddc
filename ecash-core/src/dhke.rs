//! Blind Diffie-Hellman key exchange (BDHKE).
//!
//! This is the issuance protocol: the wallet blinds a secret, the mint
//! signs the blinded point without learning the secret, and the wallet
//! unblinds the signature into a spendable proof. See
//! <https://github.com/cashubtc/nuts/blob/main/00.md>.

use bitcoin_hashes::{sha256, Hash};
use once_cell::sync::Lazy;
use secp256k1::{All, PublicKey, Scalar, Secp256k1, SecretKey};

use crate::error::CoreError;
use crate::keyset::Keys;
use crate::proof::Proof;

/// Shared secp256k1 context, created once per process.
pub static SECP256K1: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

const DOMAIN_SEPARATOR: &[u8] = b"Secp256k1_HashToCurve_Cashu_";

/// Hashes an arbitrary message onto the secp256k1 curve.
///
/// Iterates `h = SHA256(DOMAIN_SEPARATOR || msg || counter_le32)`,
/// interpreting `h` as the x-coordinate of a compressed point (prefix
/// `0x02`), incrementing `counter` until a valid point decodes. Must match
/// the mint bit-exactly.
pub fn hash_to_curve(message: &[u8]) -> Result<PublicKey, CoreError> {
    let mut counter: u32 = 0;
    loop {
        let mut buf = Vec::with_capacity(DOMAIN_SEPARATOR.len() + message.len() + 4);
        buf.extend_from_slice(DOMAIN_SEPARATOR);
        buf.extend_from_slice(message);
        buf.extend_from_slice(&counter.to_le_bytes());
        let hash = sha256::Hash::hash(&buf);

        let mut candidate = [0u8; 33];
        candidate[0] = 0x02;
        candidate[1..].copy_from_slice(hash.to_byte_array().as_slice());

        match PublicKey::from_slice(&candidate) {
            Ok(point) => return Ok(point),
            Err(_) => counter += 1,
        }
    }
}

/// The BDHKE engine. Stateless beyond the shared curve context; kept as a
/// small struct (rather than free functions) so callers can hold one
/// instance instead of touching [`SECP256K1`] directly everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dhke;

impl Dhke {
    pub fn new() -> Self {
        Self
    }

    /// Alice step 1: blind a secret message.
    ///
    /// `secret_bytes` is the exact byte string fed to [`hash_to_curve`] —
    /// for proofs this is the hex-encoded secret, UTF-8 encoded (64 ASCII
    /// bytes), not the raw 32-byte secret. Samples `r` uniformly if not
    /// supplied.
    pub fn blind(
        &self,
        secret_bytes: &[u8],
        r: Option<SecretKey>,
    ) -> Result<(PublicKey, SecretKey), CoreError> {
        let y = hash_to_curve(secret_bytes)?;
        let r = r.unwrap_or_else(|| SecretKey::new(&mut secp256k1::rand::thread_rng()));
        let r_pub = r.public_key(&SECP256K1);
        let b_ = y.combine(&r_pub)?;
        Ok((b_, r))
    }

    /// Alice step 3: unblind a mint signature. `c_ = k*B_`, `K = k*G`.
    pub fn unblind(&self, c_: PublicKey, r: SecretKey, k: PublicKey) -> Result<PublicKey, CoreError> {
        let r_scalar = Scalar::from(r);
        let r_k = k.mul_tweak(&SECP256K1, &r_scalar)?;
        let c = c_.combine(&r_k.negate(&SECP256K1))?;
        Ok(c)
    }

    /// Pairs mint signatures with the retained `(r, secret)` for each
    /// output and unblinds them into spendable proofs.
    ///
    /// `signatures`, `rs` and `secrets` must have equal length — a
    /// mismatch means the caller mixed up two unrelated plans, which is a
    /// programming error rather than something to recover from.
    pub fn construct_proofs(
        &self,
        signatures: &[crate::blind::BlindedSignature],
        rs: &[SecretKey],
        secrets: &[String],
        keys: &Keys,
    ) -> Result<Vec<Proof>, CoreError> {
        assert_eq!(signatures.len(), rs.len());
        assert_eq!(signatures.len(), secrets.len());

        signatures
            .iter()
            .zip(rs)
            .zip(secrets)
            .map(|((signature, r), secret)| {
                let k = keys
                    .amount_key(signature.amount)
                    .ok_or(CoreError::UnknownDenomination(signature.amount))?;
                let c = self.unblind(signature.c_, *r, *k)?;
                Ok(Proof {
                    keyset_id: signature.keyset_id.clone(),
                    amount: signature.amount,
                    secret: secret.clone(),
                    c,
                })
            })
            .collect()
    }
}
