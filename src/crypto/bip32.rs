//! BIP-32 / SLIP-0010 Hierarchical Deterministic Keys
//!
//! Master key generation and child key derivation (CKD) over every curve in
//! [`CurveType`]. The engine is curve-agnostic: curve arithmetic lives in
//! [`crate::crypto::curves`], this module owns the HMAC chaining, depth and
//! fingerprint bookkeeping and the resample-on-invalid-child rule.
//!
//! SECURITY: private scalars are held in [`Zeroizing`] buffers and never
//! appear in `Debug` output.

use std::fmt;

use zeroize::Zeroizing;

use crate::crypto::curves::{self, CurveError, CurveType, PublicKey};
use crate::error::{DerivationError, DeriveResult};
use crate::utils::{base58check_encode, hash160, hmac_sha512};
use crate::wallet::derivation_path::{DerivationComponent, DerivationPath};
use crate::log_warn;

/// Child indices at or above this value are hardened
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Upper bound on index increments when a child key is invalid
pub const MAX_RESAMPLE_ATTEMPTS: u32 = 16;

/// Seeds outside 128..=512 bits are rejected
pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

/// Serialization version bytes for mainnet extended keys
const XPRV_VERSION: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];
const XPUB_VERSION: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];

/// A node in the key tree: key material plus chain code and position
#[derive(Clone)]
pub struct ExtendedKey {
    curve: CurveType,
    private_key: Option<Zeroizing<[u8; 32]>>,
    public_key: PublicKey,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_index: u32,
}

impl ExtendedKey {
    /// Master node from a BIP-39 seed.
    ///
    /// `I = HMAC-SHA512(curve seed key, seed)`; `I_L` is the master private
    /// key and `I_R` the chain code. An `I_L` the curve rejects is reported
    /// as [`DerivationError::InvalidSeed`] and not retried.
    pub fn master(seed: &[u8], curve: CurveType) -> DeriveResult<Self> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
            return Err(DerivationError::invalid_parameter(format!(
                "Seed must be {}-{} bytes, got {}",
                MIN_SEED_LEN,
                MAX_SEED_LEN,
                seed.len()
            )));
        }

        let i = hmac_sha512(curve.master_hmac_key(), &[seed])
            .map_err(|e| DerivationError::invalid_parameter(format!("HMAC key: {}", e)))?;
        let (il, ir) = split_hmac(&i);

        let private_key = Zeroizing::new(
            curves::master_private(curve, &il).map_err(|_| DerivationError::InvalidSeed { curve })?,
        );
        let public_key = curves::public_key_from_private(curve, &private_key)?;

        Ok(Self {
            curve,
            private_key: Some(private_key),
            public_key,
            chain_code: ir,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_index: 0,
        })
    }

    /// CKD for a single step.
    ///
    /// `index >= 2^31` selects hardened derivation, which needs the private
    /// key. Normal derivation is refused on curves without a public
    /// derivation law. When the candidate child is invalid the next index is
    /// tried, without crossing the hardened boundary, up to
    /// [`MAX_RESAMPLE_ATTEMPTS`] times.
    pub fn derive_child(&self, index: u32) -> DeriveResult<Self> {
        let hardened = is_hardened(index);

        if hardened && self.private_key.is_none() {
            return Err(DerivationError::HardenedRequiresPrivateKey { index });
        }
        if !hardened && !self.curve.supports_normal_derivation() {
            return Err(DerivationError::UnsupportedNormalDerivation {
                curve: self.curve,
                index,
            });
        }
        if self.depth == u8::MAX {
            return Err(DerivationError::invalid_parameter(format!(
                "Key at depth {} cannot have children",
                self.depth
            )));
        }

        resample(index, |candidate| self.ckd(candidate))
    }

    /// Fold [`derive_child`](Self::derive_child) over `path`.
    ///
    /// The first failure is wrapped with the path prefix that failed and its
    /// zero-based step.
    pub fn derive_path(&self, path: &DerivationPath) -> DeriveResult<Self> {
        self.derive_path_traced(path).map(|(key, _)| key)
    }

    /// Like [`derive_path`](Self::derive_path), also returning the path
    /// actually walked. It differs from `path` only where a step resampled.
    pub fn derive_path_traced(&self, path: &DerivationPath) -> DeriveResult<(Self, DerivationPath)> {
        if self.depth as usize + path.len() > u8::MAX as usize {
            return Err(DerivationError::invalid_parameter(format!(
                "Path of {} steps from depth {} exceeds maximum depth {}",
                path.len(),
                self.depth,
                u8::MAX
            )));
        }

        walk_path(self.clone(), path, |key, index| key.derive_child(index), Self::child_index)
    }

    /// Public-only copy of this key
    pub fn neuter(&self) -> Self {
        Self {
            private_key: None,
            ..self.clone()
        }
    }

    /// First 4 bytes of HASH160 of the (padded) public key
    pub fn fingerprint(&self) -> [u8; 4] {
        let id = hash160(&self.public_key.fingerprint_bytes());
        [id[0], id[1], id[2], id[3]]
    }

    pub fn curve(&self) -> CurveType {
        self.curve
    }

    pub fn private_key(&self) -> Option<&[u8; 32]> {
        self.private_key.as_deref()
    }

    pub fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// Index this key was derived at, hardened bit included
    pub fn child_index(&self) -> u32 {
        self.child_index
    }

    pub fn private_key_hex(&self) -> Option<String> {
        self.private_key.as_ref().map(|k| hex::encode(k.as_slice()))
    }

    /// BIP-32 `xprv`/`xpub` serialization (secp256k1 only).
    ///
    /// Keys holding a private scalar serialize as `xprv`.
    pub fn to_extended_string(&self) -> DeriveResult<String> {
        if self.curve != CurveType::Secp256k1 {
            return Err(DerivationError::unsupported(format!(
                "Extended key serialization is not defined for {}",
                self.curve
            )));
        }

        let mut data = Zeroizing::new(Vec::with_capacity(78));
        if self.private_key.is_some() {
            data.extend_from_slice(&XPRV_VERSION);
        } else {
            data.extend_from_slice(&XPUB_VERSION);
        }
        data.push(self.depth);
        data.extend_from_slice(&self.parent_fingerprint);
        data.extend_from_slice(&self.child_index.to_be_bytes());
        data.extend_from_slice(&self.chain_code);
        match &self.private_key {
            Some(private_key) => {
                data.push(0x00);
                data.extend_from_slice(private_key.as_slice());
            }
            None => data.extend_from_slice(&self.public_key.fingerprint_bytes()),
        }

        Ok(base58check_encode(&data, bs58::Alphabet::BITCOIN))
    }

    /// One CKD attempt at exactly `index`
    fn ckd(&self, index: u32) -> Result<Self, CurveError> {
        let index_bytes = index.to_be_bytes();
        let public_bytes;

        let i = match (is_hardened(index), &self.private_key) {
            (true, Some(private_key)) => {
                hmac_sha512(&self.chain_code, &[&[0x00u8][..], &private_key[..], &index_bytes[..]])
            }
            (true, None) => return Err(CurveError::DerivationFailed("missing private key".into())),
            (false, _) => {
                public_bytes = self.public_key.fingerprint_bytes();
                hmac_sha512(&self.chain_code, &[&public_bytes[..], &index_bytes[..]])
            }
        }
        .map_err(|e| CurveError::DerivationFailed(e.to_string()))?;

        let (il, ir) = split_hmac(&i);

        let (private_key, public_key) = match &self.private_key {
            Some(parent) => {
                let child = Zeroizing::new(curves::child_private(self.curve, parent, &il)?);
                let public_key = curves::public_key_from_private(self.curve, &child)?;
                (Some(child), public_key)
            }
            None => (None, curves::child_public(&self.public_key, &il)?),
        };

        Ok(Self {
            curve: self.curve,
            private_key,
            public_key,
            chain_code: ir,
            depth: self.depth + 1,
            parent_fingerprint: self.fingerprint(),
            child_index: index,
        })
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("curve", &self.curve)
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("public_key", &self.public_key.to_hex())
            .field("depth", &self.depth)
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint))
            .field("child_index", &self.child_index)
            .finish()
    }
}

pub fn is_hardened(index: u32) -> bool {
    index >= HARDENED_OFFSET
}

/// Next index in the same half of the index space, if any
pub(crate) fn next_index(index: u32) -> Option<u32> {
    index
        .checked_add(1)
        .filter(|next| is_hardened(*next) == is_hardened(index))
}

/// Run `attempt` at `index`, moving to the next index while it reports
/// [`CurveError::InvalidChildKey`].
pub(crate) fn resample<T>(
    index: u32,
    mut attempt: impl FnMut(u32) -> Result<T, CurveError>,
) -> DeriveResult<T> {
    let mut candidate = index;

    for attempts in 1..=MAX_RESAMPLE_ATTEMPTS {
        match attempt(candidate) {
            Ok(value) => return Ok(value),
            Err(CurveError::InvalidChildKey) => {
                log_warn!(
                    "bip32",
                    "Invalid child key, resampling",
                    requested = index,
                    candidate = candidate,
                    attempt = attempts
                );
                match next_index(candidate) {
                    Some(next) => candidate = next,
                    None => return Err(DerivationError::DerivationExhausted { index, attempts }),
                }
            }
            Err(other) => return Err(other.into()),
        }
    }

    Err(DerivationError::DerivationExhausted {
        index,
        attempts: MAX_RESAMPLE_ATTEMPTS,
    })
}

/// Step through `path` from `start`, recording the index each step landed on
pub(crate) fn walk_path<K>(
    start: K,
    path: &DerivationPath,
    mut step: impl FnMut(&K, u32) -> DeriveResult<K>,
    landed_at: impl Fn(&K) -> u32,
) -> DeriveResult<(K, DerivationPath)> {
    let mut key = start;
    let mut walked = Vec::with_capacity(path.len());

    for (n, component) in path.components().iter().enumerate() {
        key = step(&key, component.full_index())
            .map_err(|e| e.at_path(path.prefix(n + 1).to_string(), n))?;
        walked.push(DerivationComponent::from_child_number(landed_at(&key)));
    }

    Ok((key, DerivationPath::new(walked)?))
}

fn split_hmac(i: &[u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut il = [0u8; 32];
    let mut ir = [0u8; 32];
    il.copy_from_slice(&i[..32]);
    ir.copy_from_slice(&i[32..]);
    (il, ir)
}
