//! Multi-Curve Key Derivation Support
//!
//! This module provides a unified abstraction over the elliptic curves the
//! coin registry derives keys on:
//!
//! - `secp256k1`: Bitcoin, Ethereum, Litecoin, Dogecoin, Dash, XRP, etc.
//! - `ed25519`: Solana, Stellar (SLIP-0010, hardened-only)
//!
//! # Architecture
//!
//! Both curves implement the [`HdCurve`] trait which provides:
//! - The HMAC key used to turn a seed into a master node
//! - Master scalar validation
//! - Private child derivation from `I_left`
//! - Public child derivation (only where the curve defines one)
//!
//! The free functions below dispatch on [`CurveType`] so the BIP-32 engine
//! never needs to know which curve it is walking.

pub mod ed25519;
pub mod secp256k1;
pub mod traits;

pub use ed25519::Ed25519Curve;
pub use secp256k1::Secp256k1Curve;
pub use traits::*;

use bitcoin::secp256k1::PublicKey as SecpPublicKey;
use serde::{Deserialize, Serialize};

// MARK: - Curve Type Enum

/// Supported elliptic curve types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    /// secp256k1 - Bitcoin, Ethereum, XRP, etc.
    Secp256k1,
    /// Ed25519 - Solana, Stellar
    Ed25519,
}

impl CurveType {
    /// Get the curve name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::Ed25519 => "ed25519",
        }
    }

    /// HMAC-SHA512 key used for master node generation
    pub fn master_hmac_key(&self) -> &'static [u8] {
        match self {
            Self::Secp256k1 => Secp256k1Curve::MASTER_HMAC_KEY,
            Self::Ed25519 => Ed25519Curve::MASTER_HMAC_KEY,
        }
    }

    /// Whether non-hardened child indices are defined on this curve
    pub fn supports_normal_derivation(&self) -> bool {
        match self {
            Self::Secp256k1 => Secp256k1Curve::SUPPORTS_NORMAL_DERIVATION,
            Self::Ed25519 => Ed25519Curve::SUPPORTS_NORMAL_DERIVATION,
        }
    }

    /// Parse curve type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "secp256k1" => Some(Self::Secp256k1),
            "ed25519" => Some(Self::Ed25519),
            _ => None,
        }
    }
}

impl std::fmt::Display for CurveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// MARK: - Public Keys

/// A public point on one of the supported curves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKey {
    Secp256k1(SecpPublicKey),
    Ed25519([u8; 32]),
}

impl PublicKey {
    pub fn curve(&self) -> CurveType {
        match self {
            Self::Secp256k1(_) => CurveType::Secp256k1,
            Self::Ed25519(_) => CurveType::Ed25519,
        }
    }

    /// Canonical byte form: 33-byte compressed SEC1 or 32-byte Ed25519 point
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Secp256k1(pk) => pk.serialize().to_vec(),
            Self::Ed25519(pk) => pk.to_vec(),
        }
    }

    /// 33-byte serialization hashed into child fingerprints
    /// (SLIP-0010 pads Ed25519 keys with a leading zero byte).
    pub fn fingerprint_bytes(&self) -> [u8; 33] {
        match self {
            Self::Secp256k1(pk) => pk.serialize(),
            Self::Ed25519(pk) => {
                let mut out = [0u8; 33];
                out[1..].copy_from_slice(pk);
                out
            }
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Hex of the 33-byte form, zero-prefixed for Ed25519 like
    /// [`fingerprint_bytes`](Self::fingerprint_bytes)
    pub fn to_compressed_hex(&self) -> String {
        hex::encode(self.fingerprint_bytes())
    }

    pub fn as_secp256k1(&self) -> Option<&SecpPublicKey> {
        match self {
            Self::Secp256k1(pk) => Some(pk),
            Self::Ed25519(_) => None,
        }
    }

    pub fn as_ed25519(&self) -> Option<&[u8; 32]> {
        match self {
            Self::Ed25519(pk) => Some(pk),
            Self::Secp256k1(_) => None,
        }
    }
}

// MARK: - Curve Errors

/// Errors that can occur during curve operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    InvalidPrivateKey(String),
    InvalidPublicKey(String),
    /// `I_left` out of range or the child key is zero; the caller resamples
    InvalidChildKey,
    /// The curve defines no public (non-hardened) derivation
    NormalDerivationUnsupported,
    DerivationFailed(String),
}

impl std::fmt::Display for CurveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPrivateKey(s) => write!(f, "Invalid private key: {}", s),
            Self::InvalidPublicKey(s) => write!(f, "Invalid public key: {}", s),
            Self::InvalidChildKey => write!(f, "Invalid child key (I_L out of range or zero)"),
            Self::NormalDerivationUnsupported => write!(f, "Curve supports hardened derivation only"),
            Self::DerivationFailed(s) => write!(f, "Key derivation failed: {}", s),
        }
    }
}

impl std::error::Error for CurveError {}

// MARK: - Unified Interface

/// Validate a master scalar produced from `I_left`
pub fn master_private(curve: CurveType, il: &[u8; 32]) -> Result<[u8; 32], CurveError> {
    match curve {
        CurveType::Secp256k1 => Secp256k1Curve::master_private(il),
        CurveType::Ed25519 => Ed25519Curve::master_private(il),
    }
}

/// Derive the public key from a private key
pub fn public_key_from_private(curve: CurveType, private_key: &[u8; 32]) -> Result<PublicKey, CurveError> {
    match curve {
        CurveType::Secp256k1 => Secp256k1Curve::public_key(private_key),
        CurveType::Ed25519 => Ed25519Curve::public_key(private_key),
    }
}

/// Child private key material from the parent key and `I_left`
pub fn child_private(
    curve: CurveType,
    parent_private: &[u8; 32],
    il: &[u8; 32],
) -> Result<[u8; 32], CurveError> {
    match curve {
        CurveType::Secp256k1 => Secp256k1Curve::child_private(parent_private, il),
        CurveType::Ed25519 => Ed25519Curve::child_private(parent_private, il),
    }
}

/// Child public key from the parent public key and `I_left`
pub fn child_public(parent_public: &PublicKey, il: &[u8; 32]) -> Result<PublicKey, CurveError> {
    match parent_public.curve() {
        CurveType::Secp256k1 => Secp256k1Curve::child_public(parent_public, il),
        CurveType::Ed25519 => Ed25519Curve::child_public(parent_public, il),
    }
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_type_properties() {
        assert_eq!(CurveType::Secp256k1.name(), "secp256k1");
        assert_eq!(CurveType::Ed25519.name(), "ed25519");

        assert!(CurveType::Secp256k1.supports_normal_derivation());
        assert!(!CurveType::Ed25519.supports_normal_derivation());

        assert_eq!(CurveType::Secp256k1.master_hmac_key(), b"Bitcoin seed");
        assert_eq!(CurveType::Ed25519.master_hmac_key(), b"ed25519 seed");
    }

    #[test]
    fn test_curve_type_parse() {
        assert_eq!(CurveType::parse("secp256k1"), Some(CurveType::Secp256k1));
        assert_eq!(CurveType::parse("Ed25519"), Some(CurveType::Ed25519));
        assert_eq!(CurveType::parse("sr25519"), None);
    }

    #[test]
    fn test_ed25519_fingerprint_bytes_are_zero_padded() {
        let pk = PublicKey::Ed25519([7u8; 32]);
        let bytes = pk.fingerprint_bytes();
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..], &[7u8; 32]);
        assert_eq!(pk.to_bytes().len(), 32);
        assert_eq!(pk.to_compressed_hex(), format!("00{}", "07".repeat(32)));
    }
}
