//! Elliptic Curve Traits
//!
//! Defines the common interface the BIP-32 engine needs from a curve.

use super::{CurveError, PublicKey};

/// Curve-specific rules for hierarchical deterministic derivation
pub trait HdCurve {
    /// HMAC-SHA512 key for master node generation
    const MASTER_HMAC_KEY: &'static [u8];

    /// Whether non-hardened (public) child derivation is defined
    const SUPPORTS_NORMAL_DERIVATION: bool;

    /// Validate `I_left` as a master private key
    fn master_private(il: &[u8; 32]) -> Result<[u8; 32], CurveError>;

    /// Derive the public key from a private key
    fn public_key(private_key: &[u8; 32]) -> Result<PublicKey, CurveError>;

    /// Child private key from the parent private key and `I_left`.
    ///
    /// Returns [`CurveError::InvalidChildKey`] when the result must be
    /// resampled with the next index.
    fn child_private(parent_private: &[u8; 32], il: &[u8; 32]) -> Result<[u8; 32], CurveError>;

    /// Child public key from the parent public key and `I_left`
    fn child_public(parent_public: &PublicKey, il: &[u8; 32]) -> Result<PublicKey, CurveError>;
}
