//! secp256k1 Curve Implementation
//!
//! Used by: Bitcoin, Ethereum, Litecoin, Dogecoin, Dash, Bitcoin Cash, XRP.
//!
//! Features:
//! - BIP-32 master key validation (`0 < k < n`)
//! - Additive child derivation: `k_child = (I_L + k_par) mod n`
//! - Public child derivation: `K_child = point(I_L) + K_par`

use super::{CurveError, HdCurve, PublicKey};
use bitcoin::secp256k1::{PublicKey as SecpPublicKey, Scalar, Secp256k1, SecretKey};

/// secp256k1 curve implementation
pub struct Secp256k1Curve;

impl HdCurve for Secp256k1Curve {
    const MASTER_HMAC_KEY: &'static [u8] = b"Bitcoin seed";
    const SUPPORTS_NORMAL_DERIVATION: bool = true;

    fn master_private(il: &[u8; 32]) -> Result<[u8; 32], CurveError> {
        // Rejects zero and values >= n
        let sk = SecretKey::from_slice(il)
            .map_err(|e| CurveError::InvalidPrivateKey(e.to_string()))?;
        Ok(sk.secret_bytes())
    }

    fn public_key(private_key: &[u8; 32]) -> Result<PublicKey, CurveError> {
        let secp = Secp256k1::new();
        let sk = SecretKey::from_slice(private_key)
            .map_err(|e| CurveError::InvalidPrivateKey(e.to_string()))?;

        Ok(PublicKey::Secp256k1(SecpPublicKey::from_secret_key(&secp, &sk)))
    }

    fn child_private(parent_private: &[u8; 32], il: &[u8; 32]) -> Result<[u8; 32], CurveError> {
        let parent_sk = SecretKey::from_slice(parent_private)
            .map_err(|e| CurveError::InvalidPrivateKey(e.to_string()))?;

        // parse256(I_L) >= n
        let tweak = Scalar::from_be_bytes(*il).map_err(|_| CurveError::InvalidChildKey)?;

        // k_child == 0
        let child_sk = parent_sk
            .add_tweak(&tweak)
            .map_err(|_| CurveError::InvalidChildKey)?;

        Ok(child_sk.secret_bytes())
    }

    fn child_public(parent_public: &PublicKey, il: &[u8; 32]) -> Result<PublicKey, CurveError> {
        let parent_pk = parent_public.as_secp256k1().ok_or_else(|| {
            CurveError::InvalidPublicKey("expected a secp256k1 public key".into())
        })?;

        let tweak = Scalar::from_be_bytes(*il).map_err(|_| CurveError::InvalidChildKey)?;

        // Point at infinity
        let secp = Secp256k1::new();
        let child_pk = parent_pk
            .add_exp_tweak(&secp, &tweak)
            .map_err(|_| CurveError::InvalidChildKey)?;

        Ok(PublicKey::Secp256k1(child_pk))
    }
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    // secp256k1 group order n
    const ORDER: [u8; 32] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
        0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
    ];

    #[test]
    fn test_master_rejects_zero_and_order() {
        assert!(Secp256k1Curve::master_private(&[0u8; 32]).is_err());
        assert!(Secp256k1Curve::master_private(&ORDER).is_err());

        let mut below = ORDER;
        below[31] -= 1;
        assert!(Secp256k1Curve::master_private(&below).is_ok());
    }

    #[test]
    fn test_child_private_out_of_range_tweak() {
        let parent = [1u8; 32];
        assert_eq!(
            Secp256k1Curve::child_private(&parent, &ORDER),
            Err(CurveError::InvalidChildKey)
        );
    }

    #[test]
    fn test_child_private_zero_result() {
        // k_par = 1, I_L = n - 1 -> k_child = 0
        let mut parent = [0u8; 32];
        parent[31] = 1;
        let mut il = ORDER;
        il[31] -= 1;

        assert_eq!(
            Secp256k1Curve::child_private(&parent, &il),
            Err(CurveError::InvalidChildKey)
        );
    }

    #[test]
    fn test_public_and_private_derivation_agree() {
        let parent = [0x11u8; 32];
        let il = [0x22u8; 32];

        let child_sk = Secp256k1Curve::child_private(&parent, &il).unwrap();
        let from_private = Secp256k1Curve::public_key(&child_sk).unwrap();

        let parent_pk = Secp256k1Curve::public_key(&parent).unwrap();
        let from_public = Secp256k1Curve::child_public(&parent_pk, &il).unwrap();

        assert_eq!(from_private, from_public);
    }

    #[test]
    fn test_child_public_rejects_ed25519_key() {
        let pk = PublicKey::Ed25519([0u8; 32]);
        assert!(matches!(
            Secp256k1Curve::child_public(&pk, &[1u8; 32]),
            Err(CurveError::InvalidPublicKey(_))
        ));
    }
}
