//! Ed25519 Curve Implementation
//!
//! Used by: Solana, Stellar.
//!
//! SLIP-0010 defines Ed25519 derivation for hardened indices only. The child
//! key is `I_L` itself; there is no scalar addition and no public derivation
//! law, so every 32-byte `I_L` is a valid key.

use super::{CurveError, HdCurve, PublicKey};
use ed25519_dalek::SigningKey;

/// Ed25519 curve implementation
pub struct Ed25519Curve;

impl HdCurve for Ed25519Curve {
    const MASTER_HMAC_KEY: &'static [u8] = b"ed25519 seed";
    const SUPPORTS_NORMAL_DERIVATION: bool = false;

    fn master_private(il: &[u8; 32]) -> Result<[u8; 32], CurveError> {
        Ok(*il)
    }

    fn public_key(private_key: &[u8; 32]) -> Result<PublicKey, CurveError> {
        let signing_key = SigningKey::from_bytes(private_key);
        Ok(PublicKey::Ed25519(signing_key.verifying_key().to_bytes()))
    }

    fn child_private(_parent_private: &[u8; 32], il: &[u8; 32]) -> Result<[u8; 32], CurveError> {
        Ok(*il)
    }

    fn child_public(_parent_public: &PublicKey, _il: &[u8; 32]) -> Result<PublicKey, CurveError> {
        Err(CurveError::NormalDerivationUnsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc8032_public_key() {
        // RFC 8032 test 1
        let sk: [u8; 32] =
            hex::decode("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60")
                .unwrap()
                .try_into()
                .unwrap();
        let pk = Ed25519Curve::public_key(&sk).unwrap();
        assert_eq!(
            pk.to_hex(),
            "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
        );
    }

    #[test]
    fn test_no_public_derivation() {
        let pk = PublicKey::Ed25519([1u8; 32]);
        assert_eq!(
            Ed25519Curve::child_public(&pk, &[2u8; 32]),
            Err(CurveError::NormalDerivationUnsupported)
        );
    }
}
