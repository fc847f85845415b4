//! XRP Ledger classic addresses
//!
//! `Base58Check(0x00 || HASH160(compressed pubkey))` over the Ripple
//! alphabet, so every account starts with `r`.

use crate::crypto::curves::{CurveType, PublicKey};
use crate::error::DeriveResult;
use crate::utils::{base58check_encode, hash160};

use super::{require_secp256k1, AddressEncoder};

/// Account ID type prefix
pub const ACCOUNT_ID_VERSION: u8 = 0x00;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RippleEncoder;

impl AddressEncoder for RippleEncoder {
    fn curve(&self) -> CurveType {
        CurveType::Secp256k1
    }

    fn encode(&self, public_key: &PublicKey) -> DeriveResult<String> {
        let key = require_secp256k1(public_key, "XRP")?;

        let mut payload = Vec::with_capacity(21);
        payload.push(ACCOUNT_ID_VERSION);
        payload.extend_from_slice(&hash160(&key.serialize()));

        Ok(base58check_encode(&payload, bs58::Alphabet::RIPPLE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::test_keys::generator;
    use crate::utils::base58check_decode;

    #[test]
    fn test_account_id_round_trip() {
        let address = RippleEncoder.encode(&generator()).unwrap();
        assert!(address.starts_with('r'));

        let payload = base58check_decode(&address, bs58::Alphabet::RIPPLE).unwrap();
        assert_eq!(payload[0], ACCOUNT_ID_VERSION);
        assert_eq!(hex::encode(&payload[1..]), "751e76e8199196d454941c45d1b3a323f1433bd6");

        // Not valid under the Bitcoin alphabet
        assert!(base58check_decode(&address, bs58::Alphabet::BITCOIN).is_none());
    }

    #[test]
    fn test_zero_account() {
        // ACCOUNT_ZERO
        let payload = [0u8; 21];
        assert_eq!(
            base58check_encode(&payload, bs58::Alphabet::RIPPLE),
            "rrrrrrrrrrrrrrrrrrrrrhoLvTp"
        );
    }
}
