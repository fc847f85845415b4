//! Legacy P2PKH addresses
//!
//! `Base58Check(version || RIPEMD160(SHA256(compressed pubkey)))`, used by
//! Bitcoin (0x00), Litecoin (0x30), Dogecoin (0x1E) and Dash (0x4C).

use crate::crypto::curves::{CurveType, PublicKey};
use crate::error::DeriveResult;
use crate::utils::{base58check_encode, hash160};

use super::{require_secp256k1, AddressEncoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct P2pkhEncoder {
    version: u8,
}

impl P2pkhEncoder {
    pub fn new(version: u8) -> Self {
        Self { version }
    }
}

impl AddressEncoder for P2pkhEncoder {
    fn curve(&self) -> CurveType {
        CurveType::Secp256k1
    }

    fn encode(&self, public_key: &PublicKey) -> DeriveResult<String> {
        let key = require_secp256k1(public_key, "P2PKH")?;

        let mut payload = Vec::with_capacity(21);
        payload.push(self.version);
        payload.extend_from_slice(&hash160(&key.serialize()));

        Ok(base58check_encode(&payload, bs58::Alphabet::BITCOIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::test_keys::generator;
    use crate::utils::base58check_decode;

    #[test]
    fn test_bitcoin_generator_address() {
        let address = P2pkhEncoder::new(0x00).encode(&generator()).unwrap();
        assert_eq!(address, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
    }

    #[test]
    fn test_version_byte_sets_prefix() {
        // Litecoin, Dogecoin and Dash leading characters
        for (version, prefix) in [(0x30u8, 'L'), (0x1E, 'D'), (0x4C, 'X')] {
            let address = P2pkhEncoder::new(version).encode(&generator()).unwrap();
            assert!(address.starts_with(prefix), "{} for version {:#x}", address, version);

            let payload = base58check_decode(&address, bs58::Alphabet::BITCOIN).unwrap();
            assert_eq!(payload[0], version);
            assert_eq!(hex::encode(&payload[1..]), "751e76e8199196d454941c45d1b3a323f1433bd6");
        }
    }
}
