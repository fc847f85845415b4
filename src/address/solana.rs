//! Solana addresses: plain Base58 of the 32-byte Ed25519 public key

use crate::crypto::curves::{CurveType, PublicKey};
use crate::error::DeriveResult;

use super::{require_ed25519, AddressEncoder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolanaEncoder;

impl AddressEncoder for SolanaEncoder {
    fn curve(&self) -> CurveType {
        CurveType::Ed25519
    }

    fn encode(&self, public_key: &PublicKey) -> DeriveResult<String> {
        let key = require_ed25519(public_key, "Solana")?;
        Ok(bs58::encode(key).into_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_program_id() {
        let address = SolanaEncoder.encode(&PublicKey::Ed25519([0u8; 32])).unwrap();
        assert_eq!(address, "11111111111111111111111111111111");
    }

    #[test]
    fn test_decodes_back_to_key() {
        let key = [0xAB; 32];
        let address = SolanaEncoder.encode(&PublicKey::Ed25519(key)).unwrap();
        assert_eq!(bs58::decode(&address).into_vec().unwrap(), key.to_vec());
    }
}
