//! Native SegWit addresses
//!
//! Witness version 0 with a 20-byte P2WPKH program
//! (`HASH160(compressed pubkey)`), Bech32 encoded under the coin's
//! human-readable prefix.

use bech32::{u5, ToBase32, Variant};

use crate::crypto::curves::{CurveType, PublicKey};
use crate::error::{DerivationError, DeriveResult};
use crate::utils::hash160;

use super::{require_secp256k1, AddressEncoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegwitEncoder<'a> {
    hrp: &'a str,
    witness_version: u8,
}

impl<'a> SegwitEncoder<'a> {
    pub fn new(hrp: &'a str, witness_version: u8) -> Self {
        Self { hrp, witness_version }
    }
}

impl AddressEncoder for SegwitEncoder<'_> {
    fn curve(&self) -> CurveType {
        CurveType::Secp256k1
    }

    fn encode(&self, public_key: &PublicKey) -> DeriveResult<String> {
        // v1+ programs use Bech32m and are not key hashes
        if self.witness_version != 0 {
            return Err(DerivationError::encoding(format!(
                "Witness version {} is not supported for key-hash addresses",
                self.witness_version
            )));
        }

        let key = require_secp256k1(public_key, "SegWit")?;
        let program = hash160(&key.serialize());

        let mut data = vec![u5::try_from_u8(self.witness_version)?];
        data.extend(program.to_base32());

        Ok(bech32::encode(self.hrp, data, Variant::Bech32)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::test_keys::generator;
    use crate::error::ErrorCode;

    #[test]
    fn test_bip173_p2wpkh_example() {
        let address = SegwitEncoder::new("bc", 0).encode(&generator()).unwrap();
        assert_eq!(address, "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
    }

    #[test]
    fn test_hrp_is_applied() {
        let address = SegwitEncoder::new("ltc", 0).encode(&generator()).unwrap();
        assert!(address.starts_with("ltc1q"));
    }

    #[test]
    fn test_rejects_unsupported_witness_version() {
        let err = SegwitEncoder::new("bc", 1).encode(&generator()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Encoding);
    }

    #[test]
    fn test_rejects_invalid_hrp() {
        // bech32 rejects mixed-case prefixes
        let err = SegwitEncoder::new("Bc", 0).encode(&generator()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Encoding);
    }
}
