//! Ethereum addresses
//!
//! `0x` + last 20 bytes of Keccak256 over the 64-byte uncompressed point,
//! mixed-case per EIP-55.

use crate::crypto::curves::{CurveType, PublicKey};
use crate::error::DeriveResult;
use crate::utils::{keccak256, to_checksum_address};

use super::{require_secp256k1, AddressEncoder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EthereumEncoder;

impl AddressEncoder for EthereumEncoder {
    fn curve(&self) -> CurveType {
        CurveType::Secp256k1
    }

    fn encode(&self, public_key: &PublicKey) -> DeriveResult<String> {
        let key = require_secp256k1(public_key, "Ethereum")?;
        let uncompressed = key.serialize_uncompressed();

        // Skip the 0x04 tag byte
        let hash = keccak256(&uncompressed[1..]);
        Ok(to_checksum_address(&hash[12..]))
    }
}
