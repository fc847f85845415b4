//! CashAddr (Bitcoin Cash)
//!
//! `prefix ":" base32(version || HASH160(pubkey) || checksum)` where the
//! checksum is a 40-bit BCH code over the prefix and payload.

use crate::crypto::curves::{CurveType, PublicKey};
use crate::error::DeriveResult;
use crate::utils::hash160;

use super::{require_secp256k1, AddressEncoder};

/// Type 0 (P2PKH), size 0 (160-bit hash)
const P2PKH_VERSION: u8 = 0x00;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashAddrEncoder<'a> {
    prefix: &'a str,
}

impl<'a> CashAddrEncoder<'a> {
    pub fn new(prefix: &'a str) -> Self {
        Self { prefix }
    }
}

impl AddressEncoder for CashAddrEncoder<'_> {
    fn curve(&self) -> CurveType {
        CurveType::Secp256k1
    }

    fn encode(&self, public_key: &PublicKey) -> DeriveResult<String> {
        let key = require_secp256k1(public_key, "CashAddr")?;

        let mut payload = Vec::with_capacity(21);
        payload.push(P2PKH_VERSION);
        payload.extend_from_slice(&hash160(&key.serialize()));

        let mut data: Vec<u8> = bech32::convert_bits(&payload, 8, 5, true)?;
        let checksum = checksum(self.prefix, &data);
        data.extend_from_slice(&checksum);

        let encoded: String = data.iter().map(|&b| CHARSET[b as usize] as char).collect();
        Ok(format!("{}:{}", self.prefix, encoded))
    }
}

/// Eight 5-bit checksum groups over `prefix` and the 5-bit payload
fn checksum(prefix: &str, payload: &[u8]) -> [u8; 8] {
    let values: Vec<u8> = prefix
        .bytes()
        .map(|c| c & 0x1f)
        .chain(std::iter::once(0))
        .chain(payload.iter().copied())
        .chain([0u8; 8])
        .collect();

    let polymod = polymod(&values) ^ 1;

    let mut checksum = [0u8; 8];
    for (i, group) in checksum.iter_mut().enumerate() {
        *group = ((polymod >> (5 * (7 - i))) & 0x1f) as u8;
    }
    checksum
}

/// BCH polymod over GF(32)
fn polymod(values: &[u8]) -> u64 {
    const GENERATORS: [u64; 5] = [
        0x98f2bc8e61,
        0x79b76d99e2,
        0xf33e5fb3c4,
        0xae2eabe2a8,
        0x1e4f43e470,
    ];

    let mut c: u64 = 1;
    for &v in values {
        let c0 = c >> 35;
        c = ((c & 0x07ffffffff) << 5) ^ (v as u64);
        for (i, &gen) in GENERATORS.iter().enumerate() {
            if (c0 >> i) & 1 != 0 {
                c ^= gen;
            }
        }
    }

    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::test_keys::generator;

    #[test]
    fn test_generator_cash_address() {
        // Same key as legacy 1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH
        let address = CashAddrEncoder::new("bitcoincash").encode(&generator()).unwrap();
        assert_eq!(address, "bitcoincash:qp63uahgrxged4z5jswyt5dn5v3lzsem6cy4spdc2h");
    }

    #[test]
    fn test_valid_address_has_zero_residue() {
        let address = CashAddrEncoder::new("bitcoincash").encode(&generator()).unwrap();
        let (prefix, body) = address.split_once(':').unwrap();

        let values: Vec<u8> = prefix
            .bytes()
            .map(|c| c & 0x1f)
            .chain(std::iter::once(0))
            .chain(body.bytes().map(|c| CHARSET.iter().position(|&x| x == c).unwrap() as u8))
            .collect();
        assert_eq!(polymod(&values), 1);
    }
}
