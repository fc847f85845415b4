//! Stellar account IDs (StrKey)
//!
//! `base32(version || key || crc16_xmodem_le)` with version `6 << 3`, which
//! renders as a leading `G`.

use data_encoding::BASE32;

use crate::crypto::curves::{CurveType, PublicKey};
use crate::error::{DerivationError, DeriveResult};
use crate::utils::crc16_xmodem;

use super::{require_ed25519, AddressEncoder};

/// Version byte for account IDs (G...)
pub const ACCOUNT_ID_VERSION: u8 = 6 << 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StellarEncoder;

impl AddressEncoder for StellarEncoder {
    fn curve(&self) -> CurveType {
        CurveType::Ed25519
    }

    fn encode(&self, public_key: &PublicKey) -> DeriveResult<String> {
        let key = require_ed25519(public_key, "Stellar")?;

        let mut payload = Vec::with_capacity(35);
        payload.push(ACCOUNT_ID_VERSION);
        payload.extend_from_slice(key);

        let checksum = crc16_xmodem(&payload);
        payload.extend_from_slice(&checksum.to_le_bytes());

        Ok(BASE32.encode(&payload))
    }
}

/// Decode an account ID back to its public key, verifying version and CRC
pub fn decode_account_id(address: &str) -> DeriveResult<[u8; 32]> {
    let data = BASE32
        .decode(address.as_bytes())
        .map_err(|e| DerivationError::encoding(format!("Invalid StrKey: {}", e)))?;

    if data.len() != 35 || data[0] != ACCOUNT_ID_VERSION {
        return Err(DerivationError::encoding("Not a Stellar account ID"));
    }

    let (body, checksum) = data.split_at(33);
    if crc16_xmodem(body).to_le_bytes() != checksum {
        return Err(DerivationError::encoding("StrKey checksum mismatch"));
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&body[1..]);
    Ok(key)
}
