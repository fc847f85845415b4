//! Wallet Import Format
//!
//! `Base58Check(version || key || [0x01])`, the trailing byte marking a
//! compressed public key.

use zeroize::Zeroizing;

use crate::error::{DerivationError, DeriveResult};
use crate::utils::{base58check_decode, base58check_encode};

const COMPRESSED_FLAG: u8 = 0x01;

/// Encode a 32-byte secp256k1 private key
pub fn encode(private_key: &[u8; 32], version: u8, compressed: bool) -> String {
    let mut payload = Zeroizing::new(Vec::with_capacity(34));
    payload.push(version);
    payload.extend_from_slice(private_key);
    if compressed {
        payload.push(COMPRESSED_FLAG);
    }
    base58check_encode(&payload, bs58::Alphabet::BITCOIN)
}

/// Decoded WIF: key, version byte and compression flag
#[derive(Debug)]
pub struct DecodedWif {
    pub private_key: Zeroizing<[u8; 32]>,
    pub version: u8,
    pub compressed: bool,
}

/// Decode and verify a WIF string
pub fn decode(wif: &str) -> DeriveResult<DecodedWif> {
    let payload = Zeroizing::new(
        base58check_decode(wif, bs58::Alphabet::BITCOIN)
            .ok_or_else(|| DerivationError::encoding("Invalid WIF checksum or encoding"))?,
    );

    let compressed = match payload.len() {
        33 => false,
        34 if payload[33] == COMPRESSED_FLAG => true,
        _ => return Err(DerivationError::encoding("Invalid WIF payload length")),
    };

    let mut private_key = Zeroizing::new([0u8; 32]);
    private_key.copy_from_slice(&payload[1..33]);

    Ok(DecodedWif {
        private_key,
        version: payload[0],
        compressed,
    })
}
