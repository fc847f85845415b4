//! Hash and Codec Helpers
//!
//! Thin wrappers over the hash, MAC and text-codec crates so the engine and
//! the address encoders share one spelling of each primitive.

use bitcoin::hashes::{sha256d, Hash};
use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use tiny_keccak::{Hasher, Keccak};
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

/// Keccak256 hash (used for Ethereum addresses)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// SHA256(SHA256(data))
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256d::Hash::hash(data).to_byte_array()
}

/// RIPEMD160(SHA256(data))
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(sha256(data)).into()
}

/// HMAC-SHA512, output zeroized on drop
pub fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<Zeroizing<[u8; 64]>, hmac::digest::InvalidLength> {
    let mut mac = HmacSha512::new_from_slice(key)?;
    for part in parts {
        mac.update(part);
    }

    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// Convert raw address bytes to checksummed Ethereum address
pub fn to_checksum_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut result = String::from("0x");
    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

        if ch.is_ascii_digit() {
            result.push(ch);
        } else if nibble >= 8 {
            result.push(ch.to_ascii_uppercase());
        } else {
            result.push(ch);
        }
    }

    result
}

/// Base58Check: payload followed by the first 4 bytes of SHA256d(payload)
pub fn base58check_encode(payload: &[u8], alphabet: &'static bs58::Alphabet) -> String {
    let checksum = sha256d(payload);
    let mut data = Vec::with_capacity(payload.len() + 4);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum[..4]);

    bs58::encode(data).with_alphabet(alphabet).into_string()
}

/// Decode Base58Check, returning the payload only when the checksum holds
pub fn base58check_decode(encoded: &str, alphabet: &'static bs58::Alphabet) -> Option<Vec<u8>> {
    let data = bs58::decode(encoded.trim()).with_alphabet(alphabet).into_vec().ok()?;
    if data.len() < 5 {
        return None;
    }

    let (payload, checksum) = data.split_at(data.len() - 4);
    if sha256d(payload)[..4] != *checksum {
        return None;
    }
    Some(payload.to_vec())
}

/// CRC16-XModem checksum
pub fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for byte in data {
        crc ^= (*byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
