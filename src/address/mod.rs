//! Address Encoding
//!
//! Turns derived public keys into network address strings and private keys
//! into wallet import strings. Dispatch is driven entirely by a coin's
//! [`AddressScheme`] and [`ImportFormat`]; no encoder inspects the coin name.
//!
//! Supported schemes:
//! - Base58Check P2PKH (Bitcoin, Litecoin, Dogecoin, Dash)
//! - Bech32 SegWit v0 (BIP-84 Bitcoin)
//! - CashAddr (Bitcoin Cash)
//! - Keccak / EIP-55 (Ethereum)
//! - Ripple-alphabet Base58Check (XRP)
//! - Raw Base58 (Solana)
//! - StrKey (Stellar)

pub mod cashaddr;
pub mod ethereum;
pub mod p2pkh;
pub mod ripple;
pub mod segwit;
pub mod solana;
pub mod stellar;
pub mod wif;

use serde::{Deserialize, Serialize};

use crate::crypto::curves::{CurveType, PublicKey};
use crate::error::{DerivationError, DeriveResult};
use crate::wallet::coins::CoinProfile;

pub use cashaddr::CashAddrEncoder;
pub use ethereum::EthereumEncoder;
pub use p2pkh::P2pkhEncoder;
pub use ripple::RippleEncoder;
pub use segwit::SegwitEncoder;
pub use solana::SolanaEncoder;
pub use stellar::StellarEncoder;

/// Converts a public key into an address string
pub trait AddressEncoder {
    /// Curve whose public keys this encoder accepts
    fn curve(&self) -> CurveType;

    fn encode(&self, public_key: &PublicKey) -> DeriveResult<String>;
}

/// How a coin renders addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum AddressScheme {
    /// `Base58Check(version || HASH160(compressed pubkey))`
    P2pkhBase58 { version: u8 },
    /// Bech32 witness program with a human-readable prefix
    Bech32Segwit { hrp: String, witness_version: u8 },
    /// `prefix:base32(version || HASH160) || BCH checksum`
    CashAddr { prefix: String },
    /// EIP-55 mixed-case `0x` + last 20 bytes of Keccak256
    EthereumKeccak,
    /// Base58Check with the Ripple alphabet, version 0x00
    XrpBase58,
    /// Plain Base58 of the 32-byte Ed25519 key
    Ed25519Base58,
    /// Stellar account StrKey (`G...`)
    StellarStrKey,
}

impl AddressScheme {
    pub fn name(&self) -> &'static str {
        match self {
            Self::P2pkhBase58 { .. } => "p2pkh_base58",
            Self::Bech32Segwit { .. } => "bech32_segwit",
            Self::CashAddr { .. } => "cash_addr",
            Self::EthereumKeccak => "ethereum_keccak",
            Self::XrpBase58 => "xrp_base58",
            Self::Ed25519Base58 => "ed25519_base58",
            Self::StellarStrKey => "stellar_str_key",
        }
    }
}

impl AddressEncoder for AddressScheme {
    fn curve(&self) -> CurveType {
        match self {
            Self::P2pkhBase58 { version } => P2pkhEncoder::new(*version).curve(),
            Self::Bech32Segwit { hrp, witness_version } => {
                SegwitEncoder::new(hrp, *witness_version).curve()
            }
            Self::CashAddr { prefix } => CashAddrEncoder::new(prefix).curve(),
            Self::EthereumKeccak => EthereumEncoder.curve(),
            Self::XrpBase58 => RippleEncoder.curve(),
            Self::Ed25519Base58 => SolanaEncoder.curve(),
            Self::StellarStrKey => StellarEncoder.curve(),
        }
    }

    fn encode(&self, public_key: &PublicKey) -> DeriveResult<String> {
        match self {
            Self::P2pkhBase58 { version } => P2pkhEncoder::new(*version).encode(public_key),
            Self::Bech32Segwit { hrp, witness_version } => {
                SegwitEncoder::new(hrp, *witness_version).encode(public_key)
            }
            Self::CashAddr { prefix } => CashAddrEncoder::new(prefix).encode(public_key),
            Self::EthereumKeccak => EthereumEncoder.encode(public_key),
            Self::XrpBase58 => RippleEncoder.encode(public_key),
            Self::Ed25519Base58 => SolanaEncoder.encode(public_key),
            Self::StellarStrKey => StellarEncoder.encode(public_key),
        }
    }
}

/// Private key export format for a coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum ImportFormat {
    /// The coin has no import string
    None,
    /// Wallet Import Format with the given version byte, compressed flag set
    Wif { version: u8 },
}

impl ImportFormat {
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Import string for `private_key` under `profile`.
///
/// Fails with [`DerivationError::UnsupportedOperation`] when the profile has
/// no import format.
pub fn encode_import_format(private_key: &[u8; 32], profile: &CoinProfile) -> DeriveResult<String> {
    match profile.import_format {
        ImportFormat::Wif { version } => {
            if profile.curve != CurveType::Secp256k1 {
                return Err(DerivationError::unsupported(format!(
                    "WIF is only defined for secp256k1 keys, {} uses {}",
                    profile.name, profile.curve
                )));
            }
            Ok(wif::encode(private_key, version, true))
        }
        ImportFormat::None => Err(DerivationError::unsupported(format!(
            "{} has no private key import format",
            profile.name
        ))),
    }
}

/// Extract the secp256k1 point or fail with an encoding error
pub(crate) fn require_secp256k1<'a>(
    public_key: &'a PublicKey,
    scheme: &str,
) -> DeriveResult<&'a bitcoin::secp256k1::PublicKey> {
    public_key.as_secp256k1().ok_or_else(|| {
        DerivationError::encoding(format!("{} addresses need a secp256k1 public key", scheme))
    })
}

/// Extract the Ed25519 point or fail with an encoding error
pub(crate) fn require_ed25519<'a>(public_key: &'a PublicKey, scheme: &str) -> DeriveResult<&'a [u8; 32]> {
    public_key.as_ed25519().ok_or_else(|| {
        DerivationError::encoding(format!("{} addresses need an Ed25519 public key", scheme))
    })
}

#[cfg(test)]
pub(crate) mod test_keys {
    use crate::crypto::curves::{public_key_from_private, CurveType, PublicKey};

    /// secp256k1 key for private scalar 1 (the generator point)
    pub fn generator() -> PublicKey {
        let mut one = [0u8; 32];
        one[31] = 1;
        public_key_from_private(CurveType::Secp256k1, &one).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::wallet::coins::CoinRegistry;

    #[test]
    fn test_scheme_dispatch() {
        let scheme = AddressScheme::P2pkhBase58 { version: 0x00 };
        assert_eq!(
            scheme.encode(&test_keys::generator()).unwrap(),
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"
        );
        assert_eq!(scheme.curve(), CurveType::Secp256k1);
        assert_eq!(AddressScheme::StellarStrKey.curve(), CurveType::Ed25519);
    }

    #[test]
    fn test_curve_mismatch_is_encoding_error() {
        let err = AddressScheme::Ed25519Base58
            .encode(&test_keys::generator())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Encoding);

        let err = AddressScheme::EthereumKeccak
            .encode(&PublicKey::Ed25519([0u8; 32]))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Encoding);
    }

    #[test]
    fn test_import_format_gating() {
        let registry = CoinRegistry::builtin();
        let mut one = [0u8; 32];
        one[31] = 1;

        let bitcoin = registry.get("bitcoin").unwrap();
        assert!(bitcoin.supports_import_format());
        assert_eq!(
            encode_import_format(&one, bitcoin).unwrap(),
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn"
        );

        for name in ["ethereum", "ripple", "solana", "stellar"] {
            let profile = registry.get(name).unwrap();
            assert!(!profile.supports_import_format());
            let err = encode_import_format(&one, profile).unwrap_err();
            assert_eq!(err.code(), ErrorCode::UnsupportedOperation, "{}", name);
        }
    }

    #[test]
    fn test_scheme_serialization() {
        let json = serde_json::to_string(&AddressScheme::Bech32Segwit {
            hrp: "bc".into(),
            witness_version: 0,
        })
        .unwrap();
        assert_eq!(json, r#"{"scheme":"bech32_segwit","hrp":"bc","witness_version":0}"#);

        let format: ImportFormat = serde_json::from_str(r#"{"format":"wif","version":176}"#).unwrap();
        assert_eq!(format, ImportFormat::Wif { version: 0xB0 });
    }
}
