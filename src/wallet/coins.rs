//! Coin Registry
//!
//! Static derivation and encoding parameters for each supported network.
//! Profiles are plain data; behaviour is selected by [`AddressScheme`],
//! [`ImportFormat`] and [`CurveType`].

use serde::{Deserialize, Serialize};

use crate::address::{AddressEncoder, AddressScheme, ImportFormat};
use crate::crypto::curves::CurveType;
use crate::error::{DerivationError, DeriveResult};

use super::derivation_path::bip_purposes;

/// Derivation and encoding parameters for one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinProfile {
    /// Registry key, e.g. `bitcoin`
    pub name: String,
    pub symbol: String,
    /// SLIP-44 coin type
    pub coin_type: u32,
    pub purpose: u32,
    pub curve: CurveType,
    pub address_scheme: AddressScheme,
    pub import_format: ImportFormat,
}

impl CoinProfile {
    pub fn supports_import_format(&self) -> bool {
        self.import_format.is_supported()
    }

    /// Display name: first letter uppercased
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Check the profile is internally consistent
    pub fn validate(&self) -> DeriveResult<()> {
        if self.name.trim().is_empty() {
            return Err(DerivationError::invalid_parameter("Coin name cannot be empty"));
        }
        if self.address_scheme.curve() != self.curve {
            return Err(DerivationError::invalid_parameter(format!(
                "{}: {} addresses need {} keys, profile uses {}",
                self.name,
                self.address_scheme.name(),
                self.address_scheme.curve(),
                self.curve
            )));
        }
        if self.import_format.is_supported() && self.curve != CurveType::Secp256k1 {
            return Err(DerivationError::invalid_parameter(format!(
                "{}: import format requires secp256k1",
                self.name
            )));
        }
        Ok(())
    }
}

fn secp_coin(
    name: &str,
    symbol: &str,
    coin_type: u32,
    purpose: u32,
    address_scheme: AddressScheme,
    import_format: ImportFormat,
) -> CoinProfile {
    CoinProfile {
        name: name.to_string(),
        symbol: symbol.to_string(),
        coin_type,
        purpose,
        curve: CurveType::Secp256k1,
        address_scheme,
        import_format,
    }
}

fn ed25519_coin(name: &str, symbol: &str, coin_type: u32, address_scheme: AddressScheme) -> CoinProfile {
    CoinProfile {
        name: name.to_string(),
        symbol: symbol.to_string(),
        coin_type,
        purpose: bip_purposes::BIP44,
        curve: CurveType::Ed25519,
        address_scheme,
        import_format: ImportFormat::None,
    }
}

/// Ordered, read-only set of coin profiles
#[derive(Debug, Clone, Default)]
pub struct CoinRegistry {
    profiles: Vec<CoinProfile>,
}

impl CoinRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Every network the tool derives by default
    pub fn builtin() -> Self {
        use bip_purposes::{BIP44, BIP84};

        let profiles = vec![
            secp_coin(
                "bitcoin",
                "BTC",
                0,
                BIP44,
                AddressScheme::P2pkhBase58 { version: 0x00 },
                ImportFormat::Wif { version: 0x80 },
            ),
            secp_coin(
                "bitcoin_segwit",
                "BTC",
                0,
                BIP84,
                AddressScheme::Bech32Segwit {
                    hrp: "bc".to_string(),
                    witness_version: 0,
                },
                ImportFormat::Wif { version: 0x80 },
            ),
            secp_coin(
                "ethereum",
                "ETH",
                60,
                BIP44,
                AddressScheme::EthereumKeccak,
                ImportFormat::None,
            ),
            secp_coin(
                "litecoin",
                "LTC",
                2,
                BIP44,
                AddressScheme::P2pkhBase58 { version: 0x30 },
                ImportFormat::Wif { version: 0xB0 },
            ),
            secp_coin(
                "dogecoin",
                "DOGE",
                3,
                BIP44,
                AddressScheme::P2pkhBase58 { version: 0x1E },
                ImportFormat::Wif { version: 0x9E },
            ),
            secp_coin(
                "dash",
                "DASH",
                5,
                BIP44,
                AddressScheme::P2pkhBase58 { version: 0x4C },
                ImportFormat::Wif { version: 0xCC },
            ),
            secp_coin(
                "bitcoin_cash",
                "BCH",
                145,
                BIP44,
                AddressScheme::CashAddr {
                    prefix: "bitcoincash".to_string(),
                },
                ImportFormat::Wif { version: 0x80 },
            ),
            secp_coin(
                "ripple",
                "XRP",
                144,
                BIP44,
                AddressScheme::XrpBase58,
                ImportFormat::None,
            ),
            ed25519_coin("solana", "SOL", 501, AddressScheme::Ed25519Base58),
            ed25519_coin("stellar", "XLM", 148, AddressScheme::StellarStrKey),
        ];

        Self { profiles }
    }

    /// Add or replace a profile, returning the extended registry
    pub fn with_profile(mut self, profile: CoinProfile) -> DeriveResult<Self> {
        profile.validate()?;

        match self.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
        Ok(self)
    }

    /// Look up a profile by name (case-insensitive)
    pub fn get(&self, name: &str) -> DeriveResult<&CoinProfile> {
        let wanted = name.trim();
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DerivationError::UnknownCoin(wanted.to_string()))
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.name.clone()).collect()
    }

    pub fn profiles(&self) -> &[CoinProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
