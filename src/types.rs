//! Shared output types
//!
//! Values the derivation engine hands back to callers. They are built once
//! per request and never fed back into derivation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{DerivationError, ErrorCode};

/// One derived key pair and its encodings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct DerivedAddress {
    pub coin: String,
    /// Full path in `m/...` notation, as actually derived
    pub path: String,
    pub private_key_hex: String,
    /// Compressed SEC1 for secp256k1, raw 32 bytes for Ed25519
    pub public_key_hex: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_format: Option<String>,
}

impl fmt::Debug for DerivedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedAddress")
            .field("coin", &self.coin)
            .field("path", &self.path)
            .field("private_key_hex", &"[REDACTED]")
            .field("public_key_hex", &self.public_key_hex)
            .field("address", &self.address)
            .field("import_format", &self.import_format.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Why a coin was left out of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinFailure {
    pub coin: String,
    pub code: ErrorCode,
    pub message: String,
}

impl CoinFailure {
    pub fn new(coin: impl Into<String>, error: &DerivationError) -> Self {
        Self {
            coin: coin.into(),
            code: error.code(),
            message: error.to_string(),
        }
    }
}

/// Per-coin results of one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationReport {
    /// Successful coins, each with one entry per requested index
    pub addresses: BTreeMap<String, Vec<DerivedAddress>>,
    /// Coins that failed, with the isolated cause
    pub failures: BTreeMap<String, CoinFailure>,
}

impl DerivationReport {
    pub fn get(&self, coin: &str) -> Option<&[DerivedAddress]> {
        self.addresses.get(coin).map(Vec::as_slice)
    }

    pub fn failure(&self, coin: &str) -> Option<&CoinFailure> {
        self.failures.get(coin)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total derived addresses across all coins
    pub fn address_count(&self) -> usize {
        self.addresses.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DerivedAddress {
        DerivedAddress {
            coin: "bitcoin".into(),
            path: "m/44'/0'/0'/0/0".into(),
            private_key_hex: "e284129cc0922579a535bbf4d1a3b25773090d28c909bc0fed73b5e0222cc372".into(),
            public_key_hex: "03aaeb52dd7494c361049de67cc680e83ebcbbbdbeb13637d92cd845f70308af5e".into(),
            address: "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA".into(),
            import_format: None,
        }
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let debug = format!("{:?}", sample());
        assert!(!debug.contains("e284129cc092"));
        assert!(debug.contains("1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA"));
    }

    #[test]
    fn test_import_format_omitted_when_absent() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("import_format").is_none());
        assert_eq!(json["path"], "m/44'/0'/0'/0/0");
    }

    #[test]
    fn test_coin_failure_from_error() {
        let failure = CoinFailure::new("dogecoin2", &DerivationError::UnknownCoin("dogecoin2".into()));
        assert_eq!(failure.code, ErrorCode::UnknownCoin);
        assert!(failure.message.contains("dogecoin2"));

        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["code"], "unknown_coin");
    }
}
