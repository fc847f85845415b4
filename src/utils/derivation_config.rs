//! Derivation Request Configuration
//!
//! Batch parameters for one derivation run. Requests can be built in code
//! with the `with_*` setters or loaded from JSON; both paths go through
//! [`DerivationRequest::validate`] before any key is derived.

use serde::{Deserialize, Serialize};

use crate::error::{DerivationError, DeriveResult};
use crate::wallet::coins::CoinRegistry;
use crate::wallet::derivation_path::{Bip44PathResolver, HARDENED};

/// Upper bound on addresses per coin in a single request
pub const MAX_ADDRESSES_PER_COIN: usize = 10_000;

/// What to derive for one mnemonic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DerivationRequest {
    /// Coin names; empty selects every registered coin
    pub coins: Vec<String>,
    pub account: u32,
    /// 0 = external (receiving), 1 = internal (change)
    pub change: u32,
    pub address_indices: Vec<u32>,
}

impl Default for DerivationRequest {
    fn default() -> Self {
        Self {
            coins: Vec::new(),
            account: 0,
            change: 0,
            address_indices: vec![0],
        }
    }
}

impl DerivationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coins<I, S>(mut self, coins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.coins = coins.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_account(mut self, account: u32) -> Self {
        self.account = account;
        self
    }

    pub fn with_change(mut self, change: u32) -> Self {
        self.change = change;
        self
    }

    /// Indices `0..count`
    pub fn with_address_count(mut self, count: u32) -> Self {
        self.address_indices = (0..count).collect();
        self
    }

    pub fn with_address_indices(mut self, indices: Vec<u32>) -> Self {
        self.address_indices = indices;
        self
    }

    /// Parse a JSON request; missing fields take their defaults
    pub fn from_json(json: &str) -> DeriveResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| DerivationError::invalid_parameter(format!("Invalid request config: {}", e)))
    }

    /// Reject malformed requests before any derivation starts
    pub fn validate(&self) -> DeriveResult<()> {
        if self.address_indices.is_empty() {
            return Err(DerivationError::invalid_parameter(
                "At least one address index is required",
            ));
        }
        if self.address_indices.len() > MAX_ADDRESSES_PER_COIN {
            return Err(DerivationError::invalid_parameter(format!(
                "At most {} addresses per coin, got {}",
                MAX_ADDRESSES_PER_COIN,
                self.address_indices.len()
            )));
        }
        if let Some(index) = self.address_indices.iter().find(|i| **i >= HARDENED) {
            return Err(DerivationError::invalid_parameter(format!(
                "Address index {} out of range (must be below 2^31)",
                index
            )));
        }
        if self.coins.iter().any(|c| c.trim().is_empty()) {
            return Err(DerivationError::invalid_parameter("Coin names cannot be empty"));
        }

        Bip44PathResolver::validate(self.account, self.change, 0)
    }

    /// Requested coin names, de-duplicated in first-seen order
    pub fn coin_names(&self, registry: &CoinRegistry) -> Vec<String> {
        if self.coins.is_empty() {
            return registry.names();
        }

        let mut names: Vec<String> = Vec::with_capacity(self.coins.len());
        for coin in &self.coins {
            let name = coin.trim().to_lowercase();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
