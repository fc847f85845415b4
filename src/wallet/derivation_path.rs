//! Key Derivation Paths
//!
//! Parses, prints and builds BIP-32/44 derivation paths:
//! - `m/44'/0'/0'/0/0` style text, with `'`, `h` or `H` marking hardened steps
//! - Standard `purpose'/coin_type'/account'/change/address_index` paths
//!   built from a [`CoinProfile`]

use std::fmt;
use std::str::FromStr;

use crate::error::{DerivationError, DeriveResult};

use super::coins::CoinProfile;

/// Standard BIP purposes
pub mod bip_purposes {
    pub const BIP44: u32 = 44; // Legacy (P2PKH) and account-based coins
    pub const BIP84: u32 = 84; // Native SegWit (P2WPKH)
}

/// Hardened offset for BIP-32 derivation
pub const HARDENED: u32 = 0x8000_0000;

/// Change level values
pub const CHANGE_EXTERNAL: u32 = 0;
pub const CHANGE_INTERNAL: u32 = 1;

/// Single component of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivationComponent {
    pub index: u32,
    pub hardened: bool,
}

impl DerivationComponent {
    pub fn new(index: u32, hardened: bool) -> Self {
        Self { index, hardened }
    }

    pub fn hardened(index: u32) -> Self {
        Self::new(index, true)
    }

    pub fn normal(index: u32) -> Self {
        Self::new(index, false)
    }

    /// Split a raw 32-bit child number into index and hardened flag
    pub fn from_child_number(child_number: u32) -> Self {
        Self::new(child_number & !HARDENED, child_number & HARDENED != 0)
    }

    /// Get the full index including hardened bit
    pub fn full_index(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED
        } else {
            self.index
        }
    }
}

impl fmt::Display for DerivationComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// Ordered sequence of child steps from a master key
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    components: Vec<DerivationComponent>,
}

impl DerivationPath {
    /// Build a path; every index must fit below the hardened offset
    pub fn new(components: Vec<DerivationComponent>) -> DeriveResult<Self> {
        if let Some(bad) = components.iter().find(|c| c.index >= HARDENED) {
            return Err(DerivationError::invalid_parameter(format!(
                "Path component {} exceeds maximum value {}",
                bad.index,
                HARDENED - 1
            )));
        }
        Ok(Self { components })
    }

    /// The empty path `m`
    pub fn master() -> Self {
        Self::default()
    }

    pub fn components(&self) -> &[DerivationComponent] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The first `len` steps of this path
    pub fn prefix(&self, len: usize) -> DerivationPath {
        Self {
            components: self.components[..len.min(self.components.len())].to_vec(),
        }
    }

    /// Append one step, returning a new path
    pub fn child(&self, component: DerivationComponent) -> DeriveResult<DerivationPath> {
        let mut components = self.components.clone();
        components.push(component);
        Self::new(components)
    }

    /// Copy of this path with every step hardened
    pub fn hardened_all(&self) -> DerivationPath {
        Self {
            components: self
                .components
                .iter()
                .map(|c| DerivationComponent::hardened(c.index))
                .collect(),
        }
    }

    pub fn is_fully_hardened(&self) -> bool {
        self.components.iter().all(|c| c.hardened)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = DerivationError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim();

        let rest = match trimmed {
            "m" | "M" => return Ok(Self::master()),
            _ => trimmed
                .strip_prefix("m/")
                .or_else(|| trimmed.strip_prefix("M/"))
                .ok_or_else(|| {
                    DerivationError::invalid_parameter("Derivation path must start with 'm/'")
                })?,
        };

        let components = rest
            .split('/')
            .map(parse_component)
            .collect::<DeriveResult<Vec<_>>>()?;

        Self::new(components)
    }
}

/// Parse a single path component
fn parse_component(s: &str) -> DeriveResult<DerivationComponent> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(DerivationError::invalid_parameter("Empty path component"));
    }

    // Check for hardened indicator
    let (number_str, hardened) = match trimmed.strip_suffix(['\'', 'h', 'H']) {
        Some(number) => (number, true),
        None => (trimmed, false),
    };

    let index: u32 = number_str.parse().map_err(|e| {
        DerivationError::invalid_parameter(format!("Invalid path component '{}': {}", s, e))
    })?;

    // Overflow into the hardened bit is caught by DerivationPath::new
    Ok(DerivationComponent::new(index, hardened))
}

/// Builds standard BIP-44 style paths for registered coins
pub struct Bip44PathResolver;

impl Bip44PathResolver {
    /// `purpose'/coin_type'/account'/change/address_index`
    ///
    /// `change` must be 0 (external) or 1 (internal); `account` and
    /// `address_index` must be below 2^31.
    pub fn standard_path(
        profile: &CoinProfile,
        account: u32,
        change: u32,
        address_index: u32,
    ) -> DeriveResult<DerivationPath> {
        Self::validate(account, change, address_index)?;

        DerivationPath::new(vec![
            DerivationComponent::hardened(profile.purpose),
            DerivationComponent::hardened(profile.coin_type),
            DerivationComponent::hardened(account),
            DerivationComponent::normal(change),
            DerivationComponent::normal(address_index),
        ])
    }

    /// Standard path adjusted for the profile's curve.
    ///
    /// Curves without public derivation (Ed25519) get their change and
    /// address levels hardened.
    pub fn resolve(
        profile: &CoinProfile,
        account: u32,
        change: u32,
        address_index: u32,
    ) -> DeriveResult<DerivationPath> {
        let path = Self::standard_path(profile, account, change, address_index)?;

        if profile.curve.supports_normal_derivation() {
            Ok(path)
        } else {
            Ok(path.hardened_all())
        }
    }

    /// Validate the caller-supplied levels
    pub fn validate(account: u32, change: u32, address_index: u32) -> DeriveResult<()> {
        if account >= HARDENED {
            return Err(DerivationError::invalid_parameter(format!(
                "Account {} out of range (must be below 2^31)",
                account
            )));
        }
        if change != CHANGE_EXTERNAL && change != CHANGE_INTERNAL {
            return Err(DerivationError::invalid_parameter(format!(
                "Change must be 0 (external) or 1 (internal), got {}",
                change
            )));
        }
        if address_index >= HARDENED {
            return Err(DerivationError::invalid_parameter(format!(
                "Address index {} out of range (must be below 2^31)",
                address_index
            )));
        }
        Ok(())
    }
}
