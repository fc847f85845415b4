//! Mnemonic Derivation Core
//!
//! Deterministic multi-coin key derivation from BIP-39 mnemonics.
//!
//! # Architecture
//!
//! This crate provides:
//! - **wallet**: Mnemonic codec, coin registry, BIP-44 paths, batch derivation
//! - **crypto**: BIP-32 / SLIP-0010 extended keys over secp256k1 and Ed25519
//! - **address**: Per-scheme address and import-format encoders
//! - **utils**: Hash helpers, redacting logger, request configuration
//!
//! # Security
//!
//! Entropy, seeds and private scalars live in `zeroize` buffers and are
//! wiped on drop. Nothing is persisted or sent anywhere.
//!
//! # Example
//!
//! ```rust,no_run
//! use mnemonic_derivation::{derive_all, DerivationRequest};
//!
//! let phrase = "abandon abandon abandon abandon abandon abandon \
//!               abandon abandon abandon abandon abandon about";
//! let request = DerivationRequest::new().with_coins(["bitcoin", "ethereum"]);
//! let report = derive_all(phrase, "", &request)?;
//! for address in report.get("bitcoin").unwrap_or_default() {
//!     println!("{} {}", address.path, address.address);
//! }
//! # Ok::<(), mnemonic_derivation::DerivationError>(())
//! ```

pub mod address;
pub mod crypto;
pub mod error;
pub mod types;
pub mod utils;
pub mod wallet;

pub use error::{DerivationError, DeriveResult, ErrorCode};
pub use types::*;

pub use address::{AddressEncoder, AddressScheme, ImportFormat};
pub use crypto::{CurveType, ExtendedKey, PublicKey};
pub use utils::derivation_config::DerivationRequest;
pub use wallet::{
    derive_all, generate_mnemonic, validate_mnemonic, Bip44PathResolver, CoinProfile, CoinRegistry,
    DerivationOrchestrator, DerivationPath, EntropySource, Mnemonic, MnemonicCodec, OsEntropy, Seed,
};

// Re-export hash helpers for binaries and integration tests
pub use utils::crypto::{hash160, keccak256, to_checksum_address};
