//! Wallet Module
//!
//! Mnemonic handling, coin profiles, BIP-44 paths and batch derivation.

pub mod coins;
pub mod derivation;
pub mod derivation_path;
pub mod mnemonic;

pub use coins::*;
pub use derivation::*;
pub use derivation_path::*;
pub use mnemonic::*;

use crate::error::DeriveResult;
use crate::types::DerivationReport;
use crate::utils::derivation_config::DerivationRequest;

/// Generate a new mnemonic with `entropy_bits` of OS entropy
pub fn generate_mnemonic(entropy_bits: usize) -> DeriveResult<Mnemonic> {
    MnemonicCodec::<OsEntropy>::default().generate(entropy_bits)
}

/// Parse and checksum-verify a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> DeriveResult<Mnemonic> {
    Mnemonic::parse(phrase)
}

/// Derive every coin in `request` from a mnemonic phrase and passphrase.
///
/// Mnemonic and request errors fail the call; per-coin failures are
/// reported inside the returned [`DerivationReport`].
pub fn derive_all(phrase: &str, passphrase: &str, request: &DerivationRequest) -> DeriveResult<DerivationReport> {
    let mnemonic = Mnemonic::parse(phrase)?;
    let seed = MnemonicCodec::<OsEntropy>::to_seed(&mnemonic, passphrase);
    DerivationOrchestrator::default().derive_all(seed.as_bytes(), request)
}
