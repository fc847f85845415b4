//! Cryptographic core
//!
//! - Curve abstractions for secp256k1 and Ed25519
//! - BIP-32 / SLIP-0010 extended keys and child key derivation

pub mod bip32;
pub mod curves;

pub use bip32::{ExtendedKey, HARDENED_OFFSET, MAX_RESAMPLE_ATTEMPTS};
pub use curves::{CurveError, CurveType, Ed25519Curve, HdCurve, PublicKey, Secp256k1Curve};
