//! Utilities Module
//!
//! Common utilities used across the crate.

pub mod crypto;
pub mod derivation_config;
pub mod logging;

pub use crypto::*;
