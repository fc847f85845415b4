//! Unified error types for the derivation engine
//!
//! Every failure the engine can surface flows through [`DerivationError`].
//! Each variant carries enough context (coin, index, curve, path prefix) to
//! reproduce the failure without inspecting internal state, and maps onto a
//! flat, serialisable [`ErrorCode`] for reporting.

use serde::{Deserialize, Serialize};

use crate::crypto::curves::{CurveError, CurveType};

/// Main error type for all derivation operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DerivationError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid word count: {0} (expected 12, 15, 18, 21 or 24)")]
    InvalidWordCount(usize),

    #[error("Unknown word '{word}' at position {position}")]
    UnknownWord { word: String, position: usize },

    #[error("Mnemonic checksum mismatch")]
    ChecksumMismatch,

    #[error("Seed produced an invalid {curve} master key")]
    InvalidSeed { curve: CurveType },

    #[error("Hardened child {index} requires a private key")]
    HardenedRequiresPrivateKey { index: u32 },

    #[error("{curve} has no normal derivation (child {index} is not hardened)")]
    UnsupportedNormalDerivation { curve: CurveType, index: u32 },

    #[error("Child derivation exhausted after {attempts} attempts starting at index {index}")]
    DerivationExhausted { index: u32, attempts: u32 },

    #[error("Unknown coin: {0}")]
    UnknownCoin(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Entropy source failed: {0}")]
    EntropyUnavailable(String),

    #[error("Derivation failed at {path} (step {step}): {source}")]
    AtPath {
        path: String,
        step: usize,
        #[source]
        source: Box<DerivationError>,
    },
}

impl DerivationError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedOperation(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Attach the failing path prefix and step number.
    pub fn at_path(self, path: impl Into<String>, step: usize) -> Self {
        Self::AtPath {
            path: path.into(),
            step,
            source: Box::new(self),
        }
    }

    /// The underlying failure, looking through any path context.
    pub fn root_cause(&self) -> &DerivationError {
        match self {
            Self::AtPath { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self.root_cause() {
            Self::InvalidParameter(_) => ErrorCode::InvalidParameter,
            Self::InvalidWordCount(_) => ErrorCode::InvalidWordCount,
            Self::UnknownWord { .. } => ErrorCode::UnknownWord,
            Self::ChecksumMismatch => ErrorCode::ChecksumMismatch,
            Self::InvalidSeed { .. } => ErrorCode::InvalidSeed,
            Self::HardenedRequiresPrivateKey { .. } => ErrorCode::HardenedRequiresPrivateKey,
            Self::UnsupportedNormalDerivation { .. } => ErrorCode::UnsupportedNormalDerivation,
            Self::DerivationExhausted { .. } => ErrorCode::DerivationExhausted,
            Self::UnknownCoin(_) => ErrorCode::UnknownCoin,
            Self::UnsupportedOperation(_) => ErrorCode::UnsupportedOperation,
            Self::Encoding(_) => ErrorCode::Encoding,
            Self::EntropyUnavailable(_) => ErrorCode::EntropyUnavailable,
            // root_cause never yields AtPath
            Self::AtPath { .. } => ErrorCode::Internal,
        }
    }

    /// Mnemonic and request-shape errors abort a whole batch.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::InvalidParameter
                | ErrorCode::InvalidWordCount
                | ErrorCode::UnknownWord
                | ErrorCode::ChecksumMismatch
        )
    }
}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Request errors
    InvalidParameter,
    InvalidWordCount,
    UnknownWord,
    ChecksumMismatch,

    // Derivation errors
    InvalidSeed,
    HardenedRequiresPrivateKey,
    UnsupportedNormalDerivation,
    DerivationExhausted,

    // Per-coin errors
    UnknownCoin,
    UnsupportedOperation,
    Encoding,

    EntropyUnavailable,
    Internal,
}

/// Result type alias for derivation operations
pub type DeriveResult<T> = Result<T, DerivationError>;

impl From<CurveError> for DerivationError {
    fn from(e: CurveError) -> Self {
        match e {
            CurveError::InvalidPublicKey(msg) | CurveError::InvalidPrivateKey(msg) => {
                DerivationError::Encoding(msg)
            }
            other => DerivationError::InvalidParameter(other.to_string()),
        }
    }
}

impl From<bech32::Error> for DerivationError {
    fn from(e: bech32::Error) -> Self {
        DerivationError::Encoding(format!("Bech32 error: {}", e))
    }
}
