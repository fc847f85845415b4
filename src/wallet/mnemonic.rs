//! Mnemonic Codec
//!
//! BIP-39 entropy <-> sentence conversion, checksum validation and
//! sentence -> seed stretching.
//!
//! SECURITY: entropy, phrases and seeds are zeroized on drop and redacted in
//! `Debug` output.

use std::fmt;

use bip39::Language;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha512;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use crate::error::{DerivationError, DeriveResult};
use crate::utils::sha256;
use crate::log_debug;

/// Allowed entropy sizes in bits
pub const VALID_ENTROPY_BITS: [usize; 5] = [128, 160, 192, 224, 256];

/// Allowed sentence lengths in words
pub const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// PBKDF2 rounds for seed derivation
pub const PBKDF2_ROUNDS: u32 = 2048;

const BITS_PER_WORD: usize = 11;

/// Source of cryptographically secure random bytes
pub trait EntropySource {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> DeriveResult<()>;
}

/// Operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> DeriveResult<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| DerivationError::EntropyUnavailable(e.to_string()))
    }
}

/// A validated BIP-39 sentence over the English word list
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    indices: Zeroizing<Vec<u16>>,
    entropy: Zeroizing<Vec<u8>>,
}

impl Mnemonic {
    /// Encode `entropy` (16, 20, 24, 28 or 32 bytes) as a sentence
    pub fn from_entropy(entropy: &[u8]) -> DeriveResult<Self> {
        let entropy_bits = entropy.len() * 8;
        if !VALID_ENTROPY_BITS.contains(&entropy_bits) {
            return Err(DerivationError::invalid_parameter(format!(
                "Entropy must be one of {:?} bits, got {}",
                VALID_ENTROPY_BITS, entropy_bits
            )));
        }

        let checksum_bits = entropy_bits / 32;
        let hash = sha256(entropy);
        let total_bits = entropy_bits + checksum_bits;

        // entropy || leading checksum bits of SHA256(entropy)
        let bit = |i: usize| {
            if i < entropy_bits {
                bit_at(entropy, i)
            } else {
                bit_at(&hash, i - entropy_bits)
            }
        };

        let indices = (0..total_bits / BITS_PER_WORD)
            .map(|word| {
                (0..BITS_PER_WORD).fold(0u16, |acc, offset| {
                    (acc << 1) | bit(word * BITS_PER_WORD + offset) as u16
                })
            })
            .collect();

        Ok(Self {
            indices: Zeroizing::new(indices),
            entropy: Zeroizing::new(entropy.to_vec()),
        })
    }

    /// Parse and validate a sentence.
    ///
    /// Words may be separated by any whitespace and are NFKD-normalised and
    /// lowercased before lookup. Positions in errors are 1-based.
    pub fn parse(phrase: &str) -> DeriveResult<Self> {
        let normalized = Zeroizing::new(phrase.nfkd().collect::<String>().to_lowercase());
        let words: Vec<&str> = normalized.split_whitespace().collect();

        if !VALID_WORD_COUNTS.contains(&words.len()) {
            return Err(DerivationError::InvalidWordCount(words.len()));
        }

        let indices = words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                Language::English
                    .find_word(word)
                    .ok_or_else(|| DerivationError::UnknownWord {
                        word: word.to_string(),
                        position: i + 1,
                    })
            })
            .collect::<DeriveResult<Vec<u16>>>()?;
        let indices = Zeroizing::new(indices);

        let total_bits = indices.len() * BITS_PER_WORD;
        let checksum_bits = total_bits / 33;
        let entropy_bits = total_bits - checksum_bits;

        let bit = |i: usize| {
            let word = indices[i / BITS_PER_WORD];
            (word >> (BITS_PER_WORD - 1 - i % BITS_PER_WORD)) & 1 == 1
        };

        let mut entropy = Zeroizing::new(vec![0u8; entropy_bits / 8]);
        for i in (0..entropy_bits).filter(|i| bit(*i)) {
            entropy[i / 8] |= 0x80 >> (i % 8);
        }

        let hash = sha256(&entropy);
        let checksum_ok = (0..checksum_bits).all(|i| bit(entropy_bits + i) == bit_at(&hash, i));
        if !checksum_ok {
            return Err(DerivationError::ChecksumMismatch);
        }

        Ok(Self { indices, entropy })
    }

    pub fn word_count(&self) -> usize {
        self.indices.len()
    }

    pub fn entropy(&self) -> &[u8] {
        &self.entropy
    }

    pub fn entropy_bits(&self) -> usize {
        self.entropy.len() * 8
    }

    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        let list = Language::English.word_list();
        self.indices.iter().map(move |i| list[*i as usize])
    }

    /// Canonical sentence: single spaces, word list spelling
    pub fn phrase(&self) -> Zeroizing<String> {
        Zeroizing::new(self.words().collect::<Vec<_>>().join(" "))
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phrase())
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic([REDACTED {} words])", self.word_count())
    }
}

impl std::str::FromStr for Mnemonic {
    type Err = DerivationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// 64-byte BIP-39 seed
#[derive(Clone)]
pub struct Seed(Zeroizing<[u8; 64]>);

impl Seed {
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([REDACTED])")
    }
}

/// Generates, validates and stretches mnemonics
pub struct MnemonicCodec<E: EntropySource = OsEntropy> {
    source: E,
}

impl Default for MnemonicCodec<OsEntropy> {
    fn default() -> Self {
        Self::new(OsEntropy)
    }
}

impl<E: EntropySource> MnemonicCodec<E> {
    pub fn new(source: E) -> Self {
        Self { source }
    }

    /// Fresh mnemonic with `entropy_bits` of entropy
    pub fn generate(&mut self, entropy_bits: usize) -> DeriveResult<Mnemonic> {
        if !VALID_ENTROPY_BITS.contains(&entropy_bits) {
            return Err(DerivationError::invalid_parameter(format!(
                "Entropy must be one of {:?} bits, got {}",
                VALID_ENTROPY_BITS, entropy_bits
            )));
        }

        let mut entropy = Zeroizing::new(vec![0u8; entropy_bits / 8]);
        self.source.fill_bytes(&mut entropy)?;

        let mnemonic = Mnemonic::from_entropy(&entropy)?;
        log_debug!("mnemonic", "Generated mnemonic", words = mnemonic.word_count());
        Ok(mnemonic)
    }

    /// Fresh mnemonic of `word_count` words
    pub fn generate_words(&mut self, word_count: usize) -> DeriveResult<Mnemonic> {
        if !VALID_WORD_COUNTS.contains(&word_count) {
            return Err(DerivationError::invalid_parameter(format!(
                "Mnemonic length must be 12, 15, 18, 21, or 24, got {}",
                word_count
            )));
        }
        self.generate(word_count * 32 / 3)
    }

    pub fn validate(&self, phrase: &str) -> DeriveResult<Mnemonic> {
        Mnemonic::parse(phrase)
    }

    /// PBKDF2-HMAC-SHA512(NFKD(sentence), "mnemonic" + NFKD(passphrase), 2048)
    pub fn to_seed(mnemonic: &Mnemonic, passphrase: &str) -> Seed {
        let password = mnemonic.phrase();
        let salt = Zeroizing::new(format!("mnemonic{}", passphrase.nfkd().collect::<String>()));

        let mut seed = Zeroizing::new([0u8; 64]);
        pbkdf2::pbkdf2_hmac::<Sha512>(password.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, seed.as_mut());
        Seed(seed)
    }
}

fn bit_at(bytes: &[u8], i: usize) -> bool {
    (bytes[i / 8] >> (7 - i % 8)) & 1 == 1
}
