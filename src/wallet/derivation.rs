//! Key Derivation
//!
//! Drives master key -> path -> child key -> address for every requested
//! coin and address index.
//!
//! Failures are isolated per coin: an unknown name, a curve that cannot walk
//! the path or an encoder error removes that coin from the results and
//! records the cause, while the other coins complete. Only request-level
//! errors (bad account/change/indices) abort the whole batch.
//!
//! SECURITY: seeds and private scalars stay in zeroizing buffers; only paths
//! and coin names are logged.

use std::collections::BTreeMap;
use std::thread;

use crate::address::{encode_import_format, AddressEncoder};
use crate::crypto::bip32::ExtendedKey;
use crate::crypto::curves::CurveType;
use crate::error::{DerivationError, DeriveResult, ErrorCode};
use crate::types::{CoinFailure, DerivationReport, DerivedAddress};
use crate::utils::derivation_config::DerivationRequest;
use crate::{log_debug, log_error, log_info, log_warn};

use super::coins::{CoinProfile, CoinRegistry};
use super::derivation_path::{Bip44PathResolver, DerivationComponent, DerivationPath};

/// Levels above the address index: purpose'/coin_type'/account'/change
const CHAIN_DEPTH: usize = 4;

/// Master keys for the curves a batch needs, derived once per seed
struct MasterKeys {
    keys: BTreeMap<CurveType, DeriveResult<ExtendedKey>>,
}

impl MasterKeys {
    fn derive<'p>(seed: &[u8], profiles: impl IntoIterator<Item = &'p CoinProfile>) -> Self {
        let mut keys = BTreeMap::new();
        for profile in profiles {
            keys.entry(profile.curve)
                .or_insert_with(|| ExtendedKey::master(seed, profile.curve));
        }
        Self { keys }
    }

    fn get(&self, curve: CurveType) -> DeriveResult<&ExtendedKey> {
        match self.keys.get(&curve) {
            Some(Ok(key)) => Ok(key),
            Some(Err(e)) => Err(e.clone()),
            None => Err(DerivationError::InvalidSeed { curve }),
        }
    }
}

/// Runs batch derivations against a coin registry
#[derive(Debug, Clone)]
pub struct DerivationOrchestrator {
    registry: CoinRegistry,
}

impl Default for DerivationOrchestrator {
    fn default() -> Self {
        Self::new(CoinRegistry::builtin())
    }
}

impl DerivationOrchestrator {
    pub fn new(registry: CoinRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CoinRegistry {
        &self.registry
    }

    /// Derive every requested coin and index from `seed`, one coin at a time
    pub fn derive_all(&self, seed: &[u8], request: &DerivationRequest) -> DeriveResult<DerivationReport> {
        let (profiles, mut report) = self.prepare(request)?;
        let masters = MasterKeys::derive(seed, profiles.iter().map(|(_, p)| *p));

        for (name, profile) in &profiles {
            let result = masters
                .get(profile.curve)
                .and_then(|master| derive_coin(master, profile, request));
            record(&mut report, name, result);
        }

        log_summary(&report);
        Ok(report)
    }

    /// Same results as [`derive_all`](Self::derive_all), one scoped thread
    /// per coin
    pub fn derive_all_parallel(
        &self,
        seed: &[u8],
        request: &DerivationRequest,
    ) -> DeriveResult<DerivationReport> {
        let (profiles, mut report) = self.prepare(request)?;
        let masters = MasterKeys::derive(seed, profiles.iter().map(|(_, p)| *p));

        let outcomes: Vec<(String, DeriveResult<Vec<DerivedAddress>>, bool)> = thread::scope(|scope| {
            let handles: Vec<_> = profiles
                .iter()
                .map(|(name, profile)| {
                    let masters = &masters;
                    let handle = scope.spawn(move || {
                        masters
                            .get(profile.curve)
                            .and_then(|master| derive_coin(master, profile, request))
                    });
                    (name.clone(), handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(name, handle)| match handle.join() {
                    Ok(result) => (name, result, false),
                    Err(_) => (name, Ok(Vec::new()), true),
                })
                .collect()
        });

        for (name, result, panicked) in outcomes {
            if panicked {
                log_error!("derivation", "Derivation worker panicked", coin = name);
                report.failures.insert(
                    name.clone(),
                    CoinFailure {
                        coin: name,
                        code: ErrorCode::Internal,
                        message: "Derivation worker panicked".to_string(),
                    },
                );
            } else {
                record(&mut report, &name, result);
            }
        }

        log_summary(&report);
        Ok(report)
    }

    /// Validate the request and resolve names; unknown coins go straight to
    /// the failure table
    fn prepare(&self, request: &DerivationRequest) -> DeriveResult<(Vec<(String, &CoinProfile)>, DerivationReport)> {
        request.validate()?;

        let mut report = DerivationReport::default();
        let mut profiles = Vec::new();

        for name in request.coin_names(&self.registry) {
            match self.registry.get(&name) {
                Ok(profile) => profiles.push((name, profile)),
                Err(e) => record(&mut report, &name, Err(e)),
            }
        }

        log_debug!(
            "derivation",
            "Starting batch",
            coins = profiles.len(),
            indices = request.address_indices.len(),
            account = request.account,
            change = request.change
        );

        Ok((profiles, report))
    }
}

/// All requested indices for one coin
///
/// The chain key (`purpose'/coin_type'/account'/change`) is derived once and
/// each address index is a single step below it.
pub fn derive_coin(
    master: &ExtendedKey,
    profile: &CoinProfile,
    request: &DerivationRequest,
) -> DeriveResult<Vec<DerivedAddress>> {
    let first_index = request
        .address_indices
        .first()
        .copied()
        .ok_or_else(|| DerivationError::invalid_parameter("At least one address index is required"))?;

    let requested_chain = Bip44PathResolver::resolve(profile, request.account, request.change, first_index)?
        .prefix(CHAIN_DEPTH);
    // Resampling may have moved any of these levels
    let (chain_key, chain_path) = master.derive_path_traced(&requested_chain)?;

    request
        .address_indices
        .iter()
        .map(|&index| {
            let path = Bip44PathResolver::resolve(profile, request.account, request.change, index)?;
            let leaf = path.components()[CHAIN_DEPTH];

            let key = chain_key
                .derive_child(leaf.full_index())
                .map_err(|e| e.at_path(path.to_string(), CHAIN_DEPTH))?;

            let derived_path = chain_path.child(DerivationComponent::from_child_number(key.child_index()))?;
            encode_address(&key, profile, &derived_path)
        })
        .collect()
}

/// Encode one derived key for `profile`
pub fn encode_address(
    key: &ExtendedKey,
    profile: &CoinProfile,
    path: &DerivationPath,
) -> DeriveResult<DerivedAddress> {
    let private_key = key.private_key().ok_or_else(|| {
        DerivationError::unsupported(format!("{} at {} has no private key", profile.name, path))
    })?;

    let address = profile.address_scheme.encode(key.public_key())?;
    let import_format = if profile.supports_import_format() {
        Some(encode_import_format(private_key, profile)?)
    } else {
        None
    };

    log_debug!("derivation", "Derived key", coin = profile.name, path = path);

    Ok(DerivedAddress {
        coin: profile.name.clone(),
        path: path.to_string(),
        private_key_hex: hex::encode(private_key),
        public_key_hex: key.public_key().to_compressed_hex(),
        address,
        import_format,
    })
}

fn record(report: &mut DerivationReport, coin: &str, result: DeriveResult<Vec<DerivedAddress>>) {
    match result {
        Ok(addresses) => {
            report.addresses.insert(coin.to_string(), addresses);
        }
        Err(e) => {
            log_warn!("derivation", "Unable to process coin", coin = coin, reason = e);
            report.failures.insert(coin.to_string(), CoinFailure::new(coin, &e));
        }
    }
}

fn log_summary(report: &DerivationReport) {
    log_info!(
        "derivation",
        "Batch complete",
        coins = report.addresses.len(),
        derived = report.address_count(),
        failed = report.failures.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{AddressScheme, ImportFormat};
    use crate::wallet::mnemonic::{Mnemonic, MnemonicCodec, OsEntropy};

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn seed() -> Vec<u8> {
        let mnemonic = Mnemonic::parse(ABANDON_ABOUT).unwrap();
        MnemonicCodec::<OsEntropy>::to_seed(&mnemonic, "").as_bytes().to_vec()
    }

    #[test]
    fn test_known_addresses() {
        let request = DerivationRequest::new().with_coins(["bitcoin", "ethereum", "bitcoin_segwit"]);
        let report = DerivationOrchestrator::default().derive_all(&seed(), &request).unwrap();
        assert!(report.is_complete());

        let btc = &report.get("bitcoin").unwrap()[0];
        assert_eq!(btc.path, "m/44'/0'/0'/0/0");
        assert_eq!(btc.address, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
        assert_eq!(
            btc.import_format.as_deref(),
            Some("L4p2b9VAf8k5aUahF1JCJUzZkgNEAqLfq8DDdQiyAprQAKSbu8hf")
        );

        let eth = &report.get("ethereum").unwrap()[0];
        assert_eq!(eth.address, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
        assert_eq!(
            eth.private_key_hex,
            "1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727"
        );
        assert!(eth.import_format.is_none());

        let segwit = &report.get("bitcoin_segwit").unwrap()[0];
        assert_eq!(segwit.path, "m/84'/0'/0'/0/0");
        assert_eq!(segwit.address, "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu");
    }

    #[test]
    fn test_batch_isolation() {
        let request = DerivationRequest::new().with_coins(["bitcoin", "unknowncoin", "litecoin"]);
        let orchestrator = DerivationOrchestrator::default();
        let report = orchestrator.derive_all(&seed(), &request).unwrap();

        assert_eq!(report.addresses.len(), 2);
        assert_eq!(report.failure("unknowncoin").unwrap().code, ErrorCode::UnknownCoin);

        let alone = orchestrator
            .derive_all(&seed(), &DerivationRequest::new().with_coins(["bitcoin", "litecoin"]))
            .unwrap();
        assert_eq!(report.addresses, alone.addresses);
    }

    #[test]
    fn test_curve_failure_is_isolated() {
        // Witness v1 is rejected by the SegWit encoder
        let mut broken = CoinRegistry::builtin().get("ethereum").unwrap().clone();
        broken.name = "broken".into();
        broken.address_scheme = AddressScheme::Bech32Segwit {
            hrp: "bc".into(),
            witness_version: 1,
        };
        let registry = CoinRegistry::builtin().with_profile(broken).unwrap();

        let request = DerivationRequest::new().with_coins(["broken", "ethereum"]);
        let report = DerivationOrchestrator::new(registry).derive_all(&seed(), &request).unwrap();

        assert_eq!(report.failure("broken").unwrap().code, ErrorCode::Encoding);
        assert!(report.get("ethereum").is_some());
    }

    #[test]
    fn test_ed25519_paths_are_promoted() {
        let request = DerivationRequest::new()
            .with_coins(["solana", "stellar"])
            .with_address_count(2);
        let report = DerivationOrchestrator::default().derive_all(&seed(), &request).unwrap();

        let solana = report.get("solana").unwrap();
        assert_eq!(solana[0].path, "m/44'/501'/0'/0'/0'");
        assert_eq!(solana[1].path, "m/44'/501'/0'/0'/1'");
        assert_eq!(solana[0].address, "B9sVeu4rJU12oUrUtzjc6BSNuEXdfvurZkdcaTVkP2LY");
        assert_eq!(
            solana[0].public_key_hex,
            format!("00{}", hex::encode(bs58::decode(&solana[0].address).into_vec().unwrap()))
        );

        let stellar = report.get("stellar").unwrap();
        assert!(stellar[0].address.starts_with('G'));
        assert_eq!(stellar[0].path, "m/44'/148'/0'/0'/0'");
    }

    #[test]
    fn test_request_errors_abort() {
        let request = DerivationRequest::new().with_change(5);
        let err = DerivationOrchestrator::default().derive_all(&seed(), &request).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let request = DerivationRequest::new()
            .with_coins(["bitcoin", "ethereum", "solana", "nope", "ripple"])
            .with_change(1)
            .with_address_indices(vec![0, 3, 9]);
        let orchestrator = DerivationOrchestrator::default();

        let sequential = orchestrator.derive_all(&seed(), &request).unwrap();
        let parallel = orchestrator.derive_all_parallel(&seed(), &request).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.get("ripple").unwrap()[2].path, "m/44'/144'/0'/1/9");
    }

    #[test]
    fn test_import_format_for_every_wif_coin() {
        let report = DerivationOrchestrator::default()
            .derive_all(&seed(), &DerivationRequest::new())
            .unwrap();
        assert!(report.is_complete());

        for profile in CoinRegistry::builtin().profiles() {
            let derived = &report.get(&profile.name).unwrap()[0];
            match profile.import_format {
                ImportFormat::Wif { version } => {
                    let decoded = crate::address::wif::decode(derived.import_format.as_ref().unwrap()).unwrap();
                    assert_eq!(decoded.version, version);
                    assert_eq!(hex::encode(*decoded.private_key), derived.private_key_hex);
                }
                ImportFormat::None => assert!(derived.import_format.is_none()),
            }
        }
    }
}
