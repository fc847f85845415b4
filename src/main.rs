use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use zeroize::Zeroizing;

use mnemonic_derivation::utils::logging::{set_max_level, LogLevel};
use mnemonic_derivation::wallet::VALID_WORD_COUNTS;
use mnemonic_derivation::{
    log_debug, log_info, CoinFailure, CoinRegistry, DerivationOrchestrator, DerivationReport,
    DerivationRequest, DerivedAddress, Mnemonic, MnemonicCodec, OsEntropy,
};

/// Generate BIP-39 mnemonics and derive multi-coin addresses from them.
#[derive(Parser, Debug)]
#[command(name = "mnemonic-derivation", version, about)]
struct Cli {
    /// Mnemonic length in words.
    #[arg(short, long, default_value_t = 12, value_parser = parse_word_count)]
    length: usize,

    /// Number of mnemonics to generate.
    #[arg(short, long, default_value_t = 1)]
    number: usize,

    /// Addresses to derive per coin.
    #[arg(short, long)]
    addresses: Option<u32>,

    /// Optional BIP-39 passphrase.
    #[arg(short, long, default_value = "")]
    passphrase: String,

    /// Derive from this phrase instead of generating one.
    #[arg(short, long)]
    mnemonic: Option<String>,

    /// Comma-separated coin names (default: every supported coin).
    #[arg(short, long, value_delimiter = ',')]
    coins: Option<Vec<String>>,

    /// BIP-44 account index.
    #[arg(long)]
    account: Option<u32>,

    /// 0 for receiving addresses, 1 for change addresses.
    #[arg(long)]
    change: Option<u32>,

    /// JSON file holding a derivation request; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long)]
    json: bool,

    /// Log debug output to stderr.
    #[arg(long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(long)]
    quiet: bool,
}

fn parse_word_count(value: &str) -> std::result::Result<usize, String> {
    let count: usize = value.parse().map_err(|_| format!("'{}' is not a number", value))?;
    if VALID_WORD_COUNTS.contains(&count) {
        Ok(count)
    } else {
        Err(format!("word count must be one of {:?}", VALID_WORD_COUNTS))
    }
}

#[derive(Serialize)]
struct Output<'a> {
    results: Vec<MnemonicOutput<'a>>,
}

#[derive(Serialize)]
struct MnemonicOutput<'a> {
    mnemonic: &'a str,
    addresses: &'a BTreeMap<String, Vec<DerivedAddress>>,
    failures: &'a BTreeMap<String, CoinFailure>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        set_max_level(LogLevel::Debug);
    } else if cli.quiet {
        set_max_level(LogLevel::Error);
    }

    let request = build_request(&cli)?;
    let mnemonics = collect_mnemonics(&cli)?;

    let orchestrator = DerivationOrchestrator::default();
    let mut results = Vec::with_capacity(mnemonics.len());
    for mnemonic in &mnemonics {
        let seed = MnemonicCodec::<OsEntropy>::to_seed(mnemonic, &cli.passphrase);
        let report = orchestrator.derive_all(seed.as_bytes(), &request)?;
        results.push((mnemonic.phrase(), report));
    }

    if cli.json {
        print_json(&results)?;
    } else {
        print_text(&results, &request.coin_names(orchestrator.registry()), orchestrator.registry());
    }

    Ok(())
}

/// Merge the optional config file with explicit flags
fn build_request(cli: &Cli) -> Result<DerivationRequest> {
    let mut request = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            DerivationRequest::from_json(&json)?
        }
        None => DerivationRequest::default(),
    };

    if let Some(coins) = &cli.coins {
        request.coins = coins.clone();
    }
    if let Some(account) = cli.account {
        request.account = account;
    }
    if let Some(change) = cli.change {
        request.change = change;
    }
    if let Some(count) = cli.addresses {
        request.address_indices = (0..count).collect();
    }

    request.validate()?;
    Ok(request)
}

fn collect_mnemonics(cli: &Cli) -> Result<Vec<Mnemonic>> {
    if let Some(phrase) = &cli.mnemonic {
        let phrase = Zeroizing::new(phrase.clone());
        let mnemonic = Mnemonic::parse(&phrase).context("invalid mnemonic")?;
        return Ok(vec![mnemonic]);
    }

    let mut codec = MnemonicCodec::<OsEntropy>::default();
    let mut mnemonics = Vec::with_capacity(cli.number);
    for _ in 0..cli.number {
        mnemonics.push(codec.generate_words(cli.length)?);
    }
    log_info!("cli", "Generated mnemonics", count = mnemonics.len(), words = cli.length);
    Ok(mnemonics)
}

fn print_json(results: &[(Zeroizing<String>, DerivationReport)]) -> Result<()> {
    let output = Output {
        results: results
            .iter()
            .map(|(phrase, report)| MnemonicOutput {
                mnemonic: phrase.as_str(),
                addresses: &report.addresses,
                failures: &report.failures,
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text(results: &[(Zeroizing<String>, DerivationReport)], coins: &[String], registry: &CoinRegistry) {
    for (i, (phrase, report)) in results.iter().enumerate() {
        println!("Mnemonic {}: {}", i + 1, phrase.as_str());
        println!();

        for coin in coins {
            let title = registry
                .get(coin)
                .map(|profile| profile.display_name())
                .unwrap_or_else(|_| coin.clone());
            println!("{} Information:", title);

            if let Some(failure) = report.failure(coin) {
                println!("  Unavailable: {}", failure.message);
                println!();
                continue;
            }

            for (n, derived) in report.get(coin).unwrap_or_default().iter().enumerate() {
                println!("Address {}:", n + 1);
                println!("  Private Key: {}", derived.private_key_hex);
                if let Some(wif) = &derived.import_format {
                    println!("  WIF Private Key: {}", wif);
                }
                println!("  Public Key: {}", derived.public_key_hex);
                println!("  Address: {}", derived.address);
                println!("  Path: {}", derived.path);
            }
            println!();
        }
        log_debug!("cli", "Printed mnemonic report", position = i + 1);
    }
}
