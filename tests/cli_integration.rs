use std::fs;
use std::process::{Command, Output};

use mnemonic_derivation::{derive_all, DerivationRequest, Mnemonic};
use serde_json::Value;

const ABANDON_ABOUT: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn run_cli(args: &[&str]) -> Output {
    let binary_path = assert_cmd::cargo::cargo_bin!("mnemonic-derivation");
    Command::new(binary_path)
        .args(args)
        .output()
        .expect("cli runs")
}

fn run_json(args: &[&str]) -> Value {
    let output = run_cli(args);
    assert!(output.status.success(), "cli exited unsuccessfully: {:?}", output);
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf8");
    serde_json::from_str(&stdout).expect("stdout is valid json")
}

#[test]
fn cli_derives_known_addresses_from_supplied_mnemonic() {
    let json = run_json(&["--mnemonic", ABANDON_ABOUT, "--json", "--coins", "bitcoin,ethereum"]);
    let result = &json["results"][0];
    assert_eq!(result["mnemonic"], ABANDON_ABOUT);

    let bitcoin = &result["addresses"]["bitcoin"][0];
    assert_eq!(bitcoin["address"], "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
    assert_eq!(bitcoin["path"], "m/44'/0'/0'/0/0");
    assert_eq!(
        bitcoin["import_format"],
        "L4p2b9VAf8k5aUahF1JCJUzZkgNEAqLfq8DDdQiyAprQAKSbu8hf"
    );

    let ethereum = &result["addresses"]["ethereum"][0];
    assert_eq!(ethereum["address"], "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
    assert!(ethereum.get("import_format").is_none());

    assert_eq!(result["failures"].as_object().unwrap().len(), 0);
}

#[test]
fn cli_address_count_and_account_flags() {
    let json = run_json(&["-m", ABANDON_ABOUT, "--json", "-c", "bitcoin", "-a", "2"]);
    let addresses = json["results"][0]["addresses"]["bitcoin"].as_array().unwrap();
    assert_eq!(addresses.len(), 2);
    assert_eq!(addresses[1]["address"], "1Ak8PffB2meyfYnbXZR9EGfLfFZVpzJvQP");
    assert_eq!(addresses[1]["path"], "m/44'/0'/0'/0/1");

    let json = run_json(&["-m", ABANDON_ABOUT, "--json", "-c", "bitcoin", "--account", "1"]);
    let first = &json["results"][0]["addresses"]["bitcoin"][0];
    assert_eq!(first["address"], "15qucUWKf95Fo58FdCBhUTSAtsm22HHE2Q");
    assert_eq!(first["path"], "m/44'/0'/1'/0/0");
}

#[test]
fn cli_generated_mnemonics_are_valid_and_reproducible() {
    let json = run_json(&["--json", "-n", "2", "-l", "24", "-c", "solana"]);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    for result in results {
        let phrase = result["mnemonic"].as_str().unwrap();
        let mnemonic = Mnemonic::parse(phrase).expect("generated mnemonic validates");
        assert_eq!(mnemonic.word_count(), 24);

        let report = derive_all(phrase, "", &DerivationRequest::new().with_coins(["solana"])).unwrap();
        assert_eq!(
            result["addresses"]["solana"][0]["address"],
            report.get("solana").unwrap()[0].address.as_str()
        );
        assert_eq!(result["addresses"]["solana"][0]["path"], "m/44'/501'/0'/0'/0'");
    }
}

#[test]
fn cli_reports_unknown_coin_without_failing() {
    let json = run_json(&["-m", ABANDON_ABOUT, "--json", "-c", "bitcoin,notacoin"]);
    let result = &json["results"][0];
    assert!(result["addresses"]["bitcoin"].is_array());
    assert_eq!(result["failures"]["notacoin"]["code"], "unknown_coin");
}

#[test]
fn cli_rejects_invalid_mnemonic() {
    let output = run_cli(&["--mnemonic", "abandon abandon abandon", "--json"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid mnemonic"), "stderr: {}", stderr);
}

#[test]
fn cli_rejects_invalid_request() {
    let output = run_cli(&["-m", ABANDON_ABOUT, "--change", "2"]);
    assert!(!output.status.success());

    let output = run_cli(&["-l", "13"]);
    assert!(!output.status.success());

    let output = run_cli(&["-m", ABANDON_ABOUT, "-a", "0"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("At least one address index is required"), "stderr: {}", stderr);
}

#[test]
fn cli_text_output_layout() {
    let output = run_cli(&["-m", ABANDON_ABOUT, "-c", "bitcoin,ethereum"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.starts_with(&format!("Mnemonic 1: {}", ABANDON_ABOUT)));
    assert!(stdout.contains("Bitcoin Information:"));
    assert!(stdout.contains("WIF Private Key: L4p2b9VAf8k5aUahF1JCJUzZkgNEAqLfq8DDdQiyAprQAKSbu8hf"));
    assert!(stdout.contains("  Address: 1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA"));
    assert!(stdout.contains("  Path: m/44'/60'/0'/0/0"));

    let bitcoin = stdout.find("Bitcoin Information:").unwrap();
    let ethereum = stdout.find("Ethereum Information:").unwrap();
    assert!(bitcoin < ethereum);
}

#[test]
fn cli_config_file_with_flag_override() {
    let path = std::env::temp_dir().join(format!("mnemonic-derivation-config-{}.json", std::process::id()));
    fs::write(&path, r#"{"coins": ["litecoin"], "address_indices": [0, 1]}"#).unwrap();
    let config = path.to_str().unwrap();

    let json = run_json(&["-m", ABANDON_ABOUT, "--json", "--config", config]);
    let litecoin = json["results"][0]["addresses"]["litecoin"].as_array().unwrap();
    assert_eq!(litecoin.len(), 2);
    assert_eq!(litecoin[0]["address"], "LUWPbpM43E2p7ZSh8cyTBEkvpHmr3cB8Ez");

    let json = run_json(&["-m", ABANDON_ABOUT, "--json", "--config", config, "-a", "3"]);
    assert_eq!(
        json["results"][0]["addresses"]["litecoin"].as_array().unwrap().len(),
        3
    );

    fs::remove_file(&path).unwrap();
}
