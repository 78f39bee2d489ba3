#![allow(deprecated)]
//! Integration tests for the user-map CLI
//!
//! Everything here runs without network access: offline editor commands,
//! configuration failures and the persisted session.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "USER_MAP_CONTRACT_ADDRESS",
    "USER_MAP_NETWORK",
    "USER_MAP_LCD_URL",
    "USER_MAP_SIGNER_URL",
    "USER_MAP_SESSION_TOKEN",
    "USER_MAP_LOG_JSON",
    "RUST_LOG",
];

/// Command isolated from the caller's environment, with its own home.
fn user_map_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("user-map").expect("binary not found");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("USER_MAP_HOME", home.path()).current_dir(home.path());
    cmd
}

fn write_session(home: &TempDir, session: Value) {
    fs::write(
        home.path().join("session.json"),
        serde_json::to_string_pretty(&session).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_validate_accepts_smart_quotes() {
    let home = TempDir::new().unwrap();
    user_map_cmd(&home)
        .args(["validate", "--text", "{\u{201C}a\u{201D}: \u{201C}b\u{201D}}"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid JSON"));
}

#[test]
fn test_validate_rejects_malformed_json() {
    let home = TempDir::new().unwrap();
    user_map_cmd(&home)
        .args(["validate", "--text", "{\"a\": "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON format"));
}

#[test]
fn test_validate_json_error_object() {
    let home = TempDir::new().unwrap();
    let output = user_map_cmd(&home)
        .args(["--json", "validate", "--text", "[1,"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["code"], "validation");
    assert_eq!(value["command"], "validate");
}

#[test]
fn test_validate_empty_text() {
    let home = TempDir::new().unwrap();
    user_map_cmd(&home)
        .args(["validate", "--text", "   "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to validate"));
}

#[test]
fn test_validate_needs_input() {
    let home = TempDir::new().unwrap();
    user_map_cmd(&home).arg("validate").assert().failure();
}

#[test]
fn test_format_keeps_key_order() {
    let home = TempDir::new().unwrap();
    user_map_cmd(&home)
        .args(["format", "--text", r#"{"b":1,"a":[true]}"#])
        .assert()
        .success()
        .stdout("{\n  \"b\": 1,\n  \"a\": [\n    true\n  ]\n}\n");
}

#[test]
fn test_format_reads_file_and_leaves_invalid_text() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("value.json");
    fs::write(&path, "{not json").unwrap();

    let output = user_map_cmd(&home)
        .arg("--json")
        .arg("format")
        .arg("--file")
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["valid"], false);
    assert_eq!(value["formatted"], "{not json");
}

#[test]
fn test_missing_contract_address_is_fatal() {
    let home = TempDir::new().unwrap();
    let commands: [&[&str]; 3] = [
        &["users"],
        &["login", "--address", "xion1me"],
        &["update", "--text", "{}"],
    ];
    for command in commands {
        user_map_cmd(&home)
            .args(command)
            .assert()
            .failure()
            .stderr(predicate::str::contains("USER_MAP_CONTRACT_ADDRESS"));
    }
    assert!(!home.path().join("session.json").exists());
}

#[test]
fn test_unknown_network_is_rejected() {
    let home = TempDir::new().unwrap();
    user_map_cmd(&home)
        .env("USER_MAP_CONTRACT_ADDRESS", "xion1contract")
        .args(["--network", "devnet", "users"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown network 'devnet'"));
}

#[test]
fn test_status_without_session() {
    let home = TempDir::new().unwrap();
    user_map_cmd(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not connected"));

    let output = user_map_cmd(&home).args(["status", "--json"]).output().unwrap();
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["connected"], false);
    assert_eq!(value["network"], "testnet");
}

#[test]
fn test_status_shows_saved_session() {
    let home = TempDir::new().unwrap();
    write_session(
        &home,
        serde_json::json!({
            "address": "xion1me",
            "last_receipt": { "transactionHash": "ABC123", "height": 42 },
            "pending_edit": "{\"a\":1}",
            "metadata": { "contract": "xion1contract", "network": "mainnet" }
        }),
    );

    user_map_cmd(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Connected: xion1me"))
        .stdout(predicate::str::contains(
            "https://www.mintscan.io/xion/tx/ABC123?height=42",
        ))
        .stdout(predicate::str::contains("{\"a\":1}"));
}

#[test]
fn test_logout_removes_session() {
    let home = TempDir::new().unwrap();
    user_map_cmd(&home)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("No session to clear"));

    write_session(&home, serde_json::json!({ "address": "xion1me", "metadata": {} }));
    user_map_cmd(&home)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    assert!(!home.path().join("session.json").exists());

    user_map_cmd(&home)
        .arg("status")
        .assert()
        .stdout(predicate::str::contains("Not connected"));
}

#[test]
fn test_explorer_with_explicit_transaction() {
    let home = TempDir::new().unwrap();
    user_map_cmd(&home)
        .args(["explorer", "--hash", "DEADBEEF", "--height", "7"])
        .assert()
        .success()
        .stdout("https://www.mintscan.io/xion-testnet/tx/DEADBEEF?height=7\n");

    user_map_cmd(&home)
        .args(["--network", "mainnet", "explorer", "--hash", "DEADBEEF", "--height", "7"])
        .assert()
        .success()
        .stdout("https://www.mintscan.io/xion/tx/DEADBEEF?height=7\n");
}

#[test]
fn test_explorer_uses_last_receipt() {
    let home = TempDir::new().unwrap();
    user_map_cmd(&home)
        .arg("explorer")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no recorded transaction"));

    write_session(
        &home,
        serde_json::json!({
            "address": "xion1me",
            "last_receipt": { "transactionHash": "FEED", "height": 9 },
            "metadata": { "network": "testnet" }
        }),
    );
    user_map_cmd(&home)
        .arg("explorer")
        .assert()
        .success()
        .stdout("https://www.mintscan.io/xion-testnet/tx/FEED?height=9\n");
}

#[test]
fn test_explorer_hash_requires_height() {
    let home = TempDir::new().unwrap();
    user_map_cmd(&home)
        .args(["explorer", "--hash", "DEADBEEF"])
        .assert()
        .failure();
}
