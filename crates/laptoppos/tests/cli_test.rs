//! Integration tests for the `laptoppos` CLI binary.
//!
//! These tests cover argument parsing, help output, completions, the
//! resource table and config inspection -- none of them need a running
//! LaptopPOS server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `laptoppos` binary with env isolation.
fn laptoppos_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("laptoppos");
    cmd.env("HOME", "/tmp/laptoppos-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/laptoppos-cli-test-nonexistent")
        .env_remove("LAPTOPPOS_CONFIG")
        .env_remove("LAPTOPPOS_ORIGIN")
        .env_remove("LAPTOPPOS_TENANT_ID")
        .env_remove("LAPTOPPOS_USER_ID")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = laptoppos_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    laptoppos_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("watch")
            .and(predicate::str::contains("resources"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    laptoppos_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("laptoppos"));
}

#[test]
fn test_completions_bash() {
    laptoppos_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    laptoppos_cmd().arg("frobnicate").assert().code(2);
}

// ── Resources ───────────────────────────────────────────────────────

#[test]
fn test_resources_table() {
    laptoppos_cmd().arg("resources").assert().success().stdout(
        predicate::str::contains("service-tickets")
            .and(predicate::str::contains("Tiket Servis"))
            .and(predicate::str::contains("/api/products/low-stock")),
    );
}

#[test]
fn test_resources_json() {
    let output = laptoppos_cmd()
        .args(["resources", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 14);

    let products = entries
        .iter()
        .find(|e| e["resource"] == "products")
        .unwrap();
    pretty_assertions::assert_eq!(
        products["cache_keys"],
        serde_json::json!(["/api/products", "/api/products/low-stock", "/api/dashboard/stats"])
    );
}

#[test]
fn test_resources_plain() {
    laptoppos_cmd()
        .args(["resources", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("users\n"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_flag() {
    laptoppos_cmd()
        .args(["config", "path", "--config", "/tmp/elsewhere/config.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/elsewhere/config.toml"));
}

#[test]
fn test_config_show_merges_file_and_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "origin = \"https://toko.example\"\ntenant_id = \"toko-jaya\"\n",
    )
    .unwrap();

    let output = laptoppos_cmd()
        .args(["config", "show", "-o", "json", "--user", "kasir-01", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["origin"], "https://toko.example");
    assert_eq!(value["tenant_id"], "toko-jaya");
    assert_eq!(value["user_id"], "kasir-01");
    assert_eq!(value["reconnect"]["max_attempts"], 5);
}

#[test]
fn test_config_show_rejects_bad_origin() {
    let output = laptoppos_cmd()
        .args(["config", "show", "--origin", "not a url"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("origin"));
}

#[test]
fn test_watch_rejects_zero_request_timeout() {
    let output = laptoppos_cmd()
        .args(["watch", "--refetch"])
        .env("LAPTOPPOS_REQUEST_TIMEOUT", "0")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("request_timeout"));
}
