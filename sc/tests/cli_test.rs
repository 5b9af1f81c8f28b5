//! Binary smoke tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sc(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sc").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .current_dir(home.path());
    cmd
}

#[test]
fn test_curricula_lists_default_topics() {
    let home = TempDir::new().unwrap();
    sc(&home)
        .arg("curricula")
        .assert()
        .success()
        .stdout(predicate::str::contains("Python"))
        .stdout(predicate::str::contains("React"));
}

#[test]
fn test_curricula_reads_config_file() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("socratis.yml");
    std::fs::write(&config, "curriculum:\n  tracks:\n    Haskell:\n      - \"Day 1: Types\"\n").unwrap();

    sc(&home)
        .args(["curricula", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Haskell"))
        .stdout(predicate::str::contains("Python").not());
}

#[test]
fn test_key_writes_credential_file() {
    let home = TempDir::new().unwrap();
    let credential = home.path().join("credential");
    let config = home.path().join("socratis.yml");
    std::fs::write(&config, format!("credential:\n  path: {}\n", credential.display())).unwrap();

    sc(&home)
        .args(["key", "abc123", "--config"])
        .arg(&config)
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&credential).unwrap(), "abc123");
}

#[test]
fn test_key_rejects_blank_value() {
    let home = TempDir::new().unwrap();
    sc(&home).args(["key", "   "]).assert().failure();
}
