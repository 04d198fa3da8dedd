//! Offline CLI behaviour.

use assert_cmd::Command;
use predicates::prelude::*;

fn cardex() -> Command {
    let mut cmd = Command::cargo_bin("cardex").unwrap();
    cmd.env_remove("CARDEX_API_KEY");
    cmd
}

#[test]
fn test_help_lists_commands() {
    cardex()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_level_boundaries() {
    cardex()
        .args(["level", "0.9"])
        .assert()
        .success()
        .stdout("Very High\n");
    cardex()
        .args(["level", "0.3"])
        .assert()
        .success()
        .stdout("Low\n");
    cardex()
        .args(["level", "0.29999"])
        .assert()
        .success()
        .stdout("Very Low\n");
}

#[test]
fn test_level_out_of_range() {
    cardex()
        .args(["level", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 1"));
}

#[test]
fn test_extract_without_api_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"api_key": ""}"#).unwrap();

    cardex()
        .args(["--config", config.to_str().unwrap(), "extract", "aGVsbG8="])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing API key"));
}

#[test]
fn test_extract_rejects_bad_base64_before_network() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(
        &config,
        r#"{"api_key": "k", "base_url": "http://127.0.0.1:9/unused"}"#,
    )
    .unwrap();

    cardex()
        .args(["--config", config.to_str().unwrap(), "extract", "%%%"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid base64"));
}

#[test]
fn test_config_init_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("nested").join("config.json");
    let config_arg = config.to_str().unwrap();

    cardex()
        .args(["config", "init", "--output", config_arg, "--api-key", "abcdefgh"])
        .assert()
        .success();
    assert!(config.exists());

    cardex()
        .args(["--config", config_arg, "config", "get", "poll.max_attempts"])
        .assert()
        .success()
        .stdout("30\n");

    cardex()
        .args(["--config", config_arg, "config", "get", "api_key"])
        .assert()
        .success()
        .stdout("ab****gh\n");

    cardex()
        .args(["config", "init", "--output", config_arg])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
