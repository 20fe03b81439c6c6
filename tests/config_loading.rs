// tests/config_loading.rs

mod common;
use crate::common::{write_config, EXPECTED_ARGS};

use std::path::{Path, PathBuf};
use std::time::Duration;

use hostboot::config::validate::MAX_DURATION;
use hostboot::config::{load_and_validate, load_or_default, parse_duration, ConfigFile, RawConfigFile};
use hostboot::errors::HostbootError;
use hostboot::prereq::Prerequisite;

fn expect_config_error(toml: &str, needle: &str) {
    let file = write_config(toml);
    match load_and_validate(file.path()) {
        Err(HostbootError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} should contain {needle:?}");
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn empty_file_yields_builtin_dockerd_bootstrap() {
    let file = write_config("");
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(
        cfg.prerequisites.conditions,
        vec![
            Prerequisite::Unit("network-online.target".to_string()),
            Prerequisite::Unit("format-ephemeral-storage.service".to_string()),
        ]
    );
    assert_eq!(cfg.prerequisites.timeout, Duration::from_secs(90));
    assert_eq!(cfg.prerequisites.poll_interval, Duration::from_secs(1));

    assert_eq!(
        cfg.metadata.endpoint.as_str(),
        "http://169.254.169.254/latest/dynamic/instance-identity/document"
    );
    assert_eq!(cfg.metadata.timeout, Duration::from_secs(2));
    assert_eq!(cfg.metadata.attempts, 1);
    assert_eq!(cfg.metadata.env_key, "AWS_REGION");
    assert_eq!(cfg.metadata.token_ttl, None);

    assert_eq!(cfg.launch.program(), Path::new("/usr/bin/dockerd"));
    assert_eq!(cfg.launch.args(), EXPECTED_ARGS);
}

#[test]
fn raw_default_validates() {
    let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
    assert_eq!(cfg.launch.args().len(), 6);
}

#[test]
fn overrides_replace_defaults_rather_than_extend_them() {
    let file = write_config(
        r#"
[prerequisites]
units = ["containerd.service"]
paths = ["/mnt/ephemeral"]
tcp = ["169.254.169.254:80"]
timeout = "30s"
poll_interval = "250ms"

[metadata]
endpoint = "http://127.0.0.1:1338/latest/dynamic/instance-identity/document"
timeout = "1s"
attempts = 3
retry_delay = "500ms"
env_key = "AWS_DEFAULT_REGION"
token_ttl = "6h"

[launch]
program = "/usr/local/bin/dockerd"
args = ["-H", "unix:///var/run/docker.sock"]
"#,
    );
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(
        cfg.prerequisites.conditions,
        vec![
            Prerequisite::Unit("containerd.service".to_string()),
            Prerequisite::Path(PathBuf::from("/mnt/ephemeral")),
            Prerequisite::Tcp("169.254.169.254:80".to_string()),
        ]
    );
    assert_eq!(cfg.prerequisites.timeout, Duration::from_secs(30));
    assert_eq!(cfg.prerequisites.poll_interval, Duration::from_millis(250));
    assert_eq!(cfg.metadata.attempts, 3);
    assert_eq!(cfg.metadata.retry_delay, Duration::from_millis(500));
    assert_eq!(cfg.metadata.env_key, "AWS_DEFAULT_REGION");
    assert_eq!(cfg.metadata.token_ttl, Some(Duration::from_secs(6 * 3600)));
    assert_eq!(cfg.launch.program(), Path::new("/usr/local/bin/dockerd"));
    assert_eq!(cfg.launch.args(), ["-H", "unix:///var/run/docker.sock"]);
}

#[test]
fn empty_args_list_is_kept_empty() {
    let file = write_config("[launch]\nargs = []\n");
    let cfg = load_and_validate(file.path()).unwrap();
    assert!(cfg.launch.args().is_empty());
}

#[test]
fn duplicate_prerequisites_are_collapsed() {
    let file = write_config(
        r#"
[prerequisites]
units = ["a.service", "b.service", "a.service"]
"#,
    );
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(
        cfg.prerequisites.conditions,
        vec![
            Prerequisite::Unit("a.service".to_string()),
            Prerequisite::Unit("b.service".to_string()),
        ]
    );
}

#[test]
fn zero_attempts_is_rejected() {
    expect_config_error("[metadata]\nattempts = 0\n", "attempts");
}

#[test]
fn zero_metadata_timeout_is_rejected() {
    expect_config_error("[metadata]\ntimeout = \"0s\"\n", "greater than zero");
}

#[test]
fn bad_duration_unit_is_rejected() {
    expect_config_error("[prerequisites]\ntimeout = \"10 days\"\n", "unsupported duration unit");
}

#[test]
fn invalid_env_key_is_rejected() {
    expect_config_error("[metadata]\nenv_key = \"AWS-REGION\"\n", "env_key");
}

#[test]
fn https_endpoint_is_rejected() {
    expect_config_error(
        "[metadata]\nendpoint = \"https://169.254.169.254/latest\"\n",
        "http://",
    );
}

#[test]
fn garbage_endpoint_is_rejected() {
    expect_config_error("[metadata]\nendpoint = \"not a url\"\n", "not a valid URL");
}

#[test]
fn token_ttl_above_six_hours_is_rejected() {
    expect_config_error("[metadata]\ntoken_ttl = \"7h\"\n", "token_ttl");
}

#[test]
fn unit_without_suffix_is_rejected() {
    expect_config_error("[prerequisites]\nunits = [\"docker\"]\n", "not a valid unit name");
}

#[test]
fn tcp_without_port_is_rejected() {
    expect_config_error("[prerequisites]\ntcp = [\"localhost\"]\n", "host:port");
}

#[test]
fn tcp_with_bad_port_is_rejected() {
    expect_config_error("[prerequisites]\ntcp = [\"localhost:http\"]\n", "invalid port");
}

#[test]
fn relative_prerequisite_path_is_rejected() {
    expect_config_error("[prerequisites]\npaths = [\"mnt/ephemeral\"]\n", "absolute");
}

#[test]
fn relative_program_is_rejected() {
    expect_config_error("[launch]\nprogram = \"dockerd\"\n", "absolute");
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = write_config("[metadata\nattempts = 1");
    match load_and_validate(file.path()) {
        Err(HostbootError::TomlError(_)) => {}
        other => panic!("Expected TomlError, got: {:?}", other),
    }
}

#[test]
fn huge_prerequisite_timeout_is_rejected() {
    expect_config_error(
        "[prerequisites]\ntimeout = \"3000000000000000h\"\n",
        "at most 24h",
    );
}

#[test]
fn duration_cap_is_inclusive() {
    let file = write_config("[prerequisites]\ntimeout = \"24h\"\n");
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.prerequisites.timeout, MAX_DURATION);
}

#[test]
fn huge_metadata_retry_delay_is_rejected() {
    expect_config_error("[metadata]\nretry_delay = \"25h\"\n", "at most 24h");
}

#[test]
fn misspelled_section_is_rejected() {
    let file = write_config("[metdata]\nattempts = 3\n");
    match load_and_validate(file.path()) {
        Err(HostbootError::TomlError(e)) => assert!(e.to_string().contains("metdata")),
        other => panic!("Expected TomlError, got: {:?}", other),
    }
}

#[test]
fn misspelled_key_is_rejected() {
    let file = write_config("[metadata]\nenv-key = \"X\"\n");
    match load_and_validate(file.path()) {
        Err(HostbootError::TomlError(e)) => assert!(e.to_string().contains("env-key")),
        other => panic!("Expected TomlError, got: {:?}", other),
    }
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");
    match load_or_default(&path) {
        Err(HostbootError::IoError(_)) => {}
        other => panic!("Expected IoError, got: {:?}", other),
    }
}

#[test]
fn load_or_default_reads_existing_file() {
    let file = write_config("[metadata]\nenv_key = \"REGION\"\n");
    let cfg = load_or_default(file.path()).unwrap();
    assert_eq!(cfg.metadata.env_key, "REGION");
}

#[test]
fn parse_duration_accepts_all_units() {
    assert_eq!(parse_duration("750ms").unwrap(), Duration::from_millis(750));
    assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
    assert_eq!(parse_duration(" 5m ").unwrap(), Duration::from_secs(300));
    assert_eq!(parse_duration("6h").unwrap(), Duration::from_secs(21_600));
}

#[test]
fn parse_duration_rejects_missing_unit_and_empty() {
    assert!(parse_duration("").is_err());
    assert!(parse_duration("10").unwrap_err().contains("unit suffix"));
    assert!(parse_duration("s").is_err());
    assert!(parse_duration("1.5s").is_err());
}
