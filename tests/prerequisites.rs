// tests/prerequisites.rs

mod common;
use crate::common::builders::ConfigBuilder;
use crate::common::fakes::{call_log, FakeProbe, ProbeMode};
use crate::common::http::closed_port;
use crate::common::init_tracing;

use std::time::{Duration, Instant};

use tokio::net::TcpListener;

use hostboot::config::PrerequisiteSettings;
use hostboot::errors::HostbootError;
use hostboot::prereq::{await_prerequisites, Prerequisite, PrerequisiteProbe, SystemProbe};

#[tokio::test]
async fn no_prerequisites_is_immediately_satisfied() {
    init_tracing();
    let log = call_log();
    let probe = FakeProbe::new(ProbeMode::Never, log.clone());
    let cfg = ConfigBuilder::new().build();

    await_prerequisites(&probe, &cfg.prerequisites).await.unwrap();
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn satisfied_conditions_are_not_reprobed() {
    init_tracing();
    let log = call_log();
    let probe = FakeProbe::new(ProbeMode::ReadyAfter(3), log.clone());
    let cfg = ConfigBuilder::new()
        .unit("network-online.target")
        .path("/mnt/ephemeral")
        .build();

    await_prerequisites(&probe, &cfg.prerequisites).await.unwrap();

    let unit = Prerequisite::Unit("network-online.target".to_string());
    assert_eq!(probe.calls_for(&unit), 3);
    assert_eq!(log.lock().unwrap().len(), 6);
}

#[tokio::test]
async fn never_satisfied_fails_with_unmet_names_after_timeout() {
    init_tracing();
    let probe = FakeProbe::new(ProbeMode::Never, call_log());
    let cfg = ConfigBuilder::new()
        .unit("format-ephemeral-storage.service")
        .tcp("127.0.0.1:9")
        .prerequisite_timeout("100ms")
        .poll_interval("20ms")
        .build();

    let started = Instant::now();
    let result = await_prerequisites(&probe, &cfg.prerequisites).await;
    let elapsed = started.elapsed();

    match result {
        Err(HostbootError::PrerequisiteUnmet(msg)) => {
            assert!(msg.contains("unit:format-ephemeral-storage.service"));
            assert!(msg.contains("tcp:127.0.0.1:9"));
        }
        other => panic!("Expected PrerequisiteUnmet, got: {:?}", other),
    }
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}

#[tokio::test]
async fn unrepresentable_deadline_is_a_config_error() {
    init_tracing();
    let probe = FakeProbe::new(ProbeMode::Never, call_log());
    let settings = PrerequisiteSettings {
        conditions: vec![Prerequisite::Unit("containerd.service".into())],
        timeout: Duration::MAX,
        poll_interval: Duration::from_millis(10),
    };

    match await_prerequisites(&probe, &settings).await {
        Err(HostbootError::ConfigError(msg)) => assert!(msg.contains("out of range")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
    assert_eq!(probe.calls_for(&Prerequisite::Unit("containerd.service".into())), 0);
}

#[tokio::test]
async fn probe_errors_count_as_unsatisfied() {
    init_tracing();
    let probe = FakeProbe::new(ProbeMode::Failing, call_log());
    let cfg = ConfigBuilder::new()
        .unit("containerd.service")
        .prerequisite_timeout("50ms")
        .build();

    match await_prerequisites(&probe, &cfg.prerequisites).await {
        Err(HostbootError::PrerequisiteUnmet(msg)) => assert!(msg.contains("containerd.service")),
        other => panic!("Expected PrerequisiteUnmet, got: {:?}", other),
    }
}

#[tokio::test]
async fn system_probe_checks_paths() {
    let dir = tempfile::tempdir().unwrap();
    let probe = SystemProbe::new(Duration::from_secs(1));

    let present = Prerequisite::Path(dir.path().to_path_buf());
    let absent = Prerequisite::Path(dir.path().join("not-mounted"));

    assert!(probe.is_satisfied(&present).await.unwrap());
    assert!(!probe.is_satisfied(&absent).await.unwrap());
}

#[tokio::test]
async fn system_probe_checks_tcp_reachability() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open = Prerequisite::Tcp(listener.local_addr().unwrap().to_string());
    let closed = Prerequisite::Tcp(closed_port().await.to_string());
    let probe = SystemProbe::new(Duration::from_millis(500));

    assert!(probe.is_satisfied(&open).await.unwrap());
    assert!(!probe.is_satisfied(&closed).await.unwrap());
}

#[cfg(unix)]
#[tokio::test]
async fn system_probe_uses_systemctl_exit_status() {
    let unit = Prerequisite::Unit("network-online.target".to_string());

    let active = SystemProbe::new(Duration::from_secs(5)).with_systemctl("true");
    assert!(active.is_satisfied(&unit).await.unwrap());

    let inactive = SystemProbe::new(Duration::from_secs(5)).with_systemctl("false");
    assert!(!inactive.is_satisfied(&unit).await.unwrap());
}

#[tokio::test]
async fn system_probe_reports_missing_systemctl_as_error() {
    let unit = Prerequisite::Unit("network-online.target".to_string());
    let probe = SystemProbe::new(Duration::from_secs(1))
        .with_systemctl("/nonexistent/hostboot-test/systemctl");
    assert!(probe.is_satisfied(&unit).await.is_err());
}
