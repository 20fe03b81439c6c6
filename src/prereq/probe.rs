// src/prereq/probe.rs

//! Pluggable prerequisite probing.
//!
//! The supervisor only asks "is this condition satisfied right now?". The
//! production answer comes from [`SystemProbe`]; tests substitute a fake.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpStream;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::trace;

use super::Prerequisite;
use crate::errors::Result;

/// Answers whether a single prerequisite currently holds.
pub trait PrerequisiteProbe: Send + Sync {
    fn is_satisfied<'a>(
        &'a self,
        condition: &'a Prerequisite,
    ) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + 'a>>;
}

/// Probe backed by the host: `systemctl is-active`, path existence and TCP
/// connects.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    systemctl: PathBuf,
    check_timeout: Duration,
}

impl SystemProbe {
    pub fn new(check_timeout: Duration) -> Self {
        Self {
            systemctl: PathBuf::from("systemctl"),
            check_timeout,
        }
    }

    /// Use a different `systemctl` binary (e.g. a wrapper in tests).
    pub fn with_systemctl(mut self, systemctl: impl Into<PathBuf>) -> Self {
        self.systemctl = systemctl.into();
        self
    }

    async fn unit_active(&self, unit: &str) -> Result<bool> {
        let status = timeout(
            self.check_timeout,
            Command::new(&self.systemctl)
                .arg("is-active")
                .arg("--quiet")
                .arg(unit)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .status(),
        )
        .await
        .with_context(|| format!("systemctl is-active {unit} timed out"))?
        .with_context(|| format!("running {} is-active {unit}", self.systemctl.display()))?;

        trace!(unit, code = ?status.code(), "systemctl is-active");
        Ok(status.success())
    }

    async fn tcp_reachable(&self, addr: &str) -> bool {
        matches!(
            timeout(self.check_timeout, TcpStream::connect(addr)).await,
            Ok(Ok(_))
        )
    }
}

impl PrerequisiteProbe for SystemProbe {
    fn is_satisfied<'a>(
        &'a self,
        condition: &'a Prerequisite,
    ) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + 'a>> {
        Box::pin(async move {
            match condition {
                Prerequisite::Unit(unit) => self.unit_active(unit).await,
                Prerequisite::Path(path) => Ok(tokio::fs::try_exists(path)
                    .await
                    .with_context(|| format!("checking {}", path.display()))?),
                Prerequisite::Tcp(addr) => Ok(self.tcp_reachable(addr).await),
            }
        })
    }
}
