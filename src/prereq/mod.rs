// src/prereq/mod.rs

//! Startup ordering: block until every declared prerequisite holds.
//!
//! - [`probe`] provides the `PrerequisiteProbe` trait and the `SystemProbe`
//!   used in production (systemctl, filesystem, TCP connect).
//! - [`await_prerequisites`] polls a probe until all conditions are satisfied
//!   or the configured deadline passes.

pub mod probe;

use std::fmt;
use std::path::PathBuf;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::PrerequisiteSettings;
use crate::errors::{HostbootError, Result};

pub use probe::{PrerequisiteProbe, SystemProbe};

/// A single condition that must hold before the daemon may start.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Prerequisite {
    /// A sibling systemd unit that must be active.
    Unit(String),
    /// A path that must exist.
    Path(PathBuf),
    /// A `host:port` that must accept TCP connections.
    Tcp(String),
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prerequisite::Unit(name) => write!(f, "unit:{name}"),
            Prerequisite::Path(path) => write!(f, "path:{}", path.display()),
            Prerequisite::Tcp(addr) => write!(f, "tcp:{addr}"),
        }
    }
}

/// Wait until `probe` reports every condition in `settings` as satisfied.
///
/// Conditions are re-probed every `poll_interval`; once a condition has been
/// seen satisfied it is not probed again. A probe error counts as "not yet".
/// When `timeout` elapses with conditions outstanding this fails with
/// [`HostbootError::PrerequisiteUnmet`] listing them. A timeout too large to
/// form a deadline is a [`HostbootError::ConfigError`].
pub async fn await_prerequisites(
    probe: &dyn PrerequisiteProbe,
    settings: &PrerequisiteSettings,
) -> Result<()> {
    if settings.conditions.is_empty() {
        debug!("no prerequisites declared");
        return Ok(());
    }

    let deadline = Instant::now().checked_add(settings.timeout).ok_or_else(|| {
        HostbootError::ConfigError(format!(
            "prerequisite timeout {:?} is out of range",
            settings.timeout
        ))
    })?;
    let mut pending: Vec<&Prerequisite> = settings.conditions.iter().collect();
    let mut round: u32 = 0;

    loop {
        round += 1;
        let mut still_pending = Vec::with_capacity(pending.len());

        for condition in pending {
            match probe.is_satisfied(condition).await {
                Ok(true) => {
                    info!(prerequisite = %condition, round, "prerequisite satisfied");
                }
                Ok(false) => {
                    debug!(prerequisite = %condition, round, "prerequisite not yet satisfied");
                    still_pending.push(condition);
                }
                Err(err) => {
                    debug!(
                        prerequisite = %condition,
                        round,
                        error = %err,
                        "prerequisite probe failed; will retry"
                    );
                    still_pending.push(condition);
                }
            }
        }

        pending = still_pending;
        if pending.is_empty() {
            return Ok(());
        }

        let now = Instant::now();
        if now >= deadline {
            let names: Vec<String> = pending.iter().map(|c| c.to_string()).collect();
            warn!(
                unmet = ?names,
                timeout_ms = settings.timeout.as_millis() as u64,
                "giving up on prerequisites"
            );
            return Err(HostbootError::PrerequisiteUnmet(format!(
                "still unmet after {:?}: {}",
                settings.timeout,
                names.join(", ")
            )));
        }

        sleep(settings.poll_interval.min(deadline - now)).await;
    }
}
