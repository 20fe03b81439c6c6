// src/supervisor.rs

//! The bootstrap sequence.
//!
//! `Supervisor` walks the phases strictly in order:
//!
//! ```text
//! Idle -> AwaitingPrerequisites -> ResolvingMetadata -> Launching -> Delegated
//! ```
//!
//! Each phase consumes the previous one's output exactly once. An error in any
//! phase stops the walk; later phases are never entered.

use std::fmt;

use tracing::{error, info};

use crate::config::ConfigFile;
use crate::errors::{HostbootError, Result};
use crate::launch::{publish_environment, ChildEnvironment, LaunchPlan, Launcher};
use crate::metadata::{resolve_region, MetadataSource};
use crate::prereq::{await_prerequisites, PrerequisiteProbe};
use crate::types::{EnvBinding, Phase};

pub struct Supervisor<P, M, L>
where
    P: PrerequisiteProbe,
    M: MetadataSource,
    L: Launcher,
{
    config: ConfigFile,
    probe: P,
    metadata: M,
    launcher: L,
    base_env: ChildEnvironment,
    phase: Phase,
}

impl<P, M, L> fmt::Debug for Supervisor<P, M, L>
where
    P: PrerequisiteProbe,
    M: MetadataSource,
    L: Launcher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("phase", &self.phase)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<P, M, L> Supervisor<P, M, L>
where
    P: PrerequisiteProbe,
    M: MetadataSource,
    L: Launcher,
{
    /// Build a supervisor whose child inherits the current process
    /// environment.
    pub fn new(config: ConfigFile, probe: P, metadata: M, launcher: L) -> Self {
        Self::with_base_env(config, probe, metadata, launcher, ChildEnvironment::inherited())
    }

    /// Build a supervisor with an explicit base environment for the child.
    pub fn with_base_env(
        config: ConfigFile,
        probe: P,
        metadata: M,
        launcher: L,
        base_env: ChildEnvironment,
    ) -> Self {
        Self {
            config,
            probe,
            metadata,
            launcher,
            base_env,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn advance(&mut self) {
        if let Some(next) = self.phase.next() {
            info!(from = %self.phase, to = %next, "phase transition");
            self.phase = next;
        }
    }

    /// Run the bootstrap sequence to completion.
    ///
    /// With [`crate::launch::ExecLauncher`] a successful run never returns:
    /// the process image is replaced by the daemon. With other launchers the
    /// supervisor ends in [`Phase::Delegated`].
    pub async fn run(&mut self) -> Result<()> {
        if self.phase != Phase::Idle {
            return Err(HostbootError::Other(anyhow::anyhow!(
                "supervisor already ran (phase {})",
                self.phase
            )));
        }

        let result = self.run_phases().await;
        if let Err(ref err) = result {
            error!(phase = %self.phase, error = %err, "bootstrap failed");
        }
        result
    }

    async fn run_phases(&mut self) -> Result<()> {
        self.advance();
        info!(
            count = self.config.prerequisites.conditions.len(),
            timeout_ms = self.config.prerequisites.timeout.as_millis() as u64,
            "waiting for prerequisites"
        );
        await_prerequisites(&self.probe, &self.config.prerequisites).await?;

        self.advance();
        info!(endpoint = %self.config.metadata.endpoint, "resolving region");
        let region = resolve_region(&self.metadata, &self.config.metadata).await?;

        self.advance();
        let binding = EnvBinding::new(self.config.metadata.env_key.clone(), region.into_inner());
        let env = publish_environment(std::mem::take(&mut self.base_env), &binding)?;
        let plan = LaunchPlan {
            spec: self.config.launch.clone(),
            binding,
            env,
        };
        info!(command = %plan.spec.command_line(), "launching managed daemon");
        self.launcher.launch(&plan)?;

        self.advance();
        Ok(())
    }
}
