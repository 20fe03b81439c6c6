// src/launch/exec.rs

//! Process replacement.

use std::path::Path;
use std::process::Command;

use tracing::info;

use super::LaunchPlan;
use crate::errors::{HostbootError, Result};

/// Starts the managed daemon described by a [`LaunchPlan`].
///
/// Production code uses [`ExecLauncher`], which does not return on success.
/// Tests provide an implementation that records the plan instead.
pub trait Launcher: Send {
    fn launch(&mut self, plan: &LaunchPlan) -> Result<()>;
}

/// Replaces the supervisor process with the daemon via `execve`.
#[derive(Debug, Clone, Default)]
pub struct ExecLauncher;

impl ExecLauncher {
    pub fn new() -> Self {
        Self
    }
}

/// Check the program is an existing, executable regular file so a missing
/// binary is reported precisely rather than as a bare `ENOENT`.
pub fn check_program(program: &Path) -> Result<()> {
    let meta = std::fs::metadata(program).map_err(|e| {
        HostbootError::Launch(format!("{}: {e}", program.display()))
    })?;

    if !meta.is_file() {
        return Err(HostbootError::Launch(format!(
            "{}: not a regular file",
            program.display()
        )));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.permissions().mode() & 0o111 == 0 {
            return Err(HostbootError::Launch(format!(
                "{}: not executable",
                program.display()
            )));
        }
    }

    Ok(())
}

fn build_command(plan: &LaunchPlan) -> Command {
    let mut cmd = Command::new(plan.spec.program());
    cmd.args(plan.spec.args()).env_clear().envs(plan.env.iter());
    cmd
}

impl Launcher for ExecLauncher {
    #[cfg(unix)]
    fn launch(&mut self, plan: &LaunchPlan) -> Result<()> {
        use std::os::unix::process::CommandExt;

        check_program(plan.spec.program())?;

        info!(
            program = %plan.spec.program().display(),
            args = ?plan.spec.args(),
            env_key = %plan.binding.key,
            env_value = %plan.binding.value,
            "exec managed daemon"
        );

        // Only returns on failure.
        let err = build_command(plan).exec();
        Err(HostbootError::Launch(format!(
            "exec {}: {err}",
            plan.spec.program().display()
        )))
    }

    #[cfg(not(unix))]
    fn launch(&mut self, plan: &LaunchPlan) -> Result<()> {
        check_program(plan.spec.program())?;
        let _ = build_command(plan);
        Err(HostbootError::Launch(
            "process replacement is only supported on Unix".to_string(),
        ))
    }
}
