// src/launch/mod.rs

//! Handing control to the managed daemon.
//!
//! - [`env`] builds the child environment: inherited variables plus the one
//!   published binding.
//! - [`exec`] provides the `Launcher` trait and `ExecLauncher`, which replaces
//!   the current process image with the daemon.

pub mod env;
pub mod exec;

use std::path::{Path, PathBuf};

use crate::types::EnvBinding;

pub use env::{publish_environment, ChildEnvironment};
pub use exec::{ExecLauncher, Launcher};

/// The daemon command line: one program and its complete argument vector.
///
/// This is the whole launch command, not a set of additions to some
/// inherited default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    program: PathBuf,
    args: Vec<String>,
}

impl LaunchSpec {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Program followed by its arguments, as a single shell-ish line.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Everything needed to exec the daemon.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub spec: LaunchSpec,
    pub binding: EnvBinding,
    pub env: ChildEnvironment,
}
