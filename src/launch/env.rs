// src/launch/env.rs

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

use crate::config::validate::is_valid_env_key;
use crate::errors::{HostbootError, Result};
use crate::types::EnvBinding;

/// Explicit environment for the daemon process.
///
/// The supervisor never calls `std::env::set_var`; the binding only exists in
/// this map, which the launcher installs wholesale on the child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildEnvironment {
    vars: BTreeMap<OsString, OsString>,
}

impl ChildEnvironment {
    /// Snapshot of the supervisor's own environment.
    pub fn inherited() -> Self {
        Self::from_vars(std::env::vars_os())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }
}

/// Return `base` with `binding` added, replacing any inherited value of the
/// same key.
///
/// Consumes the base so the published environment cannot be altered again
/// by the caller without rebuilding it.
pub fn publish_environment(
    mut base: ChildEnvironment,
    binding: &EnvBinding,
) -> Result<ChildEnvironment> {
    if !is_valid_env_key(&binding.key) {
        return Err(HostbootError::ConfigError(format!(
            "'{}' is not a valid environment variable name",
            binding.key
        )));
    }
    if binding.value.contains('\0') {
        return Err(HostbootError::ConfigError(format!(
            "value for {} contains a NUL byte",
            binding.key
        )));
    }

    base.vars.insert(
        OsString::from(&binding.key),
        OsString::from(&binding.value),
    );
    Ok(base)
}
