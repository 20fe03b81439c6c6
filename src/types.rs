// src/types.rs

use std::fmt;

/// Bootstrap phases, in the only order they may occur.
///
/// `Delegated` is terminal: control has been handed to the managed daemon.
/// Failures in any earlier phase end the supervisor without reaching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    AwaitingPrerequisites,
    ResolvingMetadata,
    Launching,
    Delegated,
}

impl Phase {
    /// The phase that follows `self`, or `None` once delegated.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Idle => Some(Phase::AwaitingPrerequisites),
            Phase::AwaitingPrerequisites => Some(Phase::ResolvingMetadata),
            Phase::ResolvingMetadata => Some(Phase::Launching),
            Phase::Launching => Some(Phase::Delegated),
            Phase::Delegated => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Delegated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::AwaitingPrerequisites => "awaiting_prerequisites",
            Phase::ResolvingMetadata => "resolving_metadata",
            Phase::Launching => "launching",
            Phase::Delegated => "delegated",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cloud region identifier exactly as the metadata service reported it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The single key/value pair published into the daemon's environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvBinding {
    pub key: String,
    pub value: String,
}

impl EnvBinding {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
