// src/errors.rs

//! Crate-wide error type.
//!
//! Every variant is terminal for a startup attempt. `main` maps each one to a
//! distinct exit code so the host process manager (and an operator reading
//! `systemctl status`) can tell which step failed.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostbootError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Prerequisites not satisfied: {0}")]
    PrerequisiteUnmet(String),

    #[error("Metadata endpoint unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("Metadata document invalid: {0}")]
    MetadataParse(String),

    #[error("Launch failed: {0}")]
    Launch(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HostbootError {
    /// Process exit code reported for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            HostbootError::PrerequisiteUnmet(_) => 2,
            HostbootError::MetadataUnavailable(_) => 3,
            HostbootError::MetadataParse(_) => 4,
            HostbootError::Launch(_) => 5,
            HostbootError::ConfigError(_)
            | HostbootError::IoError(_)
            | HostbootError::TomlError(_)
            | HostbootError::Other(_) => 1,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, HostbootError>;
