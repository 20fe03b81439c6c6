// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::launch::LaunchSpec;
use crate::prereq::Prerequisite;

/// Default location of the metadata document carrying the `region` field.
pub const DEFAULT_METADATA_ENDPOINT: &str =
    "http://169.254.169.254/latest/dynamic/instance-identity/document";

/// Default daemon executable.
pub const DEFAULT_PROGRAM: &str = "/usr/bin/dockerd";

/// Default daemon argument vector: control socket, containerd socket,
/// logging driver and its log group.
pub const DEFAULT_ARGS: [&str; 6] = [
    "-H",
    "fd://",
    "--containerd=/run/containerd/containerd.sock",
    "--log-driver=awslogs",
    "--log-opt",
    "awslogs-group=docker",
];

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [prerequisites]
/// units = ["network-online.target", "format-ephemeral-storage.service"]
/// timeout = "90s"
///
/// [metadata]
/// timeout = "2s"
/// env_key = "AWS_REGION"
///
/// [launch]
/// program = "/usr/bin/dockerd"
/// args = ["-H", "fd://"]
/// ```
///
/// Every section and key is optional; an empty file yields the built-in
/// dockerd bootstrap. Unknown sections or keys are rejected.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub prerequisites: PrerequisitesSection,

    #[serde(default)]
    pub metadata: MetadataSection,

    #[serde(default)]
    pub launch: LaunchSection,
}

/// `[prerequisites]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrerequisitesSection {
    /// Sibling units that must be active.
    #[serde(default = "default_units")]
    pub units: Vec<String>,

    /// Paths that must exist (e.g. the ephemeral-storage mount point).
    #[serde(default)]
    pub paths: Vec<PathBuf>,

    /// `host:port` addresses that must accept a TCP connection.
    #[serde(default)]
    pub tcp: Vec<String>,

    /// Overall deadline for all prerequisites, e.g. `"90s"`.
    #[serde(default = "default_prerequisite_timeout")]
    pub timeout: String,

    /// Delay between probe rounds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,
}

fn default_units() -> Vec<String> {
    vec![
        "network-online.target".to_string(),
        "format-ephemeral-storage.service".to_string(),
    ]
}

fn default_prerequisite_timeout() -> String {
    "90s".to_string()
}

fn default_poll_interval() -> String {
    "1s".to_string()
}

impl Default for PrerequisitesSection {
    fn default() -> Self {
        Self {
            units: default_units(),
            paths: Vec::new(),
            tcp: Vec::new(),
            timeout: default_prerequisite_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

/// `[metadata]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout.
    #[serde(default = "default_metadata_timeout")]
    pub timeout: String,

    /// Total number of fetch attempts. `1` means no retry.
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Fixed delay between attempts when `attempts > 1`.
    #[serde(default = "default_retry_delay")]
    pub retry_delay: String,

    /// Environment variable the region is published under.
    #[serde(default = "default_env_key")]
    pub env_key: String,

    /// Session token lifetime. When set, an IMDSv2 token is requested first.
    #[serde(default)]
    pub token_ttl: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_METADATA_ENDPOINT.to_string()
}

fn default_metadata_timeout() -> String {
    "2s".to_string()
}

fn default_attempts() -> u32 {
    1
}

fn default_retry_delay() -> String {
    "1s".to_string()
}

fn default_env_key() -> String {
    "AWS_REGION".to_string()
}

impl Default for MetadataSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: default_metadata_timeout(),
            attempts: default_attempts(),
            retry_delay: default_retry_delay(),
            env_key: default_env_key(),
            token_ttl: None,
        }
    }
}

/// `[launch]` section.
///
/// `args` fully replaces the default vector; it is never appended to it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchSection {
    #[serde(default = "default_program")]
    pub program: PathBuf,

    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

fn default_program() -> PathBuf {
    PathBuf::from(DEFAULT_PROGRAM)
}

fn default_args() -> Vec<String> {
    DEFAULT_ARGS.iter().map(|s| s.to_string()).collect()
}

impl Default for LaunchSection {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
        }
    }
}

/// Validated configuration. Only obtainable through
/// `ConfigFile::try_from(RawConfigFile)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub prerequisites: PrerequisiteSettings,
    pub metadata: MetadataSettings,
    pub launch: LaunchSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrerequisiteSettings {
    pub conditions: Vec<Prerequisite>,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataSettings {
    pub endpoint: Url,
    pub timeout: Duration,
    pub attempts: u32,
    pub retry_delay: Duration,
    pub env_key: String,
    pub token_ttl: Option<Duration>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        prerequisites: PrerequisiteSettings,
        metadata: MetadataSettings,
        launch: LaunchSpec,
    ) -> Self {
        Self {
            prerequisites,
            metadata,
            launch,
        }
    }
}
