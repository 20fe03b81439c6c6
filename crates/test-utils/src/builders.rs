#![allow(dead_code)]

use std::path::PathBuf;

use hostboot::config::{ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in defaults with two changes that keep tests fast
/// and hermetic: no unit prerequisites, and short timeouts.
pub struct ConfigBuilder {
    raw: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        let mut raw = RawConfigFile::default();
        raw.prerequisites.units.clear();
        raw.prerequisites.timeout = "200ms".to_string();
        raw.prerequisites.poll_interval = "10ms".to_string();
        raw.metadata.timeout = "500ms".to_string();
        raw.metadata.retry_delay = "10ms".to_string();
        Self { raw }
    }

    pub fn unit(mut self, name: &str) -> Self {
        self.raw.prerequisites.units.push(name.to_string());
        self
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw.prerequisites.paths.push(path.into());
        self
    }

    pub fn tcp(mut self, addr: &str) -> Self {
        self.raw.prerequisites.tcp.push(addr.to_string());
        self
    }

    pub fn prerequisite_timeout(mut self, d: &str) -> Self {
        self.raw.prerequisites.timeout = d.to_string();
        self
    }

    pub fn poll_interval(mut self, d: &str) -> Self {
        self.raw.prerequisites.poll_interval = d.to_string();
        self
    }

    pub fn endpoint(mut self, url: &str) -> Self {
        self.raw.metadata.endpoint = url.to_string();
        self
    }

    pub fn metadata_timeout(mut self, d: &str) -> Self {
        self.raw.metadata.timeout = d.to_string();
        self
    }

    pub fn attempts(mut self, n: u32) -> Self {
        self.raw.metadata.attempts = n;
        self
    }

    pub fn env_key(mut self, key: &str) -> Self {
        self.raw.metadata.env_key = key.to_string();
        self
    }

    pub fn token_ttl(mut self, d: &str) -> Self {
        self.raw.metadata.token_ttl = Some(d.to_string());
        self
    }

    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.raw.launch.program = program.into();
        self
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.raw.launch.args = args.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.raw
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.raw).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
