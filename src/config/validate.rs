// src/config/validate.rs

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Url;

use crate::config::duration::parse_duration;
use crate::config::model::{
    ConfigFile, LaunchSection, MetadataSection, MetadataSettings, PrerequisiteSettings,
    PrerequisitesSection, RawConfigFile,
};
use crate::errors::{HostbootError, Result};
use crate::launch::LaunchSpec;
use crate::prereq::Prerequisite;

static ENV_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"));

// systemd unit names: `name.suffix`, optionally templated with `@`.
static UNIT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9:_.\\@-]+\.[a-z]+$").expect("static regex")
});

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = HostbootError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let prerequisites = validate_prerequisites(&raw.prerequisites)?;
        let metadata = validate_metadata(&raw.metadata)?;
        let launch = validate_launch(&raw.launch)?;
        Ok(ConfigFile::new_unchecked(prerequisites, metadata, launch))
    }
}

/// Returns true when `key` is usable as a POSIX environment variable name.
pub fn is_valid_env_key(key: &str) -> bool {
    ENV_KEY_RE.is_match(key)
}

fn config_err(msg: impl Into<String>) -> HostbootError {
    HostbootError::ConfigError(msg.into())
}

/// Upper bound for every configured duration.
pub const MAX_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

fn duration_field(section: &str, key: &str, value: &str) -> Result<Duration> {
    let d = parse_duration(value).map_err(|e| config_err(format!("[{section}].{key}: {e}")))?;
    if d > MAX_DURATION {
        return Err(config_err(format!("[{section}].{key} must be at most 24h")));
    }
    Ok(d)
}

fn positive_duration_field(section: &str, key: &str, value: &str) -> Result<Duration> {
    let d = duration_field(section, key, value)?;
    if d.is_zero() {
        return Err(config_err(format!("[{section}].{key} must be greater than zero")));
    }
    Ok(d)
}

fn validate_prerequisites(section: &PrerequisitesSection) -> Result<PrerequisiteSettings> {
    let timeout = positive_duration_field("prerequisites", "timeout", &section.timeout)?;
    let poll_interval =
        positive_duration_field("prerequisites", "poll_interval", &section.poll_interval)?;

    let mut conditions = Vec::new();

    for unit in &section.units {
        if !UNIT_NAME_RE.is_match(unit) {
            return Err(config_err(format!(
                "[prerequisites].units: '{unit}' is not a valid unit name"
            )));
        }
        conditions.push(Prerequisite::Unit(unit.clone()));
    }

    for path in &section.paths {
        if !path.is_absolute() {
            return Err(config_err(format!(
                "[prerequisites].paths: '{}' must be an absolute path",
                path.display()
            )));
        }
        conditions.push(Prerequisite::Path(path.clone()));
    }

    for addr in &section.tcp {
        validate_host_port(addr)?;
        conditions.push(Prerequisite::Tcp(addr.clone()));
    }

    // Duplicates would only be probed twice; drop them but keep declaration order.
    let mut seen = Vec::with_capacity(conditions.len());
    conditions.retain(|c| {
        if seen.contains(c) {
            false
        } else {
            seen.push(c.clone());
            true
        }
    });

    Ok(PrerequisiteSettings {
        conditions,
        timeout,
        poll_interval,
    })
}

fn validate_host_port(addr: &str) -> Result<()> {
    let (host, port) = addr.rsplit_once(':').ok_or_else(|| {
        config_err(format!("[prerequisites].tcp: '{addr}' must be of the form host:port"))
    })?;
    if host.is_empty() {
        return Err(config_err(format!("[prerequisites].tcp: '{addr}' has an empty host")));
    }
    match port.parse::<u16>() {
        Ok(p) if p != 0 => Ok(()),
        _ => Err(config_err(format!(
            "[prerequisites].tcp: '{addr}' has an invalid port '{port}'"
        ))),
    }
}

fn validate_metadata(section: &MetadataSection) -> Result<MetadataSettings> {
    let endpoint = Url::parse(&section.endpoint).map_err(|e| {
        config_err(format!(
            "[metadata].endpoint: '{}' is not a valid URL: {e}",
            section.endpoint
        ))
    })?;
    if endpoint.scheme() != "http" {
        return Err(config_err(format!(
            "[metadata].endpoint must use http:// (got '{}')",
            endpoint.scheme()
        )));
    }
    if endpoint.host_str().is_none() {
        return Err(config_err("[metadata].endpoint has no host"));
    }

    let timeout = positive_duration_field("metadata", "timeout", &section.timeout)?;
    let retry_delay = duration_field("metadata", "retry_delay", &section.retry_delay)?;

    if section.attempts == 0 {
        return Err(config_err("[metadata].attempts must be >= 1 (got 0)"));
    }

    if !is_valid_env_key(&section.env_key) {
        return Err(config_err(format!(
            "[metadata].env_key: '{}' is not a valid environment variable name",
            section.env_key
        )));
    }

    let token_ttl = match section.token_ttl.as_deref() {
        Some(ttl) => {
            let d = positive_duration_field("metadata", "token_ttl", ttl)?;
            // IMDSv2 accepts 1s..=6h.
            if d < Duration::from_secs(1) || d > Duration::from_secs(6 * 60 * 60) {
                return Err(config_err(
                    "[metadata].token_ttl must be between 1s and 6h",
                ));
            }
            Some(d)
        }
        None => None,
    };

    Ok(MetadataSettings {
        endpoint,
        timeout,
        attempts: section.attempts,
        retry_delay,
        env_key: section.env_key.clone(),
        token_ttl,
    })
}

fn validate_launch(section: &LaunchSection) -> Result<LaunchSpec> {
    if section.program.as_os_str().is_empty() {
        return Err(config_err("[launch].program must not be empty"));
    }
    if !section.program.is_absolute() {
        return Err(config_err(format!(
            "[launch].program: '{}' must be an absolute path",
            section.program.display()
        )));
    }
    if section.args.iter().any(|a| a.contains('\0')) {
        return Err(config_err("[launch].args must not contain NUL bytes"));
    }
    Ok(LaunchSpec::new(section.program.clone(), section.args.clone()))
}
