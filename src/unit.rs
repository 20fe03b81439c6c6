// src/unit.rs

//! Render the systemd drop-in that runs hostboot in place of the default
//! daemon command.

use std::fmt::Write as _;
use std::path::Path;

use crate::config::ConfigFile;
use crate::prereq::Prerequisite;

/// Targets that are pulled in with `Wants=` rather than `Requires=`.
const SOFT_TARGETS: [&str; 2] = ["network-online.target", "network.target"];

/// Build a drop-in (e.g. `docker.service.d/10-hostboot.conf`) that orders
/// the service after its unit prerequisites and overrides `ExecStart=`.
///
/// The empty `ExecStart=` line clears the packaged default before the new
/// command is set.
pub fn render_drop_in(cfg: &ConfigFile, hostboot_bin: &Path, config_path: &Path) -> String {
    let units: Vec<&str> = cfg
        .prerequisites
        .conditions
        .iter()
        .filter_map(|c| match c {
            Prerequisite::Unit(name) => Some(name.as_str()),
            _ => None,
        })
        .collect();

    let runtime_checks: Vec<String> = cfg
        .prerequisites
        .conditions
        .iter()
        .filter(|c| !matches!(c, Prerequisite::Unit(_)))
        .map(|c| c.to_string())
        .collect();

    let (soft, hard): (Vec<&str>, Vec<&str>) =
        units.iter().copied().partition(|u| SOFT_TARGETS.contains(u));

    let mut out = String::new();
    out.push_str("# Generated by hostboot. Do not edit by hand.\n");
    out.push_str("[Unit]\n");
    if !units.is_empty() {
        let _ = writeln!(out, "After={}", units.join(" "));
    }
    if !soft.is_empty() {
        let _ = writeln!(out, "Wants={}", soft.join(" "));
    }
    if !hard.is_empty() {
        let _ = writeln!(out, "Requires={}", hard.join(" "));
    }
    if !runtime_checks.is_empty() {
        let _ = writeln!(out, "# Checked at startup: {}", runtime_checks.join(", "));
    }

    out.push_str("\n[Service]\n");
    out.push_str("ExecStart=\n");
    let _ = writeln!(
        out,
        "ExecStart={} --config {}",
        hostboot_bin.display(),
        config_path.display()
    );
    let _ = writeln!(out, "# Daemon: {}", cfg.launch.command_line());

    out
}
