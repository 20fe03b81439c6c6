// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod launch;
pub mod logging;
pub mod metadata;
pub mod prereq;
pub mod supervisor;
pub mod types;
pub mod unit;

use std::time::Duration;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{format_duration, load_or_default, ConfigFile};
use crate::errors::Result;
use crate::launch::ExecLauncher;
use crate::metadata::ImdsClient;
use crate::prereq::SystemProbe;
use crate::supervisor::Supervisor;

/// Upper bound for a single prerequisite check (one `systemctl` call or one
/// TCP connect).
const MAX_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the host-backed prerequisite probe
/// - the metadata HTTP client
/// - the exec launcher
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(&args.config)?;

    if args.render_unit {
        let exe = std::env::current_exe()?;
        print!("{}", unit::render_drop_in(&cfg, &exe, &args.config));
        return Ok(());
    }

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let probe = SystemProbe::new(cfg.prerequisites.timeout.min(MAX_CHECK_TIMEOUT));
    let metadata = ImdsClient::new(&cfg.metadata)?;
    let mut supervisor = Supervisor::new(cfg, probe, metadata, ExecLauncher::new());
    supervisor.run().await
}

/// Simple dry-run output: prerequisites, metadata source and launch command.
fn print_dry_run(cfg: &ConfigFile) {
    println!("hostboot dry-run");
    println!();

    let pre = &cfg.prerequisites;
    println!(
        "prerequisites ({}, timeout {}, poll every {}):",
        pre.conditions.len(),
        format_duration(pre.timeout),
        format_duration(pre.poll_interval)
    );
    for condition in &pre.conditions {
        println!("  - {condition}");
    }
    println!();

    let md = &cfg.metadata;
    println!("metadata:");
    println!("  endpoint: {}", md.endpoint);
    println!("  timeout: {}", format_duration(md.timeout));
    println!("  attempts: {}", md.attempts);
    if md.attempts > 1 {
        println!("  retry_delay: {}", format_duration(md.retry_delay));
    }
    if let Some(ttl) = md.token_ttl {
        println!("  token_ttl: {}", format_duration(ttl));
    }
    println!("  publishes: {}=<region>", md.env_key);
    println!();

    println!("launch:");
    println!("  program: {}", cfg.launch.program().display());
    println!("  args: {:?}", cfg.launch.args());

    debug!("dry-run complete (no execution)");
}
