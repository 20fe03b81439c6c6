// src/config/mod.rs

//! Configuration loading and validation for hostboot.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, falling back to built-in defaults
//!   (`loader.rs`).
//! - Validate values and turn them into typed settings (`validate.rs`).
//! - Parse human duration strings like `"2s"` (`duration.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::{format_duration, parse_duration};
pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    ConfigFile, LaunchSection, MetadataSection, MetadataSettings, PrerequisiteSettings,
    PrerequisitesSection, RawConfigFile,
};
