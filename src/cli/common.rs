//! Common CLI utilities shared across all CLI commands.
//!
//! This module provides:
//! - `CliContext`: the loaded configuration and where it came from
//! - Output helpers: `print_success`, `print_warning`, `print_info`

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Shared context for CLI commands.
pub struct CliContext {
    /// The loaded configuration
    pub config: Config,
    /// Path to the config file
    pub config_path: PathBuf,
}

impl CliContext {
    /// Load the configuration, writing the defaults first if the file is missing.
    pub fn load(config_path: PathBuf) -> Result<Self> {
        let config =
            Config::load_or_create(&config_path).context("Failed to load configuration")?;
        Ok(Self {
            config,
            config_path,
        })
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Print a success message with a checkmark prefix.
pub fn print_success(msg: &str) {
    println!("\u{2713} {}", msg);
}

/// Print a warning message with a warning sign prefix.
pub fn print_warning(msg: &str) {
    println!("\u{26A0}\u{FE0F} {}", msg);
}

/// Print an info message with an info sign prefix.
pub fn print_info(msg: &str) {
    println!("\u{2139}\u{FE0F} {}", msg);
}
