//! TOML configuration file parsing
//!
//! ```toml
//! [integration]
//! steps = 100000000
//! workers = 8
//! mode = "dynamic"
//! chunk_size = 50000
//!
//! [output]
//! json_output = "pi.json"
//! per_worker = true
//!
//! [runtime]
//! repeat = 5
//! ```

use super::cli::Cli;
use super::cli_convert::{parse_count, parse_mode, parse_usize};
use super::ConfigFile;
use crate::Result;
use anyhow::Context;
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<ConfigFile> {
    let config: ConfigFile = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: ConfigFile) -> Result<ConfigFile> {
    // Override integration settings
    if let Some(ref token) = cli.steps {
        config.integration.steps = Some(parse_count("steps", token)?);
    }
    if let Some(ref token) = cli.workers {
        config.integration.workers = Some(parse_usize("workers", token)?);
    }
    if let Some(ref token) = cli.mode {
        config.integration.mode = Some(parse_mode(token)?);
    }
    if let Some(token) = cli.chunk_token() {
        config.integration.chunk_size = Some(parse_count("chunk size", token)?);
    }

    // Override output settings
    if let Some(ref path) = cli.json_output {
        config.output.json_output = Some(path.clone());
    }
    if cli.per_worker {
        config.output.per_worker = true;
    }

    // Override runtime settings
    if let Some(ref token) = cli.repeat {
        config.runtime.repeat = parse_usize("repeat", token)?;
    }
    if cli.debug {
        config.runtime.debug = true;
    }
    if cli.dry_run {
        config.runtime.dry_run = true;
    }

    Ok(config)
}
