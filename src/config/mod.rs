//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, interactive prompts, and
//! validation.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config`)
//! 3. Command-line positionals and flags
//! 4. Interactive prompts for anything still missing

pub mod cli;
pub mod cli_convert;
pub mod prompt;
pub mod toml;
pub mod validator;

use crate::error::PiError;
use crate::partition::{resolve_chunk_size, SchedulingMode};
use crate::Result;
use cli::Cli;
use prompt::Prompter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

/// Fully resolved run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub integration: IntegrationConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// What to integrate and how to schedule it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// Number of midpoint-rule steps
    pub steps: u64,
    /// Requested number of worker threads
    pub workers: usize,
    /// Scheduling policy
    #[serde(default)]
    pub mode: SchedulingMode,
    /// Dynamic-mode chunk size override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<u64>,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Write a JSON report to this path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_output: Option<PathBuf>,
    /// Print one line per worker after each report
    #[serde(default)]
    pub per_worker: bool,
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Number of times to repeat the run
    #[serde(default = "default_repeat")]
    pub repeat: usize,
    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
    /// Validate and print the configuration without running
    #[serde(default)]
    pub dry_run: bool,
}

fn default_repeat() -> usize {
    1
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            repeat: default_repeat(),
            debug: false,
            dry_run: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            integration: IntegrationConfig {
                steps: 1_000_000,
                workers: default_workers(),
                mode: SchedulingMode::default(),
                chunk_size: None,
            },
            output: OutputConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config {
    /// Chunk size a dynamic run will use (`None` in static mode)
    pub fn effective_chunk_size(&self) -> Option<u64> {
        let integration = &self.integration;
        match integration.mode {
            SchedulingMode::Static => None,
            SchedulingMode::Dynamic => Some(resolve_chunk_size(
                integration.steps,
                integration.workers,
                integration.chunk_size,
            )),
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Steps:   {}", self.integration.steps)?;
        writeln!(f, "  Workers: {}", self.integration.workers)?;
        writeln!(f, "  Mode:    {}", self.integration.mode)?;
        if let Some(chunk) = self.effective_chunk_size() {
            writeln!(f, "  Chunk:   {}", chunk)?;
        }
        write!(f, "  Repeat:  {}", self.runtime.repeat)
    }
}

/// Number of logical CPUs, used when no worker count is given
pub fn default_workers() -> usize {
    num_cpus::get().max(1)
}

/// Settings as read from a TOML file; every integration field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub integration: IntegrationSettings,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Partially specified integration settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntegrationSettings {
    pub steps: Option<u64>,
    pub workers: Option<usize>,
    pub mode: Option<SchedulingMode>,
    pub chunk_size: Option<u64>,
}

/// Resolve the configuration, prompting only when stdin is interactive
///
/// Prompts are written to `output`; the binary passes stderr so stdout carries nothing
/// but the report. With `--no-prompt` or a non-interactive stdin this is
/// [`resolve_config`] without a prompter.
pub fn load_config<R: BufRead, W: Write>(
    cli: &Cli,
    interactive: bool,
    input: R,
    output: W,
) -> Result<Config> {
    if cli.no_prompt || !interactive {
        debug!(no_prompt = cli.no_prompt, interactive, "prompting disabled");
        return resolve_config::<R, W>(cli, None);
    }
    let mut prompter = Prompter::new(input, output);
    resolve_config(cli, Some(&mut prompter))
}

/// Build the final configuration from the CLI, an optional config file, and prompts
///
/// When `prompter` is `None` nothing is asked: a missing worker count falls back to the
/// CPU count, a missing mode to dynamic, and a missing step count is an error.
///
/// # Errors
///
/// - [`PiError::InputParse`] / [`PiError::InvalidMode`] for malformed tokens
/// - [`PiError::InvalidConfiguration`] for missing or out-of-range values
/// - plain errors for unreadable or malformed config files
pub fn resolve_config<R: BufRead, W: Write>(
    cli: &Cli,
    mut prompter: Option<&mut Prompter<R, W>>,
) -> Result<Config> {
    let file = match cli.config {
        Some(ref path) => toml::parse_toml_file(path)?,
        None => ConfigFile::default(),
    };
    let merged = toml::merge_cli_with_config(cli, file)?;
    let settings = merged.integration;
    let mut prompted = false;

    let steps = match (settings.steps, prompter.as_deref_mut()) {
        (Some(steps), _) => steps,
        (None, Some(p)) => {
            prompted = true;
            p.ask_count("steps", "Number of integration steps", None)?
        }
        (None, None) => {
            let message = "number of steps not specified".to_string();
            return Err(PiError::InvalidConfiguration(message).into());
        }
    };
    // Fail before asking anything else
    validator::validate_steps(steps)?;

    let workers = match (settings.workers, prompter.as_deref_mut()) {
        (Some(workers), _) => workers,
        (None, Some(p)) => {
            prompted = true;
            let default = Some(default_workers() as u64);
            let answer = p.ask_count("workers", "Number of worker threads", default)?;
            usize::try_from(answer).map_err(|_| PiError::InputParse {
                field: "workers",
                input: answer.to_string(),
            })?
        }
        (None, None) => default_workers(),
    };
    validator::validate_workers(workers)?;

    let mode = match (settings.mode, prompter.as_deref_mut()) {
        (Some(mode), _) => mode,
        (None, Some(p)) => {
            prompted = true;
            p.ask_mode(SchedulingMode::default())?
        }
        (None, None) => SchedulingMode::default(),
    };

    let chunk_size = match (settings.chunk_size, mode, prompter.as_deref_mut()) {
        (Some(chunk), _, _) => Some(chunk),
        (None, SchedulingMode::Dynamic, Some(p)) if prompted => {
            let default = resolve_chunk_size(steps, workers, None);
            p.ask_optional_count("chunk size", "Chunk size", default)?
        }
        _ => None,
    };

    let config = Config {
        integration: IntegrationConfig {
            steps,
            workers,
            mode,
            chunk_size,
        },
        output: merged.output,
        runtime: merged.runtime,
    };
    debug!(?config, prompted, "configuration resolved");

    validator::validate_config(&config)?;
    Ok(config)
}
