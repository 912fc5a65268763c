//! CLI argument parsing using clap
//!
//! Positional values are taken as raw strings and converted by
//! [`cli_convert`](super::cli_convert), so a malformed number is reported as an input
//! parse error rather than a usage error.

use crate::error::{EXIT_INPUT_PARSE, EXIT_SUCCESS};
use clap::Parser;
use std::path::PathBuf;

/// pi-integral - Parallel midpoint-rule estimation of pi
#[derive(Parser, Debug)]
#[command(name = "pi-integral")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Number of integration steps (prompted for if omitted)
    #[arg(value_name = "STEPS", allow_negative_numbers = true)]
    pub steps: Option<String>,

    /// Number of worker threads (prompted for if omitted)
    #[arg(value_name = "WORKERS", allow_negative_numbers = true)]
    pub workers: Option<String>,

    /// Scheduling mode: static or dynamic (default: dynamic)
    #[arg(value_name = "MODE")]
    pub mode: Option<String>,

    /// Dynamic-mode chunk size (default: max(1, steps / (workers * 128)))
    #[arg(value_name = "CHUNK_SIZE", allow_negative_numbers = true)]
    pub chunk: Option<String>,

    /// Dynamic-mode chunk size, as a flag
    #[arg(long, value_name = "N", conflicts_with = "chunk", allow_negative_numbers = true)]
    pub chunk_size: Option<String>,

    // === Configuration File ===
    /// TOML configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    // === Output Options ===
    /// JSON output file path
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Print per-worker partial sums and timings
    #[arg(long)]
    pub per_worker: bool,

    // === Runtime Options ===
    /// Repeat the run N times and print a timing summary
    #[arg(long, value_name = "N")]
    pub repeat: Option<String>,

    /// Dry run - validate configuration without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Never prompt; fall back to defaults for missing values
    #[arg(long, env = "PI_INTEGRAL_NO_PROMPT")]
    pub no_prompt: bool,
}

impl Cli {
    /// Parse CLI arguments without exiting on failure
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Chunk size token from either the positional or the flag
    pub fn chunk_token(&self) -> Option<&str> {
        self.chunk_size.as_deref().or(self.chunk.as_deref())
    }
}

/// Exit status for a clap parse failure
///
/// `--help` and `--version` succeed. Usage errors (unknown flag, extra positional,
/// missing flag value) share the status of malformed input.
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        EXIT_INPUT_PARSE
    } else {
        EXIT_SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positionals_are_raw_strings() {
        let cli = Cli::try_parse_from(["pi-integral", "1e6", "-3", "fast"]).unwrap();
        assert_eq!(cli.steps.as_deref(), Some("1e6"));
        assert_eq!(cli.workers.as_deref(), Some("-3"));
        assert_eq!(cli.mode.as_deref(), Some("fast"));
        assert_eq!(cli.chunk_token(), None);
    }

    #[test]
    fn test_chunk_flag() {
        let cli = Cli::try_parse_from(["pi-integral", "100", "2", "--chunk-size", "8"]).unwrap();
        assert_eq!(cli.chunk_token(), Some("8"));
    }

    #[test]
    fn test_chunk_positional_conflicts_with_flag() {
        let args = ["pi-integral", "100", "2", "dynamic", "4", "--chunk-size", "8"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "pi-integral",
            "--config",
            "run.toml",
            "--json-output",
            "out.json",
            "--per-worker",
            "--repeat",
            "5",
            "--dry-run",
            "--debug",
            "--no-prompt",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("run.toml")));
        assert_eq!(cli.json_output, Some(PathBuf::from("out.json")));
        assert!(cli.per_worker);
        assert_eq!(cli.repeat.as_deref(), Some("5"));
        assert!(cli.dry_run && cli.debug && cli.no_prompt);
        assert!(cli.steps.is_none());
    }

    #[test]
    fn test_usage_errors_share_input_parse_status() {
        let extra = Cli::try_parse_from(["pi-integral", "1", "2", "static", "4", "5"]).unwrap_err();
        assert_eq!(usage_exit_code(&extra), EXIT_INPUT_PARSE);

        let missing_value = Cli::try_parse_from(["pi-integral", "--repeat"]).unwrap_err();
        assert_eq!(usage_exit_code(&missing_value), EXIT_INPUT_PARSE);

        let help = Cli::try_parse_from(["pi-integral", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&help), EXIT_SUCCESS);
    }
}
