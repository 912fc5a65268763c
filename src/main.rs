//! pi-integral CLI entry point

use anyhow::Result;
use pi_integral::config::cli::{usage_exit_code, Cli};
use pi_integral::config::{load_config, Config};
use pi_integral::coordinator::Coordinator;
use pi_integral::error::exit_code_for;
use pi_integral::output::{json, text};
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn main() -> ExitCode {
    let cli = match Cli::try_parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            let code = usage_exit_code(&e);
            let _ = e.print();
            return ExitCode::from(code as u8);
        }
    };
    let log_handle = init_logging(cli.debug);

    match run(cli, &log_handle) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code_for(&e) as u8)
        }
    }
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins when set; otherwise `--debug` selects debug level for this crate.
fn init_logging(debug: bool) -> FilterHandle {
    let (filter, handle) = reload::Layer::new(log_filter(debug));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
    handle
}

fn log_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug { "pi_integral=debug" } else { "pi_integral=warn" })
    })
}

fn run(cli: Cli, log_handle: &FilterHandle) -> Result<()> {
    // Prompts go to stderr so stdout only ever carries the report
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let config = load_config(&cli, interactive, stdin.lock(), io::stderr().lock())?;

    // The config file may enable debug logging after the subscriber is installed
    if config.runtime.debug && !cli.debug {
        if let Err(e) = log_handle.modify(|filter| *filter = log_filter(true)) {
            eprintln!("Warning: Failed to raise log level: {}", e);
        }
    }

    if config.runtime.dry_run {
        println!("{}", config);
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    run_coordinator(&config)
}

/// Execute all runs, print reports, and write the JSON document if requested
fn run_coordinator(config: &Config) -> Result<()> {
    let coordinator = Coordinator::new(config)?;
    let repeat = config.runtime.repeat;
    debug!(steps = coordinator.task().step_count(), repeat, "starting");

    let (reports, summary) = coordinator.run(|iteration, report| {
        if repeat > 1 {
            println!("Run {}/{}", iteration + 1, repeat);
        }
        text::print_report(report, config.output.per_worker);
        if repeat > 1 {
            println!();
        }
    })?;

    if repeat > 1 {
        text::print_summary(&summary);
    }

    if let Some(ref path) = config.output.json_output {
        let document = json::JsonReport::new(config, &reports, &summary);
        json::write_json(path, &document)?;
        info!(path = %path.display(), "JSON report written");
    }

    Ok(())
}
