//! Configuration validation
//!
//! Runs after every layer has been merged and before any worker thread exists. All
//! failures are [`PiError::InvalidConfiguration`].

use super::*;
use crate::worker::kernel::MAX_STEPS;
use tracing::warn;

/// Upper bound on worker threads
///
/// Keeps the dynamic claim cursor (at most `workers` overshooting claims of at most
/// `steps` indices past `MAX_STEPS`) far from `u64` overflow.
pub const MAX_WORKERS: usize = 1024;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_integration(&config.integration)?;
    validate_runtime(&config.runtime)?;
    Ok(())
}

fn invalid(message: String) -> anyhow::Error {
    PiError::InvalidConfiguration(message).into()
}

/// Check a step count on its own, as soon as it is known
pub fn validate_steps(steps: u64) -> Result<()> {
    if steps == 0 {
        return Err(invalid("steps must be at least 1".into()));
    }
    if steps > MAX_STEPS {
        return Err(invalid(format!("steps must be at most {}, got {}", MAX_STEPS, steps)));
    }
    Ok(())
}

/// Check a worker count on its own, as soon as it is known
pub fn validate_workers(workers: usize) -> Result<()> {
    if workers == 0 {
        return Err(invalid("workers must be at least 1".into()));
    }
    if workers > MAX_WORKERS {
        return Err(invalid(format!("workers must be at most {}, got {}", MAX_WORKERS, workers)));
    }
    Ok(())
}

/// Validate integration settings
pub fn validate_integration(integration: &IntegrationConfig) -> Result<()> {
    validate_steps(integration.steps)?;
    validate_workers(integration.workers)?;

    if let Some(chunk) = integration.chunk_size {
        if chunk == 0 {
            return Err(invalid("chunk size must be at least 1".into()));
        }
        if integration.mode == SchedulingMode::Static {
            warn!(chunk, "chunk size is ignored in static mode");
        }
    }

    Ok(())
}

/// Validate runtime settings
pub fn validate_runtime(runtime: &RuntimeConfig) -> Result<()> {
    if runtime.repeat == 0 {
        return Err(invalid("repeat must be at least 1".into()));
    }
    Ok(())
}
