//! Typed error taxonomy
//!
//! Library functions return [`crate::Result`] (an `anyhow` result). Errors that the
//! binary must tell apart are raised as [`PiError`] and recovered from the error chain
//! with [`PiError::find`] so they can be mapped to distinct exit codes.

use thiserror::Error;

/// Exit status for a successful run
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status for I/O failures, unreadable config files and internal faults
pub const EXIT_FAILURE: i32 = 1;

/// Exit status for malformed input tokens
pub const EXIT_INPUT_PARSE: i32 = 2;

/// Exit status for well-formed but unusable settings (zero steps, zero workers, ...)
pub const EXIT_INVALID_CONFIGURATION: i32 = 3;

/// Errors raised before any worker is spawned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PiError {
    /// A supplied token is not a valid non-negative integer
    #[error("invalid {field}: '{input}' is not a non-negative integer")]
    InputParse {
        field: &'static str,
        input: String,
    },

    /// The scheduling mode token is not recognised
    #[error("invalid mode: '{0}' (expected 'static' or 'dynamic')")]
    InvalidMode(String),

    /// Settings parsed fine but cannot drive a run
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl PiError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PiError::InputParse { .. } | PiError::InvalidMode(_) => EXIT_INPUT_PARSE,
            PiError::InvalidConfiguration(_) => EXIT_INVALID_CONFIGURATION,
        }
    }

    /// Locate a `PiError` anywhere in an `anyhow` error chain
    pub fn find(err: &anyhow::Error) -> Option<&PiError> {
        err.chain().find_map(|cause| cause.downcast_ref::<PiError>())
    }
}

/// Map any top-level error to the process exit status
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    PiError::find(err).map_or(EXIT_FAILURE, PiError::exit_code)
}
