//! CLI token conversion utilities
//!
//! All conversions return [`PiError`] so the caller can tell a malformed token from
//! any other failure.

use crate::error::PiError;
use crate::partition::SchedulingMode;

/// Parse a non-negative integer token
///
/// Surrounding whitespace is ignored. Signs other than a leading `+`, decimal points,
/// exponents, and trailing garbage are all rejected.
pub fn parse_count(field: &'static str, token: &str) -> Result<u64, PiError> {
    let trimmed = token.trim();
    trimmed.parse::<u64>().map_err(|_| PiError::InputParse {
        field,
        input: trimmed.to_string(),
    })
}

/// Parse a count that must also fit in `usize`
pub fn parse_usize(field: &'static str, token: &str) -> Result<usize, PiError> {
    let value = parse_count(field, token)?;
    usize::try_from(value).map_err(|_| PiError::InputParse {
        field,
        input: token.trim().to_string(),
    })
}

/// Parse a scheduling mode token
pub fn parse_mode(token: &str) -> Result<SchedulingMode, PiError> {
    token.parse()
}
