//! Report output
//!
//! - **text**: the human-readable report on stdout
//! - **json**: a machine-readable document written to a file

pub mod json;
pub mod text;
