//! pi-integral - Parallel estimation of pi
//!
//! Approximates pi by midpoint-rule integration of `4 / (1 + x^2)` over `[0, 1]`, spread
//! across a fixed pool of worker threads and reduced with compensated summation.
//!
//! # Architecture
//!
//! - **Stable accumulation**: Neumaier summation in every worker and in the final merge
//! - **Partitioning**: static contiguous ranges or dynamic chunk claiming from an atomic cursor
//! - **Workers**: one OS thread each, private accumulator, no shared mutable state
//! - **Coordinator**: spawn, join, reduce, scale, and time the parallel phase
//!
//! # Example
//!
//! ```
//! use pi_integral::coordinator;
//! use pi_integral::partition::SchedulingMode;
//! use pi_integral::worker::IntegrationTask;
//!
//! let task = IntegrationTask::new(100_000).unwrap();
//! let report = coordinator::run(&task, 4, SchedulingMode::Dynamic, None).unwrap();
//! assert!(report.absolute_error < 1e-9);
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod output;
pub mod partition;
pub mod stats;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::{Coordinator, RunReport};
pub use error::PiError;
pub use stats::StableAccumulator;

/// Result type used throughout pi-integral
pub type Result<T> = anyhow::Result<T>;
