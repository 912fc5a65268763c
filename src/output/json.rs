//! JSON output formatting
//!
//! One document per invocation containing:
//! - The resolved configuration
//! - Every run report (optionally with per-worker detail)
//! - The timing summary across repeats

use crate::config::Config;
use crate::coordinator::RunReport;
use crate::partition::SchedulingMode;
use crate::stats::aggregator::RunSummary;
use crate::worker::WorkerResult;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Complete JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    /// RFC 3339 timestamp of when the report was written
    pub timestamp: String,
    pub config: Config,
    pub runs: Vec<JsonRun>,
    pub summary: JsonSummary,
}

/// One run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRun {
    pub mode: SchedulingMode,
    pub estimate: f64,
    pub absolute_error: f64,
    pub elapsed_secs: f64,
    pub steps: u64,
    pub requested_workers: usize,
    pub workers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_worker: Option<Vec<JsonWorker>>,
}

/// Per-worker detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWorker {
    pub worker_id: usize,
    pub partial_sum: f64,
    pub indices: u64,
    pub ranges: u64,
    pub elapsed_secs: f64,
}

/// Timing summary across repeats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub runs: usize,
    pub min_elapsed_secs: f64,
    pub mean_elapsed_secs: f64,
    pub max_elapsed_secs: f64,
    pub stddev_elapsed_secs: f64,
    pub estimate_spread: f64,
}

impl From<&WorkerResult> for JsonWorker {
    fn from(result: &WorkerResult) -> Self {
        Self {
            worker_id: result.worker_id,
            partial_sum: result.partial_sum,
            indices: result.indices,
            ranges: result.ranges,
            elapsed_secs: result.elapsed.as_secs_f64(),
        }
    }
}

impl JsonRun {
    pub fn from_report(report: &RunReport, per_worker: bool) -> Self {
        Self {
            mode: report.mode,
            estimate: report.estimate,
            absolute_error: report.absolute_error,
            elapsed_secs: report.elapsed.as_secs_f64(),
            steps: report.step_count,
            requested_workers: report.requested_workers,
            workers: report.workers,
            chunk_size: report.chunk_size,
            per_worker: per_worker
                .then(|| report.worker_results.iter().map(JsonWorker::from).collect()),
        }
    }
}

impl From<&RunSummary> for JsonSummary {
    fn from(summary: &RunSummary) -> Self {
        Self {
            runs: summary.runs(),
            min_elapsed_secs: summary.min_elapsed().as_secs_f64(),
            mean_elapsed_secs: summary.mean_secs(),
            max_elapsed_secs: summary.max_elapsed().as_secs_f64(),
            stddev_elapsed_secs: summary.stddev_secs(),
            estimate_spread: summary.estimate_spread(),
        }
    }
}

impl JsonReport {
    /// Assemble the document; per-worker detail follows `config.output.per_worker`
    pub fn new(config: &Config, reports: &[RunReport], summary: &RunSummary) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            config: config.clone(),
            runs: reports
                .iter()
                .map(|r| JsonRun::from_report(r, config.output.per_worker))
                .collect(),
            summary: JsonSummary::from(summary),
        }
    }
}

/// Write the report to `path` as pretty-printed JSON
pub fn write_json(path: &Path, report: &JsonReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("Failed to write JSON output: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write JSON output: {}", path.display()))?;
    Ok(())
}
