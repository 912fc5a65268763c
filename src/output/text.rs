//! Human-readable text output

use crate::coordinator::RunReport;
use crate::stats::aggregator::RunSummary;
use std::fmt::Write;

/// Format one run report
///
/// Pi to 15 decimals, absolute error in scientific notation, elapsed seconds to 9
/// decimals. The chunk size line only appears for dynamic runs.
pub fn format_report(report: &RunReport) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Mode:            {}", report.mode);
    let _ = writeln!(out, "Pi estimate:     {:.15}", report.estimate);
    let _ = writeln!(out, "Absolute error:  {:e}", report.absolute_error);
    let _ = writeln!(out, "Elapsed:         {:.9} s", report.elapsed.as_secs_f64());
    let _ = writeln!(out, "Steps:           {}", report.step_count);
    if report.workers == report.requested_workers {
        let _ = writeln!(out, "Workers:         {}", report.workers);
    } else {
        let _ = writeln!(
            out,
            "Workers:         {} (requested {})",
            report.workers, report.requested_workers
        );
    }
    if let Some(chunk) = report.chunk_size {
        let _ = writeln!(out, "Chunk size:      {}", chunk);
    }

    out
}

/// Format the per-worker breakdown of a run
pub fn format_worker_table(report: &RunReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "  {:>6}  {:>14}  {:>8}  {:>24}  {:>12}",
        "Worker", "Indices", "Ranges", "Partial sum", "Elapsed (s)"
    );
    for result in &report.worker_results {
        let _ = writeln!(
            out,
            "  {:>6}  {:>14}  {:>8}  {:>24.12}  {:>12.9}",
            result.worker_id,
            result.indices,
            result.ranges,
            result.partial_sum,
            result.elapsed.as_secs_f64()
        );
    }

    out
}

/// Format the timing summary over repeated runs
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Summary over {} runs:", summary.runs());
    let _ = writeln!(out, "  Elapsed min:     {:.9} s", summary.min_elapsed().as_secs_f64());
    let _ = writeln!(out, "  Elapsed mean:    {:.9} s", summary.mean_secs());
    let _ = writeln!(out, "  Elapsed max:     {:.9} s", summary.max_elapsed().as_secs_f64());
    let _ = writeln!(out, "  Elapsed stddev:  {:.9} s", summary.stddev_secs());
    let _ = writeln!(out, "  Estimate spread: {:e}", summary.estimate_spread());

    out
}

/// Print a run report, with the worker table when requested
pub fn print_report(report: &RunReport, per_worker: bool) {
    print!("{}", format_report(report));
    if per_worker {
        print!("{}", format_worker_table(report));
    }
}

/// Print the repeat summary
pub fn print_summary(summary: &RunSummary) {
    print!("{}", format_summary(summary));
}
