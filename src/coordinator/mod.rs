//! Coordinator module
//!
//! Orchestrates workers and reduces their results.
//!
//! A run goes through four phases:
//!
//! 1. **Plan**: clamp the worker count and build a [`SchedulingPlan`]
//! 2. **Spawn**: one named OS thread per worker, each owning its [`Worker`]
//! 3. **Join**: wait for every thread, dropping each partial sum into its id's slot
//! 4. **Reduce**: sum the slots with a fresh accumulator and scale by the step width
//!
//! Only phases 2 and 3 are timed.

use crate::config::Config;
use crate::error::PiError;
use crate::partition::{SchedulingMode, SchedulingPlan};
use crate::stats::aggregator::{PartialSums, RunSummary};
use crate::worker::{IntegrationTask, Worker, WorkerResult, REFERENCE_PI};
use crate::Result;
use anyhow::Context;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Outcome of a single run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: SchedulingMode,
    /// Pi estimate
    pub estimate: f64,
    /// `|estimate - pi|`
    pub absolute_error: f64,
    /// Wall-clock time of the parallel phase
    pub elapsed: Duration,
    pub step_count: u64,
    /// Worker count as requested
    pub requested_workers: usize,
    /// Worker count after clamping to the step count
    pub workers: usize,
    /// Chunk size in effect (dynamic mode only)
    pub chunk_size: Option<u64>,
    /// Per-worker results ordered by worker id
    pub worker_results: Vec<WorkerResult>,
}

/// Run one integration
///
/// # Errors
///
/// Returns [`PiError::InvalidConfiguration`] if `worker_count` or `chunk_size` is zero,
/// before any thread is spawned. A panicking worker thread surfaces as a plain error.
pub fn run(
    task: &IntegrationTask,
    worker_count: usize,
    mode: SchedulingMode,
    chunk_size: Option<u64>,
) -> Result<RunReport> {
    if worker_count == 0 {
        return Err(PiError::InvalidConfiguration("workers must be at least 1".into()).into());
    }
    if chunk_size == Some(0) {
        return Err(PiError::InvalidConfiguration("chunk size must be at least 1".into()).into());
    }

    let plan = SchedulingPlan::build(task.step_count(), worker_count, mode, chunk_size);
    let workers = plan.workers();
    if workers < worker_count {
        warn!(
            requested = worker_count,
            effective = workers,
            steps = task.step_count(),
            "more workers than steps, clamping worker count"
        );
    }
    debug!(mode = %mode, workers, chunk_size = ?plan.chunk_size(), "scheduling plan ready");

    let start = Instant::now();
    let handles = spawn_workers(task, &plan)?;

    let worker_results = join_workers(handles)?;
    let elapsed = start.elapsed();

    let mut partials = PartialSums::new(workers);
    for result in &worker_results {
        partials.record(result.worker_id, result.partial_sum)?;
    }
    debug!(elapsed_secs = elapsed.as_secs_f64(), "all workers joined");

    let estimate = partials.reduce()?.total() * task.step_width();
    let absolute_error = (estimate - REFERENCE_PI).abs();
    info!(mode = %mode, estimate, absolute_error, "run complete");

    Ok(RunReport {
        mode,
        estimate,
        absolute_error,
        elapsed,
        step_count: task.step_count(),
        requested_workers: worker_count,
        workers,
        chunk_size: plan.chunk_size(),
        worker_results,
    })
}

/// Spawn one thread per work source
///
/// If a spawn fails the threads already started are joined before the error is returned.
fn spawn_workers(
    task: &IntegrationTask,
    plan: &SchedulingPlan,
) -> Result<Vec<JoinHandle<WorkerResult>>> {
    let mut handles = Vec::with_capacity(plan.workers());

    for (worker_id, source) in plan.sources().into_iter().enumerate() {
        let worker = Worker::new(worker_id, *task, source);
        let spawned = thread::Builder::new()
            .name(format!("pi-worker-{}", worker_id))
            .spawn(move || worker.run());

        match spawned {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                for handle in handles {
                    let _ = handle.join();
                }
                return Err(e)
                    .with_context(|| format!("Failed to spawn worker thread {}", worker_id));
            }
        }
    }

    Ok(handles)
}

/// Join every worker thread, then report the first panic if any
///
/// No thread is left running when this returns, even on error.
fn join_workers(handles: Vec<JoinHandle<WorkerResult>>) -> Result<Vec<WorkerResult>> {
    let joined: Vec<_> = handles.into_iter().map(JoinHandle::join).collect();
    joined
        .into_iter()
        .enumerate()
        .map(|(worker_id, outcome)| {
            outcome.map_err(|_| anyhow::anyhow!("Worker thread {} panicked", worker_id))
        })
        .collect()
}

/// Drives one or more runs from a resolved [`Config`]
#[derive(Debug, Clone)]
pub struct Coordinator {
    task: IntegrationTask,
    workers: usize,
    mode: SchedulingMode,
    chunk_size: Option<u64>,
    repeat: usize,
}

impl Coordinator {
    /// Create a coordinator
    ///
    /// # Errors
    ///
    /// Returns [`PiError::InvalidConfiguration`] if the step count is unusable.
    pub fn new(config: &Config) -> Result<Self> {
        let task = IntegrationTask::new(config.integration.steps)?;
        Ok(Self {
            task,
            workers: config.integration.workers,
            mode: config.integration.mode,
            chunk_size: config.integration.chunk_size,
            repeat: config.runtime.repeat.max(1),
        })
    }

    pub fn task(&self) -> &IntegrationTask {
        &self.task
    }

    /// Execute every configured repetition
    ///
    /// `on_report` sees each report as soon as its run finishes.
    pub fn run<F>(&self, mut on_report: F) -> Result<(Vec<RunReport>, RunSummary)>
    where
        F: FnMut(usize, &RunReport),
    {
        let mut reports = Vec::with_capacity(self.repeat);
        let mut summary = RunSummary::new();

        for iteration in 0..self.repeat {
            let report = run(&self.task, self.workers, self.mode, self.chunk_size)
                .with_context(|| format!("Run {} of {} failed", iteration + 1, self.repeat))?;
            summary.add_run(report.elapsed, report.estimate);
            on_report(iteration, &report);
            reports.push(report);
        }

        Ok((reports, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_INVALID_CONFIGURATION;

    #[test]
    fn test_static_end_to_end() {
        let task = IntegrationTask::new(1_000_000).unwrap();
        let report = run(&task, 4, SchedulingMode::Static, None).unwrap();

        assert_eq!(report.mode, SchedulingMode::Static);
        assert_eq!(report.workers, 4);
        assert_eq!(report.chunk_size, None);
        assert!((report.estimate - REFERENCE_PI).abs() < 1e-6);
        assert_eq!(report.absolute_error, (report.estimate - REFERENCE_PI).abs());
    }

    #[test]
    fn test_dynamic_matches_static() {
        let task = IntegrationTask::new(1_000_000).unwrap();
        let fixed = run(&task, 4, SchedulingMode::Static, None).unwrap();
        let dynamic = run(&task, 4, SchedulingMode::Dynamic, None).unwrap();

        assert_eq!(dynamic.chunk_size, Some(1953));
        assert!((dynamic.estimate - REFERENCE_PI).abs() < 1e-6);
        assert!((dynamic.estimate - fixed.estimate).abs() < 1e-6);
    }

    #[test]
    fn test_single_worker_modes_agree() {
        let task = IntegrationTask::new(200_000).unwrap();
        let fixed = run(&task, 1, SchedulingMode::Static, None).unwrap();
        let dynamic = run(&task, 1, SchedulingMode::Dynamic, None).unwrap();

        assert!((fixed.estimate - dynamic.estimate).abs() < 1e-14);
    }

    #[test]
    fn test_every_index_processed_once() {
        let task = IntegrationTask::new(123_457).unwrap();
        for mode in [SchedulingMode::Static, SchedulingMode::Dynamic] {
            let report = run(&task, 6, mode, Some(1_000)).unwrap();
            let processed: u64 = report.worker_results.iter().map(|r| r.indices).sum();
            assert_eq!(processed, 123_457);
            assert_eq!(report.worker_results.len(), 6);

            let ids: Vec<usize> = report.worker_results.iter().map(|r| r.worker_id).collect();
            assert_eq!(ids, (0..6).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_chunk_size_does_not_move_the_result() {
        let task = IntegrationTask::new(300_000).unwrap();
        let coarse = run(&task, 3, SchedulingMode::Dynamic, Some(50_000)).unwrap();
        let fine = run(&task, 3, SchedulingMode::Dynamic, Some(7)).unwrap();

        assert!((coarse.estimate - fine.estimate).abs() < 1e-13);
    }

    #[test]
    fn test_workers_clamped_to_steps() {
        let task = IntegrationTask::new(3).unwrap();
        let report = run(&task, 8, SchedulingMode::Static, None).unwrap();

        assert_eq!(report.requested_workers, 8);
        assert_eq!(report.workers, 3);
        assert!(report.worker_results.iter().all(|r| r.indices == 1));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let task = IntegrationTask::new(10).unwrap();
        let err = run(&task, 0, SchedulingMode::Dynamic, None).unwrap_err();
        assert_eq!(crate::error::exit_code_for(&err), EXIT_INVALID_CONFIGURATION);
    }

    #[test]
    fn test_zero_chunk_rejected() {
        let task = IntegrationTask::new(10).unwrap();
        assert!(run(&task, 2, SchedulingMode::Dynamic, Some(0)).is_err());
    }

    #[test]
    fn test_panic_waits_for_remaining_workers() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);

        let failing = thread::spawn(|| -> WorkerResult { panic!("worker fault") });
        let slow = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            flag.store(true, Ordering::SeqCst);
            WorkerResult {
                worker_id: 1,
                partial_sum: 0.0,
                indices: 0,
                ranges: 0,
                elapsed: Duration::ZERO,
            }
        });

        let err = join_workers(vec![failing, slow]).unwrap_err();
        assert!(err.to_string().contains("Worker thread 0 panicked"));
        assert!(finished.load(Ordering::SeqCst));
        assert_eq!(crate::error::exit_code_for(&err), crate::error::EXIT_FAILURE);
    }

    #[test]
    fn test_coordinator_repeats() {
        let mut config = Config::default();
        config.integration.steps = 10_000;
        config.integration.workers = 2;
        config.runtime.repeat = 3;

        let coordinator = Coordinator::new(&config).unwrap();
        let mut seen = Vec::new();
        let (reports, summary) = coordinator.run(|i, _| seen.push(i)).unwrap();

        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(reports.len(), 3);
        assert_eq!(summary.runs(), 3);
        assert_eq!(coordinator.task().step_count(), 10_000);
    }

    #[test]
    fn test_coordinator_rejects_zero_steps() {
        let mut config = Config::default();
        config.integration.steps = 0;
        let err = Coordinator::new(&config).unwrap_err();
        assert_eq!(crate::error::exit_code_for(&err), EXIT_INVALID_CONFIGURATION);
    }
}
