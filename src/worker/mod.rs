//! Worker implementation
//!
//! A [`Worker`] is the unit of execution that runs on one OS thread. It pulls index ranges
//! from its [`WorkSource`], evaluates the integrand at every midpoint, and adds each sample
//! to a private [`StableAccumulator`]. When the source is exhausted it hands back a
//! [`WorkerResult`] carrying its partial sum.
//!
//! # Thread Safety
//!
//! Workers share nothing mutable with each other. The only cross-worker state is the
//! dynamic claim cursor behind [`DynamicSource`](crate::partition::DynamicSource), which is
//! touched exclusively through an atomic add.
//!
//! # Example
//!
//! ```
//! use pi_integral::partition::{StaticSource, WorkRange};
//! use pi_integral::worker::{IntegrationTask, Worker};
//!
//! let task = IntegrationTask::new(1_000).unwrap();
//! let worker = Worker::new(0, task, Box::new(StaticSource::new(WorkRange::new(0, 1_000))));
//! let result = worker.run();
//!
//! let estimate = result.partial_sum * task.step_width();
//! assert!((estimate - std::f64::consts::PI).abs() < 1e-6);
//! ```

pub mod kernel;

pub use kernel::{integrand, IntegrationTask, REFERENCE_PI};

use crate::partition::WorkSource;
use crate::stats::StableAccumulator;
use std::time::{Duration, Instant};
use tracing::debug;

/// Integration worker
pub struct Worker {
    id: usize,
    task: IntegrationTask,
    source: Box<dyn WorkSource>,
    acc: StableAccumulator,
    ranges: u64,
}

/// What a worker publishes when it finishes
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerResult {
    pub worker_id: usize,
    /// Unscaled sum of integrand samples over every index this worker processed
    pub partial_sum: f64,
    /// Number of indices processed
    pub indices: u64,
    /// Number of ranges obtained (1 for static, number of claims for dynamic)
    pub ranges: u64,
    /// Time spent inside `run`
    pub elapsed: Duration,
}

impl Worker {
    /// Create a worker
    ///
    /// # Arguments
    ///
    /// * `id` - Worker id; also the slot its partial sum lands in
    /// * `task` - Step count and width shared by all workers
    /// * `source` - Where this worker gets its ranges
    pub fn new(id: usize, task: IntegrationTask, source: Box<dyn WorkSource>) -> Self {
        Self {
            id,
            task,
            source,
            acc: StableAccumulator::new(),
            ranges: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Process ranges until the source runs dry
    pub fn run(mut self) -> WorkerResult {
        let start = Instant::now();
        debug!(worker = self.id, "worker started");

        while let Some(range) = self.source.next_range() {
            self.ranges += 1;
            for index in range.indices() {
                self.acc.add(integrand(self.task.sample_point(index)));
            }
        }

        let result = WorkerResult {
            worker_id: self.id,
            partial_sum: self.acc.total(),
            indices: self.acc.count(),
            ranges: self.ranges,
            elapsed: start.elapsed(),
        };

        debug!(
            worker = result.worker_id,
            indices = result.indices,
            ranges = result.ranges,
            partial_sum = result.partial_sum,
            "worker finished"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{ClaimCursor, DynamicSource, StaticSource, WorkRange};
    use std::sync::Arc;

    #[test]
    fn test_static_worker_processes_its_range() {
        let task = IntegrationTask::new(100).unwrap();
        let worker = Worker::new(3, task, Box::new(StaticSource::new(WorkRange::new(10, 35))));
        assert_eq!(worker.id(), 3);

        let result = worker.run();
        assert_eq!(result.worker_id, 3);
        assert_eq!(result.indices, 25);
        assert_eq!(result.ranges, 1);
    }

    #[test]
    fn test_partial_matches_direct_sum() {
        let task = IntegrationTask::new(64).unwrap();
        let range = WorkRange::new(16, 48);
        let expected: f64 = range
            .indices()
            .map(|i| integrand(task.sample_point(i)))
            .sum();

        let result = Worker::new(0, task, Box::new(StaticSource::new(range))).run();
        assert!((result.partial_sum - expected).abs() < 1e-12);
    }

    #[test]
    fn test_dynamic_worker_drains_cursor() {
        let task = IntegrationTask::new(1_000).unwrap();
        let cursor = Arc::new(ClaimCursor::new(1_000, 64));
        let result = Worker::new(0, task, Box::new(DynamicSource::new(Arc::clone(&cursor)))).run();

        assert_eq!(result.indices, 1_000);
        assert_eq!(result.ranges, 16);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_full_range_approximates_pi() {
        let task = IntegrationTask::new(100_000).unwrap();
        let source = Box::new(StaticSource::new(WorkRange::new(0, 100_000)));
        let result = Worker::new(0, task, source).run();
        let estimate = result.partial_sum * task.step_width();
        assert!((estimate - REFERENCE_PI).abs() < 1e-9);
    }

    #[test]
    fn test_exhausted_source_yields_zero() {
        let task = IntegrationTask::new(10).unwrap();
        let cursor = Arc::new(ClaimCursor::new(10, 10));
        cursor.claim();

        let result = Worker::new(1, task, Box::new(DynamicSource::new(cursor))).run();
        assert_eq!(result.indices, 0);
        assert_eq!(result.ranges, 0);
        assert_eq!(result.partial_sum, 0.0);
    }
}
