//! Reduction of per-worker partial sums and cross-run timing summaries
//!
//! # Features
//!
//! - **Slot arena**: one pre-sized slot per worker id, written once after that worker joins
//! - **Stable reduction**: partials are combined through a fresh [`StableAccumulator`]
//! - **Repeat summary**: min / mean / max / stddev of elapsed time over repeated runs
//!
//! # Example
//!
//! ```
//! use pi_integral::stats::aggregator::PartialSums;
//!
//! let mut partials = PartialSums::new(2);
//! partials.record(1, 0.75).unwrap();
//! partials.record(0, 0.25).unwrap();
//!
//! let total = partials.reduce().unwrap();
//! assert_eq!(total.total(), 1.0);
//! ```

use crate::stats::StableAccumulator;
use crate::Result;
use std::time::Duration;

/// Fixed-size collection of partial sums indexed by worker id
///
/// Each slot has exactly one writer. The coordinator fills the slots only after the
/// corresponding worker thread has been joined, so no synchronization is involved.
#[derive(Debug, Clone)]
pub struct PartialSums {
    slots: Vec<Option<f64>>,
}

impl PartialSums {
    /// Create an arena with one empty slot per worker
    pub fn new(workers: usize) -> Self {
        Self {
            slots: vec![None; workers],
        }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the arena has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Store the partial sum published by `worker_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the id is out of range or the slot was already written.
    pub fn record(&mut self, worker_id: usize, partial: f64) -> Result<()> {
        let slots = self.slots.len();
        let slot = self
            .slots
            .get_mut(worker_id)
            .ok_or_else(|| {
                anyhow::anyhow!("Worker id {} out of range ({} slots)", worker_id, slots)
            })?;

        if slot.is_some() {
            anyhow::bail!("Partial sum for worker {} recorded twice", worker_id);
        }
        *slot = Some(partial);
        Ok(())
    }

    /// Combine all partials in worker-id order
    ///
    /// # Errors
    ///
    /// Returns an error if any worker never published its partial sum.
    pub fn reduce(&self) -> Result<StableAccumulator> {
        let mut acc = StableAccumulator::new();
        for (worker_id, slot) in self.slots.iter().enumerate() {
            let partial = slot.ok_or_else(|| {
                anyhow::anyhow!("Worker {} did not publish a partial sum", worker_id)
            })?;
            acc.add(partial);
        }
        Ok(acc)
    }
}

/// Timing and spread across repeated runs
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    elapsed: Vec<Duration>,
    estimates: Vec<f64>,
}

impl RunSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished run
    pub fn add_run(&mut self, elapsed: Duration, estimate: f64) {
        self.elapsed.push(elapsed);
        self.estimates.push(estimate);
    }

    /// Number of recorded runs
    pub fn runs(&self) -> usize {
        self.elapsed.len()
    }

    pub fn min_elapsed(&self) -> Duration {
        self.elapsed.iter().copied().min().unwrap_or_default()
    }

    pub fn max_elapsed(&self) -> Duration {
        self.elapsed.iter().copied().max().unwrap_or_default()
    }

    /// Mean elapsed time in seconds
    pub fn mean_secs(&self) -> f64 {
        if self.elapsed.is_empty() {
            return 0.0;
        }
        let acc: StableAccumulator = self.elapsed.iter().map(Duration::as_secs_f64).collect();
        acc.total() / self.elapsed.len() as f64
    }

    /// Population standard deviation of elapsed time in seconds
    pub fn stddev_secs(&self) -> f64 {
        if self.elapsed.len() < 2 {
            return 0.0;
        }
        let mean = self.mean_secs();
        let acc: StableAccumulator = self
            .elapsed
            .iter()
            .map(|d| {
                let diff = d.as_secs_f64() - mean;
                diff * diff
            })
            .collect();
        (acc.total() / self.elapsed.len() as f64).sqrt()
    }

    /// Largest difference between any two estimates
    pub fn estimate_spread(&self) -> f64 {
        let min = self.estimates.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.estimates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if self.estimates.is_empty() {
            0.0
        } else {
            max - min
        }
    }
}
