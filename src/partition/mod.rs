//! Work partitioning
//!
//! Splits the index space `[0, step_count)` across workers under one of two policies:
//!
//! - **Static**: every worker gets one contiguous range, computed up front. Sizes differ
//!   by at most one and worker `i` always gets range `i`, so the assignment is reproducible.
//! - **Dynamic**: workers repeatedly claim `chunk_size` indices from a shared
//!   [`ClaimCursor`] until it runs past the end. Claim order varies between runs but
//!   claims never overlap.
//!
//! Workers never see the policy directly. They pull ranges from a [`WorkSource`] handed
//! out by [`SchedulingPlan::sources`].
//!
//! # Example
//!
//! ```
//! use pi_integral::partition::{plan_static, WorkRange};
//!
//! let ranges = plan_static(10, 3);
//! assert_eq!(ranges, vec![
//!     WorkRange::new(0, 4),
//!     WorkRange::new(4, 7),
//!     WorkRange::new(7, 10),
//! ]);
//! ```

pub mod cursor;
pub mod source;

pub use cursor::ClaimCursor;
pub use source::{DynamicSource, StaticSource, WorkSource};

use crate::error::PiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

/// Dynamic-mode default targets this many chunks per worker
pub const CHUNKS_PER_WORKER: u64 = 128;

/// Scheduling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulingMode {
    /// Contiguous ranges assigned before the workers start
    Static,
    /// Chunks claimed from a shared atomic cursor
    #[default]
    Dynamic,
}

impl fmt::Display for SchedulingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulingMode::Static => write!(f, "static"),
            SchedulingMode::Dynamic => write!(f, "dynamic"),
        }
    }
}

impl FromStr for SchedulingMode {
    type Err = PiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "static" | "s" => Ok(SchedulingMode::Static),
            "dynamic" | "d" => Ok(SchedulingMode::Dynamic),
            _ => Err(PiError::InvalidMode(s.trim().to_string())),
        }
    }
}

/// Half-open index range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkRange {
    pub start: u64,
    pub end: u64,
}

impl WorkRange {
    /// Create a range; `end` must not precede `start`
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(end >= start, "range end {} precedes start {}", end, start);
        Self { start, end }
    }

    /// Number of indices in the range
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Iterate the indices of the range
    #[inline]
    pub fn indices(&self) -> Range<u64> {
        self.start..self.end
    }
}

impl fmt::Display for WorkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Number of workers that actually run
///
/// Clamped to `step_count` so no worker is left with an empty range.
pub fn effective_workers(step_count: u64, worker_count: usize) -> usize {
    if (worker_count as u64) > step_count {
        step_count as usize
    } else {
        worker_count
    }
}

/// Default dynamic chunk size: `max(1, step_count / (workers * 128))`
pub fn default_chunk_size(step_count: u64, worker_count: usize) -> u64 {
    let divisor = (worker_count.max(1) as u64).saturating_mul(CHUNKS_PER_WORKER);
    (step_count / divisor).max(1)
}

/// Even contiguous partition of `[0, step_count)`
///
/// Returns one range per effective worker. The first `step_count % workers` ranges hold
/// one extra index.
pub fn plan_static(step_count: u64, worker_count: usize) -> Vec<WorkRange> {
    let workers = effective_workers(step_count, worker_count);
    if workers == 0 {
        return Vec::new();
    }

    let base = step_count / workers as u64;
    let remainder = step_count % workers as u64;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0u64;
    for worker_id in 0..workers as u64 {
        let len = base + u64::from(worker_id < remainder);
        ranges.push(WorkRange::new(start, start + len));
        start += len;
    }

    debug_assert_eq!(start, step_count);
    ranges
}

/// Chunk size a dynamic run uses
///
/// `None` selects [`default_chunk_size`] for the effective worker count. The result is
/// capped at `step_count`; a single claim never needs to be larger.
pub fn resolve_chunk_size(step_count: u64, worker_count: usize, chunk_size: Option<u64>) -> u64 {
    let workers = effective_workers(step_count, worker_count);
    chunk_size
        .unwrap_or_else(|| default_chunk_size(step_count, workers))
        .min(step_count.max(1))
}

/// Shared claim cursor over `[0, step_count)`
pub fn plan_dynamic(step_count: u64, worker_count: usize, chunk_size: Option<u64>) -> ClaimCursor {
    ClaimCursor::new(step_count, resolve_chunk_size(step_count, worker_count, chunk_size))
}

/// Complete scheduling plan for one run
#[derive(Debug, Clone)]
pub enum SchedulingPlan {
    /// One pre-computed range per worker
    Static { ranges: Vec<WorkRange> },
    /// Fixed worker count sharing one cursor; the chunk size lives in the cursor
    Dynamic {
        cursor: Arc<ClaimCursor>,
        workers: usize,
    },
}

impl SchedulingPlan {
    /// Build the plan for a mode
    ///
    /// `chunk_size` is only consulted in dynamic mode, see [`resolve_chunk_size`].
    pub fn build(
        step_count: u64,
        worker_count: usize,
        mode: SchedulingMode,
        chunk_size: Option<u64>,
    ) -> Self {
        match mode {
            SchedulingMode::Static => SchedulingPlan::Static {
                ranges: plan_static(step_count, worker_count),
            },
            SchedulingMode::Dynamic => SchedulingPlan::Dynamic {
                cursor: Arc::new(plan_dynamic(step_count, worker_count, chunk_size)),
                workers: effective_workers(step_count, worker_count),
            },
        }
    }

    pub fn mode(&self) -> SchedulingMode {
        match self {
            SchedulingPlan::Static { .. } => SchedulingMode::Static,
            SchedulingPlan::Dynamic { .. } => SchedulingMode::Dynamic,
        }
    }

    /// Number of worker threads the plan calls for
    pub fn workers(&self) -> usize {
        match self {
            SchedulingPlan::Static { ranges } => ranges.len(),
            SchedulingPlan::Dynamic { workers, .. } => *workers,
        }
    }

    /// Chunk size in effect (dynamic mode only)
    pub fn chunk_size(&self) -> Option<u64> {
        match self {
            SchedulingPlan::Static { .. } => None,
            SchedulingPlan::Dynamic { cursor, .. } => Some(cursor.chunk_size()),
        }
    }

    /// One work source per worker, indexed by worker id
    pub fn sources(&self) -> Vec<Box<dyn WorkSource>> {
        match self {
            SchedulingPlan::Static { ranges } => ranges
                .iter()
                .map(|&range| Box::new(StaticSource::new(range)) as Box<dyn WorkSource>)
                .collect(),
            SchedulingPlan::Dynamic { cursor, workers } => (0..*workers)
                .map(|_| Box::new(DynamicSource::new(Arc::clone(cursor))) as Box<dyn WorkSource>)
                .collect(),
        }
    }
}
