//! Per-worker view of a scheduling plan

use super::{ClaimCursor, WorkRange};
use std::sync::Arc;

/// Supplies index ranges to a single worker
///
/// A worker calls [`next_range`](WorkSource::next_range) until it returns `None`. Sources
/// must be `Send` so they can be moved into the worker's thread.
pub trait WorkSource: Send {
    /// Next range to integrate, or `None` when this worker's share is exhausted
    fn next_range(&mut self) -> Option<WorkRange>;
}

/// Static assignment: yields its one range, then nothing
#[derive(Debug)]
pub struct StaticSource {
    range: Option<WorkRange>,
}

impl StaticSource {
    pub fn new(range: WorkRange) -> Self {
        Self { range: Some(range) }
    }
}

impl WorkSource for StaticSource {
    fn next_range(&mut self) -> Option<WorkRange> {
        self.range.take()
    }
}

/// Dynamic assignment: claims chunks from the shared cursor
#[derive(Debug)]
pub struct DynamicSource {
    cursor: Arc<ClaimCursor>,
}

impl DynamicSource {
    pub fn new(cursor: Arc<ClaimCursor>) -> Self {
        Self { cursor }
    }
}

impl WorkSource for DynamicSource {
    #[inline]
    fn next_range(&mut self) -> Option<WorkRange> {
        self.cursor.claim()
    }
}
