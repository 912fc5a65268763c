//! Lock-free chunk claiming for dynamic scheduling

use super::WorkRange;
use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared cursor from which workers claim consecutive chunks
///
/// Each claim is a single `fetch_add` of `chunk_size`. Because the add is atomic every
/// claimer observes a distinct starting offset, so claimed ranges are disjoint and
/// together cover `[0, step_count)`. Nothing else depends on the order of claims, so the
/// add uses `Ordering::Relaxed`.
///
/// The counter sits on its own cache line; workers hammer it once per chunk.
///
/// # Example
///
/// ```
/// use pi_integral::partition::{ClaimCursor, WorkRange};
///
/// let cursor = ClaimCursor::new(10, 4);
/// assert_eq!(cursor.claim(), Some(WorkRange::new(0, 4)));
/// assert_eq!(cursor.claim(), Some(WorkRange::new(4, 8)));
/// assert_eq!(cursor.claim(), Some(WorkRange::new(8, 10)));
/// assert_eq!(cursor.claim(), None);
/// ```
#[derive(Debug)]
pub struct ClaimCursor {
    next: CachePadded<AtomicU64>,
    step_count: u64,
    chunk_size: u64,
}

impl ClaimCursor {
    /// Create a cursor at index 0
    ///
    /// A chunk size of zero is raised to one so claiming always advances.
    pub fn new(step_count: u64, chunk_size: u64) -> Self {
        Self {
            next: CachePadded::new(AtomicU64::new(0)),
            step_count,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Claim the next chunk
    ///
    /// Returns `None` once the cursor has reached `step_count`. The final chunk is
    /// truncated to the end of the domain.
    #[inline]
    pub fn claim(&self) -> Option<WorkRange> {
        let start = self.next.fetch_add(self.chunk_size, Ordering::Relaxed);
        if start >= self.step_count {
            return None;
        }
        let end = start.saturating_add(self.chunk_size).min(self.step_count);
        Some(WorkRange::new(start, end))
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Indices not yet handed out
    pub fn remaining(&self) -> u64 {
        self.step_count.saturating_sub(self.next.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_sequential_claims() {
        let cursor = ClaimCursor::new(7, 3);
        assert_eq!(cursor.claim(), Some(WorkRange::new(0, 3)));
        assert_eq!(cursor.remaining(), 4);
        assert_eq!(cursor.claim(), Some(WorkRange::new(3, 6)));
        assert_eq!(cursor.claim(), Some(WorkRange::new(6, 7)));
        assert_eq!(cursor.claim(), None);
        assert_eq!(cursor.claim(), None);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_zero_chunk_is_raised_to_one() {
        let cursor = ClaimCursor::new(2, 0);
        assert_eq!(cursor.chunk_size(), 1);
        assert_eq!(cursor.claim(), Some(WorkRange::new(0, 1)));
        assert_eq!(cursor.claim(), Some(WorkRange::new(1, 2)));
        assert_eq!(cursor.claim(), None);
    }

    #[test]
    fn test_chunk_larger_than_domain() {
        let cursor = ClaimCursor::new(5, 100);
        assert_eq!(cursor.claim(), Some(WorkRange::new(0, 5)));
        assert_eq!(cursor.claim(), None);
    }

    #[test]
    fn test_cover_for_small_configurations() {
        for step_count in 1..=40u64 {
            for chunk_size in 1..=step_count + 2 {
                let cursor = ClaimCursor::new(step_count, chunk_size);
                let mut covered = 0;
                while let Some(range) = cursor.claim() {
                    assert_eq!(range.start, covered);
                    assert!(!range.is_empty());
                    covered = range.end;
                }
                assert_eq!(covered, step_count);
            }
        }
    }

    #[test]
    fn test_concurrent_claims_are_disjoint_and_exhaustive() {
        let step_count = 1_000_003u64;
        let threads = 8;
        let cursor = Arc::new(ClaimCursor::new(step_count, 97));
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let cursor = Arc::clone(&cursor);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let mut claimed = Vec::new();
                    while let Some(range) = cursor.claim() {
                        claimed.push(range);
                    }
                    claimed
                })
            })
            .collect();

        let mut ranges: Vec<WorkRange> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ranges.sort();

        let mut expected_start = 0;
        for range in &ranges {
            assert_eq!(range.start, expected_start);
            expected_start = range.end;
        }
        assert_eq!(expected_start, step_count);
        assert_eq!(ranges.len() as u64, step_count.div_ceil(97));
    }
}
