//! Numerically stable accumulation
//!
//! Every worker sums hundreds of millions of kernel samples, and the coordinator sums the
//! per-worker partials. Plain `f64` addition loses low-order bits on every step, so the
//! rounding error grows with the number of terms and changes in thread count or chunk size
//! would show up in the final digits. [`StableAccumulator`] tracks the lost bits explicitly.
//!
//! # Example
//!
//! ```
//! use pi_integral::stats::StableAccumulator;
//!
//! let mut acc = StableAccumulator::new();
//! acc.add(1.0);
//! acc.add(1e100);
//! acc.add(1.0);
//! acc.add(-1e100);
//!
//! assert_eq!(acc.total(), 2.0);
//! assert_eq!(acc.count(), 4);
//! ```

pub mod aggregator;

/// Compensated (Neumaier) summation
///
/// Holds the running sum plus a compensation term carrying the rounding error of every
/// addition so far. Unlike classic Kahan summation the compensation is also correct when
/// the incoming value is larger in magnitude than the running sum.
///
/// # Thread Safety
///
/// An accumulator is plain data owned by a single worker. Partial results from several
/// workers are combined with [`merge`](Self::merge) after the workers have finished.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StableAccumulator {
    sum: f64,
    compensation: f64,
    count: u64,
}

impl StableAccumulator {
    /// Create a zeroed accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one value
    #[inline]
    pub fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
        self.count += 1;
    }

    /// Best available estimate of the sum of all added values
    #[inline]
    pub fn total(&self) -> f64 {
        self.sum + self.compensation
    }

    /// Number of values added (merged accumulators contribute their own counts)
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Fold another accumulator into this one
    ///
    /// The other accumulator's running sum goes through the compensated path and its
    /// compensation term is carried over as-is.
    pub fn merge(&mut self, other: &StableAccumulator) {
        let count = self.count;
        self.add(other.sum);
        self.compensation += other.compensation;
        self.count = count + other.count;
    }
}

impl Extend<f64> for StableAccumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl FromIterator<f64> for StableAccumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_sum(values: &[f64]) -> f64 {
        let mut sum = 0.0;
        for v in values {
            sum += v;
        }
        sum
    }

    #[test]
    fn test_new_is_zero() {
        let acc = StableAccumulator::new();
        assert_eq!(acc.total(), 0.0);
        assert_eq!(acc.count(), 0);
    }

    #[test]
    fn test_cancellation() {
        let values = [1.0, 1e100, 1.0, -1e100];
        let acc: StableAccumulator = values.iter().copied().collect();

        assert_eq!(acc.total(), 2.0);
        assert_eq!(naive_sum(&values), 0.0);
    }

    #[test]
    fn test_small_terms_are_not_lost() {
        // Each 1e-16 is below half an ulp of 1.0, so naive addition drops all of them
        let mut values = vec![1.0];
        values.extend(std::iter::repeat(1e-16).take(1_000_000));

        let acc: StableAccumulator = values.iter().copied().collect();
        let exact = 1.0 + 1e-10;

        assert_eq!(naive_sum(&values), 1.0);
        assert!((acc.total() - exact).abs() < 1e-15);
        assert!((acc.total() - exact).abs() < (naive_sum(&values) - exact).abs());
    }

    #[test]
    fn test_order_insensitive() {
        let n = 100_000u64;
        let values: Vec<f64> = (0..n)
            .map(|i| {
                let x = (i as f64 + 0.5) / n as f64;
                4.0 / (1.0 + x * x)
            })
            .collect();

        let forward: StableAccumulator = values.iter().copied().collect();
        let backward: StableAccumulator = values.iter().rev().copied().collect();
        let interleaved: StableAccumulator = values
            .iter()
            .step_by(2)
            .chain(values.iter().skip(1).step_by(2))
            .copied()
            .collect();

        let reference = forward.total();
        assert!((backward.total() - reference).abs() <= 1e-14 * reference.abs());
        assert!((interleaved.total() - reference).abs() <= 1e-14 * reference.abs());
    }

    #[test]
    fn test_beats_naive_on_many_terms() {
        // 0.1 is inexact in binary; ten million of them drift visibly under naive summation
        let n = 10_000_000usize;
        let exact = 1_000_000.0;

        let mut acc = StableAccumulator::new();
        let mut naive = 0.0f64;
        for _ in 0..n {
            acc.add(0.1);
            naive += 0.1;
        }

        let stable_err = (acc.total() - exact).abs();
        let naive_err = (naive - exact).abs();
        assert!(stable_err < 1e-6);
        assert!(stable_err < naive_err);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let values: Vec<f64> = (1..=10_000).map(|i| 1.0 / i as f64).collect();
        let single: StableAccumulator = values.iter().copied().collect();

        let (left, right) = values.split_at(3_333);
        let mut merged: StableAccumulator = left.iter().copied().collect();
        let tail: StableAccumulator = right.iter().copied().collect();
        merged.merge(&tail);

        assert_eq!(merged.count(), single.count());
        assert!((merged.total() - single.total()).abs() < 1e-13);
    }

    #[test]
    fn test_merge_empty() {
        let mut acc: StableAccumulator = [2.5, 0.5].into_iter().collect();
        acc.merge(&StableAccumulator::new());
        assert_eq!(acc.total(), 3.0);
        assert_eq!(acc.count(), 2);
    }
}
