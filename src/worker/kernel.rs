//! Integration task and kernel function

use crate::error::PiError;

/// Reference value used only to report the absolute error of an estimate
pub const REFERENCE_PI: f64 = std::f64::consts::PI;

/// Largest supported step count
///
/// Every index below 2^53 converts to `f64` exactly, which keeps sample points exact.
pub const MAX_STEPS: u64 = 1 << 53;

/// Immutable description of one integration run
///
/// Midpoint rule over `[0, 1]` with `step_count` equal subintervals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationTask {
    step_count: u64,
    step_width: f64,
}

impl IntegrationTask {
    /// Create a task
    ///
    /// # Errors
    ///
    /// Returns [`PiError::InvalidConfiguration`] if `step_count` is zero or above
    /// [`MAX_STEPS`].
    pub fn new(step_count: u64) -> Result<Self, PiError> {
        if step_count == 0 {
            return Err(PiError::InvalidConfiguration("steps must be at least 1".into()));
        }
        if step_count > MAX_STEPS {
            return Err(PiError::InvalidConfiguration(format!(
                "steps must be at most {}, got {}",
                MAX_STEPS, step_count
            )));
        }
        Ok(Self {
            step_count,
            step_width: 1.0 / step_count as f64,
        })
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn step_width(&self) -> f64 {
        self.step_width
    }

    /// Midpoint of subinterval `index`
    #[inline(always)]
    pub fn sample_point(&self, index: u64) -> f64 {
        (index as f64 + 0.5) * self.step_width
    }
}

/// `f(x) = 4 / (1 + x^2)`, whose integral over `[0, 1]` is pi
#[inline(always)]
pub fn integrand(x: f64) -> f64 {
    4.0 / (1.0 + x * x)
}
