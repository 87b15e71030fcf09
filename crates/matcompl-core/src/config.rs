//! Solver configuration.
//!
//! [`CompletionConfig`] exposes every tunable knob of the thresholding solver
//! together with its recommended default. Defaults are public constants so
//! callers can see, and reason about, what runs when they change nothing.
//!
//! # Example
//!
//! ```rust
//! use matcompl_core::config::{CompletionConfig, StepSize, Threshold};
//! use std::time::Duration;
//!
//! let config = CompletionConfig::new()
//!     .with_tolerance(1e-6)
//!     .with_max_iterations(20_000)
//!     .with_max_time(Duration::from_secs(30))
//!     .with_threshold(Threshold::Auto)
//!     .with_step_size(StepSize::Fixed(1.5));
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{CompletionError, Result};
use std::time::Duration;

/// Default relative residual tolerance on the observed entries.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Step size δ used by [`StepSize::Auto`].
pub const DEFAULT_STEP_SIZE: f64 = 1.0;

/// Factor applied to the threshold at each continuation step.
pub const CONTINUATION_FACTOR: f64 = 0.25;

/// Fraction of the spectral norm of P_Ω(M) used as the first threshold.
pub const INITIAL_THRESHOLD_RATIO: f64 = 0.25;

/// Safety margin between the threshold floor and the residual tolerance.
pub const THRESHOLD_FLOOR_MARGIN: f64 = 0.1;

/// Lower bound of the automatic iteration budget.
pub const MIN_AUTO_ITERATIONS: usize = 500;

/// Iterations granted per unit of `min(m, n)` by the automatic budget.
pub const ITERATIONS_PER_DIMENSION: usize = 100;

/// How the singular value threshold τ is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Threshold {
    /// Continuation: start at [`INITIAL_THRESHOLD_RATIO`] of the spectral norm
    /// of the observed data and shrink by [`CONTINUATION_FACTOR`] each time
    /// the iterates settle, down to a floor derived from the tolerance.
    #[default]
    Auto,
    /// Constant τ. A value too large for the tolerance cannot converge.
    Fixed(f64),
}

/// How the step size δ is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepSize {
    /// δ = [`DEFAULT_STEP_SIZE`].
    #[default]
    Auto,
    /// Constant δ in `(0, 2)`.
    Fixed(f64),
}

impl StepSize {
    /// Resolves the step size to a number.
    pub const fn value(self) -> f64 {
        match self {
            Self::Auto => DEFAULT_STEP_SIZE,
            Self::Fixed(delta) => delta,
        }
    }
}

/// Configuration for the completion engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompletionConfig {
    /// Stop once ||P_Ω(M - X)||_F / ||P_Ω(M)||_F falls below this value
    pub tolerance: f64,

    /// Iteration budget; `None` scales it with the matrix size
    pub max_iterations: Option<usize>,

    /// Optional wall-clock budget
    pub max_time: Option<Duration>,

    /// Singular value threshold τ
    pub threshold: Threshold,

    /// Step size δ applied to the residual
    pub step_size: StepSize,

    /// Copy observed values into the result so they match exactly
    pub enforce_observed: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: None,
            max_time: None,
            threshold: Threshold::Auto,
            step_size: StepSize::Auto,
            enforce_observed: true,
        }
    }
}

impl CompletionConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = Some(max_time);
        self
    }

    /// Sets the threshold rule.
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets a constant threshold τ.
    pub fn with_fixed_threshold(mut self, tau: f64) -> Self {
        self.threshold = Threshold::Fixed(tau);
        self
    }

    /// Sets the step size rule.
    pub fn with_step_size(mut self, step_size: StepSize) -> Self {
        self.step_size = step_size;
        self
    }

    /// Chooses whether observed entries are copied verbatim into the result.
    pub fn with_enforce_observed(mut self, enforce: bool) -> Self {
        self.enforce_observed = enforce;
        self
    }

    /// Iteration budget for an `rows × cols` problem.
    pub fn iteration_budget(&self, rows: usize, cols: usize) -> usize {
        self.max_iterations.unwrap_or_else(|| {
            MIN_AUTO_ITERATIONS.max(ITERATIONS_PER_DIMENSION * rows.min(cols))
        })
    }

    /// Checks every knob.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(CompletionError::invalid_configuration(
                "tolerance",
                format!("must be positive and finite, got {}", self.tolerance),
            ));
        }
        if self.max_iterations == Some(0) {
            return Err(CompletionError::invalid_configuration(
                "max_iterations",
                "must be at least 1",
            ));
        }
        if let Threshold::Fixed(tau) = self.threshold {
            if !(tau.is_finite() && tau >= 0.0) {
                return Err(CompletionError::invalid_configuration(
                    "threshold",
                    format!("must be non-negative and finite, got {tau}"),
                ));
            }
        }
        let delta = self.step_size.value();
        if !(delta > 0.0 && delta < 2.0) {
            return Err(CompletionError::invalid_configuration(
                "step_size",
                format!("must lie in (0, 2), got {delta}"),
            ));
        }
        Ok(())
    }
}
