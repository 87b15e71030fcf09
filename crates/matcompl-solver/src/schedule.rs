//! Threshold schedules.
//!
//! With a fixed τ the thresholding iteration converges to the minimiser of
//! τ‖X‖_* + ½‖P_Ω(X - M)‖²_F, whose residual on Ω is of order τ. To reach the
//! equality-constrained nuclear-norm minimiser the automatic schedule starts
//! from a large τ and shrinks it geometrically, warm-starting each stage from
//! the previous iterate, until it reaches a floor small enough that the
//! residual tolerance is attainable.

use matcompl_core::config::{
    Threshold, CONTINUATION_FACTOR, INITIAL_THRESHOLD_RATIO, THRESHOLD_FLOOR_MARGIN,
};

/// Current τ plus the rule for decreasing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSchedule {
    current: f64,
    floor: f64,
    factor: f64,
    stage: usize,
}

impl ThresholdSchedule {
    /// Constant threshold.
    pub const fn fixed(tau: f64) -> Self {
        Self {
            current: tau,
            floor: tau,
            factor: 1.0,
            stage: 0,
        }
    }

    /// Continuation schedule for data with the given norms.
    ///
    /// * `spectral_norm` - largest singular value of P_Ω(M)
    /// * `frobenius_norm` - ‖P_Ω(M)‖_F
    /// * `min_dim` - `min(m, n)`
    /// * `step_size` - δ; thresholds scale with it because the solver
    ///   thresholds `X + δR`
    /// * `tolerance` - relative residual the solver must reach
    pub fn continuation(
        spectral_norm: f64,
        frobenius_norm: f64,
        min_dim: usize,
        step_size: f64,
        tolerance: f64,
    ) -> Self {
        // The fixed point at τ has ‖R‖_F ≤ (τ/δ)·√min(m, n).
        let floor =
            step_size * THRESHOLD_FLOOR_MARGIN * tolerance * frobenius_norm / (min_dim as f64).sqrt();
        let start = (step_size * INITIAL_THRESHOLD_RATIO * spectral_norm).max(floor);
        Self {
            current: start,
            floor,
            factor: CONTINUATION_FACTOR,
            stage: 0,
        }
    }

    /// Builds the schedule selected by `threshold`.
    pub fn from_config(
        threshold: Threshold,
        spectral_norm: f64,
        frobenius_norm: f64,
        min_dim: usize,
        step_size: f64,
        tolerance: f64,
    ) -> Self {
        match threshold {
            Threshold::Fixed(tau) => Self::fixed(tau),
            Threshold::Auto => Self::continuation(
                spectral_norm,
                frobenius_norm,
                min_dim,
                step_size,
                tolerance,
            ),
        }
    }

    /// Threshold in effect.
    pub const fn current(&self) -> f64 {
        self.current
    }

    /// Lowest threshold the schedule will reach.
    pub const fn floor(&self) -> f64 {
        self.floor
    }

    /// Number of decreases so far.
    pub const fn stage(&self) -> usize {
        self.stage
    }

    /// Whether τ can no longer decrease.
    pub fn at_floor(&self) -> bool {
        self.current <= self.floor
    }

    /// Moves to the next, smaller threshold. Returns `false` at the floor.
    pub fn advance(&mut self) -> bool {
        if self.at_floor() {
            return false;
        }
        self.current = (self.current * self.factor).max(self.floor);
        self.stage += 1;
        true
    }
}
