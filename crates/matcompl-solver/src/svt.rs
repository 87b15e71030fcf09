//! Iterative singular value thresholding.
//!
//! Solves
//!
//! ```text
//! minimize ‖X‖_*  subject to  X[i, j] = M[i, j]  for (i, j) ∈ Ω
//! ```
//!
//! by proximal gradient iterations on the nuclear-norm regularised least
//! squares problem, driving the regulariser to zero through a threshold
//! schedule:
//!
//! 1. `Y₀ = X₀ = P_Ω(M)`
//! 2. `X_t = D_τ(Y_{t-1})` (SVD, soft-threshold the singular values, rebuild)
//! 3. `R_t = P_Ω(M) - P_Ω(X_t)`
//! 4. `Y_t = X_t + δ R_t`
//! 5. stop when `‖R_t‖_F / ‖P_Ω(M)‖_F < tolerance`
//!
//! With [`Threshold::Auto`](matcompl_core::Threshold::Auto) τ decreases
//! whenever successive iterates stop moving (see [`crate::schedule`]).
//!
//! # Example
//!
//! ```rust
//! use matcompl_core::prelude::*;
//! use matcompl_solver::{Completer, SvtSolver};
//!
//! let matrix = Matrix::from_flat(3, 3, vec![
//!     1.0, 2.0, 3.0,
//!     2.0, 4.0, 0.0,
//!     3.0, 0.0, 9.0,
//! ]).unwrap();
//! let observations = ObservationSet::from_nonzero(&matrix);
//!
//! let solver = SvtSolver::new(CompletionConfig::new().with_max_iterations(10_000));
//! let result = solver.complete(&matrix, &observations).unwrap();
//! assert_eq!(result.matrix.shape(), (3, 3));
//! ```

use crate::schedule::ThresholdSchedule;
use crate::shrinkage::{numerical_rank, nuclear_norm, shrink, spectral_norm};
use matcompl_core::{
    BudgetExhausted, CompletionConfig, CompletionError, CompletionResult, Matrix,
    ObservationSet, Result, TerminationReason,
};
use nalgebra::DMatrix;
use std::fmt::Debug;
use std::time::Instant;

/// Iterations between progress log records.
const PROGRESS_INTERVAL: usize = 100;

/// Interface for matrix completion algorithms.
pub trait Completer: Debug {
    /// Human-readable algorithm name, used in log records.
    fn name(&self) -> &str;

    /// Completes `matrix` so that it agrees with it on `observations`.
    ///
    /// # Errors
    ///
    /// - `Shape` if `observations` refers to a different shape
    /// - `EmptyObservations` if `observations` is empty
    /// - `NonFiniteValue` if an observed value is NaN or infinite
    /// - `InvalidConfiguration` for bad solver settings
    /// - `NonConvergence` if the iteration or time budget runs out
    /// - `Numerical` if the SVD fails
    fn complete(&self, matrix: &Matrix, observations: &ObservationSet)
        -> Result<CompletionResult>;
}

/// Singular value thresholding solver.
#[derive(Debug, Clone, Default)]
pub struct SvtSolver {
    config: CompletionConfig,
}

impl SvtSolver {
    /// Creates a solver with the given configuration.
    pub const fn new(config: CompletionConfig) -> Self {
        Self { config }
    }

    /// Returns the solver configuration.
    pub const fn config(&self) -> &CompletionConfig {
        &self.config
    }

    fn check_inputs(&self, matrix: &Matrix, observations: &ObservationSet) -> Result<()> {
        self.config.validate()?;
        let (rows, cols) = matrix.shape();
        observations.check_shape(rows, cols)?;
        if observations.is_empty() {
            return Err(CompletionError::EmptyObservations);
        }
        // Values at unobserved positions are never read.
        for (row, col) in observations {
            if !matrix.get(row, col)?.is_finite() {
                return Err(CompletionError::NonFiniteValue { row, col });
            }
        }
        Ok(())
    }

    fn iterate(
        &self,
        target: &DMatrix<f64>,
        target_norm: f64,
        observations: &ObservationSet,
        start: Instant,
    ) -> Result<CompletionResult> {
        let (rows, cols) = target.shape();
        let tolerance = self.config.tolerance;
        let delta = self.config.step_size.value();
        let budget = self.config.iteration_budget(rows, cols);

        let mut schedule = ThresholdSchedule::from_config(
            self.config.threshold,
            spectral_norm(target)?,
            target_norm,
            rows.min(cols),
            delta,
            tolerance,
        );
        log::debug!(
            "{}: {rows}x{cols}, |Ω| = {}, τ₀ = {:.3e}, τ floor = {:.3e}, δ = {delta}, budget = {budget}",
            self.name(),
            observations.len(),
            schedule.current(),
            schedule.floor(),
        );

        let mut x = target.clone();
        let mut y = target.clone();
        let mut residual = f64::INFINITY;

        for iteration in 1..=budget {
            let tau = schedule.current();
            let shrunk = shrink(y, tau)?;
            let x_next = shrunk.matrix;

            // Y ← X + δ·R, where R is nonzero only on Ω.
            y = x_next.clone();
            let mut residual_sq = 0.0;
            for (i, j) in observations {
                let r = target[(i, j)] - x_next[(i, j)];
                residual_sq += r * r;
                y[(i, j)] += delta * r;
            }
            residual = residual_sq.sqrt() / target_norm;
            if !residual.is_finite() {
                return Err(CompletionError::numerical(format!(
                    "residual became non-finite at iteration {iteration}"
                )));
            }

            // Relative to the data norm, like the residual.
            let change = (&x_next - &x).norm() / target_norm;
            x = x_next;

            if iteration % PROGRESS_INTERVAL == 0 {
                log::debug!(
                    "iteration {iteration}: residual = {residual:.3e}, change = {change:.3e}, \
                     τ = {tau:.3e}, rank = {}",
                    shrunk.rank
                );
            }

            if residual < tolerance {
                log::info!(
                    "{} converged after {iteration} iterations: residual = {residual:.3e}, rank = {}",
                    self.name(),
                    shrunk.rank
                );
                let matrix = self.finish(x, target, observations)?;
                return Ok(CompletionResult::new(matrix, TerminationReason::Converged)
                    .with_iterations(iteration)
                    .with_relative_residual(residual)
                    .with_threshold(tau)
                    .with_spectrum(shrunk.rank, shrunk.nuclear_norm)
                    .with_duration(start.elapsed()));
            }

            if let Some(limit) = self.config.max_time {
                if start.elapsed() >= limit {
                    log::warn!(
                        "{} stopped at iteration {iteration} after {limit:?}: residual = {residual:.3e}",
                        self.name()
                    );
                    return Err(CompletionError::non_convergence(
                        iteration,
                        residual,
                        tolerance,
                        BudgetExhausted::Time(limit),
                    ));
                }
            }

            if change < tolerance && schedule.advance() {
                log::debug!(
                    "iteration {iteration}: τ lowered to {:.3e} (stage {})",
                    schedule.current(),
                    schedule.stage()
                );
            }
        }

        log::warn!(
            "{} exhausted {budget} iterations: residual = {residual:.3e}, tolerance = {tolerance:e}",
            self.name()
        );
        Err(CompletionError::non_convergence(
            budget,
            residual,
            tolerance,
            BudgetExhausted::Iterations,
        ))
    }

    /// Converts the last iterate, optionally pinning the observed values.
    fn finish(
        &self,
        mut x: DMatrix<f64>,
        target: &DMatrix<f64>,
        observations: &ObservationSet,
    ) -> Result<Matrix> {
        if self.config.enforce_observed {
            for (i, j) in observations {
                x[(i, j)] = target[(i, j)];
            }
        }
        Matrix::from_dmatrix(&x)
    }
}

impl Completer for SvtSolver {
    fn name(&self) -> &str {
        "Singular Value Thresholding"
    }

    fn complete(
        &self,
        matrix: &Matrix,
        observations: &ObservationSet,
    ) -> Result<CompletionResult> {
        let start = Instant::now();
        self.check_inputs(matrix, observations)?;

        // Only X agreeing with M on every cell is feasible.
        if observations.is_complete() {
            let dense = matrix.to_dmatrix();
            return Ok(
                CompletionResult::new(matrix.clone(), TerminationReason::FullyObserved)
                    .with_spectrum(numerical_rank(&dense)?, nuclear_norm(&dense)?)
                    .with_duration(start.elapsed()),
            );
        }

        let (rows, cols) = matrix.shape();
        let mut target = DMatrix::zeros(rows, cols);
        for (i, j) in observations {
            target[(i, j)] = matrix.get(i, j)?;
        }

        let target_norm = target.norm();
        if target_norm == 0.0 {
            log::debug!("{}: every observed value is zero", self.name());
            return Ok(CompletionResult::new(
                Matrix::zeros(rows, cols)?,
                TerminationReason::ZeroObservations,
            )
            .with_duration(start.elapsed()));
        }

        self.iterate(&target, target_norm, observations, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use matcompl_core::{StepSize, Threshold};

    fn rank_one_3x3() -> Matrix {
        Matrix::from_flat(3, 3, vec![1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 3.0, 6.0, 9.0]).unwrap()
    }

    #[test]
    fn test_small_matrix_with_samples() {
        let matrix = rank_one_3x3();
        let observations =
            ObservationSet::new(3, 3, vec![(0, 0), (1, 1), (2, 2), (0, 2), (2, 0), (1, 0)])
                .unwrap();
        let solver = SvtSolver::new(
            CompletionConfig::new()
                .with_tolerance(1e-6)
                .with_max_iterations(20_000),
        );

        let result = solver.complete(&matrix, &observations).unwrap();
        assert_eq!(result.termination_reason, TerminationReason::Converged);
        for (i, j) in &observations {
            assert_eq!(result.matrix.get(i, j).unwrap(), matrix.get(i, j).unwrap());
        }
        assert!(result.relative_residual < 1e-6);
    }

    #[test]
    fn test_observations_without_enforcement_stay_within_tolerance() {
        let matrix = rank_one_3x3();
        let observations =
            ObservationSet::new(3, 3, vec![(0, 0), (0, 1), (1, 0), (1, 2), (2, 1), (2, 2)])
                .unwrap();
        let solver = SvtSolver::new(
            CompletionConfig::new()
                .with_tolerance(1e-6)
                .with_max_iterations(20_000)
                .with_enforce_observed(false),
        );

        let result = solver.complete(&matrix, &observations).unwrap();
        for (i, j) in &observations {
            assert_relative_eq!(
                result.matrix.get(i, j).unwrap(),
                matrix.get(i, j).unwrap(),
                epsilon = 1e-4
            );
        }
    }

    #[test]
    fn test_fully_observed_returns_input() {
        let matrix =
            Matrix::from_flat(2, 3, vec![1.0, -2.0, 0.5, 4.0, 0.25, -6.0]).unwrap();
        let observations = ObservationSet::full(2, 3);
        let result = SvtSolver::default().complete(&matrix, &observations).unwrap();
        assert_eq!(result.termination_reason, TerminationReason::FullyObserved);
        assert_eq!(result.matrix, matrix);
        assert_eq!(result.rank, 2);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_zero_observations_give_zero_matrix() {
        let matrix = Matrix::zeros(3, 4).unwrap();
        let observations = ObservationSet::new(3, 4, vec![(0, 0), (2, 3)]).unwrap();
        let result = SvtSolver::default().complete(&matrix, &observations).unwrap();
        assert_eq!(result.termination_reason, TerminationReason::ZeroObservations);
        assert!(result.matrix.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_empty_observations_rejected() {
        let matrix = rank_one_3x3();
        let observations = ObservationSet::new(3, 3, Vec::new()).unwrap();
        let err = SvtSolver::default().complete(&matrix, &observations).unwrap_err();
        assert!(matches!(err, CompletionError::EmptyObservations));
    }

    #[test]
    fn test_mismatched_observation_shape_rejected() {
        let matrix = rank_one_3x3();
        let observations = ObservationSet::new(2, 2, vec![(0, 0)]).unwrap();
        let err = SvtSolver::default().complete(&matrix, &observations).unwrap_err();
        assert!(matches!(err, CompletionError::Shape { .. }));
    }

    #[test]
    fn test_non_finite_observed_value_rejected() {
        let mut matrix = rank_one_3x3();
        matrix.set(1, 1, f64::INFINITY).unwrap();
        let observations = ObservationSet::new(3, 3, vec![(0, 0), (1, 1)]).unwrap();
        let err = SvtSolver::default().complete(&matrix, &observations).unwrap_err();
        assert!(matches!(err, CompletionError::NonFiniteValue { row: 1, col: 1 }));
    }

    #[test]
    fn test_nan_at_unobserved_position_is_ignored() {
        let mut matrix = rank_one_3x3();
        matrix.set(1, 2, f64::NAN).unwrap();
        let observations =
            ObservationSet::new(3, 3, vec![(0, 0), (0, 1), (0, 2), (1, 0), (2, 0)]).unwrap();
        let solver = SvtSolver::new(CompletionConfig::new().with_max_iterations(20_000));
        let result = solver.complete(&matrix, &observations).unwrap();
        assert!(result.matrix.first_non_finite().is_none());
    }

    #[test]
    fn test_iteration_budget_exhaustion() {
        let matrix = rank_one_3x3();
        let observations = ObservationSet::from_nonzero(
            &Matrix::from_flat(3, 3, vec![1.0, 0.0, 3.0, 2.0, 4.0, 0.0, 3.0, 0.0, 9.0]).unwrap(),
        );
        let solver = SvtSolver::new(
            CompletionConfig::new()
                .with_tolerance(1e-12)
                .with_max_iterations(3),
        );
        let err = solver.complete(&matrix, &observations).unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(
            err,
            CompletionError::NonConvergence {
                iterations: 3,
                reason: BudgetExhausted::Iterations,
                ..
            }
        ));
    }

    #[test]
    fn test_oversized_fixed_threshold_cannot_converge() {
        let matrix = rank_one_3x3();
        let observations = ObservationSet::from_nonzero(&matrix);
        let observations =
            ObservationSet::new(3, 3, observations.iter().filter(|&(i, j)| i != j)).unwrap();
        // τ far above every singular value shrinks each iterate to zero.
        let solver = SvtSolver::new(
            CompletionConfig::new()
                .with_fixed_threshold(1e6)
                .with_max_iterations(50),
        );
        let err = solver.complete(&matrix, &observations).unwrap_err();
        assert!(matches!(err, CompletionError::NonConvergence { .. }));
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let solver = SvtSolver::new(
            CompletionConfig::new().with_step_size(StepSize::Fixed(3.0)),
        );
        let matrix = rank_one_3x3();
        let err = solver
            .complete(&matrix, &ObservationSet::from_nonzero(&matrix))
            .unwrap_err();
        assert!(matches!(err, CompletionError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_fixed_zero_threshold_keeps_observed_and_zero_fill() {
        let matrix = rank_one_3x3();
        let observations = ObservationSet::new(3, 3, vec![(0, 0), (1, 1)]).unwrap();
        let solver = SvtSolver::new(CompletionConfig::new().with_threshold(Threshold::Fixed(0.0)));
        let result = solver.complete(&matrix, &observations).unwrap();
        assert_eq!(result.iterations, 1);
        assert_relative_eq!(result.matrix.get(0, 1).unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(result.matrix.get(1, 1).unwrap(), 4.0);
    }

    #[test]
    fn test_completer_trait_object() {
        let solver: Box<dyn Completer> = Box::new(SvtSolver::default());
        assert_eq!(solver.name(), "Singular Value Thresholding");

        let matrix = rank_one_3x3();
        let result = solver
            .complete(&matrix, &ObservationSet::from_nonzero(&matrix))
            .unwrap();
        assert_eq!(result.termination_reason, TerminationReason::FullyObserved);
    }

    #[test]
    fn test_tiny_magnitudes_still_reduce_rank() {
        let scale = 2f64.powi(-40);
        let unit = rank_one_3x3();
        let tiny = Matrix::from_flat(3, 3, unit.as_slice().iter().map(|v| v * scale).collect())
            .unwrap();
        let observations =
            ObservationSet::new(3, 3, vec![(0, 0), (1, 1), (2, 2), (0, 2), (2, 0), (1, 0)])
                .unwrap();
        let solver = SvtSolver::new(
            CompletionConfig::new()
                .with_tolerance(1e-6)
                .with_max_iterations(20_000),
        );

        let unit_result = solver.complete(&unit, &observations).unwrap();
        let tiny_result = solver.complete(&tiny, &observations).unwrap();

        assert_eq!(tiny_result.rank, unit_result.rank);
        assert!(tiny_result.relative_residual < 1e-6);
        let missing = (0, 1);
        assert_relative_eq!(
            tiny_result.matrix.get(missing.0, missing.1).unwrap() / scale,
            unit_result.matrix.get(missing.0, missing.1).unwrap(),
            max_relative = 1e-3
        );
    }
}
