//! Outcome of a successful completion run.

use crate::matrix::Matrix;
use std::time::Duration;

/// Why the solver stopped successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Relative residual on the observed entries fell below the tolerance
    Converged,
    /// Every entry was observed, so the input is returned unchanged
    FullyObserved,
    /// The observed entries are all zero; the zero matrix is the minimiser
    ZeroObservations,
}

/// Completed matrix plus solver diagnostics.
#[derive(Debug, Clone)]
pub struct CompletionResult {
    /// The completed `m × n` matrix
    pub matrix: Matrix,

    /// Number of thresholding iterations performed
    pub iterations: usize,

    /// Final ||P_Ω(M - X)||_F / ||P_Ω(M)||_F, measured before observed
    /// entries are copied into the result
    pub relative_residual: f64,

    /// Threshold τ in effect at the last iteration
    pub threshold: f64,

    /// Number of nonzero singular values of the last iterate
    pub rank: usize,

    /// Nuclear norm of the last iterate
    pub nuclear_norm: f64,

    /// Wall-clock time spent in the solver
    pub duration: Duration,

    /// Why the solver stopped
    pub termination_reason: TerminationReason,
}

impl CompletionResult {
    /// Creates a result with empty diagnostics.
    pub const fn new(matrix: Matrix, termination_reason: TerminationReason) -> Self {
        Self {
            matrix,
            iterations: 0,
            relative_residual: 0.0,
            threshold: 0.0,
            rank: 0,
            nuclear_norm: 0.0,
            duration: Duration::ZERO,
            termination_reason,
        }
    }

    /// Sets the iteration count.
    pub const fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the final relative residual.
    pub const fn with_relative_residual(mut self, residual: f64) -> Self {
        self.relative_residual = residual;
        self
    }

    /// Sets the final threshold.
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets rank and nuclear norm of the last iterate.
    pub const fn with_spectrum(mut self, rank: usize, nuclear_norm: f64) -> Self {
        self.rank = rank;
        self.nuclear_norm = nuclear_norm;
        self
    }

    /// Sets the elapsed time.
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Consumes the result, keeping only the matrix.
    pub fn into_matrix(self) -> Matrix {
        self.matrix
    }
}
