//! Error types for matrix completion.
//!
//! Every failure the engine can report is a variant of [`CompletionError`].
//! Only [`CompletionError::NonConvergence`] is recoverable: the caller may
//! retry with a relaxed tolerance, a larger budget or a different
//! threshold/step configuration. All other variants require fixing the input.

use std::time::Duration;
use thiserror::Error;

/// Why the iterative solver gave up before meeting its tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetExhausted {
    /// The iteration budget ran out.
    Iterations,
    /// The wall-clock budget ran out.
    Time(Duration),
}

impl std::fmt::Display for BudgetExhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Iterations => write!(f, "iteration budget exhausted"),
            Self::Time(limit) => write!(f, "time budget of {limit:?} exhausted"),
        }
    }
}

/// Errors that can occur while completing a matrix.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    /// Caller-supplied dimensions are inconsistent with the data.
    ///
    /// Raised when a flat array does not hold exactly `m * n` values, when
    /// the rows of a grid have different lengths, or when a dimension is zero.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    Shape {
        /// Expected shape or length
        expected: String,
        /// Actual shape or length
        actual: String,
    },

    /// The observation set is empty, leaving the problem unconstrained.
    #[error("Observation set is empty: no entries constrain the completion")]
    EmptyObservations,

    /// The solver did not reach its tolerance within the configured budget.
    #[error(
        "Solver did not converge after {iterations} iterations ({reason}): \
         relative residual {residual:e} above tolerance {tolerance:e}"
    )]
    NonConvergence {
        /// Iterations performed before giving up
        iterations: usize,
        /// Relative residual on the observed entries at the last iterate
        residual: f64,
        /// Tolerance that was not met
        tolerance: f64,
        /// Which budget ran out
        reason: BudgetExhausted,
    },

    /// An explicit observation lies outside the matrix.
    #[error("Observation ({row}, {col}) is outside a {rows}x{cols} matrix")]
    ObservationOutOfBounds {
        /// Row of the offending observation
        row: usize,
        /// Column of the offending observation
        col: usize,
        /// Number of matrix rows
        rows: usize,
        /// Number of matrix columns
        cols: usize,
    },

    /// A checked accessor was called with an index outside the matrix.
    #[error("Index ({row}, {col}) is out of bounds for a {rows}x{cols} matrix")]
    IndexOutOfBounds {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Number of matrix rows
        rows: usize,
        /// Number of matrix columns
        cols: usize,
    },

    /// The input holds NaN or an infinite value.
    #[error("Non-finite value at ({row}, {col})")]
    NonFiniteValue {
        /// Row of the value
        row: usize,
        /// Column of the value
        col: usize,
    },

    /// A configuration knob holds an invalid value.
    #[error("Invalid configuration for `{parameter}`: {reason}")]
    InvalidConfiguration {
        /// Name of the invalid parameter
        parameter: String,
        /// Description of the problem
        reason: String,
    },

    /// Numerical failure inside the solver.
    #[error("Numerical failure: {reason}")]
    Numerical {
        /// Description of the numerical issue
        reason: String,
    },
}

impl CompletionError {
    /// Create a Shape error.
    pub fn shape<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::Shape {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a NonConvergence error.
    pub fn non_convergence(
        iterations: usize,
        residual: f64,
        tolerance: f64,
        reason: BudgetExhausted,
    ) -> Self {
        Self::NonConvergence {
            iterations,
            residual,
            tolerance,
            reason,
        }
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2>(parameter: S1, reason: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self::InvalidConfiguration {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a Numerical error.
    pub fn numerical<S: Into<String>>(reason: S) -> Self {
        Self::Numerical {
            reason: reason.into(),
        }
    }

    /// Whether retrying with a different configuration may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NonConvergence { .. })
    }
}

/// Result type alias for completion operations.
pub type Result<T> = std::result::Result<T, CompletionError>;
