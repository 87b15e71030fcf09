//! # matcompl
//!
//! Recovers a fully populated matrix from a sparse set of observed entries,
//! assuming the underlying matrix is (approximately) low-rank. Among all
//! matrices agreeing with the observed entries, the engine returns one of
//! (approximately) minimal nuclear norm, the sum of singular values.
//!
//! The solver is a self-contained singular value thresholding iteration on
//! top of nalgebra's SVD; see [`matcompl_solver::svt`] for the algorithm and
//! [`CompletionConfig`] for its knobs and defaults.
//!
//! ## Observed zeros
//!
//! Without an explicit observation set, cells equal to exactly `0.0` are
//! treated as unobserved. Pass the set explicitly to pin an entry to zero.
//!
//! ## Quick Start
//!
//! ```rust
//! use matcompl::prelude::*;
//!
//! // Rank-one ratings with three missing entries (zeros).
//! let ratings = vec![
//!     vec![1.0, 0.0, 3.0],
//!     vec![2.0, 4.0, 0.0],
//!     vec![3.0, 0.0, 9.0],
//! ];
//! let config = CompletionConfig::new().with_max_iterations(20_000);
//! let completed = complete_grid(&ratings, None, &config).unwrap();
//!
//! assert_eq!(completed.len(), 3);
//! assert_eq!(completed[0][0], 1.0);
//! ```
//!
//! ## Errors
//!
//! Failures are [`CompletionError`] values. Only
//! [`CompletionError::NonConvergence`] is worth retrying, with a relaxed
//! tolerance, a larger budget or another threshold/step configuration.

mod entry;

pub use entry::{complete, complete_flat, complete_grid};

pub use matcompl_core::{
    config, error, matrix, observation, result, BudgetExhausted, CompletionConfig,
    CompletionError, CompletionResult, Matrix, ObservationSet, Result, StepSize, Threshold,
    TerminationReason,
};
pub use matcompl_solver::{schedule, shrinkage, svt, Completer, SvtSolver};

/// The linear-algebra crate behind `Matrix::to_dmatrix` and `from_dmatrix`.
pub use nalgebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::entry::{complete, complete_flat, complete_grid};
    pub use matcompl_core::prelude::*;
    pub use matcompl_solver::{Completer, SvtSolver};
}
