//! Public entry points.
//!
//! Three shapes of the same call, for callers holding a [`Matrix`], a grid of
//! rows, or a flat row-major buffer. When `observations` is `None` the set is
//! derived from the nonzero cells: a value of exactly `0.0` is treated as
//! unobserved, so a real zero rating must be passed through an explicit set.

use matcompl_core::{CompletionConfig, CompletionResult, Matrix, ObservationSet, Result};
use matcompl_solver::{Completer, SvtSolver};

/// Completes `matrix`, returning the completed grid with solver diagnostics.
///
/// # Errors
///
/// `EmptyObservations` when the (derived or supplied) set is empty,
/// `NonConvergence` when the budget runs out, plus the input validation
/// errors listed on [`Completer::complete`].
pub fn complete(
    matrix: &Matrix,
    observations: Option<&ObservationSet>,
    config: &CompletionConfig,
) -> Result<CompletionResult> {
    let solver = SvtSolver::new(config.clone());
    match observations {
        Some(observations) => solver.complete(matrix, observations),
        None => {
            let derived = ObservationSet::from_nonzero(matrix);
            log::debug!(
                "derived {} observations from nonzero entries of a {}x{} matrix",
                derived.len(),
                matrix.nrows(),
                matrix.ncols()
            );
            solver.complete(matrix, &derived)
        }
    }
}

/// Completes a grid given as rows.
///
/// # Errors
///
/// `Shape` if the grid is empty or ragged; `ObservationOutOfBounds` for an
/// explicit pair outside the grid; otherwise as [`complete`].
pub fn complete_grid<R: AsRef<[f64]>>(
    rows: &[R],
    observations: Option<&[(usize, usize)]>,
    config: &CompletionConfig,
) -> Result<Vec<Vec<f64>>> {
    let matrix = Matrix::from_rows(rows)?;
    let completed = complete_with_pairs(&matrix, observations, config)?;
    Ok(completed.to_rows())
}

/// Completes an `m × n` matrix given as `m * n` row-major values.
///
/// # Errors
///
/// `Shape` if `values.len() != m * n` or a dimension is zero; otherwise as
/// [`complete_grid`].
pub fn complete_flat(
    m: usize,
    n: usize,
    values: &[f64],
    observations: Option<&[(usize, usize)]>,
    config: &CompletionConfig,
) -> Result<Vec<f64>> {
    let matrix = Matrix::from_flat(m, n, values.to_vec())?;
    let completed = complete_with_pairs(&matrix, observations, config)?;
    Ok(completed.into_flat())
}

fn complete_with_pairs(
    matrix: &Matrix,
    observations: Option<&[(usize, usize)]>,
    config: &CompletionConfig,
) -> Result<Matrix> {
    let (m, n) = matrix.shape();
    let observations = observations
        .map(|pairs| ObservationSet::new(m, n, pairs.iter().copied()))
        .transpose()?;
    Ok(complete(matrix, observations.as_ref(), config)?.into_matrix())
}
