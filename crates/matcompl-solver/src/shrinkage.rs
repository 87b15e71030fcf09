//! Singular value soft-thresholding.
//!
//! The proximal operator of the nuclear norm, D_τ(Y) = U max(Σ - τ, 0) Vᵀ,
//! together with the spectral quantities the solver needs. All routines are
//! built on nalgebra's SVD. Zero singular values after thresholding are the
//! expected outcome for low-rank data and are simply dropped from the
//! reconstruction.

use matcompl_core::error::{CompletionError, Result};
use nalgebra::{DMatrix, DVector, SVD};

/// Output of [`shrink`].
#[derive(Debug, Clone)]
pub struct Shrinkage {
    /// D_τ(Y)
    pub matrix: DMatrix<f64>,
    /// Number of singular values that survived thresholding
    pub rank: usize,
    /// Sum of the surviving (shrunk) singular values
    pub nuclear_norm: f64,
}

/// Applies `max(σ - τ, 0)` to every value.
pub fn soft_threshold(values: &DVector<f64>, tau: f64) -> DVector<f64> {
    values.map(|sigma| (sigma - tau).max(0.0))
}

/// Singular values of `matrix`, in no particular order.
pub fn singular_values(matrix: &DMatrix<f64>) -> Result<DVector<f64>> {
    SVD::try_new(matrix.clone(), false, false, f64::EPSILON, 0)
        .map(|svd| svd.singular_values)
        .ok_or_else(|| CompletionError::numerical("SVD did not converge"))
}

/// Largest singular value.
pub fn spectral_norm(matrix: &DMatrix<f64>) -> Result<f64> {
    Ok(singular_values(matrix)?.iter().copied().fold(0.0, f64::max))
}

/// Sum of singular values.
pub fn nuclear_norm(matrix: &DMatrix<f64>) -> Result<f64> {
    Ok(singular_values(matrix)?.sum())
}

/// Number of singular values above `max(m, n) · ε · σ_max`.
pub fn numerical_rank(matrix: &DMatrix<f64>) -> Result<usize> {
    let values = singular_values(matrix)?;
    let sigma_max = values.iter().copied().fold(0.0, f64::max);
    let cutoff = matrix.nrows().max(matrix.ncols()) as f64 * f64::EPSILON * sigma_max;
    Ok(values.iter().filter(|&&sigma| sigma > cutoff).count())
}

/// Computes D_τ(Y), consuming `y`.
///
/// # Errors
///
/// Returns a Numerical error if the SVD fails or the reconstruction is not
/// finite.
pub fn shrink(y: DMatrix<f64>, tau: f64) -> Result<Shrinkage> {
    let (rows, cols) = y.shape();
    let svd = SVD::try_new(y, true, true, f64::EPSILON, 0)
        .ok_or_else(|| CompletionError::numerical("SVD did not converge"))?;
    let u = svd
        .u
        .ok_or_else(|| CompletionError::numerical("SVD failed to compute U"))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| CompletionError::numerical("SVD failed to compute V^T"))?;
    let shrunk = soft_threshold(&svd.singular_values, tau);

    let mut matrix = DMatrix::zeros(rows, cols);
    let mut rank = 0;
    let mut nuclear_norm = 0.0;
    for (k, &sigma) in shrunk.iter().enumerate() {
        if sigma > 0.0 {
            let v_k = v_t.row(k).transpose();
            matrix.ger(sigma, &u.column(k), &v_k, 1.0);
            rank += 1;
            nuclear_norm += sigma;
        }
    }

    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(CompletionError::numerical(
            "singular value thresholding produced a non-finite entry",
        ));
    }

    Ok(Shrinkage {
        matrix,
        rank,
        nuclear_norm,
    })
}
