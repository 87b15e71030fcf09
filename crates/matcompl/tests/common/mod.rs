//! Shared fixtures: seeded low-rank matrices and random observation sets.

#![allow(dead_code)]

use matcompl::{Matrix, ObservationSet};
use matcompl::nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Sum of `rank` outer products of standard normal vectors.
pub fn low_rank(rows: usize, cols: usize, rank: usize, rng: &mut StdRng) -> DMatrix<f64> {
    let mut matrix = DMatrix::zeros(rows, cols);
    for _ in 0..rank {
        let u = DMatrix::<f64>::from_fn(rows, 1, |_, _| StandardNormal.sample(rng));
        let v = DMatrix::<f64>::from_fn(1, cols, |_, _| StandardNormal.sample(rng));
        matrix += u * v;
    }
    matrix
}

/// `count` distinct positions drawn uniformly from an `rows × cols` grid.
pub fn sample_positions(
    rows: usize,
    cols: usize,
    count: usize,
    rng: &mut StdRng,
) -> Vec<(usize, usize)> {
    index::sample(rng, rows * cols, count)
        .into_iter()
        .map(|idx| (idx / cols, idx % cols))
        .collect()
}

/// Copies the sampled entries of `truth` into an otherwise zero matrix.
pub fn observe(truth: &DMatrix<f64>, positions: &[(usize, usize)]) -> (Matrix, ObservationSet) {
    let (rows, cols) = truth.shape();
    let mut sampled = DMatrix::zeros(rows, cols);
    for &(i, j) in positions {
        sampled[(i, j)] = truth[(i, j)];
    }
    let matrix = Matrix::from_dmatrix(&sampled).expect("non-empty fixture");
    let observations =
        ObservationSet::new(rows, cols, positions.iter().copied()).expect("in-bounds fixture");
    (matrix, observations)
}

/// Largest absolute entry-wise difference.
pub fn max_abs_error(completed: &Matrix, truth: &DMatrix<f64>) -> f64 {
    (&completed.to_dmatrix() - truth).amax()
}
