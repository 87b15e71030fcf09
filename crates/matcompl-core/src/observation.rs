//! The observation set Ω: which entries of the input are known.
//!
//! # Zero means unobserved
//!
//! When no explicit set is supplied, [`ObservationSet::from_nonzero`] treats
//! every cell holding exactly `0.0` as unobserved. A genuinely observed zero
//! (e.g. a zero rating) is therefore indistinguishable from a missing entry.
//! Callers that need to pin an entry to zero must build the set explicitly
//! with [`ObservationSet::new`].

use crate::error::{CompletionError, Result};
use crate::matrix::Matrix;
use nalgebra::DMatrix;

/// Sorted set of unique, in-bounds `(row, col)` positions of an `m × n` matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationSet {
    rows: usize,
    cols: usize,
    entries: Vec<(usize, usize)>,
}

impl ObservationSet {
    /// Builds an explicit observation set for an `rows × cols` matrix.
    ///
    /// Duplicate pairs are collapsed. The set may be empty here; the engine
    /// rejects empty sets when it is invoked.
    ///
    /// # Errors
    ///
    /// Returns `ObservationOutOfBounds` for the first pair outside the matrix.
    pub fn new<I>(rows: usize, cols: usize, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut entries = Vec::new();
        for (row, col) in pairs {
            if row >= rows || col >= cols {
                return Err(CompletionError::ObservationOutOfBounds {
                    row,
                    col,
                    rows,
                    cols,
                });
            }
            entries.push((row, col));
        }
        entries.sort_unstable();
        entries.dedup();
        Ok(Self { rows, cols, entries })
    }

    /// Derives the set from the nonzero cells of `matrix`.
    ///
    /// Every cell whose value is not exactly `0.0` is observed. See the
    /// module documentation for why this is lossy.
    pub fn from_nonzero(matrix: &Matrix) -> Self {
        let (rows, cols) = matrix.shape();
        let entries = matrix
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0.0)
            .map(|(idx, _)| (idx / cols, idx % cols))
            .collect();
        Self { rows, cols, entries }
    }

    /// Every cell of an `rows × cols` matrix.
    pub fn full(rows: usize, cols: usize) -> Self {
        let entries = (0..rows)
            .flat_map(|i| (0..cols).map(move |j| (i, j)))
            .collect();
        Self { rows, cols, entries }
    }

    /// Shape of the matrix the set refers to.
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of observed entries |Ω|.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry is observed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every entry is observed.
    pub fn is_complete(&self) -> bool {
        self.rows.checked_mul(self.cols) == Some(self.entries.len())
    }

    /// Whether `(row, col)` is observed.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.entries.binary_search(&(row, col)).is_ok()
    }

    /// Observed positions in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.entries.iter().copied()
    }

    /// Fraction of observed entries, |Ω| / (m·n).
    pub fn density(&self) -> f64 {
        self.entries.len() as f64 / (self.rows as f64 * self.cols as f64)
    }

    /// Boolean mask with `true` at observed positions.
    pub fn mask(&self) -> DMatrix<bool> {
        let mut mask = DMatrix::from_element(self.rows, self.cols, false);
        for &(i, j) in &self.entries {
            mask[(i, j)] = true;
        }
        mask
    }

    /// Checks that the set refers to a matrix of the given shape.
    pub fn check_shape(&self, rows: usize, cols: usize) -> Result<()> {
        if self.shape() == (rows, cols) {
            Ok(())
        } else {
            Err(CompletionError::shape(
                format!("observations for a {rows}x{cols} matrix"),
                format!("observations for a {}x{} matrix", self.rows, self.cols),
            ))
        }
    }
}

impl<'a> IntoIterator for &'a ObservationSet {
    type Item = (usize, usize);
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, (usize, usize)>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().copied()
    }
}
