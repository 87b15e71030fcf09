//! Row-major dense grid exchanged with callers.
//!
//! [`Matrix`] is the shape-checked container passed into and returned from the
//! completion engine. The solver itself works on `nalgebra::DMatrix<f64>`;
//! conversions in both directions are provided.

use crate::error::{CompletionError, Result};
use nalgebra::DMatrix;
use std::fmt;

/// An `m × n` grid of `f64` values stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMatrix"))]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates an `m × n` matrix filled with zeros.
    ///
    /// # Errors
    ///
    /// Returns a Shape error if either dimension is zero.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        check_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        })
    }

    /// Creates a matrix from a flat row-major sequence of `rows * cols` values.
    ///
    /// # Errors
    ///
    /// Returns a Shape error if a dimension is zero or if
    /// `data.len() != rows * cols`.
    pub fn from_flat(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        check_dimensions(rows, cols)?;
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            CompletionError::shape("an addressable element count", format!("{rows}x{cols}"))
        })?;
        if data.len() != expected {
            return Err(CompletionError::shape(
                format!("{expected} values for a {rows}x{cols} matrix"),
                format!("{} values", data.len()),
            ));
        }
        Ok(Self { rows, cols, data })
    }

    /// Creates a matrix from a slice of rows.
    ///
    /// # Errors
    ///
    /// Returns a Shape error if there are no rows, the first row is empty, or
    /// the rows have different lengths.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let m = rows.len();
        let n = rows.first().map_or(0, |row| row.as_ref().len());
        check_dimensions(m, n)?;

        let mut data = Vec::with_capacity(m * n);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n {
                return Err(CompletionError::shape(
                    format!("{n} columns in every row"),
                    format!("{} columns in row {i}", row.len()),
                ));
            }
            data.extend_from_slice(row);
        }
        Ok(Self { rows: m, cols: n, data })
    }

    /// Returns `(rows, cols)`.
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of rows.
    pub const fn nrows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub const fn ncols(&self) -> usize {
        self.cols
    }

    /// Returns the value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check_index(row, col)?;
        Ok(self.data[row * self.cols + col])
    }

    /// Overwrites the value at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_index(row, col)?;
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    /// Replaces the whole contents, keeping the shape.
    pub fn set_data(&mut self, data: Vec<f64>) -> Result<()> {
        if data.len() != self.data.len() {
            return Err(CompletionError::shape(
                format!("{} values", self.data.len()),
                format!("{} values", data.len()),
            ));
        }
        self.data = data;
        Ok(())
    }

    /// Row-major view of the values.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consumes the matrix, returning its row-major values.
    pub fn into_flat(self) -> Vec<f64> {
        self.data
    }

    /// Copies the values into one `Vec` per row.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }

    /// Element-wise sum.
    ///
    /// # Errors
    ///
    /// Returns a Shape error if the shapes differ.
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        if self.shape() != other.shape() {
            return Err(CompletionError::shape(
                format!("{}x{}", self.rows, self.cols),
                format!("{}x{}", other.rows, other.cols),
            ));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Position of the first NaN or infinite value, if any.
    pub fn first_non_finite(&self) -> Option<(usize, usize)> {
        self.data
            .iter()
            .position(|v| !v.is_finite())
            .map(|idx| (idx / self.cols, idx % self.cols))
    }

    /// Copies the values into a column-major `nalgebra` matrix.
    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.rows, self.cols, &self.data)
    }

    /// Builds a matrix from an `nalgebra` matrix.
    ///
    /// # Errors
    ///
    /// Returns a Shape error if the matrix has a zero dimension.
    pub fn from_dmatrix(matrix: &DMatrix<f64>) -> Result<Self> {
        let (rows, cols) = matrix.shape();
        check_dimensions(rows, cols)?;
        let mut data = Vec::with_capacity(rows * cols);
        for row in matrix.row_iter() {
            data.extend(row.iter().copied());
        }
        Ok(Self { rows, cols, data })
    }

    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        if row < self.rows && col < self.cols {
            Ok(())
        } else {
            Err(CompletionError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
}

fn check_dimensions(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(CompletionError::shape(
            "at least one row and one column",
            format!("{rows}x{cols}"),
        ));
    }
    Ok(())
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.cols) {
            write!(f, "[")?;
            for value in row {
                write!(f, "\t{value:?}")?;
            }
            writeln!(f, "\t]")?;
        }
        Ok(())
    }
}

/// Unchecked wire form; every deserialized matrix goes through `from_flat`.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMatrix> for Matrix {
    type Error = CompletionError;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        Self::from_flat(raw.rows, raw.cols, raw.data)
    }
}

impl TryFrom<&DMatrix<f64>> for Matrix {
    type Error = CompletionError;

    fn try_from(matrix: &DMatrix<f64>) -> Result<Self> {
        Self::from_dmatrix(matrix)
    }
}

impl From<&Matrix> for DMatrix<f64> {
    fn from(matrix: &Matrix) -> Self {
        matrix.to_dmatrix()
    }
}
