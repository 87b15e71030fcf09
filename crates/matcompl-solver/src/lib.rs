//! Nuclear-norm matrix completion by singular value thresholding.
//!
//! This crate implements the numerical engine: a self-contained proximal
//! iteration built only on an SVD primitive, with no external convex solver.
//!
//! # Modules
//!
//! - [`shrinkage`]: Singular value soft-thresholding and spectral norms
//! - [`schedule`]: Fixed and continuation threshold schedules
//! - [`svt`]: The [`Completer`] trait and the [`SvtSolver`] iteration

pub mod schedule;
pub mod shrinkage;
pub mod svt;

pub use schedule::ThresholdSchedule;
pub use shrinkage::{nuclear_norm, numerical_rank, shrink, soft_threshold, spectral_norm, Shrinkage};
pub use svt::{Completer, SvtSolver};
