//! Core types for low-rank matrix completion.
//!
//! This crate holds the data model shared by the solver and the public entry
//! points: the row-major [`Matrix`] grid, the [`ObservationSet`] Ω, the solver
//! configuration and the error taxonomy.
//!
//! # Modules
//!
//! - [`config`]: Solver knobs and their documented defaults
//! - [`error`]: Error types and the `Result` alias
//! - [`matrix`]: Shape-checked dense grid
//! - [`observation`]: Observation set and the zero-means-unobserved rule
//! - [`result`]: Completed matrix plus diagnostics

pub mod config;
pub mod error;
pub mod matrix;
pub mod observation;
pub mod result;

pub use config::{CompletionConfig, StepSize, Threshold};
pub use error::{BudgetExhausted, CompletionError, Result};
pub use matrix::Matrix;
pub use observation::ObservationSet;
pub use result::{CompletionResult, TerminationReason};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{CompletionConfig, StepSize, Threshold};
    pub use crate::error::{BudgetExhausted, CompletionError, Result};
    pub use crate::matrix::Matrix;
    pub use crate::observation::ObservationSet;
    pub use crate::result::{CompletionResult, TerminationReason};
}
