//! # Error Types
//!
//! This module defines the error type shared by every part of the solver.
//! Configuration problems are reported before a run starts; a run that hits
//! its generation cap is not an error and is reported through
//! [`EvolutionState::Exhausted`](crate::evolution::EvolutionState).
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use sudoku_genalg::error::{GeneticError, Result};
//!
//! fn check_population(size: usize) -> Result<()> {
//!     if size == 0 {
//!         return Err(GeneticError::Configuration(
//!             "Population size cannot be zero".to_string(),
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_population(0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use sudoku_genalg::error::{GeneticError, OptionExt};
//!
//! fn best_score(scores: &[f64]) -> sudoku_genalg::error::Result<f64> {
//!     scores
//!         .iter()
//!         .copied()
//!         .min_by(f64::total_cmp)
//!         .ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert_eq!(best_score(&[3.0, 1.0]).unwrap(), 1.0);
//! ```

use thiserror::Error;

/// Represents errors that can occur while configuring or running the solver.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// A numeric parameter is outside its declared domain.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A strategy name did not match any known variant.
    #[error("Unsupported {kind} strategy: '{value}'")]
    UnsupportedStrategy {
        /// Which strategy family was being parsed (e.g. "crossover").
        kind: &'static str,
        /// The text that failed to parse.
        value: String,
    },

    /// The input puzzle violates the solver's preconditions.
    #[error("Invalid puzzle: {0}")]
    InvalidPuzzle(String),

    /// An operation needed at least one individual.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// A crossover or mutation operator could not build a child.
    #[error("Breeding error: {0}")]
    Breeding(String),

    /// Parent selection failed.
    #[error("Selection error: {0}")]
    Selection(String),

    /// A fitness function produced an unusable score.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),
}

/// A specialized Result type for solver operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using `err_fn`.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
