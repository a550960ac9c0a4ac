//! A genetic algorithm that completes partially filled 9x9 Sudoku puzzles.
//!
//! Every individual keeps each row a permutation of 1..=9 with the puzzle's
//! clues in place, so the search only has to repair columns and boxes.
//!
//! ```rust
//! use sudoku_genalg::{solve, EvolutionOptions, Puzzle, RandomNumberGenerator};
//!
//! let options = EvolutionOptions::builder()
//!     .population_size(50)
//!     .max_generations(20)
//!     .build();
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let result = solve(&Puzzle::reference(), &options, &mut rng).unwrap();
//!
//! assert!(result.individual.is_consistent_with(&Puzzle::reference()));
//! ```

pub mod breeding;
pub mod caching;
pub mod error;
pub mod evolution;
pub mod fitness;
pub mod grid;
pub mod individual;
pub mod rng;
pub mod selection;
pub mod validation;

// Re-export commonly used types for convenience
pub use breeding::{Breeder, CrossoverMethod, MutationMethod};
pub use caching::CacheType;
pub use error::{GeneticError, OptionExt, Result};
pub use evolution::{
    parse_strategy, EvolutionLauncher, EvolutionOptions, EvolutionResult, EvolutionState, LogLevel,
};
pub use fitness::{Challenge, FitnessMethod};
pub use grid::{FixedMask, Grid, Puzzle};
pub use individual::Individual;
pub use rng::RandomNumberGenerator;
pub use selection::{SelectionMethod, SelectionStrategy};
pub use validation::{validate, validate_with_boxes, ConflictMask, ConflictScope};

/// Validates `options` and runs one evolution on `puzzle`.
///
/// # Errors
///
/// Returns `GeneticError::Configuration` for out-of-range options, or any
/// error raised during the run. Reaching the generation cap is not an error.
pub fn solve(
    puzzle: &Puzzle,
    options: &EvolutionOptions,
    rng: &mut RandomNumberGenerator,
) -> Result<EvolutionResult> {
    EvolutionLauncher::new(options.clone())?.evolve(puzzle, rng)
}
