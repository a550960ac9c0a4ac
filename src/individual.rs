//! # Individual
//!
//! An [`Individual`] is a candidate grid that keeps two invariants at all
//! times: every row is a permutation of 1..=9, and every fixed cell keeps the
//! puzzle's clue. The initializer, every crossover and every mutation
//! maintain both; fitness only measures column and box violations.
//!
//! ```rust
//! use sudoku_genalg::grid::Puzzle;
//! use sudoku_genalg::individual::initialize;
//! use sudoku_genalg::rng::RandomNumberGenerator;
//!
//! let puzzle = Puzzle::reference();
//! let mut rng = RandomNumberGenerator::from_seed(1);
//! let population = initialize(&puzzle, 10, &mut rng).unwrap();
//!
//! assert_eq!(population.len(), 10);
//! assert!(population.iter().all(|ind| ind.grid().rows_are_permutations()));
//! ```

use crate::error::{GeneticError, Result};
use crate::grid::{Grid, Puzzle, Row, SIZE};
use crate::rng::RandomNumberGenerator;

/// One candidate solution in the population.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Individual {
    grid: Grid,
}

impl Individual {
    /// Wraps a grid that the caller guarantees satisfies the row invariant.
    pub fn from_grid(grid: Grid) -> Self {
        Self { grid }
    }

    /// Builds a random individual from `puzzle`, filling each row's blanks
    /// with a shuffle of the digits its clues leave free.
    pub fn random(puzzle: &Puzzle, rng: &mut RandomNumberGenerator) -> Self {
        let mut grid = *puzzle.grid();
        let fixed = puzzle.fixed_mask();
        for row in 0..SIZE {
            regenerate_row(grid.row_mut(row), fixed.row(row), rng);
        }
        Self { grid }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn row(&self, row: usize) -> &Row {
        self.grid.row(row)
    }

    /// Checks both invariants against `puzzle`.
    pub fn is_consistent_with(&self, puzzle: &Puzzle) -> bool {
        self.grid.rows_are_permutations() && puzzle.is_respected_by(&self.grid)
    }
}

impl From<Grid> for Individual {
    fn from(grid: Grid) -> Self {
        Self::from_grid(grid)
    }
}

/// Refills the non-fixed cells of `row` with a uniform shuffle of the digits
/// missing from its fixed cells, left to right.
///
/// Values in non-fixed cells are ignored, so this works both on puzzle rows
/// (blanks are 0) and on rows of a live individual.
pub fn regenerate_row(row: &mut Row, fixed: &[bool; SIZE], rng: &mut RandomNumberGenerator) {
    let mut used = [false; SIZE + 1];
    for (value, _) in row.iter().zip(fixed).filter(|&(_, &is_fixed)| is_fixed) {
        used[*value as usize] = true;
    }

    let mut available: Vec<u8> = (1..=SIZE as u8).filter(|&d| !used[d as usize]).collect();
    rng.shuffle(&mut available);

    let mut digits = available.into_iter();
    for (cell, _) in row.iter_mut().zip(fixed).filter(|&(_, &is_fixed)| !is_fixed) {
        if let Some(digit) = digits.next() {
            *cell = digit;
        }
    }
}

/// Builds a population of `population_size` random individuals.
///
/// # Errors
///
/// Returns `GeneticError::Configuration` if `population_size` is zero.
pub fn initialize(
    puzzle: &Puzzle,
    population_size: usize,
    rng: &mut RandomNumberGenerator,
) -> Result<Vec<Individual>> {
    if population_size == 0 {
        return Err(GeneticError::Configuration(
            "Population size cannot be zero".to_string(),
        ));
    }
    Ok((0..population_size)
        .map(|_| Individual::random(puzzle, rng))
        .collect())
}
