//! # Fitness
//!
//! Both fitness functions are lower-is-better and reach zero exactly on a
//! valid solution. They score the 18 units that an individual does not keep
//! valid by construction: the 9 columns and the 9 boxes.
//!
//! - [`simple_fitness`]: sum over units of `9 - distinct(unit)`, range 0..=144.
//! - [`weighted_fitness`]: sum over units of `5*RS + RP + 20*REA`, where
//!   `RS = |45 - sum|`, `RP = sqrt(|9! - product|)` and `REA = 9 - distinct`.
//!
//! ```rust
//! use sudoku_genalg::fitness::{Challenge, FitnessMethod};
//! use sudoku_genalg::grid::Grid;
//!
//! let solved = Grid::new(std::array::from_fn(|r| {
//!     std::array::from_fn(|c| ((r * 3 + r / 3 + c) % 9 + 1) as u8)
//! }));
//! assert_eq!(FitnessMethod::Simple.score(&solved), 0.0);
//! assert_eq!(FitnessMethod::Weighted.score(&solved), 0.0);
//! ```

use strum::{Display, EnumIter, EnumString};

use crate::grid::{distinct_count, Grid, Row, DIGIT_PRODUCT, DIGIT_SUM, SIZE};

/// Weight of the sum deviation term in the weighted fitness.
pub const SUM_WEIGHT: f64 = 5.0;

/// Weight of the product deviation term in the weighted fitness.
pub const PRODUCT_WEIGHT: f64 = 1.0;

/// Weight of the duplicate count term in the weighted fitness.
pub const DUPLICATE_WEIGHT: f64 = 20.0;

/// Scores a grid. Lower is better and zero means solved.
pub trait Challenge: Send + Sync {
    fn score(&self, grid: &Grid) -> f64;
}

/// The fitness function used for a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FitnessMethod {
    /// Count of missing distinct values per unit.
    #[default]
    Simple,
    /// Sum, product and duplicate penalties per unit.
    Weighted,
}

impl Challenge for FitnessMethod {
    fn score(&self, grid: &Grid) -> f64 {
        match self {
            FitnessMethod::Simple => simple_fitness(grid) as f64,
            FitnessMethod::Weighted => weighted_fitness(grid),
        }
    }
}

/// Number of values missing from `unit` compared to a full permutation.
pub fn duplicate_count(unit: &Row) -> usize {
    SIZE - distinct_count(unit)
}

/// Sum of [`duplicate_count`] over the columns and boxes of `grid`.
pub fn simple_fitness(grid: &Grid) -> u32 {
    grid.scoring_units()
        .map(|unit| duplicate_count(&unit) as u32)
        .sum()
}

/// Sum of [`UnitPenalty::weighted`] over the columns and boxes of `grid`.
pub fn weighted_fitness(grid: &Grid) -> f64 {
    grid.scoring_units()
        .map(|unit| UnitPenalty::of(&unit).weighted())
        .sum()
}

/// The three penalty terms of one unit under the weighted fitness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPenalty {
    /// `|45 - sum(unit)|`
    pub sum_deviation: u32,
    /// `sqrt(|9! - product(unit)|)`
    pub product_deviation: f64,
    /// `9 - distinct(unit)`
    pub duplicates: usize,
}

impl UnitPenalty {
    pub fn of(unit: &Row) -> Self {
        let sum: u32 = unit.iter().map(|&v| v as u32).sum();
        // 9^9 fits comfortably in u64
        let product: u64 = unit.iter().map(|&v| v as u64).product();
        Self {
            sum_deviation: sum.abs_diff(DIGIT_SUM),
            product_deviation: (product.abs_diff(DIGIT_PRODUCT) as f64).sqrt(),
            duplicates: duplicate_count(unit),
        }
    }

    pub fn weighted(&self) -> f64 {
        SUM_WEIGHT * self.sum_deviation as f64
            + PRODUCT_WEIGHT * self.product_deviation
            + DUPLICATE_WEIGHT * self.duplicates as f64
    }
}
