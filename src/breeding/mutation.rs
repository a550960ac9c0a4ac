//! # Mutation
//!
//! Three in-place mutation operators. Each is applied independently to every
//! row with the run's mutation probability and only ever rearranges or
//! redraws the row's non-fixed cells, so a mutated row stays a permutation of
//! 1..=9 that keeps the puzzle's clues.

use strum::{Display, EnumIter, EnumString};

use crate::error::Result;
use crate::grid::{FixedMask, SIZE};
use crate::individual::{regenerate_row, Individual};
use crate::rng::RandomNumberGenerator;

/// The mutation operator used for a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MutationMethod {
    /// Swap two distinct non-fixed cells.
    #[default]
    Swap,
    /// Rotate the non-fixed values one step to the right.
    Rotation,
    /// Redraw the non-fixed cells from scratch.
    Regeneration,
}

impl MutationMethod {
    /// Mutates `individual` in place.
    pub fn mutate(
        &self,
        individual: &mut Individual,
        fixed: &FixedMask,
        probability: f64,
        rng: &mut RandomNumberGenerator,
    ) -> Result<()> {
        match self {
            MutationMethod::Swap => swap(individual, fixed, probability, rng),
            MutationMethod::Rotation => {
                rotation(individual, fixed, probability, rng);
                Ok(())
            }
            MutationMethod::Regeneration => {
                regeneration(individual, fixed, probability, rng);
                Ok(())
            }
        }
    }
}

/// Swaps two distinct non-fixed cells of a row. Rows with fewer than two free
/// cells are left alone.
pub fn swap(
    individual: &mut Individual,
    fixed: &FixedMask,
    probability: f64,
    rng: &mut RandomNumberGenerator,
) -> Result<()> {
    for row in 0..SIZE {
        if !rng.chance(probability) {
            continue;
        }
        let free = fixed.free_columns(row);
        if free.len() < 2 {
            continue;
        }
        let picked = rng.sample_indices(free.len(), 2)?;
        individual
            .grid_mut()
            .row_mut(row)
            .swap(free[picked[0]], free[picked[1]]);
    }
    Ok(())
}

/// Moves the last non-fixed value of a row to the first non-fixed cell and
/// shifts the others one free cell to the right.
pub fn rotation(
    individual: &mut Individual,
    fixed: &FixedMask,
    probability: f64,
    rng: &mut RandomNumberGenerator,
) {
    for row in 0..SIZE {
        if !rng.chance(probability) {
            continue;
        }
        let free = fixed.free_columns(row);
        if free.len() < 2 {
            continue;
        }

        let cells = individual.grid_mut().row_mut(row);
        let mut values: Vec<u8> = free.iter().map(|&col| cells[col]).collect();
        values.rotate_right(1);
        for (&col, value) in free.iter().zip(values) {
            cells[col] = value;
        }
    }
}

/// Refills the non-fixed cells of a row with a fresh shuffle of its missing
/// digits.
pub fn regeneration(
    individual: &mut Individual,
    fixed: &FixedMask,
    probability: f64,
    rng: &mut RandomNumberGenerator,
) {
    for row in 0..SIZE {
        if rng.chance(probability) {
            regenerate_row(individual.grid_mut().row_mut(row), fixed.row(row), rng);
        }
    }
}
