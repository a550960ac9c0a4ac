//! # Breeding
//!
//! A child is made by crossing two selected parents and then mutating the
//! result. [`Breeder`] bundles the operators and probabilities chosen for a
//! run.

pub mod crossover;
pub mod mutation;

pub use crossover::CrossoverMethod;
pub use mutation::MutationMethod;

use crate::error::Result;
use crate::grid::FixedMask;
use crate::individual::Individual;
use crate::rng::RandomNumberGenerator;

/// Crossover followed by mutation, with the probabilities for each.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breeder {
    crossover: CrossoverMethod,
    mutation: MutationMethod,
    crossover_probability: f64,
    mutation_probability: f64,
}

impl Breeder {
    pub fn new(
        crossover: CrossoverMethod,
        mutation: MutationMethod,
        crossover_probability: f64,
        mutation_probability: f64,
    ) -> Self {
        Self {
            crossover,
            mutation,
            crossover_probability,
            mutation_probability,
        }
    }

    pub fn crossover(&self) -> CrossoverMethod {
        self.crossover
    }

    pub fn mutation(&self) -> MutationMethod {
        self.mutation
    }

    /// Breeds one child from `p1` and `p2`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Breeding` if an operator cannot complete a row.
    pub fn breed(
        &self,
        p1: &Individual,
        p2: &Individual,
        fixed: &FixedMask,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Individual> {
        let mut child = self
            .crossover
            .crossover(p1, p2, fixed, self.crossover_probability, rng)?;
        self.mutation
            .mutate(&mut child, fixed, self.mutation_probability, rng)?;
        Ok(child)
    }
}

impl Default for Breeder {
    fn default() -> Self {
        Self::new(CrossoverMethod::default(), MutationMethod::default(), 0.9, 0.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Puzzle;
    use strum::IntoEnumIterator;

    #[test]
    fn test_breed_every_combination() {
        let puzzle = Puzzle::reference();
        let mut rng = RandomNumberGenerator::from_seed(55);
        for crossover in CrossoverMethod::iter() {
            for mutation in MutationMethod::iter() {
                let breeder = Breeder::new(crossover, mutation, 0.9, 0.5);
                for _ in 0..50 {
                    let p1 = Individual::random(&puzzle, &mut rng);
                    let p2 = Individual::random(&puzzle, &mut rng);
                    let child = breeder.breed(&p1, &p2, puzzle.fixed_mask(), &mut rng).unwrap();
                    assert!(child.is_consistent_with(&puzzle));
                }
            }
        }
    }

    #[test]
    fn test_breed_is_reproducible() {
        let puzzle = Puzzle::reference();
        let mut setup = RandomNumberGenerator::from_seed(1);
        let p1 = Individual::random(&puzzle, &mut setup);
        let p2 = Individual::random(&puzzle, &mut setup);
        let breeder = Breeder::new(CrossoverMethod::Pmx, MutationMethod::Swap, 0.9, 0.3);

        let a = breeder
            .breed(&p1, &p2, puzzle.fixed_mask(), &mut RandomNumberGenerator::from_seed(9))
            .unwrap();
        let b = breeder
            .breed(&p1, &p2, puzzle.fixed_mask(), &mut RandomNumberGenerator::from_seed(9))
            .unwrap();
        assert_eq!(a, b);
    }
}
