use std::fmt::Debug;

use crate::error::{GeneticError, Result};
use crate::individual::Individual;
use crate::rng::RandomNumberGenerator;

/// Trait for parent selection strategies.
///
/// Fitness is always lower-is-better. Strategies work on scores and return
/// indices into the scored population, which lets the caller score a
/// generation once and select many parents from it.
///
/// # Examples
///
/// ```
/// use sudoku_genalg::rng::RandomNumberGenerator;
/// use sudoku_genalg::selection::{SelectionStrategy, TournamentSelection};
///
/// let fitness = vec![5.0, 1.0, 3.0, 4.0];
/// let mut rng = RandomNumberGenerator::from_seed(3);
///
/// let selection = TournamentSelection::new(4).unwrap();
/// assert_eq!(selection.select_index(&fitness, &mut rng).unwrap(), 1);
/// ```
pub trait SelectionStrategy: Debug + Send + Sync {
    /// Picks the index of one parent.
    ///
    /// # Errors
    ///
    /// Returns an error if `fitness` is empty or too small for the strategy,
    /// or if it holds a non-finite score.
    fn select_index(&self, fitness: &[f64], rng: &mut RandomNumberGenerator) -> Result<usize>;

    /// Picks `count` parent indices, independently and with replacement.
    fn select_indices(
        &self,
        fitness: &[f64],
        count: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        (0..count).map(|_| self.select_index(fitness, rng)).collect()
    }

    /// Picks one parent from `population`, whose scores are `fitness`.
    fn select<'a>(
        &self,
        population: &'a [Individual],
        fitness: &[f64],
        rng: &mut RandomNumberGenerator,
    ) -> Result<&'a Individual> {
        check_lengths(population.len(), fitness.len())?;
        let index = self.select_index(fitness, rng)?;
        Ok(&population[index])
    }
}

pub(crate) fn check_lengths(population: usize, fitness: usize) -> Result<()> {
    if population == 0 {
        return Err(GeneticError::EmptyPopulation);
    }
    if fitness != population {
        return Err(GeneticError::Selection(format!(
            "Fitness vector length ({}) doesn't match population length ({})",
            fitness, population
        )));
    }
    Ok(())
}

pub(crate) fn check_scores(fitness: &[f64]) -> Result<()> {
    if fitness.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    if let Some(score) = fitness.iter().find(|score| !score.is_finite()) {
        return Err(GeneticError::FitnessCalculation(format!(
            "Non-finite fitness score encountered: {}",
            score
        )));
    }
    Ok(())
}
