use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{check_scores, SelectionStrategy};

/// Roulette wheel (fitness proportionate) selection for minimisation.
///
/// Scores are inverted to weights `max - f + 1`, so the best individual has
/// the largest slice and the worst still keeps a slice of weight 1.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouletteWheelSelection;

impl RouletteWheelSelection {
    pub fn new() -> Self {
        Self
    }

    /// Cumulative selection probabilities; the last entry is exactly 1.0.
    pub fn calculate_probabilities(&self, fitness: &[f64]) -> Result<Vec<f64>> {
        check_scores(fitness)?;

        let max_fitness = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let weights: Vec<f64> = fitness.iter().map(|&f| max_fitness - f + 1.0).collect();
        let sum: f64 = weights.iter().sum();

        let mut cumulative = 0.0;
        let mut probs: Vec<f64> = weights
            .iter()
            .map(|w| {
                cumulative += w / sum;
                cumulative
            })
            .collect();

        if let Some(last) = probs.last_mut() {
            *last = 1.0;
        }
        Ok(probs)
    }
}

/// Index of the first cumulative probability at or above a uniform draw.
pub(crate) fn spin(cumulative_probs: &[f64], rng: &mut RandomNumberGenerator) -> usize {
    let r = rng.unit();
    cumulative_probs
        .iter()
        .position(|&p| r <= p)
        .unwrap_or(cumulative_probs.len() - 1)
}

impl SelectionStrategy for RouletteWheelSelection {
    fn select_index(&self, fitness: &[f64], rng: &mut RandomNumberGenerator) -> Result<usize> {
        let probs = self.calculate_probabilities(fitness)?;
        Ok(spin(&probs, rng))
    }

    fn select_indices(
        &self,
        fitness: &[f64],
        count: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        let probs = self.calculate_probabilities(fitness)?;
        Ok((0..count).map(|_| spin(&probs, rng)).collect())
    }
}
