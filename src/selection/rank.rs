use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::roulette::spin;
use crate::selection::selection_strategy::{check_scores, SelectionStrategy};

/// Default linear ranking pressure.
pub const DEFAULT_SELECTION_PRESSURE: f64 = 1.5;

/// Linear rank-based selection for minimisation.
///
/// Individuals are ranked from worst (rank 0) to best (rank n-1) and picked
/// with probability `(2 - s)/n + 2*rank*(s - 1)/(n*(n - 1))`, where `s` is the
/// selection pressure in `[1, 2]`. Only the order of scores matters, so one
/// outlier cannot dominate the wheel.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RankBasedSelection {
    selection_pressure: f64,
}

impl RankBasedSelection {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `selection_pressure` is not in `[1.0, 2.0]`.
    pub fn new(selection_pressure: f64) -> Result<Self> {
        if !(1.0..=2.0).contains(&selection_pressure) {
            return Err(GeneticError::Configuration(
                "Selection pressure must be in the range [1.0, 2.0]".to_string(),
            ));
        }
        Ok(Self { selection_pressure })
    }

    pub fn selection_pressure(&self) -> f64 {
        self.selection_pressure
    }

    /// Cumulative selection probabilities in population order.
    pub fn calculate_probabilities(&self, fitness: &[f64]) -> Result<Vec<f64>> {
        check_scores(fitness)?;
        let n = fitness.len();
        if n == 1 {
            return Ok(vec![1.0]);
        }

        // worst first, so the best individual gets the highest rank
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));

        let mut rank_of = vec![0; n];
        for (rank, &idx) in indices.iter().enumerate() {
            rank_of[idx] = rank;
        }

        let s = self.selection_pressure;
        let n_f = n as f64;
        let mut cumulative = 0.0;
        let mut probs: Vec<f64> = rank_of
            .iter()
            .map(|&rank| {
                cumulative +=
                    (2.0 - s) / n_f + (2.0 * rank as f64 * (s - 1.0)) / (n_f * (n_f - 1.0));
                cumulative
            })
            .collect();

        if let Some(last) = probs.last_mut() {
            *last = 1.0;
        }
        Ok(probs)
    }
}

impl Default for RankBasedSelection {
    fn default() -> Self {
        Self {
            selection_pressure: DEFAULT_SELECTION_PRESSURE,
        }
    }
}

impl SelectionStrategy for RankBasedSelection {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn individual_probs(cumulative: &[f64]) -> Vec<f64> {
        let mut previous = 0.0;
        cumulative
            .iter()
            .map(|&c| {
                let p = c - previous;
                previous = c;
                p
            })
            .collect()
    }

    #[test]
    fn test_best_gets_highest_probability() {
        let selection = RankBasedSelection::new(2.0).unwrap();
        let probs = individual_probs(&selection.calculate_probabilities(&[3.0, 1.0, 2.0]).unwrap());
        // ranks: 3.0 -> 0, 2.0 -> 1, 1.0 -> 2
        assert!(probs[1] > probs[2]);
        assert!(probs[2] > probs[0]);
        assert!(probs[0].abs() < 1e-12);
    }

    #[test]
    fn test_pressure_one_is_uniform() {
        let selection = RankBasedSelection::new(1.0).unwrap();
        let probs = selection
            .calculate_probabilities(&[9.0, 1.0, 4.0, 2.0])
            .unwrap();
        let probs = individual_probs(&probs);
        for p in probs {
            assert!((p - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_individual() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        assert_eq!(RankBasedSelection::default().select_index(&[7.0], &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_invalid_pressure() {
        assert!(RankBasedSelection::new(0.5).is_err());
        assert!(RankBasedSelection::new(2.5).is_err());
    }

    #[test]
    fn test_selection_prefers_best() {
        let selection = RankBasedSelection::new(2.0).unwrap();
        let fitness = vec![50.0, 40.0, 30.0, 20.0, 10.0, 0.0];
        let mut rng = RandomNumberGenerator::from_seed(99);
        let picks = selection.select_indices(&fitness, 6_000, &mut rng).unwrap();
        let best = picks.iter().filter(|&&i| i == 5).count();
        let worst = picks.iter().filter(|&&i| i == 0).count();
        assert!(best > worst);
    }
}
