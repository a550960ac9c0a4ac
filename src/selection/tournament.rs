use crate::error::{GeneticError, Result};
use crate::fitness::Challenge;
use crate::individual::Individual;
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{check_scores, SelectionStrategy};

/// Default number of contestants per tournament.
pub const DEFAULT_TOURNAMENT_SIZE: usize = 3;

/// Tournament selection: sample `tournament_size` distinct individuals and
/// keep the one with the lowest fitness.
///
/// Ties go to the contestant sampled first. Larger tournaments raise the
/// selection pressure; a tournament of 1 is uniform random selection.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentSelection {
    tournament_size: usize,
}

/// The outcome of one tournament.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contest {
    /// Index of the winner.
    pub winner: usize,
    /// Indices of every contestant, in sampling order.
    pub participants: Vec<usize>,
}

impl TournamentSelection {
    /// # Errors
    ///
    /// Returns an error if `tournament_size` is 0.
    pub fn new(tournament_size: usize) -> Result<Self> {
        if tournament_size < 1 {
            return Err(GeneticError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        Ok(Self { tournament_size })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    /// Runs one tournament over `fitness` and reports every contestant.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer individuals than `tournament_size` exist.
    pub fn contest(&self, fitness: &[f64], rng: &mut RandomNumberGenerator) -> Result<Contest> {
        check_scores(fitness)?;
        if fitness.len() < self.tournament_size {
            return Err(GeneticError::Selection(format!(
                "Tournament of {} needs at least that many individuals, got {}",
                self.tournament_size,
                fitness.len()
            )));
        }

        let participants = rng.sample_indices(fitness.len(), self.tournament_size)?;
        let mut winner = participants[0];
        for &idx in &participants[1..] {
            if fitness[idx] < fitness[winner] {
                winner = idx;
            }
        }

        Ok(Contest {
            winner,
            participants,
        })
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self {
            tournament_size: DEFAULT_TOURNAMENT_SIZE,
        }
    }
}

impl SelectionStrategy for TournamentSelection {
    fn select_index(&self, fitness: &[f64], rng: &mut RandomNumberGenerator) -> Result<usize> {
        Ok(self.contest(fitness, rng)?.winner)
    }
}

/// Runs one tournament of `k` over an unscored population, scoring only the
/// sampled contestants with `challenge`.
///
/// # Errors
///
/// Returns `GeneticError::Configuration` if `k` is 0 and
/// `GeneticError::Selection` if `k` exceeds the population size.
pub fn tournament<'a, C>(
    population: &'a [Individual],
    challenge: &C,
    k: usize,
    rng: &mut RandomNumberGenerator,
) -> Result<&'a Individual>
where
    C: Challenge + ?Sized,
{
    if k < 1 {
        return Err(GeneticError::Configuration(
            "Tournament size must be at least 1".to_string(),
        ));
    }
    if population.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    let participants = rng.sample_indices(population.len(), k)?;

    let mut best = participants[0];
    let mut best_score = challenge.score(population[best].grid());
    for &idx in &participants[1..] {
        let score = challenge.score(population[idx].grid());
        if score < best_score {
            best = idx;
            best_score = score;
        }
    }
    Ok(&population[best])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::FitnessMethod;
    use crate::grid::Puzzle;
    use crate::individual::initialize;

    #[test]
    fn test_tournament_selection_returns_valid_index() {
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let mut rng = RandomNumberGenerator::from_seed(42);
        let selection = TournamentSelection::default();
        for _ in 0..100 {
            assert!(selection.select_index(&fitness, &mut rng).unwrap() < fitness.len());
        }
    }

    #[test]
    fn test_full_tournament_picks_global_minimum() {
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let mut rng = RandomNumberGenerator::from_seed(1);
        let selection = TournamentSelection::new(5).unwrap();
        assert_eq!(selection.select_index(&fitness, &mut rng).unwrap(), 4);
    }

    #[test]
    fn test_contest_participants_are_distinct() {
        let fitness: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let mut rng = RandomNumberGenerator::from_seed(2);
        let selection = TournamentSelection::new(4).unwrap();
        for _ in 0..200 {
            let contest = selection.contest(&fitness, &mut rng).unwrap();
            let mut sorted = contest.participants.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), 4);
            assert!(contest.participants.contains(&contest.winner));
        }
    }

    #[test]
    fn test_ties_go_to_first_sampled() {
        let fitness = vec![1.0; 6];
        let mut rng = RandomNumberGenerator::from_seed(3);
        let selection = TournamentSelection::default();
        for _ in 0..50 {
            let contest = selection.contest(&fitness, &mut rng).unwrap();
            assert_eq!(contest.winner, contest.participants[0]);
        }
    }

    #[test]
    fn test_tournament_too_small_population() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        let selection = TournamentSelection::default();
        assert!(selection.select_index(&[1.0, 2.0], &mut rng).is_err());
    }

    #[test]
    fn test_tournament_empty_population() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        let selection = TournamentSelection::default();
        assert!(matches!(
            selection.select_index(&[], &mut rng),
            Err(GeneticError::EmptyPopulation)
        ));
    }

    #[test]
    fn test_tournament_invalid_size() {
        assert!(TournamentSelection::new(0).is_err());
    }

    #[test]
    fn test_tournament_rejects_nan() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        let selection = TournamentSelection::new(1).unwrap();
        assert!(matches!(
            selection.select_index(&[1.0, f64::NAN], &mut rng),
            Err(GeneticError::FitnessCalculation(_))
        ));
    }

    #[test]
    fn test_select_mismatched_lengths() {
        let puzzle = Puzzle::reference();
        let mut rng = RandomNumberGenerator::from_seed(0);
        let population = initialize(&puzzle, 3, &mut rng).unwrap();
        let selection = TournamentSelection::default();
        assert!(selection.select(&population, &[1.0], &mut rng).is_err());
    }

    #[test]
    fn test_unscored_tournament_matches_fitness() {
        let puzzle = Puzzle::reference();
        let mut rng = RandomNumberGenerator::from_seed(6);
        let population = initialize(&puzzle, 10, &mut rng).unwrap();
        let winner = tournament(&population, &FitnessMethod::Simple, 10, &mut rng).unwrap();
        let best = population
            .iter()
            .map(|ind| FitnessMethod::Simple.score(ind.grid()))
            .fold(f64::INFINITY, f64::min);
        assert_eq!(FitnessMethod::Simple.score(winner.grid()), best);
    }

    #[test]
    fn test_unscored_tournament_rejects_zero_size() {
        let puzzle = Puzzle::reference();
        let mut rng = RandomNumberGenerator::from_seed(7);
        let population = initialize(&puzzle, 4, &mut rng).unwrap();
        assert!(matches!(
            tournament(&population, &FitnessMethod::Simple, 0, &mut rng),
            Err(GeneticError::Configuration(_))
        ));
        assert!(matches!(
            tournament(&population, &FitnessMethod::Simple, 5, &mut rng),
            Err(GeneticError::Selection(_))
        ));
        assert!(tournament(&population, &FitnessMethod::Simple, 1, &mut rng).is_ok());
    }
}
