use rayon::prelude::*;
use tracing::{debug, info};

use super::options::{EvolutionOptions, LogLevel};
use crate::{
    breeding::Breeder,
    caching::with_cache,
    error::{GeneticError, OptionExt, Result},
    fitness::Challenge,
    grid::{FixedMask, Puzzle},
    individual::{initialize, Individual},
    rng::RandomNumberGenerator,
    selection::{SelectionStrategy, Selector},
    validation::ConflictMask,
};

/// Where a run stands.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionState {
    Running,
    /// An individual with fitness 0 was found.
    Converged,
    /// The generation cap was reached without a perfect individual.
    Exhausted,
}

/// The outcome of a run: the best individual and how the run ended.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionResult {
    /// The best individual found.
    pub individual: Individual,
    /// Its fitness score.
    pub score: f64,
    /// Number of generations bred before the run stopped.
    pub generations: usize,
    pub state: EvolutionState,
    /// Conflicts in the best individual, under the run's conflict scope.
    pub conflicts: ConflictMask,
}

impl EvolutionResult {
    pub fn is_solved(&self) -> bool {
        self.state == EvolutionState::Converged
    }
}

/// Runs the generational loop with the strategies chosen in its options.
pub struct EvolutionLauncher {
    options: EvolutionOptions,
    selector: Selector,
    breeder: Breeder,
    challenge: Box<dyn Challenge>,
}

impl EvolutionLauncher {
    /// Creates a launcher, rejecting invalid options before any work starts.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if [`EvolutionOptions::validate`]
    /// fails.
    pub fn new(options: EvolutionOptions) -> Result<Self> {
        options.validate()?;

        let selector = Selector::new(
            options.get_selection_method(),
            options.get_tournament_size(),
            options.get_rank_selection_pressure(),
        )?;
        let breeder = Breeder::new(
            options.get_crossover_method(),
            options.get_mutation_method(),
            options.get_crossover_probability(),
            options.get_mutation_probability(),
        );
        let challenge = with_cache(options.get_fitness_method(), options.get_cache_type());

        Ok(Self {
            options,
            selector,
            breeder,
            challenge,
        })
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    /// Evolves a population for `puzzle` until an individual scores 0 or the
    /// generation cap is reached.
    ///
    /// Hitting the cap is not an error: the best individual of the final
    /// population is returned with state `Exhausted`.
    ///
    /// # Errors
    ///
    /// Returns an error if scoring yields a non-finite value or an operator
    /// fails.
    ///
    /// # Performance
    ///
    /// Populations of at least `parallel_threshold` individuals are scored
    /// and bred with rayon. Each child draws from its own generator seeded
    /// off `rng`, so a given seed gives the same run either way.
    pub fn evolve(
        &self,
        puzzle: &Puzzle,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult> {
        let fixed = puzzle.fixed_mask();
        let max_generations = self.options.get_max_generations();

        info!(
            population_size = self.options.get_population_size(),
            max_generations,
            clues = fixed.clue_count(),
            crossover = %self.breeder.crossover(),
            mutation = %self.breeder.mutation(),
            selection = %self.selector.method(),
            fitness = %self.options.get_fitness_method(),
            "Starting evolution"
        );

        let mut population = initialize(puzzle, self.options.get_population_size(), rng)?;
        let mut generation = 0;
        let mut state = EvolutionState::Running;

        let (ranked, scores) = loop {
            let (ranked, scores) = self.evaluate(population)?;
            let best = scores
                .first()
                .copied()
                .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;

            self.log_generation(generation, &scores);

            if best == 0.0 {
                state = EvolutionState::Converged;
            } else if generation == max_generations {
                state = EvolutionState::Exhausted;
            }
            if state != EvolutionState::Running {
                break (ranked, scores);
            }

            population = self.next_generation(&ranked, &scores, fixed, rng)?;
            generation += 1;
        };

        let individual = ranked[0];
        let score = scores[0];
        let conflicts = self.options.get_conflict_scope().apply(individual.grid());

        info!(
            ?state,
            generations = generation,
            score,
            conflicts = conflicts.count(),
            "Evolution finished"
        );

        Ok(EvolutionResult {
            individual,
            score,
            generations: generation,
            state,
            conflicts,
        })
    }

    /// Scores `population` and sorts it ascending by fitness.
    ///
    /// Returns the sorted individuals and their scores in the same order.
    /// Ties keep their original relative order.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::FitnessCalculation` on a non-finite score and
    /// `GeneticError::EmptyPopulation` if `population` is empty.
    pub fn evaluate(&self, population: Vec<Individual>) -> Result<(Vec<Individual>, Vec<f64>)> {
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let score = |individual: &Individual| -> Result<f64> {
            let score = self.challenge.score(individual.grid());
            if !score.is_finite() {
                return Err(GeneticError::FitnessCalculation(format!(
                    "Non-finite fitness score encountered: {}",
                    score
                )));
            }
            Ok(score)
        };

        let scores: Vec<f64> = if population.len() >= self.options.get_parallel_threshold() {
            population.par_iter().map(score).collect::<Result<_>>()?
        } else {
            population.iter().map(score).collect::<Result<_>>()?
        };

        let mut scored: Vec<(Individual, f64)> = population.into_iter().zip(scores).collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(scored.into_iter().unzip())
    }

    /// Builds the next generation from a population sorted by [`evaluate`].
    ///
    /// The first `elite_count` individuals are copied unchanged. Every other
    /// slot holds a child of two parents picked by the run's selection
    /// strategy, crossed and then mutated.
    ///
    /// [`evaluate`]: EvolutionLauncher::evaluate
    pub fn next_generation(
        &self,
        ranked: &[Individual],
        scores: &[f64],
        fixed: &FixedMask,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Individual>> {
        let population_size = self.options.get_population_size();
        let elites = self.options.elite_count().min(ranked.len());
        let children = population_size.saturating_sub(elites);

        let parents = self.selector.select_indices(scores, 2 * children, rng)?;
        let seeds: Vec<u64> = (0..children).map(|_| rng.next_seed()).collect();

        let breed = |(pair, &seed): (&[usize], &u64)| -> Result<Individual> {
            let mut child_rng = RandomNumberGenerator::from_seed(seed);
            self.breeder
                .breed(&ranked[pair[0]], &ranked[pair[1]], fixed, &mut child_rng)
        };

        let parallel = population_size >= self.options.get_parallel_threshold();
        let offspring: Vec<Individual> = if parallel {
            parents
                .par_chunks_exact(2)
                .zip(seeds.par_iter())
                .map(breed)
                .collect::<Result<_>>()?
        } else {
            parents
                .chunks_exact(2)
                .zip(seeds.iter())
                .map(breed)
                .collect::<Result<_>>()?
        };

        let mut next = Vec::with_capacity(population_size);
        next.extend_from_slice(&ranked[..elites]);
        next.extend(offspring);
        Ok(next)
    }

    fn log_generation(&self, generation: usize, scores: &[f64]) {
        match self.options.get_log_level() {
            LogLevel::Minimal => {
                info!(generation, best_score = scores[0], "Generation complete");
            }
            LogLevel::Verbose => {
                info!(generation, best_score = scores[0], "Generation complete");
                for (rank, score) in scores.iter().enumerate() {
                    debug!(generation, rank, score, "Individual scored");
                }
            }
            LogLevel::None => {}
        }
    }
}

impl std::fmt::Debug for EvolutionLauncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvolutionLauncher")
            .field("options", &self.options)
            .field("selector", &self.selector)
            .field("breeder", &self.breeder)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breeding::{CrossoverMethod, MutationMethod};
    use crate::grid::Grid;

    fn solved() -> Grid {
        Grid::new(std::array::from_fn(|r| {
            std::array::from_fn(|c| ((r * 3 + r / 3 + c) % 9 + 1) as u8)
        }))
    }

    fn small_options() -> EvolutionOptions {
        EvolutionOptions::builder()
            .population_size(20)
            .max_generations(5)
            .build()
    }

    #[test]
    fn test_new_rejects_invalid_options() {
        let options = EvolutionOptions::builder().population_size(0).build();
        assert!(matches!(
            EvolutionLauncher::new(options),
            Err(GeneticError::Configuration(_))
        ));
    }

    #[test]
    fn test_evaluate_sorts_ascending() {
        let launcher = EvolutionLauncher::new(small_options()).unwrap();
        let puzzle = Puzzle::reference();
        let mut rng = RandomNumberGenerator::from_seed(3);
        let population = initialize(&puzzle, 20, &mut rng).unwrap();
        let (ranked, scores) = launcher.evaluate(population).unwrap();
        assert_eq!(ranked.len(), 20);
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_evaluate_empty_population() {
        let launcher = EvolutionLauncher::new(small_options()).unwrap();
        assert!(matches!(
            launcher.evaluate(Vec::new()),
            Err(GeneticError::EmptyPopulation)
        ));
    }

    #[test]
    fn test_next_generation_size_and_elites() {
        let launcher = EvolutionLauncher::new(small_options()).unwrap();
        let puzzle = Puzzle::reference();
        let mut rng = RandomNumberGenerator::from_seed(8);
        let population = initialize(&puzzle, 20, &mut rng).unwrap();
        let (ranked, scores) = launcher.evaluate(population).unwrap();

        let next = launcher
            .next_generation(&ranked, &scores, puzzle.fixed_mask(), &mut rng)
            .unwrap();
        assert_eq!(next.len(), 20);
        assert_eq!(next[..2], ranked[..2]);
        assert!(next.iter().all(|ind| ind.is_consistent_with(&puzzle)));
    }

    #[test]
    fn test_solved_population_converges_immediately() {
        // every cell a clue: the only individual is the solution
        let puzzle = Puzzle::new(*solved().cells()).unwrap();
        let launcher = EvolutionLauncher::new(small_options()).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(0);
        let result = launcher.evolve(&puzzle, &mut rng).unwrap();

        assert_eq!(result.state, EvolutionState::Converged);
        assert_eq!(result.generations, 0);
        assert_eq!(result.score, 0.0);
        assert!(result.is_solved());
        assert!(result.conflicts.is_clear());
        assert_eq!(result.individual.grid(), &solved());
    }

    #[test]
    fn test_one_blank_per_row_converges() {
        let mut cells = *solved().cells();
        for (r, row) in cells.iter_mut().enumerate() {
            row[r] = 0;
        }
        let puzzle = Puzzle::new(cells).unwrap();
        let launcher = EvolutionLauncher::new(small_options()).unwrap();
        let result = launcher
            .evolve(&puzzle, &mut RandomNumberGenerator::from_seed(1))
            .unwrap();
        assert_eq!(result.state, EvolutionState::Converged);
        assert_eq!(result.individual.grid(), &solved());
    }

    #[test]
    fn test_exhausted_run_reports_cap() {
        let options = EvolutionOptions::builder()
            .population_size(10)
            .max_generations(2)
            .crossover_method(CrossoverMethod::Alternating)
            .mutation_method(MutationMethod::Rotation)
            .build();
        let launcher = EvolutionLauncher::new(options).unwrap();
        let result = launcher
            .evolve(&Puzzle::reference(), &mut RandomNumberGenerator::from_seed(5))
            .unwrap();
        // two generations of ten cannot solve a 30-clue puzzle
        assert_eq!(result.state, EvolutionState::Exhausted);
        assert_eq!(result.generations, 2);
        assert!(result.score > 0.0);
    }
}
