//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds every parameter of a solver run: the
//! population size, the generation cap, the operator probabilities and
//! elitism fraction, the strategy picked for each stage, and the logging,
//! parallelism and caching knobs.
//!
//! ## Example
//!
//! ```rust
//! use sudoku_genalg::breeding::CrossoverMethod;
//! use sudoku_genalg::evolution::options::{EvolutionOptions, LogLevel};
//!
//! let options = EvolutionOptions::builder()
//!     .population_size(50)
//!     .max_generations(200)
//!     .crossover_method(CrossoverMethod::Pmx)
//!     .log_level(LogLevel::Minimal)
//!     .build();
//!
//! assert!(options.validate().is_ok());
//! assert_eq!(EvolutionOptions::default().get_population_size(), 300);
//! ```
//!
//! Strategy names coming from text go through [`parse_strategy`], which turns
//! an unknown name into `GeneticError::UnsupportedStrategy`:
//!
//! ```rust
//! use sudoku_genalg::breeding::MutationMethod;
//! use sudoku_genalg::evolution::options::parse_strategy;
//!
//! let method: MutationMethod = parse_strategy("mutation", "rotation").unwrap();
//! assert_eq!(method, MutationMethod::Rotation);
//! assert!(parse_strategy::<MutationMethod>("mutation", "inversion").is_err());
//! ```

use std::str::FromStr;

use crate::breeding::{CrossoverMethod, MutationMethod};
use crate::caching::CacheType;
use crate::error::{GeneticError, Result};
use crate::fitness::FitnessMethod;
use crate::selection::rank::DEFAULT_SELECTION_PRESSURE;
use crate::selection::tournament::DEFAULT_TOURNAMENT_SIZE;
use crate::selection::SelectionMethod;
use crate::validation::ConflictScope;

const DEFAULT_POPULATION_SIZE: usize = 300;
const DEFAULT_MAX_GENERATIONS: usize = 1000;
const DEFAULT_CROSSOVER_PROBABILITY: f64 = 0.9;
const DEFAULT_MUTATION_PROBABILITY: f64 = 0.3;
const DEFAULT_ELITISM_FRACTION: f64 = 0.1;
const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// A summary line per generation plus every individual's score.
    Verbose,
    /// A summary line per generation.
    Minimal,
    #[default]
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOptions {
    population_size: usize,
    max_generations: usize,
    crossover_probability: f64,
    mutation_probability: f64,
    elitism_fraction: f64,
    selection_method: SelectionMethod,
    tournament_size: usize,
    rank_selection_pressure: f64,
    crossover_method: CrossoverMethod,
    mutation_method: MutationMethod,
    fitness_method: FitnessMethod,
    log_level: LogLevel,
    /// Minimum population size at which scoring and breeding run in parallel
    parallel_threshold: usize,
    cache_type: Option<CacheType>,
    conflict_scope: ConflictScope,
}

impl EvolutionOptions {
    /// Creates options with the given core parameters and defaults elsewhere.
    pub fn new(
        population_size: usize,
        max_generations: usize,
        crossover_probability: f64,
        mutation_probability: f64,
        elitism_fraction: f64,
    ) -> Self {
        Self {
            population_size,
            max_generations,
            crossover_probability,
            mutation_probability,
            elitism_fraction,
            ..Self::default()
        }
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_max_generations(&self) -> usize {
        self.max_generations
    }

    pub fn get_crossover_probability(&self) -> f64 {
        self.crossover_probability
    }

    pub fn get_mutation_probability(&self) -> f64 {
        self.mutation_probability
    }

    pub fn get_elitism_fraction(&self) -> f64 {
        self.elitism_fraction
    }

    pub fn get_selection_method(&self) -> SelectionMethod {
        self.selection_method
    }

    pub fn get_tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn get_rank_selection_pressure(&self) -> f64 {
        self.rank_selection_pressure
    }

    pub fn get_crossover_method(&self) -> CrossoverMethod {
        self.crossover_method
    }

    pub fn get_mutation_method(&self) -> MutationMethod {
        self.mutation_method
    }

    pub fn get_fitness_method(&self) -> FitnessMethod {
        self.fitness_method
    }

    pub fn get_log_level(&self) -> &LogLevel {
        &self.log_level
    }

    /// Returns the minimum population size processed in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn get_cache_type(&self) -> Option<CacheType> {
        self.cache_type
    }

    pub fn get_conflict_scope(&self) -> ConflictScope {
        self.conflict_scope
    }

    /// Number of individuals carried unchanged into the next generation:
    /// `max(1, floor(elitism_fraction * population_size))`, never more than
    /// the population.
    pub fn elite_count(&self) -> usize {
        let elites = (self.elitism_fraction * self.population_size as f64).floor() as usize;
        elites.max(1).min(self.population_size)
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_max_generations(&mut self, max_generations: usize) {
        self.max_generations = max_generations;
    }

    pub fn set_crossover_probability(&mut self, probability: f64) {
        self.crossover_probability = probability;
    }

    pub fn set_mutation_probability(&mut self, probability: f64) {
        self.mutation_probability = probability;
    }

    pub fn set_elitism_fraction(&mut self, fraction: f64) {
        self.elitism_fraction = fraction;
    }

    pub fn set_selection_method(&mut self, method: SelectionMethod) {
        self.selection_method = method;
    }

    pub fn set_tournament_size(&mut self, size: usize) {
        self.tournament_size = size;
    }

    pub fn set_rank_selection_pressure(&mut self, pressure: f64) {
        self.rank_selection_pressure = pressure;
    }

    pub fn set_crossover_method(&mut self, method: CrossoverMethod) {
        self.crossover_method = method;
    }

    pub fn set_mutation_method(&mut self, method: MutationMethod) {
        self.mutation_method = method;
    }

    pub fn set_fitness_method(&mut self, method: FitnessMethod) {
        self.fitness_method = method;
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    pub fn set_cache_type(&mut self, cache_type: Option<CacheType>) {
        self.cache_type = cache_type;
    }

    pub fn set_conflict_scope(&mut self, scope: ConflictScope) {
        self.conflict_scope = scope;
    }

    /// Checks every numeric parameter against its domain.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` naming the first parameter out of
    /// range.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(GeneticError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }
        if self.max_generations == 0 {
            return Err(GeneticError::Configuration(
                "Maximum number of generations cannot be zero".to_string(),
            ));
        }

        check_unit_interval("Crossover probability", self.crossover_probability)?;
        check_unit_interval("Mutation probability", self.mutation_probability)?;
        check_unit_interval("Elitism fraction", self.elitism_fraction)?;

        if self.tournament_size == 0 {
            return Err(GeneticError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        if self.tournament_size > self.population_size {
            return Err(GeneticError::Configuration(format!(
                "Tournament size {} exceeds population size {}",
                self.tournament_size, self.population_size
            )));
        }
        if !(1.0..=2.0).contains(&self.rank_selection_pressure) {
            return Err(GeneticError::Configuration(format!(
                "Rank selection pressure must be in [1, 2], got {}",
                self.rank_selection_pressure
            )));
        }
        Ok(())
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    // NaN fails `contains`
    if !(0.0..=1.0).contains(&value) {
        return Err(GeneticError::Configuration(format!(
            "{} must be in [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            max_generations: DEFAULT_MAX_GENERATIONS,
            crossover_probability: DEFAULT_CROSSOVER_PROBABILITY,
            mutation_probability: DEFAULT_MUTATION_PROBABILITY,
            elitism_fraction: DEFAULT_ELITISM_FRACTION,
            selection_method: SelectionMethod::default(),
            tournament_size: DEFAULT_TOURNAMENT_SIZE,
            rank_selection_pressure: DEFAULT_SELECTION_PRESSURE,
            crossover_method: CrossoverMethod::default(),
            mutation_method: MutationMethod::default(),
            fitness_method: FitnessMethod::default(),
            log_level: LogLevel::None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            cache_type: None,
            conflict_scope: ConflictScope::default(),
        }
    }
}

/// Parses a strategy name such as `"pmx"` or `"tournament"`.
///
/// Matching is case-insensitive. `kind` names the strategy family in the
/// error.
///
/// # Errors
///
/// Returns `GeneticError::UnsupportedStrategy` if `value` names no variant.
pub fn parse_strategy<T>(kind: &'static str, value: &str) -> Result<T>
where
    T: FromStr<Err = strum::ParseError>,
{
    value
        .trim()
        .parse()
        .map_err(|_| GeneticError::UnsupportedStrategy {
            kind,
            value: value.to_string(),
        })
}

/// Builder for `EvolutionOptions`.
///
/// Provides a fluent interface for constructing `EvolutionOptions` instances.
/// Unset fields take their defaults.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    population_size: Option<usize>,
    max_generations: Option<usize>,
    crossover_probability: Option<f64>,
    mutation_probability: Option<f64>,
    elitism_fraction: Option<f64>,
    selection_method: Option<SelectionMethod>,
    tournament_size: Option<usize>,
    rank_selection_pressure: Option<f64>,
    crossover_method: Option<CrossoverMethod>,
    mutation_method: Option<MutationMethod>,
    fitness_method: Option<FitnessMethod>,
    log_level: Option<LogLevel>,
    parallel_threshold: Option<usize>,
    cache_type: Option<CacheType>,
    conflict_scope: Option<ConflictScope>,
}

impl EvolutionOptionsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn max_generations(mut self, value: usize) -> Self {
        self.max_generations = Some(value);
        self
    }

    pub fn crossover_probability(mut self, value: f64) -> Self {
        self.crossover_probability = Some(value);
        self
    }

    pub fn mutation_probability(mut self, value: f64) -> Self {
        self.mutation_probability = Some(value);
        self
    }

    pub fn elitism_fraction(mut self, value: f64) -> Self {
        self.elitism_fraction = Some(value);
        self
    }

    pub fn selection_method(mut self, value: SelectionMethod) -> Self {
        self.selection_method = Some(value);
        self
    }

    pub fn tournament_size(mut self, value: usize) -> Self {
        self.tournament_size = Some(value);
        self
    }

    pub fn rank_selection_pressure(mut self, value: f64) -> Self {
        self.rank_selection_pressure = Some(value);
        self
    }

    pub fn crossover_method(mut self, value: CrossoverMethod) -> Self {
        self.crossover_method = Some(value);
        self
    }

    pub fn mutation_method(mut self, value: MutationMethod) -> Self {
        self.mutation_method = Some(value);
        self
    }

    pub fn fitness_method(mut self, value: FitnessMethod) -> Self {
        self.fitness_method = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    /// Enables fitness caching of the given kind.
    pub fn cache_type(mut self, value: CacheType) -> Self {
        self.cache_type = Some(value);
        self
    }

    pub fn conflict_scope(mut self, value: ConflictScope) -> Self {
        self.conflict_scope = Some(value);
        self
    }

    /// Builds the `EvolutionOptions` instance. Call
    /// [`EvolutionOptions::validate`] before running with it.
    pub fn build(self) -> EvolutionOptions {
        let defaults = EvolutionOptions::default();
        EvolutionOptions {
            population_size: self.population_size.unwrap_or(defaults.population_size),
            max_generations: self.max_generations.unwrap_or(defaults.max_generations),
            crossover_probability: self
                .crossover_probability
                .unwrap_or(defaults.crossover_probability),
            mutation_probability: self
                .mutation_probability
                .unwrap_or(defaults.mutation_probability),
            elitism_fraction: self.elitism_fraction.unwrap_or(defaults.elitism_fraction),
            selection_method: self.selection_method.unwrap_or(defaults.selection_method),
            tournament_size: self.tournament_size.unwrap_or(defaults.tournament_size),
            rank_selection_pressure: self
                .rank_selection_pressure
                .unwrap_or(defaults.rank_selection_pressure),
            crossover_method: self.crossover_method.unwrap_or(defaults.crossover_method),
            mutation_method: self.mutation_method.unwrap_or(defaults.mutation_method),
            fitness_method: self.fitness_method.unwrap_or(defaults.fitness_method),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            parallel_threshold: self.parallel_threshold.unwrap_or(defaults.parallel_threshold),
            cache_type: self.cache_type.or(defaults.cache_type),
            conflict_scope: self.conflict_scope.unwrap_or(defaults.conflict_scope),
        }
    }
}
