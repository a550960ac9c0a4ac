//! # Parent Selection
//!
//! Three interchangeable strategies pick parents from a scored generation:
//! tournament, roulette wheel and linear ranking. A run picks one through
//! [`SelectionMethod`] and holds it for every generation.

pub mod rank;
pub mod roulette;
pub mod selection_strategy;
pub mod tournament;

use strum::{Display, EnumIter, EnumString};

pub use rank::RankBasedSelection;
pub use roulette::RouletteWheelSelection;
pub use selection_strategy::SelectionStrategy;
pub use tournament::{tournament, Contest, TournamentSelection};

use crate::error::Result;
use crate::rng::RandomNumberGenerator;

/// The selection strategy used for a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SelectionMethod {
    #[default]
    Tournament,
    Roulette,
    #[strum(to_string = "ranking", serialize = "rank")]
    Ranking,
}

/// A configured selection strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Tournament(TournamentSelection),
    Roulette(RouletteWheelSelection),
    Ranking(RankBasedSelection),
}

impl Selector {
    /// Builds the strategy for `method`. `tournament_size` and
    /// `selection_pressure` only apply to the method that uses them.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if the parameter the chosen
    /// method uses is out of range.
    pub fn new(
        method: SelectionMethod,
        tournament_size: usize,
        selection_pressure: f64,
    ) -> Result<Self> {
        Ok(match method {
            SelectionMethod::Tournament => {
                Selector::Tournament(TournamentSelection::new(tournament_size)?)
            }
            SelectionMethod::Roulette => Selector::Roulette(RouletteWheelSelection::new()),
            SelectionMethod::Ranking => {
                Selector::Ranking(RankBasedSelection::new(selection_pressure)?)
            }
        })
    }

    pub fn method(&self) -> SelectionMethod {
        match self {
            Selector::Tournament(_) => SelectionMethod::Tournament,
            Selector::Roulette(_) => SelectionMethod::Roulette,
            Selector::Ranking(_) => SelectionMethod::Ranking,
        }
    }

    fn strategy(&self) -> &dyn SelectionStrategy {
        match self {
            Selector::Tournament(s) => s,
            Selector::Roulette(s) => s,
            Selector::Ranking(s) => s,
        }
    }
}

impl SelectionStrategy for Selector {
    fn select_index(&self, fitness: &[f64], rng: &mut RandomNumberGenerator) -> Result<usize> {
        self.strategy().select_index(fitness, rng)
    }

    fn select_indices(
        &self,
        fitness: &[f64],
        count: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        self.strategy().select_indices(fitness, count, rng)
    }
}
