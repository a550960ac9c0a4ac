pub mod launcher;
pub mod options;

pub use launcher::{EvolutionLauncher, EvolutionResult, EvolutionState};
pub use options::{parse_strategy, EvolutionOptions, EvolutionOptionsBuilder, LogLevel};
