//! Genetic Algorithm framework.
//!
//! A generic GA engine built on trait-based abstractions. A concrete
//! encoding defines its problem by implementing [`GaProblem`], which
//! specifies how to create, evaluate, recombine, and mutate individuals,
//! and whether fitness is minimized or maximized.
//!
//! # Core Traits
//!
//! - [`Individual`]: A candidate solution with associated fitness type
//! - [`GaProblem`]: Problem definition: direction, initialization, evaluation, operators
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, selection, presets)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Final optimization result with history and stop reason
//!
//! # Submodules
//!
//! - [`operators`]: Generic one-point crossover and swap mutation
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::{ConfigError, GaConfig};
pub use runner::{GaResult, GaRunner, GenerationStats, StopReason};
pub use selection::Selection;
pub use types::{Direction, Fitness, GaProblem, Individual};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates the deterministic generator that drives a whole run.
///
/// Every random decision of a run (initialization, selection, crossover,
/// mutation) draws from one generator, so equal seeds give equal runs.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
