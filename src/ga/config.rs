//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::selection::Selection;

/// An invalid [`GaConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population_size must be at least 2, got {0}")]
    PopulationTooSmall(usize),

    #[error("max_generations must be at least 1")]
    NoGenerations,

    #[error("elite_ratio {0} leaves no room for offspring")]
    EliteTooHigh(f64),

    #[error("tournament size must be at least 1")]
    EmptyTournament,

    #[error("convergence_threshold must be non-negative, got {0}")]
    NegativeThreshold(f64),

    #[error("time_limit_ms must be positive or None")]
    ZeroTimeLimit,
}

/// Configuration for the Genetic Algorithm.
///
/// Controls population size, selection strategy, operator rates,
/// termination conditions, and parallelism.
///
/// # Defaults
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.max_generations, 1000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(80)
///     .with_selection(Selection::Tournament(3))
///     .with_elite_ratio(0.15)
///     .with_mutation_rate(0.2);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of timetables in the population.
    ///
    /// Typical range: 30–80.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Selection strategy for choosing parents.
    pub selection: Selection,

    /// Fraction of the population carried unchanged into the next generation
    /// (0.0–1.0). At least one elite survives whenever the ratio is positive.
    ///
    /// Typical range: 0.10–0.15.
    pub elite_ratio: f64,

    /// Probability of recombining a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, the children are copies of the parents.
    pub crossover_rate: f64,

    /// Mutation rate (0.0–1.0), interpreted by the encoding: per gene for
    /// list genomes, scaled by grid size for grid genomes.
    pub mutation_rate: f64,

    /// Number of consecutive generations without strict improvement of the
    /// run-best fitness before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination.
    pub stagnation_limit: usize,

    /// Minimum relative improvement to reset the stagnation counter.
    ///
    /// A new run-best always replaces the old one, but if
    /// `|old - new| / |old|` is below this threshold the generation still
    /// counts as stagnating. Set to 0.0 to count any improvement (default).
    pub convergence_threshold: f64,

    /// Whether to evaluate a generation in parallel.
    ///
    /// Has an effect only when the crate is built with the `parallel`
    /// feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked at the start of each generation, so a run may exceed the
    /// limit by one generation's worth of work. `None` disables it.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 1000,
            selection: Selection::default(),
            elite_ratio: 0.1,
            crossover_rate: 0.8,
            mutation_rate: 0.15,
            stagnation_limit: 50,
            convergence_threshold: 0.0,
            parallel: false,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Convenience builder for setting tournament size.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    /// Sets the elite ratio.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the convergence threshold.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold.max(0.0);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Number of elites kept each generation.
    pub fn elite_count(&self) -> usize {
        if self.elite_ratio <= 0.0 {
            return 0;
        }
        ((self.population_size as f64 * self.elite_ratio) as usize).max(1)
    }

    /// Preset for quick drafts: small population, few generations.
    ///
    /// - Population: 30, Generations: 150, Time limit: 5s
    /// - Stagnation limit: 30
    pub fn fast() -> Self {
        Self {
            population_size: 30,
            max_generations: 150,
            stagnation_limit: 30,
            time_limit_ms: Some(5_000),
            ..Self::default()
        }
    }

    /// Preset balancing quality and run time.
    ///
    /// - Population: 50, Generations: 500, Time limit: 20s
    /// - Stagnation limit: 60
    pub fn balanced() -> Self {
        Self {
            population_size: 50,
            max_generations: 500,
            stagnation_limit: 60,
            time_limit_ms: Some(20_000),
            ..Self::default()
        }
    }

    /// Preset for final timetables: large population, many generations.
    ///
    /// - Population: 80, Generations: 1000, Time limit: 60s
    /// - Stagnation limit: 100, Elite ratio: 0.15
    pub fn quality() -> Self {
        Self {
            population_size: 80,
            max_generations: 1000,
            stagnation_limit: 100,
            elite_ratio: 0.15,
            time_limit_ms: Some(60_000),
            ..Self::default()
        }
    }

    /// Selects a preset from the number of lessons to place.
    ///
    /// - `lesson_count < 20` → [`fast()`](Self::fast)
    /// - `20 ≤ lesson_count < 80` → [`balanced()`](Self::balanced)
    /// - `lesson_count ≥ 80` → [`quality()`](Self::quality)
    pub fn auto_select(lesson_count: usize) -> Self {
        if lesson_count < 20 {
            Self::fast()
        } else if lesson_count < 80 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if self.max_generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if self.elite_count() >= self.population_size {
            return Err(ConfigError::EliteTooHigh(self.elite_ratio));
        }
        if self.selection == Selection::Tournament(0) {
            return Err(ConfigError::EmptyTournament);
        }
        if self.convergence_threshold < 0.0 {
            return Err(ConfigError::NegativeThreshold(self.convergence_threshold));
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 50);
        assert_eq!(config.max_generations, 1000);
        assert_eq!(config.selection, Selection::Tournament(3));
        assert!((config.elite_ratio - 0.1).abs() < 1e-10);
        assert!((config.crossover_rate - 0.8).abs() < 1e-10);
        assert!((config.mutation_rate - 0.15).abs() < 1e-10);
        assert_eq!(config.stagnation_limit, 50);
        assert!(!config.parallel);
        assert!(config.seed.is_none());
        assert!(config.time_limit_ms.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(80)
            .with_max_generations(300)
            .with_tournament_size(4)
            .with_elite_ratio(0.15)
            .with_crossover_rate(0.7)
            .with_mutation_rate(0.2)
            .with_stagnation_limit(30)
            .with_parallel(true)
            .with_seed(7);

        assert_eq!(config.population_size, 80);
        assert_eq!(config.max_generations, 300);
        assert_eq!(config.selection, Selection::Tournament(4));
        assert!((config.elite_ratio - 0.15).abs() < 1e-10);
        assert!((config.crossover_rate - 0.7).abs() < 1e-10);
        assert!((config.mutation_rate - 0.2).abs() < 1e-10);
        assert_eq!(config.stagnation_limit, 30);
        assert!(config.parallel);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::default()
            .with_elite_ratio(1.5)
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0)
            .with_convergence_threshold(-1.0);

        assert!((config.elite_ratio - 1.0).abs() < 1e-10);
        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
        assert!((config.convergence_threshold - 0.0).abs() < 1e-15);
    }

    // ---- elite count ----

    #[test]
    fn test_elite_count_floor_with_minimum_one() {
        let config = GaConfig::default().with_population_size(50).with_elite_ratio(0.15);
        assert_eq!(config.elite_count(), 7);

        let config = GaConfig::default().with_population_size(5).with_elite_ratio(0.1);
        assert_eq!(config.elite_count(), 1);

        let config = GaConfig::default().with_elite_ratio(0.0);
        assert_eq!(config.elite_count(), 0);
    }

    // ---- validation ----

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::default().with_population_size(1);
        assert_eq!(config.validate(), Err(ConfigError::PopulationTooSmall(1)));
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = GaConfig::default().with_max_generations(0);
        assert_eq!(config.validate(), Err(ConfigError::NoGenerations));
    }

    #[test]
    fn test_validate_elite_too_high() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_elite_ratio(1.0);
        assert_eq!(config.validate(), Err(ConfigError::EliteTooHigh(1.0)));
    }

    #[test]
    fn test_validate_empty_tournament() {
        let config = GaConfig::default().with_tournament_size(0);
        assert_eq!(config.validate(), Err(ConfigError::EmptyTournament));
    }

    #[test]
    fn test_validate_zero_time_limit() {
        let config = GaConfig::default().with_time_limit_ms(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeLimit));
        assert!(GaConfig::default().with_time_limit_ms(1).validate().is_ok());
    }

    // ---- presets ----

    #[test]
    fn test_presets_are_valid() {
        for config in [GaConfig::fast(), GaConfig::balanced(), GaConfig::quality()] {
            assert!(config.validate().is_ok(), "{config:?}");
            assert!(config.time_limit_ms.is_some());
        }
        assert_eq!(GaConfig::fast().population_size, 30);
        assert_eq!(GaConfig::quality().stagnation_limit, 100);
    }

    #[test]
    fn test_auto_select_boundaries() {
        assert_eq!(GaConfig::auto_select(19).population_size, 30);
        assert_eq!(GaConfig::auto_select(20).population_size, 50);
        assert_eq!(GaConfig::auto_select(79).max_generations, 500);
        assert_eq!(GaConfig::auto_select(80).population_size, 80);
    }

    #[test]
    fn test_preset_chainable() {
        let config = GaConfig::fast().with_population_size(40).with_seed(42);
        assert_eq!(config.population_size, 40);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.time_limit_ms, Some(5_000));
    }
}
