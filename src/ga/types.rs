//! Core trait definitions for the GA engine.
//!
//! The two central traits — [`Individual`] and [`GaProblem`] — define the
//! contract between the generic evolutionary loop and a concrete
//! timetabling encoding. [`Direction`] declares whether a problem minimizes
//! or maximizes its fitness, so the loop never assumes one convention.

use rand::Rng;

/// Marker trait for fitness values.
///
/// Fitness must support comparison and be cheaply copyable.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// The largest representable value.
    fn max_value() -> Self;

    /// The smallest representable value.
    fn min_value() -> Self;

    /// Converts the fitness to `f64` for history and statistics.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn max_value() -> Self {
        f64::INFINITY
    }

    fn min_value() -> Self {
        f64::NEG_INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// Optimization direction of a fitness function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Lower fitness is better (penalty models).
    #[default]
    Minimize,
    /// Higher fitness is better (reward models).
    Maximize,
}

impl Direction {
    /// Whether `a` is strictly better than `b`.
    ///
    /// Incomparable values (NaN) are never better.
    pub fn is_better<F: Fitness>(self, a: F, b: F) -> bool {
        match self {
            Direction::Minimize => a < b,
            Direction::Maximize => a > b,
        }
    }

    /// Total ordering with the best value first, for sorting populations.
    pub fn compare<F: Fitness>(self, a: F, b: F) -> std::cmp::Ordering {
        let ord = a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal);
        match self {
            Direction::Minimize => ord,
            Direction::Maximize => ord.reverse(),
        }
    }

    /// The worst possible fitness in this direction.
    ///
    /// Used for unevaluated individuals and as the empty-genome sentinel.
    pub fn worst<F: Fitness>(self) -> F {
        match self {
            Direction::Minimize => F::max_value(),
            Direction::Maximize => F::min_value(),
        }
    }
}

/// A candidate solution in the GA population.
///
/// Individuals carry their own fitness value. The runner calls
/// [`GaProblem::evaluate`] to compute it, then stores it via
/// [`set_fitness`](Individual::set_fitness).
pub trait Individual: Clone + Send + Sync {
    /// The fitness type. Must implement [`Fitness`].
    type Fitness: Fitness;

    /// Returns the current fitness of this individual.
    fn fitness(&self) -> Self::Fitness;

    /// Sets the fitness of this individual.
    fn set_fitness(&mut self, fitness: Self::Fitness);
}

/// Defines a GA optimization problem.
///
/// This is the seam between the representation-agnostic loop and a concrete
/// encoding. It covers:
///
/// 1. **Direction**: whether fitness is minimized or maximized
/// 2. **Initialization**: how to create random individuals
/// 3. **Evaluation**: how to compute fitness
/// 4. **Crossover**: how to recombine two parents (including any repair)
/// 5. **Mutation**: how to perturb an individual
/// 6. **Optimum**: whether a fitness value cannot be improved upon
///
/// `GaProblem` must be `Send + Sync` so a generation can be evaluated in
/// parallel when the `parallel` feature is enabled.
pub trait GaProblem: Send + Sync {
    /// The individual (solution) type for this problem.
    type Individual: Individual;

    /// Optimization direction. Defaults to minimization.
    fn direction(&self) -> Direction {
        Direction::Minimize
    }

    /// Creates a random individual for the initial population.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual and returns its fitness.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// Recombines two parents into two children.
    ///
    /// Called only when the runner's crossover-rate draw succeeds. The
    /// default implementation returns copies of both parents.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        parent2: &Self::Individual,
        _rng: &mut R,
    ) -> (Self::Individual, Self::Individual) {
        (parent1.clone(), parent2.clone())
    }

    /// Mutates an individual in place.
    ///
    /// `rate` is the configured mutation rate; how it is applied (per gene,
    /// per cell, per individual) is up to the encoding. The default
    /// implementation is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rate: f64, _rng: &mut R) {}

    /// Whether `fitness` is a known optimum, ending the run early.
    ///
    /// The default implementation never reports an optimum.
    fn is_optimal(&self, _fitness: <Self::Individual as Individual>::Fitness) -> bool {
        false
    }
}
