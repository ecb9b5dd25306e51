//! GA evolutionary loop execution.
//!
//! [`GaRunner`] drives the generational state machine:
//! Init → Evaluate → CheckStop → {Reproduce → Evaluate, or Done}.
//!
//! The loop is direction-aware (it asks the problem whether fitness is
//! minimized or maximized) and free of output concerns: progress goes to
//! an observer callback and to the `log` facade.

use super::config::{ConfigError, GaConfig};
use super::create_rng;
use super::types::{Direction, Fitness, GaProblem, Individual};
use log::{debug, info};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// `max_generations` generations were executed.
    MaxGenerations,
    /// The problem reported an unbeatable fitness.
    Optimal,
    /// The run-best did not improve for `stagnation_limit` generations.
    Stagnated,
    /// The cancellation flag was raised.
    Cancelled,
    /// The wall-clock budget ran out.
    TimeLimit,
}

/// Per-generation snapshot handed to observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// 0 for the initial population, then 1, 2, ...
    pub generation: usize,
    /// Best fitness seen so far in the run.
    pub best_fitness: f64,
    /// Best fitness within this generation.
    pub generation_best: f64,
    /// Mean fitness of this generation.
    pub mean_fitness: f64,
    /// Worst fitness within this generation.
    pub worst_fitness: f64,
}

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual found during the entire run.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: I::Fitness,

    /// Number of generations executed after the initial population.
    pub generations: usize,

    /// Why the run ended.
    pub stop_reason: StopReason,

    /// Run-best fitness after the initial evaluation and after each
    /// generation (`generations + 1` entries).
    pub fitness_history: Vec<f64>,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config)?;
/// println!("Best fitness: {:?}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    pub fn run<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
    ) -> Result<GaResult<P::Individual>, ConfigError> {
        Self::run_with_observer(problem, config, None, |_| {})
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If the flag is set to `true`, the GA stops before the next generation
    /// and returns the best solution found so far.
    pub fn run_with_cancel<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<P::Individual>, ConfigError> {
        Self::run_with_observer(problem, config, cancel, |_| {})
    }

    /// Runs the GA, calling `observer` after the initial evaluation and after
    /// every generation.
    pub fn run_with_observer<P, F>(
        problem: &P,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
        mut observer: F,
    ) -> Result<GaResult<P::Individual>, ConfigError>
    where
        P: GaProblem,
        F: FnMut(&GenerationStats),
    {
        config.validate()?;

        let direction = problem.direction();
        let started = Instant::now();
        let deadline = config.time_limit_ms.map(Duration::from_millis);
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        info!(
            "GA start: population={}, max_generations={}, direction={:?}",
            config.population_size, config.max_generations, direction
        );

        // Init
        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();

        // Evaluate
        evaluate_all(problem, &mut population, config.parallel);

        let mut best = population[best_index(&population, direction)].clone();
        let mut fitness_history = Vec::with_capacity(config.max_generations.min(4096) + 1);
        fitness_history.push(best.fitness().to_f64());
        observer(&generation_stats(0, &population, &best, direction));

        let elite_count = config.elite_count();
        let mut stagnation_counter = 0usize;
        let mut generations = 0usize;
        let mut stop_reason = if problem.is_optimal(best.fitness()) {
            Some(StopReason::Optimal)
        } else {
            None
        };

        while stop_reason.is_none() {
            // CheckStop (external)
            if generations >= config.max_generations {
                stop_reason = Some(StopReason::MaxGenerations);
                break;
            }
            if cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                stop_reason = Some(StopReason::Cancelled);
                break;
            }
            if deadline.is_some_and(|limit| started.elapsed() >= limit) {
                stop_reason = Some(StopReason::TimeLimit);
                break;
            }

            // Reproduce
            population.sort_by(|a, b| direction.compare(a.fitness(), b.fitness()));
            let mut next_gen: Vec<P::Individual> = population[..elite_count].to_vec();

            while next_gen.len() < config.population_size {
                let p1 = config.selection.select(&population, direction, &mut rng);
                let p2 = config.selection.select(&population, direction, &mut rng);

                let (mut c1, mut c2) = if rng.random_range(0.0..1.0) < config.crossover_rate {
                    problem.crossover(&population[p1], &population[p2], &mut rng)
                } else {
                    (population[p1].clone(), population[p2].clone())
                };

                problem.mutate(&mut c1, config.mutation_rate, &mut rng);
                problem.mutate(&mut c2, config.mutation_rate, &mut rng);

                next_gen.push(c1);
                next_gen.push(c2);
            }
            next_gen.truncate(config.population_size);

            // Evaluate offspring (elites keep their fitness)
            evaluate_all(problem, &mut next_gen[elite_count..], config.parallel);
            population = next_gen;
            generations += 1;

            let gen_best = &population[best_index(&population, direction)];
            if direction.is_better(gen_best.fitness(), best.fitness()) {
                let significant = is_significant(
                    best.fitness().to_f64(),
                    gen_best.fitness().to_f64(),
                    config.convergence_threshold,
                );
                best = gen_best.clone();
                if significant {
                    stagnation_counter = 0;
                } else {
                    stagnation_counter += 1;
                }
            } else {
                stagnation_counter += 1;
            }

            fitness_history.push(best.fitness().to_f64());

            let stats = generation_stats(generations, &population, &best, direction);
            debug!(
                "generation {}: best={:.3} gen_best={:.3} mean={:.3} stagnation={}",
                generations,
                stats.best_fitness,
                stats.generation_best,
                stats.mean_fitness,
                stagnation_counter
            );
            observer(&stats);

            // CheckStop (internal)
            if problem.is_optimal(best.fitness()) {
                stop_reason = Some(StopReason::Optimal);
            } else if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                stop_reason = Some(StopReason::Stagnated);
            }
        }

        let stop_reason = stop_reason.unwrap_or(StopReason::MaxGenerations);
        info!(
            "GA done: {:?} after {} generations, best fitness {:?} ({:.2?})",
            stop_reason,
            generations,
            best.fitness(),
            started.elapsed()
        );

        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            stop_reason,
            fitness_history,
        })
    }
}

/// Evaluates every individual in the slice.
fn evaluate_all<P: GaProblem>(problem: &P, individuals: &mut [P::Individual], parallel: bool) {
    #[cfg(feature = "parallel")]
    if parallel {
        use rayon::prelude::*;
        individuals.par_iter_mut().for_each(|ind| {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        });
        return;
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for ind in individuals.iter_mut() {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    }
}

/// Index of the best individual (first on ties).
///
/// The population is never empty: [`GaConfig::validate`] requires at least
/// two individuals.
fn best_index<I: Individual>(population: &[I], direction: Direction) -> usize {
    let mut best = 0;
    for (i, ind) in population.iter().enumerate().skip(1) {
        if direction.is_better(ind.fitness(), population[best].fitness()) {
            best = i;
        }
    }
    best
}

/// Whether moving from `old` to `new` is a large enough relative step to
/// reset the stagnation counter.
fn is_significant(old: f64, new: f64, threshold: f64) -> bool {
    if threshold <= 0.0 || !old.is_finite() || old == 0.0 {
        return true;
    }
    (old - new).abs() / old.abs() >= threshold
}

fn generation_stats<I: Individual>(
    generation: usize,
    population: &[I],
    best: &I,
    direction: Direction,
) -> GenerationStats {
    let values: Vec<f64> = population.iter().map(|i| i.fitness().to_f64()).collect();
    let generation_best = values[best_index(population, direction)];
    let worst_fitness = values
        .iter()
        .copied()
        .fold(generation_best, |worst, v| {
            if direction.is_better(worst, v) {
                v
            } else {
                worst
            }
        });
    let mean_fitness = values.iter().sum::<f64>() / values.len() as f64;

    GenerationStats {
        generation,
        best_fitness: best.fitness().to_f64(),
        generation_best,
        mean_fitness,
        worst_fitness,
    }
}

// ============================================================================
// Tests
// ============================================================================
