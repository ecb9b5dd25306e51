//! Weekly timetable optimization.
//!
//! [`schedule`] is the entry point: it validates the catalog, expands the
//! lesson demand, runs the GA over a [`TimetableProblem`] and returns the
//! best timetable found, together with the warnings raised on the way.
//!
//! # Example
//!
//! ```
//! use u_timetable::catalog::{Catalog, Cohort, Room, Subject, Teacher};
//! use u_timetable::ga::GaConfig;
//! use u_timetable::timetable::{schedule, ScheduleConfig};
//!
//! let catalog = Catalog::new(
//!     vec![Subject::new("MATH", "Mathematics", 4, "1A"), Subject::new("HIST", "History", 2, "1A")],
//!     vec![
//!         Teacher::new("T1", "Ada").with_subject("MATH"),
//!         Teacher::new("T2", "Bede").with_subject("HIST"),
//!     ],
//!     vec![Room::new("R1", 40)],
//!     vec![Cohort::new("1A", 32, "evening")],
//! );
//! let config = ScheduleConfig::default()
//!     .with_ga(GaConfig::fast().with_seed(7).with_max_generations(20));
//!
//! let outcome = schedule(&catalog, &config).unwrap();
//! assert_eq!(outcome.best.len(), 6);
//! ```

mod problem;

pub use problem::{Timetable, TimetableProblem};

use crate::catalog::validation::{validate, CatalogError, CatalogWarning};
use crate::catalog::{AvailabilityPolicy, Catalog, CELLS};
use crate::demand::{InfeasibleDemand, LessonDemand};
use crate::ga::{ConfigError, Direction, GaConfig, GaProblem, GaRunner, GenerationStats, StopReason};
use crate::genome::Genome;
use crate::scoring::{PenaltyWeights, QualityMetrics, RewardWeights, Violations};
use log::{info, warn};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Genome shape used for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Representation {
    /// Flat assignment list; collisions are scored.
    List,
    /// Day × slot matrix with post-crossover repair.
    #[default]
    Grid,
}

/// Fitness model used for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScoringModel {
    /// Minimized weighted violations.
    Penalty,
    /// Maximized weighted rewards.
    Reward,
}

/// Everything that parameterises one scheduling run.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleConfig {
    pub ga: GaConfig,
    pub representation: Representation,
    /// `None` picks the representation's natural model: penalty for lists,
    /// reward for grids.
    pub scoring: Option<ScoringModel>,
    pub availability: AvailabilityPolicy,
    pub penalty: PenaltyWeights,
    pub reward: RewardWeights,
    /// Restricts the run to one cohort's subjects.
    pub cohort: Option<String>,
}

impl ScheduleConfig {
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    pub fn with_scoring(mut self, model: ScoringModel) -> Self {
        self.scoring = Some(model);
        self
    }

    pub fn with_availability(mut self, policy: AvailabilityPolicy) -> Self {
        self.availability = policy;
        self
    }

    pub fn with_penalty_weights(mut self, weights: PenaltyWeights) -> Self {
        self.penalty = weights;
        self
    }

    pub fn with_reward_weights(mut self, weights: RewardWeights) -> Self {
        self.reward = weights;
        self
    }

    pub fn with_cohort(mut self, cohort: impl Into<String>) -> Self {
        self.cohort = Some(cohort.into());
        self
    }

    /// The scoring model in effect.
    pub fn scoring_model(&self) -> ScoringModel {
        self.scoring.unwrap_or(match self.representation {
            Representation::List => ScoringModel::Penalty,
            Representation::Grid => ScoringModel::Reward,
        })
    }
}

/// Why a run could not start.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid catalog: {}", format_errors(.0))]
    Catalog(Vec<CatalogError>),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown cohort '{0}'")]
    UnknownCohort(String),

    /// The selected cohort owns no subjects, so there is nothing to place.
    #[error("cohort '{0}' has no lessons to schedule")]
    EmptyCohort(String),
}

fn format_errors(errors: &[CatalogError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The best timetable of a run and how it was reached.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleOutcome {
    pub best: Genome,
    pub best_fitness: f64,
    pub direction: Direction,
    /// Run-best fitness after the initial population and every generation.
    pub fitness_history: Vec<f64>,
    pub generations: usize,
    pub stop_reason: StopReason,
    /// Recoverable catalog gaps the run worked around.
    pub warnings: Vec<CatalogWarning>,
    /// Demand that cannot fit the week, detected before the run.
    pub infeasible: Vec<InfeasibleDemand>,
    /// Hard-rule violations of the best timetable.
    pub violations: Violations,
    pub quality: QualityMetrics,
}

/// Runs the optimizer to completion.
pub fn schedule(catalog: &Catalog, config: &ScheduleConfig) -> Result<ScheduleOutcome, ScheduleError> {
    schedule_with_observer(catalog, config, None, |_| {})
}

/// Runs the optimizer with a cancellation flag and a per-generation observer.
///
/// Raising the flag ends the run after the current generation; the outcome
/// still carries the best timetable found so far.
pub fn schedule_with_observer<F>(
    catalog: &Catalog,
    config: &ScheduleConfig,
    cancel: Option<Arc<AtomicBool>>,
    observer: F,
) -> Result<ScheduleOutcome, ScheduleError>
where
    F: FnMut(&GenerationStats),
{
    let warnings = validate(catalog).map_err(ScheduleError::Catalog)?;
    config.ga.validate()?;

    let demand = match &config.cohort {
        Some(code) => {
            let cohort = catalog
                .cohort_index(code)
                .ok_or_else(|| ScheduleError::UnknownCohort(code.clone()))?;
            let demand = LessonDemand::for_cohort(catalog, cohort);
            if demand.is_empty() {
                return Err(ScheduleError::EmptyCohort(code.clone()));
            }
            demand
        }
        None => LessonDemand::build(catalog),
    };

    for w in &warnings {
        warn!("{w}");
    }
    let infeasible = infeasible_demand(catalog, &demand, config.representation);
    for issue in &infeasible {
        warn!("{issue}; the best timetable will be incomplete");
    }

    let problem = TimetableProblem::new(catalog, demand, config);
    info!(
        "scheduling {} lessons: {:?} genome, {:?} model",
        problem.demand().len(),
        config.representation,
        config.scoring_model()
    );

    let result = GaRunner::run_with_observer(&problem, &config.ga, cancel, observer)?;

    let ctx = problem.context();
    let violations = Violations::count(&result.best.genome, &ctx);
    let quality = QualityMetrics::measure(&result.best.genome, &ctx);

    Ok(ScheduleOutcome {
        best: result.best.genome,
        best_fitness: result.best_fitness,
        direction: problem.direction(),
        fitness_history: result.fitness_history,
        generations: result.generations,
        stop_reason: result.stop_reason,
        warnings,
        infeasible,
        violations,
        quality,
    })
}

/// Cohorts whose lessons cannot all fit.
///
/// A cohort never has more than [`CELLS`] usable positions. A grid genome
/// additionally holds every demanded lesson in one shared set of cells.
fn infeasible_demand(
    catalog: &Catalog,
    demand: &LessonDemand,
    representation: Representation,
) -> Vec<InfeasibleDemand> {
    let mut issues = demand.check_capacity(catalog);
    if representation == Representation::Grid && issues.is_empty() && demand.len() > CELLS {
        let mut cohorts: Vec<&str> = demand
            .subjects()
            .iter()
            .filter_map(|&s| catalog.subject_cohort(s))
            .map(|c| catalog.cohort(c).code.as_str())
            .collect();
        cohorts.sort_unstable();
        cohorts.dedup();
        issues.push(InfeasibleDemand {
            cohort: cohorts.join("+"),
            required: demand.len(),
            capacity: CELLS,
        });
    }
    issues
}
