//! GA problem definition for weekly timetables.

use super::{Representation, ScheduleConfig, ScoringModel};
use crate::catalog::{AvailabilityPolicy, Catalog};
use crate::demand::LessonDemand;
use crate::ga::{Direction, GaProblem, Individual};
use crate::genome::{Genome, GridGenome, ListGenome, Repairable, Resolution};
use crate::scoring::{PenaltyPolicy, RewardPolicy, ScoringContext, ScoringPolicy};
use rand::Rng;

/// A genome together with its score.
#[derive(Debug, Clone)]
pub struct Timetable {
    pub genome: Genome,
    fitness: f64,
}

impl Timetable {
    /// Wraps an unevaluated genome.
    pub fn new(genome: Genome, direction: Direction) -> Self {
        Self {
            genome,
            fitness: direction.worst(),
        }
    }
}

impl Individual for Timetable {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

/// Weekly timetabling as a [`GaProblem`].
///
/// The representation decides construction and variation; the scoring
/// policy decides fitness and direction. Grid children are repaired right
/// after crossover, before they are mutated or scored.
pub struct TimetableProblem<'a> {
    catalog: &'a Catalog,
    demand: LessonDemand,
    resolution: Resolution,
    representation: Representation,
    availability: AvailabilityPolicy,
    policy: Box<dyn ScoringPolicy + 'a>,
}

impl<'a> TimetableProblem<'a> {
    /// Builds the problem with the policy named by `config`.
    pub fn new(catalog: &'a Catalog, demand: LessonDemand, config: &ScheduleConfig) -> Self {
        let policy: Box<dyn ScoringPolicy + 'a> = match config.scoring_model() {
            ScoringModel::Penalty => Box::new(PenaltyPolicy::new(config.penalty.clone())),
            ScoringModel::Reward => Box::new(RewardPolicy::new(config.reward.clone())),
        };
        Self::with_policy(catalog, demand, config.representation, config.availability, policy)
    }

    /// Builds the problem around any scoring policy.
    pub fn with_policy(
        catalog: &'a Catalog,
        demand: LessonDemand,
        representation: Representation,
        availability: AvailabilityPolicy,
        policy: Box<dyn ScoringPolicy + 'a>,
    ) -> Self {
        Self {
            catalog,
            resolution: Resolution::new(catalog),
            demand,
            representation,
            availability,
            policy,
        }
    }

    pub fn demand(&self) -> &LessonDemand {
        &self.demand
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    pub fn context(&self) -> ScoringContext<'_> {
        ScoringContext::new(self.catalog, &self.demand, self.availability)
    }

    /// A random genome of the configured representation.
    pub fn random_genome<R: Rng>(&self, rng: &mut R) -> Genome {
        match self.representation {
            Representation::List => {
                ListGenome::random(self.catalog, &self.demand, &self.resolution, rng).into()
            }
            Representation::Grid => {
                GridGenome::random(self.catalog, &self.demand, &self.resolution, rng).into()
            }
        }
    }
}

impl GaProblem for TimetableProblem<'_> {
    type Individual = Timetable;

    fn direction(&self) -> Direction {
        self.policy.direction()
    }

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Timetable {
        Timetable::new(self.random_genome(rng), self.direction())
    }

    fn evaluate(&self, individual: &Timetable) -> f64 {
        self.policy.score(&individual.genome, &self.context())
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &Timetable,
        parent2: &Timetable,
        rng: &mut R,
    ) -> (Timetable, Timetable) {
        let direction = self.direction();
        let (a, b): (Genome, Genome) = match (&parent1.genome, &parent2.genome) {
            (Genome::List(p1), Genome::List(p2)) => {
                let (a, b) = p1.splice(p2, rng);
                (a.into(), b.into())
            }
            (Genome::Grid(p1), Genome::Grid(p2)) => {
                let (mut a, mut b) = p1.day_exchange(p2, rng);
                a.repair(&self.demand, &self.resolution);
                b.repair(&self.demand, &self.resolution);
                (a.into(), b.into())
            }
            _ => return (parent1.clone(), parent2.clone()),
        };
        (Timetable::new(a, direction), Timetable::new(b, direction))
    }

    fn mutate<R: Rng>(&self, individual: &mut Timetable, rate: f64, rng: &mut R) {
        match &mut individual.genome {
            Genome::List(g) => g.mutate(self.catalog, rate, rng),
            Genome::Grid(g) => g.mutate(rate, rng),
        }
    }

    fn is_optimal(&self, fitness: f64) -> bool {
        self.policy
            .optimum()
            .is_some_and(|optimum| !self.direction().is_better(optimum, fitness))
    }
}
