//! Fitness of a timetable.
//!
//! A [`ScoringPolicy`] turns a [`Genome`] into one scalar and declares which
//! way is better. Two policies are provided:
//!
//! - [`PenaltyPolicy`]: accumulates weighted violations. Minimized; 0 is a
//!   perfect timetable.
//! - [`RewardPolicy`]: accumulates weighted satisfied criteria. Maximized.
//!
//! Both read any genome shape through [`Genome::assignments`], and both
//! give a genome without assignments the worst value of their direction.
//!
//! [`QualityMetrics`] summarises a finished timetable as normalised
//! indicators for reporting.

mod metrics;
mod penalty;
mod profile;
mod reward;

pub use metrics::QualityMetrics;
pub use penalty::{PenaltyPolicy, PenaltyWeights, Violations};
pub use reward::{RewardBreakdown, RewardPolicy, RewardWeights};

use crate::catalog::{AvailabilityPolicy, Catalog, Day, Slot};
use crate::demand::LessonDemand;
use crate::ga::Direction;
use crate::genome::Genome;

/// Everything a policy needs besides the genome itself.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub catalog: &'a Catalog,
    pub demand: &'a LessonDemand,
    pub availability: AvailabilityPolicy,
}

impl<'a> ScoringContext<'a> {
    pub fn new(
        catalog: &'a Catalog,
        demand: &'a LessonDemand,
        availability: AvailabilityPolicy,
    ) -> Self {
        Self {
            catalog,
            demand,
            availability,
        }
    }

    /// Whether a teacher may teach at a position; unknown teachers never can.
    pub fn teacher_available(&self, teacher: usize, day: Day, slot: Slot) -> bool {
        teacher < self.catalog.teachers().len()
            && self
                .catalog
                .teacher_available(teacher, day, slot, self.availability)
    }
}

/// Genome → scalar, with a declared optimization direction.
pub trait ScoringPolicy: Send + Sync {
    fn direction(&self) -> Direction;

    fn score(&self, genome: &Genome, ctx: &ScoringContext<'_>) -> f64;

    /// A value no genome can beat, if the model has one.
    fn optimum(&self) -> Option<f64> {
        None
    }
}
