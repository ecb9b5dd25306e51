//! Reward model: weighted satisfied criteria, maximized.

use super::profile::Profile;
use super::{ScoringContext, ScoringPolicy};
use crate::catalog::{Day, CELLS, DAYS, SLOTS};
use crate::ga::Direction;
use crate::genome::Genome;

/// Weight of each rewarded criterion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardWeights {
    /// Per subject placed exactly as often as required. Partial placement
    /// earns `ratio × 0.5` of it.
    pub subject_complete: f64,
    /// Deducted per lesson beyond a subject's requirement.
    pub over_allocation: f64,
    /// Per lesson inside its teacher's availability.
    pub availability: f64,
    /// Scaled by `max(0, 2 − σ)` of the day loads.
    pub balance: f64,
    /// Per day whose load equals its target.
    pub day_target: f64,
    /// Per non-empty day, scaled by `max(0, SLOTS − gaps)`.
    pub no_gaps: f64,
    /// Per teacher, scaled by `max(0, DAYS + 1 − working days)`.
    pub teacher_concentration: f64,
    /// Scaled by the fraction of used cells.
    pub utilization: f64,
    /// Target load of each day, Monday first.
    pub day_targets: [usize; DAYS],
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            subject_complete: 1000.0,
            over_allocation: 500.0,
            availability: 500.0,
            balance: 200.0,
            day_target: 150.0,
            no_gaps: 100.0,
            teacher_concentration: 80.0,
            utilization: 50.0,
            day_targets: [4, 4, 4, 4, 3],
        }
    }
}

/// Contribution of each criterion to a reward score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RewardBreakdown {
    pub completeness: f64,
    pub availability: f64,
    pub balance: f64,
    pub day_targets: f64,
    pub no_gaps: f64,
    pub teacher_concentration: f64,
    pub utilization: f64,
}

impl RewardBreakdown {
    pub fn total(&self) -> f64 {
        self.completeness
            + self.availability
            + self.balance
            + self.day_targets
            + self.no_gaps
            + self.teacher_concentration
            + self.utilization
    }
}

/// Maximized sum of weighted rewards.
#[derive(Debug, Clone, Default)]
pub struct RewardPolicy {
    pub weights: RewardWeights,
}

impl RewardPolicy {
    pub fn new(weights: RewardWeights) -> Self {
        Self { weights }
    }

    pub fn breakdown(&self, genome: &Genome, ctx: &ScoringContext<'_>) -> RewardBreakdown {
        let w = &self.weights;
        let profile = Profile::new(genome, ctx);

        let completeness = ctx
            .demand
            .subjects()
            .iter()
            .map(|&s| {
                let required = ctx.demand.required(s);
                let placed = profile.counts.get(s).copied().unwrap_or(0);
                if placed == required {
                    w.subject_complete
                } else if placed < required {
                    w.subject_complete * (placed as f64 / required as f64) * 0.5
                } else {
                    -w.over_allocation * (placed - required) as f64
                }
            })
            .sum();

        let day_targets = Day::ALL
            .iter()
            .filter(|d| profile.day_loads[d.index()] == w.day_targets[d.index()])
            .count() as f64
            * w.day_target;

        let no_gaps = Day::ALL
            .iter()
            .filter_map(|&d| profile.gaps(d))
            .map(|gaps| w.no_gaps * SLOTS.saturating_sub(gaps) as f64)
            .sum();

        let teacher_concentration = profile
            .teacher_day_counts()
            .map(|days| w.teacher_concentration * (DAYS + 1).saturating_sub(days) as f64)
            .sum();

        RewardBreakdown {
            completeness,
            availability: w.availability * profile.available as f64,
            balance: w.balance * (2.0 - profile.load_std()).max(0.0),
            day_targets,
            no_gaps,
            teacher_concentration,
            utilization: w.utilization * profile.used_cells() as f64 / CELLS as f64,
        }
    }
}

impl ScoringPolicy for RewardPolicy {
    fn direction(&self) -> Direction {
        Direction::Maximize
    }

    fn score(&self, genome: &Genome, ctx: &ScoringContext<'_>) -> f64 {
        if genome.is_empty() {
            return Direction::Maximize.worst();
        }
        self.breakdown(genome, ctx).total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AvailabilityPolicy, Slot};
    use crate::demand::LessonDemand;
    use crate::genome::fixtures::single_cohort;
    use crate::genome::{GridGenome, ListGenome, Repairable, Resolution};

    const EPS: f64 = 1e-9;

    /// Lesson S needs 2, one qualified teacher, no availability data.
    #[test]
    fn test_scenario_repaired_subject_earns_full_completeness() {
        let cat = single_cohort(&[("S", 2)]);
        let demand = LessonDemand::build(&cat);
        let res = Resolution::new(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());

        let mut grid = GridGenome::empty();
        grid.repair(&demand, &res);
        let genome = Genome::Grid(grid);
        let b = RewardPolicy::default().breakdown(&genome, &ctx);

        assert!((b.completeness - 1000.0).abs() < EPS);
        assert!((b.availability - 2.0 * 500.0).abs() < EPS);
    }

    #[test]
    fn test_partial_and_over_allocation() {
        let cat = single_cohort(&[("A", 4), ("B", 1)]);
        let demand = LessonDemand::build(&cat);
        let res = Resolution::new(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());

        let genome = Genome::List(ListGenome::new(vec![
            res.assignment(0, Day::Monday, Slot::First),
            res.assignment(1, Day::Monday, Slot::Second),
            res.assignment(1, Day::Monday, Slot::Third),
            res.assignment(1, Day::Monday, Slot::Fourth),
        ]));
        let b = RewardPolicy::default().breakdown(&genome, &ctx);

        // A: 1/4 × 0.5 × 1000; B: two extra lessons × 500 deducted.
        assert!((b.completeness - (125.0 - 1000.0)).abs() < EPS);
    }

    #[test]
    fn test_shape_criteria() {
        let cat = single_cohort(&[("A", 2), ("B", 1)]);
        let demand = LessonDemand::build(&cat);
        let res = Resolution::new(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());

        let mut grid = GridGenome::empty();
        grid.place(res.assignment(0, Day::Monday, Slot::First));
        grid.place(res.assignment(0, Day::Monday, Slot::Third));
        grid.place(res.assignment(1, Day::Wednesday, Slot::Second));
        let b = RewardPolicy::default().breakdown(&Genome::Grid(grid), &ctx);

        // Loads [2, 0, 1, 0, 0]: no day meets its target.
        assert_eq!(b.day_targets, 0.0);
        // Monday has one gap, Wednesday none.
        assert!((b.no_gaps - (100.0 * 3.0 + 100.0 * 4.0)).abs() < EPS);
        // Two teachers, one day each.
        assert!((b.teacher_concentration - 2.0 * 80.0 * 5.0).abs() < EPS);
        assert!((b.utilization - 50.0 * 3.0 / 20.0).abs() < EPS);
        let mean: f64 = 0.6;
        let std = (((2.0 - mean).powi(2) + (1.0 - mean).powi(2) + 3.0 * mean.powi(2)) / 5.0).sqrt();
        assert!((b.balance - 200.0 * (2.0 - std)).abs() < EPS);
    }

    #[test]
    fn test_day_targets_met() {
        let cat = single_cohort(&[("A", 19)]);
        let demand = LessonDemand::build(&cat);
        let res = Resolution::new(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());
        let mut grid = GridGenome::empty();
        for day in Day::ALL {
            for slot in Slot::ALL {
                if !(day == Day::Friday && slot == Slot::Fourth) {
                    grid.place(res.assignment(0, day, slot));
                }
            }
        }
        let b = RewardPolicy::default().breakdown(&Genome::Grid(grid), &ctx);
        assert!((b.day_targets - 5.0 * 150.0).abs() < EPS);
    }

    #[test]
    fn test_better_timetable_scores_higher() {
        let cat = single_cohort(&[("A", 2), ("B", 2)]);
        let demand = LessonDemand::build(&cat);
        let res = Resolution::new(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());
        let policy = RewardPolicy::default();

        let mut complete = GridGenome::empty();
        complete.repair(&demand, &res);
        let mut partial = GridGenome::empty();
        partial.place(res.assignment(0, Day::Monday, Slot::First));

        assert!(
            policy.score(&Genome::Grid(complete), &ctx)
                > policy.score(&Genome::Grid(partial), &ctx)
        );
    }

    #[test]
    fn test_empty_genome_is_worst() {
        let cat = single_cohort(&[("A", 2)]);
        let demand = LessonDemand::build(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());
        let policy = RewardPolicy::default();

        assert_eq!(policy.score(&Genome::Grid(GridGenome::empty()), &ctx), f64::NEG_INFINITY);
        assert_eq!(policy.direction(), Direction::Maximize);
        assert_eq!(policy.optimum(), None);
    }
}
