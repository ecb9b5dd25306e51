//! Penalty model: weighted violation count, minimized.

use super::{ScoringContext, ScoringPolicy};
use crate::catalog::{cell_index, Day, DAYS};
use crate::ga::Direction;
use crate::genome::Genome;
use std::collections::HashMap;

/// Weight of one occurrence of each violation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PenaltyWeights {
    /// A teacher holding a second lesson at the same (day, slot).
    pub teacher_clash: f64,
    /// A room holding a second lesson at the same (day, slot).
    pub room_clash: f64,
    /// A cohort attending a second lesson at the same (day, slot).
    pub cohort_clash: f64,
    /// A lesson outside its teacher's availability.
    pub unavailable: f64,
    /// A required lesson that is not placed.
    pub missing: f64,
    /// A lesson placed beyond its subject's requirement.
    pub over_allocation: f64,
    /// A lesson in a room too small for its cohort.
    pub room_capacity: f64,
    /// Each day of difference between a subject's spread and its block plan.
    pub block_mismatch: f64,
    /// Any lesson on Friday, keeping the last evening light.
    pub friday: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            teacher_clash: 2.0,
            room_clash: 2.0,
            cohort_clash: 2.0,
            unavailable: 5.0,
            missing: 50.0,
            over_allocation: 50.0,
            room_capacity: 1.0,
            block_mismatch: 1.0,
            friday: 1.0,
        }
    }
}

/// Violation counts of one genome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Violations {
    pub teacher_clashes: usize,
    pub room_clashes: usize,
    pub cohort_clashes: usize,
    pub unavailable: usize,
    pub missing: usize,
    pub over_allocated: usize,
    pub over_capacity: usize,
    pub block_mismatch: usize,
    /// Lessons on Friday. A soft cost, not a hard-rule break.
    pub friday_lessons: usize,
}

impl Violations {
    /// Counts every violation in a genome.
    ///
    /// A clash is counted once per extra lesson sharing a key: three lessons
    /// of one teacher in one cell are two clashes.
    pub fn count(genome: &Genome, ctx: &ScoringContext<'_>) -> Self {
        let catalog = ctx.catalog;
        let mut v = Violations::default();
        let mut teacher_cells: HashMap<(usize, usize), usize> = HashMap::new();
        let mut room_cells: HashMap<(usize, usize), usize> = HashMap::new();
        let mut cohort_cells: HashMap<(usize, usize), usize> = HashMap::new();
        let mut counts = vec![0u32; catalog.subjects().len()];
        let mut subject_days = vec![[false; DAYS]; catalog.subjects().len()];

        for a in genome.assignments() {
            let cell = cell_index(a.day, a.slot);
            bump(&mut teacher_cells, (a.teacher, cell), &mut v.teacher_clashes);
            bump(&mut room_cells, (a.room, cell), &mut v.room_clashes);
            if a.subject < counts.len() {
                if let Some(c) = catalog.subject_cohort(a.subject) {
                    bump(&mut cohort_cells, (c, cell), &mut v.cohort_clashes);
                }
                counts[a.subject] += 1;
                subject_days[a.subject][a.day.index()] = true;
                let capacity = catalog.rooms().get(a.room).map_or(0, |r| r.capacity);
                if capacity < catalog.subject_students(a.subject) {
                    v.over_capacity += 1;
                }
            }
            if !ctx.teacher_available(a.teacher, a.day, a.slot) {
                v.unavailable += 1;
            }
            if a.day == Day::Friday {
                v.friday_lessons += 1;
            }
        }

        for (subject, &placed) in counts.iter().enumerate() {
            let required = ctx.demand.required(subject);
            if placed < required {
                v.missing += (required - placed) as usize;
            } else {
                v.over_allocated += (placed - required) as usize;
            }
            if placed > 0 && required > 0 {
                let spread = subject_days[subject].iter().filter(|&&d| d).count();
                v.block_mismatch += spread.abs_diff(ctx.demand.blocks(subject).len());
            }
        }

        v
    }

    pub fn weighted(&self, w: &PenaltyWeights) -> f64 {
        self.teacher_clashes as f64 * w.teacher_clash
            + self.room_clashes as f64 * w.room_clash
            + self.cohort_clashes as f64 * w.cohort_clash
            + self.unavailable as f64 * w.unavailable
            + self.missing as f64 * w.missing
            + self.over_allocated as f64 * w.over_allocation
            + self.over_capacity as f64 * w.room_capacity
            + self.block_mismatch as f64 * w.block_mismatch
            + self.friday_lessons as f64 * w.friday
    }

    /// Whether the hard rules hold: no clashes and exact counts.
    pub fn is_feasible(&self) -> bool {
        self.teacher_clashes == 0
            && self.room_clashes == 0
            && self.cohort_clashes == 0
            && self.missing == 0
            && self.over_allocated == 0
    }
}

fn bump(seen: &mut HashMap<(usize, usize), usize>, key: (usize, usize), clashes: &mut usize) {
    let n = seen.entry(key).or_insert(0);
    if *n > 0 {
        *clashes += 1;
    }
    *n += 1;
}

/// Minimized sum of weighted violations.
///
/// The value is never negative and 0 means no violation and no Friday
/// lesson. Required lessons that are not placed dominate with the default
/// weights, so completeness is settled before preferences.
#[derive(Debug, Clone, Default)]
pub struct PenaltyPolicy {
    pub weights: PenaltyWeights,
}

impl PenaltyPolicy {
    pub fn new(weights: PenaltyWeights) -> Self {
        Self { weights }
    }
}

impl ScoringPolicy for PenaltyPolicy {
    fn direction(&self) -> Direction {
        Direction::Minimize
    }

    fn score(&self, genome: &Genome, ctx: &ScoringContext<'_>) -> f64 {
        if genome.is_empty() {
            return Direction::Minimize.worst();
        }
        Violations::count(genome, ctx).weighted(&self.weights).max(0.0)
    }

    fn optimum(&self) -> Option<f64> {
        Some(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AvailabilityPolicy, Catalog, Cohort, Day, Room, Slot, Subject, Teacher};
    use crate::demand::LessonDemand;
    use crate::genome::fixtures::single_cohort;
    use crate::genome::{Assignment, GridGenome, ListGenome, Resolution};

    fn list(assignments: Vec<Assignment>) -> Genome {
        Genome::List(ListGenome::new(assignments))
    }

    fn at(subject: usize, teacher: usize, room: usize, day: Day, slot: Slot) -> Assignment {
        Assignment {
            subject,
            teacher,
            room,
            day,
            slot,
        }
    }

    #[test]
    fn test_perfect_list_scores_zero() {
        let cat = single_cohort(&[("A", 2), ("B", 1)]);
        let demand = LessonDemand::build(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());
        let genome = list(vec![
            at(0, 0, 1, Day::Monday, Slot::First),
            at(0, 0, 1, Day::Monday, Slot::Second),
            at(1, 1, 1, Day::Tuesday, Slot::First),
        ]);

        let policy = PenaltyPolicy::default();
        assert_eq!(Violations::count(&genome, &ctx), Violations::default());
        assert_eq!(policy.score(&genome, &ctx), 0.0);
        assert_eq!(policy.optimum(), Some(0.0));
        assert_eq!(policy.direction(), Direction::Minimize);
    }

    #[test]
    fn test_clashes_counted_per_extra_lesson() {
        let cat = single_cohort(&[("A", 3)]);
        let demand = LessonDemand::build(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());
        let genome = list(vec![
            at(0, 0, 1, Day::Monday, Slot::First),
            at(0, 0, 1, Day::Monday, Slot::First),
            at(0, 0, 1, Day::Monday, Slot::First),
        ]);

        let v = Violations::count(&genome, &ctx);
        assert_eq!(v.teacher_clashes, 2);
        assert_eq!(v.room_clashes, 2);
        assert_eq!(v.cohort_clashes, 2);
        // Plan [2, 1] wants two days, the lessons use one.
        assert_eq!(v.block_mismatch, 1);
        assert!(!v.is_feasible());
        assert_eq!(PenaltyPolicy::default().score(&genome, &ctx), 2.0 * 6.0 + 1.0);
    }

    #[test]
    fn test_missing_dominates() {
        let cat = single_cohort(&[("A", 4), ("B", 2)]);
        let demand = LessonDemand::build(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());
        let genome = list(vec![at(1, 1, 1, Day::Friday, Slot::First)]);

        let v = Violations::count(&genome, &ctx);
        assert_eq!(v.missing, 5);
        assert_eq!(v.over_allocated, 0);
        assert_eq!(v.friday_lessons, 1);
        assert_eq!(PenaltyPolicy::default().score(&genome, &ctx), 5.0 * 50.0 + 1.0);
    }

    #[test]
    fn test_over_allocation_penalised() {
        let cat = single_cohort(&[("A", 1)]);
        let demand = LessonDemand::build(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());
        let genome = list(vec![
            at(0, 0, 1, Day::Monday, Slot::First),
            at(0, 0, 1, Day::Tuesday, Slot::First),
        ]);

        let v = Violations::count(&genome, &ctx);
        assert_eq!(v.over_allocated, 1);
        assert_eq!(v.block_mismatch, 1);
    }

    #[test]
    fn test_availability_policy_flag() {
        let cat = Catalog::new(
            vec![Subject::new("A", "A", 1, "C")],
            vec![Teacher::new("T0", "Known")
                .with_subject("A")
                .with_availability([(Day::Monday, Slot::First)])],
            vec![Room::new("R", 40)],
            vec![Cohort::new("C", 20, "evening")],
        );
        let demand = LessonDemand::build(&cat);
        let on_window = list(vec![at(0, 0, 0, Day::Monday, Slot::First)]);
        let off_window = list(vec![at(0, 0, 0, Day::Monday, Slot::Second)]);

        for policy in [
            AvailabilityPolicy::MissingMeansAvailable,
            AvailabilityPolicy::MissingMeansUnavailable,
        ] {
            let ctx = ScoringContext::new(&cat, &demand, policy);
            assert_eq!(Violations::count(&on_window, &ctx).unavailable, 0);
            assert_eq!(Violations::count(&off_window, &ctx).unavailable, 1);
        }

        // Without data the flag decides.
        let open = Catalog::new(
            cat.subjects().to_vec(),
            vec![Teacher::new("T0", "Unknown").with_subject("A")],
            cat.rooms().to_vec(),
            cat.cohorts().to_vec(),
        );
        let ctx = ScoringContext::new(&open, &demand, AvailabilityPolicy::MissingMeansAvailable);
        assert_eq!(Violations::count(&off_window, &ctx).unavailable, 0);
        let ctx = ScoringContext::new(&open, &demand, AvailabilityPolicy::MissingMeansUnavailable);
        assert_eq!(Violations::count(&off_window, &ctx).unavailable, 1);
    }

    #[test]
    fn test_friday_lessons_cost_a_little() {
        let cat = single_cohort(&[("A", 1)]);
        let demand = LessonDemand::build(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());
        let thursday = list(vec![at(0, 0, 1, Day::Thursday, Slot::Fourth)]);
        let friday = list(vec![at(0, 0, 1, Day::Friday, Slot::First)]);

        let v = Violations::count(&friday, &ctx);
        assert_eq!(v.friday_lessons, 1);
        assert!(v.is_feasible());

        let policy = PenaltyPolicy::default();
        assert_eq!(policy.score(&thursday, &ctx), 0.0);
        assert_eq!(policy.score(&friday, &ctx), 1.0);

        let no_friday_cost = PenaltyWeights {
            friday: 0.0,
            ..PenaltyWeights::default()
        };
        assert_eq!(PenaltyPolicy::new(no_friday_cost).score(&friday, &ctx), 0.0);
    }

    #[test]
    fn test_room_capacity() {
        let cat = single_cohort(&[("A", 1)]);
        let demand = LessonDemand::build(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());
        // Room 0 seats 20, the cohort has 35.
        let genome = list(vec![at(0, 0, 0, Day::Monday, Slot::First)]);
        assert_eq!(Violations::count(&genome, &ctx).over_capacity, 1);
    }

    #[test]
    fn test_empty_genome_is_worst() {
        let cat = single_cohort(&[("A", 2)]);
        let demand = LessonDemand::build(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());
        let policy = PenaltyPolicy::default();

        assert_eq!(policy.score(&list(Vec::new()), &ctx), f64::INFINITY);
        assert_eq!(
            policy.score(&Genome::Grid(GridGenome::empty()), &ctx),
            f64::INFINITY
        );
    }

    #[test]
    fn test_scores_grid_genomes_too() {
        let cat = single_cohort(&[("A", 2)]);
        let demand = LessonDemand::build(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());
        let res = Resolution::new(&cat);
        let mut grid = GridGenome::empty();
        grid.place(res.assignment(0, Day::Monday, Slot::First));
        grid.place(res.assignment(0, Day::Monday, Slot::Second));

        assert_eq!(PenaltyPolicy::default().score(&Genome::Grid(grid), &ctx), 0.0);
    }

    #[test]
    fn test_zero_weights_score_zero() {
        let cat = single_cohort(&[("A", 3)]);
        let demand = LessonDemand::build(&cat);
        let ctx = ScoringContext::new(&cat, &demand, AvailabilityPolicy::default());
        let weights = PenaltyWeights {
            teacher_clash: 0.0,
            room_clash: 0.0,
            cohort_clash: 0.0,
            unavailable: 0.0,
            missing: 0.0,
            over_allocation: 0.0,
            room_capacity: 0.0,
            block_mismatch: 0.0,
            friday: 0.0,
        };
        let genome = list(vec![at(0, 0, 0, Day::Monday, Slot::First)]);
        assert_eq!(PenaltyPolicy::new(weights).score(&genome, &ctx), 0.0);
    }
}
