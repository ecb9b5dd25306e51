//! Flat list genome.

use super::{Assignment, Repairable, RepairReport, Resolution};
use crate::catalog::{cell_index, cell_position, Catalog, Day, Slot, CELLS};
use crate::demand::LessonDemand;
use crate::ga::operators::one_point_crossover;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::collections::HashSet;

/// An unordered sequence of assignments.
///
/// Nothing here prevents duplicates, omissions or clashes; they are scored,
/// not forbidden.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListGenome {
    assignments: Vec<Assignment>,
}

/// Attribute of a gene that list mutation may change.
#[derive(Debug, Clone, Copy)]
enum Attribute {
    Teacher,
    Room,
    Day,
    Slot,
}

const ATTRIBUTES: [Attribute; 4] = [
    Attribute::Teacher,
    Attribute::Room,
    Attribute::Day,
    Attribute::Slot,
];

impl ListGenome {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Builds a random list, one gene per demanded lesson.
    ///
    /// Each lesson draws a qualified teacher and an adequate room (falling
    /// back to the subject's defaults), then takes the first cell in random
    /// order where its teacher, its cohort and at least one candidate room
    /// are still free. When no such cell exists the lesson keeps its drawn
    /// teacher and room at a random cell and the clash is left to scoring.
    pub fn random<R: Rng>(
        catalog: &Catalog,
        demand: &LessonDemand,
        resolution: &Resolution,
        rng: &mut R,
    ) -> Self {
        let mut teacher_busy: HashSet<(usize, usize)> = HashSet::new();
        let mut room_busy: HashSet<(usize, usize)> = HashSet::new();
        let mut cohort_busy: HashSet<(usize, usize)> = HashSet::new();
        let mut order: Vec<usize> = (0..CELLS).collect();
        let mut assignments = Vec::with_capacity(demand.len());

        for lesson in demand.lessons() {
            let subject = lesson.subject;
            let teacher = catalog
                .qualified_teachers(subject)
                .choose(rng)
                .copied()
                .unwrap_or_else(|| resolution.teacher(subject));
            let mut rooms = catalog.adequate_rooms(catalog.subject_students(subject));
            if rooms.is_empty() {
                rooms.push(resolution.room(subject));
            }
            rooms.shuffle(rng);
            let cohort = catalog.subject_cohort(subject);

            order.shuffle(rng);
            let placed = order.iter().find_map(|&cell| {
                if teacher_busy.contains(&(teacher, cell)) {
                    return None;
                }
                if cohort.is_some_and(|c| cohort_busy.contains(&(c, cell))) {
                    return None;
                }
                rooms
                    .iter()
                    .find(|&&r| !room_busy.contains(&(r, cell)))
                    .map(|&room| (cell, room))
            });
            let (cell, room) = placed.unwrap_or((order[0], rooms[0]));

            teacher_busy.insert((teacher, cell));
            room_busy.insert((room, cell));
            if let Some(c) = cohort {
                cohort_busy.insert((c, cell));
            }

            let (day, slot) = cell_position(cell);
            assignments.push(Assignment {
                subject,
                teacher,
                room,
                day,
                slot,
            });
        }

        Self { assignments }
    }

    /// Single cut-point splice of the two gene sequences.
    pub fn splice<R: Rng>(&self, other: &Self, rng: &mut R) -> (Self, Self) {
        let (a, b) = one_point_crossover(&self.assignments, &other.assignments, rng);
        (Self::new(a), Self::new(b))
    }

    /// Each gene mutates with probability `rate`, changing one random
    /// attribute: a teacher still qualified for the subject (any teacher
    /// when none is), a room able to seat the cohort (any room when none
    /// can), a day, or a slot.
    pub fn mutate<R: Rng>(&mut self, catalog: &Catalog, rate: f64, rng: &mut R) {
        for gene in self.assignments.iter_mut() {
            if rng.random_range(0.0..1.0) >= rate {
                continue;
            }
            let Some(attribute) = ATTRIBUTES.choose(rng) else { continue };
            match attribute {
                Attribute::Teacher => {
                    let qualified = catalog.qualified_teachers(gene.subject);
                    gene.teacher = match qualified.choose(rng) {
                        Some(&t) => t,
                        None => rng.random_range(0..catalog.teachers().len().max(1)),
                    };
                }
                Attribute::Room => {
                    let rooms = catalog.adequate_rooms(catalog.subject_students(gene.subject));
                    gene.room = match rooms.choose(rng) {
                        Some(&r) => r,
                        None => rng.random_range(0..catalog.rooms().len().max(1)),
                    };
                }
                Attribute::Day => {
                    if let Some(&day) = Day::ALL.choose(rng) {
                        gene.day = day;
                    }
                }
                Attribute::Slot => {
                    if let Some(&slot) = Slot::ALL.choose(rng) {
                        gene.slot = slot;
                    }
                }
            }
        }
    }

    /// Cells occupied by more than one gene (any teacher, room or cohort).
    pub fn stacked_cells(&self) -> usize {
        let mut per_cell = [0usize; CELLS];
        for a in &self.assignments {
            per_cell[cell_index(a.day, a.slot)] += 1;
        }
        per_cell.iter().filter(|&&n| n > 1).count()
    }
}

impl Repairable for ListGenome {
    /// List genomes are never repaired; their defects are scored.
    fn repair(&mut self, _demand: &LessonDemand, _resolution: &Resolution) -> RepairReport {
        RepairReport::default()
    }
}
