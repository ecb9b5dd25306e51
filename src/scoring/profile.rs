//! Week profile shared by the reward model and the quality metrics.

use super::ScoringContext;
use crate::catalog::{cell_index, Day, CELLS, DAYS, SLOTS};
use crate::genome::Genome;
use std::collections::BTreeMap;

/// Aggregates of one genome that several criteria read.
#[derive(Debug, Clone)]
pub(crate) struct Profile {
    /// Placed lessons per catalog subject.
    pub counts: Vec<u32>,
    /// Assignments per day.
    pub day_loads: [usize; DAYS],
    /// Cells holding at least one assignment.
    pub occupied: [bool; CELLS],
    /// Per teacher, the days on which they teach.
    pub teacher_days: BTreeMap<usize, [bool; DAYS]>,
    /// Assignments whose teacher is available at their cell.
    pub available: usize,
    /// Total assignments.
    pub placed: usize,
}

impl Profile {
    pub fn new(genome: &Genome, ctx: &ScoringContext<'_>) -> Self {
        let mut counts = vec![0u32; ctx.catalog.subjects().len()];
        let mut day_loads = [0usize; DAYS];
        let mut occupied = [false; CELLS];
        let mut teacher_days: BTreeMap<usize, [bool; DAYS]> = BTreeMap::new();
        let mut available = 0;
        let mut placed = 0;

        for a in genome.assignments() {
            placed += 1;
            if let Some(c) = counts.get_mut(a.subject) {
                *c += 1;
            }
            day_loads[a.day.index()] += 1;
            occupied[cell_index(a.day, a.slot)] = true;
            teacher_days.entry(a.teacher).or_default()[a.day.index()] = true;
            if ctx.teacher_available(a.teacher, a.day, a.slot) {
                available += 1;
            }
        }

        Self {
            counts,
            day_loads,
            occupied,
            teacher_days,
            available,
            placed,
        }
    }

    /// Population standard deviation of the day loads.
    pub fn load_std(&self) -> f64 {
        let n = DAYS as f64;
        let mean = self.day_loads.iter().sum::<usize>() as f64 / n;
        let var = self
            .day_loads
            .iter()
            .map(|&l| (l as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        var.sqrt()
    }

    /// Empty slots strictly between the first and last occupied slot of a
    /// day, or `None` when the day is empty.
    pub fn gaps(&self, day: Day) -> Option<usize> {
        let row = &self.occupied[day.index() * SLOTS..(day.index() + 1) * SLOTS];
        let first = row.iter().position(|&o| o)?;
        let last = row.iter().rposition(|&o| o)?;
        Some(row[first..=last].iter().filter(|&&o| !o).count())
    }

    pub fn used_cells(&self) -> usize {
        self.occupied.iter().filter(|&&o| o).count()
    }

    /// Number of working days of each teacher present in the genome.
    pub fn teacher_day_counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.teacher_days
            .values()
            .map(|days| days.iter().filter(|&&d| d).count())
    }
}
