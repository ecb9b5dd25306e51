//! Day × slot grid genome.

use super::{Assignment, Repairable, RepairReport, Resolution};
use crate::catalog::{cell_index, cell_position, Catalog, Day, Slot, CELLS, DAYS, SLOTS};
use crate::demand::LessonDemand;
use crate::ga::operators::swap_mutation;
use rand::seq::{index, IndexedRandom, SliceRandom};
use rand::Rng;

/// Most days one crossover exchanges.
const MAX_EXCHANGED_DAYS: usize = 3;

/// A 5 × 4 matrix of optional assignments, stored row-major by day.
///
/// An occupied cell's assignment always carries that cell's day and slot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridGenome {
    cells: [Option<Assignment>; CELLS],
}

impl Default for GridGenome {
    fn default() -> Self {
        Self::empty()
    }
}

impl GridGenome {
    pub fn empty() -> Self {
        Self { cells: [None; CELLS] }
    }

    pub fn get(&self, day: Day, slot: Slot) -> Option<&Assignment> {
        self.cells[cell_index(day, slot)].as_ref()
    }

    pub fn cells(&self) -> &[Option<Assignment>; CELLS] {
        &self.cells
    }

    /// The four cells of one day.
    pub fn day(&self, day: Day) -> &[Option<Assignment>] {
        let start = day.index() * SLOTS;
        &self.cells[start..start + SLOTS]
    }

    /// Puts an assignment into the cell named by its own day and slot,
    /// returning whatever occupied it.
    pub fn place(&mut self, assignment: Assignment) -> Option<Assignment> {
        self.cells[cell_index(assignment.day, assignment.slot)].replace(assignment)
    }

    pub fn clear(&mut self, day: Day, slot: Slot) -> Option<Assignment> {
        self.cells[cell_index(day, slot)].take()
    }

    /// Occupied cells in row-major order.
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> + '_ {
        self.cells.iter().flatten()
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Builds a random grid.
    ///
    /// Subjects are visited in random order. Each gets as many distinct
    /// random days as it has blocks (days repeat only when a subject has more
    /// blocks than the week has days). A block goes into the first run of
    /// contiguous free slots on its day; failing that its lessons take any
    /// free cell of that day, then any free cell of the week. Lessons that
    /// still find no cell are dropped.
    pub fn random<R: Rng>(
        catalog: &Catalog,
        demand: &LessonDemand,
        resolution: &Resolution,
        rng: &mut R,
    ) -> Self {
        let mut grid = Self::empty();
        let mut subjects = demand.subjects().to_vec();
        subjects.shuffle(rng);

        for subject in subjects {
            let blocks = demand.blocks(subject);
            let mut days: Vec<usize> = Vec::with_capacity(blocks.len());
            while days.len() < blocks.len() {
                let take = (blocks.len() - days.len()).min(DAYS);
                days.extend(index::sample(rng, DAYS, take).iter());
            }

            let teacher = catalog
                .qualified_teachers(subject)
                .choose(rng)
                .copied()
                .unwrap_or_else(|| resolution.teacher(subject));
            let room = resolution.room(subject);

            for (&size, &day) in blocks.iter().zip(&days) {
                for cell in grid.block_cells(day, size as usize) {
                    let (day, slot) = cell_position(cell);
                    grid.cells[cell] = Some(Assignment {
                        subject,
                        teacher,
                        room,
                        day,
                        slot,
                    });
                }
            }
        }

        grid
    }

    /// Free cells for a block of `size` lessons on `day`.
    ///
    /// Returns fewer than `size` cells only when the grid runs out of space.
    fn block_cells(&self, day: usize, size: usize) -> Vec<usize> {
        let row = day * SLOTS;
        let free = |cell: &usize| self.cells[*cell].is_none();

        if size <= SLOTS {
            for start in 0..=SLOTS - size {
                if (row + start..row + start + size).all(|c| free(&c)) {
                    return (row + start..row + start + size).collect();
                }
            }
        }

        let mut cells: Vec<usize> = (row..row + SLOTS).filter(free).take(size).collect();
        if cells.len() < size {
            let rest = size - cells.len();
            cells.extend(
                (0..CELLS)
                    .filter(|c| !(row..row + SLOTS).contains(c))
                    .filter(free)
                    .take(rest),
            );
        }
        cells
    }

    /// Day-block exchange: swaps 1 to 3 distinct whole days between copies
    /// of both parents.
    ///
    /// The children usually hold too many lessons of some subjects and too
    /// few of others; callers repair them before scoring.
    pub fn day_exchange<R: Rng>(&self, other: &Self, rng: &mut R) -> (Self, Self) {
        let mut a = self.clone();
        let mut b = other.clone();
        let count = rng.random_range(1..=MAX_EXCHANGED_DAYS);
        for day in index::sample(rng, DAYS, count).iter() {
            let row = day * SLOTS..(day + 1) * SLOTS;
            a.cells[row.clone()].swap_with_slice(&mut b.cells[row]);
        }
        (a, b)
    }

    /// Swaps the contents of random cell pairs, `max(1, CELLS × rate)` times.
    ///
    /// Empty cells take part, so lessons move without the total changing. A
    /// non-positive rate leaves the grid untouched.
    pub fn mutate<R: Rng>(&mut self, rate: f64, rng: &mut R) {
        if rate <= 0.0 {
            return;
        }
        let swaps = ((CELLS as f64 * rate) as usize).max(1);
        for _ in 0..swaps {
            swap_mutation(&mut self.cells, rng);
        }
        self.sync_positions();
    }

    fn sync_positions(&mut self) {
        for (cell, content) in self.cells.iter_mut().enumerate() {
            if let Some(a) = content {
                let (day, slot) = cell_position(cell);
                a.day = day;
                a.slot = slot;
            }
        }
    }
}

impl Repairable for GridGenome {
    /// Two row-major passes.
    ///
    /// The first keeps the first `required` occurrences of every subject and
    /// clears the rest (subjects outside the demand have a requirement of
    /// zero). The second fills each subject's shortfall, in catalog order,
    /// into the first empty cells with the subject's default teacher and
    /// room. Availability and teacher or room clashes are not checked.
    fn repair(&mut self, demand: &LessonDemand, resolution: &Resolution) -> RepairReport {
        let mut report = RepairReport::default();
        let mut seen = vec![0u32; demand.subject_slots()];

        for cell in self.cells.iter_mut() {
            let Some(subject) = cell.map(|a| a.subject) else { continue };
            let required = demand.required(subject);
            match seen.get_mut(subject) {
                Some(count) if *count < required => *count += 1,
                _ => {
                    *cell = None;
                    report.removed += 1;
                }
            }
        }

        for &subject in demand.subjects() {
            let mut missing = demand.required(subject).saturating_sub(seen[subject]);
            for cell in 0..CELLS {
                if missing == 0 {
                    break;
                }
                if self.cells[cell].is_none() {
                    let (day, slot) = cell_position(cell);
                    self.cells[cell] = Some(resolution.assignment(subject, day, slot));
                    report.added += 1;
                    missing -= 1;
                }
            }
            report.shortfall += missing as usize;
        }

        if report.shortfall > 0 {
            log::trace!(
                "repair: grid full, {} lesson(s) left unplaced",
                report.shortfall
            );
        }
        report
    }
}
