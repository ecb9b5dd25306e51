//! Candidate timetables.
//!
//! A genome is one complete weekly timetable in one of two shapes:
//!
//! - [`ListGenome`]: an unordered sequence of [`Assignment`]s. Duplicates,
//!   omissions and clashes are representable and left to scoring.
//! - [`GridGenome`]: a day × slot matrix holding at most one assignment per
//!   cell. Cell collisions are impossible, per-subject completeness is
//!   restored by [`Repairable::repair`].
//!
//! [`Genome`] tags the two so the evolutionary loop and the scoring
//! policies never need to know which one they hold.

mod grid;
mod list;

pub use grid::GridGenome;
pub use list::ListGenome;

use crate::catalog::{Catalog, Day, Slot};
use crate::demand::LessonDemand;

/// A lesson bound to a teacher, a room and a (day, slot) position.
///
/// All references are catalog indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub subject: usize,
    pub teacher: usize,
    pub room: usize,
    pub day: Day,
    pub slot: Slot,
}

/// Per-subject default teacher and room.
///
/// Used wherever a lesson must be created without a random choice (grid
/// repair) or when the catalog offers no qualified teacher or adequate room.
/// The fallbacks are the first teacher and the largest room, the same ones
/// [`validate`](crate::catalog::validation::validate) warns about.
#[derive(Debug, Clone)]
pub struct Resolution {
    teacher: Vec<usize>,
    room: Vec<usize>,
}

impl Resolution {
    pub fn new(catalog: &Catalog) -> Self {
        let fallback_room = catalog.largest_room().unwrap_or(0);
        let (teacher, room) = (0..catalog.subjects().len())
            .map(|s| {
                let teacher = catalog.qualified_teachers(s).first().copied().unwrap_or(0);
                let room = catalog
                    .adequate_rooms(catalog.subject_students(s))
                    .first()
                    .copied()
                    .unwrap_or(fallback_room);
                (teacher, room)
            })
            .unzip();
        Self { teacher, room }
    }

    /// Default teacher of a subject.
    pub fn teacher(&self, subject: usize) -> usize {
        self.teacher.get(subject).copied().unwrap_or(0)
    }

    /// Default room of a subject.
    pub fn room(&self, subject: usize) -> usize {
        self.room.get(subject).copied().unwrap_or(0)
    }

    /// A default assignment of `subject` at `(day, slot)`.
    pub fn assignment(&self, subject: usize, day: Day, slot: Slot) -> Assignment {
        Assignment {
            subject,
            teacher: self.teacher(subject),
            room: self.room(subject),
            day,
            slot,
        }
    }
}

/// What a repair pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Excess lessons cleared.
    pub removed: usize,
    /// Missing lessons inserted.
    pub added: usize,
    /// Missing lessons that found no empty cell.
    pub shortfall: usize,
}

impl RepairReport {
    /// Whether the genome was left untouched.
    pub fn is_noop(&self) -> bool {
        self.removed == 0 && self.added == 0
    }
}

/// Restores exact per-subject lesson counts.
pub trait Repairable {
    fn repair(&mut self, demand: &LessonDemand, resolution: &Resolution) -> RepairReport;
}

/// A candidate timetable in either representation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Genome {
    List(ListGenome),
    Grid(GridGenome),
}

impl Genome {
    /// Read-only iteration over every placed assignment.
    ///
    /// Grid genomes yield in row-major (day, slot) order.
    pub fn assignments(&self) -> Box<dyn Iterator<Item = &Assignment> + '_> {
        match self {
            Genome::List(g) => Box::new(g.assignments().iter()),
            Genome::Grid(g) => Box::new(g.assignments()),
        }
    }

    /// Number of placed assignments.
    pub fn len(&self) -> usize {
        match self {
            Genome::List(g) => g.len(),
            Genome::Grid(g) => g.occupied(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Placed lessons per catalog subject.
    ///
    /// Assignments referencing a subject index `>= subjects` are ignored.
    pub fn subject_counts(&self, subjects: usize) -> Vec<u32> {
        let mut counts = vec![0u32; subjects];
        for a in self.assignments() {
            if let Some(c) = counts.get_mut(a.subject) {
                *c += 1;
            }
        }
        counts
    }
}

impl Repairable for Genome {
    fn repair(&mut self, demand: &LessonDemand, resolution: &Resolution) -> RepairReport {
        match self {
            Genome::List(g) => g.repair(demand, resolution),
            Genome::Grid(g) => g.repair(demand, resolution),
        }
    }
}

impl From<ListGenome> for Genome {
    fn from(g: ListGenome) -> Self {
        Genome::List(g)
    }
}

impl From<GridGenome> for Genome {
    fn from(g: GridGenome) -> Self {
        Genome::Grid(g)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Cohort, Room, Subject, Teacher};

    #[test]
    fn test_resolution_prefers_qualified_and_adequate() {
        let cat = fixtures::single_cohort(&[("MATH", 2), ("HIST", 1)]);
        let res = Resolution::new(&cat);

        assert_eq!(res.teacher(0), 0);
        assert_eq!(res.teacher(1), 1);
        // 35 students: only R-main fits.
        assert_eq!(res.room(0), 1);
    }

    #[test]
    fn test_resolution_fallbacks() {
        let cat = Catalog::new(
            vec![Subject::new("S", "S", 2, "C")],
            vec![Teacher::new("T0", "A"), Teacher::new("T1", "B")],
            vec![Room::new("R0", 10), Room::new("R1", 25), Room::new("R2", 15)],
            vec![Cohort::new("C", 90, "evening")],
        );
        let res = Resolution::new(&cat);
        assert_eq!(res.teacher(0), 0);
        assert_eq!(res.room(0), 1);
    }

    #[test]
    fn test_genome_counts_both_shapes() {
        let res = Resolution::new(&fixtures::single_cohort(&[("A", 2), ("B", 1)]));
        let list = ListGenome::new(vec![
            res.assignment(0, Day::Monday, Slot::First),
            res.assignment(0, Day::Monday, Slot::First),
            res.assignment(1, Day::Friday, Slot::Fourth),
        ]);
        let mut grid = GridGenome::empty();
        grid.place(res.assignment(1, Day::Tuesday, Slot::Second));

        let list: Genome = list.into();
        let grid: Genome = grid.into();
        assert_eq!(list.subject_counts(2), vec![2, 1]);
        assert_eq!(list.len(), 3);
        assert_eq!(grid.subject_counts(2), vec![0, 1]);
        assert_eq!(grid.len(), 1);
        assert!(!grid.is_empty());
    }

    #[test]
    fn test_counts_ignore_unknown_subjects() {
        let res = Resolution::new(&fixtures::single_cohort(&[("A", 1)]));
        let g: Genome = ListGenome::new(vec![res.assignment(7, Day::Monday, Slot::First)]).into();
        assert_eq!(g.subject_counts(1), vec![0]);
    }
}
