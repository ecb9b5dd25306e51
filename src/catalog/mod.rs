//! Static reference data for one timetabling run.
//!
//! A [`Catalog`] holds the subjects, teachers, rooms and cohorts supplied by
//! a loader collaborator. It is built once, validated once, and then only
//! read. Genomes refer to catalog entities by their position (index) in the
//! catalog, so lookups during evaluation are plain slice accesses.
//!
//! # Submodules
//!
//! - [`calendar`]: the fixed 5 × 4 weekly grid ([`Day`], [`Slot`])
//! - [`validation`]: structural checks producing errors and warnings

pub mod calendar;
pub mod validation;

use std::collections::{HashMap, HashSet};

pub use calendar::{cell_index, cell_position, Day, Slot, CELLS, DAYS, SLOTS};

/// A subject with its weekly lesson requirement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subject {
    pub code: String,
    pub name: String,
    /// Lessons that must be placed each week.
    pub required_lessons: u32,
    /// Code of the owning cohort.
    pub cohort: String,
}

impl Subject {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        required_lessons: u32,
        cohort: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            required_lessons,
            cohort: cohort.into(),
        }
    }
}

/// A teacher, the subjects they may teach, and when they can teach.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Teacher {
    pub code: String,
    pub name: String,
    /// Codes of subjects this teacher is qualified for.
    pub subjects: Vec<String>,
    /// Declared (day, slot) availability.
    ///
    /// `None` means no data was supplied; how that is read is decided by
    /// [`AvailabilityPolicy`]. `Some` of an empty set means never available.
    pub availability: Option<HashSet<(Day, Slot)>>,
}

impl Teacher {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            subjects: Vec::new(),
            availability: None,
        }
    }

    /// Adds a subject qualification.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.push(subject.into());
        self
    }

    /// Declares availability windows, replacing any previous ones.
    pub fn with_availability(mut self, windows: impl IntoIterator<Item = (Day, Slot)>) -> Self {
        self.availability = Some(windows.into_iter().collect());
        self
    }

    /// Whether the teacher can teach at `(day, slot)` under `policy`.
    pub fn is_available(&self, day: Day, slot: Slot, policy: AvailabilityPolicy) -> bool {
        match &self.availability {
            Some(windows) => windows.contains(&(day, slot)),
            None => policy == AvailabilityPolicy::MissingMeansAvailable,
        }
    }
}

/// A room and its seating capacity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub code: String,
    pub capacity: u32,
}

impl Room {
    pub fn new(code: impl Into<String>, capacity: u32) -> Self {
        Self {
            code: code.into(),
            capacity,
        }
    }
}

/// A group of students taking the same subjects together.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cohort {
    pub code: String,
    pub students: u32,
    /// Shift label, e.g. `"evening"`.
    pub shift: String,
}

impl Cohort {
    pub fn new(code: impl Into<String>, students: u32, shift: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            students,
            shift: shift.into(),
        }
    }
}

/// How a teacher without any availability data is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AvailabilityPolicy {
    /// No data: the teacher can teach at any time.
    #[default]
    MissingMeansAvailable,
    /// No data: the teacher is never available.
    MissingMeansUnavailable,
}

/// Immutable reference data with index-based lookups.
///
/// Unknown cross-references (a subject naming a cohort that does not exist, a
/// teacher qualified for an unknown subject) are tolerated here and reported
/// by [`validation::validate`].
#[derive(Debug, Clone)]
pub struct Catalog {
    subjects: Vec<Subject>,
    teachers: Vec<Teacher>,
    rooms: Vec<Room>,
    cohorts: Vec<Cohort>,
    /// Per subject: indices of qualified teachers, in catalog order.
    qualified: Vec<Vec<usize>>,
    /// Per subject: index of the owning cohort.
    subject_cohort: Vec<Option<usize>>,
}

impl Catalog {
    /// Builds a catalog and its cross-reference indices.
    pub fn new(
        subjects: Vec<Subject>,
        teachers: Vec<Teacher>,
        rooms: Vec<Room>,
        cohorts: Vec<Cohort>,
    ) -> Self {
        let subject_pos: HashMap<&str, usize> = subjects
            .iter()
            .enumerate()
            .map(|(i, s)| (s.code.as_str(), i))
            .collect();
        let cohort_pos: HashMap<&str, usize> = cohorts
            .iter()
            .enumerate()
            .map(|(i, c)| (c.code.as_str(), i))
            .collect();

        let mut qualified = vec![Vec::new(); subjects.len()];
        for (t, teacher) in teachers.iter().enumerate() {
            for code in &teacher.subjects {
                if let Some(&s) = subject_pos.get(code.as_str()) {
                    if !qualified[s].contains(&t) {
                        qualified[s].push(t);
                    }
                }
            }
        }

        let subject_cohort = subjects
            .iter()
            .map(|s| cohort_pos.get(s.cohort.as_str()).copied())
            .collect();

        Self {
            subjects,
            teachers,
            rooms,
            cohorts,
            qualified,
            subject_cohort,
        }
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn cohorts(&self) -> &[Cohort] {
        &self.cohorts
    }

    /// Subject at a catalog index.
    ///
    /// # Panics
    /// Panics if `index` is out of range. Use [`subject_index`](Self::subject_index)
    /// or [`subjects`](Self::subjects) to resolve caller-supplied codes.
    pub fn subject(&self, index: usize) -> &Subject {
        &self.subjects[index]
    }

    /// Teacher at a catalog index.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn teacher(&self, index: usize) -> &Teacher {
        &self.teachers[index]
    }

    /// Room at a catalog index.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn room(&self, index: usize) -> &Room {
        &self.rooms[index]
    }

    /// Cohort at a catalog index.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn cohort(&self, index: usize) -> &Cohort {
        &self.cohorts[index]
    }

    /// Indices of teachers qualified for a subject, in catalog order.
    ///
    /// # Panics
    /// Panics if `subject` is out of range.
    pub fn qualified_teachers(&self, subject: usize) -> &[usize] {
        &self.qualified[subject]
    }

    /// Whether `teacher` is qualified for `subject`.
    ///
    /// # Panics
    /// Panics if `subject` is out of range.
    pub fn is_qualified(&self, teacher: usize, subject: usize) -> bool {
        self.qualified[subject].contains(&teacher)
    }

    /// Index of the cohort owning a subject, if that cohort exists.
    ///
    /// # Panics
    /// Panics if `subject` is out of range.
    pub fn subject_cohort(&self, subject: usize) -> Option<usize> {
        self.subject_cohort[subject]
    }

    /// Students attending a subject (0 when its cohort is unknown).
    ///
    /// # Panics
    /// Panics if `subject` is out of range.
    pub fn subject_students(&self, subject: usize) -> u32 {
        self.subject_cohort(subject)
            .map_or(0, |c| self.cohorts[c].students)
    }

    /// Rooms able to seat the given number of students, in catalog order.
    pub fn adequate_rooms(&self, students: u32) -> Vec<usize> {
        self.rooms
            .iter()
            .enumerate()
            .filter(|(_, r)| r.capacity >= students)
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the room with the largest capacity (first on ties).
    pub fn largest_room(&self) -> Option<usize> {
        self.rooms
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, r)| r.capacity)
            .map(|(i, _)| i)
    }

    /// Position of a subject by code.
    pub fn subject_index(&self, code: &str) -> Option<usize> {
        self.subjects.iter().position(|s| s.code == code)
    }

    /// Position of a cohort by code.
    pub fn cohort_index(&self, code: &str) -> Option<usize> {
        self.cohorts.iter().position(|c| c.code == code)
    }

    /// Whether `teacher` may teach at `(day, slot)` under `policy`.
    ///
    /// # Panics
    /// Panics if `teacher` is out of range.
    pub fn teacher_available(
        &self,
        teacher: usize,
        day: Day,
        slot: Slot,
        policy: AvailabilityPolicy,
    ) -> bool {
        self.teachers[teacher].is_available(day, slot, policy)
    }

    /// Total lessons required across all subjects.
    pub fn total_required_lessons(&self) -> usize {
        self.subjects
            .iter()
            .map(|s| s.required_lessons as usize)
            .sum()
    }
}
