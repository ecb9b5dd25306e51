//! Lesson demand: what has to be placed.
//!
//! Each subject's weekly requirement is expanded into atomic [`Lesson`]s.
//! Lessons are grouped into same-day blocks following a fixed split table
//! (2 → `[2]`, 3 → `[2, 1]`, 4 → `[2, 2]`), with a greedy equal split capped
//! at three lessons per block for any other count. Blocks are advisory: they
//! guide initial placement and scoring, nothing rejects a genome for
//! ignoring them.

use crate::catalog::{Catalog, CELLS};

/// Largest block produced by the greedy split.
pub const MAX_BLOCK: u32 = 3;

/// One atomic lesson of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lesson {
    /// Catalog index of the subject.
    pub subject: usize,
    /// 1-based position within the subject.
    pub sequence: u32,
    /// Index of the same-day block within the subject's block plan.
    pub block: usize,
}

/// Splits a lesson count into same-day block sizes.
///
/// ```
/// use u_timetable::demand::split_blocks;
///
/// assert_eq!(split_blocks(3), vec![2, 1]);
/// assert_eq!(split_blocks(4), vec![2, 2]);
/// assert_eq!(split_blocks(7), vec![3, 2, 2]);
/// ```
pub fn split_blocks(count: u32) -> Vec<u32> {
    match count {
        0 => Vec::new(),
        1 => vec![1],
        2 => vec![2],
        3 => vec![2, 1],
        4 => vec![2, 2],
        n => {
            let blocks = n.div_ceil(MAX_BLOCK);
            let base = n / blocks;
            let extra = n % blocks;
            (0..blocks).map(|i| base + u32::from(i < extra)).collect()
        }
    }
}

/// Total required lessons exceed the cells they can occupy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("cohort '{cohort}' requires {required} lessons but only {capacity} cells exist")]
pub struct InfeasibleDemand {
    pub cohort: String,
    pub required: usize,
    pub capacity: usize,
}

/// The ordered list of lessons for one run, with per-subject block plans.
#[derive(Debug, Clone)]
pub struct LessonDemand {
    lessons: Vec<Lesson>,
    /// Subject catalog indices covered by this demand, in catalog order.
    subjects: Vec<usize>,
    /// Per catalog subject: required count (0 when not covered).
    required: Vec<u32>,
    /// Per catalog subject: block sizes (empty when not covered).
    blocks: Vec<Vec<u32>>,
}

impl LessonDemand {
    /// Expands every subject in the catalog.
    pub fn build(catalog: &Catalog) -> Self {
        Self::build_filtered(catalog, |_| true)
    }

    /// Expands only the subjects owned by one cohort.
    pub fn for_cohort(catalog: &Catalog, cohort: usize) -> Self {
        Self::build_filtered(catalog, |s| catalog.subject_cohort(s) == Some(cohort))
    }

    fn build_filtered(catalog: &Catalog, include: impl Fn(usize) -> bool) -> Self {
        let n = catalog.subjects().len();
        let mut lessons = Vec::new();
        let mut subjects = Vec::new();
        let mut required = vec![0; n];
        let mut blocks = vec![Vec::new(); n];

        for (s, subject) in catalog.subjects().iter().enumerate() {
            if !include(s) {
                continue;
            }
            let plan = split_blocks(subject.required_lessons);
            let mut sequence = 1;
            for (b, &size) in plan.iter().enumerate() {
                for _ in 0..size {
                    lessons.push(Lesson {
                        subject: s,
                        sequence,
                        block: b,
                    });
                    sequence += 1;
                }
            }
            subjects.push(s);
            required[s] = subject.required_lessons;
            blocks[s] = plan;
        }

        Self {
            lessons,
            subjects,
            required,
            blocks,
        }
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// Subjects covered by this demand, in catalog order.
    pub fn subjects(&self) -> &[usize] {
        &self.subjects
    }

    /// Required lessons for a catalog subject (0 if not covered).
    pub fn required(&self, subject: usize) -> u32 {
        self.required.get(subject).copied().unwrap_or(0)
    }

    /// Block plan of a catalog subject.
    pub fn blocks(&self, subject: usize) -> &[u32] {
        self.blocks.get(subject).map_or(&[], Vec::as_slice)
    }

    /// Number of catalog subjects (length of per-subject count vectors).
    pub fn subject_slots(&self) -> usize {
        self.required.len()
    }

    /// Checks each cohort's demand against the cells available to it.
    ///
    /// A cohort attends one lesson at a time, so it never has more than
    /// [`CELLS`] usable positions, whatever the number of rooms.
    pub fn check_capacity(&self, catalog: &Catalog) -> Vec<InfeasibleDemand> {
        let mut per_cohort = vec![0usize; catalog.cohorts().len()];
        for lesson in &self.lessons {
            if let Some(c) = catalog.subject_cohort(lesson.subject) {
                per_cohort[c] += 1;
            }
        }
        per_cohort
            .iter()
            .enumerate()
            .filter(|(_, &required)| required > CELLS)
            .map(|(c, &required)| InfeasibleDemand {
                cohort: catalog.cohort(c).code.clone(),
                required,
                capacity: CELLS,
            })
            .collect()
    }
}
