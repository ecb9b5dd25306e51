//! Parent selection.
//!
//! Selection reads a population snapshot that stays untouched while the
//! next generation is being built, so repeated calls within one generation
//! all see the same fitness values.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::types::{Direction, Individual};
use rand::seq::index;
use rand::Rng;

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use u_timetable::ga::Selection;
///
/// // Tournament with size 3 (moderate selection pressure)
/// let sel = Selection::Tournament(3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Tournament selection: draw `k` distinct individuals uniformly at
    /// random, keep the best.
    ///
    /// Higher `k` = stronger selection pressure. `k` larger than the
    /// population degrades to "pick the best of everyone".
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Selects a parent index from the population.
    ///
    /// The caller clones the returned individual before varying it, so the
    /// population itself is never aliased by offspring.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<I: Individual, R: Rng>(
        &self,
        population: &[I],
        direction: Direction,
        rng: &mut R,
    ) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Tournament(k) => tournament(population, *k, direction, rng),
        }
    }
}

/// Tournament without replacement: sample k distinct indices, return the best.
///
/// Ties keep the earliest-drawn contender.
fn tournament<I: Individual, R: Rng>(
    population: &[I],
    k: usize,
    direction: Direction,
    rng: &mut R,
) -> usize {
    let n = population.len();
    let k = k.clamp(1, n);

    let contenders = index::sample(rng, n, k);
    let mut best_idx = contenders.index(0);
    for idx in contenders.iter().skip(1) {
        if direction.is_better(population[idx].fitness(), population[best_idx].fitness()) {
            best_idx = idx;
        }
    }
    best_idx
}
