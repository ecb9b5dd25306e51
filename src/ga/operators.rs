//! Generic sequence operators.
//!
//! Representation-independent building blocks used by the timetable
//! encodings: splicing two gene sequences and swapping positions inside one.
//! They are generic over the gene type, so they work equally on a list of
//! assignments and on the flattened cells of a grid.
//!
//! # Crossover Operators
//!
//! - [`one_point_crossover`]: single cut-point splice — O(n)
//!
//! # Mutation Operators
//!
//! - [`swap_mutation`]: exchange two random positions — O(1)
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Syswerda (1991), "Schedule Optimization Using Genetic Algorithms"

use rand::Rng;

// ============================================================================
// Crossover operators
// ============================================================================

/// Single cut-point crossover.
///
/// Picks a cut uniformly in `[1, len - 1]` and returns
/// `(p1[..cut] + p2[cut..], p2[..cut] + p1[cut..])`.
///
/// Parents of different lengths, or shorter than two genes, cannot be cut
/// meaningfully; they come back as straight copies. Either way the total
/// gene count of the children equals that of the parents.
///
/// # Complexity
/// O(n) time, O(n) space
pub fn one_point_crossover<T: Clone, R: Rng>(
    parent1: &[T],
    parent2: &[T],
    rng: &mut R,
) -> (Vec<T>, Vec<T>) {
    let n = parent1.len();
    if n != parent2.len() || n < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let cut = rng.random_range(1..n);

    let mut child1 = Vec::with_capacity(n);
    child1.extend_from_slice(&parent1[..cut]);
    child1.extend_from_slice(&parent2[cut..]);

    let mut child2 = Vec::with_capacity(n);
    child2.extend_from_slice(&parent2[..cut]);
    child2.extend_from_slice(&parent1[cut..]);

    (child1, child2)
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Swap mutation: exchange two uniformly random positions.
///
/// The two positions may coincide, in which case nothing changes. The
/// multiset of genes is always preserved.
///
/// # Complexity
/// O(1)
pub fn swap_mutation<T, R: Rng>(genes: &mut [T], rng: &mut R) {
    let n = genes.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let j = rng.random_range(0..n);
    genes.swap(i, j);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::create_rng;
    use proptest::prelude::*;

    // ---- one-point crossover ----

    #[test]
    fn test_children_are_complementary() {
        let mut rng = create_rng(42);
        let p1: Vec<u8> = vec![1, 1, 1, 1, 1, 1];
        let p2: Vec<u8> = vec![2, 2, 2, 2, 2, 2];

        for _ in 0..100 {
            let (c1, c2) = one_point_crossover(&p1, &p2, &mut rng);
            let cut = c1.iter().position(|&g| g == 2).expect("cut inside range");
            assert!((1..6).contains(&cut));
            assert!(c1[..cut].iter().all(|&g| g == 1));
            assert!(c1[cut..].iter().all(|&g| g == 2));
            assert!(c2[..cut].iter().all(|&g| g == 2));
            assert!(c2[cut..].iter().all(|&g| g == 1));
        }
    }

    #[test]
    fn test_unequal_lengths_degrade_to_copies() {
        let mut rng = create_rng(42);
        let p1 = vec![1, 2, 3];
        let p2 = vec![4, 5];
        let (c1, c2) = one_point_crossover(&p1, &p2, &mut rng);
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);
    }

    #[test]
    fn test_single_gene_parents_are_copied() {
        let mut rng = create_rng(42);
        let (c1, c2) = one_point_crossover(&[7], &[9], &mut rng);
        assert_eq!(c1, vec![7]);
        assert_eq!(c2, vec![9]);
    }

    proptest! {
        #[test]
        fn prop_crossover_preserves_total_length(
            p1 in proptest::collection::vec(0u8..10, 0..40),
            p2 in proptest::collection::vec(0u8..10, 0..40),
            seed in any::<u64>(),
        ) {
            let mut rng = create_rng(seed);
            let (c1, c2) = one_point_crossover(&p1, &p2, &mut rng);
            prop_assert_eq!(c1.len() + c2.len(), p1.len() + p2.len());
        }

        #[test]
        fn prop_equal_parents_keep_each_length(
            len in 2usize..40,
            seed in any::<u64>(),
        ) {
            let p1: Vec<usize> = (0..len).collect();
            let p2: Vec<usize> = (len..2 * len).collect();
            let mut rng = create_rng(seed);
            let (c1, c2) = one_point_crossover(&p1, &p2, &mut rng);
            prop_assert_eq!(c1.len(), len);
            prop_assert_eq!(c2.len(), len);
        }
    }

    // ---- swap mutation ----

    #[test]
    fn test_swap_preserves_multiset() {
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let mut genes: Vec<Option<u8>> = vec![Some(1), None, Some(2), None, Some(3)];
            swap_mutation(&mut genes, &mut rng);
            let mut sorted = genes.clone();
            sorted.sort();
            assert_eq!(sorted, vec![None, None, Some(1), Some(2), Some(3)]);
        }
    }

    #[test]
    fn test_swap_single_element() {
        let mut rng = create_rng(42);
        let mut genes = vec![0];
        swap_mutation(&mut genes, &mut rng);
        assert_eq!(genes, vec![0]);
    }
}
