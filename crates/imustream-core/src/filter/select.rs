//! Randomized selection (quickselect with a uniformly random pivot)
//!
//! Finds the element of a given sorted rank without sorting the whole array.
//! Expected O(n); worst case O(n^2), which is fine for filter windows of a
//! dozen elements.

use rand::Rng;
use std::cmp::Ordering;

/// Return the element that would sit at index `rank` if `values` were sorted
///
/// Reorders `values` in place. Returns `None` when `rank >= values.len()`.
/// The result depends only on the multiset of values, never on the pivots
/// the generator happens to pick.
pub fn select_rank<T, R>(values: &mut [T], rank: usize, rng: &mut R) -> Option<T>
where
    T: Copy + PartialOrd,
    R: Rng + ?Sized,
{
    if rank >= values.len() {
        return None;
    }

    // Active partition is values[lo..hi] and always contains `rank`
    let mut lo = 0;
    let mut hi = values.len();

    loop {
        let pivot_idx = rng.gen_range(lo..hi);
        values.swap(pivot_idx, hi - 1);
        let pivot = values[hi - 1];

        // Everything <= pivot moves to the front, pivot itself excluded
        let mut store = lo;
        for i in lo..hi - 1 {
            if values[i] <= pivot {
                values.swap(i, store);
                store += 1;
            }
        }
        values.swap(store, hi - 1);

        match rank.cmp(&store) {
            Ordering::Equal => return Some(pivot),
            Ordering::Less => hi = store,
            Ordering::Greater => lo = store + 1,
        }
    }
}

/// Median of `values`: the exact middle for odd lengths, the lower-middle
/// element for even lengths
///
/// Returns `None` for an empty slice.
pub fn median<T, R>(values: &mut [T], rng: &mut R) -> Option<T>
where
    T: Copy + PartialOrd,
    R: Rng + ?Sized,
{
    if values.is_empty() {
        return None;
    }
    let middle = (values.len() - 1) / 2;
    select_rank(values, middle, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_median_odd() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut values = [1, 2, 3, 4, 100];
        assert_eq!(median(&mut values, &mut rng), Some(3));
    }

    #[test]
    fn test_median_even_takes_lower_middle() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut values = [40, 10, 30, 20];
        assert_eq!(median(&mut values, &mut rng), Some(20));
    }

    #[test]
    fn test_median_single_and_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(median(&mut [7i16], &mut rng), Some(7));
        assert_eq!(median::<i16, _>(&mut [], &mut rng), None);
    }

    #[test]
    fn test_median_with_duplicates() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut values = [5, 5, 5, 1, 9, 5, 5];
        assert_eq!(median(&mut values, &mut rng), Some(5));
    }

    #[test]
    fn test_median_independent_of_seed() {
        let original = [
            -312i16, 88, 17, 17, 2040, -5, 0, 901, -77, 17, 3, -1200, 45,
        ];
        let mut sorted = original;
        sorted.sort_unstable();
        let expected = sorted[(sorted.len() - 1) / 2];

        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut values = original;
            assert_eq!(
                median(&mut values, &mut rng),
                Some(expected),
                "seed {} picked a different median",
                seed
            );
        }
    }

    #[test]
    fn test_select_every_rank_matches_sort() {
        let original = [9.5f32, -1.0, 3.25, 3.25, 0.0, 12.0, -7.5, 2.0];
        let mut sorted = original;
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for (rank, &want) in sorted.iter().enumerate() {
            let mut values = original;
            assert_eq!(select_rank(&mut values, rank, &mut rng), Some(want));
        }
    }

    #[test]
    fn test_select_rank_out_of_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut values = [1, 2, 3];
        assert_eq!(select_rank(&mut values, 3, &mut rng), None);
        assert_eq!(values, [1, 2, 3]);
    }
}
