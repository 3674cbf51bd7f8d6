//! Seeded row sampling.

use polars::prelude::*;
use rand::prelude::*;

/// Pick exactly `keep` of `total` rows, uniformly without replacement.
///
/// Returns a boolean mask of length `total`. The chosen rows keep their
/// original relative order when the mask is applied with
/// `DataFrame::filter`. When `keep >= total` every row is kept.
pub fn sample_row_mask(total: usize, keep: usize, seed: u64) -> BooleanChunked {
    let mut mask = vec![keep >= total; total];

    if keep < total {
        let mut rng = StdRng::seed_from_u64(seed);
        let indices: Vec<usize> = (0..total).collect();
        for &idx in indices.choose_multiple(&mut rng, keep) {
            mask[idx] = true;
        }
    }

    BooleanChunked::from_slice("sample".into(), &mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(mask: &BooleanChunked) -> Vec<usize> {
        mask.into_iter()
            .enumerate()
            .filter_map(|(i, v)| v.unwrap_or(false).then_some(i))
            .collect()
    }

    #[test]
    fn test_exact_count() {
        let mask = sample_row_mask(5000, 2000, 42);
        assert_eq!(mask.len(), 5000);
        assert_eq!(selected(&mask).len(), 2000);
    }

    #[test]
    fn test_same_seed_same_rows() {
        let a = selected(&sample_row_mask(3000, 2000, 42));
        let b = selected(&sample_row_mask(3000, 2000, 42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_rows() {
        let a = selected(&sample_row_mask(3000, 100, 42));
        let b = selected(&sample_row_mask(3000, 100, 7));
        assert_ne!(a, b);
    }

    #[test]
    fn test_keep_all_when_small() {
        let mask = sample_row_mask(10, 2000, 42);
        assert_eq!(selected(&mask), (0..10).collect::<Vec<_>>());
    }
}
