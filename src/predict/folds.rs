//! Seeded K-fold partitioning.
//!
//! Positions `0..n` are shuffled with a seeded `StdRng` and sliced into `k`
//! contiguous validation blocks. The first `n % k` folds get one extra row.
//! The same `(n, k, seed)` always yields the same folds.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::domain::Fold;
use crate::error::PipelineError;

/// Partition `n` labeled positions into `k` disjoint validation folds.
pub fn partition(n: usize, k: usize, seed: u64) -> Result<Vec<Fold>, PipelineError> {
    if k < 2 {
        return Err(PipelineError::configuration(format!(
            "fold count must be at least 2, got {k}"
        )));
    }
    if n < k {
        return Err(PipelineError::configuration(format!(
            "{n} labeled rows cannot fill {k} folds"
        )));
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let base = n / k;
    let extra = n % k;

    let mut folds = Vec::with_capacity(k);
    let mut start = 0;
    for index in 0..k {
        let size = base + usize::from(index < extra);
        folds.push(Fold {
            index,
            validation: order[start..start + size].to_vec(),
        });
        start += size;
    }

    Ok(folds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_cover_every_position_exactly_once() {
        for n in [5, 6, 12, 37, 101] {
            let folds = partition(n, 5, 42).unwrap();
            assert_eq!(folds.len(), 5);

            let mut seen = vec![0usize; n];
            for fold in &folds {
                for &i in &fold.validation {
                    seen[i] += 1;
                }
            }
            assert!(seen.iter().all(|&c| c == 1), "n={n}: {seen:?}");
        }
    }

    #[test]
    fn fold_sizes_differ_by_at_most_one() {
        let folds = partition(23, 5, 42).unwrap();
        let sizes: Vec<usize> = folds.iter().map(|f| f.validation.len()).collect();
        assert_eq!(sizes, vec![5, 5, 5, 4, 4]);
    }

    #[test]
    fn same_seed_gives_identical_folds() {
        assert_eq!(partition(50, 5, 42).unwrap(), partition(50, 5, 42).unwrap());
        assert_ne!(partition(50, 5, 42).unwrap(), partition(50, 5, 7).unwrap());
    }

    #[test]
    fn too_few_rows_is_a_configuration_error() {
        let err = partition(4, 5, 42).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration { .. }));
        assert!(partition(10, 1, 42).is_err());
    }
}
