//! Train/test split
//!
//! The test set takes `ceil(test_fraction * n)` rows, the training set the
//! rest. Rows are assigned from one seeded permutation: test first.

use crate::dataset::FeatureMatrix;
use crate::error::{AnalysisError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: FeatureMatrix,
    pub test: FeatureMatrix,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

pub fn train_test_split(data: &FeatureMatrix, test_fraction: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(AnalysisError::InvalidParameter(format!(
            "test_fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let n = data.len();
    let n_test = (test_fraction * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(AnalysisError::InsufficientSamples {
            context: format!("train/test split (test_fraction = {})", test_fraction),
            required: 2,
            available: n,
        });
    }

    let mut permutation: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let test_indices = permutation[..n_test].to_vec();
    let train_indices = permutation[n_test..].to_vec();

    Ok(TrainTestSplit {
        train: data.subset(&train_indices),
        test: data.subset(&test_indices),
        train_indices,
        test_indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(n: usize) -> FeatureMatrix {
        FeatureMatrix::new(
            vec!["x".into()],
            (0..n).map(|i| vec![i as f64]).collect(),
            (0..n).map(|i| i as f64).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_eighty_twenty_proportions() {
        let split = train_test_split(&data(100), 0.2, 42).unwrap();
        assert_eq!(split.train.len(), 80);
        assert_eq!(split.test.len(), 20);

        let split = train_test_split(&data(47), 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 10); // ceil(9.4)
        assert_eq!(split.train.len(), 37);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = train_test_split(&data(50), 0.2, 42).unwrap();
        let b = train_test_split(&data(50), 0.2, 42).unwrap();
        assert_eq!(a.test_indices, b.test_indices);
        assert_eq!(a.train_indices, b.train_indices);

        let c = train_test_split(&data(50), 0.2, 7).unwrap();
        assert_ne!(a.test_indices, c.test_indices);
    }

    #[test]
    fn test_partition_covers_all_rows() {
        let split = train_test_split(&data(30), 0.2, 42).unwrap();
        let mut all: Vec<usize> = split.train_indices.iter().chain(&split.test_indices).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..30).collect::<Vec<_>>());
    }

    #[test]
    fn test_too_few_rows() {
        assert!(train_test_split(&data(1), 0.2, 42).is_err());
        assert!(train_test_split(&data(0), 0.2, 42).is_err());
    }

    #[test]
    fn test_fraction_out_of_range() {
        assert!(train_test_split(&data(10), 0.0, 42).is_err());
        assert!(train_test_split(&data(10), 1.0, 42).is_err());
    }
}
