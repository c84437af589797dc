//! K-fold cross-validation indices
//!
//! Folds are contiguous and unshuffled; the first `n % k` folds hold one
//! extra sample.

use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, Copy)]
pub struct KFold {
    pub n_splits: usize,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    /// `(train_indices, test_indices)` for each fold
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(AnalysisError::InvalidParameter(format!(
                "k-fold needs at least 2 splits, got {}",
                self.n_splits
            )));
        }
        if n_samples < self.n_splits {
            return Err(AnalysisError::InsufficientSamples {
                context: format!("{}-fold cross-validation", self.n_splits),
                required: self.n_splits,
                available: n_samples,
            });
        }

        let base = n_samples / self.n_splits;
        let extra = n_samples % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            let stop = start + size;
            let test: Vec<usize> = (start..stop).collect();
            let train: Vec<usize> = (0..start).chain(stop..n_samples).collect();
            folds.push((train, test));
            start = stop;
        }

        Ok(folds)
    }
}
