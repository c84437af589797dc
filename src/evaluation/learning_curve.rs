//! Learning Curve
//!
//! For each training size, a fresh pipeline with the selected parameters is
//! fit on the first `size` rows of every CV training fold, then scored on
//! those rows and on the held-out fold. Scores are aggregated across folds.

use crate::dataset::FeatureMatrix;
use crate::error::{AnalysisError, Result};
use crate::model::{ForestParams, ForestPipeline, Regressor};
use crate::selection::KFold;
use crate::utils::{mean, population_std};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LearningCurvePoint {
    pub train_size: usize,
    pub train_mean: f64,
    pub train_std: f64,
    pub test_mean: f64,
    pub test_std: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearningCurve {
    pub points: Vec<LearningCurvePoint>,
}

/// Absolute sizes from fractions of `n_max`: floored, clipped to `[1, n_max]`,
/// deduplicated in order
pub fn training_sizes(fractions: &[f64], n_max: usize) -> Vec<usize> {
    let mut sizes: Vec<usize> = Vec::with_capacity(fractions.len());
    for &f in fractions {
        let size = ((f * n_max as f64).floor() as usize).clamp(1, n_max.max(1));
        if !sizes.contains(&size) {
            sizes.push(size);
        }
    }
    sizes
}

pub fn learning_curve(
    params: &ForestParams,
    data: &FeatureMatrix,
    n_folds: usize,
    fractions: &[f64],
) -> Result<LearningCurve> {
    if fractions.is_empty() {
        return Err(AnalysisError::InvalidParameter(
            "learning curve needs at least one training fraction".to_string(),
        ));
    }
    let folds = KFold::new(n_folds).split(data.len())?;
    let n_max = folds[0].0.len();
    let sizes = training_sizes(fractions, n_max);

    tracing::info!(
        "Learning curve: {} sizes ({}..={}) x {} folds",
        sizes.len(),
        sizes[0],
        sizes[sizes.len() - 1],
        folds.len()
    );

    let jobs: Vec<(usize, usize)> = sizes
        .iter()
        .flat_map(|&size| (0..folds.len()).map(move |f| (size, f)))
        .collect();

    let scores: Vec<(f64, f64)> = jobs
        .par_iter()
        .map(|&(size, f)| -> Result<(f64, f64)> {
            let (train_idx, test_idx) = &folds[f];
            let train = data.subset(&train_idx[..size.min(train_idx.len())]);
            let test = data.subset(test_idx);

            let model = ForestPipeline::fit(params, &train.records, &train.targets)?;
            Ok((
                model.score(&train.records, &train.targets),
                model.score(&test.records, &test.targets),
            ))
        })
        .collect::<Result<_>>()?;

    let points = sizes
        .iter()
        .zip(scores.chunks(folds.len()))
        .map(|(&train_size, chunk)| {
            let train: Vec<f64> = chunk.iter().map(|s| s.0).collect();
            let test: Vec<f64> = chunk.iter().map(|s| s.1).collect();
            LearningCurvePoint {
                train_size,
                train_mean: mean(&train),
                train_std: population_std(&train),
                test_mean: mean(&test),
                test_std: population_std(&test),
            }
        })
        .collect();

    Ok(LearningCurve { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::linspace;

    fn data(n: usize) -> FeatureMatrix {
        let records: Vec<Vec<f64>> = (0..n).map(|i| vec![(i * 11 % n) as f64]).collect();
        let targets: Vec<f64> = records.iter().map(|r| r[0] * 0.5).collect();
        FeatureMatrix::new(vec!["x".into()], records, targets).unwrap()
    }

    #[test]
    fn test_training_sizes_default_fractions() {
        let sizes = training_sizes(&linspace(0.1, 1.0, 10), 36);
        assert_eq!(sizes, vec![3, 7, 10, 14, 18, 21, 25, 28, 32, 36]);
    }

    #[test]
    fn test_training_sizes_clip_and_dedup() {
        assert_eq!(training_sizes(&[0.01, 0.05, 1.0], 10), vec![1, 10]);
        assert_eq!(training_sizes(&[0.5, 0.5], 4), vec![2]);
    }

    #[test]
    fn test_curve_shape() {
        let curve = learning_curve(&ForestParams::with_trees(5, 42), &data(40), 4, &[0.25, 0.5, 1.0]).unwrap();
        let sizes: Vec<usize> = curve.points.iter().map(|p| p.train_size).collect();
        assert_eq!(sizes, vec![7, 15, 30]);
        for p in &curve.points {
            assert!(p.train_std >= 0.0);
            assert!(p.test_std >= 0.0);
        }
        let last = curve.points.last().unwrap();
        assert!(last.train_mean > 0.8);
    }

    #[test]
    fn test_deterministic() {
        let params = ForestParams::with_trees(5, 42);
        let a = learning_curve(&params, &data(30), 3, &[0.5, 1.0]).unwrap();
        let b = learning_curve(&params, &data(30), 3, &[0.5, 1.0]).unwrap();
        for (x, y) in a.points.iter().zip(&b.points) {
            assert_eq!(x.test_mean.to_bits(), y.test_mean.to_bits());
        }
    }

    #[test]
    fn test_insufficient_rows() {
        let err = learning_curve(&ForestParams::with_trees(5, 42), &data(3), 10, &[1.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientSamples { .. }));
    }
}
