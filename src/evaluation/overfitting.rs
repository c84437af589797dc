//! Overfitting Curve
//!
//! Train and test R² of a plain forest (default parameters apart from the
//! tree count) as the number of trees grows. These forests see the unscaled
//! split and none of the tuned parameters, so the curve describes forest size
//! alone rather than the selected model.

use crate::dataset::FeatureMatrix;
use crate::error::{AnalysisError, Result};
use crate::model::{ForestParams, RandomForestRegressor, Regressor};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverfittingPoint {
    pub n_estimators: usize,
    pub train_r2: f64,
    pub test_r2: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverfittingCurve {
    pub points: Vec<OverfittingPoint>,
    /// Always true: the curve bypasses scaling and tuned parameters
    pub uses_untuned_forest: bool,
}

pub fn overfitting_curve(
    tree_counts: &[usize],
    seed: u64,
    train: &FeatureMatrix,
    test: &FeatureMatrix,
) -> Result<OverfittingCurve> {
    if tree_counts.is_empty() {
        return Err(AnalysisError::InvalidParameter(
            "overfitting curve needs at least one tree count".to_string(),
        ));
    }

    tracing::warn!(
        "Overfitting curve uses default forests on unscaled data; it does not reflect the tuned model"
    );

    let points = tree_counts
        .par_iter()
        .map(|&n_estimators| -> Result<OverfittingPoint> {
            let params = ForestParams::with_trees(n_estimators, seed);
            let forest = RandomForestRegressor::fit(&params, &train.records, &train.targets)?;
            Ok(OverfittingPoint {
                n_estimators,
                train_r2: forest.score(&train.records, &train.targets),
                test_r2: forest.score(&test.records, &test.targets),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    for p in &points {
        tracing::debug!("  {} trees: train R^2 = {:.4}, test R^2 = {:.4}", p.n_estimators, p.train_r2, p.test_r2);
    }

    Ok(OverfittingCurve {
        points,
        uses_untuned_forest: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(n: usize, offset: usize) -> FeatureMatrix {
        let records: Vec<Vec<f64>> = (0..n).map(|i| vec![((i + offset) % 17) as f64]).collect();
        let targets: Vec<f64> = records.iter().map(|r| r[0].sin()).collect();
        FeatureMatrix::new(vec!["x".into()], records, targets).unwrap()
    }

    #[test]
    fn test_one_point_per_tree_count_in_order() {
        let curve = overfitting_curve(&[3, 1, 8], 42, &data(30, 0), &data(10, 5)).unwrap();
        let counts: Vec<usize> = curve.points.iter().map(|p| p.n_estimators).collect();
        assert_eq!(counts, vec![3, 1, 8]);
        assert!(curve.uses_untuned_forest);
        assert!(curve.points.iter().all(|p| p.train_r2.is_finite() && p.test_r2.is_finite()));
    }

    #[test]
    fn test_empty_tree_counts_rejected() {
        assert!(overfitting_curve(&[], 42, &data(10, 0), &data(5, 0)).is_err());
    }

    #[test]
    fn test_zero_trees_rejected() {
        assert!(overfitting_curve(&[0], 42, &data(10, 0), &data(5, 0)).is_err());
    }
}
