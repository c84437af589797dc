//! Random Forest regressor
//!
//! Bagged CART trees: each tree sees a bootstrap sample (n draws with
//! replacement) and considers every feature at every split. Prediction is the
//! mean of the tree predictions.
//!
//! Per-tree seeds are drawn in order from one master RNG before the trees are
//! grown in parallel, so a given `seed` always yields the same forest no
//! matter how rayon schedules the work.

use super::tree::RegressionTree;
use super::Regressor;
use crate::error::{AnalysisError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Forest hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    /// None grows until leaves are pure or too small to split
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

impl ForestParams {
    /// Defaults with a given tree count and seed
    pub fn with_trees(n_estimators: usize, seed: u64) -> Self {
        Self {
            n_estimators,
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(AnalysisError::InvalidParameter("n_estimators must be at least 1".to_string()));
        }
        if self.min_samples_split < 2 {
            return Err(AnalysisError::InvalidParameter(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if self.min_samples_leaf < 1 {
            return Err(AnalysisError::InvalidParameter("min_samples_leaf must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Short label for logs and plots, e.g. `trees=100 depth=none split=2 leaf=1`
    pub fn label(&self) -> String {
        let depth = self.max_depth.map_or_else(|| "none".to_string(), |d| d.to_string());
        format!(
            "trees={} depth={} split={} leaf={}",
            self.n_estimators, depth, self.min_samples_split, self.min_samples_leaf
        )
    }
}

/// Fitted Random Forest
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    params: ForestParams,
    trees: Vec<RegressionTree>,
    n_features: usize,
    feature_importances: Vec<f64>,
}

impl RandomForestRegressor {
    pub fn fit(params: &ForestParams, x: &[Vec<f64>], y: &[f64]) -> Result<Self> {
        params.validate()?;
        if x.is_empty() {
            return Err(AnalysisError::EmptyDataset {
                context: "random forest training data".to_string(),
            });
        }
        if x.len() != y.len() {
            return Err(AnalysisError::InvalidParameter(format!(
                "{} feature rows but {} targets",
                x.len(),
                y.len()
            )));
        }

        let n_samples = x.len();
        let n_features = x[0].len();

        let mut master = StdRng::seed_from_u64(params.seed);
        let tree_seeds: Vec<u64> = (0..params.n_estimators).map(|_| master.gen()).collect();

        let trees: Vec<RegressionTree> = tree_seeds
            .par_iter()
            .map(|&tree_seed| {
                let mut rng = StdRng::seed_from_u64(tree_seed);
                let bootstrap: Vec<usize> = (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
                RegressionTree::fit(x, y, &bootstrap, params)
            })
            .collect();

        let feature_importances = average_importances(&trees, n_features);

        Ok(Self {
            params: params.clone(),
            trees,
            n_features,
            feature_importances,
        })
    }

    /// Mean decrease in impurity, summing to 1 (all zeros if no tree split)
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}

impl Regressor for RandomForestRegressor {
    fn predict(&self, x: &[Vec<f64>]) -> Vec<f64> {
        let n_trees = self.trees.len() as f64;
        x.iter()
            .map(|row| self.trees.iter().map(|t| t.predict_one(row)).sum::<f64>() / n_trees)
            .collect()
    }
}

fn average_importances(trees: &[RegressionTree], n_features: usize) -> Vec<f64> {
    let mut totals = vec![0.0; n_features];
    for tree in trees {
        for (total, value) in totals.iter_mut().zip(tree.feature_importances()) {
            *total += value;
        }
    }

    let sum: f64 = totals.iter().sum();
    if sum <= 0.0 {
        return totals;
    }
    totals.iter().map(|v| v / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linear_data(n: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
        // y depends on x0 only; x1 cycles without signal
        let x: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64, (i % 3) as f64]).collect();
        let y: Vec<f64> = (0..n).map(|i| 2.0 * i as f64 + 1.0).collect();
        (x, y)
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = linear_data(40);
        let params = ForestParams::with_trees(20, 42);
        let a = RandomForestRegressor::fit(&params, &x, &y).unwrap();
        let b = RandomForestRegressor::fit(&params, &x, &y).unwrap();

        let pa = a.predict(&x);
        let pb = b.predict(&x);
        for (u, v) in pa.iter().zip(pb.iter()) {
            assert_eq!(u.to_bits(), v.to_bits());
        }
        assert_eq!(a.feature_importances(), b.feature_importances());
    }

    #[test]
    fn test_different_seeds_differ() {
        let (x, y) = linear_data(40);
        let a = RandomForestRegressor::fit(&ForestParams::with_trees(5, 1), &x, &y).unwrap();
        let b = RandomForestRegressor::fit(&ForestParams::with_trees(5, 2), &x, &y).unwrap();
        assert_ne!(a.predict(&x), b.predict(&x));
    }

    #[test]
    fn test_fits_training_data_well() {
        let (x, y) = linear_data(60);
        let forest = RandomForestRegressor::fit(&ForestParams::with_trees(30, 42), &x, &y).unwrap();
        assert!(forest.score(&x, &y) > 0.95);
    }

    #[test]
    fn test_importances_sum_to_one_and_favor_signal() {
        let (x, y) = linear_data(60);
        let forest = RandomForestRegressor::fit(&ForestParams::with_trees(30, 42), &x, &y).unwrap();
        let imp = forest.feature_importances();
        assert_relative_eq!(imp.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(imp[0] > imp[1]);
    }

    #[test]
    fn test_predictions_within_target_range() {
        let (x, y) = linear_data(30);
        let forest = RandomForestRegressor::fit(&ForestParams::with_trees(10, 7), &x, &y).unwrap();
        let (lo, hi) = (1.0, 59.0);
        for p in forest.predict(&[vec![-100.0, 0.0], vec![1000.0, 2.0]]) {
            assert!(p >= lo && p <= hi);
        }
    }

    #[test]
    fn test_invalid_params_rejected() {
        let (x, y) = linear_data(10);
        let zero_trees = ForestParams::with_trees(0, 42);
        assert!(RandomForestRegressor::fit(&zero_trees, &x, &y).is_err());

        let bad_split = ForestParams { min_samples_split: 1, ..ForestParams::default() };
        assert!(RandomForestRegressor::fit(&bad_split, &x, &y).is_err());
    }

    #[test]
    fn test_empty_training_data_rejected() {
        let err = RandomForestRegressor::fit(&ForestParams::default(), &[], &[]).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyDataset { .. }));
    }

    #[test]
    fn test_label() {
        let p = ForestParams { max_depth: Some(10), ..ForestParams::with_trees(50, 42) };
        assert_eq!(p.label(), "trees=50 depth=10 split=2 leaf=1");
    }
}
