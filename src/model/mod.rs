//! Regression models
//!
//! - `tree`: CART regression tree
//! - `forest`: bagged forest of trees with impurity-based importances
//! - `scaler`: per-feature standardization
//! - `pipeline`: scaler followed by forest, the estimator tuned by grid search

pub mod tree;
pub mod forest;
pub mod scaler;
pub mod pipeline;

pub use tree::{RegressionTree, TreeNode};
pub use forest::{ForestParams, RandomForestRegressor};
pub use scaler::StandardScaler;
pub use pipeline::ForestPipeline;

use crate::evaluation::metrics::r2_score;

/// Anything fitted that maps feature rows to a predicted target
pub trait Regressor {
    fn predict(&self, x: &[Vec<f64>]) -> Vec<f64>;

    /// R² of the predictions on `x` against `y`
    fn score(&self, x: &[Vec<f64>], y: &[f64]) -> f64 {
        r2_score(y, &self.predict(x))
    }
}
