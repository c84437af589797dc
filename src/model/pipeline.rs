//! Scale-then-forest pipeline
//!
//! The scaler is fit on the same rows as the forest, so every cross-validation
//! fold and learning-curve subset standardizes with its own training stats.

use super::forest::{ForestParams, RandomForestRegressor};
use super::scaler::StandardScaler;
use super::Regressor;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ForestPipeline {
    scaler: StandardScaler,
    forest: RandomForestRegressor,
}

impl ForestPipeline {
    pub fn fit(params: &ForestParams, x: &[Vec<f64>], y: &[f64]) -> Result<Self> {
        let scaler = StandardScaler::fit(x);
        let scaled = scaler.transform(x);
        let forest = RandomForestRegressor::fit(params, &scaled, y)?;
        Ok(Self { scaler, forest })
    }

    pub fn params(&self) -> &ForestParams {
        self.forest.params()
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn forest(&self) -> &RandomForestRegressor {
        &self.forest
    }

    pub fn feature_importances(&self) -> &[f64] {
        self.forest.feature_importances()
    }
}

impl Regressor for ForestPipeline {
    fn predict(&self, x: &[Vec<f64>]) -> Vec<f64> {
        self.forest.predict(&self.scaler.transform(x))
    }
}
