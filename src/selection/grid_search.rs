//! Exhaustive Grid Search with K-Fold Cross-Validation
//!
//! Every combination of the grid is scored by mean R² over the folds, with a
//! fresh scale-then-forest pipeline fit on each fold's training rows. The
//! best combination is refit on all training rows.
//!
//! (combination, fold) jobs run in parallel; results are collected in job
//! order so the outcome does not depend on scheduling.

use super::kfold::KFold;
use crate::dataset::FeatureMatrix;
use crate::error::{AnalysisError, Result};
use crate::model::{ForestParams, ForestPipeline, Regressor};
use crate::utils::{mean, population_std};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Candidate values for each forest hyperparameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub n_estimators: Vec<usize>,
    /// `null` in JSON means unlimited depth
    pub max_depth: Vec<Option<usize>>,
    pub min_samples_split: Vec<usize>,
    pub min_samples_leaf: Vec<usize>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            n_estimators: vec![50, 100, 150, 800],
            max_depth: vec![None, Some(10), Some(20)],
            min_samples_split: vec![2, 5, 10],
            min_samples_leaf: vec![1, 2, 4],
        }
    }
}

impl ParamGrid {
    /// Number of combinations
    pub fn len(&self) -> usize {
        self.n_estimators.len() * self.max_depth.len() * self.min_samples_split.len() * self.min_samples_leaf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(AnalysisError::InvalidParameter(
                "parameter grid has an empty axis".to_string(),
            ));
        }
        for params in self.combinations(0) {
            params.validate()?;
        }
        Ok(())
    }

    /// All combinations, `n_estimators` varying fastest
    pub fn combinations(&self, seed: u64) -> Vec<ForestParams> {
        let mut out = Vec::with_capacity(self.len());
        for &max_depth in &self.max_depth {
            for &min_samples_leaf in &self.min_samples_leaf {
                for &min_samples_split in &self.min_samples_split {
                    for &n_estimators in &self.n_estimators {
                        out.push(ForestParams {
                            n_estimators,
                            max_depth,
                            min_samples_split,
                            min_samples_leaf,
                            seed,
                        });
                    }
                }
            }
        }
        out
    }
}

/// Cross-validated score of one grid combination
#[derive(Debug, Clone, Serialize)]
pub struct CandidateScore {
    pub params: ForestParams,
    pub mean_score: f64,
    pub std_score: f64,
    pub fold_scores: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct GridSearchResult {
    /// One entry per combination, in grid order
    pub candidates: Vec<CandidateScore>,
    pub best_index: usize,
    /// Best combination refit on all training rows
    pub best_estimator: ForestPipeline,
}

impl GridSearchResult {
    pub fn best_params(&self) -> &ForestParams {
        &self.candidates[self.best_index].params
    }

    pub fn best_score(&self) -> f64 {
        self.candidates[self.best_index].mean_score
    }
}

#[derive(Debug, Clone)]
pub struct GridSearchCv {
    pub grid: ParamGrid,
    pub folds: KFold,
    /// Seed given to every candidate forest
    pub seed: u64,
}

impl GridSearchCv {
    pub fn new(grid: ParamGrid, n_folds: usize, seed: u64) -> Self {
        Self {
            grid,
            folds: KFold::new(n_folds),
            seed,
        }
    }

    pub fn fit(&self, data: &FeatureMatrix) -> Result<GridSearchResult> {
        self.grid.validate()?;
        let folds = self.folds.split(data.len())?;
        let combos = self.grid.combinations(self.seed);

        let fold_data: Vec<(FeatureMatrix, FeatureMatrix)> = folds
            .iter()
            .map(|(train, test)| (data.subset(train), data.subset(test)))
            .collect();

        let jobs: Vec<(usize, usize)> = (0..combos.len())
            .flat_map(|c| (0..fold_data.len()).map(move |f| (c, f)))
            .collect();
        let total = jobs.len();

        tracing::info!(
            "Grid search: {} combinations x {} folds = {} fits",
            combos.len(),
            fold_data.len(),
            total
        );

        let start = Instant::now();
        let progress = AtomicUsize::new(0);

        let scores: Vec<f64> = jobs
            .par_iter()
            .map(|&(c, f)| -> Result<f64> {
                let (train, test) = &fold_data[f];
                let model = ForestPipeline::fit(&combos[c], &train.records, &train.targets)?;
                let score = model.score(&test.records, &test.targets);

                let count = progress.fetch_add(1, Ordering::Relaxed) + 1;
                if count % 100 == 0 || count == total {
                    tracing::debug!("  Grid search: {}/{} fits", count, total);
                }
                Ok(score)
            })
            .collect::<Result<_>>()?;

        tracing::info!("  Grid search finished in {:.2}s", start.elapsed().as_secs_f64());

        let candidates: Vec<CandidateScore> = combos
            .into_iter()
            .zip(scores.chunks(fold_data.len()))
            .map(|(params, fold_scores)| CandidateScore {
                params,
                mean_score: mean(fold_scores),
                std_score: population_std(fold_scores),
                fold_scores: fold_scores.to_vec(),
            })
            .collect();

        let best_index = select_best(&candidates);
        let best = &candidates[best_index];
        tracing::info!(
            "  Best parameters: {} (mean CV R^2 = {:.4})",
            best.params.label(),
            best.mean_score
        );

        let best_estimator = ForestPipeline::fit(&best.params, &data.records, &data.targets)?;

        Ok(GridSearchResult {
            candidates,
            best_index,
            best_estimator,
        })
    }
}

/// Highest mean score; NaN ranks last, ties go to the earliest candidate
fn select_best(candidates: &[CandidateScore]) -> usize {
    let mut best_index = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, candidate) in candidates.iter().enumerate() {
        let score = if candidate.mean_score.is_nan() {
            f64::NEG_INFINITY
        } else {
            candidate.mean_score
        };
        if score > best_score {
            best_score = score;
            best_index = i;
        }
    }
    best_index
}
