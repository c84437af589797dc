//! JSON run summary
//!
//! Non-finite scores (an R² over fewer than two rows) serialize as `null`.

use crate::evaluation::{FeatureImportance, FitMetrics, LearningCurve, OverfittingCurve};
use crate::filter::RiverCount;
use crate::model::ForestParams;
use crate::selection::CandidateScore;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub genetic_rows: usize,
    pub filtered_rows: usize,
    pub rivers: Vec<RiverCount>,
    pub merged_rows: usize,
    pub feature_names: Vec<String>,
    pub train_rows: usize,
    pub test_rows: usize,

    pub best_params: ForestParams,
    pub best_cv_score: f64,
    /// Every grid combination, in search order
    pub grid_scores: Vec<CandidateScore>,

    pub metrics: FitMetrics,
    /// Ascending, as charted
    pub feature_importances: Vec<FeatureImportance>,
    pub learning_curve: LearningCurve,
    pub overfitting_curve: OverfittingCurve,
}

pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize run summary")?;
    fs::write(path, json).with_context(|| format!("Failed to write run summary: {:?}", path))?;
    tracing::info!("Run summary saved: {}", path.display());
    Ok(())
}
