//! River Fitness Analysis - coordinator for the full modeling run
//!
//! Runs load → filter → join → split → grid search → evaluation, then writes
//! the charts and the run summary. Each stage lives in its own module; this
//! one only wires them together and keeps their results.

use crate::config::AnalysisConfig;
use crate::data::StudyData;
use crate::dataset::FeatureMatrix;
use crate::evaluation::{
    evaluate_fit, learning_curve, overfitting_curve, ranked_importances, FeatureImportance, FitMetrics,
    FitPredictions, LearningCurve, OverfittingCurve,
};
use crate::filter::{filter_genetic, river_counts, FilterCriteria, RiverCount};
use crate::join::{extract_features, join_environment, modeling_frame, JoinSpec};
use crate::report::{self, RunSummary};
use crate::selection::{train_test_split, GridSearchCv, GridSearchResult, TrainTestSplit};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Modeling inputs after filtering and joining
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub genetic_rows: usize,
    pub filtered_rows: usize,
    pub rivers: Vec<RiverCount>,
    pub merged_rows: usize,
    pub features: FeatureMatrix,
}

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub prepared: PreparedData,
    pub split: TrainTestSplit,
    pub search: GridSearchResult,
    pub metrics: FitMetrics,
    pub predictions: FitPredictions,
    pub learning_curve: LearningCurve,
    pub overfitting_curve: OverfittingCurve,
    pub importances: Vec<FeatureImportance>,
}

pub struct RiverFitnessAnalysis {
    config: AnalysisConfig,
}

impl RiverFitnessAnalysis {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate().context("Invalid analysis configuration")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Load the configured files and run every stage
    pub fn run(&self) -> Result<AnalysisOutcome> {
        let data = StudyData::load(&self.config)?;
        self.run_with_data(&data)
    }

    /// Run every stage on already-loaded tables
    pub fn run_with_data(&self, data: &StudyData) -> Result<AnalysisOutcome> {
        let prepared = self.prepare(data)?;
        let cfg = &self.config;

        tracing::info!("Splitting {} rows (test fraction {})", prepared.features.len(), cfg.test_fraction);
        let split = train_test_split(&prepared.features, cfg.test_fraction, cfg.seed)?;
        tracing::info!("  Train rows: {}, test rows: {}", split.train.len(), split.test.len());

        let search = GridSearchCv::new(cfg.grid.clone(), cfg.cv_folds, cfg.seed)
            .fit(&split.train)
            .context("Grid search failed")?;
        let best = &search.best_estimator;

        let (metrics, predictions) = evaluate_fit(best, &split.train, &split.test);

        let learning_curve = learning_curve(
            search.best_params(),
            &split.train,
            cfg.cv_folds,
            &cfg.learning_curve_fractions,
        )
        .context("Learning curve failed")?;

        let overfitting_curve = overfitting_curve(&cfg.overfitting_tree_counts, cfg.seed, &split.train, &split.test)
            .context("Overfitting curve failed")?;

        let importances = ranked_importances(&prepared.features.feature_names, best.feature_importances());

        Ok(AnalysisOutcome {
            prepared,
            split,
            search,
            metrics,
            predictions,
            learning_curve,
            overfitting_curve,
            importances,
        })
    }

    /// Filter the genetic rows, join the environment, extract features
    pub fn prepare(&self, data: &StudyData) -> Result<PreparedData> {
        let criteria = FilterCriteria::from_config(&self.config);
        let spec = JoinSpec::from_config(&self.config);

        tracing::info!("Filtering genetic data...");
        let filtered = filter_genetic(&data.genetic, &criteria).context("Genetic filter failed")?;
        let rivers = river_counts(&filtered)?;

        tracing::info!("Joining environmental data...");
        let merged = join_environment(&filtered, &data.environmental, &spec).context("Join failed")?;
        let frame = modeling_frame(&merged, &spec)?;
        let features = extract_features(&frame, &self.config.target).context("Feature extraction failed")?;
        tracing::info!("  {} rows x {} features", features.len(), features.n_features());

        Ok(PreparedData {
            genetic_rows: data.genetic.height(),
            filtered_rows: filtered.height(),
            rivers,
            merged_rows: merged.height(),
            features,
        })
    }

    /// Write charts (when enabled) and the run summary; returns the written paths
    pub fn write_outputs(&self, outcome: &AnalysisOutcome) -> Result<Vec<PathBuf>> {
        let dir = &self.config.output_dir;
        fs::create_dir_all(dir).with_context(|| format!("Failed to create output directory: {:?}", dir))?;

        let mut written = Vec::new();

        if self.config.render_plots {
            let path = dir.join(report::LEARNING_CURVE_FILE);
            report::plot_learning_curve(&outcome.learning_curve, &path)?;
            written.push(path);

            let path = dir.join(report::OVERFITTING_CURVE_FILE);
            report::plot_overfitting_curve(&outcome.overfitting_curve, &path)?;
            written.push(path);

            let path = dir.join(report::FEATURE_IMPORTANCE_FILE);
            report::plot_feature_importance(&outcome.importances, &path)?;
            written.push(path);

            let path = dir.join(report::PREDICTED_VS_ACTUAL_FILE);
            report::plot_predicted_vs_actual(&outcome.split.test.targets, &outcome.predictions.test, &path)?;
            written.push(path);
        } else {
            tracing::info!("Plot rendering disabled");
        }

        let path = dir.join(report::SUMMARY_FILE);
        report::write_summary(&outcome.summary(self.config.seed), &path)?;
        written.push(path);

        Ok(written)
    }
}

impl AnalysisOutcome {
    pub fn summary(&self, seed: u64) -> RunSummary {
        RunSummary {
            seed,
            genetic_rows: self.prepared.genetic_rows,
            filtered_rows: self.prepared.filtered_rows,
            rivers: self.prepared.rivers.clone(),
            merged_rows: self.prepared.merged_rows,
            feature_names: self.prepared.features.feature_names.clone(),
            train_rows: self.split.train.len(),
            test_rows: self.split.test.len(),
            best_params: self.search.best_params().clone(),
            best_cv_score: self.search.best_score(),
            grid_scores: self.search.candidates.clone(),
            metrics: self.metrics,
            feature_importances: self.importances.clone(),
            learning_curve: self.learning_curve.clone(),
            overfitting_curve: self.overfitting_curve.clone(),
        }
    }
}
