//! River Fitness Random Forest Analysis
//!
//! Models the genetic fitness metric `fms` of river populations from
//! per-river environmental covariates.
//!
//! - `data`: CSV loading with Polars
//! - `filter`: genetic record cleaning and per-river count filter
//! - `join`: genetic × environmental join and feature extraction
//! - `model/`: regression tree, Random Forest, scaler, pipeline
//! - `selection/`: train/test split, k-fold, grid search
//! - `evaluation/`: metrics, learning curve, overfitting curve, importances
//! - `report/`: SVG charts and the JSON run summary
//! - `analysis`: runs the stages in order

pub mod config;
pub mod error;
pub mod utils;
pub mod data;
pub mod filter;
pub mod dataset;
pub mod join;
pub mod model;
pub mod selection;
pub mod evaluation;
pub mod report;
pub mod analysis;

// Re-export commonly used types
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use data::StudyData;
pub use dataset::FeatureMatrix;
pub use filter::{filter_genetic, river_counts, FilterCriteria, RiverCount};
pub use join::{extract_features, join_environment, modeling_frame, JoinSpec};
pub use model::{ForestParams, ForestPipeline, RandomForestRegressor, Regressor};
pub use selection::{train_test_split, GridSearchCv, GridSearchResult, KFold, ParamGrid};
pub use evaluation::{FitMetrics, LearningCurve, OverfittingCurve};
pub use analysis::{AnalysisOutcome, PreparedData, RiverFitnessAnalysis};
