//! Model evaluation
//!
//! - `metrics`: R², MSE and the train/test fit report
//! - `learning_curve`: CV score against training-set size
//! - `overfitting`: train/test R² against forest size
//! - `importance`: feature importance ranking

pub mod metrics;
pub mod learning_curve;
pub mod overfitting;
pub mod importance;

pub use metrics::{evaluate_fit, mean_squared_error, r2_score, FitMetrics, FitPredictions};
pub use learning_curve::{learning_curve, training_sizes, LearningCurve, LearningCurvePoint};
pub use overfitting::{overfitting_curve, OverfittingCurve, OverfittingPoint};
pub use importance::{ranked_importances, FeatureImportance};
