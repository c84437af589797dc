//! Run outputs
//!
//! - `plots`: the four SVG charts
//! - `summary`: `run_summary.json`

pub mod plots;
pub mod summary;

pub use plots::{plot_feature_importance, plot_learning_curve, plot_overfitting_curve, plot_predicted_vs_actual};
pub use summary::{write_summary, RunSummary};

pub const LEARNING_CURVE_FILE: &str = "learning_curve.svg";
pub const OVERFITTING_CURVE_FILE: &str = "overfitting_curve.svg";
pub const FEATURE_IMPORTANCE_FILE: &str = "feature_importance.svg";
pub const PREDICTED_VS_ACTUAL_FILE: &str = "predicted_vs_actual.svg";
pub const SUMMARY_FILE: &str = "run_summary.json";
