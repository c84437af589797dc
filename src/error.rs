//! Error types for the analysis pipeline
//!
//! Stage functions return [`AnalysisError`] for failures that have a name in
//! this domain (missing columns, too few rows for cross-validation, bad
//! parameters). File loading and the binaries use `anyhow` on top of it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A column the stage needs is not in the frame
    #[error("{context}: missing expected column '{column}'. Available columns: {available:?}")]
    MissingColumn {
        context: String,
        column: String,
        available: Vec<String>,
    },

    /// Nothing left to work with after a filter or join
    #[error("{context}: dataset is empty")]
    EmptyDataset { context: String },

    /// Fewer samples than a split strategy requires
    #[error("{context}: {required} samples required, found {available}")]
    InsufficientSamples {
        context: String,
        required: usize,
        available: usize,
    },

    /// Feature column that cannot be used as a numeric model input
    #[error("feature column '{column}': {reason}")]
    InvalidFeature { column: String, reason: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
