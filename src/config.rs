//! Analysis Configuration
//!
//! Every threshold, file name and hyperparameter of the analysis lives here.
//! `AnalysisConfig::default()` reproduces the fixed constants of the
//! study; a JSON file can override any subset of fields.

use crate::error::AnalysisError;
use crate::selection::ParamGrid;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Columns removed after the join (non-predictive, or correlated with others)
pub const DEFAULT_DROP_COLUMNS: &[&str] = &["total_oil_gas_count", "ELEV", "closest_city", "GNIS_NAME"];

/// Identifier columns removed before modeling
pub const DEFAULT_IDENTIFIER_COLUMNS: &[&str] = &["site_no", "river"];

/// Tree counts used by the overfitting curve
pub const DEFAULT_OVERFITTING_TREE_COUNTS: &[usize] = &[50, 100, 150, 500, 600, 800, 1000];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Genetic survival metrics (genID, river, fms, fms_ci_LB, fms_ci_UB)
    pub genetic_path: PathBuf,
    /// Environmental covariates per river
    pub environmental_path: PathBuf,
    /// Where plots and the run summary are written
    pub output_dir: PathBuf,

    pub gen_id: String,
    /// Exclusive lower bound for fms_ci_LB
    pub ci_lower_bound: f64,
    /// Exclusive upper bound for fms_ci_UB
    pub ci_upper_bound: f64,
    pub min_river_count: usize,

    pub drop_columns: Vec<String>,
    pub identifier_columns: Vec<String>,
    pub target: String,

    pub test_fraction: f64,
    pub seed: u64,
    pub cv_folds: usize,
    pub grid: ParamGrid,

    pub learning_curve_fractions: Vec<f64>,
    pub overfitting_tree_counts: Vec<usize>,

    pub render_plots: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            genetic_path: PathBuf::from("genetics_out_21July.csv"),
            environmental_path: PathBuf::from("env_data.csv"),
            output_dir: PathBuf::from("rf_output"),
            gen_id: "fw".to_string(),
            ci_lower_bound: 0.0,
            ci_upper_bound: 1.0,
            min_river_count: 10,
            drop_columns: DEFAULT_DROP_COLUMNS.iter().map(|s| s.to_string()).collect(),
            identifier_columns: DEFAULT_IDENTIFIER_COLUMNS.iter().map(|s| s.to_string()).collect(),
            target: "fms".to_string(),
            test_fraction: 0.2,
            seed: 42,
            cv_folds: 10,
            grid: ParamGrid::default(),
            learning_curve_fractions: linspace(0.1, 1.0, 10),
            overfitting_tree_counts: DEFAULT_OVERFITTING_TREE_COUNTS.to_vec(),
            render_plots: true,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file; absent fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: AnalysisConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path))?;

        config.validate()?;
        Ok(config)
    }

    /// Default configuration, or the file at `path` when one is given
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), AnalysisError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.ci_lower_bound >= self.ci_upper_bound {
            return Err(AnalysisError::InvalidParameter(format!(
                "ci_lower_bound ({}) must be below ci_upper_bound ({})",
                self.ci_lower_bound, self.ci_upper_bound
            )));
        }
        if self.cv_folds < 2 {
            return Err(AnalysisError::InvalidParameter(format!(
                "cv_folds must be at least 2, got {}",
                self.cv_folds
            )));
        }
        if self.learning_curve_fractions.iter().any(|&f| !(f > 0.0 && f <= 1.0)) {
            return Err(AnalysisError::InvalidParameter(
                "learning_curve_fractions must lie in (0, 1]".to_string(),
            ));
        }
        if self.overfitting_tree_counts.iter().any(|&n| n == 0) {
            return Err(AnalysisError::InvalidParameter(
                "overfitting_tree_counts must be positive".to_string(),
            ));
        }
        self.grid.validate()
    }
}

/// `n` evenly spaced values from `start` to `stop` inclusive
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = stop;
            values
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_match_study_constants() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.gen_id, "fw");
        assert_eq!(cfg.min_river_count, 10);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.cv_folds, 10);
        assert_eq!(cfg.drop_columns.len(), 4);
        assert_eq!(cfg.identifier_columns, vec!["site_no", "river"]);
        assert_eq!(cfg.grid.len(), 108);
        assert_eq!(cfg.learning_curve_fractions.len(), 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(0.1, 1.0, 10);
        assert_relative_eq!(v[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(v[4], 0.5, epsilon = 1e-12);
        assert_relative_eq!(v[9], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "seed": 7, "cv_folds": 5, "render_plots": false }"#;
        let cfg: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.cv_folds, 5);
        assert!(!cfg.render_plots);
        assert_eq!(cfg.gen_id, "fw");
        assert_eq!(cfg.grid.len(), 108);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "min_river_count": 3 }"#).unwrap();

        let cfg = AnalysisConfig::load(&path).unwrap();
        assert_eq!(cfg.min_river_count, 3);
    }

    #[test]
    fn test_validate_rejects_bad_fraction() {
        let cfg = AnalysisConfig {
            test_fraction: 1.0,
            ..AnalysisConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_single_fold() {
        let cfg = AnalysisConfig {
            cv_folds: 1,
            ..AnalysisConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
