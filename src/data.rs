//! Data Loading
//!
//! Loads the genetic survival table and the environmental covariate table
//! with Polars. Both are read as-is; cleaning happens in `filter`.

use crate::config::AnalysisConfig;
use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

/// Raw input tables for one analysis run
pub struct StudyData {
    /// Per-sample genetic survival metrics (genID, river, fms, CI bounds)
    pub genetic: DataFrame,

    /// Per-river environmental covariates
    pub environmental: DataFrame,
}

impl StudyData {
    /// Load both datasets named in the configuration
    pub fn load(config: &AnalysisConfig) -> Result<Self> {
        tracing::info!("Loading datasets...");

        let genetic = Self::load_genetic(&config.genetic_path)?;
        let environmental = Self::load_environmental(&config.environmental_path)?;

        tracing::info!("  Genetic rows: {}", genetic.height());
        tracing::info!("  Environmental rows: {}", environmental.height());

        Ok(StudyData {
            genetic,
            environmental,
        })
    }

    /// Load genetic survival metrics from CSV
    pub fn load_genetic(path: &Path) -> Result<DataFrame> {
        read_csv(path).with_context(|| format!("Failed to load genetic data: {:?}", path))
    }

    /// Load environmental covariates from CSV
    pub fn load_environmental(path: &Path) -> Result<DataFrame> {
        read_csv(path).with_context(|| format!("Failed to load environmental data: {:?}", path))
    }
}

/// R writes missing values as `NA`; infer types from every row so a late
/// `NA` or float cannot break parsing
fn read_csv(path: &Path) -> Result<DataFrame> {
    let parse_options = CsvParseOptions::default()
        .with_null_values(Some(NullValues::AllColumnsSingle("NA".into())));

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
        .finish()
        .with_context(|| format!("Failed to parse CSV: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_genetic_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genetics.csv");
        std::fs::write(
            &path,
            "genID, river ,fms,fms_ci_LB,fms_ci_UB\nfw,Smith,0.5,0.1,0.9\nbw,Jones,0.4,0.2,0.8\n",
        )
        .unwrap();

        let df = StudyData::load_genetic(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 5);
    }

    #[test]
    fn test_late_na_read_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genetics.csv");
        let mut csv = String::from("genID,river,fms,fms_ci_LB,fms_ci_UB\n");
        for i in 0..150 {
            if i == 120 {
                csv.push_str("fw,Smith,0.5,NA,NA\n");
            } else {
                csv.push_str("fw,Smith,0.5,0.1,0.9\n");
            }
        }
        std::fs::write(&path, csv).unwrap();

        let df = StudyData::load_genetic(&path).unwrap();
        assert_eq!(df.height(), 150);
        let lb = df.column("fms_ci_LB").unwrap();
        assert_eq!(lb.dtype(), &DataType::Float64);
        assert_eq!(lb.null_count(), 1);
        assert_eq!(df.column("fms_ci_UB").unwrap().null_count(), 1);
    }

    #[test]
    fn test_late_float_widens_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.csv");
        let mut csv = String::from("river,ELEV\n");
        for i in 0..130 {
            csv.push_str(&format!("R{},{}\n", i, i));
        }
        csv.push_str("Late,12.5\n");
        std::fs::write(&path, csv).unwrap();

        let df = StudyData::load_environmental(&path).unwrap();
        assert_eq!(df.height(), 131);
        assert_eq!(df.column("ELEV").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = StudyData::load_environmental(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(format!("{:#}", err).contains("does/not/exist.csv"));
    }

    #[test]
    fn test_load_both_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let genetic_path = dir.path().join("g.csv");
        let env_path = dir.path().join("e.csv");
        std::fs::write(&genetic_path, "genID,river,fms,fms_ci_LB,fms_ci_UB\nfw,A,0.5,0.1,0.9\n").unwrap();
        std::fs::write(&env_path, "river,temp\nA,12.5\nB,10.0\n").unwrap();

        let config = AnalysisConfig {
            genetic_path,
            environmental_path: env_path,
            ..AnalysisConfig::default()
        };
        let data = StudyData::load(&config).unwrap();
        assert_eq!(data.genetic.height(), 1);
        assert_eq!(data.environmental.height(), 2);
    }
}
