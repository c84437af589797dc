//! Genetic × Environmental Join
//!
//! Inner join on `river`: rows without a partner on either side are dropped.
//! After the join the non-predictive columns are removed, then the identifier
//! columns, and what is left becomes the numeric feature matrix.

use crate::config::AnalysisConfig;
use crate::dataset::FeatureMatrix;
use crate::error::{AnalysisError, Result};
use crate::filter::RIVER_COL;
use crate::utils::{column_names, drop_columns, materialize_with_columns, require_columns};
use polars::prelude::*;

const ROW_ORDER_COL: &str = "__genetic_row";

/// Which columns leave the frame at each step
#[derive(Debug, Clone)]
pub struct JoinSpec {
    /// Removed right after the join
    pub drop_columns: Vec<String>,
    /// Removed before modeling
    pub identifier_columns: Vec<String>,
    pub target: String,
}

impl JoinSpec {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            drop_columns: config.drop_columns.clone(),
            identifier_columns: config.identifier_columns.clone(),
            target: config.target.clone(),
        }
    }
}

impl Default for JoinSpec {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

/// Inner-join filtered genetic rows (river + target only) with environment
///
/// Row order follows the genetic table, so downstream splits are stable.
pub fn join_environment(
    genetic: &DataFrame,
    environmental: &DataFrame,
    spec: &JoinSpec,
) -> Result<DataFrame> {
    let subset = materialize_with_columns(
        &genetic.clone().lazy(),
        &[RIVER_COL, spec.target.as_str()],
        "genetic subset",
    )?;
    require_columns(environmental, &[RIVER_COL], "environmental data")?;

    let env = environmental
        .clone()
        .lazy()
        .with_column(col(RIVER_COL).cast(DataType::String));

    let joined = subset
        .lazy()
        .with_column(col(RIVER_COL).cast(DataType::String))
        .with_row_index(ROW_ORDER_COL, None)
        .join(
            env,
            [col(RIVER_COL)],
            [col(RIVER_COL)],
            JoinArgs::new(JoinType::Inner),
        )
        .sort([ROW_ORDER_COL], SortMultipleOptions::default().with_maintain_order(true))
        .collect()?;

    let merged = drop_columns(&joined, &[ROW_ORDER_COL], "join row order")?;
    tracing::info!("  Merged rows: {} ({} columns)", merged.height(), merged.width());

    let drop: Vec<&str> = spec.drop_columns.iter().map(String::as_str).collect();
    drop_columns(&merged, &drop, "post-join column drop")
}

/// Drop identifier columns, leaving target + covariates
pub fn modeling_frame(merged: &DataFrame, spec: &JoinSpec) -> Result<DataFrame> {
    let ids: Vec<&str> = spec.identifier_columns.iter().map(String::as_str).collect();
    drop_columns(merged, &ids, "identifier column drop")
}

/// Split a modeling frame into numeric features and the target
///
/// Every column except the target is a feature, in frame order.
pub fn extract_features(frame: &DataFrame, target: &str) -> Result<FeatureMatrix> {
    require_columns(frame, &[target], "feature extraction")?;
    if frame.height() == 0 {
        return Err(AnalysisError::EmptyDataset {
            context: "merged genetic/environmental data".to_string(),
        });
    }

    let feature_names: Vec<String> = column_names(frame)
        .into_iter()
        .filter(|name| name != target)
        .collect();
    if feature_names.is_empty() {
        return Err(AnalysisError::EmptyDataset {
            context: "feature columns".to_string(),
        });
    }

    let targets = numeric_column(frame, target)?;
    let columns: Vec<Vec<f64>> = feature_names
        .iter()
        .map(|name| numeric_column(frame, name))
        .collect::<Result<_>>()?;

    let records: Vec<Vec<f64>> = (0..frame.height())
        .map(|row| columns.iter().map(|c| c[row]).collect())
        .collect();

    FeatureMatrix::new(feature_names, records, targets)
}

fn numeric_column(frame: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = frame.column(name)?;
    let original_nulls = column.null_count();

    let values = column.cast(&DataType::Float64).map_err(|e| AnalysisError::InvalidFeature {
        column: name.to_string(),
        reason: format!("not numeric ({})", e),
    })?;

    let nulls = values.null_count();
    if nulls > 0 {
        let reason = if nulls > original_nulls {
            format!("{} values could not be parsed as numbers", nulls - original_nulls)
        } else {
            format!("{} missing values", nulls)
        };
        return Err(AnalysisError::InvalidFeature {
            column: name.to_string(),
            reason,
        });
    }

    let values: Vec<f64> = values.f64()?.into_no_null_iter().collect();
    let non_finite = values.iter().filter(|v| !v.is_finite()).count();
    if non_finite > 0 {
        return Err(AnalysisError::InvalidFeature {
            column: name.to_string(),
            reason: format!("{} non-finite values (NaN or infinity)", non_finite),
        });
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genetic() -> DataFrame {
        df![
            "genID" => &["fw", "fw", "fw", "fw"],
            "river" => &["Smith", "Jones", "Smith", "Orphan"],
            "fms" => &[0.1, 0.2, 0.3, 0.4],
            "fms_ci_LB" => &[0.05, 0.05, 0.05, 0.05],
            "fms_ci_UB" => &[0.9, 0.9, 0.9, 0.9],
        ]
        .unwrap()
    }

    fn environmental() -> DataFrame {
        df![
            "river" => &["Smith", "Jones", "Unsampled"],
            "site_no" => &[101i64, 102, 103],
            "GNIS_NAME" => &["Smith River", "Jones Creek", "Nowhere"],
            "closest_city" => &["A", "B", "C"],
            "ELEV" => &[10.0, 20.0, 30.0],
            "total_oil_gas_count" => &[0i64, 3, 1],
            "temp" => &[12.0, 14.0, 9.0],
            "drainage_area" => &[100.0, 250.0, 80.0],
        ]
        .unwrap()
    }

    #[test]
    fn test_inner_join_drops_unmatched_rivers() {
        let merged = join_environment(&genetic(), &environmental(), &JoinSpec::default()).unwrap();
        assert_eq!(merged.height(), 3);

        let rivers: Vec<&str> = merged
            .column("river").unwrap()
            .str().unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(rivers, vec!["Smith", "Jones", "Smith"]);
    }

    #[test]
    fn test_dropped_columns_absent() {
        let spec = JoinSpec::default();
        let merged = join_environment(&genetic(), &environmental(), &spec).unwrap();
        let frame = modeling_frame(&merged, &spec).unwrap();

        let names = column_names(&frame);
        for gone in ["total_oil_gas_count", "ELEV", "closest_city", "GNIS_NAME", "site_no", "river"] {
            assert!(!names.iter().any(|n| n == gone), "{} still present", gone);
        }
        assert_eq!(names, vec!["fms", "temp", "drainage_area"]);
    }

    #[test]
    fn test_genetic_extra_columns_not_joined() {
        let merged = join_environment(&genetic(), &environmental(), &JoinSpec::default()).unwrap();
        let names = column_names(&merged);
        assert!(!names.iter().any(|n| n == "genID" || n == "fms_ci_LB"));
    }

    #[test]
    fn test_extract_features() {
        let spec = JoinSpec::default();
        let merged = join_environment(&genetic(), &environmental(), &spec).unwrap();
        let frame = modeling_frame(&merged, &spec).unwrap();
        let data = extract_features(&frame, "fms").unwrap();

        assert_eq!(data.feature_names, vec!["temp", "drainage_area"]);
        assert_eq!(data.targets, vec![0.1, 0.2, 0.3]);
        assert_eq!(data.records[1], vec![14.0, 250.0]);
    }

    #[test]
    fn test_missing_drop_column_is_error() {
        let env = df![
            "river" => &["Smith"],
            "temp" => &[12.0],
        ]
        .unwrap();
        let err = join_environment(&genetic(), &env, &JoinSpec::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn { .. }));
    }

    #[test]
    fn test_null_feature_rejected() {
        let frame = df![
            "fms" => &[0.1, 0.2],
            "temp" => &[Some(1.0), None],
        ]
        .unwrap();
        let err = extract_features(&frame, "fms").unwrap_err();
        assert!(err.to_string().contains("temp"));
    }

    #[test]
    fn test_nan_feature_rejected() {
        let frame = df![
            "fms" => &[0.1, 0.2, 0.3],
            "temp" => &[1.0, f64::NAN, 3.0],
        ]
        .unwrap();
        let err = extract_features(&frame, "fms").unwrap_err();
        match err {
            AnalysisError::InvalidFeature { column, reason } => {
                assert_eq!(column, "temp");
                assert!(reason.contains("1 non-finite"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_infinite_target_rejected() {
        let frame = df![
            "fms" => &[0.1, f64::INFINITY],
            "temp" => &[1.0, 2.0],
        ]
        .unwrap();
        let err = extract_features(&frame, "fms").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidFeature { ref column, .. } if column == "fms"));
    }

    #[test]
    fn test_text_feature_rejected() {
        let frame = df![
            "fms" => &[0.1, 0.2],
            "basin" => &["north", "south"],
        ]
        .unwrap();
        let err = extract_features(&frame, "fms").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidFeature { .. }));
    }

    #[test]
    fn test_empty_merge_is_error() {
        let frame = df![
            "fms" => Vec::<f64>::new(),
            "temp" => Vec::<f64>::new(),
        ]
        .unwrap();
        let err = extract_features(&frame, "fms").unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyDataset { .. }));
    }
}
