//! Genetic Record Cleaning and Filtering
//!
//! Order matters here; reordering the steps changes which rows survive.
//!   1. Strip whitespace from column names
//!   2. Coerce genID to text and keep exact matches ("fw")
//!   3. Keep rows with the confidence interval strictly inside (lower, upper)
//!   4. Count rows per river and keep rivers with at least `min_river_count`
//!
//! The input frame is never mutated; every step works on a copy.

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::utils::{column_names, filter_to_keys, require_columns};
use polars::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

pub const GEN_ID_COL: &str = "genID";
pub const RIVER_COL: &str = "river";
pub const CI_LOWER_COL: &str = "fms_ci_LB";
pub const CI_UPPER_COL: &str = "fms_ci_UB";

/// Columns the genetic table must carry (target column is added from config)
pub const REQUIRED_GENETIC_COLS: &[&str] = &[
    GEN_ID_COL,    // Marker group, only one group is analyzed
    RIVER_COL,     // Join key
    CI_LOWER_COL,  // Lower confidence bound on fms
    CI_UPPER_COL,  // Upper confidence bound on fms
];

/// Row-selection thresholds for the genetic table
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    pub gen_id: String,
    pub ci_lower_bound: f64,
    pub ci_upper_bound: f64,
    pub min_river_count: usize,
    pub target: String,
}

impl FilterCriteria {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            gen_id: config.gen_id.clone(),
            ci_lower_bound: config.ci_lower_bound,
            ci_upper_bound: config.ci_upper_bound,
            min_river_count: config.min_river_count,
            target: config.target.clone(),
        }
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

/// Number of rows recorded for one river
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiverCount {
    pub river: String,
    pub count: usize,
}

/// Copy of `df` with leading/trailing whitespace removed from column names
pub fn clean_column_names(df: &DataFrame) -> Result<DataFrame> {
    let trimmed: Vec<String> = column_names(df)
        .iter()
        .map(|name| name.trim().to_string())
        .collect();

    let mut cleaned = df.clone();
    cleaned.set_column_names(trimmed.iter().map(String::as_str))?;
    Ok(cleaned)
}

/// Apply the full genetic filter chain
///
/// Returns every column of the surviving rows, with `genID` and `river` as
/// text and the CI bounds as Float64.
pub fn filter_genetic(genetic: &DataFrame, criteria: &FilterCriteria) -> Result<DataFrame> {
    let cleaned = clean_column_names(genetic)?;

    let mut required: Vec<&str> = REQUIRED_GENETIC_COLS.to_vec();
    required.push(criteria.target.as_str());
    require_columns(&cleaned, &required, "genetic filter")?;

    let missing_gen_ids = cleaned.column(GEN_ID_COL)?.null_count();
    tracing::debug!("Missing values in {}: {}", GEN_ID_COL, missing_gen_ids);

    let group_rows = cleaned
        .lazy()
        .with_columns([
            col(GEN_ID_COL).cast(DataType::String),
            col(RIVER_COL).cast(DataType::String),
            col(CI_LOWER_COL).cast(DataType::Float64),
            col(CI_UPPER_COL).cast(DataType::Float64),
        ])
        .filter(col(GEN_ID_COL).eq(lit(criteria.gen_id.as_str())))
        .collect()?;
    tracing::info!("  {} == {:?}: {} rows", GEN_ID_COL, criteria.gen_id, group_rows.height());

    // NaN sorts above every number in polars, so `gt` alone would keep it
    let interval_rows = group_rows
        .lazy()
        .filter(
            col(CI_LOWER_COL)
                .gt(lit(criteria.ci_lower_bound))
                .and(col(CI_UPPER_COL).lt(lit(criteria.ci_upper_bound)))
                .and(col(CI_LOWER_COL).is_not_nan())
                .and(col(CI_UPPER_COL).is_not_nan()),
        )
        .collect()?;
    tracing::info!(
        "  CI inside ({}, {}): {} rows",
        criteria.ci_lower_bound,
        criteria.ci_upper_bound,
        interval_rows.height()
    );

    let counts = river_counts(&interval_rows)?;
    let valid_rivers: FxHashSet<String> = counts
        .iter()
        .filter(|rc| rc.count >= criteria.min_river_count)
        .map(|rc| rc.river.clone())
        .collect();
    let dropped = counts.len() - valid_rivers.len();
    if dropped > 0 {
        tracing::info!(
            "  Dropping {} rivers with fewer than {} rows",
            dropped,
            criteria.min_river_count
        );
    }

    let filtered = filter_to_keys(&interval_rows, &valid_rivers, RIVER_COL, "river count filter")?;
    tracing::info!("  Rivers kept: {} ({} rows)", valid_rivers.len(), filtered.height());

    Ok(filtered)
}

/// Rows per river, most frequent first (ties by name); null rivers are skipped
pub fn river_counts(df: &DataFrame) -> Result<Vec<RiverCount>> {
    require_columns(df, &[RIVER_COL], "river counts")?;
    let rivers = df.column(RIVER_COL)?.cast(&DataType::String)?;

    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    for river in rivers.str()?.into_iter().flatten() {
        *counts.entry(river.to_string()).or_insert(0) += 1;
    }

    let mut out: Vec<RiverCount> = counts
        .into_iter()
        .map(|(river, count)| RiverCount { river, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.river.cmp(&b.river)));
    Ok(out)
}
