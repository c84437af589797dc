//! Frame helpers with column validation
//!
//! Every stage that touches a named column goes through these so a missing
//! column is reported with the stage name and the columns that do exist.

use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use rustc_hash::FxHashSet;

/// Column names of a frame as owned strings
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Fail with `MissingColumn` unless every name in `columns` is present
pub fn require_columns(df: &DataFrame, columns: &[&str], context: &str) -> Result<()> {
    let actual = column_names(df);
    let present: FxHashSet<&str> = actual.iter().map(String::as_str).collect();

    for &expected in columns {
        if !present.contains(expected) {
            return Err(AnalysisError::MissingColumn {
                context: context.to_string(),
                column: expected.to_string(),
                available: actual.clone(),
            });
        }
    }

    Ok(())
}

/// Materialize LazyFrame with explicit column list and validation
///
/// # Errors
/// Returns error if materialization fails or a required column is absent
/// from the result.
pub fn materialize_with_columns(
    lazy: &LazyFrame,
    columns: &[&str],
    context: &str,
) -> Result<DataFrame> {
    let col_exprs: Vec<Expr> = columns.iter()
        .map(|&name| col(name))
        .collect();

    let df = lazy
        .clone()
        .select(&col_exprs)
        .collect()?;

    require_columns(&df, columns, context)?;
    Ok(df)
}

/// Keep rows whose `key_col` value is in `keys`
///
/// Rows with a null key are dropped.
pub fn filter_to_keys(
    df: &DataFrame,
    keys: &FxHashSet<String>,
    key_col: &str,
    context: &str,
) -> Result<DataFrame> {
    require_columns(df, &[key_col], context)?;
    let key_series = df.column(key_col)?.str()?;

    let mask: BooleanChunked = key_series
        .into_iter()
        .map(|opt| opt.map_or(false, |s| keys.contains(s)))
        .collect();

    Ok(df.filter(&mask)?)
}

/// Remove the named columns; every one of them must exist
pub fn drop_columns(df: &DataFrame, drop: &[&str], context: &str) -> Result<DataFrame> {
    require_columns(df, drop, context)?;

    let dropped: FxHashSet<&str> = drop.iter().copied().collect();
    let keep: Vec<String> = column_names(df)
        .into_iter()
        .filter(|name| !dropped.contains(name.as_str()))
        .collect();

    Ok(df.select(keep.iter().map(String::as_str))?)
}
