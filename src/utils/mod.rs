//! Utility modules shared across pipeline stages
//!
//! - Frame helpers: column validation, key filtering, column drops
//! - Stats: mean and population standard deviation

pub mod lazy_helpers;
pub mod stats;

pub use lazy_helpers::{column_names, drop_columns, filter_to_keys, materialize_with_columns, require_columns};
pub use stats::{mean, population_std};
