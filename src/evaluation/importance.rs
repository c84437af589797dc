//! Feature importance ranking

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Pair names with importances, least important first
///
/// Ascending order puts the most important feature at the top of a
/// horizontal bar chart. Equal importances keep their column order.
pub fn ranked_importances(names: &[String], importances: &[f64]) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = names
        .iter()
        .zip(importances)
        .map(|(feature, &importance)| FeatureImportance {
            feature: feature.clone(),
            importance,
        })
        .collect();
    ranked.sort_by(|a, b| a.importance.total_cmp(&b.importance));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_ascending() {
        let names = vec!["temp".to_string(), "area".to_string(), "slope".to_string()];
        let ranked = ranked_importances(&names, &[0.5, 0.2, 0.3]);
        let order: Vec<&str> = ranked.iter().map(|r| r.feature.as_str()).collect();
        assert_eq!(order, vec!["area", "slope", "temp"]);
    }

    #[test]
    fn test_ties_keep_column_order() {
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let ranked = ranked_importances(&names, &[0.0, 0.0, 1.0]);
        assert_eq!(ranked[0].feature, "a");
        assert_eq!(ranked[1].feature, "b");
    }
}
