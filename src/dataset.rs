//! Numeric feature matrix handed to the model stages

use crate::error::{AnalysisError, Result};

/// Row-major features plus the regression target
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub feature_names: Vec<String>,
    pub records: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl FeatureMatrix {
    pub fn new(feature_names: Vec<String>, records: Vec<Vec<f64>>, targets: Vec<f64>) -> Result<Self> {
        if records.len() != targets.len() {
            return Err(AnalysisError::InvalidParameter(format!(
                "{} feature rows but {} targets",
                records.len(),
                targets.len()
            )));
        }
        if let Some(row) = records.iter().find(|r| r.len() != feature_names.len()) {
            return Err(AnalysisError::InvalidParameter(format!(
                "row has {} values, expected {} features",
                row.len(),
                feature_names.len()
            )));
        }
        Ok(Self {
            feature_names,
            records,
            targets,
        })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Rows at `indices`, in that order (indices may repeat)
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self {
            feature_names: self.feature_names.clone(),
            records: self.records[..n].to_vec(),
            targets: self.targets[..n].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureMatrix {
        FeatureMatrix::new(
            vec!["a".into(), "b".into()],
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
            vec![10.0, 20.0, 30.0],
        )
        .unwrap()
    }

    #[test]
    fn test_subset_keeps_order() {
        let m = sample().subset(&[2, 0, 2]);
        assert_eq!(m.targets, vec![30.0, 10.0, 30.0]);
        assert_eq!(m.records[1], vec![1.0, 2.0]);
    }

    #[test]
    fn test_head() {
        assert_eq!(sample().head(2).len(), 2);
        assert_eq!(sample().head(10).len(), 3);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        assert!(FeatureMatrix::new(vec!["a".into()], vec![vec![1.0, 2.0]], vec![1.0]).is_err());
        assert!(FeatureMatrix::new(vec!["a".into()], vec![vec![1.0]], vec![]).is_err());
    }
}
