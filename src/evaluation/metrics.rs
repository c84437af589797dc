//! Regression metrics: R² and mean squared error

use crate::dataset::FeatureMatrix;
use crate::model::Regressor;
use serde::Serialize;
use std::fmt;

/// Coefficient of determination
///
/// Constant `y_true` gives 1.0 for a perfect prediction and 0.0 otherwise.
/// Fewer than two samples is undefined and returns NaN.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len().min(y_pred.len());
    if n < 2 {
        return f64::NAN;
    }
    let mean = y_true[..n].iter().sum::<f64>() / n as f64;

    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    let ss_tot: f64 = y_true[..n].iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len().min(y_pred.len());
    if n == 0 {
        return f64::NAN;
    }
    y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum::<f64>() / n as f64
}

/// Fit quality of the selected model on both halves of the split
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitMetrics {
    pub train_r2: f64,
    pub test_r2: f64,
    pub train_mse: f64,
    pub test_mse: f64,
}

impl fmt::Display for FitMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Training R^2 score: {}", self.train_r2)?;
        writeln!(f, "Testing R^2 score: {}", self.test_r2)?;
        writeln!(f, "Training Mean Squared Error: {}", self.train_mse)?;
        write!(f, "Testing Mean Squared Error: {}", self.test_mse)
    }
}

/// Predictions of a fitted model on train and test rows
#[derive(Debug, Clone)]
pub struct FitPredictions {
    pub train: Vec<f64>,
    pub test: Vec<f64>,
}

pub fn evaluate_fit<M: Regressor>(
    model: &M,
    train: &FeatureMatrix,
    test: &FeatureMatrix,
) -> (FitMetrics, FitPredictions) {
    let train_pred = model.predict(&train.records);
    let test_pred = model.predict(&test.records);

    let metrics = FitMetrics {
        train_r2: r2_score(&train.targets, &train_pred),
        test_r2: r2_score(&test.targets, &test_pred),
        train_mse: mean_squared_error(&train.targets, &train_pred),
        test_mse: mean_squared_error(&test.targets, &test_pred),
    };

    (metrics, FitPredictions { train: train_pred, test: test_pred })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_r2_perfect_and_mean() {
        let y = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(r2_score(&y, &y), 1.0);
        assert_relative_eq!(r2_score(&y, &[2.5, 2.5, 2.5, 2.5]), 0.0);
    }

    #[test]
    fn test_r2_can_be_negative() {
        let y = [1.0, 2.0, 3.0];
        assert!(r2_score(&y, &[3.0, 2.0, 1.0]) < 0.0);
    }

    #[test]
    fn test_r2_constant_truth() {
        assert_eq!(r2_score(&[2.0, 2.0], &[2.0, 2.0]), 1.0);
        assert_eq!(r2_score(&[2.0, 2.0], &[2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_r2_single_sample_undefined() {
        assert!(r2_score(&[1.0], &[1.0]).is_nan());
    }

    #[test]
    fn test_mse() {
        assert_relative_eq!(mean_squared_error(&[1.0, 2.0], &[2.0, 4.0]), 2.5);
        assert!(mean_squared_error(&[], &[]).is_nan());
    }

    #[test]
    fn test_display_four_lines() {
        let m = FitMetrics { train_r2: 0.9, test_r2: 0.5, train_mse: 0.01, test_mse: 0.02 };
        let text = m.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Training R^2 score: 0.9");
        assert_eq!(lines[3], "Testing Mean Squared Error: 0.02");
    }
}
