//! Standard scaling: subtract the mean, divide by the population std

/// Per-feature mean and scale learned from training rows
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Zero-variance features get scale 1 so they pass through centered
    pub fn fit(x: &[Vec<f64>]) -> Self {
        let n_features = x.first().map_or(0, Vec::len);
        let n = x.len() as f64;

        let mut means = vec![0.0; n_features];
        for row in x {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        if n > 0.0 {
            means.iter_mut().for_each(|m| *m /= n);
        }

        let mut vars = vec![0.0; n_features];
        for row in x {
            for ((var, v), m) in vars.iter_mut().zip(row).zip(&means) {
                *var += (v - m).powi(2);
            }
        }

        let scales = vars
            .into_iter()
            .map(|var| {
                let std = if n > 0.0 { (var / n).sqrt() } else { 0.0 };
                if std > f64::EPSILON { std } else { 1.0 }
            })
            .collect();

        Self { means, scales }
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }

    pub fn transform(&self, x: &[Vec<f64>]) -> Vec<Vec<f64>> {
        x.iter().map(|row| self.transform_row(row)).collect()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_standardizes_columns() {
        let x = vec![vec![1.0, 10.0], vec![3.0, 10.0], vec![5.0, 10.0]];
        let scaler = StandardScaler::fit(&x);

        assert_eq!(scaler.means(), &[3.0, 10.0]);
        assert_relative_eq!(scaler.scales()[0], (8.0f64 / 3.0).sqrt());
        // Constant column keeps scale 1
        assert_relative_eq!(scaler.scales()[1], 1.0);

        let t = scaler.transform(&x);
        let col0: Vec<f64> = t.iter().map(|r| r[0]).collect();
        assert_relative_eq!(col0.iter().sum::<f64>(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(t[2][1], 0.0);
    }

    #[test]
    fn test_transform_unseen_row_uses_training_stats() {
        let scaler = StandardScaler::fit(&[vec![0.0], vec![2.0]]);
        assert_relative_eq!(scaler.transform_row(&[4.0])[0], 3.0);
    }
}
