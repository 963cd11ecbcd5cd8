//! Feature standardization
//!
//! Z-score scaling with a fit/transform split: parameters learned once on
//! a reference matrix are stored and reapplied to later inputs, never
//! refit per call.

use serde::{Deserialize, Serialize};

use crate::error::RiskError;

/// Per-feature standardization parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureStats {
    pub mean: f64,
    pub std: f64,
}

impl FeatureStats {
    /// Calculate mean and standard deviation of one feature column
    pub fn from_values(values: &[f64]) -> Result<Self, RiskError> {
        if values.is_empty() {
            return Err(RiskError::EmptyDataset);
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Ok(Self {
            mean,
            std: variance.sqrt(),
        })
    }

    /// Standardize a single value; constant features map to 0
    pub fn standardize(&self, value: f64) -> f64 {
        if self.std < 1e-10 {
            0.0
        } else {
            (value - self.mean) / self.std
        }
    }
}

/// Multi-feature z-score scaler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    stats: Vec<FeatureStats>,
}

impl StandardScaler {
    /// Fit per-feature statistics on a reference matrix
    pub fn fit(matrix: &[Vec<f64>]) -> Result<Self, RiskError> {
        if matrix.is_empty() {
            return Err(RiskError::EmptyDataset);
        }

        let n_features = matrix[0].len();
        let mut stats = Vec::with_capacity(n_features);

        for f_idx in 0..n_features {
            let values: Vec<f64> = matrix.iter().map(|row| row[f_idx]).collect();
            stats.push(FeatureStats::from_values(&values)?);
        }

        Ok(Self { stats })
    }

    /// Number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.stats.len()
    }

    /// Standardize one row using the stored parameters
    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(&self.stats)
            .map(|(v, s)| s.standardize(*v))
            .collect()
    }

    /// Standardize a whole matrix using the stored parameters
    pub fn transform(&self, matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
        matrix.iter().map(|row| self.transform_row(row)).collect()
    }

    /// Fit and transform in one step
    pub fn fit_transform(matrix: &[Vec<f64>]) -> Result<(Self, Vec<Vec<f64>>), RiskError> {
        let scaler = Self::fit(matrix)?;
        let transformed = scaler.transform(matrix);
        Ok((scaler, transformed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardized_moments() {
        let matrix: Vec<Vec<f64>> = (1..=5).map(|i| vec![i as f64, i as f64 * 10.0]).collect();
        let (_, transformed) = StandardScaler::fit_transform(&matrix).unwrap();

        for f_idx in 0..2 {
            let values: Vec<f64> = transformed.iter().map(|r| r[f_idx]).collect();
            let mean: f64 = values.iter().sum::<f64>() / values.len() as f64;
            let var: f64 =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

            assert!(mean.abs() < 1e-9);
            assert!((var - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_feature_maps_to_zero() {
        let matrix = vec![vec![7.0], vec![7.0], vec![7.0]];
        let (_, transformed) = StandardScaler::fit_transform(&matrix).unwrap();
        assert!(transformed.iter().all(|r| r[0] == 0.0));
    }

    #[test]
    fn test_stored_parameters_reused() {
        let reference = vec![vec![0.0], vec![10.0]];
        let scaler = StandardScaler::fit(&reference).unwrap();

        // Mean 5, std 5: a later input of 15 must standardize against the
        // reference statistics, not its own.
        let out = scaler.transform_row(&[15.0]);
        assert!((out[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_matrix_fails() {
        assert!(matches!(
            StandardScaler::fit(&[]),
            Err(RiskError::EmptyDataset)
        ));
    }
}
