//! Isolation forest outlier scoring
//!
//! An ensemble of randomly split trees: outlying rows isolate in fewer
//! splits, so shorter average path lengths mean higher anomaly scores.
//! The decision threshold is calibrated after fitting so the configured
//! contamination fraction of training rows scores above it.

use rand::prelude::*;
use rand_distr::Uniform;
use serde::{Deserialize, Serialize};

use crate::error::RiskError;

/// Euler-Mascheroni constant, used in the average-path-length correction
const EULER_GAMMA: f64 = 0.5772156649;

#[derive(Debug, Clone, Serialize, Deserialize)]
enum TreeNode {
    Split {
        feature: usize,
        value: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        size: usize,
    },
}

impl TreeNode {
    fn build(rows: &[Vec<f64>], depth: usize, max_depth: usize, rng: &mut StdRng) -> Self {
        if depth >= max_depth || rows.len() <= 1 {
            return TreeNode::Leaf { size: rows.len() };
        }

        let n_features = rows[0].len();
        let feature = rng.gen_range(0..n_features);

        let mut min_val = f64::INFINITY;
        let mut max_val = f64::NEG_INFINITY;
        for row in rows {
            min_val = min_val.min(row[feature]);
            max_val = max_val.max(row[feature]);
        }

        if (max_val - min_val).abs() < 1e-10 {
            return TreeNode::Leaf { size: rows.len() };
        }

        let value = rng.sample(Uniform::new(min_val, max_val));

        let (left_rows, right_rows): (Vec<Vec<f64>>, Vec<Vec<f64>>) = rows
            .iter()
            .cloned()
            .partition(|row| row[feature] < value);

        TreeNode::Split {
            feature,
            value,
            left: Box::new(Self::build(&left_rows, depth + 1, max_depth, rng)),
            right: Box::new(Self::build(&right_rows, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(&self, row: &[f64], depth: usize) -> f64 {
        match self {
            TreeNode::Leaf { size } => depth as f64 + avg_path_length(*size),
            TreeNode::Split {
                feature,
                value,
                left,
                right,
            } => {
                if row[*feature] < *value {
                    left.path_length(row, depth + 1)
                } else {
                    right.path_length(row, depth + 1)
                }
            }
        }
    }
}

/// Average path length of an unsuccessful binary search over n points
fn avg_path_length(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let n = n as f64;
    2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
}

/// Fitted isolation forest with a contamination-calibrated threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    trees: Vec<TreeNode>,
    sample_size: usize,
    contamination: f64,
    threshold: f64,
}

impl IsolationForest {
    pub const DEFAULT_TREES: usize = 100;
    pub const DEFAULT_SAMPLE: usize = 256;
    pub const DEFAULT_CONTAMINATION: f64 = 0.05;

    /// Fit a forest of `n_trees` on `data`, seeded for reproducibility
    ///
    /// `contamination` is the expected fraction of anomalous rows and must
    /// lie in (0, 0.5]; it fixes the score threshold after fitting.
    pub fn fit(
        data: &[Vec<f64>],
        n_trees: usize,
        contamination: f64,
        seed: u64,
    ) -> Result<Self, RiskError> {
        if data.is_empty() {
            return Err(RiskError::EmptyDataset);
        }
        if contamination <= 0.0 || contamination > 0.5 {
            return Err(RiskError::InvalidContamination(contamination));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let sample_size = Self::DEFAULT_SAMPLE.min(data.len());
        let max_depth = (sample_size as f64).log2().ceil() as usize;

        let mut trees = Vec::with_capacity(n_trees);
        for _ in 0..n_trees {
            let indices: Vec<usize> = (0..data.len()).choose_multiple(&mut rng, sample_size);
            let sample: Vec<Vec<f64>> = indices.iter().map(|&i| data[i].clone()).collect();
            trees.push(TreeNode::build(&sample, 0, max_depth, &mut rng));
        }

        let mut forest = Self {
            trees,
            sample_size,
            contamination,
            threshold: 0.5,
        };

        // Threshold such that ~contamination of training rows exceed it
        let mut scores: Vec<f64> = data.iter().map(|row| forest.score(row)).collect();
        scores.sort_by(|a, b| b.partial_cmp(a).unwrap());
        let cutoff = (contamination * scores.len() as f64) as usize;
        forest.threshold = scores.get(cutoff).copied().unwrap_or(0.5);

        Ok(forest)
    }

    /// Anomaly score in (0, 1]; higher means more isolated
    pub fn score(&self, row: &[f64]) -> f64 {
        let avg: f64 = self
            .trees
            .iter()
            .map(|t| t.path_length(row, 0))
            .sum::<f64>()
            / self.trees.len() as f64;

        let c = avg_path_length(self.sample_size);
        if c < 1e-10 {
            return 0.5;
        }

        2.0_f64.powf(-avg / c)
    }

    /// Whether a row scores above the calibrated threshold
    pub fn is_anomaly(&self, row: &[f64]) -> bool {
        self.score(row) > self.threshold
    }

    /// Calibrated score threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Configured contamination rate
    pub fn contamination(&self) -> f64 {
        self.contamination
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outlier_scores_higher_than_center() {
        let data: Vec<Vec<f64>> = (0..200)
            .map(|i| {
                let t = i as f64 / 200.0;
                vec![t.sin(), t.cos()]
            })
            .collect();

        let forest = IsolationForest::fit(&data, 100, 0.05, 42).unwrap();

        let center = forest.score(&[0.5, 0.9]);
        let outlier = forest.score(&[25.0, -25.0]);
        assert!(outlier > center);
        assert!(forest.is_anomaly(&[25.0, -25.0]));
    }

    #[test]
    fn test_same_seed_same_threshold() {
        let data: Vec<Vec<f64>> = (0..100).map(|i| vec![i as f64, (i * 3) as f64]).collect();

        let a = IsolationForest::fit(&data, 50, 0.1, 7).unwrap();
        let b = IsolationForest::fit(&data, 50, 0.1, 7).unwrap();
        assert_eq!(a.threshold(), b.threshold());
    }

    #[test]
    fn test_invalid_contamination() {
        let data = vec![vec![1.0], vec![2.0]];
        assert!(matches!(
            IsolationForest::fit(&data, 10, 0.0, 0),
            Err(RiskError::InvalidContamination(_))
        ));
        assert!(matches!(
            IsolationForest::fit(&data, 10, 0.9, 0),
            Err(RiskError::InvalidContamination(_))
        ));
    }
}
