//! Seeded k-means clustering
//!
//! Lloyd's algorithm over standardized feature rows. Initialization draws
//! k distinct rows with a seeded RNG so that the same data and seed always
//! reproduce the same centroids and assignments.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::RiskError;

const MAX_ITER: usize = 100;

/// Squared Euclidean distance between two feature rows
fn sq_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Fitted centroid-based partitioner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeans {
    centroids: Vec<Vec<f64>>,
    iterations: usize,
}

impl KMeans {
    /// Fit k centroids on a feature matrix
    ///
    /// Fails on an empty matrix or when there are fewer rows than
    /// requested clusters.
    pub fn fit(data: &[Vec<f64>], k: usize, seed: u64) -> Result<Self, RiskError> {
        if data.is_empty() {
            return Err(RiskError::EmptyDataset);
        }
        if data.len() < k {
            return Err(RiskError::TooFewRows {
                rows: data.len(),
                clusters: k,
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let n = data.len();

        // Farthest-first init: a seeded random first centroid, then each
        // next centroid is the row farthest from all chosen so far. Keeps
        // separated groups from sharing an initial centroid.
        let mut centroids: Vec<Vec<f64>> = vec![data[rng.gen_range(0..n)].clone()];
        while centroids.len() < k {
            let farthest = data
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| {
                    let da = centroids.iter().map(|c| sq_distance(a, c)).fold(f64::MAX, f64::min);
                    let db = centroids.iter().map(|c| sq_distance(b, c)).fold(f64::MAX, f64::min);
                    da.partial_cmp(&db).unwrap()
                })
                .map(|(i, _)| i)
                .unwrap_or(0);
            centroids.push(data[farthest].clone());
        }

        let mut assignments = vec![0usize; n];
        let mut iterations = 0;

        for iter in 0..MAX_ITER {
            iterations = iter + 1;

            // Assign rows to nearest centroid
            let mut changed = false;
            for (i, row) in data.iter().enumerate() {
                let nearest = Self::nearest(&centroids, row);
                if assignments[i] != nearest {
                    assignments[i] = nearest;
                    changed = true;
                }
            }

            if !changed && iter > 0 {
                break;
            }

            // Recompute centroids; an emptied cluster keeps its previous one
            let dim = data[0].len();
            for (j, centroid) in centroids.iter_mut().enumerate() {
                let mut sum = vec![0.0; dim];
                let mut count = 0usize;
                for (i, row) in data.iter().enumerate() {
                    if assignments[i] == j {
                        for (s, v) in sum.iter_mut().zip(row) {
                            *s += v;
                        }
                        count += 1;
                    }
                }
                if count > 0 {
                    for s in &mut sum {
                        *s /= count as f64;
                    }
                    *centroid = sum;
                }
            }
        }

        Ok(Self {
            centroids,
            iterations,
        })
    }

    fn nearest(centroids: &[Vec<f64>], row: &[f64]) -> usize {
        let mut best = 0;
        let mut best_dist = f64::MAX;
        for (j, centroid) in centroids.iter().enumerate() {
            let dist = sq_distance(row, centroid);
            if dist < best_dist {
                best_dist = dist;
                best = j;
            }
        }
        best
    }

    /// Assign a row to its nearest centroid
    pub fn predict(&self, row: &[f64]) -> usize {
        Self::nearest(&self.centroids, row)
    }

    /// Number of clusters
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Fitted centroids
    pub fn centroids(&self) -> &[Vec<f64>] {
        &self.centroids
    }

    /// Lloyd iterations until convergence (or the cap)
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f64>> {
        let mut data = Vec::new();
        for i in 0..20 {
            let jitter = (i % 5) as f64 * 0.01;
            data.push(vec![0.0 + jitter, 0.0 + jitter]);
            data.push(vec![5.0 + jitter, 5.0 + jitter]);
            data.push(vec![10.0 + jitter, 10.0 + jitter]);
        }
        data
    }

    #[test]
    fn test_recovers_separated_blobs() {
        let model = KMeans::fit(&blobs(), 3, 42).unwrap();

        let a = model.predict(&[0.0, 0.0]);
        let b = model.predict(&[5.0, 5.0]);
        let c = model.predict(&[10.0, 10.0]);

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_same_seed_reproduces_fit() {
        let data = blobs();
        let first = KMeans::fit(&data, 3, 7).unwrap();
        let second = KMeans::fit(&data, 3, 7).unwrap();

        assert_eq!(first.centroids(), second.centroids());
    }

    #[test]
    fn test_predict_is_nearest_centroid() {
        let model = KMeans::fit(&blobs(), 3, 42).unwrap();
        for (j, centroid) in model.centroids().iter().enumerate() {
            assert_eq!(model.predict(centroid), j);
        }
    }

    #[test]
    fn test_too_few_rows() {
        let data = vec![vec![1.0], vec![2.0]];
        assert!(matches!(
            KMeans::fit(&data, 3, 0),
            Err(RiskError::TooFewRows { rows: 2, clusters: 3 })
        ));
    }
}
