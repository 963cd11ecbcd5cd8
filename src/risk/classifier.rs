//! Clustering-based risk classifier
//!
//! Fits a scaler and k-means partition on a reference table once, ranks
//! the resulting centroids by mean standardized feature value, and maps
//! cluster indices to ordinal risk labels. Classification reuses the
//! stored fit; it never refits on input data.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RiskLabel;
use crate::cluster::KMeans;
use crate::data::{Dataset, StandardScaler};
use crate::error::RiskError;

/// Feature profile used by the cardiac reference dataset
pub const DEFAULT_PROFILE: &[&str] = &[
    "Age",
    "Weight_kg",
    "Height_cm",
    "Heart_Rate_BPM",
];

/// Cluster index and risk label assigned to one observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub cluster: usize,
    pub label: RiskLabel,
}

/// Fitted risk classifier
///
/// Serializable as a JSON artifact so a session can load a pre-trained
/// model instead of refitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskClassifier {
    profile: Vec<String>,
    scaler: StandardScaler,
    kmeans: KMeans,
    /// Risk label per cluster index, fixed at fit time
    labels: Vec<RiskLabel>,
    pub fitted_at: DateTime<Utc>,
}

impl RiskClassifier {
    /// Fit scaler, clustering, and label ranking on a reference table
    ///
    /// `k` must be 2 or 3. Every reference row must carry a numeric value
    /// for every profile feature.
    pub fn fit(
        reference: &Dataset,
        profile: &[String],
        k: usize,
        seed: u64,
    ) -> Result<Self, RiskError> {
        if !(2..=3).contains(&k) {
            return Err(RiskError::InvalidClusterCount(k));
        }

        let matrix = reference.matrix(profile)?;
        validate_complete(&matrix, profile)?;

        let (scaler, standardized) = StandardScaler::fit_transform(&matrix)?;
        let kmeans = KMeans::fit(&standardized, k, seed)?;
        log::debug!("k-means converged after {} iterations", kmeans.iterations());
        let labels = rank_labels(kmeans.centroids());

        Ok(Self {
            profile: profile.to_vec(),
            scaler,
            kmeans,
            labels,
            fitted_at: Utc::now(),
        })
    }

    /// Ordered feature names required for classification
    pub fn profile(&self) -> &[String] {
        &self.profile
    }

    /// Number of clusters
    pub fn k(&self) -> usize {
        self.kmeans.k()
    }

    /// Risk label assigned to a cluster index
    pub fn label_of(&self, cluster: usize) -> RiskLabel {
        self.labels[cluster]
    }

    /// Classify one observation given raw profile-ordered feature values
    pub fn classify_row(&self, features: &[f64]) -> ClusterAssignment {
        let standardized = self.scaler.transform_row(features);
        let cluster = self.kmeans.predict(&standardized);
        ClusterAssignment {
            cluster,
            label: self.labels[cluster],
        }
    }

    /// Classify every row of a table
    ///
    /// Fails if a profile column is absent or any row lacks a numeric
    /// value for a profile feature; no partial output is produced.
    pub fn classify(&self, table: &Dataset) -> Result<Vec<ClusterAssignment>, RiskError> {
        let matrix = table.matrix(&self.profile)?;
        validate_complete(&matrix, &self.profile)?;

        Ok(matrix.iter().map(|row| self.classify_row(row)).collect())
    }

    /// Classify a table and return a copy with `Predicted_Cluster` and
    /// `Predicted_Risk` columns appended
    pub fn annotate(&self, table: &Dataset) -> Result<Dataset, RiskError> {
        let assignments = self.classify(table)?;

        let mut annotated = table.clone();
        let clusters: Vec<usize> = assignments.iter().map(|a| a.cluster).collect();
        let risks: Vec<&str> = assignments.iter().map(|a| a.label.as_str()).collect();
        annotated.push_column("Predicted_Cluster", &clusters);
        annotated.push_column("Predicted_Risk", &risks);

        Ok(annotated)
    }

    /// Persist the fitted model as a JSON artifact
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a previously fitted model from a JSON artifact
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        let model = serde_json::from_reader(file)?;
        Ok(model)
    }
}

/// Reject any row with a NaN profile cell
fn validate_complete(matrix: &[Vec<f64>], profile: &[String]) -> Result<(), RiskError> {
    for (row_idx, row) in matrix.iter().enumerate() {
        if let Some(f_idx) = row.iter().position(|v| v.is_nan()) {
            return Err(RiskError::MissingValue {
                row: row_idx,
                feature: profile[f_idx].clone(),
            });
        }
    }
    Ok(())
}

/// Map cluster indices to labels by ranking centroid means ascending
///
/// Lowest mean standardized feature value becomes Low, highest High, and
/// the middle cluster of a three-way fit Moderate.
fn rank_labels(centroids: &[Vec<f64>]) -> Vec<RiskLabel> {
    let means: Vec<f64> = centroids
        .iter()
        .map(|c| c.iter().sum::<f64>() / c.len().max(1) as f64)
        .collect();

    let mut order: Vec<usize> = (0..centroids.len()).collect();
    order.sort_by(|&a, &b| means[a].partial_cmp(&means[b]).unwrap());

    let ordinals = match centroids.len() {
        2 => vec![RiskLabel::Low, RiskLabel::High],
        _ => vec![RiskLabel::Low, RiskLabel::Moderate, RiskLabel::High],
    };

    let mut labels = vec![RiskLabel::Low; centroids.len()];
    for (rank, &cluster) in order.iter().enumerate() {
        labels[cluster] = ordinals[rank];
    }
    labels
}
