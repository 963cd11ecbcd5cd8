//! Domain errors for classification and anomaly detection
//!
//! Every failure is terminal for the triggering call: a validation error
//! produces no output rows and leaves any fitted model untouched.

use thiserror::Error;

/// Errors surfaced by the risk classifier and anomaly detector
#[derive(Debug, Error)]
pub enum RiskError {
    /// A required feature column is absent from the input table
    #[error("missing required feature column '{0}'")]
    MissingFeature(String),

    /// A row lacks a numeric value for a required feature
    #[error("row {row} has no numeric value for feature '{feature}'")]
    MissingValue { row: usize, feature: String },

    /// Anomaly detection needs at least two features
    #[error("anomaly detection requires at least 2 features, got {0}")]
    InsufficientFeatures(usize),

    /// No rows to work with
    #[error("dataset is empty")]
    EmptyDataset,

    /// Not enough rows to form the requested number of clusters
    #[error("{rows} rows cannot form {clusters} clusters")]
    TooFewRows { rows: usize, clusters: usize },

    /// Cluster count outside the supported range
    #[error("cluster count must be 2 or 3, got {0}")]
    InvalidClusterCount(usize),

    /// Contamination rate outside (0, 0.5]
    #[error("contamination must be in (0, 0.5], got {0}")]
    InvalidContamination(f64),
}
