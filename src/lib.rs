//! Cardiac Risk Classification for Tabular Health Metrics
//!
//! This library groups health observations into ordinal risk levels via
//! unsupervised clustering and flags statistical outliers in uploaded
//! batches.
//!
//! # Modules
//!
//! - `data`: CSV-backed tables and feature standardization
//! - `cluster`: seeded k-means partitioning
//! - `risk`: cluster-to-risk-label assignment and model persistence
//! - `anomaly`: isolation-forest outlier flagging over a feature subset
//!
//! # Example
//!
//! ```no_run
//! use cardiac_risk::data::Dataset;
//! use cardiac_risk::risk::RiskClassifier;
//!
//! // Fit once on a reference dataset
//! let reference = Dataset::from_csv_path("clustered_data.csv").unwrap();
//! let profile: Vec<String> = cardiac_risk::risk::DEFAULT_PROFILE
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let model = RiskClassifier::fit(&reference, &profile, 3, 42).unwrap();
//!
//! // Classify a new batch against the stored fit
//! let batch = Dataset::from_csv_path("patients.csv").unwrap();
//! let annotated = model.annotate(&batch).unwrap();
//! annotated.to_csv_path("patients_classified.csv").unwrap();
//! ```

pub mod anomaly;
pub mod cluster;
pub mod data;
pub mod error;
pub mod risk;

pub use anomaly::*;
pub use cluster::*;
pub use data::*;
pub use error::RiskError;
pub use risk::*;
