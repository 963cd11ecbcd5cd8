//! Anomaly detection module
//!
//! This module provides:
//! - A seeded isolation forest with a contamination-calibrated threshold
//! - Batch scoring of a table over a user-chosen feature subset

mod detector;
mod isolation_forest;

pub use detector::*;
pub use isolation_forest::*;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-row outlier label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyLabel {
    Normal,
    Anomaly,
}

impl AnomalyLabel {
    /// Label text used in output tables
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyLabel::Normal => "Normal",
            AnomalyLabel::Anomaly => "Anomaly",
        }
    }
}

impl fmt::Display for AnomalyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
