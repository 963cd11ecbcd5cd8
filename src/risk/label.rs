//! Ordinal risk labels

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordinal risk level assigned to a cluster
///
/// Ordering follows centroid ranking: the cluster with the lowest mean
/// standardized feature value is `Low`, the highest is `High`. Two-cluster
/// fits use only `Low` and `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Moderate,
    High,
}

impl RiskLabel {
    /// Human-readable label used in output tables
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Low => "Low Risk",
            RiskLabel::Moderate => "Moderate Risk",
            RiskLabel::High => "High Risk",
        }
    }

}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Low Risk" | "Low" => Ok(RiskLabel::Low),
            "Moderate Risk" | "Moderate" => Ok(RiskLabel::Moderate),
            "High Risk" | "High" => Ok(RiskLabel::High),
            other => Err(format!("unknown risk label '{other}'")),
        }
    }
}
