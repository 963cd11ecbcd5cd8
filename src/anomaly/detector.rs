//! Batch anomaly detection over a chosen feature subset
//!
//! Each batch is scored against itself: the subset is standardized with
//! its own scaler and an isolation forest is fitted locally. Nothing here
//! touches the risk classifier's reference fit.

use super::{AnomalyLabel, IsolationForest};
use crate::data::{Dataset, StandardScaler};
use crate::error::RiskError;

/// Tunable parameters of a batch detection run
#[derive(Debug, Clone, Copy)]
pub struct DetectorConfig {
    pub contamination: f64,
    pub n_trees: usize,
    pub seed: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            contamination: IsolationForest::DEFAULT_CONTAMINATION,
            n_trees: IsolationForest::DEFAULT_TREES,
            seed: 42,
        }
    }
}

/// Outcome of scoring one batch
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Original row indices that survived the missing-value drop
    pub kept_rows: Vec<usize>,
    /// Score per kept row, aligned with `kept_rows`
    pub scores: Vec<f64>,
    /// Label per kept row, aligned with `kept_rows`
    pub labels: Vec<AnomalyLabel>,
    /// Rows silently dropped for missing values in the chosen subset
    pub dropped: usize,
}

impl BatchReport {
    /// Number of rows flagged as anomalous
    pub fn n_anomalies(&self) -> usize {
        self.labels
            .iter()
            .filter(|l| **l == AnomalyLabel::Anomaly)
            .count()
    }
}

/// Score a table over `features` and label each surviving row
///
/// Requires at least two feature names; rows with a missing value in the
/// chosen subset are dropped before fitting.
pub fn detect_batch(
    table: &Dataset,
    features: &[String],
    config: &DetectorConfig,
) -> Result<BatchReport, RiskError> {
    if features.len() < 2 {
        return Err(RiskError::InsufficientFeatures(features.len()));
    }

    let matrix = table.matrix(features)?;

    let mut kept_rows = Vec::new();
    let mut kept = Vec::new();
    for (i, row) in matrix.iter().enumerate() {
        if row.iter().all(|v| v.is_finite()) {
            kept_rows.push(i);
            kept.push(row.clone());
        }
    }
    let dropped = matrix.len() - kept.len();

    if kept.is_empty() {
        return Err(RiskError::EmptyDataset);
    }

    // Subset-local scaler, independent of any classifier fit
    let (_, standardized) = StandardScaler::fit_transform(&kept)?;
    let forest = IsolationForest::fit(&standardized, config.n_trees, config.contamination, config.seed)?;

    let scores: Vec<f64> = standardized.iter().map(|row| forest.score(row)).collect();
    let labels: Vec<AnomalyLabel> = scores
        .iter()
        .map(|&s| {
            if s > forest.threshold() {
                AnomalyLabel::Anomaly
            } else {
                AnomalyLabel::Normal
            }
        })
        .collect();

    Ok(BatchReport {
        kept_rows,
        scores,
        labels,
        dropped,
    })
}

/// Score a table and return the surviving rows with an `Anomaly_Label`
/// column appended
pub fn annotate_batch(
    table: &Dataset,
    features: &[String],
    config: &DetectorConfig,
) -> Result<Dataset, RiskError> {
    let report = detect_batch(table, features, config)?;

    let mut annotated = table.select_rows(&report.kept_rows);
    let labels: Vec<&str> = report.labels.iter().map(|l| l.as_str()).collect();
    annotated.push_column("Anomaly_Label", &labels);

    Ok(annotated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_names() -> Vec<String> {
        vec!["Heart_Rate_BPM".into(), "Systolic_BP".into()]
    }

    /// 1000 unremarkable rows plus 50 extreme ones at known positions
    fn seeded_batch() -> (Dataset, Vec<usize>) {
        let mut records = Vec::new();
        for i in 0..1000 {
            let hr = 65.0 + (i % 30) as f64;
            let bp = 110.0 + (i % 25) as f64;
            records.push(vec![hr.to_string(), bp.to_string()]);
        }
        let mut outlier_rows = Vec::new();
        for j in 0..50 {
            let idx = j * 20;
            records[idx] = vec![(400.0 + j as f64).to_string(), (500.0 + j as f64).to_string()];
            outlier_rows.push(idx);
        }
        (Dataset::new(feature_names(), records), outlier_rows)
    }

    #[test]
    fn test_requires_two_features() {
        let (table, _) = seeded_batch();
        let err = detect_batch(&table, &["Heart_Rate_BPM".to_string()], &DetectorConfig::default())
            .unwrap_err();
        assert!(matches!(err, RiskError::InsufficientFeatures(1)));
    }

    #[test]
    fn test_missing_value_rows_dropped_silently() {
        let mut records = vec![
            vec!["70".to_string(), "120".to_string()],
            vec!["".to_string(), "125".to_string()],
            vec!["72".to_string(), "118".to_string()],
            vec!["74".to_string(), "119".to_string()],
        ];
        for i in 0..40 {
            records.push(vec![(70 + i % 8).to_string(), (115 + i % 10).to_string()]);
        }
        let table = Dataset::new(feature_names(), records);

        let report = detect_batch(&table, &feature_names(), &DetectorConfig::default()).unwrap();
        assert_eq!(report.dropped, 1);
        assert!(!report.kept_rows.contains(&1));
        assert_eq!(report.labels.len(), table.len() - 1);
    }

    #[test]
    fn test_contamination_bounds_flag_count() {
        let (table, outlier_rows) = seeded_batch();
        let report = detect_batch(&table, &feature_names(), &DetectorConfig::default()).unwrap();

        // ~5% of 1000 rows should be flagged
        let flagged = report.n_anomalies();
        assert!(flagged >= 25 && flagged <= 90, "flagged {flagged} rows");

        // The injected extremes dominate the flags
        let flagged_outliers = report
            .kept_rows
            .iter()
            .zip(&report.labels)
            .filter(|(row, label)| outlier_rows.contains(row) && **label == AnomalyLabel::Anomaly)
            .count();
        assert!(flagged_outliers >= 45, "only {flagged_outliers} extremes flagged");
    }

    #[test]
    fn test_annotated_table_keeps_survivors_only() {
        let (table, _) = seeded_batch();
        let annotated = annotate_batch(&table, &feature_names(), &DetectorConfig::default()).unwrap();

        assert_eq!(annotated.len(), table.len());
        assert_eq!(annotated.headers().last().unwrap(), "Anomaly_Label");
        let labels = annotated.column("Anomaly_Label").unwrap();
        assert!(labels.iter().all(|l| *l == "Normal" || *l == "Anomaly"));
    }
}
