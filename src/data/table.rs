//! Tabular health-metric data
//!
//! Provides the core table type read from CSV: named columns, rows of
//! cell values, and extraction of numeric feature matrices for
//! classification and anomaly detection.

use std::fmt::Display;
use std::path::Path;

use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};

use crate::error::RiskError;

/// In-memory table of named columns
///
/// Cells are kept as raw strings so that label columns appended after
/// classification (`Predicted_Risk`, `Anomaly_Label`) survive a CSV
/// round-trip unchanged. Numeric views are produced on demand; a cell
/// that does not parse as a number becomes NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl Dataset {
    /// Create a table from headers and rows
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        Self { headers, records }
    }

    /// Read a table from a CSV file with a header row
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let mut reader = Reader::from_path(path)?;
        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            records.push(record.iter().map(|c| c.trim().to_string()).collect());
        }

        Ok(Self { headers, records })
    }

    /// Write the table to a CSV file with a header row (UTF-8)
    pub fn to_csv_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(&self.headers)?;
        for record in &self.records {
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Column names in order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Raw cells of one row
    pub fn row(&self, idx: usize) -> Option<&[String]> {
        self.records.get(idx).map(|r| r.as_slice())
    }

    /// Position of a named column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Raw string values of a named column
    pub fn column(&self, name: &str) -> Result<Vec<&str>, RiskError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| RiskError::MissingFeature(name.to_string()))?;
        Ok(self
            .records
            .iter()
            .map(|r| r.get(idx).map(|c| c.as_str()).unwrap_or(""))
            .collect())
    }

    /// Numeric values of a named column, NaN where a cell does not parse
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, RiskError> {
        Ok(self
            .column(name)?
            .into_iter()
            .map(|c| c.parse().unwrap_or(f64::NAN))
            .collect())
    }

    /// Extract a feature matrix, one row per record, columns in the order
    /// of `features`
    ///
    /// Fails if any requested column is absent from the table. Cells that
    /// do not parse as numbers come through as NaN; callers decide whether
    /// NaN is an error (classification) or grounds for dropping the row
    /// (anomaly detection).
    pub fn matrix(&self, features: &[String]) -> Result<Vec<Vec<f64>>, RiskError> {
        let mut indices = Vec::with_capacity(features.len());
        for name in features {
            let idx = self
                .column_index(name)
                .ok_or_else(|| RiskError::MissingFeature(name.clone()))?;
            indices.push(idx);
        }

        Ok(self
            .records
            .iter()
            .map(|record| {
                indices
                    .iter()
                    .map(|&i| {
                        record
                            .get(i)
                            .and_then(|c| c.parse().ok())
                            .unwrap_or(f64::NAN)
                    })
                    .collect()
            })
            .collect())
    }

    /// Append a derived column; `values` must cover every row
    pub fn push_column<T: Display>(&mut self, name: &str, values: &[T]) {
        debug_assert_eq!(values.len(), self.records.len());
        self.headers.push(name.to_string());
        for (record, value) in self.records.iter_mut().zip(values) {
            record.push(value.to_string());
        }
    }

    /// New table containing only the rows at `indices`, in order
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            headers: self.headers.clone(),
            records: indices
                .iter()
                .filter_map(|&i| self.records.get(i).cloned())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample() -> Dataset {
        Dataset::new(
            vec!["Age".into(), "Heart_Rate_BPM".into()],
            vec![
                vec!["34".into(), "72".into()],
                vec!["61".into(), "95".into()],
                vec!["48".into(), "".into()],
            ],
        )
    }

    #[test]
    fn test_matrix_extraction() {
        let table = sample();
        let matrix = table
            .matrix(&["Heart_Rate_BPM".into(), "Age".into()])
            .unwrap();

        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix[0], vec![72.0, 34.0]);
        assert!(matrix[2][0].is_nan()); // Blank cell

        let ages = table.numeric_column("Age").unwrap();
        assert_eq!(ages, vec![34.0, 61.0, 48.0]);
    }

    #[test]
    fn test_missing_column_fails() {
        let table = sample();
        let err = table.matrix(&["Cholesterol".into()]).unwrap_err();
        assert!(matches!(err, RiskError::MissingFeature(name) if name == "Cholesterol"));
    }

    #[test]
    fn test_push_column_and_select() {
        let mut table = sample();
        table.push_column("Predicted_Cluster", &[0usize, 2, 1]);

        assert_eq!(table.headers().last().unwrap(), "Predicted_Cluster");
        assert_eq!(table.row(1).unwrap()[2], "2");

        let subset = table.select_rows(&[2, 0]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.row(0).unwrap()[0], "48");
    }

    #[test]
    fn test_csv_round_trip() {
        let mut table = sample();
        table.push_column("Predicted_Risk", &["Low Risk", "High Risk", "Low Risk"]);

        let file = NamedTempFile::new().unwrap();
        table.to_csv_path(file.path()).unwrap();
        let reread = Dataset::from_csv_path(file.path()).unwrap();

        assert_eq!(reread.headers(), table.headers());
        assert_eq!(
            reread.column("Predicted_Risk").unwrap(),
            vec!["Low Risk", "High Risk", "Low Risk"]
        );
    }
}
