use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Ordered numeric rows under named columns, e.g. year-over-year growth
/// figures loaded from a CSV by the caller. Rows must be rectangular;
/// a ragged row is the one structural error this type reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularDataset {
    columns: Vec<String>,
    row_labels: Option<Vec<String>>,
    rows: Vec<Vec<f64>>,
}

impl TabularDataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(AnalysisError::ShapeMismatch(format!(
                    "row {} has {} values but {} columns are declared",
                    i,
                    row.len(),
                    columns.len()
                )));
            }
        }
        Ok(Self {
            columns,
            row_labels: None,
            rows,
        })
    }

    /// Attach one label per row (e.g. a period name) used as the
    /// `row_identifier` of emitted anomaly records.
    pub fn with_row_labels(mut self, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.rows.len() {
            return Err(AnalysisError::ShapeMismatch(format!(
                "{} labels for {} rows",
                labels.len(),
                self.rows.len()
            )));
        }
        self.row_labels = Some(labels);
        Ok(self)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn column_values(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[index]).collect()
    }

    /// Identifier reported for a row: its label when labels were attached,
    /// otherwise the zero-based row index.
    pub fn row_identifier(&self, index: usize) -> String {
        match &self.row_labels {
            Some(labels) => labels[index].clone(),
            None => index.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rectangular_dataset() {
        let ds = TabularDataset::new(
            cols(&["a", "b"]),
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        )
        .unwrap();
        assert_eq!(ds.num_rows(), 2);
        assert_eq!(ds.num_columns(), 2);
        assert_eq!(ds.column_values(1), vec![2.0, 4.0]);
        assert_eq!(ds.row_identifier(1), "1");
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = TabularDataset::new(cols(&["a", "b"]), vec![vec![1.0]]);
        assert!(matches!(result, Err(AnalysisError::ShapeMismatch(_))));
    }

    #[test]
    fn test_row_labels() {
        let ds = TabularDataset::new(cols(&["a"]), vec![vec![1.0], vec![2.0]])
            .unwrap()
            .with_row_labels(vec!["FY2023".into(), "FY2024".into()])
            .unwrap();
        assert_eq!(ds.row_identifier(0), "FY2023");

        let bad = TabularDataset::new(cols(&["a"]), vec![vec![1.0]])
            .unwrap()
            .with_row_labels(vec![]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_empty_dataset() {
        let ds = TabularDataset::new(cols(&["a"]), vec![]).unwrap();
        assert!(ds.is_empty());
    }
}
