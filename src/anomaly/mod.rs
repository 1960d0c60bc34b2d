//! Statistical anomaly detection over tabular numeric data.
//!
//! Two independent strategies share the record types below:
//! a per-column z-score scan ([`zscore`]) and a reconstruction-error scan
//! backed by a persisted autoencoder ([`reconstruction`]).

pub mod model;
pub mod reconstruction;
pub mod store;
pub mod zscore;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub row_identifier: String,
    pub column_or_feature: String,
    pub observed_value: f64,
    pub baseline_mean: f64,
    /// Signed deviation of the observation from the baseline mean.
    pub deviation: f64,
    /// Clamped to [0, 1].
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyScan {
    pub num_anomalies: usize,
    pub anomalies: Vec<AnomalyRecord>,
}

impl AnomalyScan {
    pub fn from_records(anomalies: Vec<AnomalyRecord>) -> Self {
        Self {
            num_anomalies: anomalies.len(),
            anomalies,
        }
    }
}

// ---------------------------------------------------------------------------
// Statistics helpers
// ---------------------------------------------------------------------------

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub(crate) fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
