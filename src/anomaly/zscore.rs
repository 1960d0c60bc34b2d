//! Per-column z-score scan.

use log::debug;

use super::{mean, std_dev, AnomalyRecord, AnomalyScan};
use crate::dataset::TabularDataset;

/// Default multiplier applied to the 2-sigma base threshold.
pub const DEFAULT_SENSITIVITY: f64 = 1.0;

/// Scan every numeric column independently: a cell is flagged when its
/// absolute deviation from the column mean reaches
/// `sensitivity * 2 * sigma`. Columns with zero variance cannot produce
/// anomalies and are skipped outright.
///
/// Deterministic and idempotent: the same dataset and sensitivity always
/// yield the same scan.
pub fn detect_column_anomalies(dataset: &TabularDataset, sensitivity: f64) -> AnomalyScan {
    if dataset.is_empty() {
        return AnomalyScan::default();
    }

    let mut anomalies = Vec::new();

    for (col_idx, column) in dataset.columns().iter().enumerate() {
        let values = dataset.column_values(col_idx);
        let mu = mean(&values);
        let sigma = std_dev(&values, mu);

        if sigma == 0.0 {
            debug!("column '{}' is constant, skipping", column);
            continue;
        }

        let threshold = sensitivity * 2.0 * sigma;

        for (row_idx, &value) in values.iter().enumerate() {
            let deviation = value - mu;
            if deviation.abs() >= threshold {
                anomalies.push(AnomalyRecord {
                    row_identifier: dataset.row_identifier(row_idx),
                    column_or_feature: column.clone(),
                    observed_value: value,
                    baseline_mean: mu,
                    deviation,
                    confidence: confidence(deviation.abs(), sigma),
                });
            }
        }
    }

    AnomalyScan::from_records(anomalies)
}

/// `|value - mean| / (3 sigma)`, clamped to [0, 1]. The zero-sigma guards
/// are unreachable from the scan above but keep the function total.
fn confidence(abs_deviation: f64, sigma: f64) -> f64 {
    if sigma == 0.0 {
        return if abs_deviation == 0.0 { 0.0 } else { 1.0 };
    }
    (abs_deviation / (3.0 * sigma)).min(1.0)
}
