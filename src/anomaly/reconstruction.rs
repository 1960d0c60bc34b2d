//! Reconstruction-error anomaly scan.
//!
//! Rows are standardized, pushed through the cached autoencoder and scored
//! by mean squared reconstruction error. The batch threshold is
//! `mean(errors) + threshold_multiplier * std(errors)`. With freshly
//! initialized (untrained) parameters the errors are meaningless; the
//! contract here is the threshold arithmetic and row bookkeeping, not
//! model quality.

use log::debug;

use super::store::ModelCache;
use super::{mean, std_dev, AnomalyRecord, AnomalyScan};
use crate::dataset::TabularDataset;
use crate::error::Result;

pub const DEFAULT_THRESHOLD_MULTIPLIER: f64 = 1.0;

/// Feature name attached to reconstruction anomaly records.
pub const RECONSTRUCTION_FEATURE: &str = "reconstruction_error";

/// Artifact id for the default model/scaler pair.
pub const DEFAULT_MODEL_ID: &str = "vae_financial";

/// Score every row of `dataset` against the cached reconstruction model.
///
/// Errors only on structural problems: corrupt persisted artifacts or a
/// dataset whose width disagrees with them. An empty dataset scans clean.
pub fn detect_reconstruction_anomalies(
    dataset: &TabularDataset,
    threshold_multiplier: f64,
    cache: &ModelCache,
) -> Result<AnomalyScan> {
    if dataset.is_empty() {
        return Ok(AnomalyScan::default());
    }

    let loaded = cache.get_or_init(DEFAULT_MODEL_ID, dataset.num_columns(), dataset.rows())?;

    let errors: Vec<f64> = dataset
        .rows()
        .iter()
        .map(|row| {
            let standardized = loaded.scaler.transform(row);
            loaded.model.reconstruction_error(&standardized)
        })
        .collect();

    let error_mean = mean(&errors);
    let error_std = std_dev(&errors, error_mean);
    let threshold = error_mean + threshold_multiplier * error_std;

    debug!(
        "reconstruction scan: {} rows, mean error {:.6}, threshold {:.6}",
        errors.len(),
        error_mean,
        threshold
    );

    let anomalies = errors
        .iter()
        .enumerate()
        .filter(|(_, &err)| err > threshold)
        .map(|(row_idx, &err)| AnomalyRecord {
            row_identifier: dataset.row_identifier(row_idx),
            column_or_feature: RECONSTRUCTION_FEATURE.to_string(),
            observed_value: err,
            baseline_mean: error_mean,
            deviation: err - error_mean,
            confidence: confidence(err - error_mean, error_std),
        })
        .collect();

    Ok(AnomalyScan::from_records(anomalies))
}

fn confidence(deviation: f64, error_std: f64) -> f64 {
    if error_std == 0.0 {
        return if deviation == 0.0 { 0.0 } else { 1.0 };
    }
    (deviation / (3.0 * error_std)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::store::MemoryArtifactStore;
    use crate::dataset::TabularDataset;

    fn memory_cache() -> ModelCache {
        ModelCache::new(Box::new(MemoryArtifactStore::new()))
    }

    fn dataset(rows: Vec<Vec<f64>>) -> TabularDataset {
        let width = rows.first().map(|r| r.len()).unwrap_or(1);
        let columns = (0..width).map(|i| format!("f{i}")).collect();
        TabularDataset::new(columns, rows).unwrap()
    }

    #[test]
    fn test_empty_dataset_scans_clean() {
        let ds = TabularDataset::new(vec!["a".into()], vec![]).unwrap();
        let scan =
            detect_reconstruction_anomalies(&ds, DEFAULT_THRESHOLD_MULTIPLIER, &memory_cache())
                .unwrap();
        assert_eq!(scan.num_anomalies, 0);
    }

    #[test]
    fn test_scan_is_deterministic_with_cached_model() {
        let cache = memory_cache();
        let ds = dataset(vec![
            vec![1.0, 2.0],
            vec![1.1, 2.1],
            vec![0.9, 1.9],
            vec![8.0, -5.0],
        ]);

        let first = detect_reconstruction_anomalies(&ds, 1.0, &cache).unwrap();
        let second = detect_reconstruction_anomalies(&ds, 1.0, &cache).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_threshold_bookkeeping() {
        let cache = memory_cache();
        let ds = dataset(vec![
            vec![1.0, 2.0],
            vec![1.2, 2.2],
            vec![0.8, 1.8],
            vec![1.1, 1.9],
            vec![50.0, -40.0],
        ]);

        let scan = detect_reconstruction_anomalies(&ds, 1.0, &cache).unwrap();
        assert_eq!(scan.num_anomalies, scan.anomalies.len());
        for rec in &scan.anomalies {
            assert_eq!(rec.column_or_feature, RECONSTRUCTION_FEATURE);
            assert!(rec.observed_value > rec.baseline_mean);
            assert!(rec.deviation > 0.0);
            assert!(rec.confidence >= 0.0 && rec.confidence <= 1.0);
        }
    }

    #[test]
    fn test_higher_multiplier_flags_no_more_rows() {
        let cache = memory_cache();
        let ds = dataset(vec![
            vec![1.0],
            vec![1.5],
            vec![0.5],
            vec![1.2],
            vec![30.0],
            vec![0.9],
        ]);

        let loose = detect_reconstruction_anomalies(&ds, 0.5, &cache).unwrap();
        let strict = detect_reconstruction_anomalies(&ds, 3.0, &cache).unwrap();
        assert!(strict.num_anomalies <= loose.num_anomalies);
    }

    #[test]
    fn test_row_labels_carried_through() {
        let cache = memory_cache();
        let ds = dataset(vec![vec![1.0], vec![1.0], vec![1.0], vec![100.0]])
            .with_row_labels(vec![
                "q1".into(),
                "q2".into(),
                "q3".into(),
                "q4".into(),
            ])
            .unwrap();

        let scan = detect_reconstruction_anomalies(&ds, 0.5, &cache).unwrap();
        for rec in &scan.anomalies {
            assert!(["q1", "q2", "q3", "q4"].contains(&rec.row_identifier.as_str()));
        }
    }
}
