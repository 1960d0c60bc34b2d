//! # Financial Statement Analyzer
//!
//! The deterministic numeric core of a financial statement analysis
//! assistant. An external LLM layer extracts a structured
//! [`FinancialStatementRecord`] from uploaded documents (the JSON schema
//! for that extraction is exported by this crate); this crate then
//! computes the ratio set, scans for rule-based red flags and detects
//! statistical anomalies in tabular figures.
//!
//! ## Core Concepts
//!
//! - **Statement record**: typed extraction result where every numeric
//!   field is optional; absence is normal data, not an error
//! - **Ratio report**: ordered ratio set with explicit zero-denominator
//!   policies ("infinite", zero, or "not applicable")
//! - **Red flags**: rule-ordered risk findings with Low/Medium/High severity
//! - **Anomaly scans**: a per-column z-score pass and a reconstruction-error
//!   pass backed by persisted model artifacts
//!
//! ## Example
//!
//! ```rust
//! use financial_statement_analyzer::*;
//!
//! let record = FinancialStatementRecord {
//!     balance_sheet: BalanceSheet {
//!         current_assets: Some(50_000.0),
//!         current_liabilities: Some(100_000.0),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! let report = StatementAnalyzer::analyze(record);
//! assert!(report.red_flags.has_concerns);
//! ```

pub mod anomaly;
pub mod dataset;
pub mod error;
pub mod interpret;
pub mod ratios;
pub mod red_flags;
pub mod report;
pub mod schema;

pub use anomaly::reconstruction::{
    detect_reconstruction_anomalies, DEFAULT_MODEL_ID, DEFAULT_THRESHOLD_MULTIPLIER,
    RECONSTRUCTION_FEATURE,
};
pub use anomaly::store::{ArtifactStore, FsArtifactStore, MemoryArtifactStore, ModelCache};
pub use anomaly::zscore::{detect_column_anomalies, DEFAULT_SENSITIVITY};
pub use anomaly::{AnomalyRecord, AnomalyScan};
pub use dataset::TabularDataset;
pub use error::{AnalysisError, Result};
pub use interpret::{interpret, RatioTier};
pub use ratios::{compute_ratios, RatioCategory, RatioReport, RatioResult, RatioValue};
pub use red_flags::{detect_red_flags, RedFlag, RedFlagReport, Severity};
pub use report::AnalysisReport;
pub use schema::{BalanceSheet, CashFlowStatement, FinancialStatementRecord, IncomeStatement};

use log::{debug, info};

pub struct StatementAnalyzer;

impl StatementAnalyzer {
    /// Run the full deterministic pipeline for one statement record:
    /// ratios, red flags and tier interpretation, assembled into the
    /// report payload for the external renderer.
    pub fn analyze(record: FinancialStatementRecord) -> AnalysisReport {
        info!(
            "Analyzing statement record for {}",
            record.company_name.as_deref().unwrap_or("unnamed company")
        );

        let ratios = compute_ratios(&record);
        let red_flags = detect_red_flags(&record, &ratios);

        debug!(
            "{} ratios computed, {} red flags ({} critical)",
            ratios.ratios.len(),
            red_flags.red_flags.len(),
            red_flags
                .red_flags
                .iter()
                .filter(|f| f.severity == Severity::High)
                .count()
        );

        AnalysisReport::new(record, ratios, red_flags)
    }
}
