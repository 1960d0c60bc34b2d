//! Report payload handed to the external renderer (PDF or chat).
//!
//! The narrative sections are written by the external LLM layer; this
//! module only assembles the deterministic pieces next to them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::interpret::{interpret, RatioTier};
use crate::ratios::RatioReport;
use crate::red_flags::RedFlagReport;
use crate::schema::FinancialStatementRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub business_overview: Option<String>,
    #[serde(default)]
    pub key_findings: Option<String>,
    pub extracted_data: FinancialStatementRecord,
    pub calculated_ratios: RatioReport,
    pub red_flags: RedFlagReport,
    /// Qualitative tier per ratio, where a tier table exists.
    pub ratio_tiers: BTreeMap<String, RatioTier>,
}

impl AnalysisReport {
    pub fn new(
        record: FinancialStatementRecord,
        ratios: RatioReport,
        red_flags: RedFlagReport,
    ) -> Self {
        let ratio_tiers = ratios
            .ratios
            .iter()
            .filter_map(|r| interpret(&r.name, &r.value).map(|tier| (r.name.clone(), tier)))
            .collect();

        Self {
            business_overview: None,
            key_findings: None,
            extracted_data: record,
            calculated_ratios: ratios,
            red_flags,
            ratio_tiers,
        }
    }

    /// Attach the narrative sections produced by the external LLM layer.
    pub fn with_narrative(
        mut self,
        business_overview: impl Into<String>,
        key_findings: impl Into<String>,
    ) -> Self {
        self.business_overview = Some(business_overview.into());
        self.key_findings = Some(key_findings.into());
        self
    }
}
