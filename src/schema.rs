use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One reporting period of a company's statements, as extracted by the
/// external document-extraction step. Every numeric field is optional:
/// a missing value is normal and degrades the affected ratio to its
/// sentinel rather than raising an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FinancialStatementRecord {
    #[schemars(description = "Legal name of the company, as printed on the statements")]
    #[serde(default)]
    pub company_name: Option<String>,

    #[schemars(description = "Reporting period label, e.g. 'FY2024' or 'Q3 2024'")]
    #[serde(default)]
    pub reporting_period: Option<String>,

    #[schemars(description = "ISO currency code of the reported figures, e.g. 'USD'")]
    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub income_statement: IncomeStatement,

    #[serde(default)]
    pub balance_sheet: BalanceSheet,

    #[serde(default)]
    pub cash_flow: CashFlowStatement,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IncomeStatement {
    #[schemars(description = "Total revenue from sales of goods or services for the period")]
    pub net_sales: Option<f64>,

    #[schemars(description = "Direct costs attributable to goods sold (COGS)")]
    pub cost_of_goods_sold: Option<f64>,

    #[schemars(description = "Net sales minus cost of goods sold")]
    pub gross_profit: Option<f64>,

    #[schemars(description = "Operating expenses: salaries, rent, marketing, utilities")]
    pub operating_expenses: Option<f64>,

    #[schemars(description = "Earnings before interest and taxes (EBIT)")]
    pub operating_income: Option<f64>,

    #[schemars(description = "Interest paid on borrowings during the period")]
    pub interest_expenses: Option<f64>,

    #[schemars(description = "Profit after all expenses and taxes")]
    pub net_income: Option<f64>,

    #[schemars(description = "Net sales of the prior comparable period, if shown")]
    pub previous_year_sales: Option<f64>,

    #[schemars(description = "Net income of the prior comparable period, if shown")]
    pub previous_year_net_income: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BalanceSheet {
    #[schemars(description = "Cash plus short-term, highly liquid investments")]
    pub cash_and_equivalents: Option<f64>,

    #[schemars(description = "Assets expected to convert to cash within one year")]
    pub current_assets: Option<f64>,

    #[schemars(description = "Total of all assets")]
    pub total_assets: Option<f64>,

    #[schemars(description = "Obligations due within one year")]
    pub current_liabilities: Option<f64>,

    #[schemars(description = "Total of all liabilities")]
    pub total_liabilities: Option<f64>,

    #[schemars(description = "Owner's residual interest: share capital plus retained earnings")]
    pub shareholders_equity: Option<f64>,

    #[schemars(
        description = "Average inventory over the period; use the closing balance if only one figure is shown"
    )]
    pub average_inventory: Option<f64>,

    #[schemars(
        description = "Average accounts receivable over the period; use the closing balance if only one figure is shown"
    )]
    pub average_accounts_receivable: Option<f64>,

    #[schemars(description = "Total assets of the prior comparable period, if shown")]
    pub previous_year_total_assets: Option<f64>,

    #[schemars(description = "Total liabilities of the prior comparable period, if shown")]
    pub previous_year_total_liabilities: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CashFlowStatement {
    #[schemars(description = "Net cash generated by operating activities")]
    pub operating_cash_flow: Option<f64>,

    #[schemars(description = "Cash spent on property, plant and equipment")]
    pub capital_expenditures: Option<f64>,

    #[schemars(description = "Free cash flow, if the statement reports it directly")]
    pub free_cash_flow: Option<f64>,
}

impl FinancialStatementRecord {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(FinancialStatementRecord)
    }

    /// Pretty JSON schema for embedding in the extraction prompt, so the
    /// external LLM layer can be asked for structured output against it.
    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema_json = FinancialStatementRecord::schema_as_json().unwrap();
        assert!(schema_json.contains("income_statement"));
        assert!(schema_json.contains("balance_sheet"));
        assert!(schema_json.contains("cash_flow"));
        assert!(schema_json.contains("net_sales"));
    }

    #[test]
    fn test_null_fields_deserialize_as_absent() {
        let json = r#"{
            "company_name": "Test Corp",
            "income_statement": { "net_sales": 1000.0, "net_income": null },
            "balance_sheet": {},
            "cash_flow": {}
        }"#;

        let record: FinancialStatementRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.company_name.as_deref(), Some("Test Corp"));
        assert_eq!(record.income_statement.net_sales, Some(1000.0));
        assert_eq!(record.income_statement.net_income, None);
        assert_eq!(record.balance_sheet.total_assets, None);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let record: FinancialStatementRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.income_statement, IncomeStatement::default());
        assert_eq!(record.cash_flow.operating_cash_flow, None);
    }

    #[test]
    fn test_roundtrip() {
        let record = FinancialStatementRecord {
            company_name: Some("ACME Ltd".to_string()),
            reporting_period: Some("FY2024".to_string()),
            income_statement: IncomeStatement {
                net_sales: Some(500_000.0),
                net_income: Some(40_000.0),
                ..Default::default()
            },
            ..Default::default()
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: FinancialStatementRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
