//! Rule-based red-flag detection.
//!
//! Rules run in a fixed order and that order is also the report order.
//! Every rule is independently guarded: if an operand it needs is absent
//! the rule is skipped silently. Flags are never deduplicated here.

use serde::{Deserialize, Serialize};

use crate::ratios::RatioReport;
use crate::schema::FinancialStatementRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlag {
    pub category: String,
    pub issue: String,
    pub details: String,
    pub severity: Severity,
    pub recommendation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedFlagReport {
    pub red_flags: Vec<RedFlag>,
    pub has_critical_issues: bool,
    pub has_concerns: bool,
}

struct FlagCollector {
    flags: Vec<RedFlag>,
}

impl FlagCollector {
    fn push(
        &mut self,
        category: &str,
        issue: &str,
        details: String,
        severity: Severity,
        recommendation: &str,
    ) {
        self.flags.push(RedFlag {
            category: category.to_string(),
            issue: issue.to_string(),
            details,
            severity,
            recommendation: recommendation.to_string(),
        });
    }
}

/// Scan a statement record plus its computed ratios for risk conditions.
pub fn detect_red_flags(
    record: &FinancialStatementRecord,
    ratios: &RatioReport,
) -> RedFlagReport {
    let inc = &record.income_statement;
    let bal = &record.balance_sheet;
    let cf = &record.cash_flow;

    let mut out = FlagCollector { flags: Vec::new() };

    // --- Ratio-driven pass ---

    // 1. Unusually fast revenue growth
    if let Some(growth) = ratios.value_of("Sales Growth %") {
        if growth > 50.0 {
            out.push(
                "Revenue",
                "Unusually high revenue growth",
                format!("Year-over-year sales growth of {:.1}% exceeds 50%", growth),
                Severity::Medium,
                "Verify revenue recognition policies and one-off items behind the spike",
            );
        }
    }

    // 2. Earnings running far ahead of operating cash
    if let (Some(net_income), Some(ocf)) = (inc.net_income, cf.operating_cash_flow) {
        if ocf != 0.0 && net_income > 2.0 * ocf {
            out.push(
                "Cash Flow",
                "Net income far exceeds operating cash flow",
                format!(
                    "Net income {:.0} is more than twice operating cash flow {:.0}",
                    net_income, ocf
                ),
                Severity::High,
                "Investigate accruals and working-capital movements that inflate earnings",
            );
        }
    }

    // 3. Thin interest coverage
    if let Some(coverage) = ratios.value_of("Interest Coverage") {
        if coverage < 2.0 {
            let severity = if coverage < 1.0 {
                Severity::High
            } else {
                Severity::Medium
            };
            out.push(
                "Solvency",
                "Weak interest coverage",
                format!("Operating income covers interest only {:.2}x", coverage),
                severity,
                "Review debt service capacity and refinancing options",
            );
        }
    }

    // 4. Working capital deficiency
    if let Some(current_ratio) = ratios.value_of("Current Ratio") {
        if current_ratio < 1.0 {
            let severity = if current_ratio < 0.8 {
                Severity::High
            } else {
                Severity::Medium
            };
            out.push(
                "Liquidity",
                "Working capital deficiency",
                format!(
                    "Current ratio of {:.2} means current liabilities exceed current assets",
                    current_ratio
                ),
                severity,
                "Assess short-term funding needs and payment obligations falling due",
            );
        }
    }

    // --- Raw-figure pass, independent of the ratio report ---

    // 5. Net income above operating income despite interest costs
    if let (Some(net_income), Some(op_income), Some(interest)) =
        (inc.net_income, inc.operating_income, inc.interest_expenses)
    {
        if net_income > op_income && interest > 0.0 {
            out.push(
                "Income Anomaly",
                "Net income exceeds operating income",
                format!(
                    "Net income {:.0} is above operating income {:.0} while interest expenses of {:.0} were paid",
                    net_income, op_income, interest
                ),
                Severity::Medium,
                "Identify the non-operating gains bridging the gap and check if they recur",
            );
        }
    }

    // 6. High leverage
    if let (Some(liabilities), Some(assets)) = (bal.total_liabilities, bal.total_assets) {
        if assets != 0.0 {
            let debt_ratio = liabilities / assets;
            if debt_ratio > 0.7 {
                let severity = if debt_ratio > 0.8 {
                    Severity::High
                } else {
                    Severity::Medium
                };
                out.push(
                    "High Leverage",
                    "Debt finances most of the asset base",
                    format!("Liabilities are {:.0}% of total assets", debt_ratio * 100.0),
                    severity,
                    "Review covenant headroom and the maturity profile of the debt",
                );
            }
        }
    }

    // 7. Negative operating cash against positive earnings
    if let (Some(ocf), Some(net_income)) = (cf.operating_cash_flow, inc.net_income) {
        if ocf < 0.0 && net_income > 0.0 {
            out.push(
                "Cash Flow Discrepancy",
                "Profitable on paper, burning cash in operations",
                format!(
                    "Operating cash flow {:.0} is negative while net income is {:.0}",
                    ocf, net_income
                ),
                Severity::High,
                "Reconcile earnings to cash and examine receivables and inventory buildup",
            );
        }
    }

    // 8. Weak cash conversion
    if let (Some(ocf), Some(net_income)) = (cf.operating_cash_flow, inc.net_income) {
        if ocf > 0.0 && net_income > 0.0 && ocf < 0.5 * net_income {
            out.push(
                "Cash Flow Discrepancy",
                "Low cash conversion of earnings",
                format!(
                    "Operating cash flow {:.0} is below half of net income {:.0}",
                    ocf, net_income
                ),
                Severity::Medium,
                "Check the quality of earnings and the aging of receivables",
            );
        }
    }

    let has_critical_issues = out.flags.iter().any(|f| f.severity == Severity::High);
    let has_concerns = !out.flags.is_empty();

    RedFlagReport {
        red_flags: out.flags,
        has_critical_issues,
        has_concerns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratios::compute_ratios;
    use crate::schema::{BalanceSheet, CashFlowStatement, IncomeStatement};

    fn scan(record: &FinancialStatementRecord) -> RedFlagReport {
        let ratios = compute_ratios(record);
        detect_red_flags(record, &ratios)
    }

    #[test]
    fn test_empty_record_has_no_flags() {
        let report = scan(&FinancialStatementRecord::default());
        assert!(report.red_flags.is_empty());
        assert!(!report.has_critical_issues);
        assert!(!report.has_concerns);
    }

    #[test]
    fn test_working_capital_deficiency_worked_example() {
        let record = FinancialStatementRecord {
            balance_sheet: BalanceSheet {
                current_assets: Some(50.0),
                current_liabilities: Some(100.0),
                ..Default::default()
            },
            ..Default::default()
        };

        let report = scan(&record);
        let flag = report
            .red_flags
            .iter()
            .find(|f| f.category == "Liquidity")
            .expect("liquidity flag");
        assert_eq!(flag.issue, "Working capital deficiency");
        assert_eq!(flag.severity, Severity::High); // 0.5 < 0.8
        assert!(report.has_critical_issues);
    }

    #[test]
    fn test_current_ratio_between_bounds_is_medium() {
        let record = FinancialStatementRecord {
            balance_sheet: BalanceSheet {
                current_assets: Some(90.0),
                current_liabilities: Some(100.0),
                ..Default::default()
            },
            ..Default::default()
        };

        let report = scan(&record);
        let flag = &report.red_flags[0];
        assert_eq!(flag.severity, Severity::Medium);
        assert!(!report.has_critical_issues);
        assert!(report.has_concerns);
    }

    #[test]
    fn test_income_anomaly_worked_example() {
        let record = FinancialStatementRecord {
            income_statement: IncomeStatement {
                net_income: Some(100.0),
                operating_income: Some(80.0),
                interest_expenses: Some(10.0),
                ..Default::default()
            },
            ..Default::default()
        };

        let report = scan(&record);
        let flag = report
            .red_flags
            .iter()
            .find(|f| f.category == "Income Anomaly")
            .expect("income anomaly flag");
        assert_eq!(flag.severity, Severity::Medium);
    }

    #[test]
    fn test_revenue_spike_triggers_growth_flag() {
        let record = FinancialStatementRecord {
            income_statement: IncomeStatement {
                net_sales: Some(160.0),
                previous_year_sales: Some(100.0),
                ..Default::default()
            },
            ..Default::default()
        };

        let report = scan(&record);
        assert_eq!(report.red_flags.len(), 1);
        assert_eq!(report.red_flags[0].category, "Revenue");
        assert_eq!(report.red_flags[0].severity, Severity::Medium);
    }

    #[test]
    fn test_rule_order_is_stable() {
        // Triggers rules 1 (revenue growth), 3 (interest coverage) and 6 (leverage)
        let record = FinancialStatementRecord {
            income_statement: IncomeStatement {
                net_sales: Some(200.0),
                previous_year_sales: Some(100.0),
                operating_income: Some(15.0),
                interest_expenses: Some(10.0),
                ..Default::default()
            },
            balance_sheet: BalanceSheet {
                total_assets: Some(100.0),
                total_liabilities: Some(75.0),
                ..Default::default()
            },
            ..Default::default()
        };

        let report = scan(&record);
        let categories: Vec<&str> = report.red_flags.iter().map(|f| f.category.as_str()).collect();
        assert_eq!(categories, vec!["Revenue", "Solvency", "High Leverage"]);
    }

    #[test]
    fn test_leverage_thresholds() {
        let mut record = FinancialStatementRecord::default();
        record.balance_sheet.total_assets = Some(100.0);

        record.balance_sheet.total_liabilities = Some(75.0);
        let report = scan(&record);
        assert_eq!(report.red_flags[0].severity, Severity::Medium);

        record.balance_sheet.total_liabilities = Some(85.0);
        let report = scan(&record);
        assert_eq!(report.red_flags[0].severity, Severity::High);
    }

    #[test]
    fn test_cash_flow_discrepancy_rules() {
        // Rule 7: negative OCF with positive net income
        let mut record = FinancialStatementRecord::default();
        record.income_statement.net_income = Some(50.0);
        record.cash_flow.operating_cash_flow = Some(-10.0);
        let report = scan(&record);
        assert_eq!(report.red_flags.len(), 1);
        assert_eq!(report.red_flags[0].severity, Severity::High);

        // Rule 8: positive but weak OCF (rule 2 fires alongside, since
        // OCF below half of net income is the same boundary)
        record.cash_flow.operating_cash_flow = Some(20.0);
        let report = scan(&record);
        let weak = report
            .red_flags
            .iter()
            .find(|f| f.category == "Cash Flow Discrepancy")
            .expect("weak conversion flag");
        assert_eq!(weak.severity, Severity::Medium);
    }

    #[test]
    fn test_net_income_twice_cash_flow() {
        let mut record = FinancialStatementRecord::default();
        record.income_statement.net_income = Some(100.0);
        record.cash_flow.operating_cash_flow = Some(40.0);

        let report = scan(&record);
        let categories: Vec<&str> = report.red_flags.iter().map(|f| f.category.as_str()).collect();
        // Rule 2 fires first, then rule 8 (weak conversion) also applies;
        // the detector never deduplicates.
        assert_eq!(categories, vec!["Cash Flow", "Cash Flow Discrepancy"]);
        assert!(report.has_critical_issues);
    }

    #[test]
    fn test_has_critical_iff_any_high() {
        let mut record = FinancialStatementRecord::default();
        record.balance_sheet.current_assets = Some(90.0);
        record.balance_sheet.current_liabilities = Some(100.0);
        let report = scan(&record);
        assert!(report.red_flags.iter().all(|f| f.severity != Severity::High));
        assert!(!report.has_critical_issues);

        record.balance_sheet.current_assets = Some(50.0);
        let report = scan(&record);
        assert!(report.red_flags.iter().any(|f| f.severity == Severity::High));
        assert!(report.has_critical_issues);
    }

    #[test]
    fn test_infinite_coverage_is_not_flagged() {
        // Interest coverage is Infinite when interest is zero; rule 3 only
        // looks at finite values.
        let mut record = FinancialStatementRecord::default();
        record.income_statement.operating_income = Some(10.0);
        record.income_statement.interest_expenses = Some(0.0);
        let report = scan(&record);
        assert!(report.red_flags.iter().all(|f| f.category != "Solvency"));
    }
}
