//! Financial ratio computation.
//!
//! Each ratio carries one of three zero-denominator policies:
//!
//! - **Infinite**: a zero denominator legitimately means "boundless"
//!   (Current Ratio, Debt-to-Equity, Interest Coverage).
//! - **Zero**: margins, returns and turnovers report an undefined value
//!   as zero contribution.
//! - **Not applicable**: presence-gated ratios (growth and cash-flow
//!   ratios, Cash Ratio) degrade to a sentinel distinct from zero.
//!
//! Absent fields never raise; coerced ratios treat them as 0.0.

use serde::{Deserialize, Serialize};

use crate::schema::FinancialStatementRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RatioValue {
    Value(f64),
    Infinite,
    NotApplicable,
}

impl RatioValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RatioValue::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        !matches!(self, RatioValue::NotApplicable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatioCategory {
    Profitability,
    Liquidity,
    Solvency,
    Efficiency,
    Growth,
    CashFlow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioResult {
    pub name: String,
    pub category: RatioCategory,
    /// Operands actually used, absent inputs stay `None`.
    pub numerator: Option<f64>,
    pub denominator: Option<f64>,
    pub value: RatioValue,
}

/// Ordered collection of ratio results. Insertion order is category order
/// (Profitability, Liquidity, Solvency, Efficiency, Growth, Cash Flow) and
/// is stable across invocations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioReport {
    pub ratios: Vec<RatioResult>,
}

impl RatioReport {
    pub fn get(&self, name: &str) -> Option<&RatioResult> {
        self.ratios.iter().find(|r| r.name == name)
    }

    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|r| r.value.as_f64())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ratios.iter().map(|r| r.name.as_str())
    }

    fn push(
        &mut self,
        name: &str,
        category: RatioCategory,
        numerator: Option<f64>,
        denominator: Option<f64>,
        value: RatioValue,
    ) {
        self.ratios.push(RatioResult {
            name: name.to_string(),
            category,
            numerator,
            denominator,
            value,
        });
    }
}

/// Zero denominator reports `Infinite`.
fn ratio_or_infinite(numerator: f64, denominator: f64) -> RatioValue {
    if denominator == 0.0 {
        RatioValue::Infinite
    } else {
        RatioValue::Value(numerator / denominator)
    }
}

/// Zero denominator reports `Value(0.0)`.
fn ratio_or_zero(numerator: f64, denominator: f64) -> RatioValue {
    if denominator == 0.0 {
        RatioValue::Value(0.0)
    } else {
        RatioValue::Value(numerator / denominator)
    }
}

/// Both operands must be present and the denominator nonzero.
fn ratio_or_na(numerator: Option<f64>, denominator: Option<f64>) -> RatioValue {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => RatioValue::Value(n / d),
        _ => RatioValue::NotApplicable,
    }
}

/// Percentage growth from a previous-period figure, `NotApplicable` when
/// either operand is missing or the base period is zero.
fn growth_pct(current: Option<f64>, previous: Option<f64>) -> RatioValue {
    match (current, previous) {
        (Some(cur), Some(prev)) if prev != 0.0 => RatioValue::Value((cur - prev) / prev * 100.0),
        _ => RatioValue::NotApplicable,
    }
}

fn or_zero(field: Option<f64>) -> f64 {
    field.unwrap_or(0.0)
}

/// Compute the full ordered ratio set for one statement record.
///
/// Pure: identical input yields an identical report, including ordering.
pub fn compute_ratios(record: &FinancialStatementRecord) -> RatioReport {
    let inc = &record.income_statement;
    let bal = &record.balance_sheet;
    let cf = &record.cash_flow;

    let mut report = RatioReport::default();

    // Profitability
    report.push(
        "Gross Margin",
        RatioCategory::Profitability,
        inc.gross_profit,
        inc.net_sales,
        ratio_or_zero(or_zero(inc.gross_profit), or_zero(inc.net_sales)),
    );
    report.push(
        "Operating Margin",
        RatioCategory::Profitability,
        inc.operating_income,
        inc.net_sales,
        ratio_or_zero(or_zero(inc.operating_income), or_zero(inc.net_sales)),
    );
    report.push(
        "Return on Assets",
        RatioCategory::Profitability,
        inc.net_income,
        bal.total_assets,
        ratio_or_zero(or_zero(inc.net_income), or_zero(bal.total_assets)),
    );
    report.push(
        "Return on Equity",
        RatioCategory::Profitability,
        inc.net_income,
        bal.shareholders_equity,
        ratio_or_zero(or_zero(inc.net_income), or_zero(bal.shareholders_equity)),
    );

    // Liquidity
    report.push(
        "Current Ratio",
        RatioCategory::Liquidity,
        bal.current_assets,
        bal.current_liabilities,
        ratio_or_infinite(or_zero(bal.current_assets), or_zero(bal.current_liabilities)),
    );
    report.push(
        "Cash Ratio",
        RatioCategory::Liquidity,
        bal.cash_and_equivalents,
        bal.current_liabilities,
        ratio_or_na(bal.cash_and_equivalents, bal.current_liabilities),
    );

    // Solvency
    report.push(
        "Debt-to-Equity",
        RatioCategory::Solvency,
        bal.total_liabilities,
        bal.shareholders_equity,
        ratio_or_infinite(or_zero(bal.total_liabilities), or_zero(bal.shareholders_equity)),
    );
    report.push(
        "Debt Ratio",
        RatioCategory::Solvency,
        bal.total_liabilities,
        bal.total_assets,
        ratio_or_zero(or_zero(bal.total_liabilities), or_zero(bal.total_assets)),
    );
    report.push(
        "Interest Coverage",
        RatioCategory::Solvency,
        inc.operating_income,
        inc.interest_expenses,
        ratio_or_infinite(or_zero(inc.operating_income), or_zero(inc.interest_expenses)),
    );

    // Efficiency. Average total assets and net credit sales default to the
    // period-end figures when not separately supplied.
    report.push(
        "Asset Turnover",
        RatioCategory::Efficiency,
        inc.net_sales,
        bal.total_assets,
        ratio_or_zero(or_zero(inc.net_sales), or_zero(bal.total_assets)),
    );
    report.push(
        "Inventory Turnover",
        RatioCategory::Efficiency,
        inc.cost_of_goods_sold,
        bal.average_inventory,
        ratio_or_zero(or_zero(inc.cost_of_goods_sold), or_zero(bal.average_inventory)),
    );
    report.push(
        "Receivables Turnover",
        RatioCategory::Efficiency,
        inc.net_sales,
        bal.average_accounts_receivable,
        ratio_or_zero(
            or_zero(inc.net_sales),
            or_zero(bal.average_accounts_receivable),
        ),
    );

    // Growth
    report.push(
        "Sales Growth %",
        RatioCategory::Growth,
        inc.net_sales,
        inc.previous_year_sales,
        growth_pct(inc.net_sales, inc.previous_year_sales),
    );
    report.push(
        "Profit Growth %",
        RatioCategory::Growth,
        inc.net_income,
        inc.previous_year_net_income,
        growth_pct(inc.net_income, inc.previous_year_net_income),
    );
    report.push(
        "Asset Growth %",
        RatioCategory::Growth,
        bal.total_assets,
        bal.previous_year_total_assets,
        growth_pct(bal.total_assets, bal.previous_year_total_assets),
    );

    // Cash flow
    report.push(
        "Cash-Flow-to-Net-Income",
        RatioCategory::CashFlow,
        cf.operating_cash_flow,
        inc.net_income,
        ratio_or_na(cf.operating_cash_flow, inc.net_income),
    );
    let fcf = free_cash_flow(cf.free_cash_flow, cf.operating_cash_flow, cf.capital_expenditures);
    report.push(
        "Free Cash Flow",
        RatioCategory::CashFlow,
        cf.operating_cash_flow,
        cf.capital_expenditures,
        fcf,
    );

    report
}

fn free_cash_flow(reported: Option<f64>, ocf: Option<f64>, capex: Option<f64>) -> RatioValue {
    match (reported, ocf, capex) {
        (Some(fcf), _, _) => RatioValue::Value(fcf),
        (None, Some(ocf), Some(capex)) => RatioValue::Value(ocf - capex),
        _ => RatioValue::NotApplicable,
    }
}
