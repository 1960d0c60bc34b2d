//! Qualitative tiers for ratio values, used by the report layer.
//!
//! Each ratio gets an explicit ordered threshold table: the first entry
//! whose bound the value reaches wins. Ratios without a table (growth
//! percentages, pass-throughs) have no tier.

use serde::{Deserialize, Serialize};

use crate::ratios::RatioValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatioTier {
    Excellent,
    Good,
    Average,
    Poor,
}

/// Descending thresholds; values below the last bound fall to `Poor`.
/// `invert` marks ratios where lower is better (leverage).
struct TierTable {
    name: &'static str,
    invert: bool,
    bounds: [(f64, RatioTier); 3],
}

const TABLES: &[TierTable] = &[
    TierTable {
        name: "Current Ratio",
        invert: false,
        bounds: [
            (2.0, RatioTier::Excellent),
            (1.5, RatioTier::Good),
            (1.0, RatioTier::Average),
        ],
    },
    TierTable {
        name: "Cash Ratio",
        invert: false,
        bounds: [
            (1.0, RatioTier::Excellent),
            (0.5, RatioTier::Good),
            (0.2, RatioTier::Average),
        ],
    },
    TierTable {
        name: "Gross Margin",
        invert: false,
        bounds: [
            (0.4, RatioTier::Excellent),
            (0.25, RatioTier::Good),
            (0.1, RatioTier::Average),
        ],
    },
    TierTable {
        name: "Operating Margin",
        invert: false,
        bounds: [
            (0.2, RatioTier::Excellent),
            (0.1, RatioTier::Good),
            (0.05, RatioTier::Average),
        ],
    },
    TierTable {
        name: "Return on Assets",
        invert: false,
        bounds: [
            (0.1, RatioTier::Excellent),
            (0.05, RatioTier::Good),
            (0.02, RatioTier::Average),
        ],
    },
    TierTable {
        name: "Return on Equity",
        invert: false,
        bounds: [
            (0.2, RatioTier::Excellent),
            (0.15, RatioTier::Good),
            (0.1, RatioTier::Average),
        ],
    },
    TierTable {
        name: "Interest Coverage",
        invert: false,
        bounds: [
            (5.0, RatioTier::Excellent),
            (3.0, RatioTier::Good),
            (1.5, RatioTier::Average),
        ],
    },
    TierTable {
        name: "Debt-to-Equity",
        invert: true,
        bounds: [
            (0.5, RatioTier::Excellent),
            (1.0, RatioTier::Good),
            (2.0, RatioTier::Average),
        ],
    },
    TierTable {
        name: "Debt Ratio",
        invert: true,
        bounds: [
            (0.3, RatioTier::Excellent),
            (0.5, RatioTier::Good),
            (0.7, RatioTier::Average),
        ],
    },
];

/// Tier for a named ratio, `None` when the ratio has no table or the
/// value is a sentinel. An `Infinite` coverage-style ratio is the best
/// tier for normal ratios and the worst for inverted ones.
pub fn interpret(ratio_name: &str, value: &RatioValue) -> Option<RatioTier> {
    let table = TABLES.iter().find(|t| t.name == ratio_name)?;

    let v = match value {
        RatioValue::Value(v) => *v,
        RatioValue::Infinite => {
            return Some(if table.invert {
                RatioTier::Poor
            } else {
                RatioTier::Excellent
            })
        }
        RatioValue::NotApplicable => return None,
    };

    if table.invert {
        for (bound, tier) in &table.bounds {
            if v <= *bound {
                return Some(*tier);
            }
        }
    } else {
        for (bound, tier) in &table.bounds {
            if v >= *bound {
                return Some(*tier);
            }
        }
    }
    Some(RatioTier::Poor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_ratio_tiers() {
        assert_eq!(
            interpret("Current Ratio", &RatioValue::Value(2.5)),
            Some(RatioTier::Excellent)
        );
        assert_eq!(
            interpret("Current Ratio", &RatioValue::Value(1.6)),
            Some(RatioTier::Good)
        );
        assert_eq!(
            interpret("Current Ratio", &RatioValue::Value(1.0)),
            Some(RatioTier::Average)
        );
        assert_eq!(
            interpret("Current Ratio", &RatioValue::Value(0.5)),
            Some(RatioTier::Poor)
        );
    }

    #[test]
    fn test_inverted_table() {
        assert_eq!(
            interpret("Debt Ratio", &RatioValue::Value(0.2)),
            Some(RatioTier::Excellent)
        );
        assert_eq!(
            interpret("Debt Ratio", &RatioValue::Value(0.9)),
            Some(RatioTier::Poor)
        );
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(interpret("Current Ratio", &RatioValue::NotApplicable), None);
        assert_eq!(
            interpret("Current Ratio", &RatioValue::Infinite),
            Some(RatioTier::Excellent)
        );
        assert_eq!(
            interpret("Debt-to-Equity", &RatioValue::Infinite),
            Some(RatioTier::Poor)
        );
    }

    #[test]
    fn test_unknown_ratio_has_no_tier() {
        assert_eq!(interpret("Sales Growth %", &RatioValue::Value(10.0)), None);
    }

    #[test]
    fn test_tables_are_monotone() {
        for table in TABLES {
            let bounds: Vec<f64> = table.bounds.iter().map(|(b, _)| *b).collect();
            for pair in bounds.windows(2) {
                if table.invert {
                    assert!(pair[0] < pair[1], "{} bounds ascending", table.name);
                } else {
                    assert!(pair[0] > pair[1], "{} bounds descending", table.name);
                }
            }
        }
    }
}
