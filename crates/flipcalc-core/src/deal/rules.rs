use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{percent_of, percent_ratio, Money, Percent};

/// Purchase plus rehab should not exceed this share of ARV.
pub const SEVENTY_PERCENT_RULE: Percent = dec!(70);

/// Outcome of the 70% rule heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeventyPercentRule {
    /// (purchase + rehab) / ARV × 100
    pub all_in_to_arv_pct: Percent,
    /// ARV × 70% − rehab
    pub max_allowable_offer: Money,
    pub passes: bool,
}

pub fn seventy_percent_rule(purchase_price: Money, rehab: Money, arv: Money) -> SeventyPercentRule {
    let all_in_to_arv_pct = percent_ratio(purchase_price + rehab, arv);
    SeventyPercentRule {
        all_in_to_arv_pct,
        max_allowable_offer: percent_of(arv, SEVENTY_PERCENT_RULE) - rehab,
        passes: arv > Decimal::ZERO && all_in_to_arv_pct <= SEVENTY_PERCENT_RULE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_deal_exceeds_rule() {
        // (250k + 45k) / 375k = 78.67%
        let rule = seventy_percent_rule(dec!(250000), dec!(45000), dec!(375000));
        assert!(!rule.passes);
        assert_eq!(rule.max_allowable_offer, dec!(217500));
        assert!((rule.all_in_to_arv_pct - dec!(78.67)).abs() < dec!(0.01));
    }

    #[test]
    fn test_exactly_seventy_passes() {
        let rule = seventy_percent_rule(dec!(50000), dec!(20000), dec!(100000));
        assert!(rule.passes);
        assert_eq!(rule.all_in_to_arv_pct, dec!(70));
    }

    #[test]
    fn test_zero_arv_never_passes() {
        assert!(!seventy_percent_rule(dec!(1), dec!(0), Decimal::ZERO).passes);
    }
}
