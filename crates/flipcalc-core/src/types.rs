use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages as entered by an investor (10 = 10%). Never as fractions.
pub type Percent = Decimal;

/// Rates expressed as decimals (0.10 = 10%).
pub type Rate = Decimal;

/// `amount` × `pct` / 100
pub fn percent_of(amount: Money, pct: Percent) -> Money {
    amount * pct / dec!(100)
}

/// `numerator` / `denominator` × 100, or zero when the denominator is zero.
pub fn percent_ratio(numerator: Decimal, denominator: Decimal) -> Percent {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator * dec!(100)
    }
}

/// A return that may be unbounded because no capital is at risk.
///
/// Serialises as `{"finite": "12.5"}` or `"uncapped"` so renderers never have
/// to format an infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnMetric {
    Finite(Percent),
    Uncapped,
}

impl ReturnMetric {
    /// Percentage return of `gain` on `invested`. A non-positive investment
    /// with a positive gain is uncapped; otherwise the gain is taken over a
    /// one-dollar floor so a loss still reads negative.
    pub fn on_capital(gain: Money, invested: Money) -> Self {
        if invested > Decimal::ZERO {
            ReturnMetric::Finite(gain / invested * dec!(100))
        } else if gain > Decimal::ZERO {
            ReturnMetric::Uncapped
        } else {
            ReturnMetric::Finite(gain * dec!(100))
        }
    }

    pub fn is_uncapped(&self) -> bool {
        matches!(self, ReturnMetric::Uncapped)
    }

    /// True when the return is at least `threshold` percent.
    pub fn at_least(&self, threshold: Percent) -> bool {
        match self {
            ReturnMetric::Finite(v) => *v >= threshold,
            ReturnMetric::Uncapped => true,
        }
    }

    pub fn finite(&self) -> Option<Percent> {
        match self {
            ReturnMetric::Finite(v) => Some(*v),
            ReturnMetric::Uncapped => None,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec!(250000), dec!(3)), dec!(7500));
    }

    #[test]
    fn test_percent_ratio_zero_denominator() {
        assert_eq!(percent_ratio(dec!(100), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_return_metric_uncapped_when_nothing_invested() {
        assert_eq!(
            ReturnMetric::on_capital(dec!(5000), Decimal::ZERO),
            ReturnMetric::Uncapped
        );
        assert_eq!(
            ReturnMetric::on_capital(Decimal::ZERO, Decimal::ZERO),
            ReturnMetric::Finite(Decimal::ZERO)
        );
        assert!(ReturnMetric::Uncapped.at_least(dec!(200)));
    }

    #[test]
    fn test_return_metric_loss_with_nothing_invested_is_negative() {
        let metric = ReturnMetric::on_capital(dec!(-1200), Decimal::ZERO);
        assert_eq!(metric, ReturnMetric::Finite(dec!(-120000)));
        assert!(!metric.at_least(Decimal::ZERO));
    }

    #[test]
    fn test_return_metric_serialises_tagged() {
        let json = serde_json::to_value(ReturnMetric::Uncapped).unwrap();
        assert_eq!(json, serde_json::json!("uncapped"));
        let json = serde_json::to_value(ReturnMetric::Finite(dec!(12.5))).unwrap();
        assert_eq!(json, serde_json::json!({"finite": "12.5"}));
    }
}
