use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::brrrr::{brrrr_model, BrrrrAssumptions};
use super::wholesale::{wholesale_model, WholesaleAssumptions};
use crate::deal::{compute_deal_economics, DealAssumptions};
use crate::types::*;
use crate::FlipCalcResult;

/// Months from rehab completion to a closed refinance.
pub const REFINANCE_SEASONING_MONTHS: u32 = 2;

/// Months to assign a wholesale contract.
pub const WHOLESALE_TIMEFRAME_MONTHS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStrategy {
    Flip,
    Brrrr,
    Wholesale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitComparisonInput {
    pub deal: DealAssumptions,
    pub brrrr: BrrrrAssumptions,
    pub wholesale: WholesaleAssumptions,
    /// Years of rental cash flow credited to the BRRRR exit
    pub hold_years: u32,
}

impl Default for ExitComparisonInput {
    fn default() -> Self {
        ExitComparisonInput {
            deal: DealAssumptions::default(),
            brrrr: BrrrrAssumptions::default(),
            wholesale: WholesaleAssumptions::default(),
            hold_years: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub strategy: ExitStrategy,
    pub profit: Money,
    pub cash_needed: Money,
    pub timeframe_months: u32,
    pub cash_on_cash: ReturnMetric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitComparisonOutput {
    pub strategies: Vec<StrategySummary>,
    pub best_profit: ExitStrategy,
    pub lowest_cash: ExitStrategy,
    pub fastest: ExitStrategy,
}

/// Leader under `better`; ties keep the earlier strategy.
fn pick(
    strategies: &[StrategySummary],
    better: impl Fn(&StrategySummary, &StrategySummary) -> bool,
) -> ExitStrategy {
    let mut best = &strategies[0];
    for s in &strategies[1..] {
        if better(s, best) {
            best = s;
        }
    }
    best.strategy
}

/// Compare flipping, refinancing to hold, and wholesaling the same deal.
pub fn compare_exit_strategies(
    input: &ExitComparisonInput,
) -> FlipCalcResult<ComputationOutput<ExitComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    log::debug!("exit comparison: hold {} years", input.hold_years);

    if !input.deal.is_evaluable() {
        warnings.push("Purchase price and ARV must both be greater than $0".into());
    }

    let results = compute_deal_economics(&input.deal);
    let brrrr = brrrr_model(&input.deal, &results, &input.brrrr);
    let wholesale = wholesale_model(&input.deal, &input.wholesale);

    let brrrr_profit =
        brrrr.annual_cash_flow * Decimal::from(input.hold_years) + brrrr.equity_position;
    if brrrr.annual_cash_flow < Decimal::ZERO {
        warnings.push("BRRRR exit has negative cash flow; profit relies on equity".into());
    }

    let strategies = vec![
        StrategySummary {
            strategy: ExitStrategy::Flip,
            profit: results.net_profit,
            cash_needed: results.total_cash_needed,
            timeframe_months: input.deal.holding_period_months,
            cash_on_cash: ReturnMetric::on_capital(results.net_profit, results.total_cash_needed),
        },
        StrategySummary {
            strategy: ExitStrategy::Brrrr,
            profit: brrrr_profit,
            // Capital must be raised for the flip before any refinance.
            cash_needed: results.total_cash_needed,
            timeframe_months: input.deal.holding_period_months + REFINANCE_SEASONING_MONTHS,
            cash_on_cash: brrrr.cash_on_cash,
        },
        StrategySummary {
            strategy: ExitStrategy::Wholesale,
            profit: wholesale.net_profit,
            cash_needed: wholesale.cash_invested,
            timeframe_months: WHOLESALE_TIMEFRAME_MONTHS,
            cash_on_cash: wholesale.roi,
        },
    ];

    let output = ExitComparisonOutput {
        best_profit: pick(&strategies, |a, b| a.profit > b.profit),
        lowest_cash: pick(&strategies, |a, b| a.cash_needed < b.cash_needed),
        fastest: pick(&strategies, |a, b| a.timeframe_months < b.timeframe_months),
        strategies,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Exit strategy comparison",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_comparison() {
        let out = compare_exit_strategies(&ExitComparisonInput::default())
            .unwrap()
            .result;
        assert_eq!(out.strategies.len(), 3);

        let flip = &out.strategies[0];
        assert_eq!(flip.profit, dec!(24665));
        assert_eq!(flip.timeframe_months, 6);

        let brrrr = &out.strategies[1];
        assert_eq!(brrrr.timeframe_months, 8);
        assert_eq!(brrrr.cash_needed, flip.cash_needed);

        let wholesale = &out.strategies[2];
        assert_eq!(wholesale.profit, dec!(9500));
        assert_eq!(wholesale.timeframe_months, 1);

        assert_eq!(out.lowest_cash, ExitStrategy::Wholesale);
        assert_eq!(out.fastest, ExitStrategy::Wholesale);
        // 93,750 equity outweighs five years of negative cash flow
        assert_eq!(out.best_profit, ExitStrategy::Brrrr);
    }
}
