use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::deal::{compute_deal_economics, DealAssumptions, DealResults};
use crate::types::*;
use crate::FlipCalcResult;

pub const DEFAULT_TARGET_PROFIT: Money = dec!(25000);

/// Input for break-even and target-profit solving
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakEvenInput {
    pub deal: DealAssumptions,
    /// Desired net profit for the ARV and purchase-price solvers
    pub target_profit: Money,
}

impl Default for BreakEvenInput {
    fn default() -> Self {
        BreakEvenInput {
            deal: DealAssumptions::default(),
            target_profit: DEFAULT_TARGET_PROFIT,
        }
    }
}

/// Output of the closed-form break-even solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenOutput {
    /// Costs that do not move with ARV
    pub fixed_costs: Money,
    /// Commission plus percentage selling closing costs, as a fraction of ARV
    pub selling_rate: Rate,
    /// ARV at which net profit is zero; None when selling costs consume all of ARV
    pub break_even_arv: Option<Money>,
    /// Current ARV minus break-even ARV
    pub arv_cushion: Option<Money>,
    pub arv_cushion_pct: Option<Percent>,
    pub target_profit: Money,
    pub arv_for_target_profit: Option<Money>,
    /// Highest purchase price that still yields the target profit at the current ARV
    pub max_purchase_price: Money,
    /// Current price minus max purchase price (positive = over)
    pub purchase_price_gap: Money,
    pub target_achievable: bool,
    pub current_net_profit: Money,
    pub current_profit_margin: Percent,
}

/// Linear coefficients of net profit in ARV: profit = ARV·(1 − rate) − fixed.
#[derive(Debug, Clone, Copy)]
struct ProfitLine {
    fixed_costs: Money,
    selling_rate: Rate,
}

impl ProfitLine {
    fn from_results(deal: &DealAssumptions, results: &DealResults) -> Self {
        let fixed_costs = deal.purchase_price
            + results.purchase_closing_costs
            + results.total_rehab_cost
            + results.total_financing_costs
            + results.total_holding_costs
            + deal.selling.fixed_amount();
        ProfitLine {
            fixed_costs,
            selling_rate: deal.selling.arv_proportional_pct() / dec!(100),
        }
    }

    /// ARV needed to clear `profit`, or None when the selling rate is ≥ 100%.
    fn arv_for(&self, profit: Money) -> Option<Money> {
        let retained = Decimal::ONE - self.selling_rate;
        if retained <= Decimal::ZERO {
            None
        } else {
            Some((self.fixed_costs + profit) / retained)
        }
    }
}

/// ARV at which the deal exactly breaks even, holding every other input fixed.
///
/// Financing, holding and rehab costs do not depend on ARV, so the inversion
/// is exact. Returns None when the deal cannot be evaluated or selling costs
/// are 100% or more of ARV.
pub fn break_even_arv(deal: &DealAssumptions) -> Option<Money> {
    if !deal.is_evaluable() {
        return None;
    }
    let results = compute_deal_economics(deal);
    ProfitLine::from_results(deal, &results).arv_for(Decimal::ZERO)
}

/// Solve break-even ARV, ARV for a target profit and the max purchase price.
pub fn solve_break_even(input: &BreakEvenInput) -> FlipCalcResult<ComputationOutput<BreakEvenOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let deal = &input.deal;
    log::debug!("break-even: target profit {}", input.target_profit);

    if !deal.is_evaluable() {
        warnings.push("Purchase price and ARV must both be greater than $0".into());
    }

    let results = compute_deal_economics(deal);
    let line = ProfitLine::from_results(deal, &results);

    // Zeroed results carry no costs, so an unevaluable deal has no solution.
    let (break_even, arv_for_target_profit) = if deal.is_evaluable() {
        (line.arv_for(Decimal::ZERO), line.arv_for(input.target_profit))
    } else {
        (None, None)
    };
    if deal.is_evaluable() && break_even.is_none() {
        warnings.push(format!(
            "Selling costs of {}% of ARV leave nothing to recover costs; no break-even ARV exists",
            deal.selling.arv_proportional_pct()
        ));
    }

    let arv_cushion = break_even.map(|be| deal.arv - be);
    let arv_cushion_pct = arv_cushion.map(|c| percent_ratio(c, deal.arv));

    // Price-proportional closing costs scale with the unknown; fixed ones sit
    // with the other costs. Financing is held at its current value.
    let closing_rate = deal.purchase_closing_costs.price_proportional_pct() / dec!(100);
    let max_purchase_price = (deal.arv * (Decimal::ONE - line.selling_rate)
        - input.target_profit
        - results.total_rehab_cost
        - results.total_financing_costs
        - results.total_holding_costs
        - deal.selling.fixed_amount()
        - deal.purchase_closing_costs.fixed_amount())
        / (Decimal::ONE + closing_rate);
    let target_achievable = max_purchase_price > Decimal::ZERO;
    if !target_achievable {
        warnings.push(format!(
            "A ${} profit is not achievable at the current ARV",
            input.target_profit
        ));
    }

    if let Some(cushion) = arv_cushion {
        if cushion < Decimal::ZERO {
            warnings.push("Current ARV is below the break-even ARV".into());
        }
    }

    let output = BreakEvenOutput {
        fixed_costs: line.fixed_costs,
        selling_rate: line.selling_rate,
        break_even_arv: break_even,
        arv_cushion,
        arv_cushion_pct,
        target_profit: input.target_profit,
        arv_for_target_profit,
        max_purchase_price,
        purchase_price_gap: deal.purchase_price - max_purchase_price,
        target_achievable,
        current_net_profit: results.net_profit,
        current_profit_margin: results.profit_margin,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Closed-form break-even and target-profit solver",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{SellingClosingCosts, SellingCostItems};

    #[test]
    fn test_break_even_arv_default_deal() {
        // fixed = 250000 + 7500 + 45000 + 18585 + 3000 = 324085; rate 7%
        let be = break_even_arv(&DealAssumptions::default()).unwrap();
        assert_eq!(be, dec!(324085) / dec!(0.93));
    }

    #[test]
    fn test_break_even_itemized_selling_uses_commission_only() {
        let mut deal = DealAssumptions::default();
        deal.selling.closing_costs = SellingClosingCosts::Itemized(SellingCostItems::default());
        let be = break_even_arv(&deal).unwrap();
        assert_eq!(be, (dec!(324085) + dec!(3650)) / dec!(0.94));
    }

    #[test]
    fn test_no_break_even_when_selling_consumes_arv() {
        let mut deal = DealAssumptions::default();
        deal.selling.commission_pct = dec!(99);
        let out = solve_break_even(&BreakEvenInput {
            deal,
            ..BreakEvenInput::default()
        })
        .unwrap();
        assert!(out.result.break_even_arv.is_none());
        assert!(out.result.arv_for_target_profit.is_none());
        assert!(out.warnings.iter().any(|w| w.contains("no break-even ARV")));
    }

    #[test]
    fn test_unevaluable_deal_has_no_solution() {
        let mut deal = DealAssumptions::default();
        deal.purchase_price = Decimal::ZERO;
        assert!(break_even_arv(&deal).is_none());

        let out = solve_break_even(&BreakEvenInput {
            deal,
            ..BreakEvenInput::default()
        })
        .unwrap();
        assert!(out.result.break_even_arv.is_none());
        assert!(out.result.arv_for_target_profit.is_none());
        assert!(out.result.arv_cushion.is_none());
        assert!(out.warnings.iter().any(|w| w.contains("greater than $0")));
        assert!(!out.warnings.iter().any(|w| w.contains("no break-even ARV")));
    }

    #[test]
    fn test_target_profit_solvers() {
        let out = solve_break_even(&BreakEvenInput::default()).unwrap().result;
        assert_eq!(
            out.arv_for_target_profit,
            Some((dec!(324085) + dec!(25000)) / dec!(0.93))
        );
        // (375000 × 0.93 − 25000 − 45000 − 18585 − 3000) / 1.03
        let expected = (dec!(348750) - dec!(91585)) / dec!(1.03);
        assert_eq!(out.max_purchase_price, expected);
        assert!(out.target_achievable);
        assert!(out.purchase_price_gap > Decimal::ZERO);
    }

    #[test]
    fn test_cushion_is_positive_for_profitable_deal() {
        let out = solve_break_even(&BreakEvenInput::default()).unwrap().result;
        let cushion = out.arv_cushion.unwrap();
        assert!(cushion > Decimal::ZERO);
        assert_eq!(out.current_net_profit, dec!(24665));
    }
}
