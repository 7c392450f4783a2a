use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::deal::{seventy_percent_rule, DealAssumptions};
use crate::types::*;
use crate::FlipCalcResult;

/// Rough cost of short-term transactional funding for a double close, as a
/// percent of contract price. Overridable per analysis.
pub const DEFAULT_TRANSACTIONAL_FUNDING_PCT: Percent = dec!(2);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WholesaleDealType {
    /// Contract assigned to the end buyer; wholesaler never takes title
    #[default]
    Assignment,
    /// Wholesaler buys and immediately resells in back-to-back closings
    DoubleClose,
}

/// Wholesaler's fee: stated directly, or the spread to the end buyer's price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentFee {
    Fixed(Money),
    SalePrice(Money),
}

impl Default for AssignmentFee {
    fn default() -> Self {
        AssignmentFee::Fixed(dec!(10000))
    }
}

impl AssignmentFee {
    pub fn amount(&self, contract_price: Money) -> Money {
        match self {
            AssignmentFee::Fixed(fee) => *fee,
            AssignmentFee::SalePrice(price) => *price - contract_price,
        }
    }
}

/// Closing fees the wholesaler pays on a double close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleCloseCosts {
    pub title_escrow: Money,
    pub recording: Money,
    pub attorney: Money,
    pub other: Money,
}

impl Default for DoubleCloseCosts {
    fn default() -> Self {
        DoubleCloseCosts {
            title_escrow: dec!(1500),
            recording: dec!(250),
            attorney: dec!(500),
            other: dec!(250),
        }
    }
}

impl DoubleCloseCosts {
    pub fn total(&self) -> Money {
        self.title_escrow + self.recording + self.attorney + self.other
    }
}

/// End buyer's flip assumptions used to sanity-check the wholesale price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndBuyerAssumptions {
    pub closing_cost_pct: Percent,
    /// Carrying cost per month as a percent of purchase price
    pub monthly_holding_pct: Percent,
    pub holding_months: u32,
    pub selling_cost_pct: Percent,
}

impl Default for EndBuyerAssumptions {
    fn default() -> Self {
        EndBuyerAssumptions {
            closing_cost_pct: dec!(3),
            monthly_holding_pct: dec!(1),
            holding_months: 6,
            selling_cost_pct: dec!(8),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WholesaleAssumptions {
    pub deal_type: WholesaleDealType,
    pub assignment_fee: AssignmentFee,
    /// Refunded at closing
    pub earnest_money: Money,
    pub marketing: Money,
    pub double_close_costs: DoubleCloseCosts,
    pub transactional_funding_pct: Percent,
    pub end_buyer: EndBuyerAssumptions,
}

impl Default for WholesaleAssumptions {
    fn default() -> Self {
        WholesaleAssumptions {
            deal_type: WholesaleDealType::Assignment,
            assignment_fee: AssignmentFee::default(),
            earnest_money: dec!(1000),
            marketing: dec!(500),
            double_close_costs: DoubleCloseCosts::default(),
            transactional_funding_pct: DEFAULT_TRANSACTIONAL_FUNDING_PCT,
            end_buyer: EndBuyerAssumptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WholesaleInput {
    pub deal: DealAssumptions,
    pub wholesale: WholesaleAssumptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WholesaleViability {
    Excellent,
    Good,
    Marginal,
    Poor,
}

impl WholesaleViability {
    /// Both the profit floor and the ROI floor must be met for a tier.
    pub fn classify(net_profit: Money, roi: ReturnMetric) -> Self {
        if net_profit >= dec!(15000) && roi.at_least(dec!(200)) {
            WholesaleViability::Excellent
        } else if net_profit >= dec!(10000) && roi.at_least(dec!(100)) {
            WholesaleViability::Good
        } else if net_profit >= dec!(5000) && roi.at_least(dec!(50)) {
            WholesaleViability::Marginal
        } else {
            WholesaleViability::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndBuyerView {
    pub purchase_price: Money,
    pub closing_costs: Money,
    pub rehab: Money,
    pub holding_costs: Money,
    pub selling_costs: Money,
    pub total_investment: Money,
    pub net_proceeds: Money,
    pub net_profit: Money,
    pub roi: Percent,
    pub max_allowable_offer: Money,
    pub meets_seventy_percent_rule: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WholesaleAnalysis {
    pub deal_type: WholesaleDealType,
    pub contract_price: Money,
    pub end_buyer_price: Money,
    pub assignment_fee: Money,
    pub closing_fees: Money,
    pub transactional_funding: Money,
    /// Earnest money plus every cost the wholesaler fronts
    pub cash_invested: Money,
    /// Fee minus non-refundable costs
    pub net_profit: Money,
    pub roi: ReturnMetric,
    pub viability: WholesaleViability,
    pub end_buyer: EndBuyerView,
}

fn end_buyer_view(price: Money, rehab: Money, arv: Money, a: &EndBuyerAssumptions) -> EndBuyerView {
    let closing_costs = percent_of(price, a.closing_cost_pct);
    let holding_costs = percent_of(price, a.monthly_holding_pct) * Decimal::from(a.holding_months);
    let selling_costs = percent_of(arv, a.selling_cost_pct);
    let total_investment = price + closing_costs + rehab + holding_costs;
    let net_proceeds = arv - selling_costs;
    let net_profit = net_proceeds - total_investment;
    let rule = seventy_percent_rule(price, rehab, arv);

    EndBuyerView {
        purchase_price: price,
        closing_costs,
        rehab,
        holding_costs,
        selling_costs,
        total_investment,
        net_proceeds,
        net_profit,
        roi: percent_ratio(net_profit, total_investment),
        max_allowable_offer: rule.max_allowable_offer,
        meets_seventy_percent_rule: price <= rule.max_allowable_offer,
    }
}

/// Assignment-fee economics for the wholesaler plus the end buyer's view.
pub fn wholesale_model(deal: &DealAssumptions, params: &WholesaleAssumptions) -> WholesaleAnalysis {
    let contract_price = deal.purchase_price;
    let assignment_fee = params.assignment_fee.amount(contract_price);

    let (closing_fees, transactional_funding) = match params.deal_type {
        WholesaleDealType::Assignment => (Decimal::ZERO, Decimal::ZERO),
        WholesaleDealType::DoubleClose => (
            params.double_close_costs.total(),
            percent_of(contract_price, params.transactional_funding_pct),
        ),
    };

    let cash_invested =
        params.earnest_money + params.marketing + closing_fees + transactional_funding;
    // Earnest money comes back at closing.
    let net_profit = assignment_fee - (cash_invested - params.earnest_money);
    let roi = ReturnMetric::on_capital(net_profit, cash_invested);

    let end_buyer_price = contract_price + assignment_fee;

    WholesaleAnalysis {
        deal_type: params.deal_type,
        contract_price,
        end_buyer_price,
        assignment_fee,
        closing_fees,
        transactional_funding,
        cash_invested,
        net_profit,
        roi,
        viability: WholesaleViability::classify(net_profit, roi),
        end_buyer: end_buyer_view(end_buyer_price, deal.rehab.total(), deal.arv, &params.end_buyer),
    }
}

pub fn analyze_wholesale(
    input: &WholesaleInput,
) -> FlipCalcResult<ComputationOutput<WholesaleAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    log::debug!("wholesale: {:?}", input.wholesale.deal_type);

    let analysis = wholesale_model(&input.deal, &input.wholesale);

    if analysis.assignment_fee <= Decimal::ZERO {
        warnings.push("End buyer price does not exceed the contract price".into());
    }
    if !analysis.end_buyer.meets_seventy_percent_rule {
        warnings.push(format!(
            "End buyer price {} exceeds their 70% rule max offer {}; harder to sell",
            analysis.end_buyer_price.round_dp(0),
            analysis.end_buyer.max_allowable_offer.round_dp(0)
        ));
    }
    if analysis.end_buyer.net_profit < Decimal::ZERO {
        warnings.push("End buyer loses money at this price".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Wholesale assignment analysis",
        input,
        warnings,
        elapsed,
        analysis,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_defaults() {
        let a = wholesale_model(&DealAssumptions::default(), &WholesaleAssumptions::default());
        assert_eq!(a.assignment_fee, dec!(10000));
        assert_eq!(a.cash_invested, dec!(1500));
        assert_eq!(a.net_profit, dec!(9500));
        // 9,500 / 1,500
        assert!(a.roi.at_least(dec!(633)));
        assert_eq!(a.viability, WholesaleViability::Marginal);
        assert_eq!(a.end_buyer_price, dec!(260000));
    }

    #[test]
    fn test_double_close_adds_fees_and_funding() {
        let params = WholesaleAssumptions {
            deal_type: WholesaleDealType::DoubleClose,
            assignment_fee: AssignmentFee::SalePrice(dec!(275000)),
            ..WholesaleAssumptions::default()
        };
        let a = wholesale_model(&DealAssumptions::default(), &params);
        assert_eq!(a.assignment_fee, dec!(25000));
        assert_eq!(a.closing_fees, dec!(2500));
        assert_eq!(a.transactional_funding, dec!(5000));
        assert_eq!(a.cash_invested, dec!(9000));
        assert_eq!(a.net_profit, dec!(17000));
        assert_eq!(a.roi, ReturnMetric::Finite(dec!(17000) / dec!(9000) * dec!(100)));
        assert_eq!(a.viability, WholesaleViability::Good);
    }

    #[test]
    fn test_funding_rate_is_overridable() {
        let params = WholesaleAssumptions {
            deal_type: WholesaleDealType::DoubleClose,
            transactional_funding_pct: dec!(1),
            ..WholesaleAssumptions::default()
        };
        let a = wholesale_model(&DealAssumptions::default(), &params);
        assert_eq!(a.transactional_funding, dec!(2500));
    }

    #[test]
    fn test_end_buyer_view() {
        let a = wholesale_model(&DealAssumptions::default(), &WholesaleAssumptions::default());
        let b = &a.end_buyer;
        assert_eq!(b.closing_costs, dec!(7800));
        assert_eq!(b.holding_costs, dec!(15600));
        assert_eq!(b.selling_costs, dec!(30000));
        assert_eq!(b.total_investment, dec!(328400));
        assert_eq!(b.net_profit, dec!(16600));
        assert_eq!(b.max_allowable_offer, dec!(217500));
        assert!(!b.meets_seventy_percent_rule);
    }

    #[test]
    fn test_viability_tiers() {
        let roi = ReturnMetric::Finite(dec!(250));
        assert_eq!(WholesaleViability::classify(dec!(20000), roi), WholesaleViability::Excellent);
        assert_eq!(
            WholesaleViability::classify(dec!(20000), ReturnMetric::Finite(dec!(150))),
            WholesaleViability::Good
        );
        assert_eq!(WholesaleViability::classify(dec!(4000), roi), WholesaleViability::Poor);
        assert_eq!(
            WholesaleViability::classify(dec!(16000), ReturnMetric::Uncapped),
            WholesaleViability::Excellent
        );
    }
}
