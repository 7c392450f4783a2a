use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{index_of_max, index_of_min};
use crate::deal::{compute_deal_economics, DealAssumptions, Financing, LoanType};
use crate::types::*;
use crate::FlipCalcResult;

/// One lender's offer: rate, points and flat fees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderQuote {
    pub name: String,
    pub interest_rate: Percent,
    pub origination_points: Percent,
    #[serde(default)]
    pub lender_fees: Money,
}

impl LenderQuote {
    /// Two starting quotes: the deal's own terms, and a higher-rate lower-point
    /// alternative.
    pub fn defaults_for(financing: &Financing) -> Vec<LenderQuote> {
        vec![
            LenderQuote {
                name: "Lender A".into(),
                interest_rate: financing.interest_rate,
                origination_points: financing.origination_points,
                lender_fees: dec!(500),
            },
            LenderQuote {
                name: "Lender B".into(),
                interest_rate: financing.interest_rate + Decimal::ONE,
                origination_points: (financing.origination_points - Decimal::ONE)
                    .max(Decimal::ZERO),
                lender_fees: dec!(750),
            },
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LenderComparisonInput {
    pub deal: DealAssumptions,
    /// Quotes to compare; empty uses [`LenderQuote::defaults_for`] the deal
    pub quotes: Vec<LenderQuote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderResult {
    pub name: String,
    pub interest_rate: Percent,
    pub origination_points: Percent,
    pub loan_amount: Money,
    pub points_cost: Money,
    pub monthly_payment: Money,
    /// Interest over the holding period
    pub total_interest: Money,
    pub lender_fees: Money,
    /// Points plus lender fees
    pub upfront_cost: Money,
    /// Interest plus points plus lender fees
    pub total_financing_cost: Money,
    pub cash_needed: Money,
    pub net_profit: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderComparisonOutput {
    pub lenders: Vec<LenderResult>,
    pub best_profit: String,
    pub lowest_upfront: String,
    pub lowest_total_cost: String,
}

/// Re-run the deal under each lender's terms and rank the quotes.
pub fn compare_lenders(
    input: &LenderComparisonInput,
) -> FlipCalcResult<ComputationOutput<LenderComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let quotes = if input.quotes.is_empty() {
        LenderQuote::defaults_for(&input.deal.financing)
    } else {
        input.quotes.clone()
    };
    log::debug!("comparing {} lender quotes", quotes.len());

    if input.deal.financing.loan_type == LoanType::Cash {
        warnings.push("Cash purchase carries no loan; lender quotes only differ by fees".into());
    }

    let lenders: Vec<LenderResult> = quotes
        .iter()
        .map(|quote| {
            let mut deal = input.deal.clone();
            deal.financing.interest_rate = quote.interest_rate;
            deal.financing.origination_points = quote.origination_points;
            let r = compute_deal_economics(&deal);

            LenderResult {
                name: quote.name.clone(),
                interest_rate: quote.interest_rate,
                origination_points: quote.origination_points,
                loan_amount: r.total_loan_amount,
                points_cost: r.total_origination_points,
                monthly_payment: r.monthly_loan_payment,
                total_interest: r.total_loan_interest,
                lender_fees: quote.lender_fees,
                upfront_cost: r.total_origination_points + quote.lender_fees,
                total_financing_cost: r.total_financing_costs + quote.lender_fees,
                cash_needed: r.total_cash_needed + quote.lender_fees,
                net_profit: r.net_profit - quote.lender_fees,
            }
        })
        .collect();

    let name_at = |idx: Option<usize>| idx.map(|i| lenders[i].name.clone()).unwrap_or_default();
    let best_profit = name_at(index_of_max(&lenders, |l| l.net_profit));
    let lowest_upfront = name_at(index_of_min(&lenders, |l| l.upfront_cost));
    let lowest_total_cost = name_at(index_of_min(&lenders, |l| l.total_financing_cost));

    let output = LenderComparisonOutput {
        lenders,
        best_profit,
        lowest_upfront,
        lowest_total_cost,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Lender points and fees comparison",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_quotes_from_deal() {
        let quotes = LenderQuote::defaults_for(&Financing::default());
        assert_eq!(quotes[0].interest_rate, dec!(10));
        assert_eq!(quotes[0].origination_points, dec!(2));
        assert_eq!(quotes[1].interest_rate, dec!(11));
        assert_eq!(quotes[1].origination_points, dec!(1));
        assert_eq!(quotes[1].lender_fees, dec!(750));

        let zero_points = Financing {
            origination_points: dec!(0.5),
            ..Financing::default()
        };
        assert_eq!(
            LenderQuote::defaults_for(&zero_points)[1].origination_points,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_lender_a_matches_engine_plus_fees() {
        let out = compare_lenders(&LenderComparisonInput::default())
            .unwrap()
            .result;
        let a = &out.lenders[0];
        assert_eq!(a.points_cost, dec!(5310));
        assert_eq!(a.total_interest, dec!(13275));
        assert_eq!(a.upfront_cost, dec!(5810));
        assert_eq!(a.total_financing_cost, dec!(19085));
        assert_eq!(a.net_profit, dec!(24165));
        assert_eq!(a.cash_needed, dec!(59085));
    }

    #[test]
    fn test_lender_b_tradeoff() {
        let out = compare_lenders(&LenderComparisonInput::default())
            .unwrap()
            .result;
        let b = &out.lenders[1];
        // 1 point on 265,500 and 11% interest-only for 6 months
        assert_eq!(b.points_cost, dec!(2655));
        assert_eq!(b.total_interest, dec!(14602.5));
        assert_eq!(b.upfront_cost, dec!(3405));
        assert_eq!(out.lowest_upfront, "Lender B");
        // A: 19,085 total vs B: 2,655 + 14,602.5 + 750 = 18,007.5
        assert_eq!(out.lowest_total_cost, "Lender B");
        assert_eq!(out.best_profit, "Lender B");
    }
}
