use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::assumptions::{DealAssumptions, DownPayment, LoanType};
use super::capabilities::{capabilities, EffectiveFinancing};
use super::results::DealResults;
use super::rules::{seventy_percent_rule, SeventyPercentRule};
use crate::amortization::{amortize, amortized_payment, monthly_interest};
use crate::types::{percent_of, percent_ratio, with_metadata, ComputationOutput, Money};

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Turn a set of deal assumptions into the complete cost/profit breakdown.
///
/// Total over its input: non-positive purchase price or ARV yields the
/// all-zero [`DealResults`] rather than an error. Deterministic; the only
/// loop is the holding-period amortization schedule.
pub fn compute_deal_economics(deal: &DealAssumptions) -> DealResults {
    if !deal.is_evaluable() {
        return DealResults::default();
    }

    let holding_months = Decimal::from(deal.holding_period_months);

    // 1. Purchase costs
    let purchase_closing_costs = deal.purchase_closing_costs.amount(deal.purchase_price);

    // 2. Rehab
    let total_rehab_cost = deal.rehab.total();

    // 3. Financing
    let caps = capabilities(&deal.financing);
    let max_loan_amount = percent_of(deal.arv, deal.financing.max_loan_to_arv);
    let loan = if caps.has_loan {
        structure_loan(
            deal,
            &caps,
            purchase_closing_costs,
            total_rehab_cost,
            max_loan_amount,
        )
    } else {
        LoanStructure::all_cash(deal.purchase_price + total_rehab_cost)
    };
    let total_financing_costs = loan.total_interest + loan.origination_points;

    // 4. Holding
    let total_holding_costs = deal.holding_costs.monthly_total() * holding_months;

    // 5. Selling
    let selling_commission = percent_of(deal.arv, deal.selling.commission_pct);
    let selling_closing_costs = deal.selling.closing_costs.amount(deal.arv);
    let total_selling_costs =
        selling_commission + selling_closing_costs + deal.selling.seller_concessions;

    // 6. Project cost
    let total_project_cost = deal.purchase_price
        + purchase_closing_costs
        + total_rehab_cost
        + total_financing_costs
        + total_holding_costs
        + total_selling_costs;

    // 7. Cash needed
    let total_cash_needed = cash_needed(
        deal,
        &caps,
        &loan,
        purchase_closing_costs,
        total_rehab_cost,
        total_holding_costs,
    );

    // 8. Profitability
    let net_profit = deal.arv - total_project_cost;
    let roi = percent_ratio(net_profit, total_project_cost);
    let cash_on_cash = percent_ratio(net_profit, total_cash_needed);
    let annualized_roi = if holding_months.is_zero() {
        Decimal::ZERO
    } else {
        roi * dec!(12) / holding_months
    };
    let profit_margin = percent_ratio(net_profit, deal.arv);

    DealResults {
        purchase_closing_costs,
        total_rehab_cost,
        base_loan_amount: loan.base_loan,
        total_loan_amount: loan.total_loan,
        down_payment: loan.down_payment,
        monthly_loan_payment: loan.monthly_payment,
        total_loan_interest: loan.total_interest,
        total_origination_points: loan.origination_points,
        total_financing_costs,
        financed_interest_reserve: loan.financed_interest_reserve,
        total_holding_costs,
        selling_commission,
        selling_closing_costs,
        total_selling_costs,
        total_project_cost,
        total_cash_needed,
        net_profit,
        roi,
        annualized_roi,
        cash_on_cash,
        profit_margin,
        is_loan_capped: loan.is_capped,
        max_loan_amount,
    }
}

/// Loan-side figures from step 3.
#[derive(Debug, Clone, Default)]
struct LoanStructure {
    down_payment: Money,
    base_loan: Money,
    total_loan: Money,
    origination_points: Money,
    monthly_payment: Money,
    total_interest: Money,
    financed_interest_reserve: Money,
    is_capped: bool,
}

impl LoanStructure {
    /// Cash purchase: price and rehab come out of pocket, no loan fields.
    fn all_cash(down_payment: Money) -> Self {
        LoanStructure {
            down_payment,
            ..LoanStructure::default()
        }
    }
}

fn structure_loan(
    deal: &DealAssumptions,
    caps: &EffectiveFinancing,
    purchase_closing_costs: Money,
    total_rehab_cost: Money,
    max_loan_amount: Money,
) -> LoanStructure {
    let financing = &deal.financing;

    let mut amount_to_finance = deal.purchase_price;
    if caps.finance_rehab {
        amount_to_finance += total_rehab_cost;
    }

    let down_payment = financing.down_payment.amount(amount_to_finance);
    let base_loan = (amount_to_finance - down_payment).max(Decimal::ZERO);

    // Points are charged on the base loan, before anything is rolled in.
    let origination_points = percent_of(base_loan, financing.origination_points);

    let mut total_loan = base_loan;
    if caps.roll_closing_costs {
        total_loan += purchase_closing_costs;
    }
    if caps.roll_points {
        total_loan += origination_points;
    }

    let is_capped = caps.enforce_arv_cap && total_loan > max_loan_amount;

    let (monthly_payment, total_interest) = if caps.interest_only {
        let payment = monthly_interest(total_loan, financing.interest_rate);
        (payment, payment * Decimal::from(deal.holding_period_months))
    } else {
        let payment =
            amortized_payment(total_loan, financing.interest_rate, caps.loan_term_months);
        let schedule = amortize(
            total_loan,
            financing.interest_rate,
            payment,
            deal.holding_period_months,
        );
        (payment, schedule.interest_paid)
    };

    let financed_interest_reserve = monthly_payment * Decimal::from(caps.interest_reserve_months);

    LoanStructure {
        down_payment,
        base_loan,
        total_loan,
        origination_points,
        monthly_payment,
        total_interest,
        financed_interest_reserve,
        is_capped,
    }
}

/// Step 7: out-of-pocket cash from closing through sale.
fn cash_needed(
    deal: &DealAssumptions,
    caps: &EffectiveFinancing,
    loan: &LoanStructure,
    purchase_closing_costs: Money,
    total_rehab_cost: Money,
    total_holding_costs: Money,
) -> Money {
    let mut cash = loan.down_payment;

    if !caps.roll_closing_costs {
        cash += purchase_closing_costs;
    }

    // A cash purchase already carries rehab in its down payment.
    if caps.has_loan && !caps.finance_rehab {
        cash += total_rehab_cost;
    }

    if !caps.roll_points {
        cash += loan.origination_points;
    }

    if !caps.has_loan {
        return cash + total_holding_costs;
    }

    let covered_months = caps.interest_reserve_months.min(deal.holding_period_months);
    let covered_by_reserve = Decimal::from(covered_months) * loan.monthly_payment;
    let interest_out_of_pocket = (loan.total_interest - covered_by_reserve).max(Decimal::ZERO);

    cash + total_holding_costs + interest_out_of_pocket
}

// ---------------------------------------------------------------------------
// Deal analysis envelope
// ---------------------------------------------------------------------------

/// Engine results plus the resolved financing and the 70% rule check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealAnalysis {
    pub results: DealResults,
    pub effective_financing: EffectiveFinancing,
    pub seventy_percent_rule: SeventyPercentRule,
}

/// Evaluate a deal and attach advisory warnings for unusual or risky inputs.
pub fn analyze_deal(deal: &DealAssumptions) -> ComputationOutput<DealAnalysis> {
    let start = Instant::now();
    log::debug!(
        "analyzing deal: price={} arv={} loan={:?}",
        deal.purchase_price,
        deal.arv,
        deal.financing.loan_type
    );

    let results = compute_deal_economics(deal);
    let warnings = collect_warnings(deal, &results);
    let effective_financing = capabilities(&deal.financing);
    let seventy_percent_rule =
        seventy_percent_rule(deal.purchase_price, results.total_rehab_cost, deal.arv);

    let analysis = DealAnalysis {
        results,
        effective_financing,
        seventy_percent_rule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Fix & Flip Deal Economics",
        deal,
        warnings,
        elapsed,
        analysis,
    )
}

fn collect_warnings(deal: &DealAssumptions, results: &DealResults) -> Vec<String> {
    let mut warnings = Vec::new();

    if !deal.is_evaluable() {
        warnings.push(
            "Purchase price and ARV must both be greater than $0; all results are zero".into(),
        );
        return warnings;
    }

    if deal.purchase_price > dec!(100000000) {
        warnings.push("Purchase price above $100M seems unrealistic".into());
    }
    if deal.arv < deal.purchase_price {
        warnings.push("ARV is below the purchase price; ARV should typically exceed it".into());
    }

    let financing = &deal.financing;
    if let DownPayment::Percent(pct) = financing.down_payment {
        if pct < Decimal::ZERO || pct > dec!(100) {
            warnings.push(format!("Down payment of {pct}% is outside 0-100%"));
        }
    }
    if financing.interest_rate < Decimal::ZERO {
        warnings.push("Interest rate cannot be negative".into());
    } else if financing.interest_rate > dec!(30) {
        warnings.push(format!(
            "Interest rate of {}% seems unusually high",
            financing.interest_rate
        ));
    }
    if financing.loan_type == LoanType::HardMoney
        && (financing.loan_term_months < 1 || financing.loan_term_months > 360)
    {
        warnings.push(format!(
            "Loan term of {} months is outside 1-360 months",
            financing.loan_term_months
        ));
    }
    if financing.origination_points < Decimal::ZERO || financing.origination_points > dec!(10) {
        warnings.push(format!(
            "Origination points of {} seem unusual (expected 0-10)",
            financing.origination_points
        ));
    }
    if financing.loan_type == LoanType::Conventional
        && (financing.finance_rehab
            || financing.roll_closing_costs
            || financing.roll_points
            || financing.interest_only
            || financing.interest_reserve_months > 0)
    {
        warnings.push(
            "Conventional loans ignore rehab financing, cost rolling, interest-only and \
             interest reserve settings; using a 30-year amortized loan"
                .into(),
        );
    }

    if results.is_loan_capped {
        warnings.push(format!(
            "Total loan {} exceeds the {}% loan-to-ARV cap ({}); lender may require more cash",
            results.total_loan_amount.round_dp(2),
            financing.max_loan_to_arv,
            results.max_loan_amount.round_dp(2)
        ));
    }

    if deal.holding_period_months < 1 {
        warnings.push("Holding period should be at least 1 month".into());
    } else if deal.holding_period_months > 60 {
        warnings.push(format!(
            "Holding period of {} months seems unusually long",
            deal.holding_period_months
        ));
    }

    let commission = deal.selling.commission_pct;
    if commission < Decimal::ZERO || commission > dec!(10) {
        warnings.push(format!("Selling commission of {commission}% seems unusual"));
    }

    let rule = seventy_percent_rule(deal.purchase_price, results.total_rehab_cost, deal.arv);
    if !rule.passes {
        warnings.push(format!(
            "Purchase + rehab is {}% of ARV, above the 70% rule (max offer {})",
            rule.all_in_to_arv_pct.round_dp(1),
            rule.max_allowable_offer.round_dp(0)
        ));
    }

    if results.net_profit < Decimal::ZERO {
        warnings.push("Deal loses money at the assumed ARV".into());
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
