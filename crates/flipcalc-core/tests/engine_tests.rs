use flipcalc_core::amortization::{amortize, amortized_payment};
use flipcalc_core::deal::*;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn worked_scenario() -> DealAssumptions {
    DealAssumptions {
        purchase_price: dec!(250000),
        arv: dec!(375000),
        purchase_closing_costs: PurchaseClosingCosts::Percent(dec!(3)),
        rehab: RehabBudget::Simple(dec!(45000)),
        financing: Financing {
            loan_type: LoanType::HardMoney,
            down_payment: DownPayment::Percent(dec!(10)),
            interest_rate: dec!(10),
            loan_term_months: 12,
            origination_points: dec!(2),
            interest_only: true,
            finance_rehab: true,
            ..Financing::default()
        },
        holding_period_months: 6,
        holding_costs: HoldingCosts::Simple(SimpleHoldingCosts {
            property_taxes: dec!(250),
            insurance: dec!(100),
            utilities: dec!(150),
        }),
        selling: SellingAssumptions {
            commission_pct: dec!(6),
            closing_costs: SellingClosingCosts::Percent(dec!(1)),
            seller_concessions: Decimal::ZERO,
        },
        ..DealAssumptions::default()
    }
}

// ===========================================================================
// Worked scenario
// ===========================================================================

#[test]
fn test_worked_scenario_exact_figures() {
    let r = compute_deal_economics(&worked_scenario());

    assert_eq!(r.base_loan_amount, dec!(265500));
    assert_eq!(r.total_origination_points, dec!(5310));
    assert_eq!(r.monthly_loan_payment, dec!(2212.50));
    assert_eq!(r.total_loan_interest, dec!(13275));
    assert_eq!(r.total_holding_costs, dec!(3000));
    assert_eq!(r.selling_commission, dec!(22500));
    assert_eq!(r.selling_closing_costs, dec!(3750));
    assert_eq!(r.total_selling_costs, dec!(26250));

    let expected_cost = dec!(250000)
        + dec!(7500)
        + dec!(45000)
        + dec!(13275)
        + dec!(5310)
        + dec!(3000)
        + dec!(26250);
    assert_eq!(r.total_project_cost, expected_cost);
    assert_eq!(r.net_profit, dec!(375000) - expected_cost);
}

#[test]
fn test_worked_scenario_matches_defaults() {
    assert_eq!(worked_scenario(), DealAssumptions::default());
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_engine_is_idempotent() {
    let mut deal = worked_scenario();
    deal.financing.interest_only = false;
    deal.financing.interest_reserve_months = 2;
    let first = compute_deal_economics(&deal);
    let second = compute_deal_economics(&deal);
    assert_eq!(first, second);
}

#[test]
fn test_zero_guard_for_non_positive_inputs() {
    for (price, arv) in [
        (Decimal::ZERO, dec!(375000)),
        (dec!(-5), dec!(375000)),
        (dec!(250000), Decimal::ZERO),
        (dec!(250000), dec!(-1)),
    ] {
        let deal = DealAssumptions {
            purchase_price: price,
            arv,
            ..worked_scenario()
        };
        let r = compute_deal_economics(&deal);
        assert_eq!(r, DealResults::default());
        assert!(!r.is_loan_capped);
    }
}

#[test]
fn test_cash_purchase_identity() {
    let mut deal = worked_scenario();
    deal.financing.loan_type = LoanType::Cash;
    deal.financing.roll_points = true;
    deal.financing.interest_reserve_months = 3;
    deal.purchase_closing_costs = PurchaseClosingCosts::Fixed(Decimal::ZERO);
    let r = compute_deal_economics(&deal);

    assert_eq!(r.down_payment, deal.purchase_price + r.total_rehab_cost);
    assert_eq!(r.base_loan_amount, Decimal::ZERO);
    assert_eq!(r.total_loan_amount, Decimal::ZERO);
    assert_eq!(r.monthly_loan_payment, Decimal::ZERO);
    assert_eq!(r.total_loan_interest, Decimal::ZERO);
    assert_eq!(r.total_origination_points, Decimal::ZERO);
    assert_eq!(r.total_financing_costs, Decimal::ZERO);
    assert_eq!(r.financed_interest_reserve, Decimal::ZERO);
    assert_eq!(r.total_cash_needed, r.down_payment + r.total_holding_costs);
}

#[test]
fn test_cash_purchase_pays_closing_out_of_pocket() {
    let mut deal = worked_scenario();
    deal.financing.loan_type = LoanType::Cash;
    let r = compute_deal_economics(&deal);
    assert_eq!(
        r.total_cash_needed,
        r.down_payment + r.purchase_closing_costs + r.total_holding_costs
    );
}

#[test]
fn test_conventional_override_regardless_of_toggles() {
    let plain = {
        let mut d = worked_scenario();
        d.financing = Financing {
            loan_type: LoanType::Conventional,
            interest_only: false,
            finance_rehab: false,
            roll_closing_costs: false,
            roll_points: false,
            interest_reserve_months: 0,
            loan_term_months: 360,
            ..d.financing
        };
        d
    };
    let expected = compute_deal_economics(&plain);

    for toggles in 0u8..32 {
        let mut deal = plain.clone();
        deal.financing.interest_only = toggles & 1 != 0;
        deal.financing.finance_rehab = toggles & 2 != 0;
        deal.financing.roll_closing_costs = toggles & 4 != 0;
        deal.financing.roll_points = toggles & 8 != 0;
        deal.financing.interest_reserve_months = if toggles & 16 != 0 { 3 } else { 0 };
        deal.financing.loan_term_months = 12;
        assert_eq!(compute_deal_economics(&deal), expected, "toggles {toggles:05b}");
    }

    assert_eq!(
        expected.monthly_loan_payment,
        amortized_payment(expected.total_loan_amount, dec!(10), 360)
    );
    assert!(!expected.is_loan_capped);
}

#[test]
fn test_interest_only_payment_formula() {
    for (rate, points) in [(dec!(8.5), dec!(1)), (dec!(12), dec!(3)), (dec!(9.75), dec!(0))] {
        let mut deal = worked_scenario();
        deal.financing.interest_rate = rate;
        deal.financing.origination_points = points;
        deal.financing.roll_points = true;
        let r = compute_deal_economics(&deal);
        assert_eq!(r.monthly_loan_payment, r.total_loan_amount * rate / dec!(1200));
    }
}

#[test]
fn test_amortization_retires_balance_over_full_term() {
    for (principal, rate, term) in [
        (dec!(265500), dec!(10), 12u32),
        (dec!(225000), dec!(7), 360),
        (dec!(100000), dec!(0), 60),
    ] {
        let payment = amortized_payment(principal, rate, term);
        let schedule = amortize(principal, rate, payment, term);
        assert!(
            schedule.ending_balance.abs() < dec!(0.0001),
            "balance {} left after {term} months",
            schedule.ending_balance
        );
    }
}

#[test]
fn test_amortized_hold_interest_uses_schedule() {
    let mut deal = worked_scenario();
    deal.financing.interest_only = false;
    let r = compute_deal_economics(&deal);
    let schedule = amortize(r.total_loan_amount, dec!(10), r.monthly_loan_payment, 6);
    assert_eq!(r.total_loan_interest, schedule.interest_paid);
}

#[test]
fn test_loan_cap_is_advisory() {
    let r = compute_deal_economics(&worked_scenario());
    assert!(r.is_loan_capped);
    assert_eq!(r.max_loan_amount, dec!(262500));
    // The loan is not clamped.
    assert_eq!(r.total_loan_amount, dec!(265500));
}

#[test]
fn test_analyze_deal_reports_rule_and_capabilities() {
    let out = analyze_deal(&worked_scenario());
    assert_eq!(out.result.results, compute_deal_economics(&worked_scenario()));
    assert!(out.result.effective_financing.enforce_arv_cap);
    assert_eq!(out.result.seventy_percent_rule.max_allowable_offer, dec!(217500));
    assert_eq!(out.methodology, "Fix & Flip Deal Economics");
}

#[test]
fn test_partial_json_deal_takes_defaults() {
    let deal: DealAssumptions = serde_json::from_value(serde_json::json!({
        "purchase_price": "180000",
        "financing": { "loan_type": "cash" },
        "purchase_closing_costs": { "fixed": "4000" }
    }))
    .unwrap();
    assert_eq!(deal.arv, dec!(375000));
    assert_eq!(deal.financing.loan_type, LoanType::Cash);
    let r = compute_deal_economics(&deal);
    assert_eq!(r.purchase_closing_costs, dec!(4000));
    assert_eq!(r.down_payment, dec!(225000));
}
