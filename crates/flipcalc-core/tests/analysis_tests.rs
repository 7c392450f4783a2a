#![cfg(feature = "analysis")]

use flipcalc_core::analysis::break_even::{break_even_arv, solve_break_even, BreakEvenInput};
use flipcalc_core::analysis::comparison::{compare_properties, ComparisonInput, NamedDeal};
use flipcalc_core::analysis::lenders::{compare_lenders, LenderComparisonInput, LenderQuote};
use flipcalc_core::analysis::scenarios::{run_scenarios, Scenario, ScenarioInput};
use flipcalc_core::analysis::sensitivity::{
    apply_adjustments, run_sensitivity, run_what_if, SensitivityInput, SensitivityLever,
    SensitivityMetric, SensitivityVariable, WhatIfAdjustments, WhatIfInput,
};
use flipcalc_core::deal::*;
use flipcalc_core::FlipCalcError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Break-even
// ===========================================================================

fn assert_breaks_even(deal: &DealAssumptions) {
    let be = break_even_arv(deal).expect("break-even exists");
    let at_break_even = DealAssumptions {
        arv: be,
        ..deal.clone()
    };
    let profit = compute_deal_economics(&at_break_even).net_profit;
    assert!(profit.abs() < dec!(1), "profit at break-even ARV {be}: {profit}");
}

#[test]
fn test_break_even_percent_selling_costs() {
    assert_breaks_even(&DealAssumptions::default());
}

#[test]
fn test_break_even_itemized_selling_costs() {
    let mut deal = DealAssumptions::default();
    deal.selling.closing_costs = SellingClosingCosts::Itemized(SellingCostItems::default());
    deal.selling.seller_concessions = dec!(3000);
    assert_breaks_even(&deal);
}

#[test]
fn test_break_even_across_financing_modes() {
    for loan_type in [LoanType::Cash, LoanType::HardMoney, LoanType::Conventional] {
        let mut deal = DealAssumptions::default();
        deal.financing.loan_type = loan_type;
        deal.financing.interest_only = false;
        deal.purchase_closing_costs = PurchaseClosingCosts::Itemized(ClosingCostItems::default());
        assert_breaks_even(&deal);
    }
}

#[test]
fn test_arv_for_target_profit_hits_target() {
    let input = BreakEvenInput {
        target_profit: dec!(40000),
        ..BreakEvenInput::default()
    };
    let out = solve_break_even(&input).unwrap().result;
    let deal = DealAssumptions {
        arv: out.arv_for_target_profit.unwrap(),
        ..input.deal.clone()
    };
    let profit = compute_deal_economics(&deal).net_profit;
    assert!((profit - dec!(40000)).abs() < dec!(1));
}

#[test]
fn test_max_purchase_price_with_cash_financing() {
    // Without a loan, financing does not move with price, so the solve is exact.
    let mut deal = DealAssumptions::default();
    deal.financing.loan_type = LoanType::Cash;
    let input = BreakEvenInput {
        deal: deal.clone(),
        target_profit: dec!(30000),
    };
    let out = solve_break_even(&input).unwrap().result;
    let at_max = DealAssumptions {
        purchase_price: out.max_purchase_price,
        ..deal
    };
    let profit = compute_deal_economics(&at_max).net_profit;
    assert!((profit - dec!(30000)).abs() < dec!(1), "profit {profit}");
}

// ===========================================================================
// What-if and scenarios
// ===========================================================================

#[test]
fn test_what_if_collapses_itemized_rehab() {
    let mut deal = DealAssumptions::default();
    let mut categories = RehabCategory::default_categories();
    categories[0].items[0].cost = dec!(20000);
    categories[1].items[0].cost = dec!(25000);
    deal.rehab = RehabBudget::Itemized(categories);

    let adjusted = apply_adjustments(
        &deal,
        &WhatIfAdjustments {
            rehab_pct: dec!(20),
            ..WhatIfAdjustments::default()
        },
    );
    assert_eq!(adjusted.rehab, RehabBudget::Simple(dec!(54000)));

    let out = run_what_if(&WhatIfInput {
        deal,
        adjustments: WhatIfAdjustments::default(),
    })
    .unwrap()
    .result;
    assert_eq!(out.base.net_profit, out.adjusted.net_profit);
}

#[test]
fn test_custom_scenario_set() {
    let input = ScenarioInput {
        deal: DealAssumptions::default(),
        scenarios: vec![
            Scenario {
                name: "Overrun".into(),
                probability: dec!(0.4),
                adjustments: WhatIfAdjustments {
                    rehab_pct: dec!(30),
                    holding_pct: dec!(50),
                    ..WhatIfAdjustments::default()
                },
            },
            Scenario {
                name: "On plan".into(),
                probability: dec!(0.6),
                adjustments: WhatIfAdjustments::default(),
            },
        ],
    };
    let out = run_scenarios(&input).unwrap().result;
    assert_eq!(out.results[1].net_profit, dec!(24665));
    assert!(out.results[0].net_profit < out.results[1].net_profit);
    assert!(out.downside_risk > Decimal::ZERO);
    assert_eq!(out.upside_potential, Decimal::ZERO);
}

#[test]
fn test_scenario_probability_bounds() {
    let mut input = ScenarioInput::default();
    input.scenarios[0].probability = dec!(-0.25);
    input.scenarios[1].probability = dec!(1.0);
    assert!(matches!(
        run_scenarios(&input),
        Err(FlipCalcError::InvalidInput { .. })
    ));
}

// ===========================================================================
// Sensitivity grid
// ===========================================================================

#[test]
fn test_sensitivity_cash_needed_grows_with_price() {
    let input = SensitivityInput {
        deal: DealAssumptions::default(),
        variable_1: SensitivityVariable {
            lever: SensitivityLever::PurchasePrice,
            min: dec!(200000),
            max: dec!(300000),
            step: dec!(25000),
        },
        variable_2: SensitivityVariable {
            lever: SensitivityLever::HoldingPct,
            min: dec!(-50),
            max: dec!(100),
            step: dec!(50),
        },
        output_metric: SensitivityMetric::TotalCashNeeded,
    };
    let out = run_sensitivity(&input).unwrap().result;
    assert_eq!(out.variable_1_values.len(), 5);
    assert_eq!(out.variable_2_values, vec![dec!(-50), dec!(0), dec!(50), dec!(100)]);
    assert_eq!(out.base_case_position, (2, 1));
    for row in out.matrix.windows(2) {
        assert!(row[1][0] > row[0][0]);
    }
    for cells in out.matrix[2].windows(2) {
        assert!(cells[1] > cells[0]);
    }
    assert_eq!(out.matrix[2][1], dec!(58585));
}

// ===========================================================================
// Comparisons
// ===========================================================================

#[test]
fn test_property_comparison_headlines() {
    let input = ComparisonInput {
        properties: vec![
            NamedDeal {
                name: "Maple St".into(),
                deal: DealAssumptions::default(),
            },
            NamedDeal {
                name: "Oak Ave".into(),
                deal: DealAssumptions {
                    purchase_price: dec!(180000),
                    arv: dec!(300000),
                    rehab: RehabBudget::Simple(dec!(30000)),
                    ..DealAssumptions::default()
                },
            },
        ],
    };
    let out = compare_properties(&input).unwrap().result;
    assert_eq!(out.properties[0].net_profit, dec!(24665));
    assert!(out.properties[1].passes_seventy_percent_rule);
    assert!(!out.properties[0].passes_seventy_percent_rule);
    assert_eq!(out.winners.lowest_cash_needed, "Oak Ave");
}

#[test]
fn test_lender_quotes_from_json() {
    let input: LenderComparisonInput = serde_json::from_value(serde_json::json!({
        "quotes": [
            { "name": "Local", "interest_rate": "12", "origination_points": "0", "lender_fees": "1500" },
            { "name": "National", "interest_rate": "9", "origination_points": "3" }
        ]
    }))
    .unwrap();
    let out = compare_lenders(&input).unwrap().result;
    assert_eq!(out.lenders.len(), 2);
    assert_eq!(out.lenders[1].lender_fees, Decimal::ZERO);
    assert_eq!(out.lowest_upfront, "Local");
    // 3 points on 265,500
    assert_eq!(out.lenders[1].points_cost, dec!(7965));
}

#[test]
fn test_empty_quotes_use_defaults() {
    let out = compare_lenders(&LenderComparisonInput::default()).unwrap().result;
    let names: Vec<_> = out.lenders.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Lender A", "Lender B"]);
    assert_eq!(
        LenderQuote::defaults_for(&Financing::default())[1].lender_fees,
        dec!(750)
    );
}
