use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{index_of_max, index_of_min};
use crate::deal::{compute_deal_economics, seventy_percent_rule, DealAssumptions};
use crate::error::FlipCalcError;
use crate::types::*;
use crate::FlipCalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedDeal {
    pub name: String,
    #[serde(default)]
    pub deal: DealAssumptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub properties: Vec<NamedDeal>,
}

/// Headline metrics for one property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySummary {
    pub name: String,
    pub purchase_price: Money,
    pub arv: Money,
    pub total_rehab_cost: Money,
    pub total_project_cost: Money,
    pub total_cash_needed: Money,
    pub net_profit: Money,
    pub roi: Percent,
    pub annualized_roi: Percent,
    pub cash_on_cash: Percent,
    pub profit_margin: Percent,
    pub all_in_to_arv_pct: Percent,
    pub passes_seventy_percent_rule: bool,
}

/// Names of the leading property per metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonWinners {
    pub best_profit: String,
    pub best_roi: String,
    pub best_cash_on_cash: String,
    pub lowest_cash_needed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub properties: Vec<PropertySummary>,
    pub winners: ComparisonWinners,
}

/// Evaluate several deals side by side and pick a leader for each metric.
pub fn compare_properties(
    input: &ComparisonInput,
) -> FlipCalcResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    log::debug!("comparing {} properties", input.properties.len());

    if input.properties.is_empty() {
        return Err(FlipCalcError::InsufficientData(
            "At least one property required for comparison".into(),
        ));
    }

    let properties: Vec<PropertySummary> = input
        .properties
        .iter()
        .map(|p| {
            let r = compute_deal_economics(&p.deal);
            let rule = seventy_percent_rule(p.deal.purchase_price, r.total_rehab_cost, p.deal.arv);
            if !p.deal.is_evaluable() {
                warnings.push(format!(
                    "Property '{}' has a non-positive price or ARV; metrics are zero",
                    p.name
                ));
            }
            PropertySummary {
                name: p.name.clone(),
                purchase_price: p.deal.purchase_price,
                arv: p.deal.arv,
                total_rehab_cost: r.total_rehab_cost,
                total_project_cost: r.total_project_cost,
                total_cash_needed: r.total_cash_needed,
                net_profit: r.net_profit,
                roi: r.roi,
                annualized_roi: r.annualized_roi,
                cash_on_cash: r.cash_on_cash,
                profit_margin: r.profit_margin,
                all_in_to_arv_pct: rule.all_in_to_arv_pct,
                passes_seventy_percent_rule: rule.passes,
            }
        })
        .collect();

    let name_at = |idx: Option<usize>| {
        idx.map(|i| properties[i].name.clone())
            .unwrap_or_default()
    };
    let winners = ComparisonWinners {
        best_profit: name_at(index_of_max(&properties, |p| p.net_profit)),
        best_roi: name_at(index_of_max(&properties, |p| p.roi)),
        best_cash_on_cash: name_at(index_of_max(&properties, |p| p.cash_on_cash)),
        lowest_cash_needed: name_at(index_of_min(&properties, |p| p.total_cash_needed)),
    };

    let output = ComparisonOutput {
        properties,
        winners,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Side-by-side property comparison",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::LoanType;
    use rust_decimal_macros::dec;

    fn named(name: &str, deal: DealAssumptions) -> NamedDeal {
        NamedDeal {
            name: name.into(),
            deal,
        }
    }

    #[test]
    fn test_winners_per_metric() {
        let base = DealAssumptions::default();
        let mut cheaper = DealAssumptions::default();
        cheaper.purchase_price = dec!(220000);
        let mut cash = DealAssumptions::default();
        cash.financing.loan_type = LoanType::Cash;

        let input = ComparisonInput {
            properties: vec![named("A", base), named("B", cheaper), named("C", cash)],
        };
        let out = compare_properties(&input).unwrap().result;

        assert_eq!(out.properties.len(), 3);
        assert_eq!(out.winners.best_profit, "B");
        assert_eq!(out.winners.best_roi, "B");
        // Cash purchase needs the most cash.
        assert_ne!(out.winners.lowest_cash_needed, "C");
    }

    #[test]
    fn test_identical_deals_tie_to_first() {
        let input = ComparisonInput {
            properties: vec![
                named("First", DealAssumptions::default()),
                named("Second", DealAssumptions::default()),
            ],
        };
        let out = compare_properties(&input).unwrap().result;
        assert_eq!(out.winners.best_profit, "First");
        assert_eq!(out.winners.lowest_cash_needed, "First");
    }

    #[test]
    fn test_empty_comparison_rejected() {
        let input = ComparisonInput { properties: vec![] };
        assert!(compare_properties(&input).is_err());
    }
}
