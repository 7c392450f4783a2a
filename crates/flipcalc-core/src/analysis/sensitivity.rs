use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::deal::{compute_deal_economics, DealAssumptions, DealResults, RehabBudget};
use crate::error::FlipCalcError;
use crate::types::*;
use crate::FlipCalcResult;

/// Largest number of points allowed on one axis of a sweep.
const MAX_SWEEP_POINTS: usize = 101;

// ---------------------------------------------------------------------------
// What-if adjustments
// ---------------------------------------------------------------------------

/// Percentage deltas applied to a copy of the deal (10 = +10%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatIfAdjustments {
    pub arv_pct: Percent,
    pub rehab_pct: Percent,
    pub holding_pct: Percent,
}

fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn scale(value: Decimal, pct: Percent) -> Decimal {
    value * (Decimal::ONE + pct / dec!(100))
}

/// Clone `deal` with the adjustments applied.
///
/// ARV and rehab are rounded to whole dollars and rehab is always collapsed
/// to a single simple budget so the delta is well defined for itemized
/// budgets. The holding period is rounded to whole months, minimum one.
pub fn apply_adjustments(deal: &DealAssumptions, adj: &WhatIfAdjustments) -> DealAssumptions {
    let mut adjusted = deal.clone();
    adjusted.arv = round_whole(scale(deal.arv, adj.arv_pct));
    adjusted.rehab = RehabBudget::Simple(round_whole(scale(deal.rehab.total(), adj.rehab_pct)));

    let months = round_whole(scale(
        Decimal::from(deal.holding_period_months),
        adj.holding_pct,
    ))
    .max(Decimal::ONE);
    adjusted.holding_period_months = months.to_u32().unwrap_or(u32::MAX);

    adjusted
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatIfInput {
    pub deal: DealAssumptions,
    pub adjustments: WhatIfAdjustments,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfOutput {
    pub adjusted_arv: Money,
    pub adjusted_rehab: Money,
    pub adjusted_holding_months: u32,
    pub base: DealResults,
    pub adjusted: DealResults,
    pub profit_change: Money,
    /// Change relative to the magnitude of base profit; 0 when base profit is 0
    pub profit_change_pct: Percent,
    pub passes_seventy_percent_rule: bool,
}

/// Re-run the engine on an adjusted copy of the deal and diff the results.
pub fn run_what_if(input: &WhatIfInput) -> FlipCalcResult<ComputationOutput<WhatIfOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    log::debug!("what-if: {:?}", input.adjustments);

    let adjusted_deal = apply_adjustments(&input.deal, &input.adjustments);
    let base = compute_deal_economics(&input.deal);
    let adjusted = compute_deal_economics(&adjusted_deal);

    let profit_change = adjusted.net_profit - base.net_profit;
    let profit_change_pct = percent_ratio(profit_change, base.net_profit.abs());

    let rule = crate::deal::seventy_percent_rule(
        adjusted_deal.purchase_price,
        adjusted.total_rehab_cost,
        adjusted_deal.arv,
    );

    if adjusted.net_profit < Decimal::ZERO {
        warnings.push("Deal loses money under the adjusted assumptions".into());
    }

    let output = WhatIfOutput {
        adjusted_arv: adjusted_deal.arv,
        adjusted_rehab: adjusted.total_rehab_cost,
        adjusted_holding_months: adjusted_deal.holding_period_months,
        base,
        adjusted,
        profit_change,
        profit_change_pct,
        passes_seventy_percent_rule: rule.passes,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "What-if re-evaluation",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Two-way sensitivity grid
// ---------------------------------------------------------------------------

/// Deal input a sensitivity axis sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityLever {
    /// Percentage change to ARV
    ArvPct,
    /// Percentage change to total rehab
    RehabPct,
    /// Percentage change to holding months
    HoldingPct,
    /// Absolute purchase price
    PurchasePrice,
    /// Absolute annual interest rate
    InterestRate,
}

impl SensitivityLever {
    /// Axis value that leaves the deal unchanged.
    fn neutral_value(&self, deal: &DealAssumptions) -> Decimal {
        match self {
            SensitivityLever::ArvPct
            | SensitivityLever::RehabPct
            | SensitivityLever::HoldingPct => Decimal::ZERO,
            SensitivityLever::PurchasePrice => deal.purchase_price,
            SensitivityLever::InterestRate => deal.financing.interest_rate,
        }
    }

    fn is_percent_adjustment(&self) -> bool {
        matches!(
            self,
            SensitivityLever::ArvPct | SensitivityLever::RehabPct | SensitivityLever::HoldingPct
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityMetric {
    NetProfit,
    Roi,
    AnnualizedRoi,
    CashOnCash,
    TotalCashNeeded,
}

impl SensitivityMetric {
    pub fn read(&self, results: &DealResults) -> Decimal {
        match self {
            SensitivityMetric::NetProfit => results.net_profit,
            SensitivityMetric::Roi => results.roi,
            SensitivityMetric::AnnualizedRoi => results.annualized_roi,
            SensitivityMetric::CashOnCash => results.cash_on_cash,
            SensitivityMetric::TotalCashNeeded => results.total_cash_needed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityVariable {
    pub lever: SensitivityLever,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    #[serde(default)]
    pub deal: DealAssumptions,
    pub variable_1: SensitivityVariable,
    pub variable_2: SensitivityVariable,
    pub output_metric: SensitivityMetric,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub variable_1: SensitivityLever,
    pub variable_2: SensitivityLever,
    pub variable_1_values: Vec<Decimal>,
    pub variable_2_values: Vec<Decimal>,
    pub output_metric: SensitivityMetric,
    /// Matrix[i][j] = metric when variable_1 = values_1[i], variable_2 = values_2[j]
    pub matrix: Vec<Vec<Decimal>>,
    /// Metric for the unperturbed deal
    pub base_case_value: Decimal,
    /// Cell closest to the unperturbed deal (row, col)
    pub base_case_position: (usize, usize),
}

/// Generate the sweep values for a sensitivity variable from min to max with step.
fn generate_sweep_values(var: &SensitivityVariable) -> FlipCalcResult<Vec<Decimal>> {
    let field = format!("variable:{:?}", var.lever);
    if var.step <= Decimal::ZERO {
        return Err(FlipCalcError::InvalidInput {
            field,
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(FlipCalcError::InvalidInput {
            field,
            reason: "Min must be <= max".into(),
        });
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max && values.len() <= MAX_SWEEP_POINTS {
        values.push(current);
        current += var.step;
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    if values.len() > MAX_SWEEP_POINTS {
        return Err(FlipCalcError::InvalidInput {
            field,
            reason: format!("Sweep exceeds {MAX_SWEEP_POINTS} points; increase the step"),
        });
    }

    Ok(values)
}

/// Find the closest index to a target value in a sorted list.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Clone the deal with every (lever, value) pair applied.
fn perturb(deal: &DealAssumptions, cells: &[(SensitivityLever, Decimal)]) -> DealAssumptions {
    let mut adj = WhatIfAdjustments::default();
    for (lever, value) in cells {
        match lever {
            SensitivityLever::ArvPct => adj.arv_pct = *value,
            SensitivityLever::RehabPct => adj.rehab_pct = *value,
            SensitivityLever::HoldingPct => adj.holding_pct = *value,
            _ => {}
        }
    }

    let mut perturbed = if cells.iter().any(|(l, _)| l.is_percent_adjustment()) {
        apply_adjustments(deal, &adj)
    } else {
        deal.clone()
    };

    for (lever, value) in cells {
        match lever {
            SensitivityLever::PurchasePrice => perturbed.purchase_price = *value,
            SensitivityLever::InterestRate => perturbed.financing.interest_rate = *value,
            _ => {}
        }
    }
    perturbed
}

/// Sweep two deal levers and record the chosen metric for every combination.
pub fn run_sensitivity(
    input: &SensitivityInput,
) -> FlipCalcResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    log::debug!(
        "sensitivity: {:?} x {:?} -> {:?}",
        input.variable_1.lever,
        input.variable_2.lever,
        input.output_metric
    );

    if input.variable_1.lever == input.variable_2.lever {
        return Err(FlipCalcError::InvalidInput {
            field: "variable_2".into(),
            reason: "Both axes sweep the same lever".into(),
        });
    }

    let v1_values = generate_sweep_values(&input.variable_1)?;
    let v2_values = generate_sweep_values(&input.variable_2)?;
    let lever_1 = input.variable_1.lever;
    let lever_2 = input.variable_2.lever;

    let matrix: Vec<Vec<Decimal>> = v1_values
        .iter()
        .map(|v1| {
            v2_values
                .iter()
                .map(|v2| {
                    let deal = perturb(&input.deal, &[(lever_1, *v1), (lever_2, *v2)]);
                    input.output_metric.read(&compute_deal_economics(&deal))
                })
                .collect()
        })
        .collect();

    let base_row = closest_index(&v1_values, lever_1.neutral_value(&input.deal));
    let base_col = closest_index(&v2_values, lever_2.neutral_value(&input.deal));
    let base_case_value = input
        .output_metric
        .read(&compute_deal_economics(&input.deal));

    if !input.deal.is_evaluable() {
        warnings.push("Base deal cannot be evaluated; base case value is zero".into());
    }

    let output = SensitivityOutput {
        variable_1: lever_1,
        variable_2: lever_2,
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        output_metric: input.output_metric,
        matrix,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "2-Way Deal Sensitivity Grid",
        &serde_json::json!({
            "variable_1": input.variable_1,
            "variable_2": input.variable_2,
            "output_metric": input.output_metric,
        }),
        warnings,
        elapsed,
        output,
    ))
}
