use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::break_even::break_even_arv;
use super::sensitivity::{apply_adjustments, WhatIfAdjustments};
use crate::deal::{compute_deal_economics, DealAssumptions};
use crate::error::FlipCalcError;
use crate::types::*;
use crate::FlipCalcResult;

/// A named what-if case with its likelihood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Fraction in [0, 1]; all scenarios must sum to 1
    pub probability: Rate,
    #[serde(default)]
    pub adjustments: WhatIfAdjustments,
}

impl Scenario {
    fn arv_shift(name: &str, probability: Rate, arv_pct: Percent) -> Self {
        Scenario {
            name: name.into(),
            probability,
            adjustments: WhatIfAdjustments {
                arv_pct,
                ..WhatIfAdjustments::default()
            },
        }
    }

    /// Pessimistic (ARV −10%), base and optimistic (ARV +5%) cases.
    pub fn default_set() -> Vec<Scenario> {
        vec![
            Scenario::arv_shift("Pessimistic", dec!(0.25), dec!(-10)),
            Scenario::arv_shift("Base", dec!(0.50), Decimal::ZERO),
            Scenario::arv_shift("Optimistic", dec!(0.25), dec!(5)),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioInput {
    pub deal: DealAssumptions,
    pub scenarios: Vec<Scenario>,
}

impl Default for ScenarioInput {
    fn default() -> Self {
        ScenarioInput {
            deal: DealAssumptions::default(),
            scenarios: Scenario::default_set(),
        }
    }
}

/// Result for a single scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub probability: Rate,
    pub arv: Money,
    pub net_profit: Money,
    pub roi: Percent,
    pub cash_on_cash: Percent,
    pub deviation_from_base: Money,
    pub profitable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutput {
    pub results: Vec<ScenarioResult>,
    pub base_net_profit: Money,
    pub probability_weighted_profit: Money,
    /// Base profit minus the worst scenario's profit (0 if none is worse)
    pub downside_risk: Money,
    /// Best scenario's profit minus base profit (0 if none is better)
    pub upside_potential: Money,
    pub break_even_arv: Option<Money>,
}

/// Evaluate each scenario through the engine and weight by probability.
pub fn run_scenarios(input: &ScenarioInput) -> FlipCalcResult<ComputationOutput<ScenarioOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    log::debug!("scenarios: {} cases", input.scenarios.len());

    if input.scenarios.is_empty() {
        return Err(FlipCalcError::InsufficientData(
            "At least one scenario required".into(),
        ));
    }

    for s in &input.scenarios {
        if s.probability < Decimal::ZERO || s.probability > Decimal::ONE {
            return Err(FlipCalcError::InvalidInput {
                field: format!("scenario:{} probability", s.name),
                reason: "Probability must be between 0 and 1".into(),
            });
        }
    }

    let total_prob: Decimal = input.scenarios.iter().map(|s| s.probability).sum();
    let prob_tolerance = dec!(0.001);
    if (total_prob - Decimal::ONE).abs() > prob_tolerance {
        return Err(FlipCalcError::InvalidInput {
            field: "probabilities".into(),
            reason: format!("Probabilities must sum to 1.0 (got {total_prob})"),
        });
    }
    if total_prob != Decimal::ONE {
        warnings.push(format!(
            "Probabilities sum to {total_prob}; treated as approximately 1.0"
        ));
    }

    let base_net_profit = compute_deal_economics(&input.deal).net_profit;

    let mut results = Vec::with_capacity(input.scenarios.len());
    let mut probability_weighted_profit = Decimal::ZERO;

    for scenario in &input.scenarios {
        let deal = apply_adjustments(&input.deal, &scenario.adjustments);
        let r = compute_deal_economics(&deal);
        probability_weighted_profit += scenario.probability * r.net_profit;

        if r.net_profit < Decimal::ZERO {
            warnings.push(format!("Scenario '{}' loses money", scenario.name));
        }

        results.push(ScenarioResult {
            name: scenario.name.clone(),
            probability: scenario.probability,
            arv: deal.arv,
            net_profit: r.net_profit,
            roi: r.roi,
            cash_on_cash: r.cash_on_cash,
            deviation_from_base: r.net_profit - base_net_profit,
            profitable: r.net_profit > Decimal::ZERO,
        });
    }

    let worst = results
        .iter()
        .map(|r| r.net_profit)
        .min()
        .unwrap_or(base_net_profit);
    let best = results
        .iter()
        .map(|r| r.net_profit)
        .max()
        .unwrap_or(base_net_profit);

    let output = ScenarioOutput {
        results,
        base_net_profit,
        probability_weighted_profit,
        downside_risk: (base_net_profit - worst).max(Decimal::ZERO),
        upside_potential: (best - base_net_profit).max(Decimal::ZERO),
        break_even_arv: break_even_arv(&input.deal),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Probability-weighted deal scenarios",
        input,
        warnings,
        elapsed,
        output,
    ))
}
