use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::deal::{compute_deal_economics, DealAssumptions};
use crate::types::*;
use crate::FlipCalcResult;

// ---------------------------------------------------------------------------
// Per-square-foot metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerSqFtInput {
    pub deal: DealAssumptions,
    pub square_footage: Decimal,
    /// Optional rehab tiers to price against the square footage
    pub presets: Vec<RehabPreset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerSqFtOutput {
    pub square_footage: Decimal,
    pub purchase_price: Money,
    pub arv: Money,
    pub rehab: Money,
    /// Purchase + rehab + purchase closing costs
    pub all_in: Money,
    pub total_project_cost: Money,
    pub net_profit: Money,
    /// ARV minus purchase price, per sq ft
    pub value_add: Money,
    pub preset_estimates: Vec<PresetEstimate>,
}

fn per_foot(amount: Money, sqft: Decimal) -> Money {
    if sqft > Decimal::ZERO {
        amount / sqft
    } else {
        Decimal::ZERO
    }
}

/// Express the deal's headline figures per square foot of living area.
pub fn per_square_foot(input: &PerSqFtInput) -> FlipCalcResult<ComputationOutput<PerSqFtOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let sqft = input.square_footage;

    if sqft <= Decimal::ZERO {
        warnings.push("Square footage must be greater than 0; per-sq-ft metrics are zero".into());
    }

    let deal = &input.deal;
    let r = compute_deal_economics(deal);
    let all_in = deal.purchase_price + r.total_rehab_cost + r.purchase_closing_costs;

    let output = PerSqFtOutput {
        square_footage: sqft,
        purchase_price: per_foot(deal.purchase_price, sqft),
        arv: per_foot(deal.arv, sqft),
        rehab: per_foot(r.total_rehab_cost, sqft),
        all_in: per_foot(all_in, sqft),
        total_project_cost: per_foot(r.total_project_cost, sqft),
        net_profit: per_foot(r.net_profit, sqft),
        value_add: per_foot(deal.arv, sqft) - per_foot(deal.purchase_price, sqft),
        preset_estimates: input
            .presets
            .iter()
            .map(|p| PresetEstimate {
                name: p.name.clone(),
                cost_per_sqft: p.cost_per_sqft,
                estimate: p.estimate(sqft),
            })
            .collect(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Per-square-foot deal metrics",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Rehab presets
// ---------------------------------------------------------------------------

/// A rehab scope priced per square foot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehabPreset {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Zero means the preset has not been configured
    #[serde(default)]
    pub cost_per_sqft: Money,
}

impl RehabPreset {
    fn unconfigured(name: &str, description: &str) -> Self {
        RehabPreset {
            name: name.into(),
            description: description.into(),
            cost_per_sqft: Decimal::ZERO,
        }
    }

    /// Light cosmetic, medium and full-gut tiers, all unpriced.
    pub fn default_set() -> Vec<RehabPreset> {
        vec![
            Self::unconfigured("Light Cosmetic", "Paint, flooring, fixtures, minor repairs"),
            Self::unconfigured("Medium Rehab", "Kitchen/bath updates, some systems work"),
            Self::unconfigured("Full Gut", "Complete renovation, new everything"),
        ]
    }

    pub fn is_configured(&self) -> bool {
        self.cost_per_sqft > Decimal::ZERO
    }

    /// Whole-dollar rehab budget for `sqft`, or None when the preset is
    /// unpriced or the area is not positive.
    pub fn estimate(&self, sqft: Decimal) -> Option<Money> {
        if !self.is_configured() || sqft <= Decimal::ZERO {
            return None;
        }
        Some(
            (self.cost_per_sqft * sqft)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetEstimate {
    pub name: String,
    pub cost_per_sqft: Money,
    pub estimate: Option<Money>,
}
