use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

/// Complete cost/profit breakdown for one evaluation of a deal.
///
/// Recomputed in full on every call; an all-zero record is the sentinel for
/// assumptions that cannot be evaluated (non-positive price or ARV).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealResults {
    pub purchase_closing_costs: Money,
    pub total_rehab_cost: Money,

    /// Amount financed less down payment, before rolled-in costs
    pub base_loan_amount: Money,
    /// Base loan plus any rolled-in closing costs and points
    pub total_loan_amount: Money,
    pub down_payment: Money,
    pub monthly_loan_payment: Money,
    /// Interest accrued over the holding period (not the full term)
    pub total_loan_interest: Money,
    pub total_origination_points: Money,
    /// Interest plus points
    pub total_financing_costs: Money,
    pub financed_interest_reserve: Money,

    pub total_holding_costs: Money,

    pub selling_commission: Money,
    pub selling_closing_costs: Money,
    pub total_selling_costs: Money,

    pub total_project_cost: Money,
    pub total_cash_needed: Money,
    pub net_profit: Money,
    pub roi: Percent,
    pub annualized_roi: Percent,
    pub cash_on_cash: Percent,
    pub profit_margin: Percent,

    /// Advisory: total loan exceeds the loan-to-ARV cap (never clamped)
    pub is_loan_capped: bool,
    pub max_loan_amount: Money,
}
