use serde::{Deserialize, Serialize};

use super::assumptions::{Financing, LoanType};
use crate::amortization::CONVENTIONAL_TERM_MONTHS;

/// Financing toggles after loan-type precedence has been applied.
///
/// The engine reads only these, never the raw toggles on [`Financing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveFinancing {
    pub has_loan: bool,
    pub finance_rehab: bool,
    pub roll_closing_costs: bool,
    pub roll_points: bool,
    pub interest_only: bool,
    pub interest_reserve_months: u32,
    pub loan_term_months: u32,
    /// Whether the loan-to-ARV cap applies (hard money only)
    pub enforce_arv_cap: bool,
}

/// Resolve raw financing toggles against the loan product.
///
/// | loan type    | rehab | roll closing | roll points | IO  | reserve | term   | ARV cap |
/// |--------------|-------|--------------|-------------|-----|---------|--------|---------|
/// | cash         | no    | no           | no          | no  | 0       | n/a    | no      |
/// | hard money   | input | input        | input       | input | input | input  | yes     |
/// | conventional | no    | no           | no          | no  | 0       | 360    | no      |
pub fn capabilities(financing: &Financing) -> EffectiveFinancing {
    match financing.loan_type {
        LoanType::Cash => EffectiveFinancing {
            has_loan: false,
            finance_rehab: false,
            roll_closing_costs: false,
            roll_points: false,
            interest_only: false,
            interest_reserve_months: 0,
            loan_term_months: 0,
            enforce_arv_cap: false,
        },
        LoanType::HardMoney => EffectiveFinancing {
            has_loan: true,
            finance_rehab: financing.finance_rehab,
            roll_closing_costs: financing.roll_closing_costs,
            roll_points: financing.roll_points,
            interest_only: financing.interest_only,
            interest_reserve_months: financing.interest_reserve_months,
            loan_term_months: financing.loan_term_months,
            enforce_arv_cap: true,
        },
        LoanType::Conventional => EffectiveFinancing {
            has_loan: true,
            finance_rehab: false,
            roll_closing_costs: false,
            roll_points: false,
            interest_only: false,
            interest_reserve_months: 0,
            loan_term_months: CONVENTIONAL_TERM_MONTHS,
            enforce_arv_cap: false,
        },
    }
}
