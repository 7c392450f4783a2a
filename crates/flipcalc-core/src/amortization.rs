use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent, Rate};

/// Term of a conventional (30-year fixed) mortgage in months.
pub const CONVENTIONAL_TERM_MONTHS: u32 = 360;

/// Monthly periodic rate from an annual percentage (10 → 0.00833…).
pub fn monthly_rate(annual_pct: Percent) -> Rate {
    annual_pct / dec!(1200)
}

/// One month of simple interest on `balance`.
///
/// Computed as `balance × annual / 1200` rather than through a rounded
/// monthly rate so whole-dollar inputs stay exact.
pub fn monthly_interest(balance: Money, annual_pct: Percent) -> Money {
    balance * annual_pct / dec!(1200)
}

/// Standard fixed-rate payment: L·r·(1+r)^n / ((1+r)^n − 1), or L/n at r = 0.
///
/// A zero-month term is treated as a single payment. When (1+r)^n grows past
/// Decimal range the payment converges to the interest-only payment L·r, which
/// is returned instead of overflowing.
pub fn amortized_payment(principal: Money, annual_pct: Percent, term_months: u32) -> Money {
    let n = term_months.max(1);
    let r = monthly_rate(annual_pct);

    if r.is_zero() {
        return principal / Decimal::from(n);
    }

    let growth = Decimal::ONE + r;
    let mut compound = Decimal::ONE;
    for _ in 0..n {
        match compound.checked_mul(growth) {
            Some(c) => compound = c,
            None => return monthly_interest(principal, annual_pct),
        }
    }

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return principal / Decimal::from(n);
    }

    principal * r * (compound / denominator)
}

/// Totals from running a loan balance forward a fixed number of months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSummary {
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub ending_balance: Money,
}

/// Run the balance recurrence month by month: each month accrues interest on
/// the opening balance and the remainder of `payment` retires principal.
///
/// This is the partial-period schedule; it is not replaced by a closed-form
/// remaining-balance formula because `months` is usually shorter than the term.
pub fn amortize(
    principal: Money,
    annual_pct: Percent,
    payment: Money,
    months: u32,
) -> AmortizationSummary {
    let mut balance = principal;
    let mut interest_paid = Decimal::ZERO;

    for _ in 0..months {
        let interest = monthly_interest(balance, annual_pct);
        interest_paid += interest;
        balance -= payment - interest;
    }

    AmortizationSummary {
        interest_paid,
        principal_paid: principal - balance,
        ending_balance: balance,
    }
}
