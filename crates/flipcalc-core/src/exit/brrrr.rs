use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{amortized_payment, monthly_interest, CONVENTIONAL_TERM_MONTHS};
use crate::deal::{compute_deal_economics, DealAssumptions, DealResults};
use crate::types::*;
use crate::FlipCalcResult;

/// Refinance closing costs when not itemized, as a percent of ARV.
pub const DEFAULT_REFINANCE_COST_PCT: Percent = dec!(2);

/// PMI applies only above this loan-to-value.
pub const PMI_LTV_THRESHOLD: Percent = dec!(80);

// ---------------------------------------------------------------------------
// Assumptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinanceProduct {
    FifteenYear,
    #[default]
    ThirtyYear,
    /// Investor loan underwritten on rental income
    Dscr,
}

impl RefinanceProduct {
    pub fn term_months(&self) -> u32 {
        match self {
            RefinanceProduct::FifteenYear => 180,
            RefinanceProduct::ThirtyYear | RefinanceProduct::Dscr => CONVENTIONAL_TERM_MONTHS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinanceCostItems {
    /// Points as a percent of the new loan
    pub loan_points: Percent,
    pub appraisal: Money,
    pub title_insurance: Money,
    pub recording_fees: Money,
    pub attorney_fees: Money,
    pub other: Money,
}

impl Default for RefinanceCostItems {
    fn default() -> Self {
        RefinanceCostItems {
            loan_points: dec!(1),
            appraisal: dec!(500),
            title_insurance: dec!(1500),
            recording_fees: dec!(250),
            attorney_fees: dec!(750),
            other: dec!(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinanceCosts {
    PercentOfArv(Percent),
    Itemized(RefinanceCostItems),
}

impl Default for RefinanceCosts {
    fn default() -> Self {
        RefinanceCosts::PercentOfArv(DEFAULT_REFINANCE_COST_PCT)
    }
}

impl RefinanceCosts {
    pub fn amount(&self, arv: Money, new_loan: Money) -> Money {
        match self {
            RefinanceCosts::PercentOfArv(pct) => percent_of(arv, *pct),
            RefinanceCosts::Itemized(c) => {
                percent_of(new_loan, c.loan_points)
                    + c.appraisal
                    + c.title_insurance
                    + c.recording_fees
                    + c.attorney_fees
                    + c.other
            }
        }
    }
}

/// Rental operating assumptions; percentages are of gross monthly rent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentalExpenses {
    pub maintenance_pct: Percent,
    pub management_pct: Percent,
    pub capex_pct: Percent,
    pub vacancy_pct: Percent,
    /// Landlord-paid utilities per month
    pub utilities: Money,
}

impl Default for RentalExpenses {
    fn default() -> Self {
        RentalExpenses {
            maintenance_pct: dec!(5),
            management_pct: dec!(10),
            capex_pct: dec!(5),
            vacancy_pct: dec!(8),
            utilities: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DscrLoanTerms {
    pub interest_rate: Percent,
    pub down_payment_pct: Percent,
    pub interest_only: bool,
}

impl Default for DscrLoanTerms {
    fn default() -> Self {
        DscrLoanTerms {
            interest_rate: dec!(8),
            down_payment_pct: dec!(25),
            interest_only: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrrrrAssumptions {
    pub product: RefinanceProduct,
    /// Refinance loan-to-ARV for 15/30-year products
    pub refinance_ltv: Percent,
    pub refinance_rate: Percent,
    pub monthly_rent: Money,
    pub refinance_costs: RefinanceCosts,
    pub expenses: RentalExpenses,
    pub dscr_loan: DscrLoanTerms,
    pub include_pmi: bool,
    /// Annual PMI as a percent of the loan
    pub pmi_rate: Percent,
    /// Extra cash the investor leaves in to pay the refinance down
    pub additional_down_payment: Money,
}

impl Default for BrrrrAssumptions {
    fn default() -> Self {
        BrrrrAssumptions {
            product: RefinanceProduct::ThirtyYear,
            refinance_ltv: dec!(75),
            refinance_rate: dec!(7),
            monthly_rent: dec!(2000),
            refinance_costs: RefinanceCosts::default(),
            expenses: RentalExpenses::default(),
            dscr_loan: DscrLoanTerms::default(),
            include_pmi: false,
            pmi_rate: dec!(0.5),
            additional_down_payment: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrrrrInput {
    pub deal: DealAssumptions,
    pub brrrr: BrrrrAssumptions,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DscrTier {
    Excellent,
    Good,
    Marginal,
    Poor,
}

impl DscrTier {
    /// No debt service counts as excellent coverage.
    pub fn classify(dscr: Option<Decimal>) -> Self {
        match dscr {
            None => DscrTier::Excellent,
            Some(d) if d >= dec!(1.25) => DscrTier::Excellent,
            Some(d) if d >= Decimal::ONE => DscrTier::Good,
            Some(d) if d >= dec!(0.75) => DscrTier::Marginal,
            Some(_) => DscrTier::Poor,
        }
    }

    /// Typical down payment a DSCR lender asks for at this coverage.
    pub fn recommended_down_payment_pct(&self) -> Percent {
        match self {
            DscrTier::Excellent => dec!(20),
            DscrTier::Good => dec!(25),
            DscrTier::Marginal => dec!(30),
            DscrTier::Poor => dec!(35),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DscrTier::Excellent => "Should qualify easily with standard terms",
            DscrTier::Good => "Should qualify, may need a slightly higher rate",
            DscrTier::Marginal => "May qualify with 25-30% down and a higher rate",
            DscrTier::Poor => "May need 35%+ down or may not qualify",
        }
    }
}

/// DSCR-lender underwriting view: gross rent over PITIA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DscrQualification {
    pub loan_amount: Money,
    pub down_payment: Money,
    pub monthly_payment: Money,
    /// Payment + taxes + insurance + HOA
    pub pitia: Money,
    pub dscr: Option<Decimal>,
    pub tier: DscrTier,
    pub recommended_down_payment_pct: Percent,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrrrrAnalysis {
    pub loan_amount: Money,
    pub loan_to_value: Percent,
    pub refinance_costs: Money,
    /// New loan minus refinance costs
    pub cash_out: Money,
    /// Capital basis (project cost before any sale) minus cash out, floored at 0
    pub cash_left_in_deal: Money,
    pub all_capital_returned: bool,
    pub monthly_principal_interest: Money,
    pub monthly_pmi: Money,
    pub total_debt_service: Money,
    pub vacancy_loss: Money,
    pub effective_gross_income: Money,
    pub maintenance: Money,
    pub management: Money,
    pub capex: Money,
    pub operating_expenses: Money,
    pub noi: Money,
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    pub cash_on_cash: ReturnMetric,
    pub equity_position: Money,
    /// NOI / debt service; None without debt service
    pub dscr: Option<Decimal>,
    pub dscr_tier: DscrTier,
    pub dscr_loan: Option<DscrQualification>,
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Refinance-and-hold model layered on the flip's cost aggregates.
pub fn brrrr_model(
    deal: &DealAssumptions,
    results: &DealResults,
    params: &BrrrrAssumptions,
) -> BrrrrAnalysis {
    let arv = deal.arv;
    let is_dscr = params.product == RefinanceProduct::Dscr;

    let (loan_to_value, rate) = if is_dscr {
        (
            dec!(100) - params.dscr_loan.down_payment_pct,
            params.dscr_loan.interest_rate,
        )
    } else {
        (params.refinance_ltv, params.refinance_rate)
    };
    let loan_amount = percent_of(arv, loan_to_value);

    let refinance_costs = params.refinance_costs.amount(arv, loan_amount);
    let cash_out = loan_amount - refinance_costs;

    // A held property is never sold, so selling costs never occur.
    let capital_basis = results.total_project_cost - results.total_selling_costs;
    let mut cash_left = capital_basis - cash_out;
    let all_capital_returned = cash_left <= Decimal::ZERO;
    if cash_left > Decimal::ZERO && params.additional_down_payment > Decimal::ZERO {
        cash_left -= params.additional_down_payment;
    }
    let cash_left_in_deal = cash_left.max(Decimal::ZERO);

    let monthly_principal_interest = if is_dscr && params.dscr_loan.interest_only {
        monthly_interest(loan_amount, rate)
    } else {
        amortized_payment(loan_amount, rate, params.product.term_months())
    };
    let monthly_pmi = if params.include_pmi && loan_to_value > PMI_LTV_THRESHOLD {
        percent_of(loan_amount, params.pmi_rate) / dec!(12)
    } else {
        Decimal::ZERO
    };
    let total_debt_service = monthly_principal_interest + monthly_pmi;

    let rent = params.monthly_rent;
    let e = &params.expenses;
    let vacancy_loss = percent_of(rent, e.vacancy_pct);
    let effective_gross_income = rent - vacancy_loss;
    let maintenance = percent_of(rent, e.maintenance_pct);
    let management = percent_of(rent, e.management_pct);
    let capex = percent_of(rent, e.capex_pct);
    let fixed_expenses = deal.holding_costs.property_taxes()
        + deal.holding_costs.insurance()
        + deal.holding_costs.hoa()
        + e.utilities;
    let operating_expenses = fixed_expenses + maintenance + management + capex;
    let noi = effective_gross_income - operating_expenses;

    let monthly_cash_flow = noi - total_debt_service;
    let annual_cash_flow = monthly_cash_flow * dec!(12);

    let dscr = if total_debt_service > Decimal::ZERO {
        Some(noi / total_debt_service)
    } else {
        None
    };

    let dscr_loan = is_dscr.then(|| {
        let pitia = monthly_principal_interest
            + deal.holding_costs.property_taxes()
            + deal.holding_costs.insurance()
            + deal.holding_costs.hoa();
        let lender_dscr = if pitia > Decimal::ZERO {
            Some(rent / pitia)
        } else {
            None
        };
        let tier = DscrTier::classify(lender_dscr);
        DscrQualification {
            loan_amount,
            down_payment: percent_of(arv, params.dscr_loan.down_payment_pct),
            monthly_payment: monthly_principal_interest,
            pitia,
            dscr: lender_dscr,
            tier,
            recommended_down_payment_pct: tier.recommended_down_payment_pct(),
            message: tier.message().to_string(),
        }
    });

    BrrrrAnalysis {
        loan_amount,
        loan_to_value,
        refinance_costs,
        cash_out,
        cash_left_in_deal,
        all_capital_returned,
        monthly_principal_interest,
        monthly_pmi,
        total_debt_service,
        vacancy_loss,
        effective_gross_income,
        maintenance,
        management,
        capex,
        operating_expenses,
        noi,
        monthly_cash_flow,
        annual_cash_flow,
        cash_on_cash: ReturnMetric::on_capital(annual_cash_flow, cash_left_in_deal),
        equity_position: arv - loan_amount,
        dscr,
        dscr_tier: DscrTier::classify(dscr),
        dscr_loan,
    }
}

/// Buy, rehab, rent and refinance analysis for a deal.
pub fn analyze_brrrr(input: &BrrrrInput) -> FlipCalcResult<ComputationOutput<BrrrrAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    log::debug!(
        "brrrr: product={:?} rent={}",
        input.brrrr.product,
        input.brrrr.monthly_rent
    );

    if !input.deal.is_evaluable() {
        warnings.push("Purchase price and ARV must both be greater than $0".into());
    }

    let results = compute_deal_economics(&input.deal);
    let analysis = brrrr_model(&input.deal, &results, &input.brrrr);

    if analysis.monthly_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative monthly cash flow of {} after debt service",
            analysis.monthly_cash_flow.round_dp(2)
        ));
    }
    if let Some(d) = analysis.dscr {
        if d < Decimal::ONE {
            warnings.push(format!(
                "DSCR of {} is below 1.0; rent does not cover debt service",
                d.round_dp(2)
            ));
        }
    }
    if input.brrrr.include_pmi && analysis.loan_to_value <= PMI_LTV_THRESHOLD {
        warnings.push("PMI ignored at or below 80% loan-to-value".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "BRRRR refinance and hold",
        input,
        warnings,
        elapsed,
        analysis,
    ))
}
