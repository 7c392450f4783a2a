use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use flipcalc_core::deal::{
    self, ClosingCostItems, DealAssumptions, DetailedHoldingCosts, DownPayment, HoldingCosts,
    LoanType, PurchaseClosingCosts, RehabBudget, RehabCategory, SellingClosingCosts,
    SellingCostItems,
};

use super::load_input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LoanTypeArg {
    Cash,
    HardMoney,
    Conventional,
}

impl From<LoanTypeArg> for LoanType {
    fn from(arg: LoanTypeArg) -> Self {
        match arg {
            LoanTypeArg::Cash => LoanType::Cash,
            LoanTypeArg::HardMoney => LoanType::HardMoney,
            LoanTypeArg::Conventional => LoanType::Conventional,
        }
    }
}

/// Deal flags shared by every command that evaluates a single deal.
/// Unset flags keep the default assumptions.
#[derive(Args, Debug, Default)]
pub struct DealArgs {
    /// Property label
    #[arg(long)]
    pub address: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// After-repair value
    #[arg(long)]
    pub arv: Option<Decimal>,

    /// Total rehab budget
    #[arg(long)]
    pub rehab: Option<Decimal>,

    /// Purchase closing costs as a percent of price (3 = 3%)
    #[arg(long)]
    pub closing_cost_pct: Option<Decimal>,

    /// Loan product
    #[arg(long, value_enum)]
    pub loan_type: Option<LoanTypeArg>,

    /// Down payment as a percent of the amount financed
    #[arg(long)]
    pub down_payment_pct: Option<Decimal>,

    /// Annual interest rate (10 = 10%)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Origination points
    #[arg(long)]
    pub points: Option<Decimal>,

    /// Loan term in months
    #[arg(long)]
    pub loan_term: Option<u32>,

    /// Interest-only payments
    #[arg(long)]
    pub interest_only: Option<bool>,

    /// Months the property is held
    #[arg(long)]
    pub holding_months: Option<u32>,

    /// Sales commission percent
    #[arg(long)]
    pub commission_pct: Option<Decimal>,
}

impl DealArgs {
    /// Default assumptions with every supplied flag applied.
    pub fn to_deal(&self) -> DealAssumptions {
        let mut deal = DealAssumptions::default();
        if let Some(ref address) = self.address {
            deal.address = address.clone();
        }
        if let Some(price) = self.purchase_price {
            deal.purchase_price = price;
        }
        if let Some(arv) = self.arv {
            deal.arv = arv;
        }
        if let Some(rehab) = self.rehab {
            deal.rehab = RehabBudget::Simple(rehab);
        }
        if let Some(pct) = self.closing_cost_pct {
            deal.purchase_closing_costs = PurchaseClosingCosts::Percent(pct);
        }
        if let Some(loan_type) = self.loan_type {
            deal.financing.loan_type = loan_type.into();
        }
        if let Some(pct) = self.down_payment_pct {
            deal.financing.down_payment = DownPayment::Percent(pct);
        }
        if let Some(rate) = self.interest_rate {
            deal.financing.interest_rate = rate;
        }
        if let Some(points) = self.points {
            deal.financing.origination_points = points;
        }
        if let Some(term) = self.loan_term {
            deal.financing.loan_term_months = term;
        }
        if let Some(io) = self.interest_only {
            deal.financing.interest_only = io;
        }
        if let Some(months) = self.holding_months {
            deal.holding_period_months = months;
        }
        if let Some(pct) = self.commission_pct {
            deal.selling.commission_pct = pct;
        }
        deal
    }
}

/// Arguments for a full deal evaluation
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    /// Path to JSON deal assumptions (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for printing default assumptions
#[derive(Args)]
pub struct DefaultsArgs {
    /// Switch every multi-mode cost to its itemised template
    #[arg(long)]
    pub itemized: bool,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions: DealAssumptions = match load_input(args.input.as_deref())? {
        Some(deal) => deal,
        None => args.deal.to_deal(),
    };
    let output = deal::analyze_deal(&assumptions);
    Ok(serde_json::to_value(output)?)
}

pub fn run_defaults(args: DefaultsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut assumptions = DealAssumptions::default();
    if args.itemized {
        assumptions.purchase_closing_costs =
            PurchaseClosingCosts::Itemized(ClosingCostItems::default());
        assumptions.rehab = RehabBudget::Itemized(RehabCategory::default_categories());
        assumptions.holding_costs = HoldingCosts::Detailed(DetailedHoldingCosts::default());
        assumptions.selling.closing_costs = SellingClosingCosts::Itemized(SellingCostItems::default());
    }
    Ok(serde_json::to_value(assumptions)?)
}
