use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use flipcalc_core::exit::brrrr::{self, BrrrrAssumptions, BrrrrInput, RefinanceProduct};
use flipcalc_core::exit::comparison::{self, ExitComparisonInput};
use flipcalc_core::exit::wholesale::{
    self, AssignmentFee, WholesaleAssumptions, WholesaleDealType, WholesaleInput,
};

use super::deal::DealArgs;
use super::load_input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProductArg {
    FifteenYear,
    ThirtyYear,
    Dscr,
}

impl From<ProductArg> for RefinanceProduct {
    fn from(arg: ProductArg) -> Self {
        match arg {
            ProductArg::FifteenYear => RefinanceProduct::FifteenYear,
            ProductArg::ThirtyYear => RefinanceProduct::ThirtyYear,
            ProductArg::Dscr => RefinanceProduct::Dscr,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DealTypeArg {
    Assignment,
    DoubleClose,
}

impl From<DealTypeArg> for WholesaleDealType {
    fn from(arg: DealTypeArg) -> Self {
        match arg {
            DealTypeArg::Assignment => WholesaleDealType::Assignment,
            DealTypeArg::DoubleClose => WholesaleDealType::DoubleClose,
        }
    }
}

/// Refinance and rental flags
#[derive(Args, Debug, Default)]
pub struct BrrrrFlags {
    /// Refinance product
    #[arg(long, value_enum)]
    pub product: Option<ProductArg>,

    /// Refinance loan-to-ARV percent
    #[arg(long)]
    pub refinance_ltv: Option<Decimal>,

    /// Refinance annual interest rate
    #[arg(long)]
    pub refinance_rate: Option<Decimal>,

    /// Expected monthly rent
    #[arg(long)]
    pub monthly_rent: Option<Decimal>,
}

impl BrrrrFlags {
    fn to_assumptions(&self) -> BrrrrAssumptions {
        let mut params = BrrrrAssumptions::default();
        if let Some(product) = self.product {
            params.product = product.into();
        }
        if let Some(ltv) = self.refinance_ltv {
            params.refinance_ltv = ltv;
        }
        if let Some(rate) = self.refinance_rate {
            params.refinance_rate = rate;
        }
        if let Some(rent) = self.monthly_rent {
            params.monthly_rent = rent;
        }
        params
    }
}

/// Wholesale contract flags
#[derive(Args, Debug, Default)]
pub struct WholesaleFlags {
    /// Assignment or double close
    #[arg(long, value_enum)]
    pub deal_type: Option<DealTypeArg>,

    /// Flat wholesale fee
    #[arg(long, conflicts_with = "end_buyer_price")]
    pub assignment_fee: Option<Decimal>,

    /// Price the end buyer pays; the fee is the spread over the contract price
    #[arg(long)]
    pub end_buyer_price: Option<Decimal>,

    /// Earnest money deposit
    #[arg(long)]
    pub earnest_money: Option<Decimal>,

    /// Marketing spend to find the buyer
    #[arg(long)]
    pub marketing: Option<Decimal>,
}

impl WholesaleFlags {
    fn to_assumptions(&self) -> WholesaleAssumptions {
        let mut params = WholesaleAssumptions::default();
        if let Some(deal_type) = self.deal_type {
            params.deal_type = deal_type.into();
        }
        if let Some(fee) = self.assignment_fee {
            params.assignment_fee = AssignmentFee::Fixed(fee);
        }
        if let Some(price) = self.end_buyer_price {
            params.assignment_fee = AssignmentFee::SalePrice(price);
        }
        if let Some(emd) = self.earnest_money {
            params.earnest_money = emd;
        }
        if let Some(marketing) = self.marketing {
            params.marketing = marketing;
        }
        params
    }
}

/// Arguments for BRRRR analysis
#[derive(Args)]
pub struct BrrrrArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    #[command(flatten)]
    pub brrrr: BrrrrFlags,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for wholesale analysis
#[derive(Args)]
pub struct WholesaleArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    #[command(flatten)]
    pub wholesale: WholesaleFlags,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the exit strategy comparison
#[derive(Args)]
pub struct ExitsArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    #[command(flatten)]
    pub brrrr: BrrrrFlags,

    #[command(flatten)]
    pub wholesale: WholesaleFlags,

    /// Years of rental cash flow credited to the BRRRR exit
    #[arg(long, default_value = "5")]
    pub hold_years: u32,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_brrrr(args: BrrrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: BrrrrInput = match load_input(args.input.as_deref())? {
        Some(input) => input,
        None => BrrrrInput {
            deal: args.deal.to_deal(),
            brrrr: args.brrrr.to_assumptions(),
        },
    };
    let output = brrrr::analyze_brrrr(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_wholesale(args: WholesaleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: WholesaleInput = match load_input(args.input.as_deref())? {
        Some(input) => input,
        None => WholesaleInput {
            deal: args.deal.to_deal(),
            wholesale: args.wholesale.to_assumptions(),
        },
    };
    let output = wholesale::analyze_wholesale(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_exits(args: ExitsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: ExitComparisonInput = match load_input(args.input.as_deref())? {
        Some(input) => input,
        None => ExitComparisonInput {
            deal: args.deal.to_deal(),
            brrrr: args.brrrr.to_assumptions(),
            wholesale: args.wholesale.to_assumptions(),
            hold_years: args.hold_years,
        },
    };
    let output = comparison::compare_exit_strategies(&input)?;
    Ok(serde_json::to_value(output)?)
}
