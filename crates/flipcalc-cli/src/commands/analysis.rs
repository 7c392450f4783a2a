use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use flipcalc_core::analysis::break_even::{self, BreakEvenInput};
use flipcalc_core::analysis::comparison::{self, ComparisonInput};
use flipcalc_core::analysis::comps::{self, CompsInput};
use flipcalc_core::analysis::lenders::{self, LenderComparisonInput};
use flipcalc_core::analysis::per_sqft::{self, PerSqFtInput};
use flipcalc_core::analysis::scenarios::{self, ScenarioInput};
use flipcalc_core::analysis::sensitivity::{
    self, SensitivityInput, SensitivityLever, SensitivityMetric, SensitivityVariable,
    WhatIfAdjustments, WhatIfInput,
};

use super::deal::DealArgs;
use super::load_input;

/// Arguments for break-even solving
#[derive(Args)]
pub struct BreakEvenArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    /// Net profit the target ARV and maximum price are solved for
    #[arg(long)]
    pub target_profit: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a what-if rerun
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct WhatIfArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    /// Percent change to ARV (e.g. -10)
    #[arg(long, default_value = "0")]
    pub arv_pct: Decimal,

    /// Percent change to rehab
    #[arg(long, default_value = "0")]
    pub rehab_pct: Decimal,

    /// Percent change to holding months
    #[arg(long, default_value = "0")]
    pub holding_pct: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MetricArg {
    NetProfit,
    Roi,
    AnnualizedRoi,
    CashOnCash,
    TotalCashNeeded,
}

impl From<MetricArg> for SensitivityMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::NetProfit => SensitivityMetric::NetProfit,
            MetricArg::Roi => SensitivityMetric::Roi,
            MetricArg::AnnualizedRoi => SensitivityMetric::AnnualizedRoi,
            MetricArg::CashOnCash => SensitivityMetric::CashOnCash,
            MetricArg::TotalCashNeeded => SensitivityMetric::TotalCashNeeded,
        }
    }
}

/// Arguments for a two-variable sensitivity grid
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    /// First axis in format lever:min:max:step
    /// (e.g. "arv_pct:-10:10:5"; levers: arv_pct, rehab_pct, holding_pct,
    /// purchase_price, interest_rate)
    #[arg(long)]
    pub var1: Option<String>,

    /// Second axis in the same format
    #[arg(long)]
    pub var2: Option<String>,

    /// Metric reported in each cell
    #[arg(long, value_enum, default_value = "net-profit")]
    pub metric: MetricArg,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for probability-weighted scenarios
#[derive(Args)]
pub struct ScenariosArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    /// Path to JSON input file with deal and scenarios
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a multi-property comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON file with a `properties` list (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for lender comparison
#[derive(Args)]
pub struct LendersArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    /// Path to JSON file with deal and quotes (defaults to two sample quotes)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for per-square-foot metrics
#[derive(Args)]
pub struct PerSqFtArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    /// Living area in square feet
    #[arg(long)]
    pub sqft: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for comparable sales analysis
#[derive(Args)]
pub struct CompsArgs {
    /// Path to JSON file with subject and comparable sales (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,
}

fn parse_sens_var(axis: &str) -> Result<SensitivityVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = axis.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be lever:min:max:step, got '{}'",
            axis
        )
        .into());
    }
    let lever: SensitivityLever =
        serde_json::from_value(Value::String(parts[0].replace('-', "_")))
            .map_err(|_| format!("Unknown sensitivity lever '{}'", parts[0]))?;
    Ok(SensitivityVariable {
        lever,
        min: parts[1].parse()?,
        max: parts[2].parse()?,
        step: parts[3].parse()?,
    })
}

pub fn run_break_even(args: BreakEvenArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: BreakEvenInput = match load_input(args.input.as_deref())? {
        Some(input) => input,
        None => {
            let mut input = BreakEvenInput {
                deal: args.deal.to_deal(),
                ..BreakEvenInput::default()
            };
            if let Some(target) = args.target_profit {
                input.target_profit = target;
            }
            input
        }
    };
    let output = break_even::solve_break_even(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_what_if(args: WhatIfArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: WhatIfInput = match load_input(args.input.as_deref())? {
        Some(input) => input,
        None => WhatIfInput {
            deal: args.deal.to_deal(),
            adjustments: WhatIfAdjustments {
                arv_pct: args.arv_pct,
                rehab_pct: args.rehab_pct,
                holding_pct: args.holding_pct,
            },
        },
    };
    let output = sensitivity::run_what_if(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: SensitivityInput = match load_input(args.input.as_deref())? {
        Some(input) => input,
        None => {
            let var1 = args
                .var1
                .as_deref()
                .ok_or("--var1 is required (or provide --input)")?;
            let var2 = args
                .var2
                .as_deref()
                .ok_or("--var2 is required (or provide --input)")?;
            SensitivityInput {
                deal: args.deal.to_deal(),
                variable_1: parse_sens_var(var1)?,
                variable_2: parse_sens_var(var2)?,
                output_metric: args.metric.into(),
            }
        }
    };
    let output = sensitivity::run_sensitivity(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_scenarios(args: ScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: ScenarioInput = match load_input(args.input.as_deref())? {
        Some(input) => input,
        None => ScenarioInput {
            deal: args.deal.to_deal(),
            ..ScenarioInput::default()
        },
    };
    let output = scenarios::run_scenarios(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: ComparisonInput = load_input(args.input.as_deref())?
        .ok_or("Property comparison needs --input or JSON on stdin")?;
    let output = comparison::compare_properties(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_lenders(args: LendersArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: LenderComparisonInput = match load_input(args.input.as_deref())? {
        Some(input) => input,
        None => LenderComparisonInput {
            deal: args.deal.to_deal(),
            quotes: Vec::new(),
        },
    };
    let output = lenders::compare_lenders(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_per_sqft(args: PerSqFtArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: PerSqFtInput = match load_input(args.input.as_deref())? {
        Some(input) => input,
        None => PerSqFtInput {
            deal: args.deal.to_deal(),
            square_footage: args.sqft.ok_or("--sqft is required (or provide --input)")?,
            presets: Vec::new(),
        },
    };
    let output = per_sqft::per_square_foot(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_comps(args: CompsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: CompsInput = load_input(args.input.as_deref())?
        .ok_or("Comps analysis needs --input or JSON on stdin")?;
    let output = comps::analyze_comps(&input)?;
    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_sens_var() {
        let var = parse_sens_var("arv_pct:-10:10:5").unwrap();
        assert_eq!(var.lever, SensitivityLever::ArvPct);
        assert_eq!(var.min, dec!(-10));
        assert_eq!(var.max, dec!(10));
        assert_eq!(var.step, dec!(5));

        let var = parse_sens_var("interest-rate:8:12:1").unwrap();
        assert_eq!(var.lever, SensitivityLever::InterestRate);
    }

    #[test]
    fn test_parse_sens_var_rejects_bad_specs() {
        assert!(parse_sens_var("arv_pct:-10:10").is_err());
        assert!(parse_sens_var("square_feet:1:2:1").is_err());
        assert!(parse_sens_var("rehab_pct:a:10:5").is_err());
    }
}
