mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analysis::{
    BreakEvenArgs, CompareArgs, CompsArgs, LendersArgs, PerSqFtArgs, ScenariosArgs,
    SensitivityArgs, WhatIfArgs,
};
use commands::deal::{AnalyzeArgs, DefaultsArgs};
use commands::exit::{BrrrrArgs, ExitsArgs, WholesaleArgs};

/// Fix & flip deal analysis
#[derive(Parser)]
#[command(
    name = "flipcalc",
    version,
    about = "Fix & flip deal analysis with decimal precision",
    long_about = "A CLI for evaluating fix & flip real estate deals with decimal precision. \
                  Computes financing, holding, selling and cash-needed economics, and runs \
                  break-even, sensitivity, scenario, lender and exit strategy analyses."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a deal: financing, holding, selling, cash needed and returns
    Analyze(AnalyzeArgs),
    /// Print the default deal assumptions as JSON
    Defaults(DefaultsArgs),
    /// Solve break-even ARV, target-profit ARV and maximum purchase price
    BreakEven(BreakEvenArgs),
    /// Re-run a deal with ARV, rehab and holding adjustments
    WhatIf(WhatIfArgs),
    /// Two-variable sensitivity grid over deal levers
    Sensitivity(SensitivityArgs),
    /// Probability-weighted pessimistic / base / optimistic scenarios
    Scenarios(ScenariosArgs),
    /// Compare several properties side by side
    Compare(CompareArgs),
    /// Compare lender quotes on the same deal
    Lenders(LendersArgs),
    /// Per-square-foot metrics and rehab tier estimates
    PerSqft(PerSqFtArgs),
    /// Derive and check ARV from comparable sales
    Comps(CompsArgs),
    /// Buy, rehab, rent, refinance, repeat analysis
    Brrrr(BrrrrArgs),
    /// Wholesale assignment / double-close analysis
    Wholesale(WholesaleArgs),
    /// Compare flip, BRRRR and wholesale exits
    Exits(ExitsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::deal::run_analyze(args),
        Commands::Defaults(args) => commands::deal::run_defaults(args),
        Commands::BreakEven(args) => commands::analysis::run_break_even(args),
        Commands::WhatIf(args) => commands::analysis::run_what_if(args),
        Commands::Sensitivity(args) => commands::analysis::run_sensitivity(args),
        Commands::Scenarios(args) => commands::analysis::run_scenarios(args),
        Commands::Compare(args) => commands::analysis::run_compare(args),
        Commands::Lenders(args) => commands::analysis::run_lenders(args),
        Commands::PerSqft(args) => commands::analysis::run_per_sqft(args),
        Commands::Comps(args) => commands::analysis::run_comps(args),
        Commands::Brrrr(args) => commands::exit::run_brrrr(args),
        Commands::Wholesale(args) => commands::exit::run_wholesale(args),
        Commands::Exits(args) => commands::exit::run_exits(args),
        Commands::Version => {
            println!("flipcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {:?}", e);
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
