use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use flipcalc_core::analysis;
use flipcalc_core::deal::{self, DealAssumptions};
use flipcalc_core::exit;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_decimal(name: &str, value: &str) -> NapiResult<Decimal> {
    Decimal::from_str(value.trim())
        .map_err(|e| napi::Error::from_reason(format!("{}: {}", name, e)))
}

// ---------------------------------------------------------------------------
// Deal
// ---------------------------------------------------------------------------

#[napi]
pub fn default_deal() -> NapiResult<String> {
    serde_json::to_string(&DealAssumptions::default()).map_err(to_napi_error)
}

/// Raw deal results without the envelope; invalid deals yield all zeros.
#[napi]
pub fn compute_deal_economics(input_json: String) -> NapiResult<String> {
    let input: DealAssumptions = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal::compute_deal_economics(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_deal(input_json: String) -> NapiResult<String> {
    let input: DealAssumptions = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal::analyze_deal(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Quick 70% rule screen from price, rehab and ARV given as decimal strings.
#[napi]
pub fn seventy_percent_rule(purchase_price: String, rehab: String, arv: String) -> NapiResult<String> {
    let output = deal::seventy_percent_rule(
        parse_decimal("purchase_price", &purchase_price)?,
        parse_decimal("rehab", &rehab)?,
        parse_decimal("arv", &arv)?,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn break_even(input_json: String) -> NapiResult<String> {
    let input: analysis::break_even::BreakEvenInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::break_even::solve_break_even(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn what_if(input_json: String) -> NapiResult<String> {
    let input: analysis::sensitivity::WhatIfInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::sensitivity::run_what_if(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sensitivity(input_json: String) -> NapiResult<String> {
    let input: analysis::sensitivity::SensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::sensitivity::run_sensitivity(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn scenarios(input_json: String) -> NapiResult<String> {
    let input: analysis::scenarios::ScenarioInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::scenarios::run_scenarios(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_properties(input_json: String) -> NapiResult<String> {
    let input: analysis::comparison::ComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::comparison::compare_properties(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_lenders(input_json: String) -> NapiResult<String> {
    let input: analysis::lenders::LenderComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::lenders::compare_lenders(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn per_square_foot(input_json: String) -> NapiResult<String> {
    let input: analysis::per_sqft::PerSqFtInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::per_sqft::per_square_foot(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_comps(input_json: String) -> NapiResult<String> {
    let input: analysis::comps::CompsInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::comps::analyze_comps(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Exit strategies
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_brrrr(input_json: String) -> NapiResult<String> {
    let input: exit::brrrr::BrrrrInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = exit::brrrr::analyze_brrrr(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_wholesale(input_json: String) -> NapiResult<String> {
    let input: exit::wholesale::WholesaleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = exit::wholesale::analyze_wholesale(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_exit_strategies(input_json: String) -> NapiResult<String> {
    let input: exit::comparison::ExitComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = exit::comparison::compare_exit_strategies(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
