use napi::{Result as NapiResult, Status};
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use purchase_power_core::policy::PolicyConfig;
use purchase_power_core::purchase_power::calculator::{
    analyze_purchase_power, analyze_purchase_power_with_policy,
};
use purchase_power_core::purchase_power::input::CalculationInput;
use purchase_power_core::{validate_rate, LoanTerm, PurchasePowerError};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Caller mistakes surface as `InvalidArg` so the route can answer 400.
fn core_error(e: PurchasePowerError) -> napi::Error {
    if e.is_caller_error() {
        napi::Error::new(Status::InvalidArg, e.to_string())
    } else {
        to_napi_error(e)
    }
}

fn parse_input<T: serde::de::DeserializeOwned>(json: &str) -> NapiResult<T> {
    serde_json::from_str(json).map_err(|e| napi::Error::new(Status::InvalidArg, e.to_string()))
}

// ---------------------------------------------------------------------------
// Purchase power
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_purchase_power(input_json: String) -> NapiResult<String> {
    let input: CalculationInput = parse_input(&input_json)?;
    let output = analyze_purchase_power(&input).map_err(core_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_purchase_power_with_policy(
    input_json: String,
    policy_json: String,
) -> NapiResult<String> {
    let input: CalculationInput = parse_input(&input_json)?;
    let policy: PolicyConfig = parse_input(&policy_json)?;
    let output = analyze_purchase_power_with_policy(&input, &policy).map_err(core_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn validate_purchase_input(input_json: String) -> NapiResult<()> {
    let input: CalculationInput = parse_input(&input_json)?;
    input.validate(&PolicyConfig::default()).map_err(core_error)
}

#[napi]
pub fn default_policy() -> NapiResult<String> {
    serde_json::to_string(&PolicyConfig::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Leaf calculators
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct AcquisitionTaxRequest {
    price: Decimal,
    #[serde(default)]
    first_time_buyer: bool,
}

#[napi]
pub fn acquisition_tax(input_json: String) -> NapiResult<String> {
    let req: AcquisitionTaxRequest = parse_input(&input_json)?;
    let policy = PolicyConfig::default();
    let breakdown = purchase_power_core::tax::acquisition::calculate_acquisition_tax(
        req.price.max(Decimal::ZERO),
        req.first_time_buyer,
        &policy.acquisition_tax,
    );
    serde_json::to_string(&breakdown).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct DsrRequest {
    annual_income: Decimal,
    loan_term: LoanTerm,
    interest_rate: Decimal,
}

#[napi]
pub fn dsr_limit(input_json: String) -> NapiResult<String> {
    let req: DsrRequest = parse_input(&input_json)?;
    validate_rate("interest_rate", req.interest_rate).map_err(core_error)?;
    let policy = PolicyConfig::default();
    let limit = purchase_power_core::lending::dsr::dsr_limit(
        req.annual_income,
        req.loan_term,
        req.interest_rate,
        &policy.dsr,
    );
    serde_json::to_string(&limit).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Presentation helpers
// ---------------------------------------------------------------------------

/// `"45000"` → `"4.5억"`; amounts are strings to keep decimal precision.
#[napi]
pub fn format_price(amount: String) -> NapiResult<String> {
    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|e| napi::Error::new(Status::InvalidArg, format!("invalid amount: {e}")))?;
    Ok(purchase_power_core::format_price(amount))
}
