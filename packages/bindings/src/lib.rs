//! Node bindings for the report pages and PDF exporters. Every function takes
//! and returns JSON strings so the JavaScript side never handles Decimal.

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use roi_engine_core::comparison::compare::{self, ComparisonInput};
use roi_engine_core::{AssumptionConfig, PropertyInputs};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_assumptions(assumptions_json: Option<String>) -> NapiResult<AssumptionConfig> {
    match assumptions_json {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(&json).map_err(to_napi_error)
        }
        _ => Ok(AssumptionConfig::default()),
    }
}

fn parse_decimal(value: &str) -> NapiResult<Decimal> {
    Decimal::from_str(value.trim()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Raw engine output for already-validated inputs.
#[napi]
pub fn calculate_roi(input_json: String) -> NapiResult<String> {
    let input: PropertyInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = roi_engine_core::calculate_roi(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Validated analysis wrapped with warnings and metadata.
#[napi]
pub fn analyze_property(
    input_json: String,
    assumptions_json: Option<String>,
) -> NapiResult<String> {
    let input: PropertyInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let assumptions = parse_assumptions(assumptions_json)?;
    let output =
        roi_engine_core::analyze_property(&input, &assumptions).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_properties(input_json: String) -> NapiResult<String> {
    let input: ComparisonInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = compare::compare_properties(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Amount as a decimal string, e.g. "1234567" → "AED 1,234,567".
#[napi]
pub fn format_currency(amount: String) -> NapiResult<String> {
    Ok(roi_engine_core::format_currency(parse_decimal(&amount)?))
}

/// Percent as a decimal string, e.g. "6.5" → "6.50%".
#[napi]
pub fn format_percent(value: String) -> NapiResult<String> {
    Ok(roi_engine_core::format_percent(parse_decimal(&value)?))
}
