use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use auction_payments_core::lot::check_magnitude;
use auction_payments_core::report::PaymentSessionInput;
use auction_payments_core::{Config, Lot};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Deserialize)]
struct LotRequest {
    lot: Lot,
    #[serde(default)]
    config: Config,
}

/// Parse a single-lot request and reject amounts beyond the decimal range.
fn parse_lot_request(input_json: &str) -> NapiResult<LotRequest> {
    let input: LotRequest = serde_json::from_str(input_json).map_err(to_napi_error)?;
    check_magnitude(std::slice::from_ref(&input.lot), &input.config).map_err(to_napi_error)?;
    Ok(input)
}

/// Parse a session request and reject amounts beyond the decimal range.
fn parse_session(input_json: &str) -> NapiResult<PaymentSessionInput> {
    let input: PaymentSessionInput = serde_json::from_str(input_json).map_err(to_napi_error)?;
    check_magnitude(&input.lots, &input.config).map_err(to_napi_error)?;
    Ok(input)
}

// ---------------------------------------------------------------------------
// Per lot
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_lot(input_json: String) -> NapiResult<String> {
    let input = parse_lot_request(&input_json)?;
    let output = auction_payments_core::lot::calculate_lot(&input.lot, &input.config);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_lot_breakdown(input_json: String) -> NapiResult<String> {
    let input = parse_lot_request(&input_json)?;
    let output =
        auction_payments_core::breakdown::calculate_lot_breakdown(&input.lot, &input.config);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_summary(input_json: String) -> NapiResult<String> {
    let input = parse_session(&input_json)?;
    let output = auction_payments_core::summary::calculate_summary(&input.lots, &input.config);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_breakdown_table(input_json: String) -> NapiResult<String> {
    let input = parse_session(&input_json)?;
    let output =
        auction_payments_core::breakdown::build_breakdown_table(&input.lots, &input.config);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_payment_report(input_json: String) -> NapiResult<String> {
    let input: PaymentSessionInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = auction_payments_core::report::compute_payment_report(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
