use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Binomial lattice
// ---------------------------------------------------------------------------

#[napi]
pub fn price_binomial(input_json: String) -> NapiResult<String> {
    let input: derivlab_core::binomial::BinomialInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = derivlab_core::binomial::price_binomial(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Black-Scholes
// ---------------------------------------------------------------------------

#[napi]
pub fn price_black_scholes(input_json: String) -> NapiResult<String> {
    let input: derivlab_core::analytic::black_scholes::BlackScholesInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = derivlab_core::analytic::black_scholes::price_black_scholes(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Futures hedging
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_futures_hedge(input_json: String) -> NapiResult<String> {
    let input: derivlab_core::hedging::futures::FuturesHedgeInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = derivlab_core::hedging::futures::calculate_futures_hedge(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
