use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::DerivLabError;
use crate::math::{exp_decimal, ln_decimal, norm_cdf, norm_pdf, sqrt_decimal};
use crate::payoff::{classify_moneyness, intrinsic_value, Moneyness};
use crate::types::*;
use crate::DerivLabResult;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackScholesInput {
    pub spot_price: Money,
    pub strike_price: Money,
    pub time_to_expiry: Years,
    pub risk_free_rate: Rate,
    pub volatility: Rate,
    #[serde(default)]
    pub option_type: OptionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionGreeks {
    pub delta: Decimal,
    pub gamma: Decimal,
    /// Per calendar day
    pub theta: Decimal,
    /// Per 1 vol point
    pub vega: Decimal,
    /// Per 1% rate move
    pub rho: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackScholesOutput {
    pub price: Money,
    pub greeks: OptionGreeks,
    pub d1: Decimal,
    pub d2: Decimal,
    /// N(d1)
    pub nd1: Decimal,
    /// N(d2)
    pub nd2: Decimal,
    /// phi(d1), the standard normal density
    pub pdf_d1: Decimal,
    /// e^(-rT)
    pub discount_factor: Decimal,
    pub intrinsic_value: Money,
    pub time_value: Money,
    pub moneyness: Moneyness,
    pub breakeven: Money,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &BlackScholesInput) -> DerivLabResult<()> {
    if input.spot_price <= Decimal::ZERO {
        return Err(DerivLabError::invalid("spot_price", "must be positive"));
    }
    if input.strike_price <= Decimal::ZERO {
        return Err(DerivLabError::invalid("strike_price", "must be positive"));
    }
    if input.time_to_expiry <= Decimal::ZERO {
        return Err(DerivLabError::invalid("time_to_expiry", "must be positive"));
    }
    if input.volatility <= Decimal::ZERO {
        return Err(DerivLabError::invalid("volatility", "must be positive"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Black-Scholes internals
// ---------------------------------------------------------------------------

struct BsParams {
    d1: Decimal,
    d2: Decimal,
    sqrt_t: Decimal,
    exp_neg_rt: Decimal,
}

fn compute_bs_params(s: Decimal, k: Decimal, t: Decimal, r: Decimal, sigma: Decimal) -> BsParams {
    let sqrt_t = sqrt_decimal(t);
    let sigma_sqrt_t = sigma * sqrt_t;
    let d1 = (ln_decimal(s / k) + (r + sigma * sigma / dec!(2)) * t) / sigma_sqrt_t;
    let d2 = d1 - sigma_sqrt_t;
    BsParams {
        d1,
        d2,
        sqrt_t,
        exp_neg_rt: exp_decimal(-r * t),
    }
}

fn bs_price(s: Decimal, k: Decimal, params: &BsParams, option_type: OptionType) -> Decimal {
    match option_type {
        OptionType::Call => s * norm_cdf(params.d1) - k * params.exp_neg_rt * norm_cdf(params.d2),
        OptionType::Put => k * params.exp_neg_rt * norm_cdf(-params.d2) - s * norm_cdf(-params.d1),
    }
}

fn compute_greeks(
    s: Decimal,
    k: Decimal,
    t: Decimal,
    r: Decimal,
    sigma: Decimal,
    params: &BsParams,
    option_type: OptionType,
) -> OptionGreeks {
    let nd1 = norm_pdf(params.d1);
    let sigma_sqrt_t = sigma * params.sqrt_t;

    let delta = match option_type {
        OptionType::Call => norm_cdf(params.d1),
        OptionType::Put => norm_cdf(params.d1) - Decimal::ONE,
    };

    let gamma = nd1 / (s * sigma_sqrt_t);

    // Decay term shared by calls and puts, then the carry term
    let decay = -(s * nd1 * sigma) / (dec!(2) * params.sqrt_t);
    let carry = match option_type {
        OptionType::Call => -r * k * params.exp_neg_rt * norm_cdf(params.d2),
        OptionType::Put => r * k * params.exp_neg_rt * norm_cdf(-params.d2),
    };
    let theta = (decay + carry) / dec!(365);

    let vega = s * nd1 * params.sqrt_t / dec!(100);

    let rho = match option_type {
        OptionType::Call => k * t * params.exp_neg_rt * norm_cdf(params.d2) / dec!(100),
        OptionType::Put => -k * t * params.exp_neg_rt * norm_cdf(-params.d2) / dec!(100),
    };

    OptionGreeks {
        delta,
        gamma,
        theta,
        vega,
        rho,
    }
}

fn breakeven(k: Decimal, premium: Decimal, option_type: OptionType) -> Decimal {
    match option_type {
        OptionType::Call => k + premium,
        OptionType::Put => k - premium,
    }
}

// ---------------------------------------------------------------------------
// Public API: price_black_scholes
// ---------------------------------------------------------------------------

pub fn price_black_scholes(
    input: &BlackScholesInput,
) -> DerivLabResult<ComputationOutput<BlackScholesOutput>> {
    let start = Instant::now();
    validate_input(input)?;

    let s = input.spot_price;
    let k = input.strike_price;
    let t = input.time_to_expiry;
    let r = input.risk_free_rate;
    let sigma = input.volatility;

    let params = compute_bs_params(s, k, t, r, sigma);
    let price = bs_price(s, k, &params, input.option_type);
    let greeks = compute_greeks(s, k, t, r, sigma, &params, input.option_type);
    debug!(%price, d1 = %params.d1, d2 = %params.d2, "black-scholes evaluated");

    let iv = intrinsic_value(s, k, input.option_type);
    let output = BlackScholesOutput {
        price,
        greeks,
        d1: params.d1,
        d2: params.d2,
        nd1: norm_cdf(params.d1),
        nd2: norm_cdf(params.d2),
        pdf_d1: norm_pdf(params.d1),
        discount_factor: params.exp_neg_rt,
        intrinsic_value: iv,
        time_value: price - iv,
        moneyness: classify_moneyness(s, k, input.option_type),
        breakeven: breakeven(k, price, input.option_type),
    };

    let mut warnings = Vec::new();
    if price < iv && input.option_type == OptionType::Put {
        warnings.push("European put trades below intrinsic value; early exercise would add value".into());
    }

    let assumptions = serde_json::json!({
        "model": "Black-Scholes (no dividends)",
        "risk_free_rate": r.to_string(),
        "volatility": sigma.to_string(),
        "time_to_expiry": t.to_string(),
        "normal_cdf": "Abramowitz-Stegun 26.2.17",
        "theta_convention": "per calendar day (annual / 365)",
        "vega_rho_convention": "per 1% move",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Black-Scholes (closed-form)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
