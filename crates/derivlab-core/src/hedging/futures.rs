//! Futures hedge sizing.
//!
//! - **Naive**: hedge the full spot value one-for-one (h = 1)
//! - **Minimum variance**: h* = rho * sigma_S / sigma_F
//!
//! Contracts required: h * S / (F * M), where F * M is the notional of one
//! futures contract.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::DerivLabError;
use crate::types::*;
use crate::DerivLabResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HedgeMethod {
    #[default]
    Naive,
    MinimumVariance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuturesHedgeInput {
    #[serde(default)]
    pub hedge_method: HedgeMethod,
    /// Value of the spot position being hedged.
    pub spot_value: Money,
    /// Quoted futures price.
    pub futures_price: Money,
    /// Currency units per index point of one contract.
    #[serde(default = "default_multiplier")]
    pub contract_multiplier: Decimal,
    /// Standard deviation of spot price changes (minimum variance only).
    pub spot_std_dev: Option<Decimal>,
    /// Standard deviation of futures price changes (minimum variance only).
    pub futures_std_dev: Option<Decimal>,
    /// Correlation between spot and futures changes (minimum variance only).
    pub correlation: Option<Decimal>,
}

fn default_multiplier() -> Decimal {
    dec!(250000)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuturesHedgeOutput {
    pub hedge_method: HedgeMethod,
    pub hedge_ratio: Decimal,
    /// F * M
    pub contract_value: Money,
    /// Unrounded contract count.
    pub contracts: Decimal,
    /// Contract count rounded half away from zero.
    pub rounded_contracts: Decimal,
    /// rounded_contracts * contract_value
    pub hedged_value: Money,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &FuturesHedgeInput) -> DerivLabResult<()> {
    if input.spot_value <= Decimal::ZERO {
        return Err(DerivLabError::invalid("spot_value", "must be positive"));
    }
    if input.futures_price <= Decimal::ZERO {
        return Err(DerivLabError::invalid("futures_price", "must be positive"));
    }
    if input.contract_multiplier <= Decimal::ZERO {
        return Err(DerivLabError::invalid("contract_multiplier", "must be positive"));
    }
    Ok(())
}

/// Pull the three minimum-variance statistics out of the input, checking each.
fn minimum_variance_inputs(input: &FuturesHedgeInput) -> DerivLabResult<(Decimal, Decimal, Decimal)> {
    let sigma_s = match input.spot_std_dev {
        Some(v) if v > Decimal::ZERO => v,
        _ => {
            return Err(DerivLabError::invalid(
                "spot_std_dev",
                "required and must be positive for minimum variance hedging",
            ))
        }
    };
    let sigma_f = match input.futures_std_dev {
        Some(v) if v > Decimal::ZERO => v,
        _ => {
            return Err(DerivLabError::invalid(
                "futures_std_dev",
                "required and must be positive for minimum variance hedging",
            ))
        }
    };
    let rho = match input.correlation {
        Some(v) if v >= -Decimal::ONE && v <= Decimal::ONE => v,
        _ => {
            return Err(DerivLabError::invalid(
                "correlation",
                "required and must lie in [-1, 1] for minimum variance hedging",
            ))
        }
    };
    Ok((sigma_s, sigma_f, rho))
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn calculate_futures_hedge(
    input: &FuturesHedgeInput,
) -> DerivLabResult<ComputationOutput<FuturesHedgeOutput>> {
    let start = Instant::now();
    validate_input(input)?;

    let contract_value = input.futures_price * input.contract_multiplier;

    let (hedge_ratio, assumptions) = match input.hedge_method {
        HedgeMethod::Naive => (
            Decimal::ONE,
            serde_json::json!({
                "method": "naive (1:1)",
                "contract_multiplier": input.contract_multiplier.to_string(),
            }),
        ),
        HedgeMethod::MinimumVariance => {
            let (sigma_s, sigma_f, rho) = minimum_variance_inputs(input)?;
            (
                rho * sigma_s / sigma_f,
                serde_json::json!({
                    "method": "minimum variance (rho * sigma_S / sigma_F)",
                    "contract_multiplier": input.contract_multiplier.to_string(),
                    "spot_std_dev": sigma_s.to_string(),
                    "futures_std_dev": sigma_f.to_string(),
                    "correlation": rho.to_string(),
                }),
            )
        }
    };

    let contracts = hedge_ratio * input.spot_value / contract_value;
    let rounded_contracts = contracts.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let hedged_value = rounded_contracts * contract_value;
    debug!(%hedge_ratio, %contracts, "futures hedge sized");

    let mut warnings = Vec::new();
    if rounded_contracts.is_zero() {
        warnings.push("Position is smaller than half a contract; no contracts after rounding".into());
    }
    if hedge_ratio < Decimal::ZERO {
        warnings.push("Negative hedge ratio: hedge by buying futures rather than selling".into());
    }

    let output = FuturesHedgeOutput {
        hedge_method: input.hedge_method,
        hedge_ratio,
        contract_value,
        contracts,
        rounded_contracts,
        hedged_value,
    };

    let methodology = match input.hedge_method {
        HedgeMethod::Naive => "Naive futures hedge",
        HedgeMethod::MinimumVariance => "Minimum variance futures hedge",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, &assumptions, warnings, elapsed, output))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
