use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, OptionType};

/// Immediate-exercise value: `max(S - K, 0)` for a call, `max(K - S, 0)` for a put.
pub fn intrinsic_value(spot: Money, strike: Money, option_type: OptionType) -> Money {
    match option_type {
        OptionType::Call => (spot - strike).max(Decimal::ZERO),
        OptionType::Put => (strike - spot).max(Decimal::ZERO),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Moneyness {
    #[serde(rename = "ITM")]
    InTheMoney,
    #[serde(rename = "ATM")]
    AtTheMoney,
    #[serde(rename = "OTM")]
    OutOfTheMoney,
}

/// Moneyness with a 1% at-the-money band around the strike.
pub fn classify_moneyness(spot: Money, strike: Money, option_type: OptionType) -> Moneyness {
    let ratio = spot / strike;
    let atm_lo = dec!(0.99);
    let atm_hi = dec!(1.01);
    if ratio >= atm_lo && ratio <= atm_hi {
        return Moneyness::AtTheMoney;
    }
    let spot_above = ratio > atm_hi;
    match (option_type, spot_above) {
        (OptionType::Call, true) | (OptionType::Put, false) => Moneyness::InTheMoney,
        _ => Moneyness::OutOfTheMoney,
    }
}
