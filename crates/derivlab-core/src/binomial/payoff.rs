use crate::payoff::intrinsic_value;
use crate::types::{Money, OptionType};

/// Option values on the maturity layer; the boundary condition that seeds
/// backward induction.
pub fn terminal_payoff(terminal_prices: &[Money], strike: Money, option_type: OptionType) -> Vec<Money> {
    terminal_prices
        .iter()
        .map(|&price| intrinsic_value(price, strike, option_type))
        .collect()
}
