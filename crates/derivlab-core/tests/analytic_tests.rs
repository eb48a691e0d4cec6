use derivlab_core::analytic::black_scholes::{self, BlackScholesInput};
use derivlab_core::binomial::{price_binomial, BinomialInput};
use derivlab_core::math::{exp_decimal, sqrt_decimal};
use derivlab_core::{ExerciseStyle, OptionType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn bs_input(option_type: OptionType) -> BlackScholesInput {
    BlackScholesInput {
        spot_price: dec!(100),
        strike_price: dec!(100),
        time_to_expiry: dec!(1),
        risk_free_rate: dec!(0.05),
        volatility: dec!(0.20),
        option_type,
    }
}

/// Cox-Ross-Rubinstein factors for the same market as `bs_input`.
fn crr_input(option_type: OptionType, exercise_style: ExerciseStyle, periods: u32) -> BinomialInput {
    let dt = Decimal::ONE / Decimal::from(periods);
    let up = exp_decimal(dec!(0.20) * sqrt_decimal(dt));
    BinomialInput {
        spot_price: dec!(100),
        strike_price: dec!(100),
        up_factor: up,
        down_factor: Decimal::ONE / up,
        risk_free_rate: dec!(0.05) * dt,
        periods,
        option_type,
        exercise_style,
    }
}

#[test]
fn test_crr_lattice_converges_to_black_scholes() {
    for option_type in [OptionType::Call, OptionType::Put] {
        let analytic = black_scholes::price_black_scholes(&bs_input(option_type))
            .unwrap()
            .result
            .price;
        let lattice = price_binomial(&crr_input(option_type, ExerciseStyle::European, 100))
            .unwrap()
            .result
            .price;
        assert!(
            (analytic - lattice).abs() < dec!(0.1),
            "{option_type:?}: lattice {lattice} vs black-scholes {analytic}"
        );
    }
}

#[test]
fn test_american_put_premium_over_black_scholes() {
    let european = black_scholes::price_black_scholes(&bs_input(OptionType::Put))
        .unwrap()
        .result
        .price;
    let out = price_binomial(&crr_input(OptionType::Put, ExerciseStyle::American, 100)).unwrap();
    // Early exercise premium for this market is roughly 0.5
    assert!(out.result.price > european);
    assert!(!out.result.early_exercise_nodes.is_empty());
    assert!(out.result.arbitrage_free);
}
