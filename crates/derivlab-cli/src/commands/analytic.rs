use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use derivlab_core::analytic::black_scholes::{self, BlackScholesInput};

use super::{required, OptionTypeArg};
use crate::input;

/// Arguments for Black-Scholes pricing and Greeks
#[derive(Args)]
pub struct BlackScholesArgs {
    /// Path to JSON input file (overrides the flags below)
    #[arg(long)]
    pub input: Option<String>,

    /// Spot price S
    #[arg(long)]
    pub spot: Option<Decimal>,

    /// Strike price K
    #[arg(long)]
    pub strike: Option<Decimal>,

    /// Time to expiry in years
    #[arg(long)]
    pub expiry: Option<Decimal>,

    /// Annual risk-free rate as a decimal (0.05 = 5%)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Annual volatility as a decimal (0.20 = 20%)
    #[arg(long)]
    pub vol: Option<Decimal>,

    /// Option type
    #[arg(long, value_enum, default_value = "call")]
    pub option_type: OptionTypeArg,
}

fn from_flags(args: &BlackScholesArgs) -> Result<BlackScholesInput, Box<dyn std::error::Error>> {
    Ok(BlackScholesInput {
        spot_price: required(args.spot, "--spot")?,
        strike_price: required(args.strike, "--strike")?,
        time_to_expiry: required(args.expiry, "--expiry")?,
        risk_free_rate: required(args.rate, "--rate")?,
        volatility: required(args.vol, "--vol")?,
        option_type: args.option_type.into(),
    })
}

pub fn run_black_scholes(args: BlackScholesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bs_input = if args.input.is_none() && args.spot.is_some() {
        from_flags(&args)?
    } else {
        match input::read_request::<BlackScholesInput>(args.input.as_deref())? {
            Some(request) => request,
            None => from_flags(&args)?,
        }
    };
    info!(option_type = ?bs_input.option_type, "pricing black-scholes");
    let result = black_scholes::price_black_scholes(&bs_input)?;
    Ok(serde_json::to_value(result)?)
}
