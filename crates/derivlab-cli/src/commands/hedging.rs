use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use derivlab_core::hedging::futures::{self, FuturesHedgeInput, HedgeMethod};

use super::required;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HedgeMethodArg {
    Naive,
    MinimumVariance,
}

impl From<HedgeMethodArg> for HedgeMethod {
    fn from(arg: HedgeMethodArg) -> Self {
        match arg {
            HedgeMethodArg::Naive => HedgeMethod::Naive,
            HedgeMethodArg::MinimumVariance => HedgeMethod::MinimumVariance,
        }
    }
}

/// Arguments for futures hedge sizing
#[derive(Args)]
pub struct FuturesHedgeArgs {
    /// Path to JSON input file (overrides the flags below)
    #[arg(long)]
    pub input: Option<String>,

    /// Hedge ratio method
    #[arg(long, value_enum, default_value = "naive")]
    pub method: HedgeMethodArg,

    /// Value of the spot position
    #[arg(long)]
    pub spot_value: Option<Decimal>,

    /// Futures price
    #[arg(long)]
    pub futures_price: Option<Decimal>,

    /// Contract multiplier (currency units per index point)
    #[arg(long, default_value = "250000")]
    pub multiplier: Decimal,

    /// Standard deviation of spot price changes (minimum variance)
    #[arg(long)]
    pub spot_std_dev: Option<Decimal>,

    /// Standard deviation of futures price changes (minimum variance)
    #[arg(long)]
    pub futures_std_dev: Option<Decimal>,

    /// Spot/futures correlation in [-1, 1] (minimum variance)
    #[arg(long, allow_hyphen_values = true)]
    pub correlation: Option<Decimal>,
}

fn from_flags(args: &FuturesHedgeArgs) -> Result<FuturesHedgeInput, Box<dyn std::error::Error>> {
    Ok(FuturesHedgeInput {
        hedge_method: args.method.into(),
        spot_value: required(args.spot_value, "--spot-value")?,
        futures_price: required(args.futures_price, "--futures-price")?,
        contract_multiplier: args.multiplier,
        spot_std_dev: args.spot_std_dev,
        futures_std_dev: args.futures_std_dev,
        correlation: args.correlation,
    })
}

pub fn run_futures_hedge(args: FuturesHedgeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let hedge_input = if args.input.is_none() && args.spot_value.is_some() {
        from_flags(&args)?
    } else {
        match input::read_request::<FuturesHedgeInput>(args.input.as_deref())? {
            Some(request) => request,
            None => from_flags(&args)?,
        }
    };
    info!(method = ?hedge_input.hedge_method, "sizing futures hedge");
    let result = futures::calculate_futures_hedge(&hedge_input)?;
    Ok(serde_json::to_value(result)?)
}
