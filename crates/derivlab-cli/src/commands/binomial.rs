use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use derivlab_core::binomial::{self, BinomialInput};

use super::{required, ExerciseStyleArg, OptionTypeArg};
use crate::input;

/// Arguments for binomial tree pricing
#[derive(Args)]
pub struct BinomialArgs {
    /// Path to JSON input file (overrides the flags below)
    #[arg(long)]
    pub input: Option<String>,

    /// Spot price S0
    #[arg(long)]
    pub spot: Option<Decimal>,

    /// Strike price K
    #[arg(long)]
    pub strike: Option<Decimal>,

    /// Up factor per period (u > 1)
    #[arg(long)]
    pub up: Option<Decimal>,

    /// Down factor per period (0 < d < 1)
    #[arg(long)]
    pub down: Option<Decimal>,

    /// Continuously-compounded risk-free rate per period as a decimal (0.05 = 5%)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Number of periods
    #[arg(long, default_value = "2")]
    pub periods: u32,

    /// Option type
    #[arg(long, value_enum, default_value = "call")]
    pub option_type: OptionTypeArg,

    /// Exercise style
    #[arg(long, value_enum, default_value = "european")]
    pub exercise: ExerciseStyleArg,
}

fn from_flags(args: &BinomialArgs) -> Result<BinomialInput, Box<dyn std::error::Error>> {
    Ok(BinomialInput {
        spot_price: required(args.spot, "--spot")?,
        strike_price: required(args.strike, "--strike")?,
        up_factor: required(args.up, "--up")?,
        down_factor: required(args.down, "--down")?,
        risk_free_rate: required(args.rate, "--rate")?,
        periods: args.periods,
        option_type: args.option_type.into(),
        exercise_style: args.exercise.into(),
    })
}

pub fn run_binomial(args: BinomialArgs) -> Result<Value, Box<dyn std::error::Error>> {
    // Flags win over stdin so scripted calls never block on an open pipe
    let tree_input = if args.input.is_none() && args.spot.is_some() {
        from_flags(&args)?
    } else {
        match input::read_request::<BinomialInput>(args.input.as_deref())? {
            Some(request) => request,
            None => from_flags(&args)?,
        }
    };
    info!(
        periods = tree_input.periods,
        option_type = ?tree_input.option_type,
        exercise_style = ?tree_input.exercise_style,
        "pricing binomial tree"
    );
    let result = binomial::price_binomial(&tree_input)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn flag_args() -> BinomialArgs {
        BinomialArgs {
            input: None,
            spot: Some(dec!(100)),
            strike: Some(dec!(100)),
            up: Some(dec!(1.2)),
            down: Some(dec!(0.8)),
            rate: Some(dec!(0.05)),
            periods: 2,
            option_type: OptionTypeArg::Put,
            exercise: ExerciseStyleArg::American,
        }
    }

    #[test]
    fn test_run_from_flags() {
        let value = run_binomial(flag_args()).unwrap();
        let result = &value["result"];
        assert_eq!(result["nodes"].as_array().unwrap().len(), 6);
        assert_eq!(result["early_exercise_nodes"][0]["step"], 1);
        assert_eq!(result["inputs"]["exercise_style"], "american");
    }

    #[test]
    fn test_missing_flag_reported() {
        let args = BinomialArgs {
            down: None,
            ..flag_args()
        };
        let err = from_flags(&args).unwrap_err();
        assert!(err.to_string().contains("--down"));
    }

    #[test]
    fn test_invalid_factor_propagates() {
        let args = BinomialArgs {
            up: Some(dec!(0.9)),
            ..flag_args()
        };
        let err = run_binomial(args).unwrap_err();
        assert!(err.to_string().contains("up_factor"));
    }
}
