pub mod analytic;
pub mod binomial;
pub mod hedging;

use clap::ValueEnum;
use derivlab_core::{ExerciseStyle, OptionType};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OptionTypeArg {
    Call,
    Put,
}

impl From<OptionTypeArg> for OptionType {
    fn from(arg: OptionTypeArg) -> Self {
        match arg {
            OptionTypeArg::Call => OptionType::Call,
            OptionTypeArg::Put => OptionType::Put,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExerciseStyleArg {
    European,
    American,
}

impl From<ExerciseStyleArg> for ExerciseStyle {
    fn from(arg: ExerciseStyleArg) -> Self {
        match arg {
            ExerciseStyleArg::European => ExerciseStyle::European,
            ExerciseStyleArg::American => ExerciseStyle::American,
        }
    }
}

/// Unwrap a flag that is mandatory when no JSON request was supplied.
pub(crate) fn required<T>(value: Option<T>, flag: &str) -> Result<T, Box<dyn std::error::Error>> {
    value.ok_or_else(|| format!("{flag} is required when no --input file or stdin is given").into())
}
