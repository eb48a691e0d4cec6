mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::analytic::BlackScholesArgs;
use commands::binomial::BinomialArgs;
use commands::hedging::FuturesHedgeArgs;

/// Derivative pricing calculators with decimal precision
#[derive(Parser)]
#[command(
    name = "derivlab",
    version,
    about = "Binomial option trees, Black-Scholes Greeks and futures hedge ratios",
    long_about = "A CLI for derivative pricing with decimal precision. Prices European and \
                  American options on a recombining binomial lattice with every node's \
                  intermediate values, evaluates Black-Scholes prices and Greeks, and sizes \
                  naive or minimum-variance futures hedges."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log pipeline stages to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Price an option on a recombining binomial lattice
    Binomial(BinomialArgs),
    /// Black-Scholes price and Greeks
    BlackScholes(BlackScholesArgs),
    /// Futures hedge ratio and contract count
    FuturesHedge(FuturesHedgeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Binomial(args) => commands::binomial::run_binomial(args),
        Commands::BlackScholes(args) => commands::analytic::run_black_scholes(args),
        Commands::FuturesHedge(args) => commands::hedging::run_futures_hedge(args),
        Commands::Version => {
            println!("derivlab {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binomial_flags() {
        let cli = Cli::try_parse_from([
            "derivlab", "--output", "table", "binomial", "--spot", "100", "--strike", "100",
            "--up", "1.2", "--down", "0.8", "--rate", "0.05", "--option-type", "put",
            "--exercise", "american",
        ])
        .unwrap();
        assert!(matches!(cli.output, OutputFormat::Table));
        match cli.command {
            Commands::Binomial(args) => {
                assert_eq!(args.periods, 2);
                assert!(matches!(args.exercise, commands::ExerciseStyleArg::American));
            }
            _ => panic!("expected binomial subcommand"),
        }
    }

    #[test]
    fn test_parse_hedge_defaults() {
        let cli = Cli::try_parse_from([
            "derivlab", "futures-hedge", "--spot-value", "1000000", "--futures-price", "300",
        ])
        .unwrap();
        match cli.command {
            Commands::FuturesHedge(args) => {
                assert_eq!(args.multiplier, rust_decimal::Decimal::from(250_000));
            }
            _ => panic!("expected futures-hedge subcommand"),
        }
    }
}
