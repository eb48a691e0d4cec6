use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::induction::{backward_induction, risk_neutral_probability};
use super::lattice::{build_stock_lattice, Lattice};
use super::payoff::terminal_payoff;
use crate::error::DerivLabError;
use crate::math::{exp_decimal, safe_sub, DECIMAL_CAP};
use crate::types::*;
use crate::DerivLabResult;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinomialInput {
    pub spot_price: Money,
    pub strike_price: Money,
    /// Per-period up move, must exceed 1
    pub up_factor: Factor,
    /// Per-period down move, in (0, 1)
    pub down_factor: Factor,
    /// Continuously-compounded rate per period, as a decimal
    pub risk_free_rate: Rate,
    /// Number of periods. Node prices carry 28 decimal places, so once
    /// `d^n` or `u^n` leaves that range the deepest nodes collapse onto each
    /// other (or to zero, or to `Decimal::MAX`); `price_binomial` warns when
    /// that happens.
    #[serde(default = "default_periods")]
    pub periods: u32,
    #[serde(default)]
    pub option_type: OptionType,
    #[serde(default)]
    pub exercise_style: ExerciseStyle,
}

fn default_periods() -> u32 {
    2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIndex {
    pub step: usize,
    pub node: usize,
}

/// One lattice node with every intermediate a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDetail {
    pub step: usize,
    pub node: usize,
    pub up_moves: usize,
    pub down_moves: usize,
    pub stock_price: Money,
    pub option_value: Money,
    /// Discounted continuation value; absent at maturity
    pub hold_value: Option<Money>,
    pub exercise_value: Money,
    pub early_exercise: bool,
}

/// Frozen result of one binomial calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinomialTree {
    /// Option value at the root node
    pub price: Money,
    pub risk_neutral_probability: Decimal,
    /// 1 - p
    pub down_probability: Decimal,
    /// e^r, one period of risk-free growth
    pub growth_factor: Decimal,
    /// e^-r, applied to every continuation value
    pub discount_factor: Decimal,
    /// d < e^r < u, equivalently 0 < p < 1
    pub arbitrage_free: bool,
    pub early_exercise_nodes: Vec<NodeIndex>,
    pub stock_prices: Lattice<Money>,
    pub option_values: Lattice<Money>,
    pub early_exercise: Lattice<bool>,
    pub hold_values: Lattice<Option<Money>>,
    pub exercise_values: Lattice<Money>,
    pub nodes: Vec<NodeDetail>,
    pub inputs: BinomialInput,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &BinomialInput) -> DerivLabResult<()> {
    if input.spot_price <= Decimal::ZERO {
        return Err(DerivLabError::invalid("spot_price", "must be positive"));
    }
    if input.strike_price <= Decimal::ZERO {
        return Err(DerivLabError::invalid("strike_price", "must be positive"));
    }
    if input.up_factor <= Decimal::ONE {
        return Err(DerivLabError::invalid("up_factor", "must be greater than 1"));
    }
    if input.down_factor <= Decimal::ZERO || input.down_factor >= Decimal::ONE {
        return Err(DerivLabError::invalid(
            "down_factor",
            "must be between 0 and 1 (exclusive)",
        ));
    }
    // Implied by the two checks above; kept so u == d can never reach p
    if input.down_factor >= input.up_factor {
        return Err(DerivLabError::invalid(
            "down_factor",
            "must be less than up_factor",
        ));
    }
    // Both e^r and e^-r must be representable or p and the discount saturate
    let growth = exp_decimal(input.risk_free_rate);
    let discount = exp_decimal(-input.risk_free_rate);
    if growth >= DECIMAL_CAP || discount >= DECIMAL_CAP || growth.is_zero() || discount.is_zero() {
        return Err(DerivLabError::invalid(
            "risk_free_rate",
            "growth factor e^r is outside the representable decimal range",
        ));
    }
    if input.periods == 0 {
        return Err(DerivLabError::invalid("periods", "must be at least 1"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run lattice build, probability, terminal payoff and backward induction,
/// then freeze everything into a [`BinomialTree`].
///
/// Performs no validation and never fails; inputs outside the model's
/// preconditions give meaningless but finite numbers. Use [`price_binomial`]
/// for the checked entry point.
pub fn binomial_tree(input: &BinomialInput) -> BinomialTree {
    let n = input.periods as usize;
    let s = input.spot_price;
    let k = input.strike_price;
    let u = input.up_factor;
    let d = input.down_factor;
    let r = input.risk_free_rate;

    let stock_prices = build_stock_lattice(s, u, d, n);
    let p = risk_neutral_probability(u, d, r);
    let terminal = terminal_payoff(stock_prices.row(n), k, input.option_type);
    debug!(periods = n, %p, "binomial lattice built");

    let induction = backward_induction(
        &stock_prices,
        &terminal,
        p,
        r,
        k,
        input.option_type,
        input.exercise_style,
    );

    let nodes: Vec<NodeDetail> = stock_prices
        .iter_nodes()
        .map(|((step, node), &stock_price)| NodeDetail {
            step,
            node,
            up_moves: step - node,
            down_moves: node,
            stock_price,
            option_value: induction.option_values[(step, node)],
            hold_value: induction.hold_values[(step, node)],
            exercise_value: induction.exercise_values[(step, node)],
            early_exercise: induction.early_exercise[(step, node)],
        })
        .collect();

    let early_exercise_nodes: Vec<NodeIndex> = induction
        .early_exercise
        .iter_nodes()
        .filter(|&(_, &exercised)| exercised)
        .map(|((step, node), _)| NodeIndex { step, node })
        .collect();

    let price = induction.option_values[(0, 0)];
    debug!(%price, early_exercise = early_exercise_nodes.len(), "backward induction complete");

    BinomialTree {
        price,
        risk_neutral_probability: p,
        down_probability: safe_sub(Decimal::ONE, p),
        growth_factor: exp_decimal(r),
        discount_factor: exp_decimal(-r),
        arbitrage_free: p > Decimal::ZERO && p < Decimal::ONE,
        early_exercise_nodes,
        stock_prices,
        option_values: induction.option_values,
        early_exercise: induction.early_exercise,
        hold_values: induction.hold_values,
        exercise_values: induction.exercise_values,
        nodes,
        inputs: input.clone(),
    }
}

/// True when the maturity row has lost the strict down-move ordering or a
/// price has rounded down to zero.
fn terminal_precision_lost(terminal: &[Money]) -> bool {
    terminal.windows(2).any(|pair| pair[0] <= pair[1])
        || terminal.iter().any(|price| *price <= Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Public API: price_binomial
// ---------------------------------------------------------------------------

pub fn price_binomial(input: &BinomialInput) -> DerivLabResult<ComputationOutput<BinomialTree>> {
    let start = Instant::now();
    validate_input(input)?;

    let tree = binomial_tree(input);

    let mut warnings = Vec::new();
    if !tree.arbitrage_free {
        warn!(p = %tree.risk_neutral_probability, "risk-neutral probability outside (0, 1)");
        warnings.push(format!(
            "Risk-neutral probability {} lies outside (0, 1): d < e^r < u does not hold, \
             the parameters admit arbitrage",
            tree.risk_neutral_probability
        ));
    }
    if terminal_precision_lost(tree.stock_prices.row(tree.stock_prices.periods())) {
        warn!(periods = input.periods, "terminal stock prices exceed decimal resolution");
        warnings.push(format!(
            "Terminal stock prices are not strictly decreasing or reach zero after {} periods: \
             u^n or d^n exceeds 28-digit decimal resolution, deep nodes are unreliable",
            input.periods
        ));
    }
    if !tree.early_exercise_nodes.is_empty() {
        warnings.push(format!(
            "Early exercise is optimal at {} node(s)",
            tree.early_exercise_nodes.len()
        ));
    }

    let methodology = match input.exercise_style {
        ExerciseStyle::European => "Binomial tree (European, backward induction)",
        ExerciseStyle::American => "Binomial tree with early exercise (American, backward induction)",
    };

    let assumptions = serde_json::json!({
        "model": "Recombining binomial lattice",
        "periods": input.periods,
        "up_factor": input.up_factor.to_string(),
        "down_factor": input.down_factor.to_string(),
        "risk_free_rate_per_period": input.risk_free_rate.to_string(),
        "compounding": "continuous",
        "option_type": format!("{:?}", input.option_type),
        "exercise_style": format!("{:?}", input.exercise_style),
        "tie_break": "hold when exercise equals continuation",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, &assumptions, warnings, elapsed, tree))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
