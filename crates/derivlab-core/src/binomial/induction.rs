//! Risk-neutral probability and the backward-induction recurrence.
//!
//! Steps are processed from `n - 1` down to `0`. Each node reads only its
//! two successors on the following layer (`node` for the up-move,
//! `node + 1` for the down-move), so all nodes of one layer are independent
//! of each other while layers form a strict sequential chain.

use rust_decimal::Decimal;

use super::lattice::Lattice;
use crate::math::{exp_decimal, safe_add, safe_div, safe_mul, safe_sub};
use crate::payoff::intrinsic_value;
use crate::types::{ExerciseStyle, Factor, Money, OptionType, Rate};

/// Up-move probability under the pricing measure: `p = (e^r - d) / (u - d)`.
///
/// Not clamped. A value outside [0, 1] means the `(u, d, r)` triple admits
/// arbitrage; callers decide whether to warn. `up == down` has no meaningful
/// probability and must be excluded beforehand; the quotient saturates at
/// `±DECIMAL_CAP` rather than panicking.
pub fn risk_neutral_probability(up: Factor, down: Factor, rate: Rate) -> Decimal {
    safe_div(safe_sub(exp_decimal(rate), down), safe_sub(up, down))
}

/// Everything the recurrence produces, layer by layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Induction {
    /// Option value at every node; `(0, 0)` is the price.
    pub option_values: Lattice<Money>,
    /// True where immediate exercise strictly beats holding (American only).
    pub early_exercise: Lattice<bool>,
    /// Discounted expectation over the two successors; `None` at maturity.
    pub hold_values: Lattice<Option<Money>>,
    /// Intrinsic value at every node, whatever the exercise style.
    pub exercise_values: Lattice<Money>,
}

/// Continuation value from the two successor values. Saturating throughout.
#[inline]
pub fn hold_value(discount: Decimal, p: Decimal, up_value: Money, down_value: Money) -> Money {
    let q = safe_sub(Decimal::ONE, p);
    safe_mul(discount, safe_add(safe_mul(p, up_value), safe_mul(q, down_value)))
}

/// Walk the lattice from maturity back to the root.
///
/// `terminal` must hold `stock.periods() + 1` values; extra entries are ignored.
/// A tie between exercise and hold keeps the option alive.
pub fn backward_induction(
    stock: &Lattice<Money>,
    terminal: &[Money],
    p: Decimal,
    rate: Rate,
    strike: Money,
    option_type: OptionType,
    exercise_style: ExerciseStyle,
) -> Induction {
    let n = stock.periods();
    let discount = exp_decimal(-rate);

    let mut option_values = Lattice::filled(n, Decimal::ZERO);
    let mut early_exercise = Lattice::filled(n, false);
    let mut hold_values = Lattice::filled(n, None);
    let exercise_values = stock.map(|&s| intrinsic_value(s, strike, option_type));

    for (node, &value) in terminal.iter().take(n + 1).enumerate() {
        option_values[(n, node)] = value;
    }

    for step in (0..n).rev() {
        for node in 0..=step {
            let hold = hold_value(
                discount,
                p,
                option_values[(step + 1, node)],
                option_values[(step + 1, node + 1)],
            );
            hold_values[(step, node)] = Some(hold);

            let (value, exercised) = match exercise_style {
                ExerciseStyle::European => (hold, false),
                ExerciseStyle::American => {
                    let exercise = exercise_values[(step, node)];
                    if exercise > hold {
                        (exercise, true)
                    } else {
                        (hold, false)
                    }
                }
            };
            option_values[(step, node)] = value;
            early_exercise[(step, node)] = exercised;
        }
    }

    Induction {
        option_values,
        early_exercise,
        hold_values,
        exercise_values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binomial::lattice::build_stock_lattice;
    use crate::binomial::payoff::terminal_payoff;
    use crate::math::DECIMAL_CAP;
    use rust_decimal_macros::dec;

    fn approx_eq(a: Decimal, b: Decimal, tol: Decimal) -> bool {
        (a - b).abs() < tol
    }

    fn run(option_type: OptionType, style: ExerciseStyle) -> (Decimal, Induction) {
        let stock = build_stock_lattice(dec!(100), dec!(1.2), dec!(0.8), 2);
        let terminal = terminal_payoff(stock.row(2), dec!(100), option_type);
        let p = risk_neutral_probability(dec!(1.2), dec!(0.8), dec!(0.05));
        let ind = backward_induction(&stock, &terminal, p, dec!(0.05), dec!(100), option_type, style);
        (p, ind)
    }

    #[test]
    fn test_probability_reference_value() {
        let p = risk_neutral_probability(dec!(1.2), dec!(0.8), dec!(0.05));
        assert!(approx_eq(p, dec!(0.628177740), dec!(0.000001)), "p = {p}");
    }

    #[test]
    fn test_probability_not_clamped() {
        // e^0.5 ~ 1.6487 > u, so p > 1
        let p = risk_neutral_probability(dec!(1.2), dec!(0.8), dec!(0.5));
        assert!(p > Decimal::ONE);
        // negative rate below ln(d) pushes p under 0
        let p = risk_neutral_probability(dec!(1.2), dec!(0.8), dec!(-0.5));
        assert!(p < Decimal::ZERO);
    }

    #[test]
    fn test_probability_saturates_instead_of_overflowing() {
        // e^70 is past Decimal::MAX, so the numerator is already saturated
        let p = risk_neutral_probability(dec!(1.2), dec!(0.8), dec!(70));
        assert_eq!(p, DECIMAL_CAP);
        // u == d: positive numerator over a zero spread
        let p = risk_neutral_probability(dec!(0.8), dec!(0.8), dec!(0.05));
        assert_eq!(p, DECIMAL_CAP);
    }

    #[test]
    fn test_hold_value_saturates_with_sign() {
        let q_side = hold_value(Decimal::ONE, -DECIMAL_CAP, dec!(0), dec!(36));
        assert_eq!(q_side, DECIMAL_CAP);
        // p = 3, q = -2: CAP + 2 overflows the sum
        let summed = hold_value(Decimal::ONE, dec!(3), DECIMAL_CAP, dec!(-1));
        assert_eq!(summed, DECIMAL_CAP);
        let negative = hold_value(DECIMAL_CAP, dec!(-2), dec!(10), dec!(0));
        assert_eq!(negative, -DECIMAL_CAP);
    }

    #[test]
    fn test_european_call_two_periods() {
        let (_, ind) = run(OptionType::Call, ExerciseStyle::European);
        assert_eq!(ind.option_values.row(2), &[dec!(44), dec!(0), dec!(0)]);
        assert!(approx_eq(ind.option_values[(1, 0)], dec!(26.2918), dec!(0.001)));
        assert_eq!(ind.option_values[(1, 1)], Decimal::ZERO);
        assert!(approx_eq(ind.option_values[(0, 0)], dec!(15.7104), dec!(0.001)));
        assert!(ind.early_exercise.iter_nodes().all(|(_, &e)| !e));
    }

    #[test]
    fn test_hold_values_absent_at_maturity_only() {
        let (_, ind) = run(OptionType::Put, ExerciseStyle::American);
        for ((step, _), hold) in ind.hold_values.iter_nodes() {
            assert_eq!(hold.is_none(), step == 2);
        }
    }

    #[test]
    fn test_american_put_exercises_at_low_node() {
        let (p, ind) = run(OptionType::Put, ExerciseStyle::American);
        let disc = exp_decimal(dec!(-0.05));
        // (1,1): S = 80, exercise 20; hold = e^-r (p*4 + (1-p)*36) ~ 15.12
        let hold = hold_value(disc, p, dec!(4), dec!(36));
        assert!(dec!(20) > hold);
        assert!(ind.early_exercise[(1, 1)]);
        assert_eq!(ind.option_values[(1, 1)], dec!(20));
        // (1,0): S = 120, exercise 0, never exercised
        assert!(!ind.early_exercise[(1, 0)]);
        // root: S = 100, exercise 0
        assert!(!ind.early_exercise[(0, 0)]);
        assert!(!ind.early_exercise[(2, 2)]);
    }

    #[test]
    fn test_tie_favours_holding() {
        // Deep ITM call with zero rate and a payoff linear in S: hold == exercise
        // at every interior node because E[S_next] = S when r = 0.
        let up = dec!(1.25);
        let down = dec!(0.75);
        let stock = build_stock_lattice(dec!(200), up, down, 1);
        let terminal = terminal_payoff(stock.row(1), dec!(10), OptionType::Call);
        let p = risk_neutral_probability(up, down, Decimal::ZERO);
        assert_eq!(p, dec!(0.5));
        let ind = backward_induction(
            &stock,
            &terminal,
            p,
            Decimal::ZERO,
            dec!(10),
            OptionType::Call,
            ExerciseStyle::American,
        );
        assert_eq!(ind.hold_values[(0, 0)], Some(dec!(190)));
        assert_eq!(ind.exercise_values[(0, 0)], dec!(190));
        assert!(!ind.early_exercise[(0, 0)]);
    }
}
