//! Decimal math helpers shared by every calculator.
//!
//! Nothing here touches f64: exponentials are Taylor series with range
//! reduction, square roots and logarithms are Newton iterations, and the
//! normal CDF is the Abramowitz & Stegun 26.2.17 polynomial.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Largest representable Decimal; products that would overflow saturate here.
pub const DECIMAL_CAP: Decimal = Decimal::MAX;

const EXP_TAYLOR_TERMS: u32 = 25;
const SQRT_ITERATIONS: u32 = 25;
const LN_ITERATIONS: u32 = 30;

/// Taylor series exp(x) with range reduction for |x| > 2.
/// exp(x) = exp(x/2)^2 when |x| > 2, then Taylor with 25 terms.
pub fn exp_decimal(x: Decimal) -> Decimal {
    let two = dec!(2);

    if x > two || x < -two {
        let half = exp_decimal(x / two);
        return safe_mul(half, half);
    }

    let mut sum = Decimal::ONE;
    let mut term = Decimal::ONE;
    for n in 1..=EXP_TAYLOR_TERMS {
        term = term * x / Decimal::from(n);
        sum += term;
    }
    sum
}

/// Newton's method sqrt: y_{n+1} = (y_n + x/y_n) / 2.
pub fn sqrt_decimal(x: Decimal) -> Decimal {
    if x <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if x == Decimal::ONE {
        return Decimal::ONE;
    }
    let two = dec!(2);
    let mut guess = x / two;
    if x > dec!(100) {
        guess = dec!(10);
    } else if x < dec!(0.01) {
        guess = dec!(0.1);
    }
    for _ in 0..SQRT_ITERATIONS {
        guess = (guess + x / guess) / two;
    }
    guess
}

/// Natural log via Newton's method on exp(y) = x.
///
/// Non-positive input has no logarithm; callers validate before reaching
/// here, and `-999` is returned as a sentinel otherwise.
pub fn ln_decimal(x: Decimal) -> Decimal {
    if x <= Decimal::ZERO {
        return dec!(-999);
    }
    if x == Decimal::ONE {
        return Decimal::ZERO;
    }

    // Count powers of e to land near the root before iterating
    let mut y = if x > dec!(0.5) && x < dec!(2) {
        x - Decimal::ONE
    } else {
        let e_approx = dec!(2.718281828459045);
        let mut approx = Decimal::ZERO;
        let mut v = x;
        if x > Decimal::ONE {
            while v > e_approx {
                v /= e_approx;
                approx += Decimal::ONE;
            }
        } else {
            while v < Decimal::ONE / e_approx {
                v *= e_approx;
                approx -= Decimal::ONE;
            }
        }
        approx + (v - Decimal::ONE)
    };

    // y_{n+1} = y_n - 1 + x / exp(y_n)
    for _ in 0..LN_ITERATIONS {
        let ey = exp_decimal(y);
        if ey == Decimal::ZERO {
            break;
        }
        y = y - Decimal::ONE + x / ey;
    }
    y
}

/// Standard normal PDF: phi(x) = exp(-x^2/2) / sqrt(2*pi)
pub fn norm_pdf(x: Decimal) -> Decimal {
    let two_pi = dec!(6.283185307179586);
    exp_decimal(-(x * x) / dec!(2)) / sqrt_decimal(two_pi)
}

/// Standard normal CDF using Abramowitz & Stegun approximation.
/// Phi(x) = 1 - phi(x) * (b1*t + b2*t^2 + b3*t^3 + b4*t^4 + b5*t^5)
/// where t = 1 / (1 + 0.2316419 * |x|)
/// For x < 0: Phi(x) = 1 - Phi(-x)
pub fn norm_cdf(x: Decimal) -> Decimal {
    let b1 = dec!(0.319381530);
    let b2 = dec!(-0.356563782);
    let b3 = dec!(1.781477937);
    let b4 = dec!(-1.821255978);
    let b5 = dec!(1.330274429);
    let p = dec!(0.2316419);

    let abs_x = x.abs();
    let t = Decimal::ONE / (Decimal::ONE + p * abs_x);
    let poly = t * (b1 + t * (b2 + t * (b3 + t * (b4 + t * b5))));
    let cdf_pos = Decimal::ONE - norm_pdf(abs_x) * poly;

    if x < Decimal::ZERO {
        Decimal::ONE - cdf_pos
    } else {
        cdf_pos
    }
}

/// `DECIMAL_CAP` carrying the sign of the overflowed result.
fn saturated(negative: bool) -> Decimal {
    if negative {
        -DECIMAL_CAP
    } else {
        DECIMAL_CAP
    }
}

/// Checked multiplication that saturates at `±DECIMAL_CAP` instead of panicking.
pub fn safe_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b)
        .unwrap_or_else(|| saturated(a.is_sign_negative() != b.is_sign_negative()))
}

/// Checked division saturating at `±DECIMAL_CAP`. A zero divisor saturates
/// with the dividend's sign, and `0 / 0` is zero.
pub fn safe_div(a: Decimal, b: Decimal) -> Decimal {
    if a.is_zero() {
        return Decimal::ZERO;
    }
    a.checked_div(b)
        .unwrap_or_else(|| saturated(a.is_sign_negative() != (b.is_sign_negative() && !b.is_zero())))
}

/// Checked addition saturating at `±DECIMAL_CAP`; overflow needs both operands
/// on the same side of zero.
pub fn safe_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| saturated(a.is_sign_negative()))
}

/// Checked subtraction saturating at `±DECIMAL_CAP`.
pub fn safe_sub(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).unwrap_or_else(|| saturated(a.is_sign_negative()))
}

/// Integer power by squaring, saturating at `±DECIMAL_CAP` on overflow.
pub fn pow_decimal(base: Decimal, exp: u32) -> Decimal {
    let negative = base.is_sign_negative() && exp % 2 == 1;
    let mut result = Decimal::ONE;
    let mut b = base;
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result = match result.checked_mul(b) {
                Some(v) => v,
                None => return saturated(negative),
            };
        }
        e >>= 1;
        if e == 0 {
            break;
        }
        b = match b.checked_mul(b) {
            Some(v) => v,
            None => return saturated(negative),
        };
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Decimal, b: Decimal, tol: Decimal) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_exp_decimal_basic() {
        assert_eq!(exp_decimal(dec!(0)), dec!(1));
        assert!(approx_eq(exp_decimal(dec!(1)), dec!(2.718281828), dec!(0.000001)));
        assert!(approx_eq(exp_decimal(dec!(0.05)), dec!(1.051271096), dec!(0.000001)));
        assert!(approx_eq(exp_decimal(dec!(-0.05)), dec!(0.951229425), dec!(0.000001)));
    }

    #[test]
    fn test_exp_decimal_range_reduction() {
        // e^5 ~ 148.4131591
        assert!(approx_eq(exp_decimal(dec!(5)), dec!(148.4131591), dec!(0.0001)));
        assert!(approx_eq(exp_decimal(dec!(-5)), dec!(0.006737947), dec!(0.000001)));
    }

    #[test]
    fn test_sqrt_decimal_basic() {
        assert!(approx_eq(sqrt_decimal(dec!(4)), dec!(2), dec!(0.0000001)));
        assert!(approx_eq(sqrt_decimal(dec!(0.25)), dec!(0.5), dec!(0.0000001)));
        assert_eq!(sqrt_decimal(dec!(-1)), Decimal::ZERO);
    }

    #[test]
    fn test_ln_decimal_basic() {
        assert_eq!(ln_decimal(dec!(1)), Decimal::ZERO);
        assert!(approx_eq(ln_decimal(dec!(2.718281828459045)), dec!(1), dec!(0.000001)));
        assert!(approx_eq(ln_decimal(dec!(10)), dec!(2.302585093), dec!(0.000001)));
        assert!(approx_eq(ln_decimal(dec!(0.1)), dec!(-2.302585093), dec!(0.000001)));
    }

    #[test]
    fn test_norm_cdf_basic() {
        assert!(approx_eq(norm_cdf(dec!(0)), dec!(0.5), dec!(0.0001)));
        assert!(approx_eq(norm_cdf(dec!(1.96)), dec!(0.975), dec!(0.001)));
        assert!(approx_eq(norm_cdf(dec!(-1.96)), dec!(0.025), dec!(0.001)));
        assert!(norm_cdf(dec!(5)) > dec!(0.999));
    }

    #[test]
    fn test_pow_decimal_exact_and_saturating() {
        assert_eq!(pow_decimal(dec!(1.2), 0), Decimal::ONE);
        assert_eq!(pow_decimal(dec!(1.2), 2), dec!(1.44));
        assert_eq!(pow_decimal(dec!(0.8), 3), dec!(0.512));
        assert_eq!(pow_decimal(dec!(1000), 20), DECIMAL_CAP);
    }

    #[test]
    fn test_safe_mul_saturates() {
        assert_eq!(safe_mul(dec!(2), dec!(3)), dec!(6));
        assert_eq!(safe_mul(Decimal::MAX, dec!(2)), DECIMAL_CAP);
    }

    #[test]
    fn test_safe_mul_keeps_sign_on_overflow() {
        assert_eq!(safe_mul(Decimal::MAX, dec!(-2)), -DECIMAL_CAP);
        assert_eq!(safe_mul(dec!(-2), Decimal::MAX), -DECIMAL_CAP);
        assert_eq!(safe_mul(-Decimal::MAX, dec!(-2)), DECIMAL_CAP);
        assert_eq!(pow_decimal(dec!(-1000), 21), -DECIMAL_CAP);
        assert_eq!(pow_decimal(dec!(-1000), 20), DECIMAL_CAP);
    }

    #[test]
    fn test_safe_div_saturates() {
        assert_eq!(safe_div(dec!(1), dec!(4)), dec!(0.25));
        assert_eq!(safe_div(Decimal::MAX, dec!(0.5)), DECIMAL_CAP);
        assert_eq!(safe_div(Decimal::MAX, dec!(-0.5)), -DECIMAL_CAP);
        assert_eq!(safe_div(dec!(-3), Decimal::ZERO), -DECIMAL_CAP);
        assert_eq!(safe_div(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_safe_add_sub_saturate() {
        assert_eq!(safe_add(dec!(1), dec!(2)), dec!(3));
        assert_eq!(safe_add(Decimal::MAX, Decimal::MAX), DECIMAL_CAP);
        assert_eq!(safe_add(-Decimal::MAX, -Decimal::MAX), -DECIMAL_CAP);
        assert_eq!(safe_add(Decimal::MAX, -Decimal::MAX), Decimal::ZERO);
        assert_eq!(safe_sub(Decimal::ONE, -Decimal::MAX), DECIMAL_CAP);
        assert_eq!(safe_sub(-Decimal::MAX, Decimal::MAX), -DECIMAL_CAP);
    }
}
