use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Number of monthly periods in a term of `years`.
pub fn periods(years: u32) -> u32 {
    years * 12
}

/// Monthly rate for a nominal annual rate compounded monthly.
pub fn monthly_rate(annual_rate: Rate) -> Rate {
    annual_rate / MONTHS_PER_YEAR
}

/// `(1 + r)^n` by repeated multiplication, so the integer power stays exact
/// to Decimal precision.
fn growth_factor(monthly_rate: Rate, n: u32) -> Decimal {
    let base = Decimal::ONE + monthly_rate;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result *= base;
    }
    result
}

/// Level monthly payment on a fixed-rate, fully amortizing loan.
///
/// `payment = P·r·(1+r)^n / ((1+r)^n − 1)` with `r` the monthly rate and `n`
/// the number of monthly periods. A zero rate degenerates to `P / n`; a zero
/// principal yields zero. A zero-year term means the whole balance is due at
/// once, so the payment is the principal itself.
pub fn monthly_payment(principal: Money, annual_rate: Rate, term_years: u32) -> Money {
    if principal <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let n = periods(term_years);
    if n == 0 {
        return principal;
    }

    let r = monthly_rate(annual_rate);
    if r.is_zero() {
        return principal / Decimal::from(n);
    }

    // P·r / (1 − (1+r)^−n) keeps intermediates near P for long, high-rate terms
    let discount = Decimal::ONE / growth_factor(r, n);
    principal * r / (Decimal::ONE - discount)
}

/// Largest principal whose level monthly payment is exactly `payment`.
///
/// This is the algebraic inverse of [`monthly_payment`]:
/// `P = M·((1+r)^n − 1) / (r·(1+r)^n)`, and `M·n` at a zero rate.
pub fn principal_for_payment(payment: Money, annual_rate: Rate, term_years: u32) -> Money {
    if payment <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let n = periods(term_years);
    if n == 0 {
        return payment;
    }

    let r = monthly_rate(annual_rate);
    if r.is_zero() {
        return payment * Decimal::from(n);
    }

    let discount = Decimal::ONE / growth_factor(r, n);
    payment * (Decimal::ONE - discount) / r
}

/// Total paid over the life of the loan minus the principal.
pub fn total_interest(principal: Money, annual_rate: Rate, term_years: u32) -> Money {
    let paid = monthly_payment(principal, annual_rate, term_years) * Decimal::from(periods(term_years));
    (paid - principal).max(Decimal::ZERO)
}
