//! Closed-form level payment of a fully amortizing loan.
//!
//! `A = P * r / (1 - v^N)` with the discount factor `v = 1 / (1 + r)`.
//! Powers of `v` only shrink, so long terms at high rates stay inside the
//! `Decimal` range. The result is never rounded here; see [`crate::rounding`].

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// Fixed periodic payment that retires `principal` over `payment_count`
/// periods at `periodic_rate` per period.
pub fn periodic_payment(
    principal: Money,
    periodic_rate: Rate,
    payment_count: usize,
) -> MortgageResult<Money> {
    if payment_count == 0 {
        return Err(MortgageError::invalid(
            "payment_count",
            "payment count must be positive.",
        ));
    }

    if periodic_rate.is_zero() {
        return Ok(principal / Decimal::from(payment_count as u64));
    }

    let annuity = annuity_denominator(periodic_rate, payment_count)?;
    amortizing_payment(principal, periodic_rate, annuity)
}

/// `v = 1 / (1 + rate)`.
pub(crate) fn discount_factor(rate: Rate) -> MortgageResult<Decimal> {
    Decimal::ONE
        .checked_div(Decimal::ONE + rate)
        .ok_or_else(|| MortgageError::DivisionByZero {
            context: format!("discount factor 1 / (1 + {rate})"),
        })
}

/// `1 - v^count`.
pub(crate) fn annuity_denominator(rate: Rate, count: usize) -> MortgageResult<Decimal> {
    let discount = discount_factor(rate)?;
    let decay = discount
        .checked_powu(count as u64)
        .ok_or_else(|| MortgageError::Overflow {
            context: format!("discount factor (1 + {rate})^-{count}"),
        })?;
    Ok(Decimal::ONE - decay)
}

/// Payment for a non-zero rate given the precomputed `1 - v^N`.
pub(crate) fn amortizing_payment(
    principal: Money,
    rate: Rate,
    annuity: Decimal,
) -> MortgageResult<Money> {
    if annuity.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "payment annuity factor".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|scaled| scaled.checked_div(annuity))
        .ok_or_else(|| MortgageError::Overflow {
            context: "periodic payment".into(),
        })
}
