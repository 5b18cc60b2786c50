//! Quantization at reporting boundaries.
//!
//! Nothing inside the engine rounds. Every value handed to a caller as a
//! "reported" figure goes through [`quantize`] (currency, 2 digits) or
//! [`quantize_tenth`] (ratios and year counts, 1 digit).

use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits of reported currency amounts.
pub const CURRENCY_DP: u32 = 2;

/// Fractional digits of reported ratios and durations.
pub const TENTH_DP: u32 = 1;

/// Round half-up to `dp` fractional digits and pin the scale to exactly `dp`.
///
/// `1199.1` becomes `1199.10` and `-0.001` becomes `0.00`, so reported
/// values serialize the same way regardless of how they were derived.
pub fn quantize_dp(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// Currency precision (two fractional digits).
pub fn quantize(value: Decimal) -> Decimal {
    quantize_dp(value, CURRENCY_DP)
}

/// One fractional digit.
pub fn quantize_tenth(value: Decimal) -> Decimal {
    quantize_dp(value, TENTH_DP)
}
