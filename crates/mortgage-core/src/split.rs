//! Interest/principal split of an arbitrary payment, in closed form.
//!
//! With `i` the periodic rate, `v = 1 / (1 + i)` and `N` the payment count,
//! the interest carried by payment `k` is
//!
//! ```text
//! interest(k) = P * i * (1 - v^(N-k+1)) / (1 - v^N)
//! ```
//!
//! which is `i` times the balance left after `k - 1` level payments. No
//! earlier installment is needed to evaluate it, so any index can be answered
//! directly and a full schedule can be built by independent evaluations.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::payment::{amortizing_payment, annuity_denominator, discount_factor, periodic_payment};
use crate::terms::LoanTerms;
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// Interest and principal carried by one payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub interest: Money,
    pub principal: Money,
}

/// Precomputed constants of the split recurrence for one set of terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRecurrence {
    principal: Money,
    rate: Rate,
    /// `v = 1 / (1 + i)`.
    discount: Decimal,
    payment_count: usize,
    payment: Money,
    /// `1 - v^N`; zero for zero-rate loans.
    annuity: Decimal,
}

impl SplitRecurrence {
    pub fn new(terms: &LoanTerms) -> MortgageResult<Self> {
        let principal = terms.principal();
        let rate = terms.periodic_rate();
        let payment_count = terms.total_payment_count();

        if rate.is_zero() {
            return Ok(Self {
                principal,
                rate,
                discount: Decimal::ONE,
                payment_count,
                payment: periodic_payment(principal, rate, payment_count)?,
                annuity: Decimal::ZERO,
            });
        }

        let annuity = annuity_denominator(rate, payment_count)?;
        Ok(Self {
            principal,
            rate,
            discount: discount_factor(rate)?,
            payment_count,
            payment: amortizing_payment(principal, rate, annuity)?,
            annuity,
        })
    }

    /// The unrounded level payment.
    pub fn payment(&self) -> Money {
        self.payment
    }

    pub fn payment_count(&self) -> usize {
        self.payment_count
    }

    pub fn is_zero_rate(&self) -> bool {
        self.rate.is_zero()
    }

    /// Interest portion of payment `k`, `1 <= k <= N`.
    pub fn interest_portion(&self, k: usize) -> MortgageResult<Money> {
        self.check_index(k)?;
        if self.is_zero_rate() {
            return Ok(Decimal::ZERO);
        }

        let overflow = || MortgageError::Overflow {
            context: format!("interest portion of payment {k}"),
        };
        let remaining = self.payment_count - k + 1;
        let decay = self
            .discount
            .checked_powu(remaining as u64)
            .ok_or_else(overflow)?;

        self.principal
            .checked_mul(self.rate)
            .and_then(|scaled| scaled.checked_mul(Decimal::ONE - decay))
            .and_then(|numerator| numerator.checked_div(self.annuity))
            .ok_or_else(overflow)
    }

    /// Split an arbitrary `amount` paid as payment `k`: interest follows the
    /// closed form, principal is whatever remains.
    pub fn split_payment(&self, k: usize, amount: Money) -> MortgageResult<PaymentSplit> {
        let interest = self.interest_portion(k)?;
        Ok(PaymentSplit {
            interest,
            principal: amount - interest,
        })
    }

    /// Split of the level payment at index `k`.
    pub fn split(&self, k: usize) -> MortgageResult<PaymentSplit> {
        self.split_payment(k, self.payment)
    }

    fn check_index(&self, k: usize) -> MortgageResult<()> {
        if k == 0 || k > self.payment_count {
            return Err(MortgageError::IndexOutOfRange {
                index: k,
                min: 1,
                max: self.payment_count,
            });
        }
        Ok(())
    }
}
