//! Aggregate statistics derived from a built [`Loan`].
//!
//! Every figure here is a reported value and is quantized; nothing is fed
//! back into the engine.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::loan::Loan;
use crate::rounding::{quantize, quantize_tenth};
use crate::terms::{Compounding, TermUnit};
use crate::types::{Money, Percent, Rate};
use crate::MortgageResult;

const HUNDRED: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSummary {
    /// Original balance.
    pub principal: Money,
    /// Nominal annual rate as given (0.06 = 6%).
    pub annual_interest_rate: Rate,
    pub term: u32,
    pub term_unit: TermUnit,
    pub compounding: Compounding,
    pub total_payment_count: usize,
    /// Level payment per period, to the cent.
    pub monthly_payment: Money,
    /// Simple annual interest on the principal as a percentage of it.
    ///
    /// One period of simple interest is quantized to the cent before it is
    /// expressed as a percentage, so this is the nominal rate seen through
    /// currency rounding. It is not compounding-aware; see `apy`.
    pub apr: Percent,
    /// Effective annual yield, `(1 + rate/n)^n - 1`, as a percentage.
    pub apy: Percent,
    pub total_principal: Money,
    pub total_interest: Money,
    /// `total_principal + total_interest`, both already rounded.
    pub total_paid: Money,
    /// Total interest as a percentage of principal, one decimal.
    pub interest_to_principal_ratio: Percent,
    /// Payment count over 12, one decimal, whatever the term unit.
    pub years_to_pay: Decimal,
}

impl LoanSummary {
    /// Fails when the principal rounds to zero cents, which leaves the
    /// interest-to-principal ratio undefined.
    pub fn from_loan(loan: &Loan) -> MortgageResult<Self> {
        let terms = loan.terms();
        let principal = terms.principal();
        let rate = terms.annual_interest_rate();
        let count = loan.total_payment_count();

        let total_principal = quantize(principal);
        let total_interest = quantize(loan.total_interest());
        let ratio = total_interest
            .checked_div(total_principal)
            .ok_or_else(|| MortgageError::DivisionByZero {
                context: "interest to principal ratio".into(),
            })?;

        Ok(Self {
            principal,
            annual_interest_rate: rate,
            term: terms.term(),
            term_unit: terms.term_unit(),
            compounding: terms.compounding(),
            total_payment_count: count,
            monthly_payment: quantize(loan.payment()),
            apr: apr(principal, rate),
            apy: apy(rate, terms.n_periods()),
            total_principal,
            total_interest,
            total_paid: total_principal + total_interest,
            interest_to_principal_ratio: quantize_tenth(ratio * HUNDRED),
            years_to_pay: quantize_tenth(Decimal::from(count as u64) / MONTHS_PER_YEAR),
        })
    }
}

/// One year of simple interest, quantized, over principal.
pub fn apr(principal: Money, annual_rate: Rate) -> Percent {
    let simple_interest = quantize(principal * annual_rate);
    quantize(simple_interest / principal * HUNDRED)
}

/// Effective annual yield with `periods_per_year` compoundings.
pub fn apy(annual_rate: Rate, periods_per_year: u32) -> Percent {
    let per_period = annual_rate / Decimal::from(periods_per_year);
    let effective = (Decimal::ONE + per_period).powu(periods_per_year as u64) - Decimal::ONE;
    quantize(effective * HUNDRED)
}
