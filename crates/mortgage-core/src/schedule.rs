//! Schedule assembly: origination row plus one installment per payment.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::rounding::quantize;
use crate::split::{PaymentSplit, SplitRecurrence};
use crate::types::Money;
use crate::MortgageResult;

/// Final balances within this distance of zero count as fully amortized.
pub const CLOSURE_TOLERANCE: Decimal = dec!(0.01);

/// One row of the schedule. Index 0 is origination and carries no payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub index: usize,
    pub payment_amount: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    /// Interest paid from payment 1 through this one.
    pub cumulative_interest: Money,
    /// Principal outstanding after this payment.
    pub remaining_balance: Money,
}

impl Installment {
    fn origination(principal: Money) -> Self {
        Self {
            index: 0,
            payment_amount: Decimal::ZERO,
            interest_portion: Decimal::ZERO,
            principal_portion: Decimal::ZERO,
            cumulative_interest: Decimal::ZERO,
            remaining_balance: principal,
        }
    }

    /// Copy with every amount quantized to currency precision.
    pub fn rounded(&self) -> Self {
        Self {
            index: self.index,
            payment_amount: quantize(self.payment_amount),
            interest_portion: quantize(self.interest_portion),
            principal_portion: quantize(self.principal_portion),
            cumulative_interest: quantize(self.cumulative_interest),
            remaining_balance: quantize(self.remaining_balance),
        }
    }
}

/// Ordered installments `0..=N`, indexed by payment number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schedule {
    installments: Vec<Installment>,
}

impl Schedule {
    /// Number of scheduled payments, excluding origination.
    pub fn payment_count(&self) -> usize {
        self.installments.len() - 1
    }

    /// Number of rows, origination included.
    pub fn len(&self) -> usize {
        self.installments.len()
    }

    /// Always false: origination is present in every schedule.
    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }

    pub fn get(&self, index: usize) -> MortgageResult<&Installment> {
        self.installments
            .get(index)
            .ok_or(MortgageError::IndexOutOfRange {
                index,
                min: 0,
                max: self.payment_count(),
            })
    }

    pub fn first(&self) -> &Installment {
        &self.installments[0]
    }

    pub fn last(&self) -> &Installment {
        &self.installments[self.installments.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Installment> {
        self.installments.iter()
    }

    pub fn as_slice(&self) -> &[Installment] {
        &self.installments
    }

    /// Every row quantized to currency precision.
    pub fn rounded(&self) -> Vec<Installment> {
        self.installments.iter().map(Installment::rounded).collect()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Installment;
    type IntoIter = std::slice::Iter<'a, Installment>;

    fn into_iter(self) -> Self::IntoIter {
        self.installments.iter()
    }
}

/// Build the full schedule in one forward pass.
///
/// Splits come from the closed form; only the running totals are
/// accumulated, so each row depends on its predecessor through
/// `cumulative_interest` and `remaining_balance` alone.
pub fn assemble(recurrence: &SplitRecurrence, principal: Money) -> MortgageResult<Schedule> {
    let count = recurrence.payment_count();
    let payment = recurrence.payment();
    let splits = evaluate_splits(recurrence)?;

    let mut installments = Vec::with_capacity(count + 1);
    installments.push(Installment::origination(principal));

    let mut cumulative_interest = Decimal::ZERO;
    let mut balance = principal;

    for (offset, split) in splits.into_iter().enumerate() {
        let index = offset + 1;
        cumulative_interest = cumulative_interest
            .checked_add(split.interest)
            .ok_or_else(|| MortgageError::Overflow {
                context: format!("cumulative interest at payment {index}"),
            })?;
        balance -= split.principal;

        log::trace!(
            "pmt # {index}, interest {}, principal {}, end bal {balance}",
            split.interest,
            split.principal
        );

        installments.push(Installment {
            index,
            payment_amount: payment,
            interest_portion: split.interest,
            principal_portion: split.principal,
            cumulative_interest,
            remaining_balance: balance,
        });
    }

    if balance.abs() >= CLOSURE_TOLERANCE {
        log::warn!("schedule closes with residual balance {balance} after {count} payments");
    }
    log::debug!(
        "assembled {count} payments: level payment {payment}, total interest {cumulative_interest}"
    );

    Ok(Schedule { installments })
}

#[cfg(not(feature = "parallel"))]
fn evaluate_splits(recurrence: &SplitRecurrence) -> MortgageResult<Vec<PaymentSplit>> {
    (1..=recurrence.payment_count())
        .map(|k| recurrence.split(k))
        .collect()
}

#[cfg(feature = "parallel")]
fn evaluate_splits(recurrence: &SplitRecurrence) -> MortgageResult<Vec<PaymentSplit>> {
    use rayon::prelude::*;

    (1..=recurrence.payment_count())
        .into_par_iter()
        .map(|k| recurrence.split(k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::{Compounding, LoanTerms, TermUnit};

    fn build(terms: &LoanTerms) -> Schedule {
        let rec = SplitRecurrence::new(terms).unwrap();
        assemble(&rec, terms.principal()).unwrap()
    }

    #[test]
    fn test_origination_row() {
        let terms = LoanTerms::monthly(dec!(200000), dec!(0.06), 30).unwrap();
        let schedule = build(&terms);
        let first = schedule.first();
        assert_eq!(first.index, 0);
        assert_eq!(first.payment_amount, Decimal::ZERO);
        assert_eq!(first.cumulative_interest, Decimal::ZERO);
        assert_eq!(first.remaining_balance, dec!(200000));
        assert_eq!(schedule.len(), 361);
        assert_eq!(schedule.payment_count(), 360);
    }

    #[test]
    fn test_rows_are_gapless_and_close() {
        let terms = LoanTerms::new(
            dec!(50000),
            dec!(0.045),
            3,
            TermUnit::Years,
            Compounding::Daily,
        )
        .unwrap();
        let schedule = build(&terms);
        for (pos, row) in schedule.iter().enumerate() {
            assert_eq!(row.index, pos);
        }
        assert!(schedule.last().remaining_balance.abs() < CLOSURE_TOLERANCE);
    }

    #[test]
    fn test_get_out_of_range() {
        let terms = LoanTerms::monthly(dec!(1000), dec!(0.05), 1).unwrap();
        let schedule = build(&terms);
        assert!(schedule.get(12).is_ok());
        assert!(matches!(
            schedule.get(13),
            Err(MortgageError::IndexOutOfRange { index: 13, min: 0, max: 12 })
        ));
    }

    #[test]
    fn test_rounded_row() {
        let terms = LoanTerms::monthly(dec!(200000), dec!(0.06), 30).unwrap();
        let schedule = build(&terms);
        let row = schedule.get(1).unwrap().rounded();
        assert_eq!(row.payment_amount.to_string(), "1199.10");
        assert_eq!(row.interest_portion.to_string(), "1000.00");
        assert_eq!(row.remaining_balance.to_string(), "199800.90");
    }
}
