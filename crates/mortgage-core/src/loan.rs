//! The amortization engine.
//!
//! A [`Loan`] validates its terms, evaluates the level payment, and builds
//! the whole schedule eagerly. After construction it only answers queries.

use serde::Serialize;

use crate::error::MortgageError;
use crate::schedule::{assemble, Installment, Schedule};
use crate::split::{PaymentSplit, SplitRecurrence};
use crate::summary::LoanSummary;
use crate::terms::{Compounding, LoanTerms, TermUnit};
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// Result of [`Loan::query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ScheduleView<'a> {
    All(&'a [Installment]),
    One(&'a Installment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    terms: LoanTerms,
    recurrence: SplitRecurrence,
    schedule: Schedule,
}

impl Loan {
    /// Build the loan and its full schedule.
    pub fn new(terms: LoanTerms) -> MortgageResult<Self> {
        let recurrence = SplitRecurrence::new(&terms)?;
        log::debug!(
            "loan principal={}, rate={}, term={} {}, compounding={}, payments={}",
            terms.principal(),
            terms.annual_interest_rate(),
            terms.term(),
            terms.term_unit(),
            terms.compounding(),
            recurrence.payment_count()
        );
        let schedule = assemble(&recurrence, terms.principal())?;

        Ok(Self {
            terms,
            recurrence,
            schedule,
        })
    }

    /// Validate raw terms and build the loan in one step.
    pub fn from_terms(
        principal: Money,
        annual_interest_rate: Rate,
        term: u32,
        term_unit: TermUnit,
        compounding: Compounding,
    ) -> MortgageResult<Self> {
        Self::new(LoanTerms::new(
            principal,
            annual_interest_rate,
            term,
            term_unit,
            compounding,
        )?)
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    pub fn total_payment_count(&self) -> usize {
        self.recurrence.payment_count()
    }

    /// The unrounded level payment.
    pub fn payment(&self) -> Money {
        self.recurrence.payment()
    }

    /// The full schedule, origination included.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Installment at `index` (0 is origination).
    pub fn installment(&self, index: usize) -> MortgageResult<&Installment> {
        self.schedule.get(index)
    }

    /// Everything when `index` is `None`, else the single installment.
    pub fn query(&self, index: Option<usize>) -> MortgageResult<ScheduleView<'_>> {
        match index {
            None => Ok(ScheduleView::All(self.schedule.as_slice())),
            Some(k) => self.installment(k).map(ScheduleView::One),
        }
    }

    /// Split of the level payment at `k`, computed without the schedule.
    pub fn split(&self, k: usize) -> MortgageResult<PaymentSplit> {
        self.recurrence.split(k)
    }

    /// Split an arbitrary `amount` paid as payment `k`.
    pub fn split_payment(&self, k: usize, amount: Money) -> MortgageResult<PaymentSplit> {
        self.recurrence.split_payment(k, amount)
    }

    /// Cumulative interest on the final installment.
    pub fn total_interest(&self) -> Money {
        self.schedule.last().cumulative_interest
    }

    pub fn summary(&self) -> MortgageResult<LoanSummary> {
        LoanSummary::from_loan(self)
    }

    /// Schedule with a calendar date on every row.
    #[cfg(feature = "calendar")]
    pub fn dated_schedule(
        &self,
        start: chrono::NaiveDate,
    ) -> MortgageResult<Vec<crate::calendar::DatedInstallment>> {
        crate::calendar::annotate(&self.schedule, start, self.terms.compounding())
    }
}

impl TryFrom<LoanTerms> for Loan {
    type Error = MortgageError;

    fn try_from(terms: LoanTerms) -> Result<Self, Self::Error> {
        Loan::new(terms)
    }
}
