//! Serializable entry point: terms in, summary and schedule out, wrapped in
//! the standard [`ComputationOutput`] envelope.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use crate::loan::Loan;
use crate::schedule::Installment;
use crate::summary::LoanSummary;
use crate::terms::{Compounding, LoanTerms, TermUnit};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    /// Amount borrowed.
    pub principal: Money,
    /// Nominal annual rate as a decimal (0.06 = 6%).
    pub annual_interest_rate: Rate,
    /// Loan duration in `term_unit`s.
    pub term: u32,
    #[serde(default)]
    pub term_unit: TermUnit,
    #[serde(default)]
    pub compounding: Compounding,
    /// Report only this installment (0 is origination).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<usize>,
    /// Report every installment.
    #[serde(default)]
    pub include_schedule: bool,
    /// Date of origination; reported rows carry dates when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl LoanInput {
    /// Parse a JSON request. An unrecognized `term_unit` or `compounding`
    /// is reported as invalid terms rather than a serialization error.
    pub fn from_json(json: &str) -> MortgageResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        if let Some(unit) = value.get("term_unit").and_then(Value::as_str) {
            unit.parse::<TermUnit>()?;
        }
        if let Some(compounding) = value.get("compounding").and_then(Value::as_str) {
            compounding.parse::<Compounding>()?;
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn terms(&self) -> MortgageResult<LoanTerms> {
        LoanTerms::new(
            self.principal,
            self.annual_interest_rate,
            self.term,
            self.term_unit,
            self.compounding,
        )
    }
}

/// A rounded installment, dated when a start date was supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub installment: Installment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysis {
    pub summary: LoanSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment: Option<ScheduleRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<ScheduleRow>>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn analyze_loan(input: &LoanInput) -> MortgageResult<ComputationOutput<LoanAnalysis>> {
    let start = Instant::now();
    let terms = input.terms()?;
    let warnings = collect_warnings(&terms, input);
    let loan = Loan::new(terms)?;

    let installment = match input.payment {
        Some(k) => Some(row(&loan, loan.installment(k)?, input.start_date)?),
        None => None,
    };

    let schedule = if input.include_schedule {
        Some(
            loan.schedule()
                .iter()
                .map(|inst| row(&loan, inst, input.start_date))
                .collect::<MortgageResult<Vec<_>>>()?,
        )
    } else {
        None
    };

    let output = LoanAnalysis {
        summary: loan.summary()?,
        installment,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate level-payment amortization (closed-form split)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn collect_warnings(terms: &LoanTerms, input: &LoanInput) -> Vec<String> {
    let mut warnings = Vec::new();

    if terms.annual_interest_rate().is_zero() {
        warnings.push("Zero interest rate: payments are principal only".to_string());
    }
    if terms.compounding() == Compounding::Daily {
        warnings.push(format!(
            "Daily compounding produces {} payments, one per day",
            terms.total_payment_count()
        ));
    }
    if terms.term_unit() != TermUnit::Years {
        warnings.push(format!(
            "Payment count is term x periods per year ({} x {}); \
             term_unit '{}' does not rescale it",
            terms.term(),
            terms.n_periods(),
            terms.term_unit()
        ));
    }
    if input.payment.is_some() && input.include_schedule {
        warnings.push("Both payment and include_schedule set; reporting both".to_string());
    }
    if input.start_date.is_some() && cfg!(not(feature = "calendar")) {
        warnings.push("start_date ignored: built without calendar support".to_string());
    }

    warnings
}

#[cfg(feature = "calendar")]
fn row(
    loan: &Loan,
    inst: &Installment,
    start: Option<NaiveDate>,
) -> MortgageResult<ScheduleRow> {
    let date = match start {
        Some(s) => Some(crate::calendar::payment_date(
            s,
            loan.terms().compounding(),
            inst.index,
        )?),
        None => None,
    };
    Ok(ScheduleRow {
        date,
        installment: inst.rounded(),
    })
}

#[cfg(not(feature = "calendar"))]
fn row(
    _loan: &Loan,
    inst: &Installment,
    _start: Option<NaiveDate>,
) -> MortgageResult<ScheduleRow> {
    Ok(ScheduleRow {
        date: None,
        installment: inst.rounded(),
    })
}
