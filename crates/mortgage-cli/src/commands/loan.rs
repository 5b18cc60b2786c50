use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use mortgage_core::analysis::{self, LoanInput};
use mortgage_core::rounding::quantize;
use mortgage_core::{Compounding, Loan, TermUnit};

use crate::input;

/// Loan terms shared by every subcommand
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual interest rate as a decimal (e.g. 0.06)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term, in --term-unit
    #[arg(long)]
    pub term: Option<u32>,

    /// Unit of the term: days, months, or years
    #[arg(long, default_value = "years")]
    pub term_unit: TermUnit,

    /// Compounding frequency: daily, monthly, or annually
    #[arg(long, default_value = "monthly")]
    pub compounding: Compounding,

    /// Origination date (YYYY-MM-DD); dates each reported installment
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Arguments for loan summary statistics
#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Report only this installment (0 is origination)
    #[arg(long)]
    pub payment: Option<usize>,
}

/// Arguments for splitting an arbitrary payment
#[derive(Args)]
pub struct SplitArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Payment number to split (1-based)
    #[arg(long)]
    pub payment: usize,

    /// Amount paid; defaults to the scheduled level payment
    #[arg(long)]
    pub amount: Option<Decimal>,
}

fn resolve_input(args: &LoanArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_loan_input(path);
    }
    if let Some(loan_input) = input::stdin::read_stdin_input()? {
        return Ok(loan_input);
    }

    let principal = args
        .principal
        .ok_or("--principal is required (or provide --input)")?;
    let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
    let term = args.term.ok_or("--term is required (or provide --input)")?;

    Ok(LoanInput {
        principal,
        annual_interest_rate: rate,
        term,
        term_unit: args.term_unit,
        compounding: args.compounding,
        payment: None,
        include_schedule: false,
        start_date: args.start_date,
    })
}

pub fn run_summary(args: SummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut loan_input = resolve_input(&args.loan)?;
    loan_input.payment = None;
    loan_input.include_schedule = false;

    let output = analysis::analyze_loan(&loan_input)?;
    let mut value = serde_json::to_value(&output)?;
    value["result"] = serde_json::to_value(&output.result.summary)?;
    Ok(value)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut loan_input = resolve_input(&args.loan)?;
    if args.payment.is_some() {
        loan_input.payment = args.payment;
    }
    loan_input.include_schedule = loan_input.payment.is_none();

    let output = analysis::analyze_loan(&loan_input)?;
    let mut value = serde_json::to_value(&output)?;
    value["result"] = match (&output.result.installment, &output.result.schedule) {
        (Some(row), _) => serde_json::to_value(row)?,
        (None, Some(rows)) => serde_json::to_value(rows)?,
        (None, None) => Value::Array(Vec::new()),
    };
    Ok(value)
}

pub fn run_split(args: SplitArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = resolve_input(&args.loan)?;
    let loan = Loan::new(loan_input.terms()?)?;
    let amount = args.amount.unwrap_or_else(|| loan.payment());
    let split = loan.split_payment(args.payment, amount)?;

    Ok(json!({
        "result": {
            "payment": args.payment,
            "amount": quantize(amount).to_string(),
            "interest": quantize(split.interest).to_string(),
            "principal": quantize(split.principal).to_string(),
        },
        "methodology": "Closed-form interest portion; principal is the remainder",
        "warnings": [],
    }))
}
