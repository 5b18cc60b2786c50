//! Loan terms and their validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// Unit in which the loan term is expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum TermUnit {
    Days,
    Months,
    #[default]
    Years,
}

impl TermUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TermUnit::Days => "days",
            TermUnit::Months => "months",
            TermUnit::Years => "years",
        }
    }
}

impl fmt::Display for TermUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TermUnit {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "days" => Ok(TermUnit::Days),
            "months" => Ok(TermUnit::Months),
            "years" => Ok(TermUnit::Years),
            _ => Err(MortgageError::invalid(
                "term_unit",
                "term_unit must be one of days, months, or years.",
            )),
        }
    }
}

impl TryFrom<String> for TermUnit {
    type Error = MortgageError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// How often interest compounds per year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Compounding {
    Daily,
    #[default]
    Monthly,
    Annually,
}

impl Compounding {
    /// Compounding periods per year.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Compounding::Daily => 365,
            Compounding::Monthly => 12,
            Compounding::Annually => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Compounding::Daily => "daily",
            Compounding::Monthly => "monthly",
            Compounding::Annually => "annually",
        }
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compounding {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Compounding::Daily),
            "monthly" => Ok(Compounding::Monthly),
            "annually" => Ok(Compounding::Annually),
            _ => Err(MortgageError::invalid(
                "compounding",
                "compounding must be one of daily, monthly, or annually.",
            )),
        }
    }
}

impl TryFrom<String> for Compounding {
    type Error = MortgageError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Validated, immutable terms of a fixed-rate loan.
///
/// Fields are private so a `LoanTerms` value can only exist once it has
/// passed [`LoanTerms::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLoanTerms")]
pub struct LoanTerms {
    principal: Money,
    annual_interest_rate: Rate,
    term: u32,
    term_unit: TermUnit,
    compounding: Compounding,
}

#[derive(Deserialize)]
struct RawLoanTerms {
    principal: Money,
    annual_interest_rate: Rate,
    term: u32,
    #[serde(default)]
    term_unit: TermUnit,
    #[serde(default)]
    compounding: Compounding,
}

impl TryFrom<RawLoanTerms> for LoanTerms {
    type Error = MortgageError;

    fn try_from(raw: RawLoanTerms) -> Result<Self, Self::Error> {
        LoanTerms::new(
            raw.principal,
            raw.annual_interest_rate,
            raw.term,
            raw.term_unit,
            raw.compounding,
        )
    }
}

impl LoanTerms {
    pub fn new(
        principal: Money,
        annual_interest_rate: Rate,
        term: u32,
        term_unit: TermUnit,
        compounding: Compounding,
    ) -> MortgageResult<Self> {
        if principal <= Decimal::ZERO {
            return Err(MortgageError::invalid(
                "principal",
                "principal must be positive.",
            ));
        }
        if annual_interest_rate < Decimal::ZERO || annual_interest_rate > Decimal::ONE {
            return Err(MortgageError::invalid(
                "annual_interest_rate",
                "rate must be between 0 and 1 inclusive.",
            ));
        }
        if term == 0 {
            return Err(MortgageError::invalid("term", "term must be positive."));
        }

        Ok(Self {
            principal,
            annual_interest_rate,
            term,
            term_unit,
            compounding,
        })
    }

    /// Terms with a term in years and monthly compounding.
    pub fn monthly(
        principal: Money,
        annual_interest_rate: Rate,
        years: u32,
    ) -> MortgageResult<Self> {
        Self::new(
            principal,
            annual_interest_rate,
            years,
            TermUnit::Years,
            Compounding::Monthly,
        )
    }

    /// Parse unit and compounding from their lowercase names, then validate.
    pub fn parse(
        principal: Money,
        annual_interest_rate: Rate,
        term: u32,
        term_unit: &str,
        compounding: &str,
    ) -> MortgageResult<Self> {
        Self::new(
            principal,
            annual_interest_rate,
            term,
            term_unit.parse()?,
            compounding.parse()?,
        )
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn annual_interest_rate(&self) -> Rate {
        self.annual_interest_rate
    }

    pub fn term(&self) -> u32 {
        self.term
    }

    pub fn term_unit(&self) -> TermUnit {
        self.term_unit
    }

    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// Compounding (and payment) periods per year.
    pub fn n_periods(&self) -> u32 {
        self.compounding.periods_per_year()
    }

    /// `term * n_periods`. The unit of `term` does not enter the count.
    pub fn total_payment_count(&self) -> usize {
        self.term as usize * self.n_periods() as usize
    }

    /// Interest rate per compounding period.
    pub fn periodic_rate(&self) -> Rate {
        self.annual_interest_rate / Decimal::from(self.n_periods())
    }
}
