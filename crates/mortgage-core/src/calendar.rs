//! Calendar dates for a built schedule.
//!
//! The schedule itself is indexed by payment number only. This module
//! attaches a date to each row after the fact: row 0 is the start date and
//! row `k` falls `k` compounding periods later.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::schedule::{Installment, Schedule};
use crate::terms::Compounding;
use crate::MortgageResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedInstallment {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub installment: Installment,
}

/// Date of payment `k` counted from `start`.
///
/// Month arithmetic is taken from `start` each time rather than chained,
/// so a loan opened on the 31st pays on the last day of short months and
/// returns to the 31st afterwards.
pub fn payment_date(
    start: NaiveDate,
    compounding: Compounding,
    k: usize,
) -> MortgageResult<NaiveDate> {
    let out_of_range =
        || MortgageError::DateError(format!("payment {k} from {start} is out of range"));
    let steps = u32::try_from(k).map_err(|_| out_of_range())?;

    let date = match compounding {
        Compounding::Daily => start.checked_add_days(Days::new(steps as u64)),
        Compounding::Monthly => start.checked_add_months(Months::new(steps)),
        Compounding::Annually => steps
            .checked_mul(12)
            .and_then(|months| start.checked_add_months(Months::new(months))),
    };
    date.ok_or_else(out_of_range)
}

/// Dates for rows `0..=count`.
pub fn payment_dates(
    start: NaiveDate,
    compounding: Compounding,
    count: usize,
) -> MortgageResult<Vec<NaiveDate>> {
    (0..=count)
        .map(|k| payment_date(start, compounding, k))
        .collect()
}

/// Pair every installment with its date.
pub fn annotate(
    schedule: &Schedule,
    start: NaiveDate,
    compounding: Compounding,
) -> MortgageResult<Vec<DatedInstallment>> {
    schedule
        .iter()
        .map(|row| {
            Ok(DatedInstallment {
                date: payment_date(start, compounding, row.index)?,
                installment: row.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::Loan;
    use crate::terms::LoanTerms;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_dates_clamp_to_month_end() {
        let start = date(2024, 1, 31);
        let dates = payment_dates(start, Compounding::Monthly, 3).unwrap();
        assert_eq!(
            dates,
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]
        );
    }

    #[test]
    fn test_daily_and_annual_dates() {
        let start = date(2023, 12, 30);
        assert_eq!(
            payment_date(start, Compounding::Daily, 3).unwrap(),
            date(2024, 1, 2)
        );
        assert_eq!(
            payment_date(date(2024, 2, 29), Compounding::Annually, 1).unwrap(),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn test_out_of_range_date() {
        let err = payment_date(NaiveDate::MAX, Compounding::Daily, 1).unwrap_err();
        assert!(matches!(err, MortgageError::DateError(_)));
    }

    #[test]
    fn test_annotate_schedule() {
        let loan = Loan::new(LoanTerms::monthly(dec!(200000), dec!(0.06), 30).unwrap()).unwrap();
        let dated = loan.dated_schedule(date(2024, 3, 1)).unwrap();
        assert_eq!(dated.len(), 361);
        assert_eq!(dated[0].date, date(2024, 3, 1));
        assert_eq!(dated[1].date, date(2024, 4, 1));
        assert_eq!(dated[360].date, date(2054, 3, 1));
        assert_eq!(dated[360].installment.index, 360);
    }
}
