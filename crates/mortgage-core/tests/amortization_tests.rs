use mortgage_core::rounding::quantize;
use mortgage_core::summary::apr;
use mortgage_core::{Compounding, Loan, LoanTerms, MortgageError, TermUnit};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const TOL: Decimal = dec!(0.01);

fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{}: expected ~{}, got {} (diff = {})",
        msg,
        expected,
        actual,
        diff
    );
}

fn loan_200k() -> Loan {
    Loan::new(LoanTerms::monthly(dec!(200000), dec!(0.06), 30).unwrap()).unwrap()
}

/// A spread of terms covering every compounding, zero rate, and the rate
/// bounds.
fn sample_terms() -> Vec<LoanTerms> {
    vec![
        LoanTerms::monthly(dec!(200000), dec!(0.06), 30).unwrap(),
        LoanTerms::monthly(dec!(200000), dec!(0.06), 15).unwrap(),
        LoanTerms::monthly(dec!(350000.55), dec!(0.04125), 20).unwrap(),
        LoanTerms::monthly(dec!(15000), Decimal::ZERO, 5).unwrap(),
        LoanTerms::monthly(dec!(999.99), Decimal::ONE, 3).unwrap(),
        LoanTerms::monthly(dec!(200000), Decimal::ONE, 60).unwrap(),
        LoanTerms::new(dec!(25000), dec!(0.07), 5, TermUnit::Years, Compounding::Daily).unwrap(),
        LoanTerms::new(dec!(1000), dec!(0.05), 10, TermUnit::Years, Compounding::Annually).unwrap(),
        LoanTerms::new(dec!(1), dec!(0.0001), 1, TermUnit::Days, Compounding::Annually).unwrap(),
    ]
}

// ===========================================================================
// Canonical 30-year fixture
// ===========================================================================

#[test]
fn test_monthly_payment_fixture() {
    let summary = loan_200k().summary().unwrap();
    assert_eq!(summary.monthly_payment, dec!(1199.10));
}

#[test]
fn test_nth_installment_fixture() {
    let loan = loan_200k();
    // (k, principal, interest, cumulative interest, balance)
    let expected = [
        (1, dec!(199.10), dec!(1000.00), dec!(1000.00), dec!(199800.90)),
        (5, dec!(203.11), dec!(995.99), dec!(4990.00), dec!(198994.49)),
        (10, dec!(208.24), dec!(990.86), dec!(9954.60), dec!(197963.59)),
        (360, dec!(1193.14), dec!(5.97), dec!(231676.38), dec!(0.00)),
    ];

    for (k, principal, interest, cumulative, balance) in expected {
        let row = loan.installment(k).unwrap().rounded();
        assert_eq!(row.principal_portion, principal, "principal of payment {k}");
        assert_eq!(row.interest_portion, interest, "interest of payment {k}");
        assert_eq!(row.cumulative_interest, cumulative, "cumulative interest of payment {k}");
        assert_eq!(row.remaining_balance, balance, "balance after payment {k}");
    }
}

#[test]
fn test_summary_fixture() {
    let summary = loan_200k().summary().unwrap();
    assert_eq!(summary.apy, dec!(6.17));
    assert_eq!(summary.apr, dec!(6.00));
    assert_eq!(summary.total_principal, dec!(200000.00));
    assert_eq!(summary.total_interest, dec!(231676.38));
    assert_eq!(summary.total_paid, dec!(431676.38));
    assert_eq!(summary.interest_to_principal_ratio, dec!(115.8));
    assert_eq!(summary.years_to_pay, dec!(30.0));
    assert_eq!(summary.term, 30);
    assert_eq!(summary.annual_interest_rate, dec!(0.06));
}

#[test]
fn test_fifteen_year_summary() {
    let loan = Loan::new(LoanTerms::monthly(dec!(200000), dec!(0.06), 15).unwrap()).unwrap();
    let summary = loan.summary().unwrap();
    assert_eq!(summary.total_principal, dec!(200000.00));
    assert_eq!(summary.apr, dec!(6.00));
    assert_eq!(summary.apy, dec!(6.17));
    assert_eq!(summary.years_to_pay, dec!(15.0));
    assert_eq!(summary.monthly_payment, dec!(1687.71));
}

#[test]
fn test_apr_matches_nominal_rate_only_up_to_cent_rounding() {
    // APR is simple interest: it ignores compounding, unlike APY.
    let summary = loan_200k().summary().unwrap();
    assert_eq!(summary.apr, summary.annual_interest_rate * dec!(100));
    assert!(summary.apy > summary.apr);

    // On a tiny principal the cent rounding of one year's interest shows.
    assert_eq!(apr(dec!(1), dec!(0.06125)), dec!(6.00));
    assert_ne!(apr(dec!(1), dec!(0.06125)), dec!(0.06125) * dec!(100));
}

#[test]
fn test_reported_values_have_currency_scale() {
    let summary = loan_200k().summary().unwrap();
    assert_eq!(summary.monthly_payment.to_string(), "1199.10");
    assert_eq!(summary.total_paid.to_string(), "431676.38");
    assert_eq!(summary.years_to_pay.to_string(), "30.0");
}

// ===========================================================================
// Schedule properties
// ===========================================================================

#[test]
fn test_amortization_closure() {
    for terms in sample_terms() {
        let loan = Loan::new(terms.clone()).unwrap();
        let last = loan.schedule().last();
        assert_eq!(last.index, terms.total_payment_count());
        assert_close(last.remaining_balance, Decimal::ZERO, TOL, &format!("{terms:?}"));
    }
}

#[test]
fn test_principal_plus_interest_is_payment() {
    for terms in sample_terms() {
        let loan = Loan::new(terms).unwrap();
        for row in loan.schedule().iter().skip(1) {
            assert_close(
                row.principal_portion + row.interest_portion,
                row.payment_amount,
                dec!(0.0000001),
                &format!("payment {}", row.index),
            );
        }
    }
}

#[test]
fn test_cumulative_interest_non_decreasing() {
    for terms in sample_terms() {
        let loan = Loan::new(terms).unwrap();
        let rows = loan.schedule().as_slice();
        for pair in rows.windows(2) {
            assert!(
                pair[1].cumulative_interest >= pair[0].cumulative_interest,
                "cumulative interest fell at payment {}",
                pair[1].index
            );
        }
    }
}

#[test]
fn test_balance_non_increasing() {
    for terms in sample_terms() {
        let loan = Loan::new(terms).unwrap();
        let rows = loan.schedule().as_slice();
        for pair in rows.windows(2) {
            assert!(
                pair[1].remaining_balance <= pair[0].remaining_balance,
                "balance rose at payment {}",
                pair[1].index
            );
        }
    }
}

#[test]
fn test_total_interest_matches_final_cumulative() {
    for terms in sample_terms() {
        let loan = Loan::new(terms).unwrap();
        let summary = loan.summary().unwrap();
        assert_eq!(
            summary.total_interest,
            quantize(loan.schedule().last().cumulative_interest)
        );
    }
}

#[test]
fn test_determinism() {
    for terms in sample_terms() {
        let a = Loan::new(terms.clone()).unwrap();
        let b = Loan::new(terms).unwrap();
        assert_eq!(a.schedule(), b.schedule());
        assert_eq!(a.schedule().rounded(), b.schedule().rounded());
        assert_eq!(a.summary().unwrap(), b.summary().unwrap());
    }
}

#[test]
fn test_zero_rate_edge_case() {
    let terms = LoanTerms::monthly(dec!(15000), Decimal::ZERO, 5).unwrap();
    let loan = Loan::new(terms).unwrap();
    assert_eq!(loan.payment(), dec!(250));
    for row in loan.schedule().iter().skip(1) {
        assert_eq!(row.interest_portion, Decimal::ZERO);
        assert_eq!(row.principal_portion, dec!(250));
    }
    let summary = loan.summary().unwrap();
    assert_eq!(summary.total_interest, dec!(0.00));
    assert_eq!(summary.interest_to_principal_ratio, dec!(0.0));
    assert_eq!(summary.apy, dec!(0.00));
    assert_eq!(loan.schedule().last().remaining_balance, Decimal::ZERO);
}

#[test]
fn test_full_rate_long_terms_close() {
    for years in [60, 70, 100] {
        let terms = LoanTerms::monthly(dec!(200000), Decimal::ONE, years).unwrap();
        let loan = Loan::new(terms).unwrap();
        assert_eq!(loan.total_payment_count(), years as usize * 12);
        assert_close(
            loan.schedule().last().remaining_balance,
            Decimal::ZERO,
            TOL,
            &format!("{years} years at 100%"),
        );
        assert!(loan.payment() >= dec!(200000) / dec!(12));
        assert!(loan.summary().is_ok());
    }
}

// ===========================================================================
// Queries and errors
// ===========================================================================

#[test]
fn test_index_out_of_range() {
    let loan = loan_200k();
    assert!(loan.installment(0).is_ok());
    assert!(loan.installment(360).is_ok());
    let err = loan.installment(361).unwrap_err();
    assert!(matches!(
        err,
        MortgageError::IndexOutOfRange { index: 361, min: 0, max: 360 }
    ));
    assert_eq!(
        err.to_string(),
        "Index out of range: payment 361 is outside 0..=360"
    );
}

#[test]
fn test_sub_cent_principal_summary_fails_cleanly() {
    let loan = Loan::new(LoanTerms::monthly(dec!(0.004), dec!(0.06), 1).unwrap()).unwrap();
    assert_eq!(loan.schedule().len(), 13);
    let err = loan.summary().unwrap_err();
    assert!(matches!(err, MortgageError::DivisionByZero { .. }));
    assert!(err.to_string().contains("interest to principal ratio"));
}

#[test]
fn test_validation_messages() {
    let cases = [
        (LoanTerms::monthly(dec!(0), dec!(0.06), 30), "Invalid principal: principal must be positive."),
        (
            LoanTerms::monthly(dec!(1000), dec!(2), 30),
            "Invalid annual_interest_rate: rate must be between 0 and 1 inclusive.",
        ),
        (LoanTerms::monthly(dec!(1000), dec!(0.06), 0), "Invalid term: term must be positive."),
    ];
    for (result, message) in cases {
        assert_eq!(result.unwrap_err().to_string(), message);
    }
}

#[test]
fn test_daily_compounding_schedule_length() {
    let terms =
        LoanTerms::new(dec!(25000), dec!(0.07), 5, TermUnit::Years, Compounding::Daily).unwrap();
    let loan = Loan::new(terms).unwrap();
    assert_eq!(loan.total_payment_count(), 1825);
    assert_eq!(loan.schedule().len(), 1826);
    assert_eq!(loan.summary().unwrap().years_to_pay, dec!(152.1));
}
