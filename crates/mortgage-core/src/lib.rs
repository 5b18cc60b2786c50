pub mod analysis;
pub mod error;
pub mod loan;
pub mod payment;
pub mod rounding;
pub mod schedule;
pub mod split;
pub mod summary;
pub mod terms;
pub mod types;

#[cfg(feature = "calendar")]
pub mod calendar;

pub use error::MortgageError;
pub use loan::{Loan, ScheduleView};
pub use schedule::{Installment, Schedule};
pub use split::PaymentSplit;
pub use summary::LoanSummary;
pub use terms::{Compounding, LoanTerms, TermUnit};
pub use types::*;

/// Standard result type for all mortgage-core operations
pub type MortgageResult<T> = Result<T, MortgageError>;
