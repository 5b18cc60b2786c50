use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortgageError {
    #[error("Invalid {field}: {reason}")]
    InvalidTerms { field: String, reason: String },

    #[error("Index out of range: payment {index} is outside {min}..={max}")]
    IndexOutOfRange { index: usize, min: usize, max: usize },

    #[error("Decimal overflow in {context}")]
    Overflow { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl MortgageError {
    pub(crate) fn invalid(field: &str, reason: &str) -> Self {
        MortgageError::InvalidTerms {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for MortgageError {
    fn from(e: serde_json::Error) -> Self {
        MortgageError::SerializationError(e.to_string())
    }
}
