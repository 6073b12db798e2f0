use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoiError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },
}

impl RoiError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        RoiError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
