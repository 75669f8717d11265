use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PurchasePowerError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl PurchasePowerError {
    /// True for errors the caller caused (maps to a 400-style response);
    /// everything else is an engine or policy fault.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            PurchasePowerError::InvalidInput { .. } | PurchasePowerError::SerializationError(_)
        )
    }
}

impl From<serde_json::Error> for PurchasePowerError {
    fn from(e: serde_json::Error) -> Self {
        PurchasePowerError::SerializationError(e.to_string())
    }
}
