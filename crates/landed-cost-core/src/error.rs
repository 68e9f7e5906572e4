use thiserror::Error;

#[derive(Debug, Error)]
pub enum LandedCostError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Arithmetic overflow in {context}: amounts exceed decimal range")]
    ArithmeticOverflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LandedCostError {
    fn from(e: serde_json::Error) -> Self {
        LandedCostError::SerializationError(e.to_string())
    }
}
