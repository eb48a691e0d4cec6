use thiserror::Error;

#[derive(Debug, Error)]
pub enum DerivLabError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Model inconsistency: {0}")]
    ModelInconsistency(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DerivLabError {
    /// Shorthand for the common `InvalidInput` construction.
    pub fn invalid(field: &str, reason: &str) -> Self {
        DerivLabError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for DerivLabError {
    fn from(e: serde_json::Error) -> Self {
        DerivLabError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = DerivLabError::invalid("up_factor", "must be greater than 1");
        assert_eq!(
            err.to_string(),
            "Invalid input: up_factor — must be greater than 1"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: DerivLabError = parse.unwrap_err().into();
        assert!(matches!(err, DerivLabError::SerializationError(_)));
    }
}
