//! Error types for textlens

use thiserror::Error;

/// Result type alias for textlens operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Main error type for textlens
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    /// Malformed caller arguments (length mismatches, bad regex, empty input)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration related errors (missing API key, endpoint, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM judge errors (API failures, unparseable judgments)
    #[error("LLM error: {0}")]
    Llm(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl EvalError {
    /// Create a new invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create a new HTTP error
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http(message.into())
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json(message.into())
    }
}

impl From<reqwest::Error> for EvalError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EvalError::invalid_input("prompts length 2 != outputs length 3");
        assert_eq!(
            err.to_string(),
            "Invalid input: prompts length 2 != outputs length 3"
        );

        let err = EvalError::llm("judge returned no choices");
        assert_eq!(err.to_string(), "LLM error: judge returned no choices");
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: EvalError = parse_err.into();
        assert!(matches!(err, EvalError::Json(_)));
    }
}
