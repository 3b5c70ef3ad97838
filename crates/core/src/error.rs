//! Core Error Types
//!
//! Shared error type for the quizsmith workspace. Quiz extraction carries its
//! own taxonomy (`ExtractionError` in the quiz crate); everything else that can
//! go wrong (bad schedule entries, missing credentials, unreadable files) is
//! reported through `CoreError`.

use thiserror::Error;

/// Core error type for the quizsmith workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration errors (missing credentials, unsupported file formats)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed input entities
    #[error("Validation error: {0}")]
    Validation(String),

    /// Parse errors for structured input files
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Whether this error was caused by the caller's input rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(self, CoreError::Validation(_) | CoreError::Parse(_))
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::config("GROQ_API_KEY is not set");
        assert_eq!(
            err.to_string(),
            "Configuration error: GROQ_API_KEY is not set"
        );
    }

    #[test]
    fn test_error_conversion() {
        let err = CoreError::validation("start_date is required");
        let msg: String = err.into();
        assert!(msg.contains("Validation error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
        assert!(!core_err.is_input_error());
    }

    #[test]
    fn test_input_errors() {
        assert!(CoreError::validation("x").is_input_error());
        assert!(CoreError::parse("x").is_input_error());
        assert!(!CoreError::config("x").is_input_error());
    }
}
