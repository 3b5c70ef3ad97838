//! Extraction errors
//!
//! Every variant is recoverable: the caller is expected to show a message or
//! ask the model again, not to abort.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The text contains no `{`, `}`, `[` or `]` at all
    #[error("no structured content found in model output")]
    NoStructuredContent,

    /// Neither the strict nor the lenient parser accepted the candidate slice
    #[error("model output could not be parsed (strict: {strict}; lenient: {lenient})")]
    Unparseable { strict: String, lenient: String },

    /// The payload was a list with nothing in it
    #[error("model output contained an empty list")]
    EmptyContainer,

    /// The payload parsed but does not have the quiz shape
    #[error("quiz schema violation: {0}")]
    SchemaViolation(String),
}

impl ExtractionError {
    pub(crate) fn schema(detail: impl Into<String>) -> Self {
        Self::SchemaViolation(detail.into())
    }

    /// Short machine-friendly name of the variant, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::NoStructuredContent => "no_structured_content",
            ExtractionError::Unparseable { .. } => "unparseable",
            ExtractionError::EmptyContainer => "empty_container",
            ExtractionError::SchemaViolation(_) => "schema_violation",
        }
    }
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExtractionError::schema("questions[1].options: expected 4 options, got 3");
        assert_eq!(
            err.to_string(),
            "quiz schema violation: questions[1].options: expected 4 options, got 3"
        );
        assert_eq!(err.kind(), "schema_violation");
    }

    #[test]
    fn test_unparseable_display() {
        let err = ExtractionError::Unparseable {
            strict: "expected value".to_string(),
            lenient: "EOF".to_string(),
        };
        assert!(err.to_string().contains("strict: expected value"));
    }
}
