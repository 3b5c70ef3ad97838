//! Quiz Extraction
//!
//! Even when told to answer with JSON only, models often wrap the object in
//! prose or markdown fences, or emit slightly broken JSON. Extraction runs in
//! four steps:
//!
//! 1. Slice from the first `{`/`[` to the last `}`/`]`
//! 2. Parse strictly, falling back to the lenient repair parser
//! 3. Unwrap a top-level list to its first element
//! 4. Validate against the quiz shape
//!
//! The slicing is a heuristic, not a grammar-aware scan: text holding several
//! independent JSON blocks, or brackets inside prose after the payload, will be
//! mis-sliced. A JSON-boundary scanner that tracks string state would fix that
//! but changes which outputs are accepted.

use serde_json::Value;

use crate::error::{ExtractionError, ExtractionResult};
use crate::model::Quiz;
use crate::repair::parse_lenient;
use crate::validate::{validate_quiz, ExtractionPolicy};

/// Which parser accepted the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    Strict,
    Lenient,
}

/// A validated quiz plus what it took to get it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub quiz: Quiz,
    pub stage: ParseStage,
    /// Whether the payload was a list and its first element was used
    pub unwrapped_list: bool,
    /// Questions dropped past the expected count
    pub discarded_questions: usize,
}

/// Locate the candidate payload inside raw model output.
///
/// Returns the slice between the first opening bracket and the last closing
/// bracket, inclusive. When there is no opener, no closer, or the last closer
/// comes before the first opener, the slice is empty and fails to parse.
pub fn candidate_payload(raw: &str) -> ExtractionResult<&str> {
    let start = raw.find(['{', '[']);
    let end = raw.rfind(['}', ']']);

    match (start, end) {
        (None, None) => Err(ExtractionError::NoStructuredContent),
        (Some(start), Some(end)) if end >= start => Ok(&raw[start..=end]),
        _ => Ok(""),
    }
}

/// Strict parse, then lenient repair.
pub fn parse_payload(candidate: &str) -> ExtractionResult<(Value, ParseStage)> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => Ok((value, ParseStage::Strict)),
        Err(strict) => match parse_lenient(candidate) {
            Ok(value) => {
                tracing::warn!(error = %strict, "model output was not valid JSON, repaired it");
                Ok((value, ParseStage::Lenient))
            }
            Err(lenient) => Err(ExtractionError::Unparseable {
                strict: strict.to_string(),
                lenient,
            }),
        },
    }
}

/// Extracts validated quizzes from model completions.
#[derive(Debug, Clone, Default)]
pub struct QuizExtractor {
    policy: ExtractionPolicy,
}

impl QuizExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ExtractionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ExtractionPolicy {
        &self.policy
    }

    /// Extract a quiz from raw model output.
    pub fn extract(&self, raw_text: &str) -> ExtractionResult<Quiz> {
        self.extract_with_report(raw_text).map(|report| report.quiz)
    }

    /// Extract a quiz and report how it was recovered.
    pub fn extract_with_report(&self, raw_text: &str) -> ExtractionResult<ExtractionReport> {
        let result = self.run(raw_text);
        if let Err(e) = &result {
            tracing::debug!(kind = e.kind(), error = %e, "quiz extraction failed");
        }
        result
    }

    fn run(&self, raw_text: &str) -> ExtractionResult<ExtractionReport> {
        let candidate = candidate_payload(raw_text)?;
        let (value, stage) = parse_payload(candidate)?;

        let (value, unwrapped_list) = match value {
            Value::Array(items) => {
                let first = items
                    .into_iter()
                    .next()
                    .ok_or(ExtractionError::EmptyContainer)?;
                (first, true)
            }
            other => (other, false),
        };

        tracing::debug!(payload = %value, ?stage, unwrapped_list, "parsed quiz payload");

        let validated = validate_quiz(&value, &self.policy)?;
        if validated.discarded_questions > 0 {
            tracing::warn!(
                discarded = validated.discarded_questions,
                "model returned more questions than expected, extra ones dropped"
            );
        }

        Ok(ExtractionReport {
            quiz: validated.quiz,
            stage,
            unwrapped_list,
            discarded_questions: validated.discarded_questions,
        })
    }
}

/// Extract a quiz with the default policy.
pub fn extract_quiz(raw_text: &str) -> ExtractionResult<Quiz> {
    QuizExtractor::new().extract(raw_text)
}
