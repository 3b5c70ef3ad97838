//! Quiz Schema Validation
//!
//! Walks a parsed JSON value and builds a `Quiz`, reporting the first
//! violation with the field path (`questions[2].options`) so bad model output
//! can be diagnosed.

use serde_json::{Map, Value};

use crate::error::{ExtractionError, ExtractionResult};
use crate::model::{option_prefix, Question, Quiz, OPTIONS_PER_QUESTION, QUIZ_QUESTION_COUNT};

/// How strictly the number of questions is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionCountPolicy {
    /// Accept one or more questions; anything past `QUIZ_QUESTION_COUNT` is dropped
    #[default]
    AtLeastOne,
    /// Require exactly `QUIZ_QUESTION_COUNT` questions
    Exact,
}

/// Validation knobs for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionPolicy {
    pub question_count: QuestionCountPolicy,
    /// Require option *i* to start with its letter label (`"a. "`, `"b. "`, ...)
    pub require_option_labels: bool,
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        Self {
            question_count: QuestionCountPolicy::AtLeastOne,
            require_option_labels: true,
        }
    }
}

impl ExtractionPolicy {
    /// Exact question count, labels checked.
    pub fn strict() -> Self {
        Self {
            question_count: QuestionCountPolicy::Exact,
            require_option_labels: true,
        }
    }
}

/// Outcome of validation: the quiz plus how many surplus questions were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    pub quiz: Quiz,
    pub discarded_questions: usize,
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn required_string<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    path: &str,
) -> ExtractionResult<&'a str> {
    match obj.get(field) {
        None => Err(ExtractionError::schema(format!(
            "{}: missing required field",
            path
        ))),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ExtractionError::schema(format!("{}: must not be empty", path)))
        }
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(ExtractionError::schema(format!(
            "{}: expected a string, got {}",
            path,
            type_name(other)
        ))),
    }
}

/// Validate a parsed payload against the quiz shape.
pub fn validate_quiz(value: &Value, policy: &ExtractionPolicy) -> ExtractionResult<Validated> {
    let obj = value.as_object().ok_or_else(|| {
        ExtractionError::schema(format!(
            "quiz: expected an object, got {}",
            type_name(value)
        ))
    })?;

    let topic = required_string(obj, "topic", "topic")?;

    let questions = match obj.get("questions") {
        None => return Err(ExtractionError::schema("questions: missing required field")),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ExtractionError::schema(format!(
                "questions: expected a list, got {}",
                type_name(other)
            )))
        }
    };

    if questions.is_empty() {
        return Err(ExtractionError::schema(
            "questions: must contain at least one question",
        ));
    }
    if policy.question_count == QuestionCountPolicy::Exact
        && questions.len() != QUIZ_QUESTION_COUNT
    {
        return Err(ExtractionError::schema(format!(
            "questions: expected {} questions, got {}",
            QUIZ_QUESTION_COUNT,
            questions.len()
        )));
    }

    let kept = questions.len().min(QUIZ_QUESTION_COUNT);
    let parsed = questions[..kept]
        .iter()
        .enumerate()
        .map(|(index, item)| validate_question(index, item, policy))
        .collect::<ExtractionResult<Vec<_>>>()?;

    Ok(Validated {
        quiz: Quiz {
            topic: topic.to_string(),
            questions: parsed,
        },
        discarded_questions: questions.len() - kept,
    })
}

fn validate_question(
    index: usize,
    value: &Value,
    policy: &ExtractionPolicy,
) -> ExtractionResult<Question> {
    let path = format!("questions[{}]", index);
    let obj = value.as_object().ok_or_else(|| {
        ExtractionError::schema(format!(
            "{}: expected an object, got {}",
            path,
            type_name(value)
        ))
    })?;

    let question = required_string(obj, "question", &format!("{}.question", path))?;

    let options_path = format!("{}.options", path);
    let raw_options = match obj.get("options") {
        None => {
            return Err(ExtractionError::schema(format!(
                "{}: missing required field",
                options_path
            )))
        }
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ExtractionError::schema(format!(
                "{}: expected a list, got {}",
                options_path,
                type_name(other)
            )))
        }
    };
    if raw_options.len() != OPTIONS_PER_QUESTION {
        return Err(ExtractionError::schema(format!(
            "{}: expected {} options, got {}",
            options_path,
            OPTIONS_PER_QUESTION,
            raw_options.len()
        )));
    }

    let mut options = Vec::with_capacity(OPTIONS_PER_QUESTION);
    for (i, option) in raw_options.iter().enumerate() {
        let text = option.as_str().ok_or_else(|| {
            ExtractionError::schema(format!(
                "{}[{}]: expected a string, got {}",
                options_path,
                i,
                type_name(option)
            ))
        })?;
        if policy.require_option_labels {
            let prefix = option_prefix(i).unwrap_or_default();
            if !text.starts_with(&prefix) {
                return Err(ExtractionError::schema(format!(
                    "{}[{}]: expected label '{}', got '{}'",
                    options_path,
                    i,
                    prefix.trim_end(),
                    text
                )));
            }
        }
        options.push(text.to_string());
    }

    let right_path = format!("{}.right_option", path);
    let right_option = required_string(obj, "right_option", &right_path)?;
    if !options.iter().any(|o| o == right_option) {
        return Err(ExtractionError::schema(format!(
            "{}: '{}' is not one of the options",
            right_path, right_option
        )));
    }

    Ok(Question {
        question: question.to_string(),
        options,
        right_option: right_option.to_string(),
    })
}
