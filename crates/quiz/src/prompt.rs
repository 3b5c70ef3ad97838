//! Quiz Generation Prompt
//!
//! Builds the instruction text sent to the model together with the source
//! documents. The shape it asks for is the shape `validate` checks, and the
//! counts come from the same constants.

use crate::model::{OPTIONS_PER_QUESTION, QUIZ_QUESTION_COUNT};

/// Default per-document character limit.
pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 5000;

/// Slack allowed past the limit before a document is cut.
const TRUNCATE_LEEWAY: usize = 5;
const TRUNCATE_SUFFIX: &str = "...";

/// Shorten `text` to about `max_chars` characters.
///
/// Text within `max_chars + 5` is returned whole. Longer text is cut to
/// `max_chars - 3` characters, backed up to the last space, and suffixed with
/// `"..."`.
pub fn truncate_document(text: &str, max_chars: usize) -> String {
    let len = text.chars().count();
    if len <= max_chars + TRUNCATE_LEEWAY {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(TRUNCATE_SUFFIX.len());
    let head: String = text.chars().take(keep).collect();
    let head = match head.rfind(' ') {
        Some(idx) => &head[..idx],
        None => head.as_str(),
    };
    tracing::debug!(chars = len, max_chars, "truncated source document");
    format!("{}{}", head, TRUNCATE_SUFFIX)
}

/// Renders the quiz-generation prompt.
#[derive(Debug, Clone)]
pub struct QuizPrompt {
    max_document_chars: usize,
}

impl Default for QuizPrompt {
    fn default() -> Self {
        Self {
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
        }
    }
}

impl QuizPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_document_chars(mut self, max_chars: usize) -> Self {
        self.max_document_chars = max_chars;
        self
    }

    fn instructions() -> String {
        format!(
            r#"Given the following text, create {count} multiple choice quizzes in JSON format.
Each question should have {options} different options, and only one of them should be correct.
The options should be unambiguous.
Each option should begin with a letter followed by a period and a space (e.g., "a. option").
The question should also briefly mention the general topic of the text so that it can be understood in isolation.
Each question should not give hints to answer the other questions.
Include challenging questions, which require reasoning.

respond with JSON only, no markdown or descriptions.

example JSON format you should absolutely follow:
{{"topic": "a sentence explaining the topic of the text",
 "questions":
  [
    {{
      "question": "text of the question",
      "options": ["a. 1st option", "b. 2nd option", "c. 3rd option", "d. 4th option"],
      "right_option": "c. 3rd option"  # the right option
    }}, ...
  ]
}}

text:
"#,
            count = QUIZ_QUESTION_COUNT,
            options = OPTIONS_PER_QUESTION,
        )
    }

    /// Render the prompt for the given documents, each truncated.
    pub fn render<S: AsRef<str>>(&self, documents: &[S]) -> String {
        let mut prompt = Self::instructions();
        for doc in documents {
            prompt.push_str(&truncate_document(doc.as_ref(), self.max_document_chars));
        }
        prompt
    }
}
