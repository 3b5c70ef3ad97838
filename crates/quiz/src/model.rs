//! Quiz Model
//!
//! The fixed shape handed from extraction to rendering. The question and option
//! counts are shared constants so the validator, the prompt and the form
//! binding cannot drift apart.

use serde::{Deserialize, Serialize};

/// Number of questions a quiz is expected to carry.
pub const QUIZ_QUESTION_COUNT: usize = 5;

/// Number of options every question must carry.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Letter labels prefixed to options, in order (`"a. "`, `"b. "`, ...).
pub const OPTION_LABELS: [char; OPTIONS_PER_QUESTION] = ['a', 'b', 'c', 'd'];

/// Label prefix expected on the option at `index`, e.g. `"c. "`.
pub fn option_prefix(index: usize) -> Option<String> {
    OPTION_LABELS.get(index).map(|label| format!("{}. ", label))
}

/// A validated multiple-choice quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    /// One-sentence description of the source text
    pub topic: String,
    /// Questions in the order the model produced them
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Canonical JSON form.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Canonical pretty-printed JSON form.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Whether the quiz fills every slot the renderer shows.
    pub fn is_complete(&self) -> bool {
        self.questions.len() == QUIZ_QUESTION_COUNT
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// Always equal to one element of `options`
    pub right_option: String,
}

impl Question {
    /// Index of the right option within `options`.
    pub fn right_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o == &self.right_option)
    }

    /// Letter label of the right option, if it carries one.
    pub fn right_label(&self) -> Option<char> {
        self.right_index().and_then(|i| OPTION_LABELS.get(i).copied())
    }
}
