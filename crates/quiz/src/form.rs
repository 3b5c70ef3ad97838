//! Quiz Form Binding
//!
//! Maps a `Quiz` onto the fixed set of slots a quiz page shows: one radio
//! group per question and one answer field per question, always
//! `QUIZ_QUESTION_COUNT` of each. Slots without a question stay hidden.

use serde::{Deserialize, Serialize};

use crate::model::{Quiz, QUIZ_QUESTION_COUNT};

pub const ANSWERS_HEADING: &str = "## Answers";

/// One question's radio group plus its answer field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionSlot {
    /// `"Question {n} : {question}"`
    pub label: String,
    pub choices: Vec<String>,
    /// `"Question {n}"`
    pub answer_label: String,
    pub answer: String,
    pub visible: bool,
}

/// Every slot on the quiz page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizForm {
    pub topic: String,
    pub answers_heading: String,
    pub slots: Vec<QuestionSlot>,
}

impl QuizForm {
    pub fn from_quiz(quiz: &Quiz) -> Self {
        let slots = (0..QUIZ_QUESTION_COUNT)
            .map(|i| match quiz.questions.get(i) {
                Some(q) => QuestionSlot {
                    label: format!("Question {} : {}", i + 1, q.question),
                    choices: q.options.clone(),
                    answer_label: format!("Question {}", i + 1),
                    answer: q.right_option.clone(),
                    visible: true,
                },
                None => QuestionSlot::default(),
            })
            .collect();

        Self {
            topic: quiz.topic.clone(),
            answers_heading: ANSWERS_HEADING.to_string(),
            slots,
        }
    }

    pub fn visible_slots(&self) -> impl Iterator<Item = &QuestionSlot> {
        self.slots.iter().filter(|s| s.visible)
    }
}

impl From<&Quiz> for QuizForm {
    fn from(quiz: &Quiz) -> Self {
        Self::from_quiz(quiz)
    }
}
