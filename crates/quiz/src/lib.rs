//! Quizsmith Quiz
//!
//! Turns language-model completions into validated multiple-choice quizzes.
//!
//! - `model` - Quiz data types and the shared shape constants
//! - `extract` - Payload slicing, strict-then-lenient parsing, list unwrapping
//! - `repair` - Lenient JSON repair for malformed model output
//! - `validate` - Schema validation and extraction policy
//! - `prompt` - The generation prompt the model is given
//! - `form` - Binding of a quiz to fixed question/answer slots

pub mod error;
pub mod extract;
pub mod form;
pub mod model;
pub mod prompt;
pub mod repair;
pub mod validate;

pub use error::{ExtractionError, ExtractionResult};
pub use extract::{extract_quiz, ExtractionReport, ParseStage, QuizExtractor};
pub use form::{QuestionSlot, QuizForm};
pub use model::{Question, Quiz, OPTIONS_PER_QUESTION, OPTION_LABELS, QUIZ_QUESTION_COUNT};
pub use prompt::{truncate_document, QuizPrompt};
pub use repair::{parse_lenient, repair_json};
pub use validate::{ExtractionPolicy, QuestionCountPolicy};
