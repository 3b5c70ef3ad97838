//! Quizsmith
//!
//! Two independent text transforms:
//!
//! - quiz extraction: model completion text → validated `Quiz`
//!   (`quizsmith-quiz`)
//! - CASE generation: date-range schedules → SQL `CASE WHEN` statements
//!   (`quizsmith-sqlgen`)
//!
//! This crate adds schedule file loading and the `quizsmith` command-line
//! tool on top.

pub mod schedule;

pub use quizsmith_core::{
    CoreError, CoreResult, GeneratorConfig, GeneratorConfigBuilder, OcrConfig, OcrConfigBuilder,
};
pub use quizsmith_quiz::{
    extract_quiz, ExtractionError, ExtractionPolicy, ExtractionReport, ParseStage,
    QuestionCountPolicy, Question, Quiz, QuizExtractor, QuizForm, QuizPrompt,
    OPTIONS_PER_QUESTION, QUIZ_QUESTION_COUNT,
};
pub use quizsmith_sqlgen::{
    CaseExpressionBuilder, CaseValue, DateRangeEntry, IdentifierPolicy, OverlapPolicy,
    RawDateRangeEntry,
};
pub use schedule::{load_schedule, Schedule, ScheduleFormat};
