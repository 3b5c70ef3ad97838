//! Quiz Extraction Integration Tests
//!
//! Feeds realistic model completions through the public extraction API:
//! - Prose and markdown around the payload
//! - Malformed JSON recovered by the lenient parser
//! - List-wrapped payloads
//! - Schema violations and policies
//! - Binding the result to the quiz form

use quizsmith::{
    extract_quiz, ExtractionError, ExtractionPolicy, ParseStage, Quiz, QuizExtractor, QuizForm,
    QuizPrompt, QUIZ_QUESTION_COUNT,
};

fn question_json(n: usize, right: &str) -> String {
    format!(
        r#"{{"question": "Question number {n} about volcanoes?", "options": ["a. basalt", "b. granite", "c. obsidian", "d. pumice"], "right_option": "{right}"}}"#
    )
}

fn quiz_json(count: usize) -> String {
    let questions: Vec<String> = (1..=count).map(|n| question_json(n, "c. obsidian")).collect();
    format!(
        r#"{{"topic": "The text explains how volcanic rocks form.", "questions": [{}]}}"#,
        questions.join(", ")
    )
}

// ============================================================================
// Happy Paths
// ============================================================================

#[test]
fn test_example_from_prose() {
    let raw = "Here is the quiz:\n{\"topic\":\"t\",\"questions\":[{\"question\":\"q1\",\"options\":[\"a. x\",\"b. y\",\"c. z\",\"d. w\"],\"right_option\":\"b. y\"}]}\nEnjoy!";
    let quiz = extract_quiz(raw).expect("example must extract");
    assert_eq!(quiz.topic, "t");
    assert_eq!(quiz.questions.len(), 1);
    assert_eq!(quiz.questions[0].right_option, "b. y");
}

#[test]
fn test_markdown_fenced_full_quiz() {
    let raw = format!(
        "Sure! Below is the quiz you asked for.\n\n```json\n{}\n```\n\nLet me know if you need more.",
        quiz_json(5)
    );
    let quiz = extract_quiz(&raw).unwrap();
    assert!(quiz.is_complete());
    assert_eq!(quiz.questions[4].question, "Question number 5 about volcanoes?");
}

#[test]
fn test_embedded_object_is_returned_unchanged() {
    let json = quiz_json(3);
    let expected: Quiz = serde_json::from_str(&json).unwrap();
    let raw = format!("prefix text {} suffix text", json);
    assert_eq!(extract_quiz(&raw).unwrap(), expected);
}

#[test]
fn test_list_payload_uses_first_element() {
    let raw = format!("[{}, {}]", quiz_json(2), quiz_json(5));
    let quiz = extract_quiz(&raw).unwrap();
    assert_eq!(quiz.questions.len(), 2);
}

#[test]
fn test_canonical_output_round_trips() {
    let quiz = extract_quiz(&quiz_json(5)).unwrap();
    assert_eq!(extract_quiz(&quiz.to_json()).unwrap(), quiz);
}

// ============================================================================
// Lenient Recovery
// ============================================================================

#[test]
fn test_recovers_prompt_style_comment_and_trailing_commas() {
    let raw = r#"{"topic": "Photosynthesis basics",
 "questions":
  [
    {
      "question": "What gas do plants absorb during photosynthesis?",
      "options": ["a. Oxygen", "b. Carbon dioxide", "c. Nitrogen", "d. Helium",],
      "right_option": "b. Carbon dioxide"  # the right option
    },
  ]
}"#;
    let report = QuizExtractor::new().extract_with_report(raw).unwrap();
    assert_eq!(report.stage, ParseStage::Lenient);
    assert_eq!(report.quiz.questions[0].right_option, "b. Carbon dioxide");
}

#[test]
fn test_recovers_truncated_completion() {
    let full = quiz_json(2);
    // Cut inside the second question, as a token limit would
    let cut = full.find("Question number 2").unwrap() - 14;
    let raw = &full[..cut];
    let quiz = extract_quiz(raw).unwrap();
    assert_eq!(quiz.questions.len(), 1);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_plain_text_has_no_structured_content() {
    let raw = "I'm sorry, I cannot create a quiz from this text.";
    assert_eq!(extract_quiz(raw), Err(ExtractionError::NoStructuredContent));
}

#[test]
fn test_empty_list() {
    assert_eq!(extract_quiz("```json\n[]\n```"), Err(ExtractionError::EmptyContainer));
}

#[test]
fn test_right_option_outside_options() {
    let raw = quiz_json(1).replace("\"right_option\": \"c. obsidian\"", "\"right_option\": \"obsidian\"");
    match extract_quiz(&raw) {
        Err(ExtractionError::SchemaViolation(detail)) => {
            assert!(detail.contains("questions[0].right_option"), "detail was: {}", detail);
        }
        other => panic!("expected schema violation, got {:?}", other),
    }
}

#[test]
fn test_exact_policy_rejects_short_quiz() {
    let extractor = QuizExtractor::with_policy(ExtractionPolicy::strict());
    assert!(matches!(
        extractor.extract(&quiz_json(4)),
        Err(ExtractionError::SchemaViolation(_))
    ));
    assert!(extractor.extract(&quiz_json(5)).is_ok());
}

#[test]
fn test_surplus_questions_dropped() {
    let report = QuizExtractor::new().extract_with_report(&quiz_json(8)).unwrap();
    assert_eq!(report.quiz.questions.len(), QUIZ_QUESTION_COUNT);
    assert_eq!(report.discarded_questions, 3);
}

// ============================================================================
// Prompt and Form
// ============================================================================

#[test]
fn test_prompt_describes_the_extracted_shape() {
    let prompt = QuizPrompt::new().render(&["Volcanic rocks form when lava cools."]);
    for key in ["\"topic\"", "\"questions\"", "\"options\"", "\"right_option\""] {
        assert!(prompt.contains(key), "prompt must mention {}", key);
    }
}

#[test]
fn test_form_from_extracted_quiz() {
    let quiz = extract_quiz(&quiz_json(3)).unwrap();
    let form = QuizForm::from_quiz(&quiz);
    assert_eq!(form.slots.len(), QUIZ_QUESTION_COUNT);
    assert_eq!(
        form.slots[0].label,
        "Question 1 : Question number 1 about volcanoes?"
    );
    assert_eq!(form.slots[2].answer, "c. obsidian");
    assert!(!form.slots[3].visible);
}
