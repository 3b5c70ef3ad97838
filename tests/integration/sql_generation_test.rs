//! CASE Generation Integration Tests
//!
//! Builds statements through the public API:
//! - Exact statement layout
//! - Clause order and count
//! - Grouped statements per category
//! - Overlap policies and validation failures

use quizsmith::{
    CaseExpressionBuilder, CaseValue, DateRangeEntry, IdentifierPolicy, OverlapPolicy,
};

fn entry(start: &str, end: &str, value: &str) -> DateRangeEntry {
    DateRangeEntry::parse(start, end, value).unwrap()
}

fn quarter() -> Vec<DateRangeEntry> {
    vec![
        entry("2022-01-01", "2022-01-31", "0.1"),
        entry("2022-02-01", "2022-02-28", "0.2"),
        entry("2022-03-01", "2022-03-31", "0.3"),
    ]
}

// ============================================================================
// Single Statement
// ============================================================================

#[test]
fn test_two_entry_example() {
    let entries = vec![
        entry("2022-01-01", "2022-01-31", "0.1"),
        entry("2022-02-01", "2022-02-28", "0.2"),
    ];
    let sql = CaseExpressionBuilder::new()
        .build(&entries, "table_name")
        .unwrap();
    let expected = [
        "SELECT date_column,",
        "  CASE",
        "    WHEN date_column BETWEEN '2022-01-01' AND '2022-01-31' THEN 0.1",
        "    WHEN date_column BETWEEN '2022-02-01' AND '2022-02-28' THEN 0.2",
        "    ELSE 0",
        "  END AS interest_value",
        "FROM table_name;",
    ]
    .join("\n");
    assert_eq!(sql, expected);
}

#[test]
fn test_one_clause_per_entry_in_order() {
    let sql = CaseExpressionBuilder::new().build(&quarter(), "rates").unwrap();
    let whens: Vec<&str> = sql.lines().filter(|l| l.trim_start().starts_with("WHEN")).collect();
    assert_eq!(whens.len(), 3);
    assert!(whens[0].ends_with("THEN 0.1"));
    assert!(whens[1].ends_with("THEN 0.2"));
    assert!(whens[2].ends_with("THEN 0.3"));
    assert_eq!(sql.matches("ELSE 0").count(), 1);
}

#[test]
fn test_integer_values_render_without_decimal() {
    let dates = entry("2022-01-01", "2022-01-31", "0");
    let jan = DateRangeEntry::new(dates.start_date, dates.end_date, CaseValue::from(3)).unwrap();
    let sql = CaseExpressionBuilder::new().build(&[jan], "t").unwrap();
    assert!(sql.contains("THEN 3\n"));
}

#[test]
fn test_single_day_range() {
    let sql = CaseExpressionBuilder::new()
        .build(&[entry("2022-06-15", "2022-06-15", "9")], "t")
        .unwrap();
    assert!(sql.contains("BETWEEN '2022-06-15' AND '2022-06-15' THEN 9"));
}

// ============================================================================
// Grouped Statements
// ============================================================================

#[test]
fn test_grouped_targets_category_tables() {
    let categories = vec![
        ("interest_by_date".to_string(), quarter()),
        ("fees".to_string(), vec![entry("2022-01-01", "2022-12-31", "25")]),
    ];
    let sql = CaseExpressionBuilder::new()
        .column("posted_on")
        .build_grouped(&categories)
        .unwrap();

    let statements: Vec<&str> = sql.split("\n\n").collect();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].starts_with("SELECT posted_on,"));
    assert!(statements[0].ends_with("FROM interest_by_date_table;"));
    assert!(statements[1].ends_with("FROM fees_table;"));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_overlap_rejected_only_when_asked() {
    let mut entries = quarter();
    entries.push(entry("2022-03-15", "2022-04-15", "0.4"));

    assert!(CaseExpressionBuilder::new().build(&entries, "t").is_ok());
    let err = CaseExpressionBuilder::new()
        .overlap_policy(OverlapPolicy::Reject)
        .build(&entries, "t")
        .unwrap_err();
    assert!(err.to_string().contains("entries[2] and entries[3] overlap"));
}

#[test]
fn test_invalid_entries_never_reach_sql() {
    assert!(DateRangeEntry::parse("2022-02-30", "2022-03-01", "1").is_err());
    assert!(DateRangeEntry::parse("2022-03-01", "2022-02-01", "1").is_err());
    assert!(DateRangeEntry::parse("2022-01-01", "2022-02-01", "1 OR 1=1").is_err());
}

#[test]
fn test_statement_breaking_names_rejected() {
    let builder = CaseExpressionBuilder::new();
    assert!(builder.build(&quarter(), "rates; DROP TABLE users").is_err());
    assert!(builder.build(&quarter(), "rates\n--").is_err());
    assert!(CaseExpressionBuilder::new()
        .alias("x FROM y --")
        .identifier_policy(IdentifierPolicy::Plain)
        .build(&quarter(), "rates")
        .is_err());
}

#[test]
fn test_quoted_and_hyphenated_names_pass_through() {
    let sql = CaseExpressionBuilder::new()
        .build(&quarter(), "\"Order Details\"")
        .unwrap();
    assert!(sql.ends_with("FROM \"Order Details\";"));

    let categories = vec![("interest-by-date".to_string(), quarter())];
    let sql = CaseExpressionBuilder::new().build_grouped(&categories).unwrap();
    assert!(sql.ends_with("FROM interest-by-date_table;"));
}
