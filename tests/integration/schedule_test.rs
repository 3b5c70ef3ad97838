//! Schedule File Integration Tests
//!
//! Writes schedule files to a temp directory and drives them through
//! `load_schedule` and the CASE builder, the same path the CLI takes.

use std::fs;

use quizsmith::{load_schedule, CaseExpressionBuilder, CoreError, OverlapPolicy};
use tempfile::TempDir;

const RATES_YAML: &str = r#"
interest_by_date:
  - start_date: '2022-01-01'
    end_date: '2022-01-31'
    interest: 0.1
  - start_date: '2022-02-01'
    end_date: '2022-02-28'
    interest: 0.2
"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Formats
// ============================================================================

#[test]
fn test_yaml_schedule_to_grouped_sql() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "rates.yaml", RATES_YAML);

    let categories = load_schedule(&path).unwrap().into_entries().unwrap();
    let sql = CaseExpressionBuilder::new().build_grouped(&categories).unwrap();

    assert!(sql.contains("WHEN date_column BETWEEN '2022-01-01' AND '2022-01-31' THEN 0.1"));
    assert!(sql.contains("WHEN date_column BETWEEN '2022-02-01' AND '2022-02-28' THEN 0.2"));
    assert!(sql.ends_with("FROM interest_by_date_table;"));
}

#[test]
fn test_yaml_single_category_to_named_table() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "rates.yml", RATES_YAML);

    let categories = load_schedule(&path).unwrap().into_entries().unwrap();
    assert_eq!(categories.len(), 1);
    let sql = CaseExpressionBuilder::new()
        .build(&categories[0].1, "table_name")
        .unwrap();
    assert!(sql.ends_with("END AS interest_value\nFROM table_name;"));
}

#[test]
fn test_toml_and_json_match_yaml() {
    let dir = TempDir::new().unwrap();
    let yaml = write(&dir, "rates.yaml", RATES_YAML);
    let toml = write(
        &dir,
        "rates.toml",
        r#"
[[interest_by_date]]
start_date = 2022-01-01
end_date = 2022-01-31
interest = 0.1

[[interest_by_date]]
start_date = "2022-02-01"
end_date = "2022-02-28"
interest = 0.2
"#,
    );
    let json = write(
        &dir,
        "rates.json",
        r#"{"interest_by_date": [
            {"start_date": "2022-01-01", "end_date": "2022-01-31", "value": 0.1},
            {"start_date": "2022-02-01", "end_date": "2022-02-28", "value": 0.2}
        ]}"#,
    );

    let builder = CaseExpressionBuilder::new();
    let render = |path: &std::path::Path| {
        let categories = load_schedule(path).unwrap().into_entries().unwrap();
        builder.build_grouped(&categories).unwrap()
    };
    let expected = render(&yaml);
    assert_eq!(render(&toml), expected);
    assert_eq!(render(&json), expected);
}

#[test]
fn test_hyphenated_category_builds() {
    let dir = TempDir::new().unwrap();
    let yaml = RATES_YAML.replace("interest_by_date", "interest-by-date");
    let path = write(&dir, "rates.yaml", &yaml);

    let categories = load_schedule(&path).unwrap().into_entries().unwrap();
    let sql = CaseExpressionBuilder::new().build_grouped(&categories).unwrap();
    assert!(sql.ends_with("FROM interest-by-date_table;"));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_schedule(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, CoreError::Io(_)));
}

#[test]
fn test_unknown_extension_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "rates.csv", "start,end,value\n");
    assert!(matches!(load_schedule(&path), Err(CoreError::Config(_))));
}

#[test]
fn test_bad_entry_names_category_and_index() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "rates.yaml",
        "loans:\n  - start_date: 2022-01-01\n    end_date: 2022-01-31\n    value: 1\n  - start_date: 2022-03-01\n    end_date: 2022-02-01\n    value: 2\n",
    );
    let err = load_schedule(&path).unwrap().into_entries().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("category 'loans' entries[1]"), "got: {}", message);
    assert!(message.contains("is after end_date"));
}

#[test]
fn test_overlapping_schedule_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "rates.yaml",
        "loans:\n  - start_date: 2022-01-01\n    end_date: 2022-02-15\n    value: 1\n  - start_date: 2022-02-01\n    end_date: 2022-02-28\n    value: 2\n",
    );
    let categories = load_schedule(&path).unwrap().into_entries().unwrap();
    let err = CaseExpressionBuilder::new()
        .overlap_policy(OverlapPolicy::Reject)
        .build_grouped(&categories)
        .unwrap_err();
    assert!(err.to_string().contains("category 'loans'"));
}
