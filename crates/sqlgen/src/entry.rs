//! Date-Range Entries
//!
//! `RawDateRangeEntry` is what a schedule file deserializes into: every field
//! optional, scalars left untyped. Converting it into a `DateRangeEntry`
//! checks that the fields are present and well-formed.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use quizsmith_core::{CoreError, CoreResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A numeric SQL literal, kept in the textual form it was given in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CaseValue(String);

impl CaseValue {
    /// Accept finite decimal literals such as `0.1`, `-3`, `1e-2`.
    pub fn parse(text: &str) -> CoreResult<Self> {
        let text = text.trim();
        let is_numeric = !text.is_empty()
            && text
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
            && text.parse::<f64>().map_or(false, f64::is_finite);
        if is_numeric {
            Ok(Self(text.to_string()))
        } else {
            Err(CoreError::validation(format!(
                "value must be numeric. Got: '{}'",
                text
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for CaseValue {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

/// One validated `WHEN ... BETWEEN ... THEN ...` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRangeEntry {
    /// Inclusive lower bound
    pub start_date: NaiveDate,
    /// Inclusive upper bound
    pub end_date: NaiveDate,
    pub value: CaseValue,
}

impl DateRangeEntry {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, value: CaseValue) -> CoreResult<Self> {
        if start_date > end_date {
            return Err(CoreError::validation(format!(
                "start_date {} is after end_date {}",
                start_date, end_date
            )));
        }
        Ok(Self {
            start_date,
            end_date,
            value,
        })
    }

    /// Parse from ISO-8601 date strings and a numeric literal.
    pub fn parse(start_date: &str, end_date: &str, value: &str) -> CoreResult<Self> {
        Self::new(
            parse_date("start_date", start_date)?,
            parse_date("end_date", end_date)?,
            CaseValue::parse(value)?,
        )
    }

    /// Whether the two inclusive ranges share at least one day.
    pub fn overlaps(&self, other: &DateRangeEntry) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }
}

fn parse_date(field: &str, text: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|e| {
        CoreError::validation(format!(
            "{} must be a YYYY-MM-DD date. Got: '{}' ({})",
            field, text, e
        ))
    })
}

/// An entry as read from a schedule file, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDateRangeEntry {
    #[serde(default)]
    pub start_date: Option<Value>,
    #[serde(default)]
    pub end_date: Option<Value>,
    #[serde(default, alias = "interest")]
    pub value: Option<Value>,
}

fn scalar_text(field: &str, value: Option<&Value>) -> CoreResult<String> {
    match value {
        None | Some(Value::Null) => Err(CoreError::validation(format!("{} is required", field))),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(CoreError::validation(format!(
            "{} must be a scalar. Got: {}",
            field, other
        ))),
    }
}

impl TryFrom<RawDateRangeEntry> for DateRangeEntry {
    type Error = CoreError;

    fn try_from(raw: RawDateRangeEntry) -> CoreResult<Self> {
        let start = scalar_text("start_date", raw.start_date.as_ref())?;
        let end = scalar_text("end_date", raw.end_date.as_ref())?;
        let value = scalar_text("value", raw.value.as_ref())?;
        DateRangeEntry::parse(&start, &end, &value)
    }
}

/// Validate a list of raw entries, naming the failing index.
pub fn validate_entries(raw: Vec<RawDateRangeEntry>) -> CoreResult<Vec<DateRangeEntry>> {
    raw.into_iter()
        .enumerate()
        .map(|(i, entry)| {
            DateRangeEntry::try_from(entry).map_err(|e| match e {
                CoreError::Validation(msg) => {
                    CoreError::validation(format!("entries[{}]: {}", i, msg))
                }
                other => other,
            })
        })
        .collect()
}
