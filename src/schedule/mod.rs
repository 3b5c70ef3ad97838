//! Schedule Files
//!
//! Loads date-range schedules from disk. A schedule is an ordered map from
//! category name to a list of `{start_date, end_date, value}` entries
//! (`interest` is accepted for `value`):
//!
//! - `.yaml` / `.yml` - lightweight YAML subset parser (`yaml` module)
//! - `.toml` - arrays of tables under each category key
//! - `.json` - an object of arrays
//!
//! Category order in the file is the order statements are generated in.

pub mod yaml;

use std::path::Path;

use serde_json::Value;

use quizsmith_core::{CoreError, CoreResult};
use quizsmith_sqlgen::{validate_entries, DateRangeEntry, RawDateRangeEntry};

/// Supported schedule file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleFormat {
    Yaml,
    Toml,
    Json,
}

impl ScheduleFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ScheduleFormat::Yaml),
            Some("toml") => Ok(ScheduleFormat::Toml),
            Some("json") => Ok(ScheduleFormat::Json),
            _ => Err(CoreError::config(format!(
                "unsupported schedule format for '{}': expected .yaml, .yml, .toml or .json",
                path.display()
            ))),
        }
    }
}

/// Unvalidated schedule, categories in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub categories: Vec<(String, Vec<RawDateRangeEntry>)>,
}

impl Schedule {
    pub fn parse(text: &str, format: ScheduleFormat) -> CoreResult<Self> {
        let value = match format {
            ScheduleFormat::Yaml => yaml::parse_yaml(text)?.into_json(),
            ScheduleFormat::Toml => {
                let table: toml::Table = toml::from_str(text)
                    .map_err(|e| CoreError::parse(format!("invalid TOML: {}", e)))?;
                toml_to_json(toml::Value::Table(table))
            }
            ScheduleFormat::Json => serde_json::from_str(text)?,
        };
        Self::from_json(value)
    }

    fn from_json(value: Value) -> CoreResult<Self> {
        let Value::Object(map) = value else {
            return Err(CoreError::parse(
                "schedule must map category names to lists of entries",
            ));
        };

        let mut categories = Vec::with_capacity(map.len());
        for (name, entries) in map {
            let Value::Array(items) = entries else {
                return Err(CoreError::parse(format!(
                    "category '{}' must be a list of entries",
                    name
                )));
            };
            let raw = items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    serde_json::from_value::<RawDateRangeEntry>(item).map_err(|e| {
                        CoreError::parse(format!("category '{}' entries[{}]: {}", name, i, e))
                    })
                })
                .collect::<CoreResult<Vec<_>>>()?;
            categories.push((name, raw));
        }

        Ok(Self { categories })
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Validate every entry, naming the category on failure.
    pub fn into_entries(self) -> CoreResult<Vec<(String, Vec<DateRangeEntry>)>> {
        self.categories
            .into_iter()
            .map(|(name, raw)| {
                let entries = validate_entries(raw).map_err(|e| match e {
                    CoreError::Validation(msg) => {
                        CoreError::validation(format!("category '{}' {}", name, msg))
                    }
                    other => other,
                })?;
                Ok((name, entries))
            })
            .collect()
    }
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Read and parse a schedule file, picking the format from its extension.
pub fn load_schedule(path: impl AsRef<Path>) -> CoreResult<Schedule> {
    let path = path.as_ref();
    let format = ScheduleFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    let schedule = Schedule::parse(&text, format)?;
    tracing::info!(
        path = %path.display(),
        ?format,
        categories = schedule.len(),
        "schedule loaded"
    );
    Ok(schedule)
}
