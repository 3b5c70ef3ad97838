//! CASE WHEN Builder
//!
//! Renders date-range entries as a `SELECT <col>, CASE WHEN ... END` statement.
//! Clauses are emitted in input order. SQL `CASE` takes the first matching
//! branch, so when ranges overlap the earlier entry shadows the later one;
//! `OverlapPolicy` decides whether that is allowed, logged, or rejected.
//!
//! Names are emitted as given unless `IdentifierPolicy::Plain` is set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use quizsmith_core::{CoreError, CoreResult};

use crate::entry::DateRangeEntry;

pub const DEFAULT_COLUMN: &str = "date_column";
pub const DEFAULT_ALIAS: &str = "interest_value";

/// What to do when two entries cover the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Emit as-is; the first matching clause wins
    #[default]
    Allow,
    /// Emit as-is and log each overlapping pair
    Warn,
    /// Fail with a validation error
    Reject,
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::Allow => write!(f, "allow"),
            OverlapPolicy::Warn => write!(f, "warn"),
            OverlapPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(OverlapPolicy::Allow),
            "warn" => Ok(OverlapPolicy::Warn),
            "reject" => Ok(OverlapPolicy::Reject),
            other => Err(CoreError::validation(format!(
                "overlap policy must be 'allow', 'warn' or 'reject'. Got: '{}'",
                other
            ))),
        }
    }
}

/// How table, column, alias and category names are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierPolicy {
    /// Emit names as given; only empty names and names holding `;` or
    /// control characters are refused
    #[default]
    Verbatim,
    /// Require plain (optionally dotted) identifiers: `[A-Za-z_][A-Za-z0-9_.]*`
    Plain,
}

impl fmt::Display for IdentifierPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierPolicy::Verbatim => write!(f, "verbatim"),
            IdentifierPolicy::Plain => write!(f, "plain"),
        }
    }
}

impl FromStr for IdentifierPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbatim" => Ok(IdentifierPolicy::Verbatim),
            "plain" => Ok(IdentifierPolicy::Plain),
            other => Err(CoreError::validation(format!(
                "identifier policy must be 'verbatim' or 'plain'. Got: '{}'",
                other
            ))),
        }
    }
}

/// Index pairs `(earlier, later)` of entries whose ranges overlap.
pub fn find_overlaps(entries: &[DateRangeEntry]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, a) in entries.iter().enumerate() {
        for (j, b) in entries.iter().enumerate().skip(i + 1) {
            if a.overlaps(b) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Check `name` against `policy`. `field` names it in the error.
pub fn validate_identifier(policy: IdentifierPolicy, field: &str, name: &str) -> CoreResult<()> {
    match policy {
        IdentifierPolicy::Verbatim => {
            if name.trim().is_empty() {
                return Err(CoreError::validation(format!("{} must not be empty", field)));
            }
            if name.chars().any(|c| c == ';' || c.is_control()) {
                return Err(CoreError::validation(format!(
                    "{} must not contain ';' or control characters. Got: '{}'",
                    field,
                    name.escape_debug()
                )));
            }
            Ok(())
        }
        IdentifierPolicy::Plain => {
            let mut chars = name.chars();
            let valid = match chars.next() {
                Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
                }
                _ => false,
            };
            if valid && !name.ends_with('.') {
                Ok(())
            } else {
                Err(CoreError::validation(format!(
                    "{} must be a plain SQL identifier. Got: '{}'",
                    field, name
                )))
            }
        }
    }
}

fn in_context(context: &str, err: CoreError) -> CoreError {
    match err {
        CoreError::Validation(msg) => CoreError::validation(format!("{}: {}", context, msg)),
        other => other,
    }
}

/// Builds `CASE WHEN` statements from date-range entries.
///
/// # Example
/// ```ignore
/// let sql = CaseExpressionBuilder::new()
///     .overlap_policy(OverlapPolicy::Reject)
///     .build(&entries, "rates")?;
/// ```
#[derive(Debug, Clone)]
pub struct CaseExpressionBuilder {
    column: String,
    alias: String,
    overlap_policy: OverlapPolicy,
    identifier_policy: IdentifierPolicy,
}

impl Default for CaseExpressionBuilder {
    fn default() -> Self {
        Self {
            column: DEFAULT_COLUMN.to_string(),
            alias: DEFAULT_ALIAS.to_string(),
            overlap_policy: OverlapPolicy::default(),
            identifier_policy: IdentifierPolicy::default(),
        }
    }
}

impl CaseExpressionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column compared against the date ranges.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Name of the computed output column.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    pub fn identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifier_policy = policy;
        self
    }

    /// Render one statement selecting from `table_name`.
    pub fn build(&self, entries: &[DateRangeEntry], table_name: &str) -> CoreResult<String> {
        let policy = self.identifier_policy;
        validate_identifier(policy, "table_name", table_name)?;
        validate_identifier(policy, "column", &self.column)?;
        validate_identifier(policy, "alias", &self.alias)?;
        if entries.is_empty() {
            return Err(CoreError::validation("at least one entry is required"));
        }
        self.check_overlaps(entries, table_name)?;

        let mut sql = format!("SELECT {},\n  CASE", self.column);
        for entry in entries {
            sql.push_str(&format!(
                "\n    WHEN {} BETWEEN '{}' AND '{}' THEN {}",
                self.column,
                entry.start_date.format("%Y-%m-%d"),
                entry.end_date.format("%Y-%m-%d"),
                entry.value
            ));
        }
        sql.push_str(&format!(
            "\n    ELSE 0\n  END AS {}\nFROM {};",
            self.alias, table_name
        ));

        tracing::debug!(table = table_name, clauses = entries.len(), "built CASE expression");
        Ok(sql)
    }

    /// Render one statement per category against `{category}_table`,
    /// separated by a blank line.
    pub fn build_grouped(&self, categories: &[(String, Vec<DateRangeEntry>)]) -> CoreResult<String> {
        if categories.is_empty() {
            return Err(CoreError::validation("at least one category is required"));
        }

        let statements = categories
            .iter()
            .map(|(category, entries)| {
                let context = format!("category '{}'", category);
                validate_identifier(self.identifier_policy, "category", category)
                    .map_err(|e| in_context(&context, e))?;
                self.build(entries, &format!("{}_table", category))
                    .map_err(|e| in_context(&context, e))
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(statements.join("\n\n"))
    }

    fn check_overlaps(&self, entries: &[DateRangeEntry], table_name: &str) -> CoreResult<()> {
        if self.overlap_policy == OverlapPolicy::Allow {
            return Ok(());
        }
        let overlaps = find_overlaps(entries);
        let Some(&(first, second)) = overlaps.first() else {
            return Ok(());
        };

        match self.overlap_policy {
            OverlapPolicy::Reject => Err(CoreError::validation(format!(
                "entries[{}] and entries[{}] overlap; entries[{}] would never match",
                first, second, second
            ))),
            _ => {
                for (a, b) in &overlaps {
                    tracing::warn!(
                        table = table_name,
                        earlier = a,
                        later = b,
                        "overlapping date ranges, the earlier clause wins"
                    );
                }
                Ok(())
            }
        }
    }
}
