//! Lightweight YAML subset parser
//!
//! Handles the subset of YAML used by rate schedule files without pulling in a
//! full YAML library:
//!
//! ```yaml
//! interest_by_date:
//!   - start_date: '2022-01-01'
//!     end_date: '2022-01-31'
//!     interest: 0.1
//! ```
//!
//! Supported: `key: value`, nested maps and lists by indentation,
//! `- key: value` list items that open a map, inline `[a, b]` lists,
//! single/double quoted scalars, `#` comments and blank lines. Every scalar is
//! kept as a string; typing happens when entries are validated.

use serde_json::{Map, Value};

use quizsmith_core::{CoreError, CoreResult};

/// A parsed YAML value (subset: scalars, lists, ordered maps)
#[derive(Debug, Clone, PartialEq)]
pub enum YamlValue {
    Scalar(String),
    List(Vec<YamlValue>),
    Map(Vec<(String, YamlValue)>),
}

impl YamlValue {
    /// Convert to JSON, keeping key order. Empty scalars become `null`.
    pub fn into_json(self) -> Value {
        match self {
            YamlValue::Scalar(s) if s.is_empty() => Value::Null,
            YamlValue::Scalar(s) => Value::String(s),
            YamlValue::List(items) => {
                Value::Array(items.into_iter().map(YamlValue::into_json).collect())
            }
            YamlValue::Map(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key, value.into_json());
                }
                Value::Object(map)
            }
        }
    }
}

/// A significant (non-blank, non-comment) line.
#[derive(Debug, Clone)]
struct Line {
    number: usize,
    indent: usize,
    text: String,
}

/// Parse a YAML document whose top level is a map.
pub fn parse_yaml(yaml: &str) -> CoreResult<YamlValue> {
    let lines = significant_lines(yaml)?;
    if lines.is_empty() {
        return Ok(YamlValue::Map(Vec::new()));
    }
    let mut pos = 0;
    let value = parse_block(&lines, &mut pos, lines[0].indent)?;
    if let Some(line) = lines.get(pos) {
        return Err(unexpected(line, "unexpected indentation"));
    }
    Ok(value)
}

fn unexpected(line: &Line, what: &str) -> CoreError {
    CoreError::parse(format!("YAML line {}: {}: '{}'", line.number, what, line.text))
}

/// Get the indentation level of a line (number of leading spaces).
fn indent_level(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Whether a quote character starts a quoted scalar, given the last
/// non-space character before it. An apostrophe inside a plain scalar
/// (`it's`) does not.
fn starts_quoted(prev: Option<char>) -> bool {
    matches!(prev, None | Some(':' | '-' | '[' | ','))
}

/// Drop a trailing ` # comment` that sits outside quotes.
fn strip_comment(text: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;
    let mut prev_space = true;
    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if (c == '\'' || c == '"') && starts_quoted(prev) => quote = Some(c),
            None if c == '#' && prev_space => return text[..i].trim_end(),
            None => {}
        }
        prev_space = c.is_whitespace();
        if !prev_space {
            prev = Some(c);
        }
    }
    text
}

/// Split `key: value` at the first colon outside quotes that is followed by a
/// space or ends the line.
fn split_key_value(text: &str) -> Option<(String, &str)> {
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;
    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if (c == '\'' || c == '"') && starts_quoted(prev) => quote = Some(c),
            None if c == ':' => {
                let rest = &text[i + 1..];
                if rest.is_empty() || rest.starts_with(' ') {
                    let key = unquote(text[..i].trim());
                    if key.is_empty() {
                        return None;
                    }
                    return Some((key, rest.trim()));
                }
            }
            None => {}
        }
        if !c.is_whitespace() {
            prev = Some(c);
        }
    }
    None
}

/// Collect significant lines. A `- key: value` item is split into a bare `-`
/// line and a `key: value` line at the content's column, so the map it opens
/// lines up with the keys that follow it.
fn significant_lines(yaml: &str) -> CoreResult<Vec<Line>> {
    let mut lines = Vec::new();
    for (idx, raw) in yaml.lines().enumerate() {
        let number = idx + 1;
        if raw.starts_with('\t') {
            return Err(CoreError::parse(format!(
                "YAML line {}: tabs are not allowed for indentation",
                number
            )));
        }
        let text = strip_comment(raw.trim_end());
        let trimmed = text.trim_start();
        if trimmed.is_empty() || trimmed == "---" {
            continue;
        }
        let indent = indent_level(text);

        if let Some(content) = trimmed.strip_prefix("- ") {
            let content_trimmed = content.trim_start();
            if split_key_value(content_trimmed).is_some() {
                let content_indent = indent + 2 + (content.len() - content_trimmed.len());
                lines.push(Line {
                    number,
                    indent,
                    text: "-".to_string(),
                });
                lines.push(Line {
                    number,
                    indent: content_indent,
                    text: content_trimmed.to_string(),
                });
                continue;
            }
        }

        lines.push(Line {
            number,
            indent,
            text: trimmed.to_string(),
        });
    }
    Ok(lines)
}

fn is_list_item(text: &str) -> bool {
    text == "-" || text.starts_with("- ")
}

fn parse_block(lines: &[Line], pos: &mut usize, indent: usize) -> CoreResult<YamlValue> {
    if is_list_item(&lines[*pos].text) {
        parse_list(lines, pos, indent)
    } else {
        parse_map(lines, pos, indent)
    }
}

/// Parse the value of a key or list item whose inline part was empty.
fn parse_child(
    lines: &[Line],
    pos: &mut usize,
    parent_indent: usize,
    allow_same_indent_list: bool,
) -> CoreResult<YamlValue> {
    match lines.get(*pos) {
        Some(next) if next.indent > parent_indent => parse_block(lines, pos, next.indent),
        Some(next)
            if allow_same_indent_list
                && next.indent == parent_indent
                && is_list_item(&next.text) =>
        {
            parse_list(lines, pos, parent_indent)
        }
        _ => Ok(YamlValue::Scalar(String::new())),
    }
}

fn parse_map(lines: &[Line], pos: &mut usize, indent: usize) -> CoreResult<YamlValue> {
    let mut entries: Vec<(String, YamlValue)> = Vec::new();

    while let Some(line) = lines.get(*pos) {
        if line.indent < indent || (line.indent == indent && is_list_item(&line.text)) {
            break;
        }
        if line.indent > indent {
            return Err(unexpected(line, "unexpected indentation"));
        }
        let (key, value) = split_key_value(&line.text)
            .ok_or_else(|| unexpected(line, "expected 'key: value'"))?;
        if entries.iter().any(|(k, _)| k == &key) {
            return Err(unexpected(line, "duplicate key"));
        }
        *pos += 1;

        let value = if value.is_empty() {
            parse_child(lines, pos, indent, true)?
        } else if value.starts_with('[') && value.ends_with(']') {
            YamlValue::List(parse_inline_list(value))
        } else {
            YamlValue::Scalar(unquote(value))
        };
        entries.push((key, value));
    }

    Ok(YamlValue::Map(entries))
}

fn parse_list(lines: &[Line], pos: &mut usize, indent: usize) -> CoreResult<YamlValue> {
    let mut items = Vec::new();

    while let Some(line) = lines.get(*pos) {
        if line.indent != indent || !is_list_item(&line.text) {
            if line.indent > indent {
                return Err(unexpected(line, "unexpected indentation"));
            }
            break;
        }
        *pos += 1;

        let content = line.text.strip_prefix('-').unwrap_or_default().trim();
        let item = if content.is_empty() {
            parse_child(lines, pos, indent, false)?
        } else if content.starts_with('[') && content.ends_with(']') {
            YamlValue::List(parse_inline_list(content))
        } else {
            YamlValue::Scalar(unquote(content))
        };
        items.push(item);
    }

    Ok(YamlValue::List(items))
}

/// Parse an inline YAML list: [item1, item2, "item 3"]
fn parse_inline_list(s: &str) -> Vec<YamlValue> {
    let inner = s.trim_start_matches('[').trim_end_matches(']');
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner
        .split(',')
        .map(|item| YamlValue::Scalar(unquote(item.trim())))
        .collect()
}

/// Remove surrounding quotes (single or double) from a string.
fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}
