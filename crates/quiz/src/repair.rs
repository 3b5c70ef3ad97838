//! Lenient JSON Repair
//!
//! Second-stage parser for model output that almost-but-not-quite is JSON.
//! The input is tokenized with a forgiving lexer and re-emitted as strict JSON:
//!
//! - single-quoted strings become double-quoted, raw control characters are escaped
//! - `//`, `/* */` and `#` comments outside strings are dropped
//! - unquoted keys and barewords are quoted; `True`/`False`/`None` map to literals
//! - trailing and duplicate commas are dropped, missing commas are inserted
//! - stray closers are dropped, unterminated strings and containers are closed
//! - a dangling `:` gets a `null` value
//!
//! Only the first complete top-level value is kept. The rewrite is a pure
//! function of its input.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open(char),
    Close(char),
    Colon,
    Comma,
    Str(String),
    /// Already valid JSON text: a number or a literal
    Raw(String),
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '`' {
                self.pos += 1;
            } else if c == '#' || (c == '/' && self.peek_at(1) == Some('/')) {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.pos += 1;
                }
            } else if c == '/' && self.peek_at(1) == Some('*') {
                self.pos += 2;
                while self.pos < self.chars.len() {
                    if self.peek() == Some('*') && self.peek_at(1) == Some('/') {
                        self.pos += 2;
                        break;
                    }
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            self.skip_trivia();
            let c = self.peek()?;
            let token = match c {
                '{' | '[' => {
                    self.pos += 1;
                    Token::Open(c)
                }
                '}' | ']' => {
                    self.pos += 1;
                    Token::Close(c)
                }
                ':' => {
                    self.pos += 1;
                    Token::Colon
                }
                ',' => {
                    self.pos += 1;
                    Token::Comma
                }
                '"' | '\'' => {
                    self.pos += 1;
                    Token::Str(self.read_string(c))
                }
                c if c.is_ascii_digit() || c == '-' || c == '+' => {
                    match self.read_number_or_word() {
                        Some(token) => token,
                        None => continue,
                    }
                }
                // Punctuation-only runs (e.g. a lone ')') are dropped
                _ => match self.read_bareword() {
                    Some(token) => token,
                    None => continue,
                },
            };
            return Some(token);
        }
    }

    /// Read string content up to the matching quote, decoding escapes.
    /// An unterminated string runs to the end of input.
    fn read_string(&mut self, quote: char) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == quote {
                return out;
            }
            if c != '\\' {
                out.push(c);
                continue;
            }
            let Some(esc) = self.peek() else {
                out.push('\\');
                break;
            };
            self.pos += 1;
            match esc {
                '"' => out.push('"'),
                '\'' => out.push('\''),
                '\\' => out.push('\\'),
                '/' => out.push('/'),
                'b' => out.push('\u{0008}'),
                'f' => out.push('\u{000C}'),
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                'u' => match self.read_unicode_escape() {
                    Some(ch) => out.push(ch),
                    None => out.push_str("\\u"),
                },
                other => {
                    out.push('\\');
                    out.push(other);
                }
            }
        }
        out
    }

    fn read_hex4(&mut self) -> Option<u32> {
        let digits: String = self.chars.get(self.pos..self.pos + 4)?.iter().collect();
        let code = u32::from_str_radix(&digits, 16).ok()?;
        self.pos += 4;
        Some(code)
    }

    fn read_unicode_escape(&mut self) -> Option<char> {
        let high = self.read_hex4()?;
        if (0xD800..0xDC00).contains(&high) {
            if self.peek() == Some('\\') && self.peek_at(1) == Some('u') {
                let save = self.pos;
                self.pos += 2;
                if let Some(low) = self.read_hex4() {
                    if (0xDC00..0xE000).contains(&low) {
                        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                        return char::from_u32(code);
                    }
                }
                self.pos = save;
            }
            return Some(char::REPLACEMENT_CHARACTER);
        }
        Some(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn is_delimiter(c: char) -> bool {
        c.is_whitespace() || matches!(c, ',' | ':' | '{' | '}' | '[' | ']' | '"')
    }

    fn read_number_or_word(&mut self) -> Option<Token> {
        let start = self.pos;
        let mut end = start;
        while let Some(&c) = self.chars.get(end) {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                end += 1;
            } else {
                break;
            }
        }
        let terminated = self.chars.get(end).map_or(true, |&c| Self::is_delimiter(c));
        if terminated {
            let text: String = self.chars[start..end].iter().collect();
            let text = text.strip_prefix('+').unwrap_or(&text).to_string();
            if matches!(serde_json::from_str::<Value>(&text), Ok(Value::Number(_))) {
                self.pos = end;
                return Some(Token::Raw(text));
            }
        }
        // Not a clean number ("3rd option", "1.2.3"): treat as a bareword
        self.read_bareword()
    }

    /// Read an unquoted run of text. Spaces are allowed inside; the run ends at
    /// a structural character, a newline, or a ` #` comment. Always consumes
    /// at least one character.
    fn read_bareword(&mut self) -> Option<Token> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, ',' | ':' | '{' | '}' | '[' | ']' | '"' | '\n') {
                break;
            }
            if c == '#' && self.pos > start && self.chars[self.pos - 1].is_whitespace() {
                break;
            }
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        let word = word.trim();
        if word.is_empty() || word.chars().all(|c| !c.is_alphanumeric()) {
            return None;
        }
        let token = match word {
            "true" | "True" | "TRUE" => Token::Raw("true".to_string()),
            "false" | "False" | "FALSE" => Token::Raw("false".to_string()),
            "null" | "None" | "NULL" | "undefined" | "NaN" => Token::Raw("null".to_string()),
            other => Token::Str(other.to_string()),
        };
        Some(token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    Open,
    Value,
    Colon,
    Comma,
}

fn closer_for(open: char) -> char {
    if open == '{' {
        '}'
    } else {
        ']'
    }
}

fn encode_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Rewrite malformed JSON-like text into strict JSON text.
pub fn repair_json(input: &str) -> String {
    let mut lexer = Lexer::new(input);
    let mut out = String::with_capacity(input.len());
    let mut stack: Vec<char> = Vec::new();
    let mut prev = Prev::Start;

    while let Some(token) = lexer.next_token() {
        if prev == Prev::Value && stack.is_empty() {
            // First top-level value is complete
            break;
        }

        match token {
            Token::Open(c) => {
                begin_value(&mut out, &mut prev);
                out.push(c);
                stack.push(c);
                prev = Prev::Open;
            }
            Token::Close(c) => {
                let Some(depth) = stack.iter().rposition(|&open| closer_for(open) == c) else {
                    continue;
                };
                if prev == Prev::Colon {
                    out.push_str("null");
                }
                while stack.len() > depth {
                    if let Some(open) = stack.pop() {
                        out.push(closer_for(open));
                    }
                }
                prev = Prev::Value;
            }
            Token::Colon => {
                if prev == Prev::Value && stack.last() == Some(&'{') {
                    out.push(':');
                    prev = Prev::Colon;
                }
            }
            Token::Comma => {
                if prev == Prev::Value {
                    prev = Prev::Comma;
                }
            }
            Token::Str(s) => {
                begin_value(&mut out, &mut prev);
                out.push_str(&encode_string(&s));
                prev = Prev::Value;
            }
            Token::Raw(raw) => {
                let key_position = stack.last() == Some(&'{') && prev != Prev::Colon;
                begin_value(&mut out, &mut prev);
                if key_position {
                    out.push_str(&encode_string(&raw));
                } else {
                    out.push_str(&raw);
                }
                prev = Prev::Value;
            }
        }
    }

    if prev == Prev::Colon {
        out.push_str("null");
    }
    while let Some(open) = stack.pop() {
        out.push(closer_for(open));
    }
    out
}

/// Emit the separator a new value needs, inserting a comma when two values sit
/// side by side without one.
fn begin_value(out: &mut String, prev: &mut Prev) {
    if matches!(*prev, Prev::Comma | Prev::Value) {
        out.push(',');
    }
}

/// Repair `input` and parse the result.
pub fn parse_lenient(input: &str) -> Result<Value, String> {
    let repaired = repair_json(input);
    tracing::trace!(repaired = %repaired, "lenient repair output");
    serde_json::from_str(&repaired).map_err(|e| e.to_string())
}
