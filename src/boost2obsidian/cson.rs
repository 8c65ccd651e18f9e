//! # CSON Reader
//!
//! Boostnote stores every note as a CSON (CoffeeScript Object Notation) file.
//! This module reads the subset of CSON the Boostnote writer emits and turns it
//! into a [`serde_json::Value`], so note files can be deserialized with serde
//! like any other format.
//!
//! ## Supported Syntax
//!
//! ```text
//! type: "MARKDOWN_NOTE"          # implicit top-level object
//! folder: 'a1b2c3'               # single or double quoted strings
//! isStarred: false               # true / false / null
//! tags: [ "a", "b" ]             # arrays, comma or newline separated
//! snippets: [
//!   {                            # explicit objects
//!     content: '''
//!       indented block string    # common indentation is removed
//!     '''
//!   }
//! ]
//! meta:
//!   nested: 1                    # implicit nested objects by indentation
//! ```
//!
//! Block strings (`'''` or `"""`) drop a blank first and last line, remove the
//! indentation shared by all non-blank lines, and then resolve backslash escapes.

use crate::error::{MigrateError, Result};
use serde_json::{Map, Number, Value};

/// Parses a CSON document into a JSON value.
pub fn parse(input: &str) -> Result<Value> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut parser = Parser::new(input);
    parser.document()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn document(&mut self) -> Result<Value> {
        self.skip_blank();
        let value = if self.peek() == Some('{') {
            self.value()?
        } else {
            Value::Object(self.members(None, None)?)
        };
        self.skip_blank();
        if !self.at_end() {
            return Err(self.error("unexpected trailing content"));
        }
        Ok(value)
    }

    /// Reads `key: value` pairs until `close` is consumed, the input ends, or a
    /// line starts at or left of `parent_column`.
    fn members(
        &mut self,
        parent_column: Option<usize>,
        close: Option<char>,
    ) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        loop {
            self.skip_blank();
            match self.peek() {
                None => {
                    if let Some(c) = close {
                        return Err(self.error(&format!("expected '{}' before end of input", c)));
                    }
                    break;
                }
                Some(c) if Some(c) == close => {
                    self.pos += 1;
                    break;
                }
                _ => {}
            }
            if let Some(parent) = parent_column {
                if self.column() <= parent {
                    break;
                }
            }

            let key_column = self.column();
            let key = self.key()?;
            self.skip_inline();
            if self.peek() != Some(':') {
                return Err(self.error(&format!("expected ':' after key '{}'", key)));
            }
            self.pos += 1;
            self.skip_inline();

            let value = if self.at_line_end() {
                self.skip_blank();
                if self.looks_like_key() && self.column() > key_column {
                    Value::Object(self.members(Some(key_column), None)?)
                } else if self.at_end() || self.column() <= key_column {
                    return Err(self.error(&format!("missing value for key '{}'", key)));
                } else {
                    self.value()?
                }
            } else {
                self.value()?
            };
            map.insert(key, value);

            self.skip_inline();
            if self.peek() == Some(',') {
                self.pos += 1;
            }
        }
        Ok(map)
    }

    fn key(&mut self) -> Result<String> {
        match self.peek() {
            Some(q @ ('"' | '\'')) => self.quoted(q),
            Some(c) if is_ident_char(c) => Ok(self.identifier()),
            Some(c) => Err(self.error(&format!(
                "unexpected character '{}' where a key was expected",
                c
            ))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn value(&mut self) -> Result<Value> {
        match self.peek() {
            Some('[') => self.array(),
            Some('{') => {
                self.pos += 1;
                Ok(Value::Object(self.members(None, Some('}'))?))
            }
            Some(q @ ('"' | '\'')) => {
                if self.starts_with_triple(q) {
                    self.block_string(q).map(Value::String)
                } else {
                    self.quoted(q).map(Value::String)
                }
            }
            Some(c) if c == '-' || c == '+' || c.is_ascii_digit() => self.number(),
            Some(c) if is_ident_char(c) => {
                let word = self.identifier();
                match word.as_str() {
                    "true" | "yes" | "on" => Ok(Value::Bool(true)),
                    "false" | "no" | "off" => Ok(Value::Bool(false)),
                    "null" => Ok(Value::Null),
                    other => Err(self.error(&format!("unexpected bare word '{}'", other))),
                }
            }
            Some(c) => Err(self.error(&format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn array(&mut self) -> Result<Value> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_blank();
            match self.peek() {
                None => return Err(self.error("expected ']' before end of input")),
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                _ => {}
            }
            items.push(self.value()?);
            self.skip_inline();
            if self.peek() == Some(',') {
                self.pos += 1;
            }
        }
        Ok(Value::Array(items))
    }

    fn number(&mut self) -> Result<Value> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::Number(n.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.error(&format!("invalid number '{}'", text)))
    }

    fn quoted(&mut self, quote: char) -> Result<String> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error("unterminated string")),
                Some('\\') => self.escape(&mut out)?,
                Some(c) if c == quote => break,
                Some(c) => out.push(c),
            }
        }
        Ok(out)
    }

    fn block_string(&mut self, quote: char) -> Result<String> {
        self.pos += 3;
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated block string")),
                Some('\\') => self.pos += 2,
                Some(c) if c == quote && self.starts_with_triple(quote) => break,
                Some(_) => self.pos += 1,
            }
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        self.pos += 3;

        let dedented = dedent(&raw);
        let mut inner = Parser::new(&dedented);
        let mut out = String::new();
        while let Some(c) = inner.bump() {
            if c == '\\' {
                inner.escape(&mut out)?;
            } else {
                out.push(c);
            }
        }
        Ok(out)
    }

    /// Resolves the escape following a consumed backslash.
    fn escape(&mut self, out: &mut String) -> Result<()> {
        match self.bump() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let hex: String = self.chars.iter().skip(self.pos).take(4).collect();
                let code = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .ok_or_else(|| self.error(&format!("invalid unicode escape '\\u{}'", hex)))?;
                self.pos += 4;
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            Some('\n') => {}
            Some(c) => out.push(c),
            None => return Err(self.error("dangling escape at end of input")),
        }
        Ok(())
    }

    fn identifier(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn looks_like_key(&self) -> bool {
        let mut i = self.pos;
        match self.chars.get(i) {
            Some(&q) if q == '"' || q == '\'' => {
                i += 1;
                while let Some(&c) = self.chars.get(i) {
                    i += 1;
                    if c == '\\' {
                        i += 1;
                    } else if c == q || c == '\n' {
                        break;
                    }
                }
            }
            Some(&c) if is_ident_char(c) => {
                while self.chars.get(i).is_some_and(|c| is_ident_char(*c)) {
                    i += 1;
                }
            }
            _ => return false,
        }
        while matches!(self.chars.get(i), Some(' ' | '\t')) {
            i += 1;
        }
        self.chars.get(i) == Some(&':')
    }

    fn starts_with_triple(&self, quote: char) -> bool {
        self.chars.len() >= self.pos + 3
            && self.chars[self.pos..self.pos + 3]
                .iter()
                .all(|c| *c == quote)
    }

    fn skip_inline(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.pos += 1;
        }
    }

    /// Skips whitespace, newlines and `#` comments.
    fn skip_blank(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r' | '\n') => self.pos += 1,
                Some('#') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek(), None | Some('\n' | '#'))
    }

    fn column(&self) -> usize {
        let line_start = self.chars[..self.pos]
            .iter()
            .rposition(|c| *c == '\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        self.pos - line_start
    }

    fn line(&self) -> usize {
        self.chars[..self.pos.min(self.chars.len())]
            .iter()
            .filter(|c| **c == '\n')
            .count()
            + 1
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn error(&self, message: &str) -> MigrateError {
        MigrateError::Cson {
            line: self.line(),
            message: message.to_string(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn dedent(raw: &str) -> String {
    let mut lines: Vec<&str> = raw
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.len() > 1 && lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    if lines.len() > 1 && lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    lines
        .into_iter()
        .map(|l| if l.trim().is_empty() { "" } else { &l[indent..] })
        .collect::<Vec<_>>()
        .join("\n")
}
