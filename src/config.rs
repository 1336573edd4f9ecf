// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Read the `locale_dirs` setting from a documentation config file.
//!
//! A Sphinx `conf.py` is a Python script, but we never execute it.
//! Instead we look for top-level assignments of the form
//!
//! ```python
//! locale_dirs = ["locale/", 'other']
//! ```
//!
//! and accept only a list or tuple of plain string literals on the
//! right-hand side (or `None`). A type annotation such as
//! `locale_dirs: list = [...]` is allowed. Files ending in `.toml` are read as
//! TOML with a top-level `locale_dirs` array instead.

use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::CharIndices;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

static ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^locale_dirs[ \t]*(?::[^=\n]*)?=[ \t]*").unwrap());

#[derive(Deserialize)]
struct TomlConfig {
    #[serde(default)]
    locale_dirs: Option<Vec<String>>,
}

/// Read `locale_dirs` from the config file at `path`.
///
/// Returns `Ok(None)` if the file does not declare the setting.
pub fn read_locale_dirs(path: &Path) -> Result<Option<Vec<String>>> {
    let text = fs::read_to_string(path).map_err(Error::io(path))?;
    if path.extension().is_some_and(|ext| ext == "toml") {
        let config: TomlConfig = toml::from_str(&text).map_err(|source| Error::ConfigToml {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(config.locale_dirs);
    }
    parse_locale_dirs(&text).map_err(|(line, message)| Error::ConfigSyntax {
        path: path.to_path_buf(),
        line,
        message,
    })
}

/// Find the last top-level `locale_dirs` assignment in a Python
/// script and evaluate its literal value.
///
/// Errors are reported as a 1-based line number and a message.
fn parse_locale_dirs(text: &str) -> std::result::Result<Option<Vec<String>>, (usize, String)> {
    let Some(assignment) = ASSIGNMENT.find_iter(text).last() else {
        return Ok(None);
    };
    let line = text[..assignment.start()].lines().count() + 1;
    let mut parser = LiteralParser::new(&text[assignment.end()..], line);
    let value = parser.value()?;
    parser.end_of_statement()?;
    Ok(value)
}

/// Parser for the small subset of Python literals we accept.
struct LiteralParser<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        LiteralParser {
            text,
            chars: text.char_indices().peekable(),
            line,
        }
    }

    fn error<T>(&self, message: impl Into<String>) -> std::result::Result<T, (usize, String)> {
        Err((self.line, message.into()))
    }

    fn bump(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Skip blanks and comments. Newlines are only skipped inside
    /// brackets, where Python joins lines implicitly.
    fn skip_blank(&mut self, newlines: bool) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' => {}
                '\n' if newlines => {}
                '#' => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                    continue;
                }
                _ => return,
            }
            self.bump();
        }
    }

    fn value(&mut self) -> std::result::Result<Option<Vec<String>>, (usize, String)> {
        match self.peek() {
            Some('[') => self.sequence(']').map(Some),
            Some('(') => self.sequence(')').map(Some),
            Some('N') if self.rest().starts_with("None") => {
                for _ in 0.."None".len() {
                    self.bump();
                }
                Ok(None)
            }
            _ => self.error("locale_dirs must be a list of string literals"),
        }
    }

    fn rest(&mut self) -> &'a str {
        let offset = self.chars.peek().map_or(self.text.len(), |&(idx, _)| idx);
        &self.text[offset..]
    }

    fn sequence(&mut self, close: char) -> std::result::Result<Vec<String>, (usize, String)> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_blank(true);
            match self.peek() {
                Some(c) if c == close => {
                    self.bump();
                    return Ok(items);
                }
                Some(_) => items.push(self.string()?),
                None => return self.error(format!("missing closing {close:?}")),
            }
            self.skip_blank(true);
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {}
                _ => return self.error("expected ',' between locale_dirs entries"),
            }
        }
    }

    fn string(&mut self) -> std::result::Result<String, (usize, String)> {
        let mut raw = false;
        while let Some(prefix @ ('r' | 'R' | 'u' | 'U')) = self.peek() {
            raw |= matches!(prefix, 'r' | 'R');
            self.bump();
        }
        let quote = match self.peek() {
            Some(quote @ ('"' | '\'')) => quote,
            _ => return self.error("locale_dirs entries must be string literals"),
        };
        self.bump();

        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(value),
                Some('\n') | None => return self.error("unterminated string literal"),
                Some('\\') if !raw => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(c @ ('\\' | '\'' | '"')) => value.push(c),
                    Some(c) => {
                        value.push('\\');
                        value.push(c);
                    }
                    None => return self.error("unterminated string literal"),
                },
                Some('\\') => {
                    value.push('\\');
                    if let Some(c) = self.bump() {
                        value.push(c);
                    }
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn end_of_statement(&mut self) -> std::result::Result<(), (usize, String)> {
        self.skip_blank(false);
        match self.peek() {
            None | Some('\n') | Some(';') => Ok(()),
            Some(_) => self.error("locale_dirs must be a list of string literals"),
        }
    }
}
