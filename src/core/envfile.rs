//! Env document parsing and serialization.
//!
//! The document is a plain `NAME=value` file not owned by denv; we read
//! it tolerantly (comments, blank lines, `export` prefixes, single or
//! double quotes) and rewrite it in full. Writing owns the quoting rule:
//! values with whitespace, quotes, backslashes, `#` or an embedded `=`
//! are double-quoted with `"` and `\` escaped, everything else is bare.
//! Unrelated keys keep their relative order across rewrites.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// An ordered name→value view of one env file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EnvDocument {
    entries: Vec<(String, String)>,
}

impl EnvDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse document text. Unparseable lines are dropped, matching the
    /// convention that comments and noise are tolerated, not preserved.
    pub fn parse(contents: &str) -> Self {
        let mut doc = Self::new();
        for line in contents.lines() {
            if let Some((key, value)) = parse_line(line) {
                doc.set(&key, &value);
            }
        }
        doc
    }

    /// Read and parse a file. A missing file is an empty document.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or overwrite a key, keeping its original position on
    /// overwrite and appending otherwise.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    /// Remove a key. Returns whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| k != key);
        self.entries.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Serialize back to document text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push('=');
            out.push_str(&render_value(value));
            out.push('\n');
        }
        out
    }

    /// Rewrite the full document atomically (sibling temp file + rename),
    /// so interruption leaves the prior document intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, self.render())?;
        fs::rename(&tmp, path)?;

        Ok(())
    }
}

/// Parse a single line into a (key, value) pair.
///
/// Returns `None` for blank lines, comments, and lines without `=`.
fn parse_line(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();

    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);

    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key.to_string(), parse_value(value.trim())))
}

/// Decode a raw value: strip surrounding quotes and, for double quotes,
/// process `\"` and `\\` escapes.
fn parse_value(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        let inner = &raw[1..raw.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some(escaped @ ('"' | '\\')) => out.push(escaped),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => out.push('\\'),
                }
            } else {
                out.push(c);
            }
        }
        return out;
    }

    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        // Single quotes are literal, no escapes.
        return raw[1..raw.len() - 1].to_string();
    }

    raw.to_string()
}

/// Produce the written form of a value: bare when safe, double-quoted
/// with escapes otherwise.
fn render_value(value: &str) -> String {
    let needs_quoting = value.chars().any(|c| {
        c.is_whitespace() || c == '"' || c == '\'' || c == '\\' || c == '=' || c == '#'
    });

    if !needs_quoting {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
