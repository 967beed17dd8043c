//! The `Program` value: an ordered list of raw G-code lines

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered sequence of raw text lines
///
/// Programs are never edited in place; every pipeline stage builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    lines: Vec<String>,
}

impl Program {
    /// Create a program from owned lines.
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Split text into lines. `\r\n` and `\n` are both accepted.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// The raw lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Iterate over the raw lines.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.lines.iter()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the program has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines that are not blank after trimming.
    pub fn non_blank_len(&self) -> usize {
        self.lines.iter().filter(|l| !l.trim().is_empty()).count()
    }

    /// A copy with leading and trailing blank lines removed.
    pub fn trim_blank_edges(&self) -> Program {
        let start = self
            .lines
            .iter()
            .position(|l| !l.trim().is_empty())
            .unwrap_or(self.lines.len());
        let end = self
            .lines
            .iter()
            .rposition(|l| !l.trim().is_empty())
            .map_or(start, |i| i + 1);
        Program::new(self.lines[start..end].to_vec())
    }

    /// Join the lines with `\n`. No trailing newline is added.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Consume the program and return its lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<Vec<String>> for Program {
    fn from(lines: Vec<String>) -> Self {
        Self::new(lines)
    }
}

impl FromIterator<String> for Program {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

impl IntoIterator for Program {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.into_iter()
    }
}
