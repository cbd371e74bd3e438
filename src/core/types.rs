//! Common type definitions used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity levels for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Major,
    Critical,
}

impl Severity {
    /// Get the display name for this severity
    pub fn display_name(&self) -> &str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Major => "major",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "major" => Ok(Severity::Major),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// Identity of one source unit inside a program snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceId(u32);

impl SourceId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A byte range inside one source unit
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-length span marking an insertion point
    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    pub fn contains_span(&self, other: Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Compute the 1-based line and column of a byte offset
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in text.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Registration metadata declared by every rule
#[derive(Debug, Clone, Copy)]
pub struct RuleMeta {
    /// Diagnostic identifier owned by the rule
    pub id: &'static str,
    /// Human-readable category, used for severity overrides
    pub category: &'static str,
    /// Default severity, overridable by configuration
    pub severity: Severity,
    /// Message template with positional `{n}` parameters
    pub template: &'static str,
}

/// Format a message template by substituting positional `{n}` parameters
pub fn format_message(template: &str, args: &[String]) -> String {
    let mut message = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        message = message.replace(&format!("{{{i}}}"), arg);
    }
    message
}

/// A reported instance of a detected pattern
///
/// Findings are produced fresh on every detection pass and are only valid
/// against the program snapshot that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub rule_id: &'static str,
    pub severity: Severity,
    pub unit: SourceId,
    pub span: Span,
    pub message_args: Vec<String>,
}

impl Finding {
    pub fn new(meta: &RuleMeta, unit: SourceId, span: Span, message_args: Vec<String>) -> Self {
        Self {
            rule_id: meta.id,
            severity: meta.severity,
            unit,
            span,
            message_args,
        }
    }

    /// Format the finding message against its rule's template
    pub fn message(&self, meta: &RuleMeta) -> String {
        format_message(meta.template, &self.message_args)
    }
}
