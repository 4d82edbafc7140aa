//! Findings and the per-file analysis result.

use serde::{Deserialize, Serialize};

use crate::source::SourceRange;

/// A secondary location attached to an issue, with its own message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryLocation {
    pub range: SourceRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One finding reported by a rule. Immutable once appended to the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub rule: String,
    pub message: String,
    pub range: SourceRange,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondaries: Vec<SecondaryLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

/// Record of a rule whose handler faulted. The rule's coverage for this
/// file is degraded; all other rules' findings are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule: String,
    pub message: String,
}

/// Syntax token categories for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    Keyword,
    Comment,
    String,
    Number,
    Regex,
}

/// One highlighted token range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub range: SourceRange,
    pub kind: HighlightKind,
}

/// File-level measures computed in the same traversal as the rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Lines containing at least one code token.
    pub ncloc: usize,
    /// Lines containing a comment.
    pub comment_lines: usize,
    pub statements: usize,
    pub functions: usize,
    pub classes: usize,
    /// Cyclomatic complexity over the whole file.
    pub complexity: usize,
}

/// The full output of one `analyze` call: built incrementally during a
/// single traversal, frozen at traversal end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<Highlight>,
}

impl AnalysisResult {
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Issues reported by one rule, in traversal order.
    pub fn issues_of<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a Issue> {
        self.issues.iter().filter(move |i| i.rule == rule)
    }
}
