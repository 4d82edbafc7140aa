//! Error taxonomy for the analysis core.

use thiserror::Error;

use crate::source::SourceRange;
use crate::tree::NodeId;

/// Errors that can occur during a single file analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A requested line/column or pattern offset falls outside the owning
    /// buffer or pattern. Inside a rule handler this is a contract bug of
    /// that rule and is surfaced as a per-rule diagnostic, never as a
    /// failure of the whole run.
    #[error("position out of bounds: {0}")]
    OutOfBounds(String),

    /// A query was asked about a node that is not part of the current tree.
    /// This is a broken invariant, fatal to the current `analyze` call and
    /// distinct from a parse error.
    #[error("node {0:?} is not part of the current tree")]
    UnknownNode(NodeId),

    /// The parser could not produce a usable tree. No rules run; the
    /// boundary answers with a populated `parseError` field.
    #[error("parse error at {}:{}: {message}", .range.start, .range.end)]
    ParseUnavailable { message: String, range: SourceRange },
}

impl AnalysisError {
    /// Range associated with a parse failure, if this is one.
    pub fn parse_error_range(&self) -> Option<SourceRange> {
        match self {
            AnalysisError::ParseUnavailable { range, .. } => Some(*range),
            _ => None,
        }
    }
}
