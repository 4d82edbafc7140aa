//! The bridge request/response contract.
//!
//! Thin glue between the orchestrator's wire format and the analysis
//! core. `handle_request` never fails: a parse failure becomes a
//! populated `parseError`, a broken engine invariant becomes a
//! distinguished `internalError`, and everything else is a normal result.

use serde::{Deserialize, Serialize};

use crate::analyze::{analyze, RuleSelection};
use crate::error::AnalysisError;
use crate::issue::{Diagnostic, Highlight, Issue, Metrics};
use crate::parser::{self, LanguageVariant};
use crate::source::{SourceBuffer, SourceRange};
use crate::visit::{FileInfo, FileType};

/// One file-analysis request from the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub file_path: String,
    pub file_content: String,
    pub file_type: FileType,
    pub language_variant: LanguageVariant,
    #[serde(default)]
    pub rule_selection: Vec<RuleSelection>,
    #[serde(default)]
    pub compute_metrics: bool,
    #[serde(default)]
    pub compute_highlights: bool,
}

/// Parse failure record: no rules ran, no findings exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseError {
    pub message: String,
    pub range: SourceRange,
}

/// The per-file analysis response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<Highlight>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<ParseError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_error: Option<String>,
}

/// Analyze one request end to end.
pub fn handle_request(request: &Request) -> Response {
    let buffer = SourceBuffer::new(request.file_content.clone());
    let tree = match parser::parse(buffer.text(), request.language_variant) {
        Ok(tree) => tree,
        Err(AnalysisError::ParseUnavailable { message, range }) => {
            return Response {
                parse_error: Some(ParseError { message, range }),
                ..Response::default()
            };
        }
        Err(other) => {
            return Response {
                internal_error: Some(other.to_string()),
                ..Response::default()
            };
        }
    };

    let file = FileInfo {
        path: request.file_path.clone(),
        file_type: request.file_type,
    };
    match analyze(
        &tree,
        &buffer,
        &file,
        &request.rule_selection,
        request.compute_metrics,
        request.compute_highlights,
    ) {
        Ok(result) => Response {
            issues: result.issues,
            metrics: result.metrics,
            highlights: result.highlights,
            diagnostics: result.diagnostics,
            parse_error: None,
            internal_error: None,
        },
        // UnknownNode and friends: invariant breakage, not a parse error
        Err(err) => Response {
            internal_error: Some(err.to_string()),
            ..Response::default()
        },
    }
}

/// Handle one JSON-encoded request line, producing a JSON response.
pub fn handle_json(line: &str) -> String {
    let response = match serde_json::from_str::<Request>(line) {
        Ok(request) => handle_request(&request),
        Err(err) => Response {
            internal_error: Some(format!("malformed request: {}", err)),
            ..Response::default()
        },
    };
    serde_json::to_string(&response).unwrap_or_else(|err| {
        format!("{{\"issues\":[],\"internalError\":\"serialization failed: {}\"}}", err)
    })
}
