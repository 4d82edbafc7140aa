//! Tree-sitter front end: parses file content into the [`SyntaxTree`] arena.
//!
//! The bridge does not analyze the tree-sitter tree directly. It flattens
//! it once into the owned arena so rules work against stable [`NodeId`]s
//! with no lifetime ties to the parser, and so the parent table exists up
//! front.

use serde::{Deserialize, Serialize};
use tree_sitter::{Language, Parser as TsParser};

use crate::error::AnalysisError;
use crate::source::SourceRange;
use crate::tree::{NodeId, SyntaxTree, TreeBuilder};

/// Source dialect of an incoming file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageVariant {
    #[serde(alias = "js")]
    JavaScript,
    #[serde(alias = "ts")]
    TypeScript,
}

impl LanguageVariant {
    fn language(self) -> Language {
        match self {
            LanguageVariant::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            LanguageVariant::TypeScript => {
                tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageVariant::JavaScript => "javascript",
            LanguageVariant::TypeScript => "typescript",
        }
    }
}

/// Parse `source` into the arena tree.
///
/// Tree-sitter always produces a tree, recovering around syntax errors
/// with ERROR/MISSING nodes. The bridge contract wants no partial
/// traversal, so any such node turns the whole parse into
/// [`AnalysisError::ParseUnavailable`] carrying the first error's range.
pub fn parse(source: &str, variant: LanguageVariant) -> Result<SyntaxTree, AnalysisError> {
    let mut parser = TsParser::new();
    parser
        .set_language(&variant.language())
        .map_err(|e| AnalysisError::ParseUnavailable {
            message: format!("failed to load {} grammar: {}", variant.as_str(), e),
            range: SourceRange::new(0, 0),
        })?;

    let ts_tree = parser
        .parse(source, None)
        .ok_or_else(|| AnalysisError::ParseUnavailable {
            message: "parser produced no tree".to_string(),
            range: SourceRange::new(0, 0),
        })?;

    if let Some(err) = first_error(ts_tree.root_node()) {
        return Err(err);
    }

    Ok(flatten(ts_tree.root_node()))
}

/// First ERROR or MISSING node in pre-order, as a parse failure.
fn first_error(root: tree_sitter::Node<'_>) -> Option<AnalysisError> {
    if !root.has_error() {
        return None;
    }
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let range = SourceRange::new(node.start_byte(), node.end_byte());
            let (row, col) = (node.start_position().row + 1, node.start_position().column + 1);
            let message = if node.is_missing() {
                format!("missing {} at {}:{}", node.kind(), row, col)
            } else {
                format!("syntax error at {}:{}", row, col)
            };
            return Some(AnalysisError::ParseUnavailable { message, range });
        }
        if node.has_error() {
            for i in (0..node.child_count()).rev() {
                if let Some(child) = node.child(i) {
                    stack.push(child);
                }
            }
        }
    }
    // has_error was set but no ERROR node found; treat as a whole-file failure
    Some(AnalysisError::ParseUnavailable {
        message: "unparseable input".to_string(),
        range: SourceRange::new(root.start_byte(), root.end_byte()),
    })
}

/// Flatten the tree-sitter tree into the arena, pre-order, keeping both
/// named and anonymous nodes (keyword tokens are anonymous and are what
/// the highlighter registers for).
fn flatten(root: tree_sitter::Node<'_>) -> SyntaxTree {
    let mut builder = TreeBuilder::new();
    let mut stack: Vec<(tree_sitter::Node<'_>, Option<NodeId>)> = vec![(root, None)];
    while let Some((node, parent)) = stack.pop() {
        let id = builder.push(
            node.kind(),
            SourceRange::new(node.start_byte(), node.end_byte()),
            node.is_named(),
            parent,
        );
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push((child, Some(id)));
            }
        }
    }
    builder.finish()
}
