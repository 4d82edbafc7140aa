//! The text-offset resolver.
//!
//! Maps pattern-internal offsets of a [`PatternNode`] back to absolute
//! file offsets of the enclosing string or regex literal. This is the one
//! place where the two coordinate systems meet; everything a rule reports
//! is already in file coordinates.

use crate::error::AnalysisError;
use crate::pattern::PatternNode;
use crate::source::{SourceBuffer, SourceRange};
use crate::tree::{NodeId, SyntaxTree};

/// Absolute offset of the first pattern-body character inside `literal`.
///
/// For a regex literal `/ab/g` that is the character after the opening
/// slash; for a quoted string later compiled into a pattern it is the
/// character after the opening quote. A string containing escape
/// sequences cooks to a value whose offsets no longer line up with the
/// raw text, so it cannot be mapped and yields `None`.
pub fn pattern_text_start(
    buffer: &SourceBuffer,
    tree: &SyntaxTree,
    literal: NodeId,
) -> Result<Option<usize>, AnalysisError> {
    let node = tree.node(literal)?;
    match node.kind {
        "regex" => Ok(Some(node.range.start + 1)),
        "string" => {
            let raw = buffer.slice(node.range);
            // offsets only line up when the cooked value is the raw inner text
            if raw.len() >= 2 && !raw.contains('\\') {
                Ok(Some(node.range.start + 1))
            } else {
                Ok(None)
            }
        }
        _ => Ok(None),
    }
}

/// Resolve a pattern node's span to the absolute file range it occupies
/// inside `literal`.
///
/// `absolute = pattern_text_start + pattern_span`; the pattern node's own
/// end already accounts for quantifier suffixes, so nothing is re-added
/// or dropped. When the literal cannot be mapped (escaped string) the
/// literal's full range is returned instead. Pure and idempotent.
pub fn regexp_range(
    buffer: &SourceBuffer,
    tree: &SyntaxTree,
    literal: NodeId,
    pattern: &PatternNode,
) -> Result<SourceRange, AnalysisError> {
    let literal_range = tree.node(literal)?.range;
    let body_start = match pattern_text_start(buffer, tree, literal)? {
        Some(start) => start,
        None => return Ok(literal_range),
    };

    let resolved = SourceRange::new(
        body_start + pattern.span.start,
        body_start + pattern.span.end,
    );
    if !literal_range.contains(resolved) {
        return Err(AnalysisError::OutOfBounds(format!(
            "pattern span {} resolves to {} outside literal {}",
            pattern.span, resolved, literal_range
        )));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, LanguageVariant};
    use crate::pattern::parse_pattern;

    fn literal_node(tree: &SyntaxTree, kind: &str) -> NodeId {
        tree.preorder()
            .find(|id| tree.node(*id).unwrap().kind == kind)
            .unwrap()
    }

    #[test]
    fn test_regex_literal_offsets() {
        let source = "/ab*c/.test(s);\n";
        let buffer = SourceBuffer::new(source);
        let tree = parse(source, LanguageVariant::JavaScript).unwrap();
        let literal = literal_node(&tree, "regex");
        let root = parse_pattern("ab*c").unwrap();
        // 'b*' is the second concat element, pattern span 1..3
        let rep = &root.children[1];
        let range = regexp_range(&buffer, &tree, literal, rep).unwrap();
        assert_eq!(range, SourceRange::new(2, 4));
        assert_eq!(buffer.slice(range), "b*");
    }

    #[test]
    fn test_escaped_string_falls_back_to_literal_range() {
        let source = r#"'a\\b*';"#;
        let buffer = SourceBuffer::new(source);
        let tree = parse(source, LanguageVariant::JavaScript).unwrap();
        let literal = literal_node(&tree, "string");
        let literal_range = tree.node(literal).unwrap().range;
        let root = parse_pattern("a\\\\b*").unwrap();
        let range = regexp_range(&buffer, &tree, literal, root.walk()[1]).unwrap();
        assert_eq!(range, literal_range);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let source = "'/s*';";
        let buffer = SourceBuffer::new(source);
        let tree = parse(source, LanguageVariant::JavaScript).unwrap();
        let literal = literal_node(&tree, "string");
        let root = parse_pattern("/s*").unwrap();
        let quantifier = &root.children[1];
        let first = regexp_range(&buffer, &tree, literal, quantifier).unwrap();
        let second = regexp_range(&buffer, &tree, literal, quantifier).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_pattern_node_stays_inside_literal() {
        let source = "'(x|yy)*[a-f]+';";
        let buffer = SourceBuffer::new(source);
        let tree = parse(source, LanguageVariant::JavaScript).unwrap();
        let literal = literal_node(&tree, "string");
        let literal_range = tree.node(literal).unwrap().range;
        let root = parse_pattern("(x|yy)*[a-f]+").unwrap();
        for node in root.walk() {
            let range = regexp_range(&buffer, &tree, literal, node).unwrap();
            assert!(literal_range.contains(range), "{} escapes {}", range, literal_range);
        }
    }
}
