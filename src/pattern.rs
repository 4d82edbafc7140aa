//! Parsed regular-expression patterns.
//!
//! A [`PatternNode`] tree mirrors the structure of a regex literal's
//! pattern body. All spans are offsets into the *pattern text itself*
//! (the literal minus delimiters and flags), never file offsets; the
//! translation to file coordinates lives in [`crate::location`].

use regex_syntax::ast::{parse::Parser, Ast};

use crate::source::SourceRange;

/// Structural kind of a pattern node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Zero-width branch, e.g. the first arm of `|x`.
    Empty,
    /// A single literal character or escape.
    Literal,
    /// `.`
    Dot,
    /// `^`, `$`, `\b`, ...
    Assertion,
    /// A character class: `[a-z]`, `\d`, `\p{L}`.
    Class,
    /// `(...)`, `(?:...)`, `(?<name>...)`.
    Group,
    /// A quantified element; the span includes the quantifier suffix.
    Repetition,
    /// `a|b|c`; child spans exclude the `|` separators.
    Alternation,
    /// Adjacent elements of one branch.
    Concat,
    /// Inline flag settings, `(?i)`.
    Flags,
}

/// One node of a parsed pattern, with pattern-relative span and owned
/// children in source order.
#[derive(Debug, Clone)]
pub struct PatternNode {
    pub kind: PatternKind,
    pub span: SourceRange,
    pub children: Vec<PatternNode>,
}

impl PatternNode {
    /// Depth-first pre-order walk over this subtree.
    pub fn walk<'a>(&'a self) -> Vec<&'a PatternNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

/// Parse a raw pattern body into a [`PatternNode`] tree.
///
/// Returns `None` for syntax regex-syntax does not model (backreferences,
/// lookbehind, ...). Rules that need a pattern tree degrade gracefully on
/// `None` instead of failing the file.
pub fn parse_pattern(pattern: &str) -> Option<PatternNode> {
    let ast = Parser::new().parse(pattern).ok()?;
    Some(convert(&ast))
}

fn span_of(ast: &Ast) -> SourceRange {
    let span = ast.span();
    SourceRange::new(span.start.offset, span.end.offset)
}

fn convert(ast: &Ast) -> PatternNode {
    let (kind, children) = match ast {
        Ast::Empty(_) => (PatternKind::Empty, Vec::new()),
        Ast::Flags(_) => (PatternKind::Flags, Vec::new()),
        Ast::Literal(_) => (PatternKind::Literal, Vec::new()),
        Ast::Dot(_) => (PatternKind::Dot, Vec::new()),
        Ast::Assertion(_) => (PatternKind::Assertion, Vec::new()),
        Ast::ClassUnicode(_) | Ast::ClassPerl(_) | Ast::ClassBracketed(_) => {
            (PatternKind::Class, Vec::new())
        }
        Ast::Repetition(rep) => (PatternKind::Repetition, vec![convert(&rep.ast)]),
        Ast::Group(group) => (PatternKind::Group, vec![convert(&group.ast)]),
        Ast::Alternation(alt) => (
            PatternKind::Alternation,
            alt.asts.iter().map(convert).collect(),
        ),
        Ast::Concat(concat) => (
            PatternKind::Concat,
            concat.asts.iter().map(convert).collect(),
        ),
    };
    PatternNode {
        kind,
        span: span_of(ast),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantifier_span_includes_suffix() {
        // "/s*" parses as concat of literal '/' and repetition 's*'
        let root = parse_pattern("/s*").unwrap();
        assert_eq!(root.kind, PatternKind::Concat);
        let rep = &root.children[1];
        assert_eq!(rep.kind, PatternKind::Repetition);
        assert_eq!(rep.span, SourceRange::new(1, 3));
    }

    #[test]
    fn test_alternation_arm_spans() {
        let root = parse_pattern("|/?[a-z]").unwrap();
        assert_eq!(root.kind, PatternKind::Alternation);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].kind, PatternKind::Empty);
        assert_eq!(root.children[0].span, SourceRange::new(0, 0));
        // second arm covers "/?[a-z]", excluding the '|'
        assert_eq!(root.children[1].span, SourceRange::new(1, 8));
    }

    #[test]
    fn test_character_class_span() {
        let root = parse_pattern("a[0-9]b").unwrap();
        let class = root
            .walk()
            .into_iter()
            .find(|n| n.kind == PatternKind::Class)
            .unwrap();
        assert_eq!(class.span, SourceRange::new(1, 6));
    }

    #[test]
    fn test_unsupported_syntax_is_none() {
        // backreferences are not part of the regex-syntax AST
        assert!(parse_pattern(r"(a)\1").is_none());
    }
}
