//! Built-in syntax-highlighting collector.
//!
//! Emits token ranges in source order during the shared traversal.
//! Keyword tokens are anonymous grammar nodes, so they register by their
//! literal kind tag just like named nodes.

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::issue::HighlightKind;
use crate::tree::NodeId;
use crate::visit::{Rule, RuleContext};

pub const KEY: &str = "highlight";

const LITERAL_KINDS: &[&str] = &["comment", "string", "template_string", "number", "regex"];

const KEYWORDS: &[&str] = &[
    "var", "let", "const", "function", "return", "if", "else", "for", "while", "do", "switch",
    "case", "default", "break", "continue", "new", "delete", "typeof", "instanceof", "in", "of",
    "class", "extends", "super", "this", "import", "export", "from", "try", "catch", "finally",
    "throw", "async", "await", "yield", "static", "get", "set", "void", "debugger", "true",
    "false", "null", "undefined",
];

/// Every kind tag the collector registers for: literal-ish nodes plus the
/// keyword tokens, which are anonymous grammar nodes dispatched by tag.
static TOKEN_KINDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut kinds = LITERAL_KINDS.to_vec();
    kinds.extend_from_slice(KEYWORDS);
    kinds
});

pub fn build(_config: &Value) -> Box<dyn Rule> {
    Box::new(HighlightCollector)
}

pub struct HighlightCollector;

impl Rule for HighlightCollector {
    fn key(&self) -> &'static str {
        KEY
    }

    fn node_kinds(&self) -> &'static [&'static str] {
        TOKEN_KINDS.as_slice()
    }

    fn on_node(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> anyhow::Result<()> {
        let data = ctx.tree.node(node)?;
        let kind = match data.kind {
            "comment" => HighlightKind::Comment,
            "string" | "template_string" => HighlightKind::String,
            "number" => HighlightKind::Number,
            "regex" => HighlightKind::Regex,
            k if KEYWORDS.contains(&k) => HighlightKind::Keyword,
            _ => return Ok(()),
        };
        // nested tokens (a string inside a template substitution) emit in
        // source order like everything else
        ctx.add_highlight(data.range, kind);
        Ok(())
    }
}
