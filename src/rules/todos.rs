//! Flags unfinished-work markers left in comments.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::source::SourceRange;
use crate::tree::NodeId;
use crate::visit::{Rule, RuleContext};

pub const KEY: &str = "no-todo-comment";

/// Work markers, matched case-insensitively on word boundaries.
static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(todo|fixme|hack|xxx)\b").expect("valid marker pattern"));

pub fn build(_config: &Value) -> Box<dyn Rule> {
    Box::new(NoTodoComment)
}

struct NoTodoComment;

impl Rule for NoTodoComment {
    fn key(&self) -> &'static str {
        KEY
    }

    fn node_kinds(&self) -> &'static [&'static str] {
        &["comment"]
    }

    fn on_node(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> anyhow::Result<()> {
        let start = ctx.tree.node(node)?.range.start;
        let text = ctx.text_of(node)?;
        for m in MARKER.find_iter(text) {
            let marker = text[m.start()..m.end()].to_uppercase();
            ctx.report(
                format!("Complete the task associated with this {} comment.", marker),
                SourceRange::new(start + m.start(), start + m.end()),
            );
        }
        Ok(())
    }
}
