//! Built-in metrics collector.
//!
//! Participates in the same single traversal as the detection rules so
//! metrics never cost a second tree walk. Publishes its totals from the
//! end-of-file hook.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::issue::Metrics;
use crate::tree::NodeId;
use crate::visit::{Rule, RuleContext, ANY_NODE};

pub const KEY: &str = "metrics";

const STATEMENT_KINDS: &[&str] = &[
    "expression_statement",
    "variable_declaration",
    "lexical_declaration",
    "if_statement",
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
    "return_statement",
    "break_statement",
    "continue_statement",
    "throw_statement",
    "switch_statement",
    "try_statement",
    "labeled_statement",
    "debugger_statement",
    "with_statement",
];

const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "generator_function_declaration",
    "generator_function",
    "arrow_function",
    "method_definition",
];

const CLASS_KINDS: &[&str] = &["class_declaration", "class"];

/// Branch points beyond function entry. `&&`/`||`/`??` are anonymous
/// operator tokens and dispatch like any other kind tag.
const BRANCH_KINDS: &[&str] = &[
    "if_statement",
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
    "switch_case",
    "ternary_expression",
    "catch_clause",
    "&&",
    "||",
    "??",
];

pub fn build(_config: &Value) -> Box<dyn Rule> {
    Box::new(MetricsCollector::default())
}

#[derive(Default)]
pub struct MetricsCollector {
    metrics: Metrics,
    code_lines: BTreeSet<usize>,
}

impl Rule for MetricsCollector {
    fn key(&self) -> &'static str {
        KEY
    }

    fn node_kinds(&self) -> &'static [&'static str] {
        &[ANY_NODE]
    }

    fn on_node(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> anyhow::Result<()> {
        let data = ctx.tree.node(node)?;
        let kind = data.kind;

        if STATEMENT_KINDS.contains(&kind) {
            self.metrics.statements += 1;
        }
        if FUNCTION_KINDS.contains(&kind) {
            self.metrics.functions += 1;
            self.metrics.complexity += 1;
        }
        if CLASS_KINDS.contains(&kind) {
            self.metrics.classes += 1;
        }
        if BRANCH_KINDS.contains(&kind) {
            self.metrics.complexity += 1;
        }

        if kind == "comment" {
            self.metrics.comment_lines += ctx.buffer.line_span(data.range);
        } else if data.children.is_empty() && !data.range.is_empty() {
            // leaf token: every line it touches holds code
            let (start_line, _) = ctx.buffer.position_at(data.range.start);
            let (end_line, _) = ctx.buffer.position_at(data.range.end - 1);
            self.code_lines.extend(start_line..=end_line);
        }
        Ok(())
    }

    fn on_end(&mut self, ctx: &mut RuleContext<'_>) -> anyhow::Result<()> {
        self.metrics.ncloc = self.code_lines.len();
        ctx.set_metrics(std::mem::take(&mut self.metrics));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::analyze;
    use crate::parser::{parse, LanguageVariant};
    use crate::source::SourceBuffer;
    use crate::visit::{FileInfo, FileType};

    fn metrics_of(source: &str) -> Metrics {
        let buffer = SourceBuffer::new(source);
        let tree = parse(source, LanguageVariant::JavaScript).unwrap();
        let file = FileInfo {
            path: "test.js".to_string(),
            file_type: FileType::Main,
        };
        analyze(&tree, &buffer, &file, &[], true, false)
            .unwrap()
            .metrics
            .unwrap()
    }

    #[test]
    fn test_basic_counts() {
        let source = "\
// a comment
function f(x) {
  if (x) {
    return 1;
  }
  return 2;
}
";
        let m = metrics_of(source);
        assert_eq!(m.functions, 1);
        assert_eq!(m.statements, 3); // if, return, return
        assert_eq!(m.comment_lines, 1);
        assert_eq!(m.complexity, 2); // function + if
        assert_eq!(m.ncloc, 6);
    }

    #[test]
    fn test_logical_operators_add_complexity() {
        let m = metrics_of("const ok = a && b || c;\n");
        assert_eq!(m.complexity, 2);
    }
}
