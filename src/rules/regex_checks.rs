//! Detects empty alternatives in regular expressions.
//!
//! Covers both `/a|/` regex literals and string literals handed to
//! `RegExp(...)`. Every reported range goes through the text-offset
//! resolver, so findings land on the exact characters of the enclosing
//! literal.

use serde_json::Value;

use crate::ast;
use crate::issue::SecondaryLocation;
use crate::location::regexp_range;
use crate::pattern::{parse_pattern, PatternKind, PatternNode};
use crate::tree::NodeId;
use crate::visit::{Rule, RuleContext};

pub const KEY: &str = "no-empty-alternative";

pub fn build(_config: &Value) -> Box<dyn Rule> {
    Box::new(NoEmptyAlternative)
}

struct NoEmptyAlternative;

impl Rule for NoEmptyAlternative {
    fn key(&self) -> &'static str {
        KEY
    }

    fn node_kinds(&self) -> &'static [&'static str] {
        &["regex", "call_expression", "new_expression"]
    }

    fn on_node(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> anyhow::Result<()> {
        let literal = match ctx.tree.node(node)?.kind {
            "regex" => node,
            _ => match ast::regex_argument_literal(ctx.tree, ctx.buffer, node)? {
                Some(arg) => arg,
                None => return Ok(()),
            },
        };
        let Some(text) = ast::pattern_text_of_literal(ctx.tree, ctx.buffer, literal)? else {
            return Ok(());
        };
        // patterns regex-syntax cannot model are skipped, not faulted
        let Some(root) = parse_pattern(&text) else {
            return Ok(());
        };
        self.check(ctx, literal, &root)
    }
}

impl NoEmptyAlternative {
    fn check(
        &self,
        ctx: &mut RuleContext<'_>,
        literal: NodeId,
        root: &PatternNode,
    ) -> anyhow::Result<()> {
        for node in root.walk() {
            if node.kind != PatternKind::Alternation {
                continue;
            }
            for arm in &node.children {
                if arm.kind != PatternKind::Empty {
                    continue;
                }
                let arm_range = regexp_range(ctx.buffer, ctx.tree, literal, arm)?;
                let alternation_range = regexp_range(ctx.buffer, ctx.tree, literal, node)?;
                ctx.report_full(
                    "Remove this empty alternative or make it the last one.",
                    arm_range,
                    vec![SecondaryLocation {
                        range: alternation_range,
                        message: Some("Alternation containing the empty branch.".to_string()),
                    }],
                    None,
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{analyze, RuleSelection};
    use crate::parser::{parse, LanguageVariant};
    use crate::source::SourceBuffer;
    use crate::visit::{FileInfo, FileType};

    fn run(source: &str) -> crate::issue::AnalysisResult {
        let buffer = SourceBuffer::new(source);
        let tree = parse(source, LanguageVariant::JavaScript).unwrap();
        let file = FileInfo {
            path: "test.js".to_string(),
            file_type: FileType::Main,
        };
        let selection = vec![RuleSelection {
            rule_key: KEY.to_string(),
            configuration: Value::Null,
        }];
        analyze(&tree, &buffer, &file, &selection, false, false).unwrap()
    }

    #[test]
    fn test_empty_alternative_in_regex_literal() {
        let source = "/a|/.test(s);\n";
        let result = run(source);
        assert_eq!(result.issues.len(), 1);
        // empty arm sits just after the '|': pattern "a|" body starts at 1
        assert_eq!(result.issues[0].range.start, 3);
        assert_eq!(result.issues[0].range.end, 3);
    }

    #[test]
    fn test_empty_alternative_in_regexp_string() {
        let source = "const re = new RegExp('x|');\n";
        let result = run(source);
        assert_eq!(result.issues.len(), 1);
        let secondary = &result.issues[0].secondaries[0];
        // alternation "x|" maps back into the string literal at [23,25)
        assert_eq!(secondary.range.start, 23);
        assert_eq!(secondary.range.end, 25);
    }

    #[test]
    fn test_clean_patterns_pass() {
        assert!(run("/a|b/.test(s);\n").issues.is_empty());
        assert!(run("const re = new RegExp('a|b');\n").issues.is_empty());
    }
}
