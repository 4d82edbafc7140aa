//! Limits the number of parameters a function accepts.

use serde::Deserialize;
use serde_json::Value;

use crate::tree::NodeId;
use crate::visit::{Rule, RuleContext};

pub const KEY: &str = "max-parameters";

const DEFAULT_MAXIMUM: usize = 7;

#[derive(Deserialize)]
struct Config {
    #[serde(default = "default_maximum")]
    maximum: usize,
}

fn default_maximum() -> usize {
    DEFAULT_MAXIMUM
}

pub fn build(config: &Value) -> Box<dyn Rule> {
    let maximum = Config::deserialize(config)
        .map(|c| c.maximum)
        .unwrap_or(DEFAULT_MAXIMUM);
    Box::new(MaxParameters { maximum })
}

struct MaxParameters {
    maximum: usize,
}

impl Rule for MaxParameters {
    fn key(&self) -> &'static str {
        KEY
    }

    fn node_kinds(&self) -> &'static [&'static str] {
        &[
            "function_declaration",
            "function_expression",
            "generator_function_declaration",
            "arrow_function",
            "method_definition",
        ]
    }

    fn on_node(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> anyhow::Result<()> {
        let Some(params) = ctx.tree.child_of_kind(node, "formal_parameters") else {
            return Ok(());
        };
        let count = ctx.tree.named_children(params).count();
        if count > self.maximum {
            let range = ctx.tree.node(params)?.range;
            let excess = count - self.maximum;
            ctx.report_full(
                format!(
                    "This function has {} parameters, which is more than the {} allowed.",
                    count, self.maximum
                ),
                range,
                Vec::new(),
                Some(excess as f64),
            );
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

    fn run(source: &str, config: Value) -> crate::issue::AnalysisResult {
        let buffer = SourceBuffer::new(source);
        let tree = parse(source, LanguageVariant::JavaScript).unwrap();
        let file = FileInfo {
            path: "test.js".to_string(),
            file_type: FileType::Main,
        };
        let selection = vec![RuleSelection {
            rule_key: KEY.to_string(),
            configuration: config,
        }];
        analyze(&tree, &buffer, &file, &selection, false, false).unwrap()
    }

    #[test]
    fn test_default_limit() {
        let ok = "function f(a, b, c) {}\n";
        assert!(run(ok, Value::Null).issues.is_empty());
    }

    #[test]
    fn test_configured_limit() {
        let source = "function f(a, b, c) {}\n";
        let result = run(source, serde_json::json!({ "maximum": 2 }));
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].cost, Some(1.0));
        assert!(result.issues[0].message.contains("3 parameters"));
    }
}
