//! Entry point of the analysis core: rule selection to frozen result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AnalysisError;
use crate::issue::AnalysisResult;
use crate::rules;
use crate::source::SourceBuffer;
use crate::tree::SyntaxTree;
use crate::visit::{Engine, FileInfo, Rule};

/// One entry of the request's ordered rule selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSelection {
    pub rule_key: String,
    #[serde(default)]
    pub configuration: Value,
}

/// Run the selected rules over one parsed file.
///
/// Rules are instantiated fresh, in selection order; unknown keys are
/// skipped (selection is the orchestrator's concern). The metrics and
/// highlighting collectors, when requested, join the same traversal
/// after user rules. Each call produces an independent result and never
/// touches a previously returned one.
pub fn analyze(
    tree: &SyntaxTree,
    buffer: &SourceBuffer,
    file: &FileInfo,
    selection: &[RuleSelection],
    compute_metrics: bool,
    compute_highlights: bool,
) -> Result<AnalysisResult, AnalysisError> {
    let mut active: Vec<Box<dyn Rule>> = Vec::with_capacity(selection.len() + 2);
    for entry in selection {
        if let Some(definition) = rules::definition(&entry.rule_key) {
            active.push((definition.build)(&entry.configuration));
        }
    }
    if compute_metrics {
        active.push(rules::metrics::build(&Value::Null));
    }
    if compute_highlights {
        active.push(rules::highlight::build(&Value::Null));
    }

    Engine::new(tree, buffer, file).run(active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, LanguageVariant};
    use crate::visit::FileType;

    fn file_info() -> FileInfo {
        FileInfo {
            path: "test.js".to_string(),
            file_type: FileType::Main,
        }
    }

    #[test]
    fn test_unknown_rule_key_is_skipped() {
        let source = "debugger;\n";
        let buffer = SourceBuffer::new(source);
        let tree = parse(source, LanguageVariant::JavaScript).unwrap();
        let selection = vec![
            RuleSelection {
                rule_key: "does-not-exist".to_string(),
                configuration: Value::Null,
            },
            RuleSelection {
                rule_key: "no-debugger".to_string(),
                configuration: Value::Null,
            },
        ];
        let result = analyze(&tree, &buffer, &file_info(), &selection, false, false).unwrap();
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].rule, "no-debugger");
    }

    #[test]
    fn test_each_call_yields_fresh_result() {
        let source = "// TODO later\n";
        let buffer = SourceBuffer::new(source);
        let tree = parse(source, LanguageVariant::JavaScript).unwrap();
        let selection = vec![RuleSelection {
            rule_key: "no-todo-comment".to_string(),
            configuration: Value::Null,
        }];
        let first = analyze(&tree, &buffer, &file_info(), &selection, false, false).unwrap();
        let second = analyze(&tree, &buffer, &file_info(), &selection, false, false).unwrap();
        assert_eq!(first.issues, second.issues);
        assert_eq!(first.issues.len(), 1);
    }
}
