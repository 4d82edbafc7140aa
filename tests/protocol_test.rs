//! Integration tests for the bridge boundary.

use lintbridge::analyze::RuleSelection;
use lintbridge::parser::LanguageVariant;
use lintbridge::protocol::{handle_json, handle_request, Request, Response};
use lintbridge::visit::FileType;

fn request(content: &str, rules: &[&str]) -> Request {
    Request {
        file_path: "src/app.js".to_string(),
        file_content: content.to_string(),
        file_type: FileType::Main,
        language_variant: LanguageVariant::JavaScript,
        rule_selection: rules
            .iter()
            .map(|k| RuleSelection {
                rule_key: k.to_string(),
                configuration: serde_json::Value::Null,
            })
            .collect(),
        compute_metrics: false,
        compute_highlights: false,
    }
}

#[test]
fn test_unparseable_content_yields_parse_error_not_crash() {
    let response = handle_request(&request("function ((( {", &["no-debugger"]));
    let parse_error = response.parse_error.expect("parseError should be set");
    assert!(!parse_error.message.is_empty());
    assert!(response.issues.is_empty());
    assert!(response.internal_error.is_none());
}

#[test]
fn test_wire_format_round_trip() {
    let json = serde_json::json!({
        "filePath": "a.js",
        "fileContent": "// TODO soon\ndebugger;\n",
        "fileType": "MAIN",
        "languageVariant": "javascript",
        "ruleSelection": [
            { "ruleKey": "no-todo-comment", "configuration": null },
            { "ruleKey": "no-debugger", "configuration": null }
        ],
        "computeMetrics": true
    })
    .to_string();

    let out = handle_json(&json);
    let response: Response = serde_json::from_str(&out).unwrap();
    assert_eq!(response.issues.len(), 2);
    assert!(response.metrics.is_some());
    assert!(response.parse_error.is_none());

    // camelCase field names on the wire
    assert!(out.contains("\"issues\""));
    assert!(!out.contains("\"parse_error\""));
}

#[test]
fn test_typescript_variant_on_the_wire() {
    let json = serde_json::json!({
        "filePath": "a.ts",
        "fileContent": "const n: number = 1;\ndebugger;\n",
        "fileType": "MAIN",
        "languageVariant": "typescript",
        "ruleSelection": [ { "ruleKey": "no-debugger" } ]
    })
    .to_string();
    let response: Response = serde_json::from_str(&handle_json(&json)).unwrap();
    assert_eq!(response.issues.len(), 1);
}

#[test]
fn test_test_files_relax_debugger_rule() {
    let mut req = request("debugger;\n", &["no-debugger"]);
    req.file_type = FileType::Test;
    let response = handle_request(&req);
    assert!(response.issues.is_empty());
}

#[test]
fn test_malformed_json_is_answered_in_band() {
    let out = handle_json("{\"filePath\": 42}");
    let response: Response = serde_json::from_str(&out).unwrap();
    assert!(response.internal_error.is_some());
    assert!(response.issues.is_empty());
}

#[test]
fn test_empty_file_analyzes_cleanly() {
    let response = handle_request(&request("", &["no-debugger", "no-todo-comment"]));
    assert!(response.parse_error.is_none());
    assert!(response.issues.is_empty());
}
