//! Integration tests for the command-line boundary.

use tempfile::TempDir;

use lintbridge::cli::{run_analyze, AnalyzeArgs, EXIT_ERROR, EXIT_ISSUES, EXIT_SUCCESS};

fn args(paths: Vec<std::path::PathBuf>) -> AnalyzeArgs {
    AnalyzeArgs {
        paths,
        rules: Vec::new(),
        format: "json".to_string(),
        test_files: false,
        metrics: false,
    }
}

#[test]
fn test_clean_file_exits_zero() {
    let temp = TempDir::new().unwrap();
    let clean = temp.path().join("clean.js");
    std::fs::write(&clean, "const x = 1;\nexport default x;\n").unwrap();
    assert_eq!(run_analyze(&args(vec![clean])).unwrap(), EXIT_SUCCESS);
}

#[test]
fn test_findings_exit_nonzero() {
    let temp = TempDir::new().unwrap();
    let bad = temp.path().join("bad.js");
    std::fs::write(&bad, "// TODO: remove\ndebugger;\n").unwrap();
    let clean = temp.path().join("clean.js");
    std::fs::write(&clean, "const x = 1;\n").unwrap();
    assert_eq!(run_analyze(&args(vec![bad, clean])).unwrap(), EXIT_ISSUES);
}

#[test]
fn test_missing_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.js");
    assert_eq!(run_analyze(&args(vec![missing])).unwrap(), EXIT_ERROR);
}

#[test]
fn test_rule_filter_narrows_findings() {
    let temp = TempDir::new().unwrap();
    let bad = temp.path().join("bad.js");
    std::fs::write(&bad, "// TODO: remove\n").unwrap();
    let mut only_debugger = args(vec![bad]);
    only_debugger.rules = vec!["no-debugger".to_string()];
    assert_eq!(run_analyze(&only_debugger).unwrap(), EXIT_SUCCESS);
}
