//! Command-line interface for the analysis bridge.

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::analyze::RuleSelection;
use crate::parser::LanguageVariant;
use crate::protocol::{self, Request};
use crate::report;
use crate::rules;
use crate::visit::FileType;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ISSUES: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Static analysis bridge for JavaScript and TypeScript.
///
/// Parses each file into a syntax tree, runs the selected rules over one
/// traversal, and reports issues with exact source ranges. Intended to be
/// driven by an orchestrator over the `serve` protocol; the `analyze`
/// command runs the same pipeline against local files.
#[derive(Parser)]
#[command(name = "lintbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze local files and print findings
    Analyze(AnalyzeArgs),
    /// Read JSON requests from stdin, one per line, and answer on stdout
    Serve,
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Files to analyze
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Comma-separated rule keys (default: all registered rules)
    #[arg(short, long, value_delimiter = ',')]
    pub rules: Vec<String>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Treat the files as test code
    #[arg(long)]
    pub test_files: bool,

    /// Also compute file metrics
    #[arg(long)]
    pub metrics: bool,
}

/// Run the analyze command. Returns the process exit code.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    let keys: Vec<String> = if args.rules.is_empty() {
        rules::all_keys().iter().map(|k| k.to_string()).collect()
    } else {
        args.rules.clone()
    };
    let selection: Vec<RuleSelection> = keys
        .into_iter()
        .map(|rule_key| RuleSelection {
            rule_key,
            configuration: serde_json::Value::Null,
        })
        .collect();

    // files are independent; order of the collected output stays stable
    let outputs: Vec<anyhow::Result<(String, String, protocol::Response)>> = args
        .paths
        .par_iter()
        .map(|path| {
            let content = std::fs::read_to_string(path)?;
            let request = Request {
                file_path: path.display().to_string(),
                file_content: content.clone(),
                file_type: if args.test_files {
                    FileType::Test
                } else {
                    FileType::Main
                },
                language_variant: variant_for(path),
                rule_selection: selection.clone(),
                compute_metrics: args.metrics,
                compute_highlights: false,
            };
            Ok((
                path.display().to_string(),
                content,
                protocol::handle_request(&request),
            ))
        })
        .collect();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut worst = EXIT_SUCCESS;
    for outcome in outputs {
        let (path, content, response) = match outcome {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Error: {}", e);
                worst = EXIT_ERROR;
                continue;
            }
        };
        match args.format.as_str() {
            "json" => report::write_json(&mut out, &response)?,
            _ => report::write_pretty(&mut out, &path, &content, &response)?,
        }
        if response.internal_error.is_some() {
            worst = worst.max(EXIT_ERROR);
        } else if !response.issues.is_empty() || response.parse_error.is_some() {
            worst = worst.max(EXIT_ISSUES);
        }
    }
    Ok(worst)
}

/// Run the serve loop until stdin closes.
pub fn run_serve() -> anyhow::Result<i32> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(out, "{}", protocol::handle_json(&line))?;
        out.flush()?;
    }
    Ok(EXIT_SUCCESS)
}

fn variant_for(path: &Path) -> LanguageVariant {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ts") | Some("tsx") => LanguageVariant::TypeScript,
        _ => LanguageVariant::JavaScript,
    }
}
