//! Lintbridge - static analysis bridge for JavaScript and TypeScript.
//!
//! The bridge receives source files from an orchestrator, parses each one
//! into a syntax tree, runs a set of independently authored rules over a
//! single pre-order traversal, and answers with structured findings:
//! issues with exact source ranges, file metrics, and syntax highlighting.
//!
//! # Architecture
//!
//! - `source`: the immutable file buffer, line table, and absolute ranges
//! - `tree`: the owned syntax-tree arena with its parent table
//! - `parser`: tree-sitter front end producing the arena
//! - `pattern`: parsed regular-expression patterns (pattern-relative spans)
//! - `location`: the text-offset resolver mapping pattern spans to file ranges
//! - `ast`: shared tree queries rules build on
//! - `visit`: the single-traversal dispatch engine with per-rule isolation
//! - `rules`: the rule registry and built-in rules/collectors
//! - `analyze`: selection to frozen result
//! - `protocol`: the orchestrator request/response contract
//! - `cli` / `report`: thin command-line boundary
//!
//! # Adding a Rule
//!
//! Implement [`visit::Rule`], declare the node kinds it observes, and
//! register a [`rules::RuleDefinition`] in `rules/mod.rs`.

pub mod analyze;
pub mod ast;
pub mod cli;
pub mod error;
pub mod issue;
pub mod location;
pub mod parser;
pub mod pattern;
pub mod protocol;
pub mod report;
pub mod rules;
pub mod source;
pub mod tree;
pub mod visit;

pub use analyze::{analyze, RuleSelection};
pub use error::AnalysisError;
pub use issue::{AnalysisResult, Diagnostic, Issue, SecondaryLocation};
pub use location::regexp_range;
pub use parser::{parse, LanguageVariant};
pub use pattern::{parse_pattern, PatternKind, PatternNode};
pub use protocol::{handle_request, Request, Response};
pub use source::{SourceBuffer, SourceRange};
pub use tree::{NodeId, SyntaxNode, SyntaxTree};
pub use visit::{FileInfo, FileType, Rule, RuleContext};
