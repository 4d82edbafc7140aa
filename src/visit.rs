//! The visitor dispatch engine.
//!
//! One pre-order traversal per analysis run. At every node the engine
//! invokes, in registration order, each rule registered for that node's
//! kind tag. Rules keep their per-run state in their own instance; the
//! context only carries the shared read-only inputs and the result sink,
//! so no rule can observe another's state.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::issue::{
    AnalysisResult, Diagnostic, Highlight, HighlightKind, Issue, Metrics, SecondaryLocation,
};
use crate::source::{SourceBuffer, SourceRange};
use crate::tree::{NodeId, SyntaxTree};

/// Registering for this pseudo-kind delivers every node of the traversal.
pub const ANY_NODE: &str = "*";

/// Whether the file under analysis is production or test code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    Main,
    Test,
}

/// Per-request file metadata available to every rule.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: String,
    pub file_type: FileType,
}

/// Engine phases. Handlers may read the tree and report findings only
/// while `Traversing`; `Finalizing` runs each rule's end-of-file hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Traversing,
    Finalizing,
    Done,
}

impl Phase {
    /// Step to the next phase; transitions are linear and one-way.
    fn advance(&mut self) {
        *self = match self {
            Phase::Idle => Phase::Traversing,
            Phase::Traversing => Phase::Finalizing,
            Phase::Finalizing => Phase::Done,
            Phase::Done => unreachable!("engine already finished"),
        };
    }
}

/// A single detection rule.
///
/// A rule instance lives for exactly one analysis run; mutable fields on
/// the implementing type are its per-run state.
pub trait Rule {
    /// Stable rule identifier, used to tag issues and diagnostics.
    fn key(&self) -> &'static str;

    /// Node kinds this rule wants to observe ([`ANY_NODE`] for all).
    fn node_kinds(&self) -> &'static [&'static str];

    /// Called for every matching node, in source order.
    fn on_node(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> anyhow::Result<()>;

    /// Called once after the traversal, for whole-file aggregate checks.
    fn on_end(&mut self, _ctx: &mut RuleContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Shared context handed to rule handlers.
pub struct RuleContext<'a> {
    pub tree: &'a SyntaxTree,
    pub buffer: &'a SourceBuffer,
    pub file: &'a FileInfo,
    rule_key: &'static str,
    phase: Phase,
    out: &'a mut AnalysisResult,
}

impl<'a> RuleContext<'a> {
    /// Report an issue at `range`.
    pub fn report(&mut self, message: impl Into<String>, range: SourceRange) {
        self.report_full(message, range, Vec::new(), None);
    }

    /// Report an issue with secondary locations and an optional cost.
    pub fn report_full(
        &mut self,
        message: impl Into<String>,
        range: SourceRange,
        secondaries: Vec<SecondaryLocation>,
        cost: Option<f64>,
    ) {
        debug_assert!(
            matches!(self.phase, Phase::Traversing | Phase::Finalizing),
            "issues may only be reported during traversal"
        );
        self.out.issues.push(Issue {
            rule: self.rule_key.to_string(),
            message: message.into(),
            range,
            secondaries,
            cost,
        });
    }

    /// Record a highlighted token (built-in highlighting collector).
    pub fn add_highlight(&mut self, range: SourceRange, kind: HighlightKind) {
        self.out.highlights.push(Highlight { range, kind });
    }

    /// Publish the file's metrics (built-in metrics collector).
    pub fn set_metrics(&mut self, metrics: Metrics) {
        self.out.metrics = Some(metrics);
    }

    /// Text of a node, convenience over buffer + tree.
    pub fn text_of(&self, node: NodeId) -> Result<&'a str, AnalysisError> {
        Ok(self.buffer.slice(self.tree.node(node)?.range))
    }
}

struct ActiveRule {
    rule: Box<dyn Rule>,
    faulted: bool,
}

/// Runs one set of rules over one syntax tree.
pub struct Engine<'a> {
    tree: &'a SyntaxTree,
    buffer: &'a SourceBuffer,
    file: &'a FileInfo,
}

impl<'a> Engine<'a> {
    pub fn new(tree: &'a SyntaxTree, buffer: &'a SourceBuffer, file: &'a FileInfo) -> Self {
        Self { tree, buffer, file }
    }

    /// Drive the traversal to completion.
    ///
    /// A handler fault (error or panic) records one diagnostic naming the
    /// rule and disables that rule for the rest of the run; every other
    /// rule continues. An `UnknownNode` escaping a handler is a broken
    /// invariant and aborts the whole call.
    pub fn run(&self, rules: Vec<Box<dyn Rule>>) -> Result<AnalysisResult, AnalysisError> {
        let mut active: Vec<ActiveRule> = rules
            .into_iter()
            .map(|rule| ActiveRule { rule, faulted: false })
            .collect();

        // kind tag -> rule indexes, resolved once at registration
        let mut by_kind: HashMap<&'static str, Vec<usize>> = HashMap::new();
        let mut wildcard: Vec<usize> = Vec::new();
        for (index, entry) in active.iter().enumerate() {
            for &kind in entry.rule.node_kinds() {
                if kind == ANY_NODE {
                    wildcard.push(index);
                } else {
                    by_kind.entry(kind).or_default().push(index);
                }
            }
        }

        let mut out = AnalysisResult::default();
        let mut phase = Phase::Idle;
        phase.advance();

        for node in self.tree.preorder() {
            let kind = self.tree.node(node)?.kind;
            let specific = by_kind.get(kind).map(Vec::as_slice).unwrap_or(&[]);
            // merge wildcard and kind-specific lists in registration order
            for index in merge_ordered(&wildcard, specific) {
                if active[index].faulted {
                    continue;
                }
                self.dispatch(&mut active[index], phase, &mut out, |rule, ctx| {
                    rule.on_node(ctx, node)
                })?;
            }
        }

        phase.advance();
        for entry in active.iter_mut() {
            if entry.faulted {
                continue;
            }
            self.dispatch(entry, phase, &mut out, |rule, ctx| rule.on_end(ctx))?;
        }

        phase.advance();
        debug_assert_eq!(phase, Phase::Done);
        Ok(out)
    }

    /// Invoke one handler with fault isolation.
    fn dispatch(
        &self,
        entry: &mut ActiveRule,
        phase: Phase,
        out: &mut AnalysisResult,
        call: impl FnOnce(&mut dyn Rule, &mut RuleContext<'_>) -> anyhow::Result<()>,
    ) -> Result<(), AnalysisError> {
        let key = entry.rule.key();
        let mut ctx = RuleContext {
            tree: self.tree,
            buffer: self.buffer,
            file: self.file,
            rule_key: key,
            phase,
            out: &mut *out,
        };
        let outcome = catch_unwind(AssertUnwindSafe(|| call(entry.rule.as_mut(), &mut ctx)));
        let message = match outcome {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(err)) => {
                // a foreign node id is a broken engine invariant, not a rule bug
                if let Some(AnalysisError::UnknownNode(id)) = err.downcast_ref::<AnalysisError>() {
                    return Err(AnalysisError::UnknownNode(*id));
                }
                format!("{:#}", err)
            }
            Err(panic) => panic_message(panic),
        };
        entry.faulted = true;
        out.diagnostics.push(Diagnostic {
            rule: key.to_string(),
            message: format!("rule execution failed: {}", message),
        });
        Ok(())
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// Merge two ascending index lists, preserving registration order.
fn merge_ordered(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] <= b[j] {
            merged.push(a[i]);
            i += 1;
        } else {
            merged.push(b[j]);
            j += 1;
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    merged
}
