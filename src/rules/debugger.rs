//! Flags `debugger` statements left in code.

use serde_json::Value;

use crate::tree::NodeId;
use crate::visit::{FileType, Rule, RuleContext};

pub const KEY: &str = "no-debugger";

pub fn build(_config: &Value) -> Box<dyn Rule> {
    Box::new(NoDebugger)
}

struct NoDebugger;

impl Rule for NoDebugger {
    fn key(&self) -> &'static str {
        KEY
    }

    fn node_kinds(&self) -> &'static [&'static str] {
        &["debugger_statement"]
    }

    fn on_node(&mut self, ctx: &mut RuleContext<'_>, node: NodeId) -> anyhow::Result<()> {
        // debugging aids are tolerated in test files
        if ctx.file.file_type == FileType::Test {
            return Ok(());
        }
        let range = ctx.tree.node(node)?.range;
        ctx.report("Remove this debugger statement.", range);
        Ok(())
    }
}
