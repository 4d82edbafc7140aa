//! Output formatting for the command-line front end.
//!
//! The orchestrator consumes raw JSON responses; the pretty format here
//! exists for running the bridge by hand against local files.

use colored::*;
use std::io::Write;

use crate::protocol::Response;
use crate::source::SourceBuffer;

/// Write one file's response in human-readable form.
pub fn write_pretty(
    w: &mut dyn Write,
    path: &str,
    content: &str,
    response: &Response,
) -> std::io::Result<()> {
    let buffer = SourceBuffer::new(content);

    if let Some(parse_error) = &response.parse_error {
        let (line, col) = buffer.position_at(parse_error.range.start);
        writeln!(
            w,
            "{} {}:{}:{} {}",
            "parse error".red().bold(),
            path,
            line,
            col,
            parse_error.message
        )?;
        return Ok(());
    }
    if let Some(internal) = &response.internal_error {
        writeln!(w, "{} {}: {}", "internal error".red().bold(), path, internal)?;
        return Ok(());
    }

    for issue in &response.issues {
        let (line, col) = buffer.position_at(issue.range.start);
        writeln!(
            w,
            "{}:{}:{} {} {} [{}]",
            path,
            line,
            col,
            "issue".yellow(),
            issue.message,
            issue.rule.dimmed()
        )?;
        for secondary in &issue.secondaries {
            let (sline, scol) = buffer.position_at(secondary.range.start);
            writeln!(
                w,
                "    {}:{}:{} {}",
                path,
                sline,
                scol,
                secondary
                    .message
                    .as_deref()
                    .unwrap_or("related location")
                    .dimmed()
            )?;
        }
    }

    for diagnostic in &response.diagnostics {
        writeln!(
            w,
            "{} {}: {}",
            "rule degraded".magenta(),
            diagnostic.rule,
            diagnostic.message
        )?;
    }

    if let Some(metrics) = &response.metrics {
        writeln!(
            w,
            "{} ncloc={} comments={} statements={} functions={} complexity={}",
            "metrics".cyan(),
            metrics.ncloc,
            metrics.comment_lines,
            metrics.statements,
            metrics.functions,
            metrics.complexity
        )?;
    }

    Ok(())
}

/// Write one file's response as a JSON line.
pub fn write_json(w: &mut dyn Write, response: &Response) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *w, response)?;
    writeln!(w)?;
    Ok(())
}
