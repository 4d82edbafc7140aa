//! Reusable queries over the syntax tree.
//!
//! Rules share these tree-walking primitives instead of re-implementing
//! them. Queries are side-effect-free and answer "unknown" with `None`;
//! only a node id foreign to the tree is a fatal condition, surfaced as
//! [`AnalysisError::UnknownNode`] by the underlying tree accessors.

use crate::error::AnalysisError;
use crate::source::SourceBuffer;
use crate::tree::{NodeId, SyntaxTree};

/// Node kinds that introduce a binding scope.
const SCOPE_KINDS: &[&str] = &[
    "program",
    "function_declaration",
    "function_expression",
    "generator_function_declaration",
    "generator_function",
    "arrow_function",
    "method_definition",
];

/// How an identifier is bound relative to its use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Parameter of the nearest enclosing function.
    Parameter,
    /// Declared in the nearest enclosing scope.
    Local,
    /// Declared in an outer scope.
    Outer,
}

/// Parent of `node`, `None` at the root.
pub fn parent_of(tree: &SyntaxTree, node: NodeId) -> Result<Option<NodeId>, AnalysisError> {
    tree.parent(node)
}

/// Lazy walk of parent links from `node` (exclusive) to the root.
///
/// Fails up front when `node` is foreign to `tree`; parent links of
/// in-tree nodes stay in-tree, so the walk itself cannot fail.
pub fn ancestors_of<'a>(
    tree: &'a SyntaxTree,
    node: NodeId,
) -> Result<impl Iterator<Item = NodeId> + 'a, AnalysisError> {
    let mut current = tree.parent(node)?;
    Ok(std::iter::from_fn(move || {
        let id = current?;
        // id came from the parent table, the lookup cannot fail
        current = tree.parent(id).ok().flatten();
        Some(id)
    }))
}

/// Whether `node` sits inside a module export: an `export` statement, or
/// an assignment to `module.exports` / `exports.*`.
pub fn is_part_of_module_export(
    tree: &SyntaxTree,
    buffer: &SourceBuffer,
    node: NodeId,
) -> Result<bool, AnalysisError> {
    for ancestor in ancestors_of(tree, node)? {
        let data = tree.node(ancestor)?;
        match data.kind {
            "export_statement" => return Ok(true),
            "assignment_expression" => {
                if let Some(target) = tree.named_children(ancestor).next() {
                    let text = buffer.slice(tree.node(target)?.range);
                    if text == "module.exports"
                        || text.starts_with("module.exports.")
                        || text.starts_with("exports.")
                    {
                        return Ok(true);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(false)
}

/// Statically-known string value of a literal, or `None` when the node is
/// not a string/template or its value cannot be known without evaluation.
pub fn literal_string_value(
    tree: &SyntaxTree,
    buffer: &SourceBuffer,
    node: NodeId,
) -> Result<Option<String>, AnalysisError> {
    let data = tree.node(node)?;
    match data.kind {
        "string" | "template_string" => {
            let mut value = String::new();
            for child in tree.named_children(node) {
                let child_data = tree.node(child)?;
                match child_data.kind {
                    "string_fragment" => value.push_str(buffer.slice(child_data.range)),
                    "escape_sequence" => match unescape(buffer.slice(child_data.range)) {
                        Some(c) => value.push(c),
                        None => return Ok(None),
                    },
                    // a substitution means the value is not static
                    _ => return Ok(None),
                }
            }
            Ok(Some(value))
        }
        _ => Ok(None),
    }
}

/// Decode a single-character escape sequence. Unicode and hex escapes are
/// not needed for pattern mapping and yield `None`.
fn unescape(raw: &str) -> Option<char> {
    let mut chars = raw.chars();
    if chars.next() != Some('\\') {
        return None;
    }
    let escaped = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(match escaped {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    })
}

/// Whether `node` is a `/.../ ` regex literal.
pub fn is_regex_literal(tree: &SyntaxTree, node: NodeId) -> Result<bool, AnalysisError> {
    Ok(tree.node(node)?.kind == "regex")
}

/// The pattern body a regex engine would see for `literal`: the text
/// between the slashes of a regex literal, or the cooked value of a
/// string literal later compiled into a pattern.
pub fn pattern_text_of_literal(
    tree: &SyntaxTree,
    buffer: &SourceBuffer,
    literal: NodeId,
) -> Result<Option<String>, AnalysisError> {
    let data = tree.node(literal)?;
    match data.kind {
        "regex" => match tree.child_of_kind(literal, "regex_pattern") {
            Some(body) => Ok(Some(buffer.slice(tree.node(body)?.range).to_string())),
            None => Ok(None),
        },
        "string" => literal_string_value(tree, buffer, literal),
        _ => Ok(None),
    }
}

/// For a `RegExp(...)` / `new RegExp(...)` call, the string-literal first
/// argument if there is one.
pub fn regex_argument_literal(
    tree: &SyntaxTree,
    buffer: &SourceBuffer,
    call: NodeId,
) -> Result<Option<NodeId>, AnalysisError> {
    let data = tree.node(call)?;
    if data.kind != "call_expression" && data.kind != "new_expression" {
        return Ok(None);
    }
    let mut callee = None;
    let mut arguments = None;
    for child in tree.named_children(call) {
        match tree.node(child)?.kind {
            "identifier" => callee = callee.or(Some(child)),
            "arguments" => arguments = Some(child),
            _ => {}
        }
    }
    let Some(callee) = callee else { return Ok(None) };
    if buffer.slice(tree.node(callee)?.range) != "RegExp" {
        return Ok(None);
    }
    let Some(arguments) = arguments else { return Ok(None) };
    let first = tree.named_children(arguments).next();
    match first {
        Some(arg) if tree.node(arg)?.kind == "string" => Ok(Some(arg)),
        _ => Ok(None),
    }
}

/// Classify how an identifier is bound: parameter of the nearest
/// function, local of the nearest scope, or a binding from an outer
/// scope. `None` when no declaration is visible (globals, imports of
/// unresolved form).
pub fn classify_identifier(
    tree: &SyntaxTree,
    buffer: &SourceBuffer,
    identifier: NodeId,
) -> Result<Option<Binding>, AnalysisError> {
    let data = tree.node(identifier)?;
    if data.kind != "identifier" {
        return Ok(None);
    }
    let name = buffer.slice(data.range);

    let scopes: Vec<NodeId> = ancestors_of(tree, identifier)?
        .filter(|id| SCOPE_KINDS.contains(&tree.get(*id).kind))
        .collect();

    for (depth, &scope) in scopes.iter().enumerate() {
        if declares_parameter(tree, buffer, scope, name) {
            return Ok(Some(if depth == 0 {
                Binding::Parameter
            } else {
                Binding::Outer
            }));
        }
        if declares_local(tree, buffer, scope, name, identifier) {
            return Ok(Some(if depth == 0 {
                Binding::Local
            } else {
                Binding::Outer
            }));
        }
    }
    Ok(None)
}

fn declares_parameter(tree: &SyntaxTree, buffer: &SourceBuffer, scope: NodeId, name: &str) -> bool {
    let Some(params) = tree.child_of_kind(scope, "formal_parameters") else {
        // single-parameter arrow function: `x => ...`
        if tree.get(scope).kind == "arrow_function" {
            if let Some(first) = tree.named_children(scope).next() {
                let data = tree.get(first);
                return data.kind == "identifier" && buffer.slice(data.range) == name;
            }
        }
        return false;
    };
    subtree_nodes(tree, params, false).into_iter().any(|id| {
        let data = tree.get(id);
        data.kind == "identifier" && buffer.slice(data.range) == name
    })
}

fn declares_local(
    tree: &SyntaxTree,
    buffer: &SourceBuffer,
    scope: NodeId,
    name: &str,
    use_site: NodeId,
) -> bool {
    for id in subtree_nodes(tree, scope, true) {
        let data = tree.get(id);
        let declared = match data.kind {
            "variable_declarator" => tree.named_children(id).next(),
            "function_declaration" | "class_declaration" | "generator_function_declaration" => {
                tree.child_of_kind(id, "identifier")
            }
            _ => None,
        };
        if let Some(decl_name) = declared {
            let decl = tree.get(decl_name);
            if decl_name != use_site && decl.kind == "identifier" && buffer.slice(decl.range) == name
            {
                return true;
            }
        }
    }
    false
}

/// Nodes of `root`'s subtree. With `skip_nested_scopes`, child scopes are
/// not descended into (their own declarations are invisible outside).
fn subtree_nodes(tree: &SyntaxTree, root: NodeId, skip_nested_scopes: bool) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if skip_nested_scopes && id != root && SCOPE_KINDS.contains(&tree.get(id).kind) {
            // still record the declaration node itself (function name is
            // visible in the enclosing scope)
            out.push(id);
            continue;
        }
        out.push(id);
        stack.extend(tree.get(id).children.iter().rev().copied());
    }
    out
}
