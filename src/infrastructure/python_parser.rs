//! Python parser backed by tree-sitter.
//!
//! Parses source text with the tree-sitter Python grammar and lowers the
//! provider tree into the crate's own [`PyNode`] shape. No tree-sitter
//! types leak past this module.
//!
//! tree-sitter is error-tolerant, so a "successful" parse can still contain
//! error nodes; those trees are rejected here with the first error position,
//! since a half-parsed file would silently produce a misleading graph.
//! Pathologically nested sources are rejected up front too, which keeps the
//! recursive lowering (and every walk over the lowered tree) stack-safe.

use anyhow::{bail, Context, Result};
use tree_sitter::{Node, Parser};

use crate::domain::ast::PyNode;
use crate::ports::AstParser;

/// Sources whose syntax tree nests deeper than this are rejected at parse
/// time; the recursive lowering would otherwise run out of stack.
const MAX_TREE_DEPTH: usize = 500;

pub struct TreeSitterAstParser;

impl AstParser for TreeSitterAstParser {
    fn parse(&self, source: &str) -> Result<PyNode> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .context("Failed to load the Python grammar")?;

        let tree = parser
            .parse(source, None)
            .context("Python parser produced no tree")?;

        let root = tree.root_node();
        if tree_depth(root) > MAX_TREE_DEPTH {
            bail!("Python source nests deeper than {} levels", MAX_TREE_DEPTH);
        }
        if root.has_error() {
            let position = first_error(root)
                .map(|node| node.start_position())
                .unwrap_or_else(|| root.start_position());
            bail!(
                "Python syntax error at line {}, column {}",
                position.row + 1,
                position.column + 1
            );
        }

        Ok(lower(root, source.as_bytes()))
    }
}

/// Deepest node level in the provider tree, measured with a cursor walk so
/// the measurement itself never recurses.
fn tree_depth(root: Node) -> usize {
    let mut cursor = root.walk();
    let mut depth = 0;
    let mut deepest = 0;
    loop {
        if cursor.goto_first_child() {
            depth += 1;
            deepest = deepest.max(depth);
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return deepest;
            }
            depth -= 1;
        }
    }
}

/// Locate the first error or missing node, in document order.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
// Lowering: tree-sitter nodes → PyNode
// ═══════════════════════════════════════════════════════════════════════════

fn lower(node: Node, src: &[u8]) -> PyNode {
    match node.kind() {
        "function_definition" => lower_function(node, Vec::new(), src),
        "decorated_definition" => lower_decorated(node, src),
        "call" => lower_call(node, src),
        "attribute" => lower_attribute(node, src),
        "identifier" => PyNode::Name(node_text(node, src)),
        "lambda" => lower_lambda(node, src),
        // Parentheses are transparent: `(handler)` is the same expression
        // as `handler`.
        "parenthesized_expression" => lower_parenthesized(node, src),
        _ => PyNode::Block(lower_children(node, src)),
    }
}

fn lower_children(node: Node, src: &[u8]) -> Vec<PyNode> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .map(|child| lower(child, src))
        .collect()
}

/// `def` and `async def` both arrive here. Parameters, return annotation
/// and body become children in source order; `decorators` (from a wrapping
/// decorated_definition) go first, so their calls attribute to this
/// function.
fn lower_function(node: Node, decorators: Vec<PyNode>, src: &[u8]) -> PyNode {
    let name_node = node.child_by_field_name("name");
    let name = name_node.map(|n| node_text(n, src)).unwrap_or_default();

    let mut children = decorators;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if name_node.is_some_and(|n| n.id() == child.id()) {
            continue;
        }
        children.push(lower(child, src));
    }
    PyNode::FunctionDef { name, children }
}

fn lower_decorated(node: Node, src: &[u8]) -> PyNode {
    let mut decorators = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "decorator" {
            decorators.extend(lower_children(child, src));
        }
    }

    match node.child_by_field_name("definition") {
        Some(def) if def.kind() == "function_definition" => lower_function(def, decorators, src),
        Some(def) => {
            // Decorated class: decorators and the class contents share one block.
            decorators.extend(lower_children(def, src));
            PyNode::Block(decorators)
        }
        None => PyNode::Block(decorators),
    }
}

fn lower_call(node: Node, src: &[u8]) -> PyNode {
    let func = node
        .child_by_field_name("function")
        .map(|f| lower(f, src))
        .unwrap_or_else(|| PyNode::Block(Vec::new()));

    let mut args = Vec::new();
    let mut keywords = Vec::new();
    if let Some(arguments) = node.child_by_field_name("arguments") {
        if arguments.kind() == "argument_list" {
            let mut cursor = arguments.walk();
            for child in arguments.named_children(&mut cursor) {
                match child.kind() {
                    "keyword_argument" => {
                        if let Some(value) = child.child_by_field_name("value") {
                            keywords.push(lower(value, src));
                        }
                    }
                    "dictionary_splat" => keywords.push(lower(child, src)),
                    "comment" => {}
                    _ => args.push(lower(child, src)),
                }
            }
        } else {
            // Generator argument: `f(x for x in xs)`.
            args.push(lower(arguments, src));
        }
    }

    PyNode::Call {
        func: Box::new(func),
        args,
        keywords,
    }
}

fn lower_attribute(node: Node, src: &[u8]) -> PyNode {
    let object = node
        .child_by_field_name("object")
        .map(|o| lower(o, src))
        .unwrap_or_else(|| PyNode::Block(Vec::new()));
    match node.child_by_field_name("attribute") {
        Some(attr) => PyNode::Attribute {
            object: Box::new(object),
            attr: node_text(attr, src),
        },
        None => object,
    }
}

fn lower_lambda(node: Node, src: &[u8]) -> PyNode {
    let params = node
        .child_by_field_name("parameters")
        .map(|p| lower_children(p, src))
        .unwrap_or_default();
    let body = node
        .child_by_field_name("body")
        .map(|b| lower(b, src))
        .unwrap_or_else(|| PyNode::Block(Vec::new()));
    PyNode::Lambda {
        params,
        body: Box::new(body),
    }
}

fn lower_parenthesized(node: Node, src: &[u8]) -> PyNode {
    let mut cursor = node.walk();
    let inner = node
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");
    match inner {
        Some(expr) => lower(expr, src),
        None => PyNode::Block(Vec::new()),
    }
}

fn node_text(node: Node, src: &[u8]) -> String {
    node.utf8_text(src).unwrap_or_default().to_string()
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
