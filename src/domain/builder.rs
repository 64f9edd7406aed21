//! Definition collection and call-graph construction.
//!
//! Two passes over the domain AST. The first gathers every
//! function-definition name at any depth. The second is a single-dispatch
//! walk that records calls against the innermost enclosing named function,
//! carrying its state (scope stack plus accumulating graph) as an explicit
//! value and handing the finished graph back.

use crate::domain::ast::PyNode;
use crate::domain::callgraph::{CallGraph, DefinedFunctions};
use crate::domain::patterns::RegistrationPattern;

/// Collect the names of all function definitions, at any nesting depth.
/// Methods and nested functions count; the namespace is flat.
pub fn collect_defined_functions(root: &PyNode) -> DefinedFunctions {
    let mut defined = DefinedFunctions::new();
    collect_into(root, &mut defined);
    defined
}

fn collect_into(node: &PyNode, defined: &mut DefinedFunctions) {
    if let PyNode::FunctionDef { name, .. } = node {
        defined.insert(name);
    }
    node.for_each_child(|child| collect_into(child, defined));
}

/// Build the raw call graph for a parsed file.
///
/// Calls at module level (empty scope stack) are ignored; lambda bodies
/// attribute to the enclosing named function. Callee lists keep duplicates
/// in traversal order.
pub fn build_call_graph(root: &PyNode, patterns: &[RegistrationPattern]) -> CallGraph {
    let mut builder = GraphBuilder {
        patterns,
        scope_stack: Vec::new(),
        graph: CallGraph::new(),
    };
    builder.walk(root);
    builder.graph
}

struct GraphBuilder<'a> {
    patterns: &'a [RegistrationPattern],
    scope_stack: Vec<String>,
    graph: CallGraph,
}

impl GraphBuilder<'_> {
    fn walk(&mut self, node: &PyNode) {
        match node {
            PyNode::FunctionDef { name, children } => {
                self.graph.insert_node(name);
                self.scope_stack.push(name.clone());
                for child in children {
                    self.walk(child);
                }
                self.scope_stack.pop();
            }
            // Lambdas are anonymous: no scope frame, the body's calls land
            // on the enclosing named function.
            PyNode::Lambda { params, body } => {
                for param in params {
                    self.walk(param);
                }
                self.walk(body);
            }
            PyNode::Call {
                func,
                args,
                keywords,
            } => self.visit_call(func, args, keywords),
            PyNode::Attribute { object, .. } => self.walk(object),
            PyNode::Name(_) => {}
            PyNode::Block(children) => {
                for child in children {
                    self.walk(child);
                }
            }
        }
    }

    fn visit_call(&mut self, func: &PyNode, args: &[PyNode], keywords: &[PyNode]) {
        if let Some(callee) = func.call_target() {
            if let Some(caller) = self.scope_stack.last() {
                self.graph.record_call(caller, callee);

                // Registration patterns: `workflow.add_node("x", handler)`
                // passes `handler` as data; surface it as a callee too. The
                // positional argument at the pattern's index must exist.
                for pattern in self.patterns {
                    if pattern.matches(callee) {
                        if let Some(registered) = args
                            .get(pattern.arg_index)
                            .and_then(|arg| pattern.rule.extract(arg))
                        {
                            self.graph.record_call(caller, registered);
                        }
                    }
                }
            }
        }

        // Nested calls inside the target expression and the arguments
        // still count.
        self.walk(func);
        for arg in args {
            self.walk(arg);
        }
        for value in keywords {
            self.walk(value);
        }
    }
}
