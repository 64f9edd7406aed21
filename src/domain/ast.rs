// AST data structures for FlowCraft.
// These types represent parsed Python code in a form suitable for static analysis.

/// A node in the simplified Python syntax tree.
///
/// Only the shapes the call-graph analysis distinguishes get their own
/// variant. Every other construct (classes, statements, literals,
/// comprehensions, f-strings) lowers into [`PyNode::Block`] so traversal
/// still reaches calls nested anywhere inside it.
#[derive(Debug, PartialEq)]
pub enum PyNode {
    /// `def name(...)` or `async def name(...)`. Parameters, decorators and
    /// the body are flattened into `children` in source order.
    FunctionDef { name: String, children: Vec<PyNode> },
    /// `lambda ...: body`. The body belongs to the enclosing named function.
    Lambda { params: Vec<PyNode>, body: Box<PyNode> },
    /// A call expression. `args` holds positional arguments in source order,
    /// `keywords` holds the values of keyword arguments.
    Call {
        func: Box<PyNode>,
        args: Vec<PyNode>,
        keywords: Vec<PyNode>,
    },
    /// Attribute access such as `obj.attr`.
    Attribute { object: Box<PyNode>, attr: String },
    /// A bare identifier.
    Name(String),
    /// Any other construct, kept only for its children.
    Block(Vec<PyNode>),
}

impl PyNode {
    /// Resolve the name a call expression targets.
    ///
    /// Bare names resolve to themselves, attribute accesses to their final
    /// segment (`a.b.c()` resolves to `c`; the receiver is discarded).
    /// Computed targets such as `handlers[0]()` stay unresolved.
    pub fn call_target(&self) -> Option<&str> {
        match self {
            PyNode::Name(name) => Some(name),
            PyNode::Attribute { attr, .. } => Some(attr),
            _ => None,
        }
    }

    /// Visit every direct child node once, in source order.
    pub fn for_each_child<'a>(&'a self, mut f: impl FnMut(&'a PyNode)) {
        match self {
            PyNode::FunctionDef { children, .. } => children.iter().for_each(&mut f),
            PyNode::Lambda { params, body } => {
                params.iter().for_each(&mut f);
                f(body);
            }
            PyNode::Call {
                func,
                args,
                keywords,
            } => {
                f(func);
                args.iter().for_each(&mut f);
                keywords.iter().for_each(&mut f);
            }
            PyNode::Attribute { object, .. } => f(object),
            PyNode::Name(_) => {}
            PyNode::Block(children) => children.iter().for_each(&mut f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_target_bare_name() {
        let node = PyNode::Name("helper".to_string());
        assert_eq!(node.call_target(), Some("helper"));
    }

    #[test]
    fn test_call_target_attribute_uses_final_segment() {
        let node = PyNode::Attribute {
            object: Box::new(PyNode::Attribute {
                object: Box::new(PyNode::Name("a".to_string())),
                attr: "b".to_string(),
            }),
            attr: "c".to_string(),
        };
        assert_eq!(node.call_target(), Some("c"));
    }

    #[test]
    fn test_call_target_computed_is_unresolved() {
        let node = PyNode::Block(vec![]);
        assert_eq!(node.call_target(), None);
    }
}
