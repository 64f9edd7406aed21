// Call graph structures for FlowCraft.
// Represents which locally defined Python functions call which.

use std::collections::{HashMap, HashSet};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A node in the call graph.
#[derive(Debug, PartialEq)]
pub struct CallGraphNode {
    pub name: String,
    /// Callee names in call order, duplicates preserved.
    pub callees: Vec<String>,
}

/// The call graph itself: one node per function, in definition order.
#[derive(Debug, Default, PartialEq)]
pub struct CallGraph {
    pub nodes: Vec<CallGraphNode>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Insert a node for `name` at definition time.
    ///
    /// Names are flat, so a repeated definition keeps the existing entry and
    /// its position; both bodies' calls accumulate on the one node.
    pub fn insert_node(&mut self, name: &str) {
        if !self.nodes.iter().any(|n| n.name == name) {
            self.nodes.push(CallGraphNode {
                name: name.to_string(),
                callees: Vec::new(),
            });
        }
    }

    /// Append a callee to `caller`'s list. Callers are inserted up front by
    /// `insert_node`, so a miss is a no-op.
    pub fn record_call(&mut self, caller: &str, callee: &str) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.name == caller) {
            node.callees.push(callee.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<&CallGraphNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Serializes as an ordered JSON mapping, entries exactly in stored order.
impl Serialize for CallGraph {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for node in &self.nodes {
            map.serialize_entry(&node.name, &node.callees)?;
        }
        map.end()
    }
}

/// Insertion-ordered set of every function name defined in the file,
/// at any nesting depth.
#[derive(Debug, Default)]
pub struct DefinedFunctions {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl DefinedFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    /// First insertion wins the position; repeats are ignored.
    pub fn insert(&mut self, name: &str) {
        if self.seen.insert(name.to_string()) {
            self.names.push(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Restrict a raw call graph to the locally defined functions.
///
/// Keys become exactly the defined set in definition order (functions that
/// call nothing keep an empty list); callee lists drop every name that is
/// not itself defined in the file, preserving order and duplicates. The raw
/// graph is consumed.
pub fn filter_to_defined(raw: CallGraph, defined: &DefinedFunctions) -> CallGraph {
    let mut raw_lists: HashMap<String, Vec<String>> = raw
        .nodes
        .into_iter()
        .map(|node| (node.name, node.callees))
        .collect();

    let mut filtered = CallGraph::new();
    for name in defined.iter() {
        let callees = raw_lists
            .remove(name)
            .unwrap_or_default()
            .into_iter()
            .filter(|callee| defined.contains(callee.as_str()))
            .collect();
        filtered.nodes.push(CallGraphNode {
            name: name.to_string(),
            callees,
        });
    }
    filtered
}
