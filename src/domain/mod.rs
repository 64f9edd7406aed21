// Domain layer: the Python AST model, the call graph, and the analysis
// passes that connect them. No I/O here.

pub mod ast;
pub mod builder;
pub mod callgraph;
pub mod patterns;
