// Infrastructure implementations for FlowCraft.

pub mod graphviz;
pub mod python_parser;

pub use graphviz::GraphvizRenderer;
pub use python_parser::TreeSitterAstParser;
