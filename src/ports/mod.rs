use std::path::Path;

use anyhow::Result;

use crate::domain::ast::PyNode;

pub mod flowchart_exporter;

/// Parses Python source text into the domain AST.
pub trait AstParser {
    fn parse(&self, source: &str) -> Result<PyNode>;
}

/// Image formats the rendering backend produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Renders DOT text into an image file at `output`.
pub trait GraphRenderer {
    /// Verify the rendering backend can run, with an actionable error if not.
    fn check_available(&self) -> Result<()>;
    fn render(&self, dot_source: &str, format: ImageFormat, output: &Path) -> Result<()>;
}
