//! Graphviz rendering backend.
//!
//! Invokes the external `dot` executable to turn DOT text into PNG and SVG
//! images. Rendering is best-effort: the caller decides how to surface a
//! missing or failing `dot`, and the JSON/DOT artifacts never depend on it.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

use crate::ports::{GraphRenderer, ImageFormat};

pub struct GraphvizRenderer;

impl GraphRenderer for GraphvizRenderer {
    /// Probe for a runnable `dot` by asking for its version.
    fn check_available(&self) -> Result<()> {
        let check = Command::new("dot").arg("-V").output();
        match check {
            Ok(output) if output.status.success() => {
                // `dot -V` reports its version on stderr.
                let version = String::from_utf8_lossy(&output.stderr);
                println!("[Graphviz] Using {}", version.trim());
                Ok(())
            }
            Ok(output) => {
                bail!("'dot' found but returned error: {:?}", output.status.code());
            }
            Err(_) => {
                bail!("'dot' command not found (Graphviz). Install Graphviz: https://graphviz.org/download/");
            }
        }
    }

    /// Run `dot -T{fmt} -o {output}` with the DOT text on stdin.
    fn render(&self, dot_source: &str, format: ImageFormat, output: &Path) -> Result<()> {
        let spec = build_render_command(format, output);
        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to launch '{}'", spec.program))?;

        child
            .stdin
            .take()
            .context("Failed to open stdin for 'dot'")?
            .write_all(dot_source.as_bytes())
            .context("Failed to stream DOT text to 'dot'")?;

        let result = child.wait_with_output().context("Failed to wait for 'dot'")?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            bail!(
                "'dot' exited with {:?}: {}",
                result.status.code(),
                stderr.trim()
            );
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Testable Command Builder (for unit tests)
// ═══════════════════════════════════════════════════════════════════════════

/// Describes the `dot` invocation for one output format.
/// This is primarily for testing without Graphviz installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

/// Build the command specification for one output format (testable function).
pub fn build_render_command(format: ImageFormat, output: &Path) -> RenderCommandSpec {
    let type_flag = match format {
        ImageFormat::Png => "-Tpng",
        ImageFormat::Svg => "-Tsvg",
    };
    RenderCommandSpec {
        program: "dot".to_string(),
        args: vec![
            type_flag.to_string(),
            "-o".to_string(),
            output.display().to_string(),
        ],
    }
}
