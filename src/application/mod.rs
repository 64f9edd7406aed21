//! Application layer: one analysis run from source file to artifacts.
//!
//! The use case owns the pipeline order: read, parse, collect definitions,
//! build and filter the graph, write JSON and DOT, then render images
//! best-effort. Parsing happens before any file is written, so a fatal
//! error leaves no partial outputs behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;

use crate::domain::builder::{build_call_graph, collect_defined_functions};
use crate::domain::callgraph::filter_to_defined;
use crate::domain::patterns::RegistrationPattern;
use crate::ports::flowchart_exporter::FlowchartExporter;
use crate::ports::{AstParser, GraphRenderer, ImageFormat};

/// Knobs for one analysis run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    /// Skip invoking the renderer entirely.
    pub no_images: bool,
    /// Echo the DOT text to stdout after the files are written.
    pub print_dot: bool,
}

/// Paths written by a successful run.
#[derive(Debug)]
pub struct AnalysisArtifacts {
    pub json_path: PathBuf,
    pub dot_path: PathBuf,
    pub image_paths: Vec<PathBuf>,
}

pub struct AnalyzeUsecase<'a> {
    pub parser: &'a dyn AstParser,
    pub renderer: &'a dyn GraphRenderer,
    pub patterns: Vec<RegistrationPattern>,
}

impl AnalyzeUsecase<'_> {
    pub fn run(&self, script_path: &Path, options: AnalyzeOptions) -> Result<AnalysisArtifacts> {
        if !script_path.is_file() {
            bail!("Input file not found at {}", script_path.display());
        }
        let source = fs::read_to_string(script_path)
            .with_context(|| format!("Failed to read {}", script_path.display()))?;

        let root = self
            .parser
            .parse(&source)
            .with_context(|| format!("Failed to parse {}", script_path.display()))?;

        let defined = collect_defined_functions(&root);
        let raw = build_call_graph(&root, &self.patterns);
        let graph = filter_to_defined(raw, &defined);

        let base = output_base(script_path);

        let json_path = artifact_path(&base, "json");
        let json = serde_json::to_string_pretty(&graph).context("Failed to serialize call graph")?;
        fs::write(&json_path, json)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
        println!("[FlowCraft] Call graph data saved to: {}", json_path.display());

        let dot_source = FlowchartExporter::to_dot(&graph, &display_name(script_path));
        let dot_path = artifact_path(&base, "dot");
        fs::write(&dot_path, &dot_source)
            .with_context(|| format!("Failed to write {}", dot_path.display()))?;
        println!("[FlowCraft] DOT graph saved to: {}", dot_path.display());

        if options.print_dot {
            println!("\n--- DOT Representation ---");
            println!("{}", dot_source);
        }

        let image_paths = if options.no_images {
            Vec::new()
        } else {
            self.render_images(&dot_source, &base)
        };

        Ok(AnalysisArtifacts {
            json_path,
            dot_path,
            image_paths,
        })
    }

    /// Best-effort image rendering. A missing `dot` skips both formats; a
    /// failed render aborts the remaining ones. Warnings only, never fatal.
    fn render_images(&self, dot_source: &str, base: &Path) -> Vec<PathBuf> {
        if let Err(error) = self.renderer.check_available() {
            eprintln!("[FlowCraft] Warning: {}. Images were not generated.", error);
            return Vec::new();
        }

        let mut written = Vec::new();
        for format in [ImageFormat::Png, ImageFormat::Svg] {
            let image_path = artifact_path(base, format.extension());
            match self.renderer.render(dot_source, format, &image_path) {
                Ok(()) => {
                    println!("[FlowCraft] Flowchart image saved to: {}", image_path.display());
                    written.push(image_path);
                }
                Err(error) => {
                    eprintln!("[FlowCraft] Error executing 'dot' command: {:#}", error);
                    break;
                }
            }
        }
        written
    }
}

/// `{stem}_flowchart_{YYYYMMDDHHMMSS}` next to the analyzed file. The
/// timestamp keys one run's artifact set; extensions are added per artifact.
fn output_base(script_path: &Path) -> PathBuf {
    let stem = script_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "script".to_string());
    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    let file_name = format!("{}_flowchart_{}", stem, timestamp);
    match script_path.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Append an extension without touching dots already in the base name.
fn artifact_path(base: &Path, extension: &str) -> PathBuf {
    let mut name = base.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(extension);
    base.with_file_name(name)
}

fn display_name(script_path: &Path) -> String {
    script_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| script_path.display().to_string())
}
