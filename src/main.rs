// Command-line entry point for FlowCraft.

use std::path::PathBuf;

use clap::Parser;
use flowcraft::application::{AnalyzeOptions, AnalyzeUsecase};
use flowcraft::domain::patterns::{default_patterns, load_patterns};
use flowcraft::infrastructure::{GraphvizRenderer, TreeSitterAstParser};

/// Generate a flowchart JSON, DOT, PNG, and SVG from a Python script.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the Python script to analyze
    python_file: PathBuf,

    /// Do not generate PNG and SVG images (requires Graphviz)
    #[arg(long)]
    no_images: bool,

    /// Print the DOT representation to stdout after generating files
    #[arg(long)]
    print_dot: bool,

    /// TOML file replacing the built-in registration-pattern table
    #[arg(long, value_name = "FILE")]
    patterns: Option<PathBuf>,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let patterns = match &cli.patterns {
        Some(path) => load_patterns(path)?,
        None => default_patterns(),
    };

    let usecase = AnalyzeUsecase {
        parser: &TreeSitterAstParser,
        renderer: &GraphvizRenderer,
        patterns,
    };

    let options = AnalyzeOptions {
        no_images: cli.no_images,
        print_dot: cli.print_dot,
    };

    usecase.run(&cli.python_file, options)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}
