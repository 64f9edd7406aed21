//! Registration-pattern recognition.
//!
//! Graph frameworks register callables through methods like
//! `workflow.add_node("step", handler)`. The handler is passed as data, not
//! called, so a plain call walk never sees it. A declarative table of
//! registration shapes lets the builder append those handlers as callees,
//! and `--patterns` can swap the table at runtime.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::ast::PyNode;

/// How to pull a callee name out of a registration argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionRule {
    /// Accept a bare identifier only.
    BareName,
    /// Accept a bare identifier, or a lambda whose whole body is one call.
    BareNameOrLambda,
}

impl ExtractionRule {
    /// Extract the registered callee name from `arg`, if the shape matches.
    pub fn extract<'a>(&self, arg: &'a PyNode) -> Option<&'a str> {
        match (self, arg) {
            (_, PyNode::Name(name)) => Some(name),
            (ExtractionRule::BareNameOrLambda, PyNode::Lambda { body, .. }) => {
                match body.as_ref() {
                    PyNode::Call { func, .. } => func.call_target(),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// One row of the registration table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationPattern {
    /// Callee-name suffix that triggers the rule (`ends_with`, not equality,
    /// so `workflow.add_node` and `builder.add_node` both match).
    pub suffix: String,
    /// Index of the positional argument carrying the registered callable.
    pub arg_index: usize,
    pub rule: ExtractionRule,
}

impl RegistrationPattern {
    pub fn matches(&self, callee: &str) -> bool {
        callee.ends_with(&self.suffix)
    }
}

/// The built-in table: LangGraph-style `add_node` and
/// `add_conditional_edges` registrations.
pub fn default_patterns() -> Vec<RegistrationPattern> {
    vec![
        RegistrationPattern {
            suffix: "add_node".to_string(),
            arg_index: 1,
            rule: ExtractionRule::BareNameOrLambda,
        },
        RegistrationPattern {
            suffix: "add_conditional_edges".to_string(),
            arg_index: 1,
            rule: ExtractionRule::BareName,
        },
    ]
}

#[derive(Debug, Serialize, Deserialize)]
struct PatternsFile {
    #[serde(default)]
    pattern: Vec<RegistrationPattern>,
}

/// Load a replacement table from a TOML file. The file defines the whole
/// table; an empty file turns registration recognition off.
///
/// ```toml
/// [[pattern]]
/// suffix = "add_node"
/// arg_index = 1
/// rule = "bare-name-or-lambda"
/// ```
pub fn load_patterns(path: &Path) -> Result<Vec<RegistrationPattern>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read patterns file: {}", path.display()))?;
    let file: PatternsFile = toml::from_str(&text)
        .with_context(|| format!("Failed to parse patterns file: {}", path.display()))?;
    Ok(file.pattern)
}
