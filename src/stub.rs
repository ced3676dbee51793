//! Stub providers and template rendering.
//!
//! A stub is raw template text containing `${identifier}` placeholders.
//! Each generated artifact is described by a [`StubProvider`]; the
//! [`render`] function substitutes its placeholders in a single pass.

use anyhow::{Context, Result, anyhow};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

/// Placeholder token → replacement text.
pub type FromTo = BTreeMap<String, String>;

/// Capability every generated artifact implements.
pub trait StubProvider {
    /// Ensures the output directory exists. Must be idempotent.
    fn prepare(&self) -> Result<()>;

    /// Deterministic output path derived from the configuration.
    fn file_path(&self) -> PathBuf;

    /// Placeholder tokens (delimiters included) and their replacements.
    fn from_to(&self) -> FromTo;

    /// Raw template text.
    fn stub(&self) -> Result<String>;
}

/// Registry of template texts keyed by logical name.
///
/// Stubs are read from an override directory when one is configured and
/// holds `<name>.stub`, otherwise the built-in copy is used.
#[derive(Debug, Clone, Default)]
pub struct Stubs {
    dir: Option<PathBuf>,
}

impl Stubs {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn get(&self, name: &str) -> Result<String> {
        if let Some(dir) = &self.dir {
            let path = dir.join(format!("{}.stub", name));
            if path.is_file() {
                debug!("Using stub override {}", path.display());
                return fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read stub {}", path.display()));
            }
        }

        builtin(name)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Unknown stub: {}", name))
    }
}

fn builtin(name: &str) -> Option<&'static str> {
    match name {
        "template" => Some(include_str!("../stubs/template.stub")),
        "model" => Some(include_str!("../stubs/model.stub")),
        "migration" => Some(include_str!("../stubs/migration.stub")),
        "seeder" => Some(include_str!("../stubs/seeder.stub")),
        "policy" => Some(include_str!("../stubs/policy.stub")),
        "structure_migration" => Some(include_str!("../stubs/structure_migration.stub")),
        "routes" => Some(include_str!("../stubs/routes.stub")),
        _ => None,
    }
}

/// Replaces every literal occurrence of every token in `stub`.
///
/// The text is scanned once, left to right. Where several tokens match at
/// the same position the longest wins. Replacement text is emitted as-is and
/// never scanned again, and unmatched placeholders are left verbatim.
pub fn render(stub: &str, from_to: &FromTo) -> String {
    let mut tokens: Vec<(&str, &str)> = from_to
        .iter()
        .filter(|(token, _)| !token.is_empty())
        .map(|(token, replacement)| (token.as_str(), replacement.as_str()))
        .collect();
    tokens.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut output = String::with_capacity(stub.len());
    let mut rest = stub;

    while let Some(next) = rest.chars().next() {
        match tokens.iter().find(|(token, _)| rest.starts_with(token)) {
            Some((token, replacement)) => {
                output.push_str(replacement);
                rest = &rest[token.len()..];
            }
            None => {
                output.push(next);
                rest = &rest[next.len_utf8()..];
            }
        }
    }

    output
}

static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[A-Za-z_][A-Za-z0-9_]*\}").unwrap());

/// `${identifier}` tokens still present in `text`, in order of appearance.
pub fn unmatched_placeholders(text: &str) -> Vec<String> {
    PLACEHOLDER_PATTERN
        .find_iter(text)
        .map(|found| found.as_str().to_string())
        .collect()
}

/// Creates `path` and its parents when missing.
pub fn prepare_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))
}
