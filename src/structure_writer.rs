//! Generation pipeline: renders every stub provider and writes the result.

use crate::store::Choices;
use crate::stub::{StubProvider, Stubs, render, unmatched_placeholders};
use crate::writers;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Writes the artifacts requested by a filtered configuration.
///
/// Writes are not transactional: when one provider fails, files written by
/// the providers before it stay on disk.
pub struct StructureWriter<'a> {
    choices: &'a Choices,
    stubs: &'a Stubs,
    strict: bool,
}

impl<'a> StructureWriter<'a> {
    pub fn new(choices: &'a Choices, stubs: &'a Stubs) -> Self {
        Self {
            choices,
            stubs,
            strict: false,
        }
    }

    /// Fail a unit whose rendered text still holds `${...}` placeholders.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Runs every provider in order and returns the written paths.
    pub fn run(&self) -> Result<Vec<PathBuf>> {
        let providers = writers::providers(self.choices, self.stubs);
        info!("Writing {} artifact(s)", providers.len());

        providers
            .iter()
            .map(|provider| self.write(provider.as_ref()))
            .collect()
    }

    /// Prepares, renders and writes a single provider.
    pub fn write(&self, provider: &dyn StubProvider) -> Result<PathBuf> {
        provider.prepare()?;

        let stub = provider.stub()?;
        let content = render(&stub, &provider.from_to());
        let path = provider.file_path();

        if self.strict {
            let unmatched = unmatched_placeholders(&content);
            if !unmatched.is_empty() {
                bail!(
                    "Unmatched placeholders in {}: {}",
                    path.display(),
                    unmatched.join(", ")
                );
            }
        }

        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {}", path.display());

        Ok(path)
    }
}
