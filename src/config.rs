use crate::store::Params;
use anyhow::{Context, Result, anyhow};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub root_segment: PathBuf,
    pub base_path: PathBuf,
    pub pause_ms: u64,
    pub strict_placeholders: bool,
    pub stubs_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let params = Params::default();
        Self {
            root_segment: params.root_segment,
            base_path: params.base_path,
            pause_ms: 1000,
            strict_placeholders: false,
            stubs_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables, or defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()
            .inspect_err(|err| info!("{}, skipping config file", err))
            .ok();
        let mut config = match Self::load_from_file(config_path.as_deref())? {
            Some(config) => config,
            None => {
                info!("No config file found, using defaults");
                Self::default()
            }
        };

        // Environment variables override config file
        config.apply_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Reads the config file at `config_path`; a missing path or file is
    /// not an error, an unreadable or invalid one is.
    fn load_from_file(config_path: Option<&Path>) -> Result<Option<Self>> {
        let Some(config_path) = config_path.filter(|path| path.exists()) else {
            return Ok(None);
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", config_path.display()))?;
        info!("Loaded config from: {}", config_path.display());
        Ok(Some(config))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `STRUCTURE_MAKER_*` overrides looked up through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(root_segment) = lookup("STRUCTURE_MAKER_ROOT_SEGMENT") {
            self.root_segment = PathBuf::from(root_segment);
        }

        if let Some(base_path) = lookup("STRUCTURE_MAKER_BASE_PATH") {
            self.base_path = PathBuf::from(base_path);
        }

        if let Some(strict) = lookup("STRUCTURE_MAKER_STRICT") {
            self.strict_placeholders = matches!(strict.as_str(), "1" | "true" | "yes");
        }
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    pub fn get_config_dir() -> Result<PathBuf> {
        let home = home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(".structure-maker"))
    }

    /// Session parameters handed to the generators.
    pub fn params(&self) -> Params {
        Params {
            root_segment: self.root_segment.clone(),
            base_path: self.base_path.clone(),
        }
    }

    pub fn show_config_info(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        println!("Configuration file: {}", config_path.display());
        println!(
            "Status: {}",
            if config_path.exists() { "Found" } else { "Not found (using defaults)" }
        );

        println!("\nEffective settings:");
        println!("  root_segment = {}", self.root_segment.display());
        println!("  base_path = {}", self.base_path.display());
        println!("  pause_ms = {}", self.pause_ms);
        println!("  strict_placeholders = {}", self.strict_placeholders);
        match &self.stubs_dir {
            Some(dir) => println!("  stubs_dir = {}", dir.display()),
            None => println!("  stubs_dir = (built-in stubs)"),
        }

        println!("\nOr set environment variables:");
        println!("  export STRUCTURE_MAKER_ROOT_SEGMENT=<path>");
        println!("  export STRUCTURE_MAKER_BASE_PATH=<path>");
        println!("  export STRUCTURE_MAKER_STRICT=1");

        Ok(())
    }
}
