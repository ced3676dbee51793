//! Structure maker - interactive scaffolding for application structures.
//!
//! This library walks an operator through configuring a fixed set of
//! sections (model, permission group, permissions, menu, files) and then
//! generates the matching files from templates. It supports:
//!
//! - **Typed configuration** where every attribute keeps its declared type
//! - **Dependency gating** so a section is only editable once its
//!   prerequisites are configured
//! - **Template rendering** with literal `${placeholder}` substitution
//! - **Route declarations** generated from the configured permissions
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`structure`] - Section definitions and typed attribute values
//! - [`store`] - The configuration store and session parameters
//! - [`wizard`] - The interactive configuration state machine
//! - [`filter`] - Normalization and pruning before generation
//! - [`stub`] - Stub provider contract, template registry and rendering
//! - [`writers`] - Concrete stub providers
//! - [`structure_writer`] - Renders and writes every provider
//! - [`routes_generator`] - Route declaration text
//! - [`maker`] - Ties a whole session together
//! - [`config`] - Configuration management (paths, strictness)
//! - [`providers`] - Shared dependency injection traits
//!
//! # Example
//!
//! ```no_run
//! use structure_maker::config::Config;
//! use structure_maker::maker::StructureMaker;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!
//!     // Runs the wizard on stdin/stdout and writes the selected files
//!     let written = StructureMaker::new(config).run()?;
//!     println!("{} file(s) written", written.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Replay
//!
//! A session can be replayed without prompts from a JSON document listing
//! the sections to configure:
//!
//! ```bash
//! make-structure --replay invoice.json
//! ```

pub mod config;
pub mod filter;
pub mod maker;
pub mod providers;
pub mod routes_generator;
pub mod store;
pub mod structure;
pub mod structure_writer;
pub mod stub;
pub mod wizard;
pub mod writers;
