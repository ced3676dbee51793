use crate::{
    config::Config,
    filter,
    providers::{Delay, ThreadSleep},
    routes_generator::RoutesGenerator,
    store::{self, Choices},
    structure::SectionName,
    structure_writer::StructureWriter,
    stub::Stubs,
    wizard::Wizard,
};
use anyhow::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

/// Runs a whole session: wizard (or replay), filter, write, routes output.
pub struct StructureMaker {
    config: Config,
    stubs: Stubs,
    delay: Box<dyn Delay>,
}

impl StructureMaker {
    pub fn new(config: Config) -> Self {
        let delay = Box::new(ThreadSleep::from_millis(config.pause_ms));
        Self::with_delay(config, delay)
    }

    pub fn with_delay(config: Config, delay: Box<dyn Delay>) -> Self {
        Self {
            stubs: Stubs::new(config.stubs_dir.clone()),
            config,
            delay,
        }
    }

    /// Interactive session on stdin/stdout.
    pub fn run(self) -> Result<Vec<PathBuf>> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        self.run_with_io(&mut input, &mut output)
    }

    pub fn run_with_io<R: BufRead, W: Write>(self, input: &mut R, output: &mut W) -> Result<Vec<PathBuf>> {
        let Self { config, stubs, delay } = self;

        let choices = Wizard::with_delay(Choices::new(config.params()), delay).run_with_io(input, output)?;

        Self::generate(&config, &stubs, choices, output)
    }

    /// Non-interactive session from a JSON replay document.
    pub fn replay<W: Write>(&self, json: &str, output: &mut W) -> Result<Vec<PathBuf>> {
        let choices = Choices::from_json(self.config.params(), json)?;
        store::ensure_configured(&choices)?;
        info!("Replaying sections: {:?}", choices.configured());

        Self::generate(&self.config, &self.stubs, choices, output)
    }

    fn generate<W: Write>(config: &Config, stubs: &Stubs, choices: Choices, output: &mut W) -> Result<Vec<PathBuf>> {
        let choices = filter::apply(choices)?;

        let written = StructureWriter::new(&choices, stubs)
            .strict(config.strict_placeholders)
            .run()?;

        for path in &written {
            writeln!(output, "{} {}", "Created".green(), path.display())?;
        }
        writeln!(output)?;

        if choices.has(SectionName::Permissions) {
            let routes = RoutesGenerator::new(&choices, stubs).run()?;

            writeln!(output, "{}", "Copy and paste the following code into your api.php routes file:".green())?;
            writeln!(output)?;
            writeln!(output, "{}", routes.yellow())?;
            writeln!(output)?;
        }

        writeln!(output, "{}", "The new structure is created, you can start playing".green())?;
        writeln!(output)?;

        Ok(written)
    }
}
