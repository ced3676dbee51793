//! Interactive configuration wizard.
//!
//! The wizard walks the operator through the sections of a [`Choices`]
//! store: it shows the configuration status, lets the operator pick a
//! section, checks its prerequisites, reviews and edits its attributes and
//! finally hands the store over once "Generate" is chosen.
//!
//! Every state that loops back on itself (invalid input, unmet
//! prerequisites, an empty configuration on "Generate") is a transition of
//! one iterative state machine, so an operator can retry indefinitely.

use crate::providers::{Delay, ThreadSleep};
use crate::store::Choices;
use crate::structure::{InputError, Kind, SectionName, Value};
use anyhow::{Result, anyhow, bail};
use colored::{ColoredString, Colorize};
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

/// Label of the terminal menu entry.
pub const GENERATE: &str = "Generate";

/// What the operator picked from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Section(SectionName),
    Generate,
}

impl MenuChoice {
    /// Menu entries in display order; the last one is the terminal action.
    pub fn entries() -> Vec<MenuChoice> {
        SectionName::ALL
            .into_iter()
            .map(MenuChoice::Section)
            .chain(std::iter::once(MenuChoice::Generate))
            .collect()
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::Section(name) => name.label(),
            MenuChoice::Generate => GENERATE,
        }
    }

    /// Parses a menu answer given as an index or a label.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let entries = Self::entries();

        if let Ok(index) = raw.parse::<usize>() {
            if let Some(entry) = entries.get(index) {
                return Ok(*entry);
            }
        }

        entries
            .into_iter()
            .find(|entry| entry.label().eq_ignore_ascii_case(raw))
            .ok_or_else(|| InputError::InvalidChoice(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Status,
    Menu,
    Gate(SectionName),
    Review(SectionName),
    Decide(SectionName),
    Input { section: SectionName, index: usize },
    Confirm(SectionName),
    Terminate,
}

/// Drives the configuration state machine.
///
/// # Example
///
/// ```no_run
/// use structure_maker::store::{Choices, Params};
/// use structure_maker::wizard::Wizard;
///
/// let choices = Wizard::new(Choices::new(Params::default())).run()?;
/// println!("configured: {:?}", choices.configured());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct Wizard {
    choices: Choices,
    delay: Box<dyn Delay>,
}

impl Wizard {
    /// Creates a wizard that pauses one second after warnings.
    pub fn new(choices: Choices) -> Self {
        Self::with_delay(choices, Box::new(ThreadSleep::from_millis(1000)))
    }

    /// Creates a wizard with a custom delay (for testing).
    pub fn with_delay(choices: Choices, delay: Box<dyn Delay>) -> Self {
        Self { choices, delay }
    }

    // =========================================================================
    // State machine
    // =========================================================================

    /// Runs the wizard over custom I/O streams until "Generate" is chosen
    /// with at least one section configured.
    ///
    /// # Errors
    ///
    /// Returns an error if I/O fails or the input stream is closed.
    pub fn run_with_io<R: BufRead, W: Write>(mut self, input: &mut R, output: &mut W) -> Result<Choices> {
        writeln!(output, "{}", "Create a new structure".green())?;
        writeln!(output)?;

        let mut state = State::Status;

        loop {
            debug!("Wizard state: {:?}", state);

            state = match state {
                State::Status => {
                    self.show_status(output)?;
                    State::Menu
                }
                State::Menu => match self.choose(input, output)? {
                    MenuChoice::Section(name) => State::Gate(name),
                    MenuChoice::Generate => State::Terminate,
                },
                State::Gate(name) => {
                    let missing = self.choices.missing_requirements(name);
                    if missing.is_empty() {
                        State::Review(name)
                    } else {
                        let names: Vec<&str> = missing.iter().map(SectionName::key).collect();
                        writeln!(output, "{}", format!("You must configure first: {}", names.join(", ")).yellow())?;
                        writeln!(output)?;
                        self.delay.pause();
                        State::Status
                    }
                }
                State::Review(name) => {
                    self.show_configuration(name, output)?;
                    State::Decide(name)
                }
                State::Decide(name) => {
                    if self.confirm(&format!("Configure {}", name.label()), input, output)? {
                        State::Input { section: name, index: 0 }
                    } else {
                        State::Status
                    }
                }
                State::Input { section, index } => self.input(section, index, input, output)?,
                State::Confirm(name) => {
                    self.choices.confirm(name);
                    info!("Section '{}' configured", name);
                    writeln!(output)?;
                    State::Status
                }
                State::Terminate => {
                    if !self.choices.configured().is_empty() {
                        return Ok(self.choices);
                    }
                    writeln!(output, "{}", "There is nothing configured yet!".red())?;
                    writeln!(output)?;
                    self.delay.pause();
                    State::Status
                }
            };
        }
    }

    /// Runs the wizard on stdin/stdout.
    ///
    /// This is a convenience wrapper around [`Self::run_with_io`].
    pub fn run(self) -> Result<Choices> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        self.run_with_io(&mut input, &mut output)
    }

    // =========================================================================
    // Screens and prompts
    // =========================================================================

    fn show_status<W: Write>(&self, output: &mut W) -> Result<()> {
        writeln!(output, "{}", "Current configuration status:".green())?;
        for name in SectionName::ALL {
            writeln!(output, "{} {}", name.label(), symbol(self.choices.is_configured(name)))?;
        }
        Ok(())
    }

    fn choose<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<MenuChoice> {
        loop {
            writeln!(output, "{}", "Choose element to configure".green())?;
            for (index, entry) in MenuChoice::entries().iter().enumerate() {
                writeln!(output, "  [{}] {}", index, entry.label())?;
            }
            write!(output, "> ")?;
            output.flush()?;

            let answer = read_line(input)?;
            match MenuChoice::parse(&answer) {
                Ok(choice) => return Ok(choice),
                Err(err) => writeln!(output, "{}", err.to_string().red())?,
            }
        }
    }

    fn show_configuration<W: Write>(&self, name: SectionName, output: &mut W) -> Result<()> {
        let section = self
            .choices
            .get(name)
            .ok_or_else(|| anyhow!("Section '{}' is not defined", name))?;

        writeln!(output, "{}", format!("{} configuration:", name.label()).green())?;
        for (key, value) in section.attributes().iter() {
            match value {
                Value::Bool(flag) => writeln!(output, "{} => {}", key, symbol(*flag))?,
                other => writeln!(output, "{} => {}", key, other)?,
            }
        }
        Ok(())
    }

    /// Yes/no question defaulting to no.
    fn confirm<R: BufRead, W: Write>(&self, question: &str, input: &mut R, output: &mut W) -> Result<bool> {
        write!(output, "{}? (yes/no) [no]: ", question)?;
        output.flush()?;

        let answer = read_line(input)?.to_lowercase();
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }

    /// Prompts for the attribute at `index`, moving on once a value of the
    /// right kind is stored.
    fn input<R: BufRead, W: Write>(
        &mut self,
        name: SectionName,
        index: usize,
        input: &mut R,
        output: &mut W,
    ) -> Result<State> {
        let section = self
            .choices
            .get_mut(name)
            .ok_or_else(|| anyhow!("Section '{}' is not defined", name))?;

        let Some((key, kind, current)) = section
            .attributes()
            .entry(index)
            .map(|(key, kind, value)| (key.to_string(), kind, value.clone()))
        else {
            return Ok(State::Confirm(name));
        };

        match kind {
            Kind::Bool => write!(output, "{} (yes/no) [{}]: ", key, if current == Value::Bool(true) { "yes" } else { "no" })?,
            _ => write!(output, "{} [{}]: ", key, current)?,
        }
        output.flush()?;

        let raw = read_line(input)?;
        let parsed = match (raw.is_empty(), kind) {
            (true, Kind::Null) => Ok(Value::Null),
            (true, _) => Ok(current),
            (false, _) => kind.parse(&key, &raw),
        };

        match parsed.and_then(|value| section.attributes_mut().set(&key, value)) {
            Ok(()) => Ok(State::Input { section: name, index: index + 1 }),
            Err(err) => {
                writeln!(output, "{}", err.to_string().red())?;
                self.delay.pause();
                Ok(State::Input { section: name, index })
            }
        }
    }
}

/// Reads one trimmed line, failing when the stream is closed.
fn read_line<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("Input stream closed before the configuration was finished");
    }
    Ok(line.trim().to_string())
}

/// Check mark or cross for a boolean.
pub fn symbol(flag: bool) -> ColoredString {
    if flag { "✔".green() } else { "✘".red() }
}
