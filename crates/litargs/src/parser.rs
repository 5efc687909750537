use anyhow::{Context, Result};
use std::io::Write;

use crate::error::DefinitionError;
use crate::help;
use crate::matcher;
use crate::registry::{Description, Registry};
use crate::result::{OptionValues, ParseResult};
use crate::settings::Settings;

/// What [`Litargs::execute`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    /// The resolved command ran (or had no handler to run).
    Handled,
    /// Help was rendered instead of a handler.
    Help,
}

/// A parser instance: its own registry, settings and last parse result.
///
/// Registration happens first. The first [`parse`](Self::parse) closes the
/// registration phase; after that every registration call fails with
/// [`DefinitionError::RegistrationClosed`].
#[derive(Debug)]
pub struct Litargs {
    registry: Registry,
    settings: Settings,
    sealed: bool,
    last: Option<ParseResult>,
}

impl Default for Litargs {
    fn default() -> Self {
        Self::new()
    }
}

impl Litargs {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            registry: Registry::new(settings.marker),
            settings,
            sealed: false,
            last: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn ensure_open(&self) -> Result<(), DefinitionError> {
        if self.sealed {
            return Err(DefinitionError::RegistrationClosed);
        }
        Ok(())
    }

    /// Register a command and focus it for following `option`/`alias`/`handler` calls.
    pub fn command(
        &mut self,
        name: &str,
        arity: usize,
        description: Description,
    ) -> Result<&mut Self, DefinitionError> {
        self.ensure_open()?;
        self.registry.register_command(name, arity, description)?;
        Ok(self)
    }

    /// Add an option to the focused command.
    pub fn option(
        &mut self,
        name: &str,
        arity: usize,
        description: Description,
    ) -> Result<&mut Self, DefinitionError> {
        self.ensure_open()?;
        self.registry.register_option(name, arity, description)?;
        Ok(self)
    }

    /// Give the focused command another name.
    pub fn alias(&mut self, name: &str) -> Result<&mut Self, DefinitionError> {
        self.ensure_open()?;
        self.registry.register_alias(name)?;
        Ok(self)
    }

    /// Set the focused command's handler.
    pub fn handler<F>(&mut self, handler: F) -> Result<&mut Self, DefinitionError>
    where
        F: Fn(&[String], &OptionValues) -> Result<()> + Send + Sync + 'static,
    {
        self.ensure_open()?;
        self.registry.set_handler(Box::new(handler))?;
        Ok(self)
    }

    /// Parse one raw argument line and keep the result for `execute`.
    pub fn parse(&mut self, raw: &str) -> &ParseResult {
        self.sealed = true;
        let result = matcher::match_line(&self.registry, &self.settings, raw);
        tracing::debug!(
            command = result.command_name().unwrap_or_default(),
            options = result.options.len(),
            errors = result.errors.len(),
            "parsed arguments"
        );
        self.last.insert(result)
    }

    /// Join an argv-style sequence with single spaces and parse it.
    pub fn parse_args<I, S>(&mut self, args: I) -> &ParseResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw = args
            .into_iter()
            .map(|a| a.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.parse(&raw)
    }

    pub fn last_result(&self) -> Option<&ParseResult> {
        self.last.as_ref()
    }

    /// Whether the last parse produced no errors. `false` before any parse.
    pub fn is_valid(&self) -> bool {
        self.last.as_ref().is_some_and(ParseResult::is_valid)
    }

    /// Help text for every command, plus the errors of the last parse.
    pub fn help(&self) -> String {
        let errors = self.last.as_ref().map(|r| r.errors.as_slice()).unwrap_or(&[]);
        help::render(&self.registry, errors)
    }

    /// Run the last parse result, writing help to stdout when it cannot run.
    pub fn execute(&self) -> Result<Execution> {
        let mut stdout = std::io::stdout().lock();
        self.execute_to(&mut stdout)
    }

    /// Run the last parse result.
    ///
    /// Help is written to `out` instead of calling a handler when nothing was
    /// parsed yet, the last parse had errors, or the `help` command was given.
    /// Only handler and write failures are returned as errors.
    pub fn execute_to<W: Write>(&self, out: &mut W) -> Result<Execution> {
        let resolved = self
            .last
            .as_ref()
            .filter(|r| r.is_valid())
            .and_then(|r| Some((r, self.registry.resolve(r.command_name()?)?)));

        let Some((result, id)) = resolved else {
            return self.write_help(out);
        };
        if id == self.registry.help_id() {
            return self.write_help(out);
        }

        let command = self.registry.command(id);
        let Some(handler) = command.handler() else {
            tracing::debug!(command = command.name(), "no handler registered");
            return Ok(Execution::Handled);
        };

        tracing::debug!(command = command.name(), "dispatching");
        handler(result.positional(), &result.options_by_name())
            .with_context(|| format!("command '{}' failed", command.name()))?;
        Ok(Execution::Handled)
    }

    fn write_help<W: Write>(&self, out: &mut W) -> Result<Execution> {
        out.write_all(self.help().as_bytes())
            .context("failed to write help")?;
        out.flush().context("failed to write help")?;
        Ok(Execution::Help)
    }
}
