//! Command and option definitions, and the name table that resolves them.
//!
//! Commands live in a flat table addressed by [`CommandId`]. Every name a
//! command answers to, its own and each alias, maps to the same id, so an
//! alias always sees the options registered on the original command.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DefinitionError;
use crate::result::OptionValues;

/// Name of the built-in help command every registry starts with.
pub const HELP_COMMAND: &str = "help";

/// Handler invoked with the positional values and the folded options.
pub type Handler = Box<dyn Fn(&[String], &OptionValues) -> anyhow::Result<()> + Send + Sync>;

/// Human-facing text for a command or option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Labels for each argument slot, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(default)]
    pub detail: String,
}

impl Description {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            args: None,
            detail: detail.into(),
        }
    }

    pub fn args<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(labels.into_iter().map(Into::into).collect());
        self
    }
}

/// Data shared by commands and options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub arity: usize,
    pub description: Description,
}

impl Definition {
    fn checked(
        name: &str,
        arity: usize,
        description: Description,
        marker: char,
    ) -> Result<Self, DefinitionError> {
        validate_name(name, marker)?;
        if let Some(labels) = &description.args {
            if labels.len() != arity {
                return Err(DefinitionError::ArityMismatch {
                    name: name.to_string(),
                    arity,
                    labels: labels.len(),
                });
            }
        }
        Ok(Self {
            name: name.to_string(),
            arity,
            description,
        })
    }
}

fn validate_name(name: &str, marker: char) -> Result<(), DefinitionError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(DefinitionError::InvalidName(name.to_string()));
    }
    if name.starts_with(marker) {
        return Err(DefinitionError::ReservedPrefix {
            name: name.to_string(),
            marker,
        });
    }
    Ok(())
}

/// An option owned by one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub definition: Definition,
    actual_name: String,
}

impl OptionSpec {
    fn new(definition: Definition, marker: char) -> Self {
        // Flags take the long form.
        let prefix = if definition.arity == 0 {
            format!("{marker}{marker}")
        } else {
            marker.to_string()
        };
        let actual_name = format!("{prefix}{}", definition.name);
        Self {
            definition,
            actual_name,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn arity(&self) -> usize {
        self.definition.arity
    }

    pub fn is_flag(&self) -> bool {
        self.definition.arity == 0
    }

    /// The token that references this option on the command line.
    pub fn actual_name(&self) -> &str {
        &self.actual_name
    }
}

/// A registered command.
pub struct CommandSpec {
    pub definition: Definition,
    options: IndexMap<String, OptionSpec>,
    aliases: Vec<String>,
    handler: Option<Handler>,
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("definition", &self.definition)
            .field("options", &self.options)
            .field("aliases", &self.aliases)
            .field("handler", &self.handler.as_ref().map(|_| ".."))
            .finish()
    }
}

impl CommandSpec {
    fn new(definition: Definition) -> Self {
        Self {
            definition,
            options: IndexMap::new(),
            aliases: Vec::new(),
            handler: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn arity(&self) -> usize {
        self.definition.arity
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Options in registration order.
    pub fn options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options.values()
    }

    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.get(name)
    }

    /// Find the option whose marker-prefixed name is exactly `token`.
    pub fn option_by_token(&self, token: &str) -> Option<&OptionSpec> {
        self.options.values().find(|o| o.actual_name == token)
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }
}

/// Opaque handle into a [`Registry`]'s command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(usize);

/// Commands, their options, and every name they answer to.
///
/// Options and aliases always apply to the command registered last (the
/// focused command). The built-in `help` command never takes focus.
#[derive(Debug)]
pub struct Registry {
    marker: char,
    commands: Vec<CommandSpec>,
    names: IndexMap<String, CommandId>,
    focus: Option<CommandId>,
}

impl Registry {
    pub fn new(marker: char) -> Self {
        let help = Definition {
            name: HELP_COMMAND.to_string(),
            arity: 0,
            description: Description::new("Display a list of commands"),
        };
        let mut names = IndexMap::new();
        names.insert(HELP_COMMAND.to_string(), CommandId(0));
        Self {
            marker,
            commands: vec![CommandSpec::new(help)],
            names,
            focus: None,
        }
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    pub fn help_id(&self) -> CommandId {
        CommandId(0)
    }

    pub fn register_command(
        &mut self,
        name: &str,
        arity: usize,
        description: Description,
    ) -> Result<CommandId, DefinitionError> {
        if self.names.contains_key(name) {
            return Err(DefinitionError::DuplicateCommand(name.to_string()));
        }
        let definition = Definition::checked(name, arity, description, self.marker)?;

        let id = CommandId(self.commands.len());
        self.commands.push(CommandSpec::new(definition));
        self.names.insert(name.to_string(), id);
        self.focus = Some(id);
        tracing::debug!(command = name, arity, "registered command");
        Ok(id)
    }

    pub fn register_option(
        &mut self,
        name: &str,
        arity: usize,
        description: Description,
    ) -> Result<(), DefinitionError> {
        let id = self.focused(|| format!("option '{name}'"))?;
        let definition = Definition::checked(name, arity, description, self.marker)?;
        let marker = self.marker;

        let command = &mut self.commands[id.0];
        if command.options.contains_key(name) {
            return Err(DefinitionError::DuplicateOption {
                command: command.definition.name.clone(),
                option: name.to_string(),
            });
        }
        let option = OptionSpec::new(definition, marker);
        tracing::debug!(
            command = %command.definition.name,
            option = option.actual_name(),
            arity,
            "registered option"
        );
        command.options.insert(name.to_string(), option);
        Ok(())
    }

    pub fn register_alias(&mut self, name: &str) -> Result<CommandId, DefinitionError> {
        let id = self.focused(|| format!("alias '{name}'"))?;
        if self.names.contains_key(name) {
            return Err(DefinitionError::DuplicateCommand(name.to_string()));
        }
        validate_name(name, self.marker)?;

        self.names.insert(name.to_string(), id);
        let command = &mut self.commands[id.0];
        command.aliases.push(name.to_string());
        tracing::debug!(command = %command.definition.name, alias = name, "registered alias");
        Ok(id)
    }

    pub fn set_handler(&mut self, handler: Handler) -> Result<(), DefinitionError> {
        let id = self.focused(|| "a handler".to_string())?;
        self.commands[id.0].handler = Some(handler);
        Ok(())
    }

    fn focused(&self, what: impl FnOnce() -> String) -> Result<CommandId, DefinitionError> {
        self.focus
            .ok_or_else(|| DefinitionError::NoFocusedCommand(what()))
    }

    /// Exact, case-sensitive lookup by command name or alias.
    pub fn resolve(&self, name: &str) -> Option<CommandId> {
        self.names.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.resolve(name).map(|id| self.command(id))
    }

    pub fn command(&self, id: CommandId) -> &CommandSpec {
        &self.commands[id.0]
    }

    /// Every command once, in registration order, `help` first.
    pub fn commands(&self) -> impl Iterator<Item = (CommandId, &CommandSpec)> {
        self.commands
            .iter()
            .enumerate()
            .map(|(idx, c)| (CommandId(idx), c))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(crate::settings::DEFAULT_MARKER)
    }
}
