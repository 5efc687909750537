use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, ErrorPiece};

/// Options folded by name, later occurrences overwriting earlier ones.
pub type OptionValues = IndexMap<String, OptionArgs>;

/// A matched name and the values assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsePiece<T> {
    pub name: String,
    pub args: T,
}

impl<T> ParsePiece<T> {
    pub fn new(name: impl Into<String>, args: T) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Values of one option occurrence.
///
/// Valued options always carry exactly their arity of entries (short supplies
/// are padded with empty strings). `Flag(true)` marks a known flag,
/// `Flag(false)` an option the command does not define.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionArgs {
    Values(Vec<String>),
    Flag(bool),
}

impl OptionArgs {
    pub fn values(&self) -> Option<&[String]> {
        match self {
            Self::Values(v) => Some(v),
            Self::Flag(_) => None,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::Flag(true))
    }
}

/// Everything one parse call produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<ParsePiece<Vec<String>>>,
    #[serde(default)]
    pub options: Vec<ParsePiece<OptionArgs>>,
    #[serde(default)]
    pub errors: Vec<ErrorPiece>,
}

impl ParseResult {
    pub(crate) fn failed(error: ErrorPiece) -> Self {
        Self {
            command: None,
            options: Vec::new(),
            errors: vec![error],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn command_name(&self) -> Option<&str> {
        self.command.as_ref().map(|c| c.name.as_str())
    }

    /// Positional values of the command, empty when no command resolved.
    pub fn positional(&self) -> &[String] {
        self.command
            .as_ref()
            .map(|c| c.args.as_slice())
            .unwrap_or(&[])
    }

    pub fn errors_of(&self, kind: ErrorKind) -> impl Iterator<Item = &ErrorPiece> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }

    /// Fold option pieces into a name map. Repeated names keep the last value.
    pub fn options_by_name(&self) -> OptionValues {
        self.options
            .iter()
            .map(|p| (p.name.clone(), p.args.clone()))
            .collect()
    }
}
