use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Registration-time misuse. These are programmer mistakes, so every
/// registration call returns them immediately instead of collecting them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Redefinition of command '{0}'")]
    DuplicateCommand(String),

    #[error("Redefinition of option '{option}' on command '{command}'")]
    DuplicateOption { command: String, option: String },

    #[error("Name '{name}' must not start with the option marker '{marker}'")]
    ReservedPrefix { name: String, marker: char },

    #[error("Invalid name '{0}': names must be non-empty and contain no whitespace")]
    InvalidName(String),

    #[error("'{name}' declares {arity} argument(s) but describes {labels}")]
    ArityMismatch {
        name: String,
        arity: usize,
        labels: usize,
    },

    #[error("No command is specified for {0}")]
    NoFocusedCommand(String),

    #[error("Registration is closed once parsing has started")]
    RegistrationClosed,
}

/// Classification of a parse-time problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// An unknown command or option name was referenced.
    ReferenceError,
    /// More positional values than the command declares, or values attached
    /// to a flag.
    ArgumentError,
    /// The same option appeared more than once in one invocation.
    DuplicateError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReferenceError => "ReferenceError",
            Self::ArgumentError => "ArgumentError",
            Self::DuplicateError => "DuplicateError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One collected parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPiece {
    pub kind: ErrorKind,
    /// The command name or option token the error is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub detail: String,
}

impl ErrorPiece {
    pub fn new(kind: ErrorKind, target: Option<&str>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.map(str::to_string),
            detail: detail.into(),
        }
    }

    pub fn reference(target: Option<&str>, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReferenceError, target, detail)
    }

    pub fn argument(target: &str, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ArgumentError, Some(target), detail)
    }

    pub fn duplicate(target: &str, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateError, Some(target), detail)
    }
}

impl fmt::Display for ErrorPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}
