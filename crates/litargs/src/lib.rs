//! Declarative command registration, argument matching and dispatch.
//!
//! A [`Litargs`] instance owns a registry of commands. Each command has a
//! fixed positional arity and a table of options, each with its own arity
//! (arity `0` makes a boolean flag). A raw argument line is tokenized,
//! matched against the resolved command and turned into a [`ParseResult`],
//! which [`Litargs::execute`] then routes to the command's handler.
//!
//! ```
//! use litargs::{Description, Litargs, OptionArgs};
//!
//! let mut cli = Litargs::new();
//! cli.command("move", 2, Description::new("Move a file").args(["source", "destination"]))?
//!     .alias("m")?
//!     .option("cp", 0, Description::new("copy"))?;
//!
//! let result = cli.parse("m a.txt b.txt --cp");
//! assert!(result.is_valid());
//! assert_eq!(result.positional(), ["a.txt", "b.txt"]);
//! assert_eq!(result.options[0].args, OptionArgs::Flag(true));
//! # Ok::<(), litargs::DefinitionError>(())
//! ```
//!
//! Parse problems are never raised: they are collected as [`ErrorPiece`]s and
//! make [`Litargs::execute`] render help instead of calling a handler.
//! Registration mistakes are programmer errors and fail fast with
//! [`DefinitionError`].

pub mod error;
pub mod help;
pub mod matcher;
pub mod parser;
pub mod registry;
pub mod result;
pub mod settings;
pub mod tokenizer;

pub use error::{DefinitionError, ErrorKind, ErrorPiece};
pub use parser::{Execution, Litargs};
pub use registry::{
    CommandId, CommandSpec, Definition, Description, Handler, OptionSpec, Registry,
};
pub use result::{OptionArgs, OptionValues, ParsePiece, ParseResult};
pub use settings::{DuplicatePolicy, OrphanPolicy, Settings};
