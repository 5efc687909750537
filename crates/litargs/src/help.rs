//! Help text rendering.
//!
//! Layout, tab separated:
//!
//! ```text
//! move	[source, destination]	Move a file
//! 	Aliases: m
//! 	Options:
//! 		--cp		copy
//! ```

use crate::error::ErrorPiece;
use crate::registry::{CommandSpec, Description, OptionSpec, Registry};

/// Something that can describe itself in the help listing.
pub trait HelpEntry {
    fn help_entry(&self) -> String;
}

fn format_labels(description: &Description) -> String {
    match &description.args {
        Some(labels) if !labels.is_empty() => format!("[{}]", labels.join(", ")),
        _ => String::new(),
    }
}

impl HelpEntry for OptionSpec {
    fn help_entry(&self) -> String {
        let d = &self.definition.description;
        format!("{}\t{}\t{}", self.actual_name(), format_labels(d), d.detail)
    }
}

impl HelpEntry for CommandSpec {
    fn help_entry(&self) -> String {
        let d = &self.definition.description;
        let mut out = format!("{}\t{}\t{}\n", self.name(), format_labels(d), d.detail);

        if !self.aliases().is_empty() {
            out.push_str(&format!("\tAliases: {}\n", self.aliases().join(", ")));
        }

        let mut options = self.options().peekable();
        if options.peek().is_some() {
            out.push_str("\tOptions:\n");
            for option in options {
                out.push_str("\t\t");
                out.push_str(&option.help_entry());
                out.push('\n');
            }
        }
        out
    }
}

/// Render every command once (aliases fold into their command), followed by
/// the given parse errors.
pub fn render(registry: &Registry, errors: &[ErrorPiece]) -> String {
    let mut out: String = registry
        .commands()
        .map(|(_, command)| command.help_entry())
        .collect();

    if !errors.is_empty() {
        out.push_str("\nErrors:\n");
        for error in errors {
            out.push_str(&format!("\t{error}\n"));
        }
    }
    out
}
