//! Token-to-slot matching.
//!
//! After the command name, the argument tokens are cut into runs: a new run
//! starts at every marker token, and the values before the first marker form
//! the positional run. Run membership is fixed before any option is looked
//! up, so an option never steals values across a marker and a value never
//! moves from one run to another.

use std::collections::HashSet;

use crate::error::ErrorPiece;
use crate::registry::{CommandSpec, Registry};
use crate::result::{OptionArgs, ParsePiece, ParseResult};
use crate::settings::{DuplicatePolicy, OrphanPolicy, Settings};
use crate::tokenizer::{Token, Tokens, tokenize};

/// Values following one marker token, up to the next marker.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Run<'a> {
    marker: &'a str,
    values: Vec<&'a str>,
}

/// Split tokens into the positional run and the marker runs, in order.
fn partition<'a>(tokens: &[Token<'a>]) -> (Vec<&'a str>, Vec<Run<'a>>) {
    let mut leading = Vec::new();
    let mut runs: Vec<Run<'a>> = Vec::new();

    for token in tokens {
        match *token {
            Token::Marker(marker) => runs.push(Run {
                marker,
                values: Vec::new(),
            }),
            Token::Value(value) => match runs.last_mut() {
                Some(run) => run.values.push(value),
                None => leading.push(value),
            },
        }
    }

    (leading, runs)
}

/// Take at most `arity` values and pad the rest with empty strings.
fn fill(values: &[&str], arity: usize) -> Vec<String> {
    let mut out: Vec<String> = values.iter().take(arity).map(|v| v.to_string()).collect();
    out.resize(arity, String::new());
    out
}

/// The bare option name of a marker token (one or two markers stripped).
fn strip_marker(token: &str, marker: char) -> &str {
    let once = token.strip_prefix(marker).unwrap_or(token);
    once.strip_prefix(marker).unwrap_or(once)
}

/// Tokenize and match `raw` against `registry`.
pub fn match_line(registry: &Registry, settings: &Settings, raw: &str) -> ParseResult {
    let tokens = tokenize(raw, settings.marker);
    match_tokens(registry, settings, &tokens)
}

pub fn match_tokens(registry: &Registry, settings: &Settings, tokens: &Tokens<'_>) -> ParseResult {
    if tokens.command.is_empty() {
        return ParseResult::failed(ErrorPiece::reference(None, "Nothing specified"));
    }
    let Some(id) = registry.resolve(tokens.command) else {
        tracing::debug!(command = tokens.command, "unknown command");
        return ParseResult::failed(ErrorPiece::reference(
            Some(tokens.command),
            format!("No defined command '{}'", tokens.command),
        ));
    };
    let command = registry.command(id);

    let (leading, runs) = partition(&tokens.rest);
    tracing::trace!(
        command = command.name(),
        positional = leading.len(),
        runs = runs.len(),
        "partitioned tokens"
    );

    let mut errors = Vec::new();
    let positional = match_positional(command, &leading, &mut errors);
    let options = match_options(command, settings, &runs, &mut errors);

    ParseResult {
        command: Some(ParsePiece::new(command.name(), positional)),
        options,
        errors,
    }
}

fn match_positional(
    command: &CommandSpec,
    leading: &[&str],
    errors: &mut Vec<ErrorPiece>,
) -> Vec<String> {
    let arity = command.arity();
    if leading.len() > arity {
        errors.push(ErrorPiece::argument(
            command.name(),
            format!(
                "Too many arguments for command '{}', expected {} argument(s), have {}",
                command.name(),
                arity,
                leading.len()
            ),
        ));
    }
    fill(leading, arity)
}

fn match_options(
    command: &CommandSpec,
    settings: &Settings,
    runs: &[Run<'_>],
    errors: &mut Vec<ErrorPiece>,
) -> Vec<ParsePiece<OptionArgs>> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut pieces = Vec::with_capacity(runs.len());

    for run in runs {
        let Some(option) = command.option_by_token(run.marker) else {
            errors.push(ErrorPiece::reference(
                Some(run.marker),
                format!("No defined {} option '{}'", command.name(), run.marker),
            ));
            pieces.push(ParsePiece::new(
                strip_marker(run.marker, settings.marker),
                OptionArgs::Flag(false),
            ));
            continue;
        };

        if !seen.insert(option.actual_name()) && settings.duplicates == DuplicatePolicy::Report {
            errors.push(ErrorPiece::duplicate(
                run.marker,
                format!("Duplicate {} option '{}'", command.name(), run.marker),
            ));
        }

        let args = if option.is_flag() {
            if !run.values.is_empty() && settings.orphans == OrphanPolicy::Reject {
                errors.push(ErrorPiece::argument(
                    run.marker,
                    format!(
                        "Unexpected argument(s) for flag '{}': {}",
                        run.marker,
                        run.values.join(", ")
                    ),
                ));
            }
            OptionArgs::Flag(true)
        } else {
            // Values past the option's arity are dropped without an error.
            OptionArgs::Values(fill(&run.values, option.arity()))
        };
        tracing::trace!(option = option.name(), ?args, "matched option");
        pieces.push(ParsePiece::new(option.name(), args));
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::registry::Description;

    fn registry() -> Registry {
        let mut r = Registry::default();
        r.register_command(
            "move",
            2,
            Description::new("Move a file").args(["source", "destination"]),
        )
        .unwrap();
        r.register_alias("m").unwrap();
        r.register_option("cp", 0, Description::new("copy")).unwrap();
        r.register_option("mode", 2, Description::new("mode").args(["user", "group"]))
            .unwrap();
        r
    }

    fn parse(raw: &str) -> ParseResult {
        match_line(&registry(), &Settings::default(), raw)
    }

    fn values(v: &[&str]) -> OptionArgs {
        OptionArgs::Values(v.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn partition_splits_on_markers() {
        let tokens = tokenize("x a b -o c --f d e", '-');
        let (leading, runs) = partition(&tokens.rest);
        assert_eq!(leading, ["a", "b"]);
        assert_eq!(
            runs,
            vec![
                Run {
                    marker: "-o",
                    values: vec!["c"]
                },
                Run {
                    marker: "--f",
                    values: vec!["d", "e"]
                },
            ]
        );
    }

    #[test]
    fn flag_yields_true() {
        let r = parse("move a.txt b.txt --cp");
        assert!(r.is_valid());
        assert_eq!(r.positional(), ["a.txt", "b.txt"]);
        assert_eq!(r.options, vec![ParsePiece::new("cp", OptionArgs::Flag(true))]);
    }

    #[test]
    fn short_positional_supply_is_padded() {
        let r = parse("move a.txt");
        assert!(r.is_valid());
        assert_eq!(r.positional(), ["a.txt", ""]);
        let r = parse("move");
        assert_eq!(r.positional(), ["", ""]);
    }

    #[test]
    fn excess_positional_is_truncated_with_error() {
        let r = parse("move a b c d");
        assert_eq!(r.positional(), ["a", "b"]);
        let errs: Vec<_> = r.errors_of(ErrorKind::ArgumentError).collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(
            errs[0].detail,
            "Too many arguments for command 'move', expected 2 argument(s), have 4"
        );
    }

    #[test]
    fn option_values_are_padded_and_bounded() {
        let r = parse("move a b -mode rw");
        assert!(r.is_valid());
        assert_eq!(r.options[0], ParsePiece::new("mode", values(&["rw", ""])));

        // Extra values inside the run are dropped silently.
        let r = parse("move a b -mode rw ro x y");
        assert!(r.is_valid());
        assert_eq!(r.options[0].args, values(&["rw", "ro"]));
    }

    #[test]
    fn option_does_not_cross_a_marker() {
        let r = parse("move a b -mode u --cp");
        assert!(r.is_valid());
        assert_eq!(r.options[0].args, values(&["u", ""]));
        assert_eq!(r.options[1].args, OptionArgs::Flag(true));
    }

    #[test]
    fn unknown_option_is_reference_error() {
        let r = parse("move a b --nope -x 1");
        assert_eq!(r.options[0], ParsePiece::new("nope", OptionArgs::Flag(false)));
        assert_eq!(r.options[1], ParsePiece::new("x", OptionArgs::Flag(false)));
        let errs: Vec<_> = r.errors_of(ErrorKind::ReferenceError).collect();
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[0].detail, "No defined move option '--nope'");
        assert_eq!(errs[1].target.as_deref(), Some("-x"));
    }

    #[test]
    fn wrong_prefix_form_is_unknown() {
        // Flags use the long form, valued options the short one.
        let r = parse("move a b -cp --mode x y");
        assert_eq!(r.errors_of(ErrorKind::ReferenceError).count(), 2);
        assert_eq!(r.options[0].args, OptionArgs::Flag(false));
        assert_eq!(r.options[1].name, "mode");
    }

    #[test]
    fn unknown_command() {
        let r = parse("nosuch x");
        assert!(r.command.is_none());
        assert!(r.options.is_empty());
        assert_eq!(r.errors.len(), 1);
        assert_eq!(r.errors[0].kind, ErrorKind::ReferenceError);
        assert_eq!(r.errors[0].detail, "No defined command 'nosuch'");
    }

    #[test]
    fn blank_input_is_nothing_specified() {
        let r = parse("  ");
        assert!(r.command.is_none());
        assert_eq!(r.errors.len(), 1);
        assert_eq!(r.errors[0].detail, "Nothing specified");
        assert!(r.errors[0].target.is_none());
    }

    #[test]
    fn command_match_is_case_sensitive() {
        assert!(!parse("Move a b").is_valid());
        assert!(!parse("mov a b").is_valid());
    }

    #[test]
    fn alias_resolves_to_canonical_name() {
        let r = parse("m a b --cp");
        assert!(r.is_valid());
        assert_eq!(r.command_name(), Some("move"));
    }

    #[test]
    fn duplicates_are_reported_by_default() {
        let r = parse("move a b --cp --cp -mode u g -mode x y");
        let dups: Vec<_> = r.errors_of(ErrorKind::DuplicateError).collect();
        assert_eq!(dups.len(), 2);
        assert_eq!(dups[0].detail, "Duplicate move option '--cp'");
        assert_eq!(dups[1].target.as_deref(), Some("-mode"));
        // Every occurrence keeps its piece.
        assert_eq!(r.options.len(), 4);
    }

    #[test]
    fn duplicates_can_be_accepted() {
        let settings = Settings::default().duplicates(DuplicatePolicy::LastWins);
        let r = match_line(&registry(), &settings, "move a b -mode u g -mode x y");
        assert!(r.is_valid());
        assert_eq!(r.options_by_name()["mode"], values(&["x", "y"]));
    }

    #[test]
    fn repeated_unknown_options_are_not_duplicates() {
        let r = parse("move a b --zz --zz");
        assert_eq!(r.errors_of(ErrorKind::DuplicateError).count(), 0);
        assert_eq!(r.errors_of(ErrorKind::ReferenceError).count(), 2);
    }

    #[test]
    fn values_after_flag_are_rejected_by_default() {
        let r = parse("move a b --cp stray more");
        let errs: Vec<_> = r.errors_of(ErrorKind::ArgumentError).collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(
            errs[0].detail,
            "Unexpected argument(s) for flag '--cp': stray, more"
        );
        assert_eq!(r.options[0].args, OptionArgs::Flag(true));
        // Never reassigned to positional slots.
        assert_eq!(r.positional(), ["a", "b"]);
    }

    #[test]
    fn values_after_flag_can_be_ignored() {
        let settings = Settings::default().orphans(OrphanPolicy::Ignore);
        let r = match_line(&registry(), &settings, "move a --cp b");
        assert!(r.is_valid());
        assert_eq!(r.positional(), ["a", ""]);
        assert_eq!(r.options[0].args, OptionArgs::Flag(true));
    }

    #[test]
    fn bare_marker_is_unknown_option() {
        let r = parse("move a b -");
        assert_eq!(r.options[0], ParsePiece::new("", OptionArgs::Flag(false)));
        assert_eq!(r.errors_of(ErrorKind::ReferenceError).count(), 1);
    }

    #[test]
    fn help_takes_no_arguments() {
        let r = parse("help");
        assert!(r.is_valid());
        assert!(r.positional().is_empty());
        assert!(!parse("help move").is_valid());
    }

    #[test]
    fn strip_marker_removes_at_most_two() {
        assert_eq!(strip_marker("--cp", '-'), "cp");
        assert_eq!(strip_marker("-x", '-'), "x");
        assert_eq!(strip_marker("---x", '-'), "-x");
    }
}
