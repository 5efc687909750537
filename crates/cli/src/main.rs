mod builtin;
mod manifest;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use litargs::{Execution, Litargs, OptionArgs, ParseResult};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::manifest::{DEFAULT_MANIFEST_NAME, load_manifest, write_default_manifest};

/// Exit status when the argument line did not parse cleanly.
const INVALID_INPUT_STATUS: i32 = 2;

#[derive(Parser)]
#[command(name = "litargs")]
#[command(version, about = "Declarative argument matching and dispatch", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a litargs.json with an example command
    Init(InitArgs),

    /// Parse an argument line against a manifest and print the result
    Parse(ParseArgs),

    /// List the commands a manifest defines
    List(ListArgs),

    /// Run a built-in file command (move, mkdir)
    Fs(FsArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Overwrite an existing litargs.json
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the manifest (default: ./litargs.json)
    #[arg(short, long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// The argument line: command name followed by its arguments
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Parser)]
struct ListArgs {
    /// Path to the manifest (default: ./litargs.json)
    #[arg(short, long, value_name = "FILE")]
    manifest: Option<PathBuf>,
}

#[derive(Parser)]
struct FsArgs {
    /// The argument line, e.g. `move a.txt b.txt --cp`
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Parse(args) => parse(args),
        Commands::List(args) => list(args),
        Commands::Fs(args) => fs_command(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    if dir.join(DEFAULT_MANIFEST_NAME).exists() && !args.force {
        bail!("{DEFAULT_MANIFEST_NAME} already exists in {}", dir.display());
    }

    let path = write_default_manifest(&dir, args.force)?;
    eprintln!("Created: {}", path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {DEFAULT_MANIFEST_NAME} to describe your commands");
    eprintln!("  2. Run: litargs parse move a.txt b.txt --cp");

    Ok(())
}

fn load_parser(manifest: Option<&std::path::Path>) -> Result<Litargs> {
    let Some(loaded) = load_manifest(manifest)? else {
        bail!("no {DEFAULT_MANIFEST_NAME} found; run `litargs init` or pass --manifest");
    };
    loaded
        .manifest
        .build_parser()
        .with_context(|| format!("invalid manifest: {}", loaded.path.display()))
}

fn parse(args: ParseArgs) -> Result<()> {
    tracing::debug!("executing parse command");

    let mut cli = load_parser(args.manifest.as_deref())?;
    let result = cli.parse_args(&args.args);

    if args.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print_summary(result);
    }

    if !cli.is_valid() {
        eprint!("{}", cli.help());
        std::process::exit(INVALID_INPUT_STATUS);
    }
    Ok(())
}

fn print_summary(result: &ParseResult) {
    if let Some(command) = &result.command {
        println!("command: {} [{}]", command.name, command.args.join(", "));
    }
    for option in &result.options {
        match &option.args {
            OptionArgs::Values(values) => println!("option:  {} [{}]", option.name, values.join(", ")),
            OptionArgs::Flag(set) => println!("option:  {} = {set}", option.name),
        }
    }
    for error in &result.errors {
        println!("error:   {error}");
    }
}

fn list(args: ListArgs) -> Result<()> {
    tracing::debug!("executing list command");

    let cli = load_parser(args.manifest.as_deref())?;
    print!("{}", cli.help());
    Ok(())
}

fn fs_command(args: FsArgs) -> Result<()> {
    tracing::debug!("executing fs command");

    let mut cli = builtin::file_commands().context("failed to register file commands")?;
    cli.parse_args(&args.args);

    if cli.execute()? == Execution::Help && !cli.is_valid() {
        std::process::exit(INVALID_INPUT_STATUS);
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
