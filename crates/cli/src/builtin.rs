//! File commands behind `litargs fs`.

use anyhow::{Context, bail};
use litargs::{DefinitionError, Description, Litargs, OptionArgs, OptionValues};
use std::fs;

fn flag(options: &OptionValues, name: &str) -> bool {
    options.get(name).is_some_and(OptionArgs::is_set)
}

pub fn file_commands() -> Result<Litargs, DefinitionError> {
    let mut cli = Litargs::new();

    cli.command(
        "move",
        2,
        Description::new("Move a file").args(["source", "destination"]),
    )?
    .alias("m")?
    .option("cp", 0, Description::new("copy instead of renaming"))?
    .handler(|args, options| {
        let (source, destination) = (&args[0], &args[1]);
        if source.is_empty() || destination.is_empty() {
            bail!("move needs both a source and a destination");
        }
        if flag(options, "cp") {
            fs::copy(source, destination)
                .with_context(|| format!("failed to copy {source} to {destination}"))?;
            tracing::info!(%source, %destination, "copied");
        } else {
            fs::rename(source, destination)
                .with_context(|| format!("failed to move {source} to {destination}"))?;
            tracing::info!(%source, %destination, "moved");
        }
        Ok(())
    })?;

    cli.command("mkdir", 1, Description::new("Create a directory").args(["dir"]))?
        .option("parents", 0, Description::new("create missing parent directories"))?
        .handler(|args, options| {
            let dir = &args[0];
            if dir.is_empty() {
                bail!("mkdir needs a directory");
            }
            let created = if flag(options, "parents") {
                fs::create_dir_all(dir)
            } else {
                fs::create_dir(dir)
            };
            created.with_context(|| format!("failed to create directory: {dir}"))?;
            tracing::info!(%dir, "created");
            Ok(())
        })?;

    Ok(cli)
}
