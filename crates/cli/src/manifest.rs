use anyhow::{Context, Result, bail};
use litargs::{Description, Litargs, Settings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST_NAME: &str = "litargs.json";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// Command definitions loaded from `litargs.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,

    #[serde(default)]
    pub commands: Vec<CommandEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEntry {
    pub name: String,
    /// Positional arity.
    #[serde(default)]
    pub arguments: usize,
    #[serde(default)]
    pub description: Description,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionEntry {
    pub name: String,
    /// `0` makes the option a flag.
    #[serde(default)]
    pub arguments: usize,
    #[serde(default)]
    pub description: Description,
}

impl Manifest {
    /// The `move` example written by `litargs init`.
    pub fn example() -> Self {
        Self {
            schema_version: Some(MANIFEST_SCHEMA_VERSION),
            settings: None,
            commands: vec![CommandEntry {
                name: "move".to_string(),
                arguments: 2,
                description: Description::new("Move a file").args(["source", "destination"]),
                aliases: vec!["m".to_string()],
                options: vec![OptionEntry {
                    name: "cp".to_string(),
                    arguments: 0,
                    description: Description::new("copy"),
                }],
            }],
        }
    }

    /// Register every command of the manifest on a fresh parser.
    pub fn build_parser(&self) -> Result<Litargs> {
        if let Some(version) = self.schema_version {
            if version != MANIFEST_SCHEMA_VERSION {
                bail!(
                    "unsupported manifest schemaVersion {version} (expected {MANIFEST_SCHEMA_VERSION})"
                );
            }
        }

        let mut cli = Litargs::with_settings(self.settings.unwrap_or_default());
        for entry in &self.commands {
            cli.command(&entry.name, entry.arguments, entry.description.clone())
                .with_context(|| format!("invalid command '{}'", entry.name))?;
            for alias in &entry.aliases {
                cli.alias(alias)
                    .with_context(|| format!("invalid alias '{alias}' for '{}'", entry.name))?;
            }
            for option in &entry.options {
                cli.option(&option.name, option.arguments, option.description.clone())
                    .with_context(|| {
                        format!("invalid option '{}' for '{}'", option.name, entry.name)
                    })?;
            }
        }
        tracing::debug!(commands = self.commands.len(), "built parser from manifest");
        Ok(cli)
    }
}

#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub path: PathBuf,
    pub manifest: Manifest,
}

/// Load `manifest_path`, or `litargs.json` in the current directory.
///
/// A missing default manifest is `Ok(None)`; a missing explicit one is an error.
pub fn load_manifest(manifest_path: Option<&Path>) -> Result<Option<LoadedManifest>> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let (path, explicit) = match manifest_path {
        Some(p) => (resolve_against(&cwd, p), true),
        None => (cwd.join(DEFAULT_MANIFEST_NAME), false),
    };

    if !path.exists() {
        if explicit {
            bail!("manifest not found: {}", path.display());
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse manifest JSON: {}", path.display()))?;

    Ok(Some(LoadedManifest { path, manifest }))
}

/// Write the example manifest into `project_dir`, leaving an existing one
/// alone unless `overwrite` is set.
pub fn write_default_manifest(project_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = project_dir.join(DEFAULT_MANIFEST_NAME);
    if dest.exists() && !overwrite {
        return Ok(dest);
    }

    let bytes =
        serde_json::to_vec_pretty(&Manifest::example()).context("failed to serialize manifest")?;
    let mut out = String::from_utf8(bytes).context("manifest is not valid UTF-8")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
