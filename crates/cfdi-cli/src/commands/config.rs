//! Config command - inspect and edit the classifier configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;
use tracing::debug;

use cfdi_core::models::config::ClassifierConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Where to write the file (default: user config directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value, e.g. `layout.error_dir`
    Get {
        /// Dotted key path
        key: String,
    },

    /// Change one value, e.g. `placement.preserve_timestamps false`
    Set {
        /// Dotted key path
        key: String,
        /// New value (JSON, or a plain string)
        value: String,
    },

    /// Print the configuration file location
    Path,
}

pub async fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let path = default_config_path();

    match args.command {
        ConfigCommand::Show => {
            if !path.exists() {
                println!(
                    "{} No config file at {}, showing defaults.",
                    style("ℹ").blue(),
                    path.display()
                );
            }
            println!("{}", serde_json::to_string_pretty(&read_or_default(&path)?)?);
        }
        ConfigCommand::Init { output, force } => init(output.unwrap_or(path), force)?,
        ConfigCommand::Get { key } => {
            let tree = serde_json::to_value(read_or_default(&path)?)?;
            let value = lookup(&tree, &key)
                .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?;
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        ConfigCommand::Set { key, value } => set(&path, &key, &value)?,
        ConfigCommand::Path => {
            println!("Configuration file: {}", path.display());
            if path.exists() {
                println!("Status: {}", style("exists").green());
            } else {
                println!("Status: {}", style("not created").yellow());
                println!();
                println!("Run 'cfdi config init' to create one.");
            }
        }
    }

    Ok(())
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cfdi")
        .join("config.json")
}

/// Load the configuration used by the classify and inspect commands.
///
/// An explicit path must exist; otherwise the default file is used when
/// present, falling back to built-in defaults.
pub fn load(config_path: Option<&str>) -> anyhow::Result<ClassifierConfig> {
    match config_path {
        Some(path) => ClassifierConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path, e)),
        None => read_or_default(&default_config_path()),
    }
}

fn read_or_default(path: &Path) -> anyhow::Result<ClassifierConfig> {
    if path.exists() {
        debug!("Using config from {}", path.display());
        Ok(ClassifierConfig::from_file(path)?)
    } else {
        Ok(ClassifierConfig::default())
    }
}

fn init(output: PathBuf, force: bool) -> anyhow::Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output.display()
        );
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    ClassifierConfig::default().save(&output)?;

    println!("{} Created configuration file at {}", style("✓").green(), output.display());
    Ok(())
}

fn set(path: &Path, key: &str, raw: &str) -> anyhow::Result<()> {
    // Accept JSON literals (true, 3, "x"); anything else is a plain string.
    let value: Value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

    let mut tree = serde_json::to_value(read_or_default(path)?)?;
    let slot = lookup_mut(&mut tree, key)
        .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?;
    *slot = value.clone();

    let config: ClassifierConfig = serde_json::from_value(tree)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!("{} Set {} = {}", style("✓").green(), key, value);
    Ok(())
}

/// Follow a dotted key path through a JSON tree.
fn lookup<'a>(tree: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(tree, |node, part| node.get(part))
}

fn lookup_mut<'a>(tree: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    key.split('.').try_fold(tree, |node, part| node.get_mut(part))
}
