//! The `obscura config` command for configuration management.

use clap::{Args, Subcommand};
use obscura_core::Config;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,

    /// Show config file path
    Path,

    /// Write a default config file and create the sticker directory
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let path = Config::default_path();
            let config = Config::load()?;
            println!("{}", render(&config, &path)?);
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            let config = init_at(&path, Config::default(), force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
            println!("Put sticker images in: {}", config.sticker_dir().display());
        }
    }

    Ok(())
}

/// TOML for `config`, headed by where it was (or would be) loaded from.
fn render(config: &Config, path: &Path) -> anyhow::Result<String> {
    let origin = if path.exists() {
        format!("# Loaded from {}", path.display())
    } else {
        format!("# Defaults ({} does not exist)", path.display())
    };
    Ok(format!("{origin}\n\n{}", config.to_toml()?))
}

/// Write `config` to `path` and create its sticker directory.
fn init_at(path: &Path, config: Config, force: bool) -> anyhow::Result<Config> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, config.to_toml()?)?;

    let sticker_dir = config.sticker_dir();
    if let Err(e) = std::fs::create_dir_all(&sticker_dir) {
        tracing::warn!("Could not create sticker directory {:?}: {e}", sticker_dir);
    }
    Ok(config)
}
