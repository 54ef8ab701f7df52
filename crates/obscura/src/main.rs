//! Obscura CLI - Blur, pixelate, or cover regions of an image.
//!
//! Obscura applies a list of region directives to one image and writes the
//! composited result plus a JSON audit of what was applied. Regions come
//! either from the directives themselves (manual mode) or from a separate
//! list of detected rectangles referenced by index (selection mode).
//!
//! # Usage
//!
//! ```bash
//! # Blur one rectangle
//! obscura apply photo.jpg -d '[{"x":40,"y":30,"width":120,"height":120,"effect":"blur"}]'
//!
//! # Pixelate detector output by index
//! obscura apply photo.jpg --detections faces.json -d '[{"index":0,"effect":"pixelate"}]'
//!
//! # Preview candidate regions
//! obscura overlay photo.jpg --regions faces.json -o preview.png
//!
//! # View configuration
//! obscura config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Obscura - Region effect compositing for images.
#[derive(Parser, Debug)]
#[command(name = "obscura")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply blur, pixelate, or sticker directives to an image
    Apply(cli::apply::ApplyArgs),

    /// Draw candidate regions over an image for review
    Overlay(cli::overlay::OverlayArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match obscura_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `obscura config path`."
            );
            obscura_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Obscura v{}", obscura_core::VERSION);

    match cli.command {
        Commands::Apply(args) => cli::apply::execute(args).await,
        Commands::Overlay(args) => cli::overlay::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply_selection() {
        let cli = Cli::try_parse_from([
            "obscura",
            "apply",
            "in.png",
            "--directives",
            "[]",
            "--detections",
            "faces.json",
            "--region-policy",
            "reject",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Apply(args) => {
                assert_eq!(args.detections.as_deref(), Some("faces.json"));
                assert!(matches!(args.region_policy, Some(cli::apply::Policy::Reject)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
