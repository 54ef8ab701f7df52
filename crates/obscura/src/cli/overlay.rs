//! The `obscura overlay` command: preview regions before applying effects.

use clap::Args;
use obscura_core::overlay::{draw_overlay, listing};
use obscura_core::pipeline::{ImageDecoder, Validator};
use obscura_core::{Config, ImageEncoder, OverlayRegion};
use std::path::PathBuf;

use super::apply::ImageFormat;

/// Arguments for the `overlay` command.
#[derive(Args, Debug)]
pub struct OverlayArgs {
    /// Source image
    #[arg(required = true)]
    pub input: PathBuf,

    /// Regions to draw: inline JSON array, a JSON file, or '-' for stdin
    #[arg(short, long)]
    pub regions: String,

    /// Output image
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output image format (defaults to the output extension, then config)
    #[arg(long, value_enum)]
    pub image_format: Option<ImageFormat>,
}

/// Execute the overlay command.
pub async fn execute(args: OverlayArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let regions: Vec<OverlayRegion> =
        serde_json::from_str(&super::apply::read_json_arg(&args.regions)?)
            .map_err(|e| anyhow::anyhow!("Regions must be a JSON array of rectangles: {e}"))?;

    let bytes = tokio::fs::read(&args.input).await?;
    Validator::new(config.limits.clone()).validate_bytes(&bytes)?;
    let decoded = ImageDecoder::new(config.limits.clone()).decode_bytes(&bytes)?;

    let preview = draw_overlay(&decoded.image, &regions);
    let format = args
        .image_format
        .map(obscura_core::EncodedFormat::from)
        .or_else(|| obscura_core::EncodedFormat::from_path(&args.output))
        .unwrap_or_else(|| ImageEncoder::from_config(&config.output).format());
    let encoded = ImageEncoder::new(format, config.output.jpeg_quality).encode(&preview)?;
    tokio::fs::write(&args.output, encoded).await?;
    tracing::info!("Overlay with {} region(s) written to {:?}", regions.len(), args.output);

    println!("{}", serde_json::to_string_pretty(&listing(&regions))?);
    Ok(())
}
