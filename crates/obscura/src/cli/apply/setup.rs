//! Apply setup: config overrides, directive and detection loading, output paths.

use obscura_core::{Config, Detection, DirectiveList, EffectRequest, EncodedFormat, ImageEncoder};
use std::io::Read;
use std::path::{Path, PathBuf};

use super::ApplyArgs;

/// Everything the blocking run needs, assembled from args and config.
pub(crate) struct ApplyContext {
    pub config: Config,
    pub request: EffectRequest,
    pub encoder: ImageEncoder,
    pub output_path: PathBuf,
}

/// Validate input, load config and directives, and resolve output settings.
pub(crate) fn setup_apply(args: &ApplyArgs) -> anyhow::Result<ApplyContext> {
    if !args.input.is_file() {
        anyhow::bail!(
            "Input image does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            args.input
        );
    }

    let mut config = Config::load()?;
    if let Some(ref dir) = args.sticker_dir {
        config.assets.sticker_dir = dir.clone();
    }
    if let Some(policy) = args.region_policy {
        config.regions.policy = policy.into();
    }

    let directives = DirectiveList::from_json(&read_json_arg(&args.directives)?)
        .map_err(|e| anyhow::anyhow!("Directives must be a JSON array of objects: {e}"))?;

    let request = match args.detections {
        Some(ref detections) => {
            let detections: Vec<Detection> = serde_json::from_str(&read_json_arg(detections)?)
                .map_err(|e| anyhow::anyhow!("Detections must be a JSON array of rectangles: {e}"))?;
            tracing::debug!(
                "Selection mode: {} directive(s) over {} detection(s)",
                directives.len(),
                detections.len()
            );
            EffectRequest::Selection {
                detections,
                directives,
            }
        }
        None => {
            tracing::debug!("Manual mode: {} directive(s)", directives.len());
            EffectRequest::Manual { directives }
        }
    };

    // Flag beats the output extension, which beats config.
    let format = args
        .image_format
        .map(EncodedFormat::from)
        .or_else(|| args.output.as_deref().and_then(EncodedFormat::from_path))
        .or_else(|| EncodedFormat::parse(&config.output.image_format))
        .unwrap_or_default();
    let encoder = ImageEncoder::new(format, config.output.jpeg_quality);
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input, format));

    Ok(ApplyContext {
        config,
        request,
        encoder,
        output_path,
    })
}

/// Inline JSON, `-` for stdin, or a path to a JSON file.
pub fn read_json_arg(value: &str) -> anyhow::Result<String> {
    let trimmed = value.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return Ok(value.to_string());
    }
    if value == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    std::fs::read_to_string(value)
        .map_err(|e| anyhow::anyhow!("Failed to read JSON from {value:?}: {e}"))
}

/// `photo.jpg` becomes `photo.obscured.png` next to the input.
pub fn default_output_path(input: &Path, format: EncodedFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{stem}.obscured.{}", format.as_str()))
}
