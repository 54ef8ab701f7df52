//! CLI enum types for the apply command: metadata format, image format, region policy.

use clap::ValueEnum;
use obscura_core::{EncodedFormat, OutputFormat as CoreOutputFormat, RegionPolicy};

/// Supported metadata formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON document
    Json,
    /// Summary line, then one applied record per line
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Encodings for the composited image.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ImageFormat {
    /// Lossless PNG (default)
    Png,
    /// JPEG at the configured quality
    Jpeg,
    /// Lossless WebP
    Webp,
    /// Uncompressed BMP
    Bmp,
}

impl From<ImageFormat> for EncodedFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Png => EncodedFormat::Png,
            ImageFormat::Jpeg => EncodedFormat::Jpeg,
            ImageFormat::Webp => EncodedFormat::WebP,
            ImageFormat::Bmp => EncodedFormat::Bmp,
        }
    }
}

/// How regions crossing the image border are handled.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Policy {
    /// Draw the part that overlaps the image
    Clamp,
    /// Skip the directive with a warning
    Reject,
}

impl From<Policy> for RegionPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Clamp => RegionPolicy::Clamp,
            Policy::Reject => RegionPolicy::Reject,
        }
    }
}
