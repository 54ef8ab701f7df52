//! Sub-configuration structs with their defaults.

use crate::types::Shape;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-effect parameter defaults, applied when a directive omits a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectDefaults {
    /// Gaussian sigma used when a blur directive has no `intensity`
    pub blur_intensity: i32,

    /// Block edge used when a pixelate directive has no `block_size`
    pub pixelate_block_size: i32,

    /// Mask shape used when blur/pixelate directives have no `shape`
    pub shape: Shape,

    /// Asset id used when a sticker directive has no `sticker_id`
    pub sticker_id: String,
}

impl Default for EffectDefaults {
    fn default() -> Self {
        Self {
            blur_intensity: 10,
            pixelate_block_size: 10,
            shape: Shape::Squared,
            sticker_id: "default_sticker.png".to_string(),
        }
    }
}

/// Sticker asset location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory sticker ids are resolved against
    pub sticker_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            sticker_dir: PathBuf::from("~/.obscura/stickers"),
        }
    }
}

/// How regions that cross the image border are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionPolicy {
    /// Process only the part of the region that overlaps the image
    #[default]
    Clamp,
    /// Skip (with a warning) any region not fully inside the image
    Reject,
}

/// Region handling settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionsConfig {
    /// Out-of-bounds policy
    pub policy: RegionPolicy,
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum encoded input size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,

    /// Wall-clock budget for one run, enforced by the caller
    pub process_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 10000,
            process_timeout_ms: 30000,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Encoded image format: "png", "jpeg", "webp" or "bmp"
    pub image_format: String,

    /// JPEG quality (1-100), ignored for other formats
    pub jpeg_quality: u8,

    /// Metadata format ("json" or "jsonl")
    pub metadata_format: String,

    /// Pretty-print JSON metadata
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_format: "png".to_string(),
            jpeg_quality: 90,
            metadata_format: "json".to_string(),
            pretty: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
