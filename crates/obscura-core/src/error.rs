//! Error types for the Obscura compositing pipeline.
//!
//! Only [`PipelineError`] aborts a run. [`DirectiveError`] and [`AssetError`]
//! are absorbed inside the pipeline: the first drops a single directive, the
//! second triggers the default sticker.

use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Fatal pipeline errors. Any of these means no image is produced.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Source image could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Source bytes are not a recognized image container
    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },

    /// Source exceeds the byte size limit
    #[error("Image data too large ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge { size_mb: u64, max_mb: u64 },

    /// Image dimensions exceed limit
    #[error("Image too large ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Final image could not be encoded
    #[error("Encode error ({format}): {message}")]
    Encode { format: String, message: String },

    /// Run exceeded the caller's time budget
    #[error("Timeout in {stage} stage after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },
}

/// Reasons a single directive is skipped. Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    /// The directive object did not deserialize at all
    #[error("directive #{position} is malformed: {message}")]
    Malformed { position: usize, message: String },

    /// A required field is absent
    #[error("directive #{position} is missing `{field}`")]
    MissingField {
        position: usize,
        field: &'static str,
    },

    /// Selection index does not name a detection
    #[error("directive #{position} references index {index}, but only {available} detection(s) exist")]
    IndexOutOfRange {
        position: usize,
        index: i64,
        available: usize,
    },

    /// Effect string is not one of blur, pixelate, sticker, none
    #[error("directive #{position} has unknown effect `{effect}`")]
    UnknownEffect { position: usize, effect: String },

    /// Region crosses the image border under the reject policy
    #[error("directive #{position} region {x},{y} {width}x{height} exceeds the {image_width}x{image_height} image")]
    OutOfBounds {
        position: usize,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        image_width: u32,
        image_height: u32,
    },
}

/// Sticker asset load failures. Absorbed by falling back to the default sticker.
#[derive(Error, Debug)]
pub enum AssetError {
    /// No asset exists under this identifier
    #[error("sticker asset not found: {0}")]
    NotFound(String),

    /// Identifier escapes the asset directory or is empty
    #[error("invalid sticker id: {0}")]
    InvalidId(String),

    /// Asset exists but is not a decodable image
    #[error("failed to decode sticker {id}: {message}")]
    Decode { id: String, message: String },
}

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
