//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::output::OutputFormat;
use crate::pipeline::encode::EncodedFormat;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.effects.blur_intensity <= 0 {
            return Err(ConfigError::ValidationError(
                "effects.blur_intensity must be > 0".into(),
            ));
        }
        if self.effects.pixelate_block_size <= 0 {
            return Err(ConfigError::ValidationError(
                "effects.pixelate_block_size must be > 0".into(),
            ));
        }
        if self.effects.sticker_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "effects.sticker_id must not be empty".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.process_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.process_timeout_ms must be > 0".into(),
            ));
        }
        if EncodedFormat::parse(&self.output.image_format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.image_format '{}' is not one of png, jpeg, webp, bmp",
                self.output.image_format
            )));
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(ConfigError::ValidationError(
                "output.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if OutputFormat::parse(&self.output.metadata_format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.metadata_format '{}' is not json or jsonl",
                self.output.metadata_format
            )));
        }
        Ok(())
    }
}
