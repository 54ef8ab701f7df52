//! Encoding the final composited image.

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::Path;

use crate::config::OutputConfig;
use crate::error::PipelineError;

/// Output encodings. PNG is the lossless default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodedFormat {
    #[default]
    Png,
    Jpeg,
    /// Lossless WebP
    WebP,
    Bmp,
}

impl EncodedFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::parse)
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::WebP => "webp",
            Self::Bmp => "bmp",
        }
    }
}

/// Encodes RGB buffers into the configured format.
pub struct ImageEncoder {
    format: EncodedFormat,
    jpeg_quality: u8,
}

impl ImageEncoder {
    /// Create an encoder. `jpeg_quality` only matters for JPEG output.
    pub fn new(format: EncodedFormat, jpeg_quality: u8) -> Self {
        Self {
            format,
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    /// Create an encoder from the `[output]` config section.
    ///
    /// An unparseable format falls back to PNG; `Config::validate` already
    /// rejects those when loading from disk.
    pub fn from_config(config: &OutputConfig) -> Self {
        let format = EncodedFormat::parse(&config.image_format).unwrap_or_default();
        Self::new(format, config.jpeg_quality)
    }

    /// The format this encoder produces.
    pub fn format(&self) -> EncodedFormat {
        self.format
    }

    /// Encode `image` to bytes.
    pub fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, PipelineError> {
        let mut buffer = Cursor::new(Vec::new());
        let result = match self.format {
            EncodedFormat::Png => image.write_to(&mut buffer, ImageFormat::Png),
            EncodedFormat::WebP => image.write_to(&mut buffer, ImageFormat::WebP),
            EncodedFormat::Bmp => image.write_to(&mut buffer, ImageFormat::Bmp),
            EncodedFormat::Jpeg => {
                JpegEncoder::new_with_quality(&mut buffer, self.jpeg_quality).encode_image(image)
            }
        };
        result.map_err(|e| PipelineError::Encode {
            format: self.format.as_str().to_string(),
            message: e.to_string(),
        })?;
        Ok(buffer.into_inner())
    }
}
