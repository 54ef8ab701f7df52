//! Image decoding with format detection and dimension limits.

use image::{ImageFormat, ImageReader, RgbImage};
use std::io::Cursor;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Image decoder with configurable limits.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// Opaque RGB working buffer
    pub image: RgbImage,
    /// Detected source format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode an in-memory image and convert it to RGB.
    ///
    /// Any alpha channel in the source is dropped; compositing always works on
    /// an opaque buffer.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<DecodedImage, PipelineError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = reader
            .format()
            .ok_or_else(|| PipelineError::UnsupportedFormat {
                format: "unknown".to_string(),
            })?;
        let decoded = reader.decode().map_err(|e| PipelineError::Decode {
            message: e.to_string(),
        })?;

        let (width, height) = (decoded.width(), decoded.height());
        if width > self.limits.max_image_dimension || height > self.limits.max_image_dimension {
            return Err(PipelineError::ImageTooLarge {
                width,
                height,
                max_dim: self.limits.max_image_dimension,
            });
        }
        tracing::trace!("Decoded {:?} image {}x{}", format, width, height);

        Ok(DecodedImage {
            image: decoded.to_rgb8(),
            format,
            width,
            height,
        })
    }
}
