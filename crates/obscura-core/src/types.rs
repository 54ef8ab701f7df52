//! Core data types for the Obscura compositing pipeline.
//!
//! These types describe what to apply (regions, effects) and the audit record
//! of what was applied.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in source-image pixel coordinates.
///
/// Coordinates are signed so that regions hanging off the top/left edge can be
/// represented and clipped rather than rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// The part of a [`Region`] that overlaps the image.
///
/// `offset_x`/`offset_y` locate the clipped rectangle inside the requested
/// region, so masks built at the requested size can be sampled correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clip {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl Region {
    /// Create a new region.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A region with a non-positive side is never processed.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether the region lies entirely inside a `width`x`height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = i64::from(self.x) + i64::from(self.width);
        let bottom = i64::from(self.y) + i64::from(self.height);
        self.x >= 0 && self.y >= 0 && right <= i64::from(width) && bottom <= i64::from(height)
    }

    /// Intersect the region with a `width`x`height` image.
    ///
    /// Returns `None` for degenerate regions and regions that miss the image.
    pub fn clip(&self, width: u32, height: u32) -> Option<Clip> {
        if self.is_degenerate() {
            return None;
        }
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        let left = x.max(0);
        let top = y.max(0);
        let right = (x + i64::from(self.width)).min(i64::from(width));
        let bottom = (y + i64::from(self.height)).min(i64::from(height));
        if right <= left || bottom <= top {
            return None;
        }
        Some(Clip {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
            offset_x: (left - x) as u32,
            offset_y: (top - y) as u32,
        })
    }
}

/// A rectangle reported by the external detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(flatten)]
    pub region: Region,

    /// Detector class label ("face", "person", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Detection {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            label: None,
        }
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Mask shape for blur and pixelate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Whole rectangle is replaced
    #[default]
    Squared,
    /// Only the inscribed ellipse is replaced; corners keep the original
    Rounded,
}

impl Shape {
    /// Parse a shape name. Anything other than `rounded` is `squared`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "rounded" => Self::Rounded,
            "squared" => Self::Squared,
            other => {
                tracing::debug!("Unrecognized shape '{other}', using squared");
                Self::Squared
            }
        }
    }
}

/// Resolved blur parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlurParams {
    /// Gaussian sigma in pixels; `<= 0` is an identity blur
    pub intensity: i32,
    pub shape: Shape,
}

/// Resolved pixelation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelateParams {
    /// Edge length of one output block in pixels; `<= 0` disables the effect
    pub block_size: i32,
    pub shape: Shape,
}

/// Resolved sticker parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerParams {
    /// Asset identifier resolved by the asset provider
    pub sticker_id: String,
}

/// One effect kind with its strongly-typed parameters.
///
/// Serialized adjacently tagged: `{"kind":"blur","params":{"intensity":10,"shape":"squared"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "params", rename_all = "lowercase")]
pub enum Effect {
    Blur(BlurParams),
    Pixelate(PixelateParams),
    Sticker(StickerParams),
    /// Deliberate skip; valid but never recorded
    None,
}

impl Effect {
    /// Lowercase effect name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Blur(_) => "blur",
            Effect::Pixelate(_) => "pixelate",
            Effect::Sticker(_) => "sticker",
            Effect::None => "none",
        }
    }
}

/// Audit entry for one executed directive (including recorded no-ops).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRecord {
    /// Detection index in selection mode, input position in manual mode
    pub region_index: usize,

    /// Region as requested, before any clipping
    pub coordinates: Region,

    /// Effect with its resolved parameters
    pub effect: Effect,
}

/// Audit record for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// Dimensions of the decoded source image
    #[serde(rename = "original_image_size")]
    pub original_size: ImageSize,

    /// Number of directives received, valid or not
    pub input_region_count: usize,

    /// Records in the order they were applied
    pub applied: Vec<AppliedRecord>,
}

impl ProcessingMetadata {
    pub(crate) fn new(original_size: ImageSize, input_region_count: usize) -> Self {
        Self {
            original_size,
            input_region_count,
            applied: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, record: AppliedRecord) {
        self.applied.push(record);
    }
}
