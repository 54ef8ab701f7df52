//! Preview of candidate regions before any effect is applied.
//!
//! Each region gets a translucent fill tinted by its intended effect and a
//! solid outline. Text is not drawn; [`listing`] carries the numbers and
//! labels a front-end needs to annotate the preview itself.

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::effects::composite::blend_pixel;
use crate::types::Region;

/// Fill alpha for every region.
pub const FILL_ALPHA: u8 = 100;

/// Outline thickness in pixels.
pub const OUTLINE_WIDTH: u32 = 2;

const BLUR_FILL: Rgb<u8> = Rgb([255, 165, 0]);
const PIXELATE_FILL: Rgb<u8> = Rgb([0, 255, 0]);
const DEFAULT_FILL: Rgb<u8> = Rgb([0, 100, 255]);
const OUTLINE: Rgb<u8> = Rgb([0, 0, 255]);

/// One region to preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayRegion {
    #[serde(flatten)]
    pub region: Region,

    /// Intended effect name; picks the fill tint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Text annotation for one drawn region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayEntry {
    /// 1-based number shown next to the region
    pub number: usize,
    pub region: Region,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn fill_color(effect: Option<&str>) -> Rgb<u8> {
    match effect.map(str::to_lowercase).as_deref() {
        Some("blur") => BLUR_FILL,
        Some("pixelate") => PIXELATE_FILL,
        _ => DEFAULT_FILL,
    }
}

/// Draw all `regions` over a copy of `image`.
///
/// Regions are clipped to the image; degenerate or fully outside regions
/// draw nothing.
pub fn draw_overlay(image: &RgbImage, regions: &[OverlayRegion]) -> RgbImage {
    let mut out = image.clone();
    for overlay in regions {
        let Some(clip) = overlay.region.clip(out.width(), out.height()) else {
            tracing::debug!("Overlay region {:?} is not visible", overlay.region);
            continue;
        };
        let fill = fill_color(overlay.effect.as_deref());
        let (region_w, region_h) = (
            overlay.region.width as u32,
            overlay.region.height as u32,
        );

        for py in 0..clip.height {
            for px in 0..clip.width {
                // Position inside the requested region, not the clipped one.
                let (rx, ry) = (clip.offset_x + px, clip.offset_y + py);
                let on_outline = rx < OUTLINE_WIDTH
                    || ry < OUTLINE_WIDTH
                    || rx + OUTLINE_WIDTH >= region_w
                    || ry + OUTLINE_WIDTH >= region_h;
                let dst = out.get_pixel_mut(clip.x + px, clip.y + py);
                *dst = if on_outline {
                    OUTLINE
                } else {
                    blend_pixel(*dst, fill, FILL_ALPHA)
                };
            }
        }
    }
    out
}

/// Numbered annotations for `regions`, in drawing order.
pub fn listing(regions: &[OverlayRegion]) -> Vec<OverlayEntry> {
    regions
        .iter()
        .enumerate()
        .map(|(i, overlay)| OverlayEntry {
            number: i + 1,
            region: overlay.region,
            label: overlay.label.clone(),
        })
        .collect()
}
