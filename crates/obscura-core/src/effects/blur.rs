//! Gaussian blur over a region.

use image::{imageops, RgbImage};

use crate::types::{BlurParams, Region};

use super::composite::blend_masked;
use super::mask::mask_window;

/// Blur the part of `image` under `region`, composited through the shape mask.
///
/// `intensity` is the Gaussian sigma, capped at the longer side of the visible
/// crop. A non-positive intensity, a degenerate region, or a region that
/// misses the image all yield an unchanged copy.
pub fn apply_blur(image: &RgbImage, region: Region, params: &BlurParams) -> RgbImage {
    if params.intensity <= 0 {
        tracing::trace!("Blur intensity {} is an identity blur", params.intensity);
        return image.clone();
    }
    let Some(clip) = region.clip(image.width(), image.height()) else {
        tracing::trace!("Blur region {:?} has nothing to draw", region);
        return image.clone();
    };

    // A sigma wider than the crop adds nothing visible but grows the kernel.
    let sigma = (params.intensity as u32).min(clip.width.max(clip.height));
    let roi = imageops::crop_imm(image, clip.x, clip.y, clip.width, clip.height).to_image();
    let blurred = imageops::blur(&roi, sigma as f32);
    let mask = mask_window(region.width as u32, region.height as u32, &clip, params.shape);

    blend_masked(image, &blurred, &clip, &mask)
}
