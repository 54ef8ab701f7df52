//! Block-mosaic pixelation over a region.

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::types::{PixelateParams, Region};

use super::composite::blend_masked;
use super::mask::mask_window;

/// Pixelate the part of `image` under `region`, composited through the shape mask.
///
/// The region is shrunk to `max(1, w / block) x max(1, h / block)` with a
/// linear filter, then blown back up with nearest-neighbour so each source
/// sample becomes a visible block. A non-positive `block_size`, a degenerate
/// region, or a region that misses the image all yield an unchanged copy.
pub fn apply_pixelate(image: &RgbImage, region: Region, params: &PixelateParams) -> RgbImage {
    if params.block_size <= 0 {
        tracing::trace!("Pixelate block size {} disables the effect", params.block_size);
        return image.clone();
    }
    let Some(clip) = region.clip(image.width(), image.height()) else {
        tracing::trace!("Pixelate region {:?} has nothing to draw", region);
        return image.clone();
    };

    let block = params.block_size as u32;
    let small_w = (clip.width / block).max(1);
    let small_h = (clip.height / block).max(1);

    let roi = imageops::crop_imm(image, clip.x, clip.y, clip.width, clip.height).to_image();
    let small = imageops::resize(&roi, small_w, small_h, FilterType::Triangle);
    let blocky = imageops::resize(&small, clip.width, clip.height, FilterType::Nearest);
    let mask = mask_window(region.width as u32, region.height as u32, &clip, params.shape);

    blend_masked(image, &blocky, &clip, &mask)
}
