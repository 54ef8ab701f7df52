//! Blending effect output back onto the working image.
//!
//! The base image is copied once and only the pixels covered by the clip
//! rectangle are touched.

use image::{GrayImage, Rgb, RgbImage};

use crate::types::Clip;

/// Blend `patch` onto a copy of `base` at `clip`, weighted by `mask`.
///
/// `patch` and `mask` are both `clip.width`x`clip.height`.
pub fn blend_masked(base: &RgbImage, patch: &RgbImage, clip: &Clip, mask: &GrayImage) -> RgbImage {
    let mut out = base.clone();
    for py in 0..clip.height {
        for px in 0..clip.width {
            let alpha = mask.get_pixel(px, py)[0];
            if alpha == 0 {
                continue;
            }
            let src = patch.get_pixel(px, py);
            let dst = out.get_pixel_mut(clip.x + px, clip.y + py);
            *dst = blend_pixel(*dst, *src, alpha);
        }
    }
    out
}

/// `src` over `dst` with coverage `alpha` (0 keeps `dst`, 255 yields `src`).
pub fn blend_pixel(dst: Rgb<u8>, src: Rgb<u8>, alpha: u8) -> Rgb<u8> {
    let a = u32::from(alpha);
    let inv = 255 - a;
    let mut out = [0u8; 3];
    for (c, value) in out.iter_mut().enumerate() {
        *value = ((u32::from(src[c]) * a + u32::from(dst[c]) * inv + 127) / 255) as u8;
    }
    Rgb(out)
}
