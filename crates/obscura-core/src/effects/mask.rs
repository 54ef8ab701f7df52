//! Alpha masks for region shapes.

use image::{GrayImage, Luma};

use crate::types::{Clip, Shape};

/// Fully opaque mask value.
pub const OPAQUE: u8 = 255;

/// Fully transparent mask value.
pub const TRANSPARENT: u8 = 0;

/// Build a `width`x`height` mask for `shape`.
///
/// `Squared` is opaque everywhere. `Rounded` is opaque only for pixels whose
/// centre falls inside the ellipse inscribed in the box, so the four corners
/// stay transparent. The mask is binary; there is no anti-aliased edge.
pub fn make_mask(width: u32, height: u32, shape: Shape) -> GrayImage {
    let whole = Clip {
        x: 0,
        y: 0,
        width,
        height,
        offset_x: 0,
        offset_y: 0,
    };
    mask_window(width, height, &whole, shape)
}

/// The part of a `region_width`x`region_height` mask that `clip` covers.
///
/// The result is `clip.width`x`clip.height`; the ellipse test still runs in
/// the requested region's coordinates, so memory scales with the visible
/// area only.
pub fn mask_window(region_width: u32, region_height: u32, clip: &Clip, shape: Shape) -> GrayImage {
    match shape {
        Shape::Squared => GrayImage::from_pixel(clip.width, clip.height, Luma([OPAQUE])),
        Shape::Rounded => {
            let rx = f64::from(region_width) / 2.0;
            let ry = f64::from(region_height) / 2.0;
            GrayImage::from_fn(clip.width, clip.height, |x, y| {
                let dx = (f64::from(clip.offset_x + x) + 0.5 - rx) / rx;
                let dy = (f64::from(clip.offset_y + y) + 0.5 - ry) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    Luma([OPAQUE])
                } else {
                    Luma([TRANSPARENT])
                }
            })
        }
    }
}
