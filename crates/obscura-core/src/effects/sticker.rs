//! Sticker overlay over a region.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

use crate::assets::{load_or_default, AssetProvider};
use crate::types::{Clip, Region, StickerParams};

/// Stretch a sticker over `region` and blend it by its own alpha channel.
///
/// The sticker is resized to the region's size, ignoring aspect ratio. Only
/// the part of the sticker that lands on the image is resampled, so regions
/// hanging far off the image cost no more than the visible window. Mask shapes
/// do not apply here: the sticker's transparency alone decides what shows
/// through. A missing or broken asset is replaced with the default sticker.
/// Degenerate or off-image regions yield an unchanged copy.
pub fn apply_sticker(
    image: &RgbImage,
    region: Region,
    params: &StickerParams,
    assets: &dyn AssetProvider,
) -> RgbImage {
    let Some(clip) = region.clip(image.width(), image.height()) else {
        tracing::trace!("Sticker region {:?} has nothing to draw", region);
        return image.clone();
    };

    let sticker = load_or_default(assets, &params.sticker_id);
    let (sticker_w, sticker_h) = sticker.dimensions();
    if sticker_w == 0 || sticker_h == 0 {
        tracing::warn!("Sticker '{}' is empty, skipping", params.sticker_id);
        return image.clone();
    }

    let (src_x, src_w) = source_span(clip.offset_x, clip.width, region.width as u32, sticker_w);
    let (src_y, src_h) = source_span(clip.offset_y, clip.height, region.height as u32, sticker_h);
    let visible = imageops::crop_imm(&sticker, src_x, src_y, src_w, src_h).to_image();
    let patch = imageops::resize(&visible, clip.width, clip.height, FilterType::Lanczos3);

    let mut canvas = DynamicImage::ImageRgb8(crop(image, &clip)).into_rgba8();
    imageops::overlay(&mut canvas, &patch, 0, 0);

    let mut out = image.clone();
    imageops::replace(
        &mut out,
        &DynamicImage::ImageRgba8(canvas).into_rgb8(),
        i64::from(clip.x),
        i64::from(clip.y),
    );
    out
}

fn crop(image: &RgbImage, clip: &Clip) -> RgbImage {
    imageops::crop_imm(image, clip.x, clip.y, clip.width, clip.height).to_image()
}

/// Source pixels behind `len` region pixels starting at `offset`, as `(start, len)`.
///
/// Rounded outward and never empty. A window covering the whole region maps
/// to the whole sticker.
fn source_span(offset: u32, len: u32, region_len: u32, source_len: u32) -> (u32, u32) {
    let scale = f64::from(source_len) / f64::from(region_len);
    let start = (f64::from(offset) * scale).floor() as u32;
    let end = ((f64::from(offset) + f64::from(len)) * scale).ceil() as u32;
    let start = start.min(source_len - 1);
    let end = end.clamp(start + 1, source_len);
    (start, end - start)
}
