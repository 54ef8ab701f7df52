//! Region effect handlers.
//!
//! Every handler is a pure function of the form
//! `(&RgbImage, Region, &Params) -> RgbImage`: it never touches its input and
//! always returns a fresh buffer, even when the effect is a no-op.
//!
//! - **mask**: alpha masks for squared and rounded regions
//! - **composite**: blending a patch back through a mask or its own alpha
//! - **blur**: Gaussian blur
//! - **pixelate**: downsample/upsample block mosaic
//! - **sticker**: RGBA asset overlay with default-sticker fallback

pub mod blur;
pub mod composite;
pub mod mask;
pub mod pixelate;
pub mod sticker;

// Re-exports for convenient access
pub use blur::apply_blur;
pub use mask::make_mask;
pub use pixelate::apply_pixelate;
pub use sticker::apply_sticker;
