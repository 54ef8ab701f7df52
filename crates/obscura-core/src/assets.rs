//! Sticker asset loading with a generated fallback.
//!
//! The sticker handler talks to an [`AssetProvider`]; [`DirectoryAssets`] is
//! the stock implementation that resolves ids against a directory. When a
//! load fails for any reason, [`load_or_default`] substitutes
//! [`default_sticker`], which is rebuilt on every call.

use image::{Rgba, RgbaImage};
use std::path::{Component, Path, PathBuf};

use crate::config::Config;
use crate::error::AssetError;

/// Edge length of the generated default sticker.
pub const DEFAULT_STICKER_SIZE: u32 = 100;

const STICKER_FILL: Rgba<u8> = Rgba([255, 255, 0, 255]);
const STICKER_OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 255]);
const OUTLINE_WIDTH: f64 = 1.0;

/// Something that can turn a sticker id into an RGBA image.
///
/// `Send + Sync` so one provider can back compositors on several threads.
pub trait AssetProvider: Send + Sync {
    /// Load the sticker named `id`.
    fn load(&self, id: &str) -> Result<RgbaImage, AssetError>;
}

/// Resolves sticker ids as relative paths under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    /// Create a provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a provider rooted at the configured sticker directory.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sticker_dir())
    }

    /// Map an id to a path, refusing anything that could leave the root.
    fn resolve(&self, id: &str) -> Result<PathBuf, AssetError> {
        let relative = Path::new(id);
        let is_plain = !id.trim().is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !is_plain {
            return Err(AssetError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl AssetProvider for DirectoryAssets {
    fn load(&self, id: &str) -> Result<RgbaImage, AssetError> {
        let path = self.resolve(id)?;
        if !path.is_file() {
            return Err(AssetError::NotFound(id.to_string()));
        }
        let image = image::open(&path).map_err(|e| AssetError::Decode {
            id: id.to_string(),
            message: e.to_string(),
        })?;
        Ok(image.to_rgba8())
    }
}

/// Load `id` from `provider`, falling back to the default sticker on failure.
pub fn load_or_default(provider: &dyn AssetProvider, id: &str) -> RgbaImage {
    match provider.load(id) {
        Ok(sticker) => sticker,
        Err(e) => {
            tracing::warn!("Could not load sticker '{id}', using default: {e}");
            default_sticker()
        }
    }
}

/// A 100x100 transparent canvas with a yellow disc and a black 1px rim.
pub fn default_sticker() -> RgbaImage {
    let size = DEFAULT_STICKER_SIZE;
    let radius = size as f64 / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f64 + 0.5 - radius;
        let dy = y as f64 + 0.5 - radius;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > radius {
            Rgba([0, 0, 0, 0])
        } else if distance > radius - OUTLINE_WIDTH {
            STICKER_OUTLINE
        } else {
            STICKER_FILL
        }
    })
}
