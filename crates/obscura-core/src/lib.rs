//! Obscura Core - Embeddable region effect compositing library.
//!
//! Obscura takes an image plus a list of directives ("blur this rectangle",
//! "pixelate that one", "cover this with a sticker") and returns the
//! composited image together with an audit record of what was applied.
//!
//! # Architecture
//!
//! ```text
//! Bytes → Validate → Decode → Plan directives → Blur/Pixelate/Sticker → Encode
//!                                                         ↓
//!                                                 ProcessingMetadata
//! ```
//!
//! Detection is out of scope: selection-mode callers supply the rectangles a
//! detector found, and directives reference them by index.
//!
//! # Usage
//!
//! ```rust,ignore
//! use obscura_core::{Config, DirectiveList, EffectRequest, RegionCompositor};
//!
//! let config = Config::load()?;
//! let compositor = RegionCompositor::new(&config);
//!
//! let directives = DirectiveList::from_json(
//!     r#"[{"x": 10, "y": 10, "width": 64, "height": 64, "effect": "blur"}]"#,
//! )?;
//! let output = compositor.process_bytes(&bytes, &EffectRequest::Manual { directives })?;
//! println!("Applied {} effect(s)", output.metadata.applied.len());
//! ```

pub mod assets;
pub mod config;
pub mod directive;
pub mod effects;
pub mod error;
pub mod output;
pub mod overlay;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use assets::{AssetProvider, DirectoryAssets};
pub use config::{Config, RegionPolicy};
pub use directive::{DirectiveList, RawDirective, RawParams};
pub use error::{AssetError, ConfigError, DirectiveError, PipelineError, PipelineResult};
pub use output::{OutputFormat, OutputWriter};
pub use overlay::{draw_overlay, OverlayRegion};
pub use pipeline::{EffectRequest, EncodedFormat, ImageEncoder, ProcessOutput, RegionCompositor};
pub use types::{
    AppliedRecord, BlurParams, Detection, Effect, ImageSize, PixelateParams, ProcessingMetadata,
    Region, Shape, StickerParams,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
