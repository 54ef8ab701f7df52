//! Compositing pipeline stages.
//!
//! - **validate**: Cheap checks on raw bytes before decoding
//! - **decode**: Decode and convert to an RGB working buffer
//! - **processor**: Plan directives and run the effect handlers
//! - **encode**: Encode the final image

pub mod decode;
pub mod encode;
pub mod processor;
pub mod validate;

pub use decode::{DecodedImage, ImageDecoder};
pub use encode::{EncodedFormat, ImageEncoder};
pub use processor::{EffectRequest, Plan, PlannedStep, ProcessOutput, RegionCompositor};
pub use validate::Validator;
