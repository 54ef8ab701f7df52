//! Wire-level directives and their resolution into typed effects.
//!
//! Directives arrive as loosely-shaped JSON objects. Each object is parsed on
//! its own so one malformed entry only drops itself, then its effect string
//! and parameter map are resolved against [`EffectDefaults`] into an
//! [`Effect`]. Everything that can go wrong here is a [`DirectiveError`],
//! which the pipeline logs and skips.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EffectDefaults;
use crate::error::DirectiveError;
use crate::types::{BlurParams, Effect, PixelateParams, Region, Shape, StickerParams};

/// Optional effect parameters as sent by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticker_id: Option<String>,
}

/// One directive object as sent by the client.
///
/// Selection-mode directives carry `index`; manual-mode directives carry
/// `x`, `y`, `width` and `height`. `type` is accepted in place of `effect`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDirective {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(alias = "type", skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<RawParams>,
}

impl RawDirective {
    /// Manual-mode directive with explicit coordinates.
    pub fn manual(region: Region, effect: &str, params: RawParams) -> Self {
        Self {
            x: Some(region.x),
            y: Some(region.y),
            width: Some(region.width),
            height: Some(region.height),
            effect: Some(effect.to_string()),
            params: Some(params),
            ..Self::default()
        }
    }

    /// Selection-mode directive referencing a detection.
    pub fn select(index: i64, effect: &str, params: RawParams) -> Self {
        Self {
            index: Some(index),
            effect: Some(effect.to_string()),
            params: Some(params),
            ..Self::default()
        }
    }

    /// Explicit region, or the first missing coordinate field.
    pub fn region(&self, position: usize) -> Result<Region, DirectiveError> {
        let require = |value: Option<i32>, field: &'static str| {
            value.ok_or(DirectiveError::MissingField { position, field })
        };
        Ok(Region::new(
            require(self.x, "x")?,
            require(self.y, "y")?,
            require(self.width, "width")?,
            require(self.height, "height")?,
        ))
    }

    /// Resolve the effect string and parameters, filling gaps from `defaults`.
    pub fn resolve_effect(
        &self,
        position: usize,
        defaults: &EffectDefaults,
    ) -> Result<Effect, DirectiveError> {
        let effect = self
            .effect
            .as_deref()
            .ok_or(DirectiveError::MissingField {
                position,
                field: "effect",
            })?;
        let params = self.params.clone().unwrap_or_default();
        let shape = params
            .shape
            .as_deref()
            .map(Shape::parse)
            .unwrap_or(defaults.shape);

        match effect.trim().to_lowercase().as_str() {
            "blur" => Ok(Effect::Blur(BlurParams {
                intensity: params.intensity.unwrap_or(defaults.blur_intensity),
                shape,
            })),
            "pixelate" => Ok(Effect::Pixelate(PixelateParams {
                block_size: params.block_size.unwrap_or(defaults.pixelate_block_size),
                shape,
            })),
            "sticker" => Ok(Effect::Sticker(StickerParams {
                sticker_id: params
                    .sticker_id
                    .unwrap_or_else(|| defaults.sticker_id.clone()),
            })),
            "none" => Ok(Effect::None),
            _ => Err(DirectiveError::UnknownEffect {
                position,
                effect: effect.to_string(),
            }),
        }
    }
}

/// An ordered list of directives, each parsed independently.
#[derive(Debug, Clone, Default)]
pub struct DirectiveList {
    entries: Vec<Result<RawDirective, DirectiveError>>,
}

impl DirectiveList {
    /// Parse a JSON array of directive objects.
    ///
    /// Fails only if the document is not a JSON array; individual entries that
    /// do not fit the directive shape become [`DirectiveError::Malformed`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let values: Vec<Value> = serde_json::from_str(json)?;
        Ok(Self::from_values(values))
    }

    /// Parse already-decoded JSON values.
    pub fn from_values(values: Vec<Value>) -> Self {
        let entries = values
            .into_iter()
            .enumerate()
            .map(|(position, value)| {
                serde_json::from_value::<RawDirective>(value).map_err(|e| {
                    DirectiveError::Malformed {
                        position,
                        message: e.to_string(),
                    }
                })
            })
            .collect();
        Self { entries }
    }

    /// Number of directives received, including malformed ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in arrival order with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Result<RawDirective, DirectiveError>)> {
        self.entries.iter().enumerate()
    }
}

impl From<Vec<RawDirective>> for DirectiveList {
    fn from(directives: Vec<RawDirective>) -> Self {
        Self {
            entries: directives.into_iter().map(Ok).collect(),
        }
    }
}
