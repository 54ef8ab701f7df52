//! Pipeline orchestration: plan the directives, run the handlers, keep the audit.
//!
//! A run moves through `Loaded -> Processing(i) -> Done`, or stops at `Failed`
//! when the source cannot be decoded. Only decoding can fail; every other
//! problem drops a single directive with a warning.

use image::RgbImage;
use std::time::Instant;

use crate::assets::{AssetProvider, DirectoryAssets};
use crate::config::{Config, EffectDefaults, RegionPolicy};
use crate::directive::DirectiveList;
use crate::effects::{apply_blur, apply_pixelate, apply_sticker};
use crate::error::{DirectiveError, PipelineResult};
use crate::types::{AppliedRecord, Detection, Effect, ImageSize, ProcessingMetadata, Region};

use super::decode::ImageDecoder;
use super::validate::Validator;

/// What to apply, and how regions are addressed.
#[derive(Debug, Clone)]
pub enum EffectRequest {
    /// Directives reference `detections` by index and run in index order.
    Selection {
        detections: Vec<Detection>,
        directives: DirectiveList,
    },
    /// Directives carry their own coordinates and run in arrival order.
    Manual { directives: DirectiveList },
}

impl EffectRequest {
    /// Number of directives received, valid or not.
    pub fn directive_count(&self) -> usize {
        match self {
            Self::Selection { directives, .. } | Self::Manual { directives } => directives.len(),
        }
    }
}

/// One validated directive, ready to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    /// Position in the request
    pub position: usize,
    /// Detection index (selection) or position (manual)
    pub region_index: usize,
    pub region: Region,
    pub effect: Effect,
}

/// Validated, ordered steps plus everything that was dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub steps: Vec<PlannedStep>,
    pub skipped: Vec<DirectiveError>,
}

/// Final image plus the audit record of a successful run.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub image: RgbImage,
    pub metadata: ProcessingMetadata,
    /// Directives dropped during the run, in the order they were found
    pub skipped: Vec<DirectiveError>,
}

/// Applies region effects to images.
///
/// Holds no per-run state, so one compositor can serve many runs, including
/// concurrent ones on different threads.
pub struct RegionCompositor {
    defaults: EffectDefaults,
    policy: RegionPolicy,
    decoder: ImageDecoder,
    validator: Validator,
    assets: Box<dyn AssetProvider>,
}

impl RegionCompositor {
    /// Create a compositor that loads stickers from the configured directory.
    pub fn new(config: &Config) -> Self {
        Self::with_assets(config, Box::new(DirectoryAssets::from_config(config)))
    }

    /// Create a compositor with a custom sticker source.
    pub fn with_assets(config: &Config, assets: Box<dyn AssetProvider>) -> Self {
        Self {
            defaults: config.effects.clone(),
            policy: config.regions.policy,
            decoder: ImageDecoder::new(config.limits.clone()),
            validator: Validator::new(config.limits.clone()),
            assets,
        }
    }

    /// Decode `bytes` and apply `request`.
    ///
    /// Fails only if the bytes are not a decodable image within limits; in
    /// that case nothing is produced.
    pub fn process_bytes(
        &self,
        bytes: &[u8],
        request: &EffectRequest,
    ) -> PipelineResult<ProcessOutput> {
        let start = Instant::now();
        let decoded = self
            .validator
            .validate_bytes(bytes)
            .and_then(|()| self.decoder.decode_bytes(bytes))
            .inspect_err(|e| tracing::error!("Failed to load source image: {e}"))?;
        tracing::debug!(
            "Loaded {:?} source {}x{} in {:?}",
            decoded.format,
            decoded.width,
            decoded.height,
            start.elapsed()
        );

        Ok(self.run(decoded.image, request))
    }

    /// Apply `request` to an already-decoded image.
    ///
    /// `image` is only read; the result is a new buffer.
    pub fn process_image(&self, image: &RgbImage, request: &EffectRequest) -> ProcessOutput {
        self.run(image.clone(), request)
    }

    /// Validate and order the directives of `request` for an image of `size`.
    pub fn plan(&self, request: &EffectRequest, size: ImageSize) -> Plan {
        let mut plan = match request {
            EffectRequest::Selection {
                detections,
                directives,
            } => self.plan_selection(detections, directives),
            EffectRequest::Manual { directives } => self.plan_manual(directives),
        };
        if self.policy == RegionPolicy::Reject {
            self.reject_out_of_bounds(&mut plan, size);
        }
        for reason in &plan.skipped {
            tracing::warn!("Skipping {reason}");
        }
        plan
    }

    fn run(&self, source: RgbImage, request: &EffectRequest) -> ProcessOutput {
        let start = Instant::now();
        let size = ImageSize {
            width: source.width(),
            height: source.height(),
        };
        let plan = self.plan(request, size);
        let mut metadata = ProcessingMetadata::new(size, request.directive_count());

        let mut current = source;
        for (i, step) in plan.steps.into_iter().enumerate() {
            let step_start = Instant::now();
            current = match &step.effect {
                Effect::Blur(params) => apply_blur(&current, step.region, params),
                Effect::Pixelate(params) => apply_pixelate(&current, step.region, params),
                Effect::Sticker(params) => {
                    apply_sticker(&current, step.region, params, self.assets.as_ref())
                }
                Effect::None => continue,
            };
            tracing::trace!(
                "  Step {} ({} on #{}): {:?}",
                i,
                step.effect.name(),
                step.region_index,
                step_start.elapsed()
            );
            metadata.record(AppliedRecord {
                region_index: step.region_index,
                coordinates: step.region,
                effect: step.effect,
            });
        }

        tracing::debug!(
            "Applied {} of {} directive(s) in {:?}",
            metadata.applied.len(),
            metadata.input_region_count,
            start.elapsed()
        );

        ProcessOutput {
            image: current,
            metadata,
            skipped: plan.skipped,
        }
    }

    fn plan_selection(&self, detections: &[Detection], directives: &DirectiveList) -> Plan {
        let mut plan = Plan::default();
        for (position, entry) in directives.iter() {
            let step = entry.clone().and_then(|raw| {
                let index = raw.index.ok_or(DirectiveError::MissingField {
                    position,
                    field: "index",
                })?;
                let detection = usize::try_from(index)
                    .ok()
                    .and_then(|i| detections.get(i).map(|d| (i, d)));
                let Some((region_index, detection)) = detection else {
                    return Err(DirectiveError::IndexOutOfRange {
                        position,
                        index,
                        available: detections.len(),
                    });
                };
                let effect = raw.resolve_effect(position, &self.defaults)?;
                Ok(PlannedStep {
                    position,
                    region_index,
                    region: detection.region,
                    effect,
                })
            });
            push_step(&mut plan, step);
        }
        // Stable: equal indices keep arrival order, so the later one paints last.
        plan.steps.sort_by_key(|step| step.region_index);
        plan
    }

    fn plan_manual(&self, directives: &DirectiveList) -> Plan {
        let mut plan = Plan::default();
        for (position, entry) in directives.iter() {
            let step = entry.clone().and_then(|raw| {
                let region = raw.region(position)?;
                let effect = raw.resolve_effect(position, &self.defaults)?;
                Ok(PlannedStep {
                    position,
                    region_index: position,
                    region,
                    effect,
                })
            });
            push_step(&mut plan, step);
        }
        plan
    }

    fn reject_out_of_bounds(&self, plan: &mut Plan, size: ImageSize) {
        let (kept, rejected): (Vec<_>, Vec<_>) =
            std::mem::take(&mut plan.steps).into_iter().partition(|step| {
                step.region.is_degenerate() || step.region.fits_within(size.width, size.height)
            });
        plan.steps = kept;
        plan.skipped.extend(rejected.into_iter().map(|step| {
            DirectiveError::OutOfBounds {
                position: step.position,
                x: step.region.x,
                y: step.region.y,
                width: step.region.width,
                height: step.region.height,
                image_width: size.width,
                image_height: size.height,
            }
        }));
    }
}

/// Keep a resolved step unless it is a deliberate `none`; collect failures.
fn push_step(plan: &mut Plan, step: Result<PlannedStep, DirectiveError>) {
    match step {
        Ok(step) if step.effect == Effect::None => {
            tracing::debug!("Directive #{} has effect 'none', skipping", step.position);
        }
        Ok(step) => plan.steps.push(step),
        Err(reason) => plan.skipped.push(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::{RawDirective, RawParams};
    use crate::types::{BlurParams, Shape};
    use image::Rgb;

    fn compositor(config: &Config) -> RegionCompositor {
        let dir = std::env::temp_dir().join("obscura-processor-tests-missing");
        RegionCompositor::with_assets(config, Box::new(DirectoryAssets::new(dir)))
    }

    fn detections() -> Vec<Detection> {
        vec![
            Detection::new(Region::new(0, 0, 10, 10)),
            Detection::new(Region::new(10, 10, 10, 10)),
        ]
    }

    fn size() -> ImageSize {
        ImageSize {
            width: 30,
            height: 30,
        }
    }

    #[test]
    fn test_selection_plan_sorted_by_index_stable() {
        let directives = DirectiveList::from(vec![
            RawDirective::select(1, "pixelate", RawParams::default()),
            RawDirective::select(0, "blur", RawParams::default()),
            RawDirective::select(1, "sticker", RawParams::default()),
            RawDirective::select(0, "pixelate", RawParams::default()),
        ]);
        let request = EffectRequest::Selection {
            detections: detections(),
            directives,
        };
        let plan = compositor(&Config::default()).plan(&request, size());

        let order: Vec<(usize, &str)> = plan
            .steps
            .iter()
            .map(|s| (s.region_index, s.effect.name()))
            .collect();
        assert_eq!(
            order,
            vec![(0, "blur"), (0, "pixelate"), (1, "pixelate"), (1, "sticker")]
        );
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn test_selection_plan_drops_bad_indices() {
        let directives = DirectiveList::from(vec![
            RawDirective::select(99, "blur", RawParams::default()),
            RawDirective::select(-1, "blur", RawParams::default()),
            RawDirective {
                effect: Some("blur".to_string()),
                ..RawDirective::default()
            },
        ]);
        let request = EffectRequest::Selection {
            detections: detections(),
            directives,
        };
        let plan = compositor(&Config::default()).plan(&request, size());
        assert!(plan.steps.is_empty());
        assert_eq!(plan.skipped.len(), 3);
        assert!(matches!(
            plan.skipped[0],
            DirectiveError::IndexOutOfRange { index: 99, .. }
        ));
        assert!(matches!(
            plan.skipped[1],
            DirectiveError::IndexOutOfRange { index: -1, .. }
        ));
        assert!(matches!(
            plan.skipped[2],
            DirectiveError::MissingField { field: "index", .. }
        ));
    }

    #[test]
    fn test_manual_plan_keeps_order_and_drops_none_silently() {
        let directives = DirectiveList::from(vec![
            RawDirective::manual(Region::new(5, 5, 5, 5), "sticker", RawParams::default()),
            RawDirective::manual(Region::new(0, 0, 5, 5), "none", RawParams::default()),
            RawDirective::manual(Region::new(0, 0, 5, 5), "blur", RawParams::default()),
        ]);
        let request = EffectRequest::Manual { directives };
        let plan = compositor(&Config::default()).plan(&request, size());

        let positions: Vec<usize> = plan.steps.iter().map(|s| s.region_index).collect();
        assert_eq!(positions, vec![0, 2]);
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn test_reject_policy_skips_out_of_bounds_but_keeps_degenerate() {
        let mut config = Config::default();
        config.regions.policy = RegionPolicy::Reject;
        let directives = DirectiveList::from(vec![
            RawDirective::manual(Region::new(25, 25, 10, 10), "blur", RawParams::default()),
            RawDirective::manual(Region::new(40, 40, 0, 10), "blur", RawParams::default()),
            RawDirective::manual(Region::new(0, 0, 30, 30), "blur", RawParams::default()),
        ]);
        let request = EffectRequest::Manual { directives };
        let plan = compositor(&config).plan(&request, size());

        let positions: Vec<usize> = plan.steps.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2]);
        assert!(matches!(
            plan.skipped[0],
            DirectiveError::OutOfBounds { position: 0, .. }
        ));
    }

    #[test]
    fn test_run_records_resolved_parameters() {
        let image = RgbImage::from_fn(30, 30, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 0]));
        let params = RawParams {
            intensity: Some(2),
            shape: Some("rounded".to_string()),
            ..RawParams::default()
        };
        let request = EffectRequest::Manual {
            directives: DirectiveList::from(vec![RawDirective::manual(
                Region::new(3, 4, 12, 12),
                "blur",
                params,
            )]),
        };
        let output = compositor(&Config::default()).process_image(&image, &request);

        assert_eq!(output.metadata.input_region_count, 1);
        assert_eq!(
            output.metadata.applied,
            vec![AppliedRecord {
                region_index: 0,
                coordinates: Region::new(3, 4, 12, 12),
                effect: Effect::Blur(BlurParams {
                    intensity: 2,
                    shape: Shape::Rounded
                }),
            }]
        );
    }
}
