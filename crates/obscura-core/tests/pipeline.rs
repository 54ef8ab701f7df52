//! End-to-end behaviour of the compositing pipeline.

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::time::{Duration, Instant};
use tempfile::TempDir;

use obscura_core::effects::{apply_blur, apply_pixelate};
use obscura_core::{
    AppliedRecord, BlurParams, Config, Detection, DirectiveList, DirectoryAssets, Effect,
    EffectRequest, PipelineError, PixelateParams, RawDirective, RawParams, Region,
    RegionCompositor, Shape, StickerParams,
};

fn checkerboard(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if (x / 2 + y / 2) % 2 == 0 {
            Rgb([240, 240, 240])
        } else {
            Rgb([20, 40, 60])
        }
    })
}

fn compositor_with_stickers(dir: &TempDir) -> RegionCompositor {
    RegionCompositor::with_assets(&Config::default(), Box::new(DirectoryAssets::new(dir.path())))
}

fn compositor() -> RegionCompositor {
    let missing = std::env::temp_dir().join("obscura-integration-no-stickers");
    RegionCompositor::with_assets(&Config::default(), Box::new(DirectoryAssets::new(missing)))
}

fn manual(directives: Vec<RawDirective>) -> EffectRequest {
    EffectRequest::Manual {
        directives: DirectiveList::from(directives),
    }
}

fn params_with_shape(shape: &str) -> RawParams {
    RawParams {
        shape: Some(shape.to_string()),
        ..RawParams::default()
    }
}

fn png_bytes(image: &RgbImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

fn crop(image: &RgbImage, region: Region) -> RgbImage {
    imageops::crop_imm(
        image,
        region.x as u32,
        region.y as u32,
        region.width as u32,
        region.height as u32,
    )
    .to_image()
}

#[test]
fn test_zero_directives_is_identity() {
    let image = checkerboard(40, 30);
    let output = compositor().process_image(&image, &manual(vec![]));
    assert_eq!(output.image, image);
    assert!(output.metadata.applied.is_empty());
    assert_eq!(output.metadata.input_region_count, 0);
    assert_eq!(output.metadata.original_size.width, 40);
    assert_eq!(output.metadata.original_size.height, 30);
}

#[test]
fn test_squared_blur_replaces_whole_region() {
    let image = checkerboard(40, 40);
    let region = Region::new(8, 6, 20, 16);
    let output = compositor().process_image(
        &image,
        &manual(vec![RawDirective::manual(region, "blur", RawParams::default())]),
    );

    let expected = imageops::blur(&crop(&image, region), 10.0);
    assert_eq!(crop(&output.image, region), expected);

    // Outside the region nothing moves.
    assert_eq!(output.image.get_pixel(0, 0), image.get_pixel(0, 0));
    assert_eq!(output.image.get_pixel(39, 39), image.get_pixel(39, 39));
}

#[test]
fn test_squared_pixelate_replaces_whole_region() {
    let image = checkerboard(40, 40);
    let region = Region::new(4, 4, 20, 20);
    let params = RawParams {
        block_size: Some(5),
        ..RawParams::default()
    };
    let output = compositor().process_image(
        &image,
        &manual(vec![RawDirective::manual(region, "pixelate", params)]),
    );

    let small = imageops::resize(&crop(&image, region), 4, 4, FilterType::Triangle);
    let expected = imageops::resize(&small, 20, 20, FilterType::Nearest);
    assert_eq!(crop(&output.image, region), expected);
}

#[test]
fn test_rounded_keeps_corners_and_changes_centre() {
    let image = checkerboard(40, 40);
    let region = Region::new(0, 0, 40, 40);

    for effect in ["blur", "pixelate"] {
        let output = compositor().process_image(
            &image,
            &manual(vec![RawDirective::manual(
                region,
                effect,
                params_with_shape("rounded"),
            )]),
        );
        for (x, y) in [(0, 0), (39, 0), (0, 39), (39, 39)] {
            assert_eq!(
                output.image.get_pixel(x, y),
                image.get_pixel(x, y),
                "{effect} touched corner ({x},{y})"
            );
        }
        assert_ne!(
            crop(&output.image, Region::new(15, 15, 10, 10)),
            crop(&image, Region::new(15, 15, 10, 10)),
            "{effect} left the centre untouched"
        );
    }
}

#[test]
fn test_selection_later_directive_wins_and_both_recorded() {
    let dir = TempDir::new().unwrap();
    RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]))
        .save(dir.path().join("red.png"))
        .unwrap();
    RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255]))
        .save(dir.path().join("blue.png"))
        .unwrap();

    let sticker = |id: &str| RawParams {
        sticker_id: Some(id.to_string()),
        ..RawParams::default()
    };
    let region = Region::new(5, 5, 10, 10);
    let request = EffectRequest::Selection {
        detections: vec![Detection::new(region)],
        directives: DirectiveList::from(vec![
            RawDirective::select(0, "sticker", sticker("red.png")),
            RawDirective::select(0, "sticker", sticker("blue.png")),
        ]),
    };
    let output = compositor_with_stickers(&dir).process_image(&checkerboard(20, 20), &request);

    assert_eq!(*output.image.get_pixel(10, 10), Rgb([0, 0, 255]));
    let ids: Vec<&str> = output
        .metadata
        .applied
        .iter()
        .map(|record| match &record.effect {
            Effect::Sticker(params) => params.sticker_id.as_str(),
            other => panic!("unexpected effect {other:?}"),
        })
        .collect();
    assert_eq!(ids, vec!["red.png", "blue.png"]);
    assert!(output.metadata.applied.iter().all(|r| r.region_index == 0));
}

#[test]
fn test_missing_sticker_renders_default() {
    let image = checkerboard(50, 50);
    let region = Region::new(10, 5, 30, 40);
    let output = compositor().process_image(
        &image,
        &manual(vec![RawDirective::manual(region, "sticker", RawParams::default())]),
    );

    // Yellow fill in the middle, transparent outside the disc.
    assert_eq!(*output.image.get_pixel(25, 25), Rgb([255, 255, 0]));
    for (x, y) in [(10, 5), (39, 5), (10, 44), (39, 44)] {
        assert_eq!(output.image.get_pixel(x, y), image.get_pixel(x, y));
    }
    assert_eq!(output.image.get_pixel(5, 25), image.get_pixel(5, 25));
    assert!(output.skipped.is_empty());
    assert_eq!(
        output.metadata.applied[0].effect,
        Effect::Sticker(StickerParams {
            sticker_id: "default_sticker.png".to_string()
        })
    );
}

#[test]
fn test_degenerate_region_is_recorded_noop() {
    let image = checkerboard(20, 20);
    let region = Region::new(4, 4, 0, 8);
    let output = compositor().process_image(
        &image,
        &manual(vec![RawDirective::manual(
            region,
            "pixelate",
            params_with_shape("rounded"),
        )]),
    );

    assert_eq!(output.image, image);
    assert_eq!(
        output.metadata.applied,
        vec![AppliedRecord {
            region_index: 0,
            coordinates: region,
            effect: Effect::Pixelate(PixelateParams {
                block_size: 10,
                shape: Shape::Rounded
            }),
        }]
    );
}

#[test]
fn test_degenerate_blur_and_sticker_are_recorded_noops() {
    let image = checkerboard(20, 20);
    let output = compositor().process_image(
        &image,
        &manual(vec![
            RawDirective::manual(Region::new(4, 4, 0, 8), "blur", RawParams::default()),
            RawDirective::manual(Region::new(3, 3, 5, 0), "sticker", RawParams::default()),
        ]),
    );

    assert_eq!(output.image, image);
    assert!(output.skipped.is_empty());
    let kinds: Vec<&str> = output
        .metadata
        .applied
        .iter()
        .map(|record| record.effect.name())
        .collect();
    assert_eq!(kinds, vec!["blur", "sticker"]);
}

#[test]
fn test_manual_bad_entries_are_dropped() {
    let image = checkerboard(20, 20);
    let directives = DirectiveList::from_json(
        r#"[
            {"x": 0, "y": 0, "width": 10, "effect": "blur"},
            {"x": 0, "y": 0, "width": 10, "height": 10, "effect": "sparkle"},
            {"x": "a"}
        ]"#,
    )
    .unwrap();
    let output = compositor().process_image(&image, &EffectRequest::Manual { directives });

    assert_eq!(output.image, image);
    assert!(output.metadata.applied.is_empty());
    assert_eq!(output.metadata.input_region_count, 3);
    assert_eq!(output.skipped.len(), 3);
}

#[test]
fn test_selection_pixelate_after_blur_wins() {
    let image = checkerboard(30, 30);
    let region = Region::new(5, 5, 20, 20);
    let request = EffectRequest::Selection {
        detections: vec![Detection::new(region)],
        directives: DirectiveList::from(vec![
            RawDirective::select(0, "blur", RawParams::default()),
            RawDirective::select(0, "pixelate", RawParams::default()),
        ]),
    };
    let output = compositor().process_image(&image, &request);

    let blur = BlurParams {
        intensity: 10,
        shape: Shape::Squared,
    };
    let pixelate = PixelateParams {
        block_size: 10,
        shape: Shape::Squared,
    };
    let blurred = apply_blur(&image, region, &blur);
    assert_eq!(output.image, apply_pixelate(&blurred, region, &pixelate));
    assert_ne!(output.image, blurred);
    assert_eq!(
        output.metadata.applied,
        vec![
            AppliedRecord {
                region_index: 0,
                coordinates: region,
                effect: Effect::Blur(blur),
            },
            AppliedRecord {
                region_index: 0,
                coordinates: region,
                effect: Effect::Pixelate(pixelate),
            },
        ]
    );
}

#[test]
fn test_huge_regions_and_intensity_finish_quickly() {
    let image = checkerboard(16, 16);
    let huge = Region::new(0, 0, i32::MAX, i32::MAX);
    let straddling = Region::new(-i32::MAX / 2, -i32::MAX / 2, i32::MAX, i32::MAX);
    let intense = RawParams {
        intensity: Some(i32::MAX),
        ..RawParams::default()
    };

    let start = Instant::now();
    let output = compositor().process_image(
        &image,
        &manual(vec![
            RawDirective::manual(Region::new(2, 2, 8, 8), "blur", intense.clone()),
            RawDirective::manual(huge, "blur", params_with_shape("rounded")),
            RawDirective::manual(straddling, "pixelate", params_with_shape("rounded")),
            RawDirective::manual(huge, "sticker", RawParams::default()),
            RawDirective::manual(straddling, "sticker", RawParams::default()),
        ]),
    );

    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(output.image.dimensions(), (16, 16));
    assert_eq!(output.metadata.applied.len(), 5);
    assert_eq!(
        output.metadata.applied[0].effect,
        Effect::Blur(BlurParams {
            intensity: i32::MAX,
            shape: Shape::Squared
        })
    );
    assert_eq!(output.metadata.applied[1].coordinates, huge);
}

#[test]
fn test_unknown_effect_and_bad_index_are_dropped() {
    let image = checkerboard(20, 20);
    let directives = DirectiveList::from_json(
        r#"[
            {"index": 0, "effect": "sparkle"},
            {"index": 99, "effect": "blur"},
            {"index": 0, "effect": "none"}
        ]"#,
    )
    .unwrap();
    let request = EffectRequest::Selection {
        detections: vec![Detection::new(Region::new(0, 0, 10, 10))],
        directives,
    };
    let output = compositor().process_image(&image, &request);

    assert_eq!(output.image, image);
    assert!(output.metadata.applied.is_empty());
    assert_eq!(output.metadata.input_region_count, 3);
    assert_eq!(output.skipped.len(), 2);
}

#[test]
fn test_region_off_image_is_clamped() {
    let image = checkerboard(20, 20);
    let region = Region::new(-10, -10, 20, 20);
    let output = compositor().process_image(
        &image,
        &manual(vec![RawDirective::manual(region, "blur", RawParams::default())]),
    );

    assert_eq!(output.metadata.applied.len(), 1);
    assert_eq!(output.metadata.applied[0].coordinates, region);
    assert_eq!(output.image.get_pixel(15, 15), image.get_pixel(15, 15));
    assert_ne!(
        crop(&output.image, Region::new(0, 0, 10, 10)),
        crop(&image, Region::new(0, 0, 10, 10))
    );
}

#[test]
fn test_process_bytes_end_to_end() {
    let image = checkerboard(32, 24);
    let directives = DirectiveList::from_json(
        r#"[{"x": 2, "y": 2, "width": 12, "height": 12, "type": "blur", "params": {"intensity": 3}}]"#,
    )
    .unwrap();
    let output = compositor()
        .process_bytes(&png_bytes(&image), &EffectRequest::Manual { directives })
        .unwrap();

    assert_eq!(output.image.dimensions(), (32, 24));
    assert_eq!(
        output.metadata.applied[0].effect,
        Effect::Blur(BlurParams {
            intensity: 3,
            shape: Shape::Squared
        })
    );
}

#[test]
fn test_bad_bytes_are_fatal() {
    let request = manual(vec![RawDirective::manual(
        Region::new(0, 0, 4, 4),
        "blur",
        RawParams::default(),
    )]);
    for bytes in [&b""[..], &b"definitely not an image"[..]] {
        let result = compositor().process_bytes(bytes, &request);
        assert!(matches!(result, Err(PipelineError::Decode { .. })));
    }
}

#[test]
fn test_parallel_runs_share_one_compositor() {
    let compositor = compositor();
    let image = checkerboard(40, 40);
    let request = manual(vec![
        RawDirective::manual(Region::new(0, 0, 20, 20), "blur", RawParams::default()),
        RawDirective::manual(Region::new(20, 20, 20, 20), "pixelate", RawParams::default()),
    ]);
    let expected = compositor.process_image(&image, &request).image;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| compositor.process_image(&image, &request).image))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
