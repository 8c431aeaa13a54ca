// Property tests for the bounded filter pipeline
use image::{Rgba, RgbaImage};
use image_processor::image_filter::{FilterConfig, FilterPipeline, ImageError, SourceImage};
use proptest::prelude::*;

fn source_strategy() -> impl Strategy<Value = SourceImage> {
    (1u32..=12, 1u32..=12).prop_flat_map(|(width, height)| {
        prop::collection::vec(any::<u8>(), (width * height * 4) as usize).prop_map(move |bytes| {
            SourceImage::from_rgba(
                RgbaImage::from_raw(width, height, bytes).expect("buffer length matches dimensions"),
            )
        })
    })
}

fn checkerboard(size: u32, cell: u32) -> SourceImage {
    SourceImage::from_rgba(RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    }))
}

/// 红色通道相邻像素差的平方均值。
fn gradient_energy(image: &RgbaImage) -> f64 {
    let (width, height) = image.dimensions();
    let mut total = 0.0f64;
    let mut count = 0u64;
    for y in 0..height {
        for x in 0..width {
            let here = image.get_pixel(x, y).0[0] as f64;
            if x + 1 < width {
                let d = image.get_pixel(x + 1, y).0[0] as f64 - here;
                total += d * d;
                count += 1;
            }
            if y + 1 < height {
                let d = image.get_pixel(x, y + 1).0[0] as f64 - here;
                total += d * d;
                count += 1;
            }
        }
    }
    total / count.max(1) as f64
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn zero_radius_is_identity(source in source_strategy()) {
        let output = FilterPipeline::default().apply(&source, 0.0).expect("identity should succeed");
        prop_assert_eq!(output.as_rgba(), source.as_rgba());
    }

    #[test]
    fn extent_is_preserved(source in source_strategy(), radius in 0.0f32..=20.0) {
        let output = FilterPipeline::default().apply(&source, radius).expect("blur should succeed");
        prop_assert_eq!(output.dimensions(), source.dimensions());
    }

    #[test]
    fn repeated_calls_are_deterministic(source in source_strategy(), radius in 0.0f32..=20.0) {
        let pipeline = FilterPipeline::default();
        let first = pipeline.apply(&source, radius).expect("blur should succeed");
        let second = pipeline.apply(&source, radius).expect("blur should succeed");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn negative_radius_matches_identity(source in source_strategy(), radius in -20.0f32..0.0) {
        let output = FilterPipeline::default().apply(&source, radius).expect("negative radius must not fail");
        prop_assert_eq!(output.as_rgba(), source.as_rgba());
    }

    #[test]
    fn uniform_images_are_blur_invariant(
        width in 1u32..=16,
        height in 1u32..=16,
        rgb in any::<[u8; 3]>(),
        alpha in 1u8..=255,
        radius in 0.0f32..=20.0,
    ) {
        let source = SourceImage::filled(width, height, [rgb[0], rgb[1], rgb[2], alpha]);
        let output = FilterPipeline::default().apply(&source, radius).expect("blur should succeed");
        prop_assert_eq!(output.as_rgba(), source.as_rgba());
    }

    #[test]
    fn transparent_neighbors_never_tint_opaque_pixels(
        tint in any::<[u8; 3]>(),
        radius in 0.5f32..=8.0,
    ) {
        let source = SourceImage::from_rgba(RgbaImage::from_fn(24, 8, |x, _| {
            if x < 12 {
                Rgba([tint[0], tint[1], tint[2], 0])
            } else {
                Rgba([0, 0, 0, 255])
            }
        }));
        let output = FilterPipeline::default().apply(&source, radius).expect("blur should succeed");
        prop_assert!(output.as_rgba().pixels().all(|p| p.0[..3] == [0, 0, 0]));
    }

    #[test]
    fn mosaic_preserves_extent(source in source_strategy(), scale in 0.01f32..=1.0) {
        let output = FilterPipeline::default().apply_mosaic(&source, scale).expect("mosaic should succeed");
        prop_assert_eq!(output.dimensions(), source.dimensions());
    }
}

#[test]
fn black_placeholder_scenarios() {
    let pipeline = FilterPipeline::new(FilterConfig::default());
    let source = SourceImage::placeholder(400);

    for radius in [0.0, 10.0] {
        let output = pipeline.apply(&source, radius).expect("blur should succeed");
        assert_eq!(output.dimensions(), (400, 400));
        assert!(output.as_rgba().pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }
}

#[test]
fn malformed_source_fails_for_any_parameter() {
    let pipeline = FilterPipeline::default();
    let source = SourceImage::filled(0, 0, [0, 0, 0, 0]);
    for radius in [-1.0, 0.0, 10.0, 20.0] {
        let result = pipeline.apply(&source, radius);
        assert!(matches!(result, Err(ImageError::InvalidInput(_))));
    }
}

#[test]
fn larger_radius_means_less_gradient_energy() {
    let pipeline = FilterPipeline::default();
    let source = checkerboard(64, 16);

    let energies: Vec<f64> = [0.0, 1.0, 2.0, 4.0, 8.0]
        .into_iter()
        .map(|radius| {
            let output = pipeline.apply(&source, radius).expect("blur should succeed");
            gradient_energy(output.as_rgba())
        })
        .collect();

    for pair in energies.windows(2) {
        assert!(pair[1] < pair[0], "energies not decreasing: {energies:?}");
    }
}

#[test]
fn profiles_only_change_blur_quality_not_extent() {
    let source = checkerboard(40, 8);
    for profile in ["quality", "balanced", "speed"] {
        let mut config = FilterConfig::default();
        config.apply_performance_profile(
            image_processor::image_filter::FilterQualityProfile::parse(profile).expect("known profile"),
        );
        let output = FilterPipeline::new(config).apply(&source, 5.0).expect("blur should succeed");
        assert_eq!(output.dimensions(), (40, 40));
    }
}
