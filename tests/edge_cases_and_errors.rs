//! Edge case and error handling tests for mapmatte
//!
//! These tests verify behavior in boundary conditions and error scenarios.

use image::{Luma, Rgb};
use mapmatte::{
    binarize, AlphaMaskError, ApplyAlphaMask, BackgroundMaskExt, ColorQuantizer,
    ExtractionConfig, ExtractionError, Image, LabelMap, MapExtractor, QuantizeError,
};

fn extractor(cluster_count: usize) -> MapExtractor {
    MapExtractor::new(ExtractionConfig {
        cluster_count,
        ..ExtractionConfig::default()
    })
    .expect("config should be valid")
}

fn create_framed(width: u32, height: u32, rect: (u32, u32, u32, u32)) -> Image<Rgb<u8>> {
    let (rx, ry, rw, rh) = rect;
    Image::from_fn(width, height, |x, y| {
        if (rx..rx + rw).contains(&x) && (ry..ry + rh).contains(&y) {
            Rgb([230, 200, 60])
        } else {
            Rgb([20, 20, 20])
        }
    })
}

// Degenerate images

#[test]
fn single_pixel_image_is_all_background() {
    let image: Image<Rgb<u8>> = Image::from_pixel(1, 1, Rgb([90, 10, 10]));
    assert_eq!(
        extractor(1).extract(&image),
        Err(ExtractionError::NoForegroundDetected)
    );
}

#[test]
fn single_row_image_is_all_background() {
    let image: Image<Rgb<u8>> = Image::from_fn(9, 1, |x, _| Rgb([x as u8 * 25, 0, 0]));
    assert_eq!(
        extractor(3).extract(&image),
        Err(ExtractionError::NoForegroundDetected)
    );
}

#[test]
fn empty_image_is_rejected_as_invalid() {
    let image: Image<Rgb<u8>> = Image::new(0, 0);

    assert_eq!(
        ColorQuantizer::new(1).quantize(&image).unwrap_err(),
        QuantizeError::EmptyImage
    );
    let error = extractor(1).extract(&image).unwrap_err();
    assert!(matches!(error, ExtractionError::InvalidParameter(_)));
    assert!(error.is_fatal());
}

// Parameter validation

#[test]
fn zero_clusters_are_rejected_up_front() {
    let result = MapExtractor::new(ExtractionConfig {
        cluster_count: 0,
        ..ExtractionConfig::default()
    });
    assert!(matches!(result, Err(ExtractionError::InvalidParameter(_))));
}

#[test]
fn invalid_tolerance_is_rejected_up_front() {
    for tolerance in [-1.0, f32::NAN, f32::INFINITY] {
        let result = MapExtractor::new(ExtractionConfig {
            tolerance,
            ..ExtractionConfig::default()
        });
        assert!(
            matches!(result, Err(ExtractionError::InvalidParameter(_))),
            "tolerance {tolerance} should be rejected"
        );
    }
}

#[test]
fn more_clusters_than_pixels_is_fatal() {
    let image: Image<Rgb<u8>> = Image::from_pixel(2, 2, Rgb([1, 2, 3]));
    let error = extractor(5).extract(&image).unwrap_err();

    assert!(matches!(error, ExtractionError::InvalidParameter(_)));
    assert!(error.is_fatal());
}

#[test]
fn cluster_count_equal_to_pixel_count_is_accepted() {
    let image: Image<Rgb<u8>> = Image::from_pixel(2, 2, Rgb([1, 2, 3]));
    let quantization = ColorQuantizer::new(4).quantize(&image).unwrap();

    assert_eq!(quantization.centers.len(), 4);
    assert!(quantization.labels.pixels().all(|label| label[0] == 0));
}

#[test]
fn no_foreground_is_not_fatal() {
    assert!(!ExtractionError::NoForegroundDetected.is_fatal());
}

// Thresholds and clusters

#[test]
fn threshold_255_never_yields_foreground() {
    let image = create_framed(16, 16, (4, 4, 8, 8));
    let extractor = MapExtractor::new(ExtractionConfig {
        cluster_count: 2,
        alpha_threshold: 255,
        ..ExtractionConfig::default()
    })
    .unwrap();

    assert_eq!(
        extractor.extract(&image),
        Err(ExtractionError::NoForegroundDetected)
    );
}

#[test]
fn threshold_zero_keeps_full_foreground() {
    let image = create_framed(16, 16, (4, 4, 8, 8));
    let extractor = MapExtractor::new(ExtractionConfig {
        cluster_count: 2,
        alpha_threshold: 0,
        ..ExtractionConfig::default()
    })
    .unwrap();

    let map = extractor.extract(&image).unwrap();
    assert_eq!(map.dimensions(), (8, 8));
}

#[test]
fn more_clusters_than_colors_still_extracts() {
    let image = create_framed(20, 20, (5, 6, 9, 7));
    let map = extractor(6).extract(&image).unwrap();

    assert_eq!(map.dimensions(), (9, 7));
    assert!(map.pixels().all(|p| p.0 == [230, 200, 60, 255]));
}

#[test]
fn map_touching_the_border_is_treated_as_background() {
    // The map color reaches the left edge, so its cluster counts as background
    let image = create_framed(16, 12, (0, 3, 8, 6));
    assert_eq!(
        extractor(2).extract(&image),
        Err(ExtractionError::NoForegroundDetected)
    );
}

// Mask helpers

#[test]
fn background_mask_of_single_label_is_empty() {
    let labels: LabelMap = Image::from_pixel(6, 6, Luma([3]));
    let mask = labels.background_mask(127);

    assert!(mask.pixels().all(|p| p[0] == 0));
    assert_eq!(labels.border_labels(), vec![3]);
}

#[test]
fn binarize_handles_extreme_thresholds() {
    let mask: Image<Luma<u8>> = Image::from_fn(4, 1, |x, _| Luma([[0, 1, 254, 255][x as usize]]));

    assert_eq!(binarize(&mask, 0).into_raw(), vec![0, 255, 255, 255]);
    assert_eq!(binarize(&mask, 254).into_raw(), vec![0, 0, 0, 255]);
    assert_eq!(binarize(&mask, 255).into_raw(), vec![0, 0, 0, 0]);
}

#[test]
fn alpha_mask_with_wrong_size_is_rejected() {
    let image: Image<Rgb<u8>> = Image::from_pixel(4, 3, Rgb([1, 2, 3]));
    let mask: Image<Luma<u8>> = Image::from_pixel(3, 4, Luma([255]));

    assert_eq!(
        image.apply_alpha_mask(&mask),
        Err(AlphaMaskError::DimensionMismatch {
            expected: (4, 3),
            actual: (3, 4),
        })
    );
}

#[test]
fn alpha_mask_error_converts_to_extraction_error() {
    let error = AlphaMaskError::DimensionMismatch {
        expected: (1, 1),
        actual: (2, 2),
    };
    let converted = ExtractionError::from(error.clone());

    assert_eq!(converted, ExtractionError::AlphaMask(error));
    assert!(!converted.is_fatal());
}
