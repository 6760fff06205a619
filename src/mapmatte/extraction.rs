use std::borrow::Cow;

use image::{GrayImage, Rgb, RgbImage, RgbaImage};
use log::debug;

use super::apply_alpha_mask::ApplyAlphaMask;
use super::background_mask::BackgroundMaskExt;
use super::color_quantizer::{ColorQuantizer, LabelMap};
use super::flatten_colors::FlattenColorsExt;
use super::foreground_bounds::{BoundingBox, ForegroundBoundsExt};
use crate::error::ExtractionError;
use crate::utils::is_empty;

/// Parameters of the extraction pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Number of color clusters (K)
    pub cluster_count: usize,
    /// Mask values strictly above this become opaque
    pub alpha_threshold: u8,
    /// Whether to flatten lighting before clustering
    pub flatten_enabled: bool,
    /// 8-bit L* used by the flattening stage
    pub target_luminance: u8,
    /// Iteration budget of the quantizer
    pub max_iterations: usize,
    /// Convergence tolerance of the quantizer
    pub tolerance: f32,
    /// Seed for picking the initial cluster centers
    pub seed: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            cluster_count: 4,
            alpha_threshold: 127,
            flatten_enabled: false,
            target_luminance: 200,
            max_iterations: ColorQuantizer::DEFAULT_MAX_ITERATIONS,
            tolerance: ColorQuantizer::DEFAULT_TOLERANCE,
            seed: ColorQuantizer::DEFAULT_SEED,
        }
    }
}

impl ExtractionConfig {
    fn quantizer(&self) -> ColorQuantizer {
        ColorQuantizer::new(self.cluster_count)
            .max_iterations(self.max_iterations)
            .tolerance(self.tolerance)
            .seed(self.seed)
    }
}

/// Intermediate results of segmenting one image
#[derive(Debug, Clone)]
pub struct Segmentation<'a> {
    /// The clustered colors; flattened when flattening is enabled
    pub colors: Cow<'a, RgbImage>,
    /// Cluster label of every pixel
    pub labels: LabelMap,
    /// Binary foreground mask (0 or 255)
    pub mask: GrayImage,
}

impl Segmentation<'_> {
    /// Bounding box of the foreground, `None` if the mask is empty.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.mask.foreground_bounds()
    }
}

/// Extracts the foreground map from a screenshot
///
/// The extractor is an immutable value; one instance can be shared across
/// threads and used on any number of images.
///
/// # Examples
///
/// ```
/// use image::Rgb;
/// use imageproc::definitions::Image;
/// use mapmatte::{ExtractionConfig, MapExtractor};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut screenshot: Image<Rgb<u8>> = Image::from_pixel(20, 20, Rgb([30, 30, 30]));
/// for y in 5..12 {
///     for x in 4..15 {
///         screenshot.put_pixel(x, y, Rgb([40, 180, 90]));
///     }
/// }
///
/// let extractor = MapExtractor::new(ExtractionConfig {
///     cluster_count: 2,
///     ..ExtractionConfig::default()
/// })?;
/// let map = extractor.extract(&screenshot)?;
/// assert_eq!(map.dimensions(), (11, 7));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct MapExtractor {
    config: ExtractionConfig,
    quantizer: ColorQuantizer,
}

impl MapExtractor {
    /// Creates an extractor after validating `config`
    ///
    /// # Errors
    ///
    /// * `ExtractionError::InvalidParameter` - zero clusters, zero iterations
    ///   or an unusable tolerance
    pub fn new(config: ExtractionConfig) -> Result<Self, ExtractionError> {
        let quantizer = config.quantizer();
        quantizer.validate()?;
        Ok(Self { config, quantizer })
    }

    pub const fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Runs flattening, quantization and masking on `image`
    ///
    /// # Errors
    ///
    /// * `ExtractionError::InvalidParameter` - the image is empty or has
    ///   fewer pixels than the configured cluster count
    pub fn segment<'a>(&self, image: &'a RgbImage) -> Result<Segmentation<'a>, ExtractionError> {
        if is_empty(image) {
            let (width, height) = image.dimensions();
            return Err(ExtractionError::InvalidParameter(format!(
                "image dimensions must be non-zero, got {width}x{height}"
            )));
        }

        let colors = if self.config.flatten_enabled {
            Cow::Owned(image.flatten_colors(self.config.target_luminance))
        } else {
            Cow::Borrowed(image)
        };

        let quantization = self.quantizer.quantize::<u8>(&colors)?;
        let mask = quantization
            .labels
            .background_mask(self.config.alpha_threshold);

        Ok(Segmentation {
            colors,
            labels: quantization.labels,
            mask,
        })
    }

    /// Produces the cropped map with a transparent background
    ///
    /// The output covers exactly the bounding box of the foreground mask. Its
    /// alpha channel is the cropped mask and its colors are the clustered
    /// colors, so a flattened run emits flattened colors.
    ///
    /// # Errors
    ///
    /// * `ExtractionError::NoForegroundDetected` - every pixel is background
    /// * `ExtractionError::InvalidParameter` - see [`MapExtractor::segment`]
    pub fn extract(&self, image: &RgbImage) -> Result<RgbaImage, ExtractionError> {
        let segmentation = self.segment(image)?;
        let bounds = segmentation
            .bounds()
            .ok_or(ExtractionError::NoForegroundDetected)?;
        debug!("extract: foreground bounds {bounds:?}");

        let colors = bounds.crop::<Rgb<u8>>(&segmentation.colors);
        let mask = bounds.crop(&segmentation.mask);
        Ok(colors.apply_alpha_mask(&mask)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_framed_image;
    use image::Rgba;

    fn config(cluster_count: usize) -> ExtractionConfig {
        ExtractionConfig {
            cluster_count,
            ..ExtractionConfig::default()
        }
    }

    #[test]
    fn new_rejects_zero_clusters() {
        assert!(matches!(
            MapExtractor::new(config(0)),
            Err(ExtractionError::InvalidParameter(_))
        ));
    }

    #[test]
    fn new_rejects_zero_iterations() {
        let config = ExtractionConfig {
            max_iterations: 0,
            ..ExtractionConfig::default()
        };
        assert!(MapExtractor::new(config).is_err());
    }

    #[test]
    fn extract_crops_to_interior_rectangle() {
        let rect = (5, 3, 8, 6);
        let image = create_framed_image(20, 14, rect, Rgb([15, 20, 25]), Rgb([200, 180, 60]));
        let extractor = MapExtractor::new(config(2)).unwrap();

        let map = extractor.extract(&image).unwrap();

        assert_eq!(map.dimensions(), (8, 6));
        assert!(map.pixels().all(|p| *p == Rgba([200, 180, 60, 255])));
    }

    #[test]
    fn extract_reports_no_foreground_for_uniform_image() {
        let image: RgbImage = RgbImage::from_pixel(10, 10, Rgb([90, 90, 90]));
        let extractor = MapExtractor::new(config(3)).unwrap();

        assert_eq!(
            extractor.extract(&image),
            Err(ExtractionError::NoForegroundDetected)
        );
    }

    #[test]
    fn extract_rejects_image_smaller_than_cluster_count() {
        let image: RgbImage = RgbImage::new(2, 2);
        let extractor = MapExtractor::new(config(5)).unwrap();

        let error = extractor.extract(&image).unwrap_err();
        assert!(error.is_fatal());
    }

    #[test]
    fn segment_borrows_colors_without_flattening() {
        let image = create_framed_image(8, 8, (2, 2, 4, 4), Rgb([0, 0, 0]), Rgb([255, 0, 0]));
        let extractor = MapExtractor::new(config(2)).unwrap();

        let segmentation = extractor.segment(&image).unwrap();
        assert!(matches!(segmentation.colors, Cow::Borrowed(_)));
        assert_eq!(segmentation.labels.dimensions(), image.dimensions());
        assert_eq!(segmentation.mask.dimensions(), image.dimensions());
    }

    #[test]
    fn extract_emits_flattened_colors_when_enabled() {
        let image = create_framed_image(16, 16, (4, 4, 8, 8), Rgb([40, 40, 40]), Rgb([120, 140, 100]));
        let extractor = MapExtractor::new(ExtractionConfig {
            cluster_count: 2,
            flatten_enabled: true,
            target_luminance: 180,
            ..ExtractionConfig::default()
        })
        .unwrap();

        let map = extractor.extract(&image).unwrap();
        let flattened = image.flatten_colors(180);
        let expected = flattened.get_pixel(6, 6);

        assert_eq!(map.dimensions(), (8, 8));
        let Rgba([r, g, b, a]) = *map.get_pixel(0, 0);
        assert_eq!(Rgb([r, g, b]), *expected);
        assert_eq!(a, 255);
    }
}
