use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::map::map_colors;
use imageproc::morphology::{close, open};
use itertools::Itertools;

use super::color_quantizer::LabelMap;

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

/// Radius of the square structuring element; 1 gives a 3x3 neighbourhood.
const STRUCTURING_RADIUS: u8 = 1;

/// Trait for turning a cluster label map into a foreground mask
///
/// Any cluster that touches the outer edge of the image is treated as
/// background. The raw mask is cleaned with a closing (fills holes left by
/// background-colored details inside the map) followed by an opening
/// (drops foreground speckles), and finally binarized.
pub trait BackgroundMaskExt {
    /// Builds a binary mask where 255 marks foreground and 0 marks background
    ///
    /// # Arguments
    ///
    /// * `alpha_threshold` - Cleaned mask values strictly above this become 255,
    ///   everything else becomes 0
    ///
    /// # Examples
    ///
    /// ```
    /// use image::Luma;
    /// use imageproc::definitions::Image;
    /// use mapmatte::BackgroundMaskExt;
    ///
    /// let mut labels: Image<Luma<u32>> = Image::new(9, 9);
    /// for y in 2..7 {
    ///     for x in 2..7 {
    ///         labels.put_pixel(x, y, Luma([1]));
    ///     }
    /// }
    ///
    /// let mask = labels.background_mask(127);
    /// assert_eq!(mask.get_pixel(0, 0)[0], 0);
    /// assert_eq!(mask.get_pixel(4, 4)[0], 255);
    /// ```
    fn background_mask(&self, alpha_threshold: u8) -> GrayImage;

    /// Returns the sorted, distinct labels found on the four image edges
    fn border_labels(&self) -> Vec<u32>;
}

impl BackgroundMaskExt for LabelMap {
    fn background_mask(&self, alpha_threshold: u8) -> GrayImage {
        let background = self.border_labels();
        let raw = map_colors(self, |Luma([label])| {
            if background.binary_search(&label).is_ok() {
                Luma([BACKGROUND])
            } else {
                Luma([FOREGROUND])
            }
        });

        let closed = close(&raw, Norm::LInf, STRUCTURING_RADIUS);
        let opened = open(&closed, Norm::LInf, STRUCTURING_RADIUS);

        binarize(&opened, alpha_threshold)
    }

    fn border_labels(&self) -> Vec<u32> {
        let (width, height) = self.dimensions();
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let top_bottom = (0..width).flat_map(|x| [(x, 0), (x, height - 1)]);
        let left_right = (0..height).flat_map(|y| [(0, y), (width - 1, y)]);

        top_bottom
            .chain(left_right)
            .map(|(x, y)| self.get_pixel(x, y)[0])
            .sorted_unstable()
            .dedup()
            .collect()
    }
}

/// Hard threshold: strictly above `threshold` is opaque, the rest transparent.
pub fn binarize(mask: &GrayImage, threshold: u8) -> GrayImage {
    map_colors(mask, |Luma([value])| {
        Luma([if value > threshold {
            FOREGROUND
        } else {
            BACKGROUND
        }])
    })
}
