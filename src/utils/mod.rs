//! Helpers shared by the extraction stages.

use image::GenericImageView;
use imageproc::definitions::Clamp;

use crate::error::AlphaMaskError;

/// Rounds to the nearest integer and saturates into `0..=255`.
#[inline]
pub fn round_to_channel(value: f32) -> u8 {
    <u8 as Clamp<f32>>::clamp(value.round())
}

/// `true` when the image has no pixels.
pub fn is_empty<I: GenericImageView>(image: &I) -> bool {
    let (width, height) = image.dimensions();
    width == 0 || height == 0
}

/// Fails unless `mask` covers exactly the pixels of `image`.
pub fn ensure_same_size<I, M>(image: &I, mask: &M) -> Result<(), AlphaMaskError>
where
    I: GenericImageView,
    M: GenericImageView,
{
    let expected = image.dimensions();
    let actual = mask.dimensions();
    if expected == actual {
        Ok(())
    } else {
        Err(AlphaMaskError::DimensionMismatch { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};

    #[test]
    fn round_to_channel_rounds_and_saturates() {
        assert_eq!(round_to_channel(-3.2), 0);
        assert_eq!(round_to_channel(127.4), 127);
        assert_eq!(round_to_channel(127.5), 128);
        assert_eq!(round_to_channel(254.6), 255);
        assert_eq!(round_to_channel(1e6), 255);
    }

    #[test]
    fn is_empty_checks_both_axes() {
        assert!(!is_empty(&RgbImage::new(1, 1)));
        assert!(is_empty(&RgbImage::new(0, 7)));
        assert!(is_empty(&GrayImage::new(7, 0)));
    }

    #[test]
    fn ensure_same_size_reports_both_sizes() {
        let image = RgbImage::new(4, 3);
        assert_eq!(ensure_same_size(&image, &GrayImage::new(4, 3)), Ok(()));
        assert_eq!(
            ensure_same_size(&image, &GrayImage::new(3, 4)),
            Err(AlphaMaskError::DimensionMismatch {
                expected: (4, 3),
                actual: (3, 4),
            })
        );
    }
}
