//! Test utilities for mapmatte
//!
//! This module provides common fixtures for testing the extraction stages.
//! It is only compiled when running tests.

use image::Rgb;
use imageproc::definitions::Image;

/// Creates a 2x2 RGB image with known pixel values:
/// - (0,0): [200, 150, 100]
/// - (1,0): [100, 200, 150]
/// - (0,1): [150, 100, 200]
/// - (1,1): [50, 75, 25]
pub fn create_test_rgb_image() -> Image<Rgb<u8>> {
    let mut image: Image<Rgb<u8>> = Image::new(2, 2);
    image.put_pixel(0, 0, Rgb([200, 150, 100]));
    image.put_pixel(1, 0, Rgb([100, 200, 150]));
    image.put_pixel(0, 1, Rgb([150, 100, 200]));
    image.put_pixel(1, 1, Rgb([50, 75, 25]));
    image
}

/// Creates an image filled with `background` and a `foreground` rectangle
///
/// `rect` is `(x, y, width, height)`.
pub fn create_framed_image(
    width: u32,
    height: u32,
    rect: (u32, u32, u32, u32),
    background: Rgb<u8>,
    foreground: Rgb<u8>,
) -> Image<Rgb<u8>> {
    let (rx, ry, rw, rh) = rect;
    Image::from_fn(width, height, |x, y| {
        if (rx..rx + rw).contains(&x) && (ry..ry + rh).contains(&y) {
            foreground
        } else {
            background
        }
    })
}

/// Creates a muted two-axis gradient
///
/// Colors stay well inside the sRGB gamut, so flattening them to a mid
/// luminance does not clip.
pub fn create_gradient_image(width: u32, height: u32) -> Image<Rgb<u8>> {
    Image::from_fn(width, height, |x, y| {
        let red = 100 + (x * 40 / width.max(1)) as u8;
        let green = 110 + (y * 30 / height.max(1)) as u8;
        let blue = 120 - ((x + y) * 20 / (width + height).max(1)) as u8;
        Rgb([red, green, blue])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_framed_image_places_rectangle() {
        let image = create_framed_image(6, 5, (1, 2, 3, 2), Rgb([0, 0, 0]), Rgb([9, 9, 9]));
        assert_eq!(image.dimensions(), (6, 5));
        assert_eq!(image.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(image.get_pixel(1, 2), &Rgb([9, 9, 9]));
        assert_eq!(image.get_pixel(3, 3), &Rgb([9, 9, 9]));
        assert_eq!(image.get_pixel(4, 3), &Rgb([0, 0, 0]));
        assert_eq!(image.get_pixel(1, 4), &Rgb([0, 0, 0]));
    }

    #[test]
    fn create_gradient_image_varies_across_axes() {
        let image = create_gradient_image(10, 10);
        assert_ne!(image.get_pixel(0, 0), image.get_pixel(9, 0));
        assert_ne!(image.get_pixel(0, 0), image.get_pixel(0, 9));
    }
}
