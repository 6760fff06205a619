use image::{Luma, Pixel, Primitive, Rgb, Rgba};
use imageproc::{definitions::Image, map::map_colors2};

use crate::{error::AlphaMaskError, utils::ensure_same_size};

/// Attaches a foreground mask to a cropped color image
///
/// The mask value of every pixel becomes its alpha, so a binary mask gives a
/// fully transparent background and a fully opaque map. Color channels pass
/// through untouched.
pub trait ApplyAlphaMask {
    type Subpixel: Primitive;

    /// Consumes the color image and returns it with `mask` as alpha
    ///
    /// # Errors
    ///
    /// * `AlphaMaskError::DimensionMismatch` - `mask` is not the size of the image
    ///
    /// # Examples
    ///
    /// ```
    /// use image::{Luma, Rgb};
    /// use imageproc::definitions::Image;
    /// use mapmatte::ApplyAlphaMask;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let map: Image<Rgb<u8>> = Image::from_pixel(3, 1, Rgb([40, 160, 90]));
    /// let mask: Image<Luma<u8>> = Image::from_fn(3, 1, |x, _| Luma([if x == 1 { 255 } else { 0 }]));
    ///
    /// let matte = map.apply_alpha_mask(&mask)?;
    /// assert_eq!(matte.get_pixel(0, 0).0, [40, 160, 90, 0]);
    /// assert_eq!(matte.get_pixel(1, 0).0, [40, 160, 90, 255]);
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    fn apply_alpha_mask(
        self,
        mask: &Image<Luma<Self::Subpixel>>,
    ) -> Result<Image<Rgba<Self::Subpixel>>, AlphaMaskError>
    where
        Rgba<Self::Subpixel>: Pixel<Subpixel = Self::Subpixel>,
        Luma<Self::Subpixel>: Pixel<Subpixel = Self::Subpixel>;
}

impl<S> ApplyAlphaMask for Image<Rgb<S>>
where
    Rgb<S>: Pixel<Subpixel = S>,
    Rgba<S>: Pixel<Subpixel = S>,
    Luma<S>: Pixel<Subpixel = S>,
    S: Primitive,
{
    type Subpixel = S;

    fn apply_alpha_mask(self, mask: &Image<Luma<S>>) -> Result<Image<Rgba<S>>, AlphaMaskError> {
        ensure_same_size(&self, mask)?;
        Ok(map_colors2(&self, mask, |color, Luma([alpha])| {
            let [red, green, blue] = color.0;
            Rgba([red, green, blue, alpha])
        }))
    }
}
