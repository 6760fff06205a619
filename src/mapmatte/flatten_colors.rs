use image::Rgb;
use imageproc::definitions::Image;
use imageproc::map::map_colors;
use palette::{IntoColor, Lab, LinSrgb, Srgb};

use crate::utils::round_to_channel;

/// Scale between the 8-bit luminance encoding (0..=255) and CIE L* (0..=100).
const LUMINANCE_SCALE: f32 = 255.0 / 100.0;

/// Offset applied to a*/b* in their 8-bit encoding.
const CHROMA_OFFSET: f32 = 128.0;

/// Trait for removing lighting variation from an image
///
/// Every pixel is converted to CIE L\*a\*b\*, its L\* is replaced by a constant
/// and the result is converted back to sRGB. Hue and saturation survive while
/// gradients, shading and highlights collapse to a single brightness level,
/// which keeps textured backgrounds from splitting into several clusters.
pub trait FlattenColorsExt {
    /// Replaces the luminance of every pixel with `target_luminance`
    ///
    /// `target_luminance` uses the 8-bit encoding where 255 corresponds to
    /// L\* = 100. Colors that leave the sRGB gamut after the replacement are
    /// clamped per channel.
    ///
    /// # Examples
    ///
    /// ```
    /// use image::Rgb;
    /// use imageproc::definitions::Image;
    /// use mapmatte::{lab_components, FlattenColorsExt};
    ///
    /// let image: Image<Rgb<u8>> = Image::from_pixel(4, 4, Rgb([90, 90, 90]));
    /// let flat = image.flatten_colors(200);
    ///
    /// let [l, _, _] = lab_components(*flat.get_pixel(0, 0));
    /// assert!((i32::from(l) - 200).abs() <= 1);
    /// ```
    #[must_use]
    fn flatten_colors(&self, target_luminance: u8) -> Self;
}

impl FlattenColorsExt for Image<Rgb<u8>> {
    fn flatten_colors(&self, target_luminance: u8) -> Self {
        let l = f32::from(target_luminance) / LUMINANCE_SCALE;
        map_colors(self, |pixel| {
            let Lab { a, b, .. } = to_lab(pixel);
            from_lab(Lab::new(l, a, b))
        })
    }
}

/// Returns the 8-bit encoded `[L, a, b]` components of an sRGB pixel
///
/// L is scaled to 0..=255 and a/b are offset by 128, the usual 8-bit Lab
/// layout.
pub fn lab_components(pixel: Rgb<u8>) -> [u8; 3] {
    let Lab { l, a, b, .. } = to_lab(pixel);
    [
        round_to_channel(l * LUMINANCE_SCALE),
        round_to_channel(a + CHROMA_OFFSET),
        round_to_channel(b + CHROMA_OFFSET),
    ]
}

fn to_lab(Rgb([red, green, blue]): Rgb<u8>) -> Lab {
    let linear: LinSrgb<f32> = Srgb::new(red, green, blue).into_linear();
    linear.into_color()
}

fn from_lab(lab: Lab) -> Rgb<u8> {
    let srgb: Srgb<f32> = Srgb::from_linear(lab.into_color());
    let channel = |value: f32| round_to_channel(value * 255.0);
    Rgb([channel(srgb.red), channel(srgb.green), channel(srgb.blue)])
}
