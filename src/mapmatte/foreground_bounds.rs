use image::{GenericImageView, Luma, Pixel, Primitive};
use imageproc::definitions::Image;

/// Axis-aligned rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Returns `true` if `(x, y)` lies inside the rectangle.
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x - self.x < self.width && y - self.y < self.height
    }

    /// Copies the covered region out of `image`.
    pub fn crop<P: Pixel + 'static>(&self, image: &Image<P>) -> Image<P> {
        image.view(self.x, self.y, self.width, self.height).to_image()
    }
}

/// Trait for locating the foreground of a mask
pub trait ForegroundBoundsExt {
    /// Returns the smallest rectangle enclosing every nonzero pixel
    ///
    /// `None` when the mask has no nonzero pixel at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use image::Luma;
    /// use imageproc::definitions::Image;
    /// use mapmatte::{BoundingBox, ForegroundBoundsExt};
    ///
    /// let mut mask: Image<Luma<u8>> = Image::new(10, 10);
    /// mask.put_pixel(2, 3, Luma([255]));
    /// mask.put_pixel(6, 4, Luma([255]));
    ///
    /// assert_eq!(
    ///     mask.foreground_bounds(),
    ///     Some(BoundingBox { x: 2, y: 3, width: 5, height: 2 })
    /// );
    /// ```
    fn foreground_bounds(&self) -> Option<BoundingBox>;
}

impl<S> ForegroundBoundsExt for Image<Luma<S>>
where
    Luma<S>: Pixel<Subpixel = S>,
    S: Primitive,
{
    fn foreground_bounds(&self) -> Option<BoundingBox> {
        let zero = S::zero();
        let (width, height) = self.dimensions();
        // [x1, y1, x2, y2], inclusive
        let mut bounds = [width, height, 0, 0];
        let mut found = false;

        for (x, y, pixel) in self.enumerate_pixels() {
            if pixel[0] != zero {
                update_bounds(&mut bounds, x, y);
                found = true;
            }
        }

        found.then(|| BoundingBox {
            x: bounds[0],
            y: bounds[1],
            width: bounds[2] - bounds[0] + 1,
            height: bounds[3] - bounds[1] + 1,
        })
    }
}

fn update_bounds(bounds: &mut [u32; 4], x: u32, y: u32) {
    bounds[0] = bounds[0].min(x);
    bounds[1] = bounds[1].min(y);
    bounds[2] = bounds[2].max(x);
    bounds[3] = bounds[3].max(y);
}
