use image::{Luma, Pixel, Primitive, Rgb};
use imageproc::definitions::Image;
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::error::QuantizeError;
use crate::utils::is_empty;

/// Per-pixel cluster labels, co-indexed with the quantized image.
pub type LabelMap = Image<Luma<u32>>;

/// A color in the quantizer's working space.
pub type Center = [f32; 3];

/// Iterative nearest-center color quantizer
///
/// Colors are grouped into `clusters` groups with a plain k-means loop:
/// centers are seeded from randomly chosen pixels (with a fixed seed, so the
/// result is reproducible), every pixel is assigned to its nearest center
/// under Euclidean distance, and centers move to the mean of their pixels
/// until they stop moving or the iteration budget runs out.
///
/// Clusters that lose all of their pixels keep their previous center.
///
/// # Examples
///
/// ```
/// use image::Rgb;
/// use imageproc::definitions::Image;
/// use mapmatte::ColorQuantizer;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut image: Image<Rgb<u8>> = Image::from_pixel(8, 8, Rgb([10, 10, 10]));
/// image.put_pixel(4, 4, Rgb([250, 250, 250]));
///
/// let quantization = ColorQuantizer::new(2).seed(7).quantize(&image)?;
/// let background = quantization.labels.get_pixel(0, 0)[0];
/// assert_ne!(quantization.labels.get_pixel(4, 4)[0], background);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ColorQuantizer {
    clusters: usize,
    max_iterations: usize,
    tolerance: f32,
    seed: u64,
}

/// Output of [`ColorQuantizer::quantize`]
#[derive(Debug, Clone)]
pub struct Quantization {
    /// Cluster label of every pixel, in `0..clusters`
    pub labels: LabelMap,
    /// Final cluster centers, indexed by label
    pub centers: Vec<Center>,
    /// Number of assignment/update rounds that ran
    pub iterations: usize,
    /// Whether the centers settled before the iteration budget ran out
    pub converged: bool,
}

impl ColorQuantizer {
    pub const DEFAULT_MAX_ITERATIONS: usize = 20;
    pub const DEFAULT_TOLERANCE: f32 = 1e-4;
    pub const DEFAULT_SEED: u64 = 0;

    /// Creates a quantizer producing `clusters` groups with default options.
    #[must_use]
    pub const fn new(clusters: usize) -> Self {
        Self {
            clusters,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            tolerance: Self::DEFAULT_TOLERANCE,
            seed: Self::DEFAULT_SEED,
        }
    }

    /// Sets the maximum number of assignment/update rounds.
    ///
    /// The default is `20`.
    #[must_use]
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the largest center movement that still counts as converged.
    ///
    /// Measured in the units of the image's channels. The default is `1e-4`.
    #[must_use]
    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the seed used to pick the initial centers.
    ///
    /// The default seed is `0`.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub const fn clusters(&self) -> usize {
        self.clusters
    }

    /// Checks the options that do not depend on a particular image.
    ///
    /// # Errors
    ///
    /// * `QuantizeError::InvalidParameter` - zero clusters, zero iterations,
    ///   or a negative/non-finite tolerance
    pub fn validate(&self) -> Result<(), QuantizeError> {
        if self.clusters == 0 {
            return Err(QuantizeError::InvalidParameter(
                "cluster count must be at least 1".to_owned(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(QuantizeError::InvalidParameter(
                "max iterations must be at least 1".to_owned(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(QuantizeError::InvalidParameter(format!(
                "tolerance must be a finite non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Clusters the colors of `image` and labels every pixel
    ///
    /// # Errors
    ///
    /// * `QuantizeError::EmptyImage` - the image has a zero dimension
    /// * `QuantizeError::InvalidParameter` - invalid options, or more clusters
    ///   than pixels
    pub fn quantize<S>(&self, image: &Image<Rgb<S>>) -> Result<Quantization, QuantizeError>
    where
        Rgb<S>: Pixel<Subpixel = S>,
        S: Primitive + Into<f32>,
    {
        if is_empty(image) {
            return Err(QuantizeError::EmptyImage);
        }
        let (width, height) = image.dimensions();
        self.validate()?;

        let pixels: Vec<Center> = image
            .pixels()
            .map(|&Rgb([red, green, blue])| [red.into(), green.into(), blue.into()])
            .collect();

        if self.clusters > pixels.len() {
            return Err(QuantizeError::InvalidParameter(format!(
                "cluster count {} exceeds the {} pixels available for seeding",
                self.clusters,
                pixels.len()
            )));
        }

        let mut centers = seed_centers(&pixels, self.clusters, self.seed);
        let mut labels = vec![0u32; pixels.len()];
        let mut sums = vec![[0f64; 3]; self.clusters];
        let mut counts = vec![0usize; self.clusters];
        let tolerance_sq = self.tolerance * self.tolerance;

        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.max_iterations {
            iterations += 1;
            assign_labels(&pixels, &centers, &mut labels);
            let shift = update_centers(&pixels, &labels, &mut centers, &mut sums, &mut counts);
            debug!(
                "quantize: iteration {iterations}, largest center shift {:.5}",
                shift.sqrt()
            );
            if shift <= tolerance_sq {
                converged = true;
                break;
            }
        }
        debug!(
            "quantize: {} clusters over {width}x{height} pixels, {iterations} iterations, converged: {converged}",
            self.clusters
        );

        let labels = Image::from_fn(width, height, |x, y| {
            Luma([labels[(y as usize) * (width as usize) + x as usize]])
        });

        Ok(Quantization {
            labels,
            centers,
            iterations,
            converged,
        })
    }
}

/// Picks the colors of `clusters` distinct pixel positions.
fn seed_centers(pixels: &[Center], clusters: usize, seed: u64) -> Vec<Center> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rand::seq::index::sample(&mut rng, pixels.len(), clusters)
        .into_iter()
        .map(|index| pixels[index])
        .collect()
}

#[inline]
fn squared_distance(a: &Center, b: &Center) -> f32 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    let d2 = a[2] - b[2];
    d0 * d0 + d1 * d1 + d2 * d2
}

/// Index of the nearest center; ties go to the lowest index.
#[inline]
fn nearest_center(pixel: &Center, centers: &[Center]) -> u32 {
    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for (index, center) in centers.iter().enumerate() {
        let distance = squared_distance(pixel, center);
        if distance < best_distance {
            best_distance = distance;
            best = index;
        }
    }
    best as u32
}

#[cfg(not(feature = "rayon"))]
fn assign_labels(pixels: &[Center], centers: &[Center], labels: &mut [u32]) {
    labels
        .iter_mut()
        .zip(pixels)
        .for_each(|(label, pixel)| *label = nearest_center(pixel, centers));
}

#[cfg(feature = "rayon")]
fn assign_labels(pixels: &[Center], centers: &[Center], labels: &mut [u32]) {
    labels
        .par_iter_mut()
        .zip(pixels.par_iter())
        .for_each(|(label, pixel)| *label = nearest_center(pixel, centers));
}

/// Moves every non-empty cluster to the mean of its pixels.
///
/// Returns the largest squared center movement.
fn update_centers(
    pixels: &[Center],
    labels: &[u32],
    centers: &mut [Center],
    sums: &mut [[f64; 3]],
    counts: &mut [usize],
) -> f32 {
    sums.fill([0.0; 3]);
    counts.fill(0);

    for (pixel, &label) in pixels.iter().zip(labels) {
        let label = label as usize;
        let sum = &mut sums[label];
        sum[0] += f64::from(pixel[0]);
        sum[1] += f64::from(pixel[1]);
        sum[2] += f64::from(pixel[2]);
        counts[label] += 1;
    }

    let mut largest_shift = 0.0f32;
    for ((center, sum), &count) in centers.iter_mut().zip(sums.iter()).zip(counts.iter()) {
        if count == 0 {
            continue;
        }
        let n = count as f64;
        let updated = [
            (sum[0] / n) as f32,
            (sum[1] / n) as f32,
            (sum[2] / n) as f32,
        ];
        largest_shift = largest_shift.max(squared_distance(center, &updated));
        *center = updated;
    }
    largest_shift
}
