//! # mapmatte
//!
//! Cuts the map graphic out of game screenshots.
//!
//! The background is found by clustering pixel colors and treating every
//! cluster that touches the image edge as background. The resulting mask is
//! cleaned with a morphological closing and opening, the image is cropped to
//! the foreground and the mask becomes its alpha channel.
//!
//! - **Color flattening**: Fixes L\* in CIE Lab to remove lighting gradients
//! - **Color quantization**: Seeded iterative nearest-center clustering
//! - **Background masking**: Border-driven background detection with cleanup
//! - **Extraction**: Crop to the foreground and attach the alpha channel
//! - **Batch processing**: YAML configuration, directory scanning and reporting
//!
//! ## Example Usage
//!
//! ```no_run
//! use mapmatte::{ExtractionConfig, MapExtractor};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let screenshot = image::open("screenshot.png")?.into_rgb8();
//! let extractor = MapExtractor::new(ExtractionConfig {
//!     cluster_count: 4,
//!     flatten_enabled: true,
//!     ..ExtractionConfig::default()
//! })?;
//!
//! let map = extractor.extract(&screenshot)?;
//! map.save("map.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `cli` (default): Builds the `mapmatte` command line tool
//! - `rayon`: Parallel pixel assignment and parallel batch processing

pub mod batch;
mod error;
mod mapmatte;
mod utils;

#[cfg(test)]
mod test_utils;

pub use error::{AlphaMaskError, BatchError, ExtractionError, QuantizeError};
pub use mapmatte::apply_alpha_mask::ApplyAlphaMask;
pub use mapmatte::background_mask::{binarize, BackgroundMaskExt};
pub use mapmatte::color_quantizer::{Center, ColorQuantizer, LabelMap, Quantization};
pub use mapmatte::extraction::{ExtractionConfig, MapExtractor, Segmentation};
pub use mapmatte::flatten_colors::{lab_components, FlattenColorsExt};
pub use mapmatte::foreground_bounds::{BoundingBox, ForegroundBoundsExt};

// Re-export imageproc::definitions::Image for convenience
pub use imageproc::definitions::Image;
