use std::path::PathBuf;

use thiserror::Error;

/// Error type for color quantization
///
/// Returned by [`ColorQuantizer`](crate::ColorQuantizer) when its options
/// cannot be satisfied for the given image.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantizeError {
    /// The image has no pixels to cluster
    #[error("Cannot quantize an empty image")]
    EmptyImage,

    /// An option violates the quantizer's preconditions
    ///
    /// This covers a cluster count of zero, a cluster count larger than the
    /// number of pixels (K distinct seeds cannot be drawn), a zero iteration
    /// budget and a negative or non-finite tolerance.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Error type for alpha mask operations
///
/// This error type covers failures that can occur when applying
/// alpha masks to images.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphaMaskError {
    /// Image and mask dimensions do not match
    #[error("Image and mask dimensions do not match: expected {expected:?}, actual {actual:?}")]
    DimensionMismatch {
        /// Expected dimensions (width, height)
        expected: (u32, u32),
        /// Actual dimensions (width, height)
        actual: (u32, u32),
    },
}

/// Error type for single image extraction
///
/// `InvalidParameter` means the configuration itself is unusable and the
/// caller should stop; `NoForegroundDetected` only concerns the current image.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    /// Configuration values violate a component precondition
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Every pixel was classified as background
    #[error("No map detected: the mask has no foreground pixels")]
    NoForegroundDetected,

    /// Cropped image and mask disagree in size
    #[error(transparent)]
    AlphaMask(#[from] AlphaMaskError),
}

impl From<QuantizeError> for ExtractionError {
    fn from(error: QuantizeError) -> Self {
        match error {
            QuantizeError::InvalidParameter(message) => Self::InvalidParameter(message),
            QuantizeError::EmptyImage => {
                Self::InvalidParameter("image dimensions must be non-zero".to_owned())
            }
        }
    }
}

impl ExtractionError {
    /// Returns `true` when the error should abort a whole batch
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidParameter(_))
    }
}

/// Error type for the batch driver
#[derive(Debug, Error)]
pub enum BatchError {
    /// The configuration file could not be read or parsed
    #[error("Failed to load config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// The input could not be decoded as an image
    #[error("Failed to load {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The output could not be written
    #[error("Failed to save {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Extraction failed with an error that aborts the batch
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Directory listing or creation failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
