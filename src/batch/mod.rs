//! Batch processing of screenshot directories.
//!
//! Reads every matching image from the input directory, extracts its map and
//! writes `<stem>.png` into the output directory. Per-file failures are
//! reported and counted; invalid parameters stop the whole batch.

mod config;
mod inputs;
mod report;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use image::{DynamicImage, ImageError, ImageFormat, ImageReader, RgbImage, RgbaImage};
use log::{debug, info};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

pub use config::{
    BatchConfig, FilesConfig, FlattenConfig, LoggingConfig, PathsConfig, ProcessingConfig,
};
pub use inputs::{collect_inputs, has_extension, normalize_extensions, output_path_for};
pub use report::{BatchSummary, LogReporter, Outcome, ProgressEvent, Reporter};

use crate::error::{BatchError, ExtractionError};
use crate::mapmatte::extraction::MapExtractor;

/// Decodes any supported raster format into 8-bit RGB
///
/// The format is detected from the file contents; alpha is dropped.
///
/// # Errors
///
/// * `BatchError::Decode` - the file is missing, unreadable or not an image
pub fn decode(path: &Path) -> Result<RgbImage, BatchError> {
    let decode_error = |source: ImageError| BatchError::Decode {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|e| decode_error(ImageError::IoError(e)))?
        .decode()
        .map(DynamicImage::into_rgb8)
        .map_err(decode_error)
}

/// Writes `image` as PNG
///
/// The data goes to a temporary sibling first and is renamed into place, so
/// a failed write never leaves a truncated file at `path`.
///
/// # Errors
///
/// * `BatchError::Encode` - encoding or any file operation failed
pub fn encode(image: &RgbaImage, path: &Path) -> Result<(), BatchError> {
    let encode_error = |source: ImageError| BatchError::Encode {
        path: path.to_path_buf(),
        source,
    };
    let mut partial = path.as_os_str().to_os_string();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    if let Err(e) = image.save_with_format(&partial, ImageFormat::Png) {
        let _ = fs::remove_file(&partial);
        return Err(encode_error(e));
    }
    fs::rename(&partial, path).map_err(|e| {
        let _ = fs::remove_file(&partial);
        encode_error(ImageError::IoError(e))
    })
}

/// Processes every input described by `config`
///
/// # Errors
///
/// * `BatchError::Extraction` - the extraction parameters are invalid, either
///   up front or for one of the images; the batch stops
/// * `BatchError::Io` - the output directory cannot be created or the input
///   directory cannot be listed
pub fn run_batch(config: &BatchConfig, reporter: &dyn Reporter) -> Result<BatchSummary, BatchError> {
    let start = Instant::now();
    let extractor = MapExtractor::new(config.extraction_config())?;
    let input_dir = &config.paths.input_dir;
    let output_dir = &config.paths.output_dir;

    fs::create_dir_all(output_dir).map_err(|source| BatchError::Io {
        path: output_dir.clone(),
        source,
    })?;
    let files = collect_inputs(input_dir, &config.files.extensions)?;
    let total = files.len();

    if total == 0 {
        info!("No valid image files found in {}", input_dir.display());
    } else {
        debug!("run_batch: {total} files from {}", input_dir.display());
    }

    let process = |(offset, path): (usize, &PathBuf)| -> Result<Outcome, BatchError> {
        reporter.on_file_start(offset + 1, total, path);
        let outcome = process_file(&extractor, path, output_dir)?;
        reporter.on_file(&ProgressEvent {
            index: offset + 1,
            total,
            path,
            outcome: &outcome,
        });
        Ok(outcome)
    };

    #[cfg(not(feature = "rayon"))]
    let outcomes = files
        .iter()
        .enumerate()
        .map(process)
        .collect::<Result<Vec<_>, _>>()?;
    #[cfg(feature = "rayon")]
    let outcomes = files
        .par_iter()
        .enumerate()
        .map(process)
        .collect::<Result<Vec<_>, _>>()?;

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    let summary = BatchSummary {
        total,
        succeeded,
        failed: total - succeeded,
        flatten_enabled: config.flatten_colors.enabled,
        output_dir: output_dir.clone(),
        elapsed: start.elapsed(),
    };
    if total > 0 {
        reporter.on_summary(&summary);
    }
    Ok(summary)
}

/// Decode, extract and encode one file.
///
/// Only errors that must stop the batch are returned as `Err`.
fn process_file(
    extractor: &MapExtractor,
    path: &Path,
    output_dir: &Path,
) -> Result<Outcome, BatchError> {
    let image = match decode(path) {
        Ok(image) => image,
        Err(e) => return Ok(Outcome::DecodeFailed(e.to_string())),
    };

    let map = match extractor.extract(&image) {
        Ok(map) => map,
        Err(ExtractionError::NoForegroundDetected) => return Ok(Outcome::NoForeground),
        Err(e) if e.is_fatal() => return Err(e.into()),
        Err(e) => return Ok(Outcome::ExtractionFailed(e.to_string())),
    };

    let output = output_path_for(path, output_dir);
    match encode(&map, &output) {
        Ok(()) => Ok(Outcome::Saved(output)),
        Err(e) => Ok(Outcome::EncodeFailed(e.to_string())),
    }
}
